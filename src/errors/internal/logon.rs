use std::fmt;

use thiserror::Error;

use super::DatabaseError;

/// Distinguishing kind of a rejected logon
///
/// Unknown usernames and wrong passwords share `BadUser` so callers cannot
/// enumerate accounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogonErrorKind {
    BadUser,
    LockedAccount,
    ForcedPasswordReset,
    TooManyFailedLogons,
    FailedToSaveUser,
    StorageFailure,
}

impl LogonErrorKind {
    /// Stable numeric code for the kind
    pub fn code(self) -> u8 {
        match self {
            LogonErrorKind::BadUser => 1,
            LogonErrorKind::LockedAccount => 2,
            LogonErrorKind::ForcedPasswordReset => 3,
            LogonErrorKind::TooManyFailedLogons => 4,
            LogonErrorKind::FailedToSaveUser => 5,
            LogonErrorKind::StorageFailure => 6,
        }
    }
}

impl fmt::Display for LogonErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LogonErrorKind::BadUser => "bad_user",
            LogonErrorKind::LockedAccount => "locked_account",
            LogonErrorKind::ForcedPasswordReset => "forced_password_reset",
            LogonErrorKind::TooManyFailedLogons => "too_many_failed_logons",
            LogonErrorKind::FailedToSaveUser => "failed_to_save_user",
            LogonErrorKind::StorageFailure => "storage_failure",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug)]
#[error("{message}")]
pub struct LogonError {
    pub kind: LogonErrorKind,
    pub message: String,
    #[source]
    pub source: Option<DatabaseError>,
}

impl LogonError {
    fn new(kind: LogonErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    pub fn bad_user() -> Self {
        Self::new(LogonErrorKind::BadUser, "Username or password is not valid")
    }

    pub fn locked_account() -> Self {
        Self::new(LogonErrorKind::LockedAccount, "Account locked")
    }

    pub fn forced_password_reset() -> Self {
        Self::new(LogonErrorKind::ForcedPasswordReset, "New password needed")
    }

    pub fn too_many_failed_logons() -> Self {
        Self::new(LogonErrorKind::TooManyFailedLogons, "Too many failed logins")
    }

    pub fn failed_to_save_user(source: DatabaseError) -> Self {
        Self {
            kind: LogonErrorKind::FailedToSaveUser,
            message: format!("Failed to save user account: {}", source),
            source: Some(source),
        }
    }

    pub fn storage_failure(source: DatabaseError) -> Self {
        Self {
            kind: LogonErrorKind::StorageFailure,
            message: format!("Failed to load user account: {}", source),
            source: Some(source),
        }
    }

    pub fn code(&self) -> u8 {
        self.kind.code()
    }
}
