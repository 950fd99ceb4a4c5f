use crate::types::internal::User;

/// Failed attempts tolerated before a correct password is still refused
pub const MAX_FAILED_LOGONS: u32 = 5;

/// States of a single logon attempt
///
/// Every attempt starts `Unauthenticated` and ends in exactly one of the
/// other states. Unknown usernames land in `BadCredentials` as well.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogonState {
    /// Start of every attempt; `evaluate` never returns it
    Unauthenticated,
    Authenticated,
    BadCredentials,
    AccountLocked,
    PasswordResetRequired,
    TooManyFailedAttempts,
}

impl LogonState {
    /// Decide where a loaded user goes once the password has been checked.
    ///
    /// Order matters: the disabled flag is only consulted after the password
    /// verified, then the forced reset, then the attempt counter.
    pub fn evaluate(user: &User, password_verified: bool) -> LogonState {
        if !password_verified {
            return LogonState::BadCredentials;
        }
        if user.disable_account {
            return LogonState::AccountLocked;
        }
        if user.force_password_reset {
            return LogonState::PasswordResetRequired;
        }
        if user.login_attempts > MAX_FAILED_LOGONS {
            return LogonState::TooManyFailedAttempts;
        }
        LogonState::Authenticated
    }
}
