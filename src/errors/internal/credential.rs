use thiserror::Error;

/// Rejections from the password change flow
#[derive(Error, Debug, PartialEq, Eq)]
pub enum CredentialError {
    #[error("current password doesn't match for the user")]
    WrongPassword,

    #[error("current and new password can't be the same")]
    SamePassword,
}
