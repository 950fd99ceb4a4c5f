use thiserror::Error;

/// Errors raised while validating, hashing or generating passwords
#[derive(Error, Debug, PartialEq, Eq)]
pub enum PasswordPolicyError {
    /// Password is shorter than the minimum required length
    #[error("password must be at least {0} characters long")]
    TooShort(usize),

    #[error("password must have at least 1 uppercase letter")]
    MissingUppercase,

    #[error("password must have at least 1 lowercase letter")]
    MissingLowercase,

    #[error("password must have at least 1 number")]
    MissingDigit,

    #[error("password must have at least 1 symbol")]
    MissingSymbol,

    /// The hashing backend failed; never retried
    #[error("password hashing failed: {message}")]
    Hashing { message: String },

    /// The random generator exhausted its draw ceiling without a valid password
    #[error("no valid random password after {attempts} attempts")]
    NoValidCandidate { attempts: usize },
}
