use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    #[error("username can not be empty")]
    EmptyUsername,

    #[error("username already exists: {username}")]
    DuplicateUsername { username: String },
}
