use thiserror::Error;

pub mod credential;
pub mod database;
pub mod logon;
pub mod password_policy;
pub mod protected;
pub mod validation;

pub use credential::CredentialError;
pub use database::DatabaseError;
pub use logon::{LogonError, LogonErrorKind};
pub use password_policy::PasswordPolicyError;
pub use protected::ProtectedEntityError;
pub use validation::ValidationError;

/// Error type for store, provider and coordinator operations
///
/// Infrastructure failures (`Database`) sit next to the domain failures of
/// each component. Nothing in the core swallows these; every operation
/// hands them back to its caller. Logon has its own `LogonError`.
#[derive(Error, Debug)]
pub enum InternalError {
    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error("{entity} not found: {key}")]
    NotFound { entity: &'static str, key: String },

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    PasswordPolicy(#[from] PasswordPolicyError),

    #[error(transparent)]
    Credential(#[from] CredentialError),

    #[error(transparent)]
    Protected(#[from] ProtectedEntityError),
}

impl InternalError {
    pub fn database(operation: &str, source: sea_orm::DbErr) -> InternalError {
        InternalError::Database(DatabaseError::from_db_err(operation, source))
    }

    pub fn not_found(entity: &'static str, key: impl Into<String>) -> InternalError {
        InternalError::NotFound {
            entity,
            key: key.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, InternalError::NotFound { .. })
    }
}
