use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

/// Storage failures, wrapped with the operation that produced them
#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("Database error: {operation} failed: {source}")]
    Operation {
        operation: String,
        #[source]
        source: DbErr,
    },

    /// Two writers raced on the same unique key (role name or username)
    #[error("Unique constraint violated during {operation}: {source}")]
    UniqueViolation {
        operation: String,
        #[source]
        source: DbErr,
    },

    #[error("Starting transaction failed: {source}")]
    TransactionBegin {
        #[source]
        source: DbErr,
    },

    #[error("Committing transaction failed: {source}")]
    TransactionCommit {
        #[source]
        source: DbErr,
    },
}

impl DatabaseError {
    pub fn from_db_err(operation: &str, source: DbErr) -> Self {
        match source.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => DatabaseError::UniqueViolation {
                operation: operation.to_string(),
                source,
            },
            _ => DatabaseError::Operation {
                operation: operation.to_string(),
                source,
            },
        }
    }

    pub fn is_unique_violation(&self) -> bool {
        matches!(self, DatabaseError::UniqueViolation { .. })
    }
}
