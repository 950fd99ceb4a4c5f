// Errors layer - typed failures returned by stores, providers and coordinators
pub mod internal;

pub use internal::{
    CredentialError, DatabaseError, InternalError, LogonError, LogonErrorKind,
    PasswordPolicyError, ProtectedEntityError, ValidationError,
};
