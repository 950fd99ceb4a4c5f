use thiserror::Error;

/// Deletion refused because the entity carries exactly the ADMIN permission value
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ProtectedEntityError {
    #[error("admin role can not be deleted: {role_name}")]
    Role { role_name: String },

    #[error("admin users are not allowed to be deleted: {username}")]
    User { username: String },
}
