use std::fmt;

use crate::errors::ProtectedEntityError;
use crate::types::db::user;
use crate::types::internal::{PermissionSet, Role};

/// An account with its embedded role snapshot
///
/// The role is copied by value when the user is loaded; changes made to the
/// role elsewhere are only visible after a reload or `assign_role`.
#[derive(Clone, PartialEq, Eq)]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
    pub password: Vec<u8>,
    pub role: Role,
    pub login_attempts: u32,
    pub last_login: i64,
    pub force_password_reset: bool,
    pub disable_account: bool,
    pub created_at: i64,
    pub updated_at: i64,
    pub deleted_at: Option<i64>,
}

impl User {
    /// Delete guard, run by the store before a soft delete
    pub fn ensure_deletable(&self) -> Result<(), ProtectedEntityError> {
        if self.role.is_protected() {
            return Err(ProtectedEntityError::User {
                username: self.username.clone(),
            });
        }
        Ok(())
    }
}

impl From<user::Model> for User {
    fn from(model: user::Model) -> Self {
        let role = Role {
            id: model.role_id,
            role_name: model.role_name,
            permissions: PermissionSet::from(model.role_permissions),
            created_at: model.role_created_at,
            updated_at: model.role_updated_at,
            deleted_at: None,
        };

        Self {
            id: model.id,
            username: model.username,
            email: model.email,
            password: model.password,
            role,
            login_attempts: u32::try_from(model.login_attempts).unwrap_or(0),
            last_login: model.last_login,
            force_password_reset: model.force_password_reset,
            disable_account: model.disable_account,
            created_at: model.created_at,
            updated_at: model.updated_at,
            deleted_at: model.deleted_at,
        }
    }
}

impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("role", &self.role)
            .field("login_attempts", &self.login_attempts)
            .field("last_login", &self.last_login)
            .field("force_password_reset", &self.force_password_reset)
            .field("disable_account", &self.disable_account)
            .field("deleted_at", &self.deleted_at)
            .finish()
    }
}
