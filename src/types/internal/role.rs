use crate::errors::ProtectedEntityError;
use crate::types::db::role;
use crate::types::internal::PermissionSet;

pub const NO_PERMISSIONS_ROLE: &str = "NO_PERMISSIONS";
pub const ADMIN_ROLE: &str = "ADMIN";

/// A named permission set
///
/// `id` and the timestamps are assigned by the store; a freshly built role
/// carries an empty id until it is saved and reloaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Role {
    pub id: String,
    pub role_name: String,
    pub permissions: PermissionSet,
    pub created_at: i64,
    pub updated_at: i64,
    pub deleted_at: Option<i64>,
}

impl Role {
    pub fn new(role_name: impl Into<String>, permissions: PermissionSet) -> Self {
        Self {
            id: String::new(),
            role_name: role_name.into(),
            permissions,
            created_at: 0,
            updated_at: 0,
            deleted_at: None,
        }
    }

    pub fn set_permission(&mut self, flag: PermissionSet) {
        self.permissions = PermissionSet::set(self.permissions, flag);
    }

    pub fn unset_permission(&mut self, flag: PermissionSet) {
        self.permissions = PermissionSet::unset(self.permissions, flag);
    }

    /// True only when the permission value is exactly ADMIN.
    ///
    /// ADMIN combined with any other flag is not protected.
    pub fn is_protected(&self) -> bool {
        self.permissions == PermissionSet::ADMIN
    }

    /// Delete guard, run by the store before a soft delete
    pub fn ensure_deletable(&self) -> Result<(), ProtectedEntityError> {
        if self.is_protected() {
            return Err(ProtectedEntityError::Role {
                role_name: self.role_name.clone(),
            });
        }
        Ok(())
    }
}

impl From<role::Model> for Role {
    fn from(model: role::Model) -> Self {
        Self {
            id: model.id,
            role_name: model.role_name,
            permissions: PermissionSet::from(model.permissions),
            created_at: model.created_at,
            updated_at: model.updated_at,
            deleted_at: model.deleted_at,
        }
    }
}
