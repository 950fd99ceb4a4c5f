use std::sync::Arc;

use crate::app_data::AppData;
use crate::errors::{InternalError, LogonError};
use crate::providers::{AuthenticationProvider, UserProvider};
use crate::stores::{RoleStore, UserStore};
use crate::types::internal::{Role, User};

/// Public surface of the identity store
///
/// Each call runs against the shared connection held by `AppData`.
pub struct IdentityCoordinator {
    app_data: Arc<AppData>,
    role_store: Arc<RoleStore>,
    user_store: Arc<UserStore>,
    user_provider: Arc<UserProvider>,
    authentication_provider: Arc<AuthenticationProvider>,
}

impl IdentityCoordinator {
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            role_store: Arc::clone(&app_data.role_store),
            user_store: Arc::clone(&app_data.user_store),
            user_provider: Arc::clone(&app_data.user_provider),
            authentication_provider: Arc::clone(&app_data.authentication_provider),
            app_data,
        }
    }

    pub async fn initialize_defaults(&self) -> Result<(), InternalError> {
        self.user_provider.initialize_defaults(&self.app_data.db).await
    }

    pub async fn create_user(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<User, InternalError> {
        self.user_provider
            .create_user(&self.app_data.db, username, email, password)
            .await
    }

    pub async fn load_user(&self, username: &str) -> Result<User, InternalError> {
        self.user_store.load(&self.app_data.db, username).await
    }

    pub async fn save_user(&self, user: &User) -> Result<(), InternalError> {
        self.user_store.save(&self.app_data.db, user).await
    }

    pub async fn delete_user(&self, user: &User) -> Result<(), InternalError> {
        self.user_store.delete(&self.app_data.db, user).await
    }

    pub async fn logon(&self, username: &str, password: &str) -> Result<User, LogonError> {
        self.authentication_provider
            .logon(&self.app_data.db, username, password)
            .await
    }

    pub async fn change_password(
        &self,
        user: &User,
        old_password: &str,
        new_password: &str,
    ) -> Result<User, InternalError> {
        self.user_provider
            .change_password(&self.app_data.db, user, old_password, new_password)
            .await
    }

    /// Returns the new plaintext password
    pub async fn reset_password(&self, user: &User) -> Result<String, InternalError> {
        self.user_provider.reset_password(&self.app_data.db, user).await
    }

    pub async fn assign_role(&self, user: &User, role_name: &str) -> Result<User, InternalError> {
        self.user_provider
            .assign_role(&self.app_data.db, user, role_name)
            .await
    }

    pub async fn set_account_disabled(&self, user: &User, disabled: bool) -> Result<User, InternalError> {
        self.user_provider
            .set_account_disabled(&self.app_data.db, user, disabled)
            .await
    }

    pub async fn load_role(&self, role_name: &str) -> Result<Role, InternalError> {
        self.role_store.load(&self.app_data.db, role_name).await
    }

    pub async fn list_roles(&self) -> Result<Vec<Role>, InternalError> {
        self.role_store.list(&self.app_data.db).await
    }

    pub async fn save_role(&self, role: &Role) -> Result<(), InternalError> {
        self.role_store.save(&self.app_data.db, role).await
    }

    pub async fn delete_role(&self, role: &Role) -> Result<(), InternalError> {
        self.role_store.delete(&self.app_data.db, role).await
    }
}
