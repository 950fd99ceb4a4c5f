use std::sync::Arc;

use sea_orm::{ConnectionTrait, TransactionTrait};

use crate::errors::{CredentialError, InternalError, ValidationError};
use crate::providers::PasswordPolicyProvider;
use crate::stores::{RoleStore, UserStore};
use crate::types::internal::role::{ADMIN_ROLE, NO_PERMISSIONS_ROLE};
use crate::types::internal::User;

pub const DEFAULT_ADMIN_USERNAME: &str = "admin";
pub const DEFAULT_ADMIN_EMAIL: &str = "admin@no.email";
pub const DEFAULT_ADMIN_PASSWORD: &str = "Password_1";

/// Account lifecycle: creation, password changes and role assignment
pub struct UserProvider {
    user_store: Arc<UserStore>,
    role_store: Arc<RoleStore>,
    password_policy: Arc<PasswordPolicyProvider>,
}

impl UserProvider {
    pub fn new(
        user_store: Arc<UserStore>,
        role_store: Arc<RoleStore>,
        password_policy: Arc<PasswordPolicyProvider>,
    ) -> Self {
        Self {
            user_store,
            role_store,
            password_policy,
        }
    }

    /// Create an account holding the `NO_PERMISSIONS` role
    ///
    /// # Errors
    /// * `ValidationError::EmptyUsername` / `DuplicateUsername` - Username rejected
    /// * `PasswordPolicyError` - Password too weak or hashing failed
    /// * `NotFound` - The default roles were never initialized
    pub async fn create_user(
        &self,
        conn: &(impl ConnectionTrait + TransactionTrait),
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<User, InternalError> {
        if username.is_empty() {
            return Err(ValidationError::EmptyUsername.into());
        }
        if self.user_store.exists(conn, username).await? {
            return Err(ValidationError::DuplicateUsername {
                username: username.to_string(),
            }
            .into());
        }

        let role = self.role_store.load(conn, NO_PERMISSIONS_ROLE).await?;
        let password = self.password_policy.validate_and_hash(password)?;

        let user = User {
            id: String::new(),
            username: username.to_string(),
            email: email.to_string(),
            password,
            role,
            login_attempts: 0,
            last_login: 0,
            force_password_reset: false,
            disable_account: false,
            created_at: 0,
            updated_at: 0,
            deleted_at: None,
        };

        let created = self.user_store.upsert(conn, &user).await?;
        tracing::info!(username = %created.username, "User created");
        Ok(created)
    }

    /// Replace the password after checking the current one
    ///
    /// A successful change also clears `force_password_reset`, so a user sent
    /// through a forced reset can log on with the new password.
    pub async fn change_password(
        &self,
        conn: &(impl ConnectionTrait + TransactionTrait),
        user: &User,
        old_password: &str,
        new_password: &str,
    ) -> Result<User, InternalError> {
        if !self.password_policy.verify(&user.password, old_password) {
            return Err(CredentialError::WrongPassword.into());
        }
        if old_password == new_password {
            return Err(CredentialError::SamePassword.into());
        }

        let mut updated = user.clone();
        updated.password = self.password_policy.validate_and_hash(new_password)?;
        // Product decision, beyond a plain password swap: a completed change
        // ends a forced reset, or the account could never log on again.
        updated.force_password_reset = false;

        let saved = self.user_store.upsert(conn, &updated).await?;
        tracing::info!(username = %saved.username, "Password changed");
        Ok(saved)
    }

    /// Give the user a fresh random password and return it in plaintext
    ///
    /// The plaintext is not stored anywhere; this is the only chance to read it.
    pub async fn reset_password(
        &self,
        conn: &(impl ConnectionTrait + TransactionTrait),
        user: &User,
    ) -> Result<String, InternalError> {
        let plaintext = self.password_policy.generate_valid_random()?;

        let mut updated = user.clone();
        updated.password = self.password_policy.hash(&plaintext)?;
        updated.force_password_reset = false;
        updated.login_attempts = 0;

        self.user_store.save(conn, &updated).await?;
        tracing::info!(username = %updated.username, "Password reset");
        Ok(plaintext)
    }

    /// Embed a fresh snapshot of the named role and persist
    pub async fn assign_role(
        &self,
        conn: &(impl ConnectionTrait + TransactionTrait),
        user: &User,
        role_name: &str,
    ) -> Result<User, InternalError> {
        let role = self.role_store.load(conn, role_name).await?;

        let mut updated = user.clone();
        updated.role = role;

        let saved = self.user_store.upsert(conn, &updated).await?;
        tracing::info!(username = %saved.username, role = %saved.role.role_name, "Role assigned");
        Ok(saved)
    }

    pub async fn set_account_disabled(
        &self,
        conn: &(impl ConnectionTrait + TransactionTrait),
        user: &User,
        disabled: bool,
    ) -> Result<User, InternalError> {
        let mut updated = user.clone();
        updated.disable_account = disabled;

        let saved = self.user_store.upsert(conn, &updated).await?;
        tracing::info!(username = %saved.username, disabled, "Account disabled flag updated");
        Ok(saved)
    }

    /// Ensure the default roles and the `admin` account exist
    ///
    /// The admin account is created once with a well-known password and
    /// `force_password_reset` set; later calls leave it untouched.
    pub async fn initialize_defaults(
        &self,
        conn: &(impl ConnectionTrait + TransactionTrait),
    ) -> Result<(), InternalError> {
        self.role_store.initialize_defaults(conn).await?;

        if self.user_store.exists(conn, DEFAULT_ADMIN_USERNAME).await? {
            tracing::debug!("Default admin account already present");
            return Ok(());
        }

        let admin = self
            .create_user(conn, DEFAULT_ADMIN_USERNAME, DEFAULT_ADMIN_EMAIL, DEFAULT_ADMIN_PASSWORD)
            .await?;
        let mut admin = self.assign_role(conn, &admin, ADMIN_ROLE).await?;
        admin.force_password_reset = true;
        self.user_store.save(conn, &admin).await?;

        tracing::info!("Default admin account created");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::PasswordPolicyError;
    use crate::stores::UpsertStrategy;
    use crate::test::utils::{setup_test_db, test_policy};
    use crate::types::internal::PermissionSet;
    use sea_orm::DatabaseConnection;

    async fn setup() -> (DatabaseConnection, UserProvider, Arc<UserStore>) {
        let db = setup_test_db().await;
        let user_store = Arc::new(UserStore::new(UpsertStrategy::ReadThenWrite));
        let role_store = Arc::new(RoleStore::new(UpsertStrategy::ReadThenWrite));
        role_store.initialize_defaults(&db).await.expect("default roles");

        let provider = UserProvider::new(user_store.clone(), role_store, test_policy());
        (db, provider, user_store)
    }

    #[tokio::test]
    async fn test_create_user_assigns_no_permissions_role() {
        let (db, provider, user_store) = setup().await;

        let created = provider
            .create_user(&db, "alice", "alice@example.com", "Password_1")
            .await
            .expect("create user");

        assert!(!created.id.is_empty());
        assert_eq!(created.role.role_name, NO_PERMISSIONS_ROLE);
        assert_eq!(created.role.permissions, PermissionSet::NO_PERMISSIONS);
        assert_ne!(created.password, b"Password_1".to_vec());

        let loaded = user_store.load(&db, "alice").await.expect("load");
        assert_eq!(loaded.id, created.id);
        assert_eq!(loaded.role.role_name, NO_PERMISSIONS_ROLE);
        assert_eq!(loaded.login_attempts, 0);
    }

    #[tokio::test]
    async fn test_create_user_rejects_empty_username() {
        let (db, provider, _) = setup().await;

        let result = provider.create_user(&db, "", "x@example.com", "Password_1").await;
        assert!(matches!(
            result,
            Err(InternalError::Validation(ValidationError::EmptyUsername))
        ));
    }

    #[tokio::test]
    async fn test_create_user_rejects_taken_username() {
        let (db, provider, _) = setup().await;
        provider
            .create_user(&db, "alice", "a@example.com", "Password_1")
            .await
            .expect("first create");

        let result = provider.create_user(&db, "alice", "b@example.com", "Password_2").await;
        assert!(matches!(
            result,
            Err(InternalError::Validation(ValidationError::DuplicateUsername { .. }))
        ));
    }

    #[tokio::test]
    async fn test_create_user_rejects_weak_password() {
        let (db, provider, user_store) = setup().await;

        let result = provider.create_user(&db, "alice", "a@example.com", "password").await;
        assert!(matches!(
            result,
            Err(InternalError::PasswordPolicy(PasswordPolicyError::MissingUppercase))
        ));
        assert!(!user_store.exists(&db, "alice").await.expect("exists"));
    }

    #[tokio::test]
    async fn test_change_password_checks_old_password_first() {
        let (db, provider, _) = setup().await;
        let user = provider
            .create_user(&db, "alice", "a@example.com", "Password_1")
            .await
            .expect("create");

        let wrong = provider.change_password(&db, &user, "Wrong_pass1", "Password_2").await;
        assert!(matches!(wrong, Err(InternalError::Credential(CredentialError::WrongPassword))));

        let same = provider.change_password(&db, &user, "Password_1", "Password_1").await;
        assert!(matches!(same, Err(InternalError::Credential(CredentialError::SamePassword))));

        let weak = provider.change_password(&db, &user, "Password_1", "short").await;
        assert!(matches!(weak, Err(InternalError::PasswordPolicy(PasswordPolicyError::TooShort(8)))));
    }

    #[tokio::test]
    async fn test_change_password_persists_new_hash_and_clears_forced_reset() {
        let (db, provider, user_store) = setup().await;
        let mut user = provider
            .create_user(&db, "alice", "a@example.com", "Password_1")
            .await
            .expect("create");
        user.force_password_reset = true;
        user_store.save(&db, &user).await.expect("flag reset");

        provider
            .change_password(&db, &user, "Password_1", "Password_2!")
            .await
            .expect("change password");

        let loaded = user_store.load(&db, "alice").await.expect("load");
        let policy = test_policy();
        assert!(policy.verify(&loaded.password, "Password_2!"));
        assert!(!policy.verify(&loaded.password, "Password_1"));
        assert!(!loaded.force_password_reset);
    }

    #[tokio::test]
    async fn test_reset_password_returns_working_plaintext() {
        let (db, provider, user_store) = setup().await;
        let mut user = provider
            .create_user(&db, "alice", "a@example.com", "Password_1")
            .await
            .expect("create");
        user.force_password_reset = true;
        user.login_attempts = 7;
        user_store.save(&db, &user).await.expect("save");

        let plaintext = provider.reset_password(&db, &user).await.expect("reset");

        let loaded = user_store.load(&db, "alice").await.expect("load");
        assert!(test_policy().verify(&loaded.password, &plaintext));
        assert!(!loaded.force_password_reset);
        assert_eq!(loaded.login_attempts, 0);
    }

    #[tokio::test]
    async fn test_assign_role_embeds_snapshot() {
        let (db, provider, user_store) = setup().await;
        let user = provider
            .create_user(&db, "alice", "a@example.com", "Password_1")
            .await
            .expect("create");

        provider.assign_role(&db, &user, ADMIN_ROLE).await.expect("assign");

        let loaded = user_store.load(&db, "alice").await.expect("load");
        assert_eq!(loaded.role.role_name, ADMIN_ROLE);
        assert_eq!(loaded.role.permissions, PermissionSet::ADMIN);
        assert!(!loaded.role.id.is_empty());
    }

    #[tokio::test]
    async fn test_assign_unknown_role_is_not_found() {
        let (db, provider, _) = setup().await;
        let user = provider
            .create_user(&db, "alice", "a@example.com", "Password_1")
            .await
            .expect("create");

        let result = provider.assign_role(&db, &user, "GHOST").await;
        assert!(result.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_set_account_disabled_round_trips() {
        let (db, provider, user_store) = setup().await;
        let user = provider
            .create_user(&db, "alice", "a@example.com", "Password_1")
            .await
            .expect("create");

        let disabled = provider.set_account_disabled(&db, &user, true).await.expect("disable");
        assert!(user_store.load(&db, "alice").await.expect("load").disable_account);

        provider.set_account_disabled(&db, &disabled, false).await.expect("enable");
        assert!(!user_store.load(&db, "alice").await.expect("load").disable_account);
    }

    #[tokio::test]
    async fn test_initialize_defaults_creates_admin_once() {
        let (db, provider, user_store) = setup().await;

        provider.initialize_defaults(&db).await.expect("first init");
        let first = user_store.load(&db, DEFAULT_ADMIN_USERNAME).await.expect("admin");
        provider.initialize_defaults(&db).await.expect("second init");
        let second = user_store.load(&db, DEFAULT_ADMIN_USERNAME).await.expect("admin");

        assert_eq!(first.id, second.id);
        assert_eq!(second.email, DEFAULT_ADMIN_EMAIL);
        assert_eq!(second.role.permissions, PermissionSet::ADMIN);
        assert!(second.force_password_reset);
        assert!(test_policy().verify(&second.password, DEFAULT_ADMIN_PASSWORD));
    }

    #[tokio::test]
    async fn test_reset_password_on_deleted_user_keeps_it_deleted() {
        let (db, provider, user_store) = setup().await;
        let user = provider
            .create_user(&db, "bob", "b@example.com", "Password_1")
            .await
            .expect("create");
        user_store.delete(&db, &user).await.expect("delete");

        let result = provider.reset_password(&db, &user).await;

        assert!(result.unwrap_err().is_not_found());
        assert!(user_store.load(&db, "bob").await.unwrap_err().is_not_found());
    }
}
