use std::sync::Arc;

use chrono::Utc;
use sea_orm::{ConnectionTrait, DbErr, TransactionTrait};

use crate::errors::{DatabaseError, InternalError, LogonError};
use crate::providers::PasswordPolicyProvider;
use crate::stores::UserStore;
use crate::types::internal::{LogonState, User};

/// Runs logon attempts and records their outcome on the account
pub struct AuthenticationProvider {
    user_store: Arc<UserStore>,
    password_policy: Arc<PasswordPolicyProvider>,
}

impl AuthenticationProvider {
    pub fn new(user_store: Arc<UserStore>, password_policy: Arc<PasswordPolicyProvider>) -> Self {
        Self {
            user_store,
            password_policy,
        }
    }

    /// Authenticate `username` with `password`
    ///
    /// Unknown usernames and wrong passwords both yield `BadUser`. A wrong
    /// password and a refusal for too many failures each bump
    /// `login_attempts`; success resets it to 0 and stamps `last_login`.
    /// Locked and forced-reset outcomes leave the row untouched.
    ///
    /// # Returns
    /// * `Ok(User)` - The authenticated user, as persisted
    /// * `Err(LogonError)` - Kind tells which rule refused the attempt
    pub async fn logon(
        &self,
        conn: &(impl ConnectionTrait + TransactionTrait),
        username: &str,
        password: &str,
    ) -> Result<User, LogonError> {
        let mut user = match self.user_store.load(conn, username).await {
            Ok(user) => user,
            Err(e) if e.is_not_found() => {
                tracing::warn!(username, "Logon refused: unknown user");
                return Err(LogonError::bad_user());
            }
            Err(e) => return Err(LogonError::storage_failure(storage_error("load_user", e))),
        };

        let verified = self.password_policy.verify(&user.password, password);
        match LogonState::evaluate(&user, verified) {
            LogonState::BadCredentials => {
                user.login_attempts = user.login_attempts.saturating_add(1);
                self.persist(conn, &user).await?;
                tracing::warn!(username, attempts = user.login_attempts, "Logon refused: bad password");
                Err(LogonError::bad_user())
            }
            LogonState::AccountLocked => {
                tracing::warn!(username, "Logon refused: account locked");
                Err(LogonError::locked_account())
            }
            LogonState::PasswordResetRequired => {
                tracing::warn!(username, "Logon refused: password reset required");
                Err(LogonError::forced_password_reset())
            }
            LogonState::TooManyFailedAttempts => {
                user.login_attempts = user.login_attempts.saturating_add(1);
                user.last_login = Utc::now().timestamp();
                self.persist(conn, &user).await?;
                tracing::warn!(username, attempts = user.login_attempts, "Logon refused: too many failed attempts");
                Err(LogonError::too_many_failed_logons())
            }
            LogonState::Authenticated => {
                user.login_attempts = 0;
                user.last_login = Utc::now().timestamp();
                let user = self
                    .user_store
                    .upsert(conn, &user)
                    .await
                    .map_err(|e| LogonError::failed_to_save_user(storage_error("save_user", e)))?;
                tracing::info!(username, "Logon succeeded");
                Ok(user)
            }
            // Not a decision; never grants access
            LogonState::Unauthenticated => {
                tracing::error!(username, "Logon refused: attempt was never evaluated");
                Err(LogonError::bad_user())
            }
        }
    }

    async fn persist(
        &self,
        conn: &(impl ConnectionTrait + TransactionTrait),
        user: &User,
    ) -> Result<(), LogonError> {
        self.user_store
            .save(conn, user)
            .await
            .map_err(|e| LogonError::failed_to_save_user(storage_error("save_user", e)))
    }
}

/// Stores only fail with `Database`; anything else is folded into one so the
/// logon error still carries a source.
fn storage_error(operation: &str, err: InternalError) -> DatabaseError {
    match err {
        InternalError::Database(e) => e,
        other => DatabaseError::Operation {
            operation: operation.to_string(),
            source: DbErr::Custom(other.to_string()),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::LogonErrorKind;
    use crate::providers::UserProvider;
    use crate::stores::{RoleStore, UpsertStrategy};
    use crate::test::utils::{setup_test_db, test_policy};
    use crate::types::internal::logon::MAX_FAILED_LOGONS;
    use sea_orm::DatabaseConnection;

    async fn setup() -> (DatabaseConnection, AuthenticationProvider, Arc<UserStore>) {
        let db = setup_test_db().await;
        let user_store = Arc::new(UserStore::new(UpsertStrategy::ReadThenWrite));
        let role_store = Arc::new(RoleStore::new(UpsertStrategy::ReadThenWrite));
        role_store.initialize_defaults(&db).await.expect("default roles");

        let users = UserProvider::new(user_store.clone(), role_store, test_policy());
        users
            .create_user(&db, "alice", "alice@example.com", "Password_1")
            .await
            .expect("create alice");

        let auth = AuthenticationProvider::new(user_store.clone(), test_policy());
        (db, auth, user_store)
    }

    #[tokio::test]
    async fn test_logon_success_resets_attempts_and_stamps_last_login() {
        let (db, auth, user_store) = setup().await;
        let mut user = user_store.load(&db, "alice").await.expect("load");
        user.login_attempts = 3;
        user_store.save(&db, &user).await.expect("save");

        let logged_on = auth.logon(&db, "alice", "Password_1").await.expect("logon");

        assert_eq!(logged_on.login_attempts, 0);
        assert!(logged_on.last_login > 0);
        let stored = user_store.load(&db, "alice").await.expect("load");
        assert_eq!(stored.login_attempts, 0);
        assert_eq!(stored.last_login, logged_on.last_login);
    }

    #[tokio::test]
    async fn test_unknown_user_is_bad_user() {
        let (db, auth, _) = setup().await;

        let err = auth.logon(&db, "mallory", "Password_1").await.unwrap_err();
        assert_eq!(err.kind, LogonErrorKind::BadUser);
        assert_eq!(err.code(), 1);
    }

    #[tokio::test]
    async fn test_wrong_password_is_bad_user_and_counts() {
        let (db, auth, user_store) = setup().await;

        let err = auth.logon(&db, "alice", "Password_2").await.unwrap_err();
        assert_eq!(err.kind, LogonErrorKind::BadUser);
        assert_eq!(err.to_string(), "Username or password is not valid");
        assert_eq!(user_store.load(&db, "alice").await.expect("load").login_attempts, 1);
    }

    #[tokio::test]
    async fn test_locked_account_leaves_counters_alone() {
        let (db, auth, user_store) = setup().await;
        let mut user = user_store.load(&db, "alice").await.expect("load");
        user.disable_account = true;
        user.login_attempts = 2;
        user_store.save(&db, &user).await.expect("save");

        let err = auth.logon(&db, "alice", "Password_1").await.unwrap_err();
        assert_eq!(err.kind, LogonErrorKind::LockedAccount);
        assert_eq!(user_store.load(&db, "alice").await.expect("load").login_attempts, 2);
    }

    #[tokio::test]
    async fn test_locked_account_with_wrong_password_is_bad_user() {
        let (db, auth, user_store) = setup().await;
        let mut user = user_store.load(&db, "alice").await.expect("load");
        user.disable_account = true;
        user_store.save(&db, &user).await.expect("save");

        let err = auth.logon(&db, "alice", "Password_9").await.unwrap_err();
        assert_eq!(err.kind, LogonErrorKind::BadUser);
    }

    #[tokio::test]
    async fn test_forced_reset_refuses_correct_password() {
        let (db, auth, user_store) = setup().await;
        let mut user = user_store.load(&db, "alice").await.expect("load");
        user.force_password_reset = true;
        user_store.save(&db, &user).await.expect("save");

        let err = auth.logon(&db, "alice", "Password_1").await.unwrap_err();
        assert_eq!(err.kind, LogonErrorKind::ForcedPasswordReset);
        assert_eq!(err.code(), 3);
    }

    #[tokio::test]
    async fn test_too_many_attempts_refuses_and_keeps_counting() {
        let (db, auth, user_store) = setup().await;
        let mut user = user_store.load(&db, "alice").await.expect("load");
        user.login_attempts = MAX_FAILED_LOGONS + 1;
        user_store.save(&db, &user).await.expect("save");

        let err = auth.logon(&db, "alice", "Password_1").await.unwrap_err();
        assert_eq!(err.kind, LogonErrorKind::TooManyFailedLogons);

        let stored = user_store.load(&db, "alice").await.expect("load");
        assert_eq!(stored.login_attempts, MAX_FAILED_LOGONS + 2);
        assert!(stored.last_login > 0);
    }

    #[tokio::test]
    async fn test_five_failures_still_allow_logon() {
        let (db, auth, _) = setup().await;
        for _ in 0..MAX_FAILED_LOGONS {
            let _ = auth.logon(&db, "alice", "Password_2").await;
        }

        let user = auth.logon(&db, "alice", "Password_1").await.expect("logon");
        assert_eq!(user.login_attempts, 0);
    }

    const FAIL_USER_UPDATES: &str =
        "CREATE TRIGGER fail_user_updates BEFORE UPDATE ON users BEGIN SELECT RAISE(ABORT, 'disk full'); END";

    #[tokio::test]
    async fn test_failed_save_after_wrong_password_is_failed_to_save_user() {
        let (db, auth, user_store) = setup().await;
        db.execute_unprepared(FAIL_USER_UPDATES).await.expect("install trigger");

        let err = auth.logon(&db, "alice", "Password_2").await.unwrap_err();

        assert_eq!(err.kind, LogonErrorKind::FailedToSaveUser);
        assert_eq!(err.code(), 5);
        assert!(err.source.is_some());
        assert_eq!(user_store.load(&db, "alice").await.expect("load").login_attempts, 0);
    }

    #[tokio::test]
    async fn test_failed_save_after_correct_password_does_not_log_on() {
        let (db, auth, user_store) = setup().await;
        let mut user = user_store.load(&db, "alice").await.expect("load");
        user.login_attempts = 2;
        user_store.save(&db, &user).await.expect("save");
        db.execute_unprepared(FAIL_USER_UPDATES).await.expect("install trigger");

        let err = auth.logon(&db, "alice", "Password_1").await.unwrap_err();

        assert_eq!(err.kind, LogonErrorKind::FailedToSaveUser);
        assert_eq!(err.code(), 5);
        let source = err.source.as_ref().expect("storage error kept as source");
        assert!(source.to_string().contains("update_user"), "unexpected source: {}", source);
        let stored = user_store.load(&db, "alice").await.expect("load");
        assert_eq!(stored.login_attempts, 2);
        assert_eq!(stored.last_login, 0);
    }

    #[tokio::test]
    async fn test_failed_save_after_too_many_attempts_is_failed_to_save_user() {
        let (db, auth, user_store) = setup().await;
        let mut user = user_store.load(&db, "alice").await.expect("load");
        user.login_attempts = MAX_FAILED_LOGONS + 1;
        user_store.save(&db, &user).await.expect("save");
        db.execute_unprepared(FAIL_USER_UPDATES).await.expect("install trigger");

        let err = auth.logon(&db, "alice", "Password_1").await.unwrap_err();

        assert_eq!(err.kind, LogonErrorKind::FailedToSaveUser);
        assert!(err.source.is_some());
    }
}
