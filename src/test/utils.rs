// Test utilities shared across unit tests
// Only compiled when running tests

use std::sync::Arc;

use migration::{IdentityMigrator, MigratorTrait};
use sea_orm::{Database, DatabaseConnection};

use crate::app_data::AppData;
use crate::config::IdentitySettings;
use crate::providers::{HashCost, PasswordPolicyProvider};
use crate::stores::UpsertStrategy;
use crate::types::internal::{Role, User};

/// Creates an in-memory identity database with migrations applied
pub async fn setup_test_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to create test database");

    IdentityMigrator::up(&db, None)
        .await
        .expect("Failed to run identity migrations");

    db
}

/// Cheapest Argon2 cost the library accepts, so tests don't spend seconds hashing
pub fn test_hash_cost() -> HashCost {
    HashCost::new(8, 1, 1)
}

pub fn test_policy() -> Arc<PasswordPolicyProvider> {
    Arc::new(PasswordPolicyProvider::new(test_hash_cost()))
}

/// Settings for an in-memory database with the given upsert strategy
pub fn test_settings(strategy: UpsertStrategy) -> IdentitySettings {
    IdentitySettings {
        database_url: "sqlite::memory:".to_string(),
        upsert_strategy: strategy,
        hash_cost: test_hash_cost(),
    }
}

/// Creates a full AppData over a fresh in-memory database
pub async fn setup_test_app_data(strategy: UpsertStrategy) -> Arc<AppData> {
    let db = setup_test_db().await;
    Arc::new(AppData::from_connection(db, test_settings(strategy)))
}

/// An unsaved user with a placeholder hash
///
/// The password bytes are not a valid hash; use a provider when a test needs
/// to log on.
pub fn test_user(username: &str, role: Role) -> User {
    User {
        id: String::new(),
        username: username.to_string(),
        email: format!("{}@example.com", username),
        password: b"placeholder-hash".to_vec(),
        role,
        login_attempts: 0,
        last_login: 0,
        force_password_reset: false,
        disable_account: false,
        created_at: 0,
        updated_at: 0,
        deleted_at: None,
    }
}
