// Common test utilities for integration tests
#![allow(dead_code)]

use std::sync::Arc;

use blue_beetle::app_data::AppData;
use blue_beetle::config::IdentitySettings;
use blue_beetle::coordinators::IdentityCoordinator;
use blue_beetle::providers::HashCost;
use blue_beetle::stores::UpsertStrategy;
use migration::{IdentityMigrator, MigratorTrait};
use sea_orm::{Database, DatabaseConnection};

/// Creates a test identity database with migrations applied
pub async fn setup_test_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to create test database");

    IdentityMigrator::up(&db, None)
        .await
        .expect("Failed to run identity migrations");

    db
}

pub fn test_settings(strategy: UpsertStrategy) -> IdentitySettings {
    IdentitySettings {
        database_url: "sqlite::memory:".to_string(),
        upsert_strategy: strategy,
        hash_cost: HashCost::new(8, 1, 1),
    }
}

/// Coordinator over a fresh migrated database, defaults not yet initialized
pub async fn setup_coordinator(strategy: UpsertStrategy) -> IdentityCoordinator {
    let db = setup_test_db().await;
    let app_data = Arc::new(AppData::from_connection(db, test_settings(strategy)));
    IdentityCoordinator::new(app_data)
}

/// Coordinator with default roles and the admin account in place
pub async fn setup_initialized_coordinator(strategy: UpsertStrategy) -> IdentityCoordinator {
    let coordinator = setup_coordinator(strategy).await;
    coordinator
        .initialize_defaults()
        .await
        .expect("Failed to initialize defaults");
    coordinator
}

pub const ALL_STRATEGIES: [UpsertStrategy; 3] = [
    UpsertStrategy::ReadThenWrite,
    UpsertStrategy::Transactional,
    UpsertStrategy::OnConflict,
];
