use migration::{IdentityMigrator, MigratorTrait};
use sea_orm::{Database, DatabaseConnection};

use crate::config::IdentitySettings;
use crate::errors::InternalError;

/// Connect to the identity database
///
/// Does NOT run migrations - call migrate_identity_database() separately.
///
/// # Returns
/// * `Ok(DatabaseConnection)` - Connection established successfully
/// * `Err(InternalError)` - Connection failed
pub async fn connect_database(settings: &IdentitySettings) -> Result<DatabaseConnection, InternalError> {
    let db = Database::connect(settings.database_url.as_str())
        .await
        .map_err(|e| InternalError::database("connect_database", e))?;

    tracing::debug!(upsert_strategy = %settings.upsert_strategy, "Connected to identity database");

    Ok(db)
}

/// Run pending migrations on the identity database
///
/// Creates the `roles` and `users` tables on first run.
///
/// # Returns
/// * `Ok(())` - Migrations completed successfully
/// * `Err(InternalError)` - Migration failed
pub async fn migrate_identity_database(db: &DatabaseConnection) -> Result<(), InternalError> {
    IdentityMigrator::up(db, None)
        .await
        .map_err(|e| InternalError::database("run_migrations", e))?;

    tracing::debug!("Identity database migrations completed");

    Ok(())
}
