use crate::config::{connect_database, migrate_identity_database, IdentitySettings};

/// Run database migrations for the identity database
///
/// Connects and runs all pending migrations without building AppData.
pub async fn run_migrations(settings: &IdentitySettings) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!("Running database migrations...");

    let db = connect_database(settings).await?;
    migrate_identity_database(&db).await?;

    tracing::info!("All migrations completed successfully");
    println!("✓ Migrations up to date");

    Ok(())
}
