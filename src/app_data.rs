use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::config::{self, IdentitySettings};
use crate::errors::InternalError;
use crate::providers::{AuthenticationProvider, PasswordPolicyProvider, UserProvider};
use crate::stores::{RoleStore, UserStore};

/// Everything the identity store needs, built once at startup
///
/// ```text
/// main.rs
///   ↓
/// AppData::init(settings)
///   ↓ connects, migrates, creates once
///   ├─ db (DatabaseConnection)
///   ├─ role_store / user_store (Arc, sharing one UpsertStrategy)
///   ├─ password_policy (Arc<PasswordPolicyProvider>)
///   └─ user_provider / authentication_provider
///   ↓ wrapped in Arc<AppData>
///   ↓ passed to IdentityCoordinator::new(app_data)
/// ```
pub struct AppData {
    pub db: DatabaseConnection,
    pub settings: IdentitySettings,
    pub role_store: Arc<RoleStore>,
    pub user_store: Arc<UserStore>,
    pub password_policy: Arc<PasswordPolicyProvider>,
    pub user_provider: Arc<UserProvider>,
    pub authentication_provider: Arc<AuthenticationProvider>,
}

impl AppData {
    /// Connect to the configured database, run migrations and build the stores
    ///
    /// # Errors
    ///
    /// Returns `InternalError::Database` when connecting or migrating fails
    pub async fn init(settings: IdentitySettings) -> Result<Self, InternalError> {
        tracing::info!("Initializing AppData...");

        let db = config::connect_database(&settings).await?;
        config::migrate_identity_database(&db).await?;

        let app_data = Self::from_connection(db, settings);
        tracing::info!("AppData initialization complete");
        Ok(app_data)
    }

    /// Build stores and providers over an already migrated connection
    pub fn from_connection(db: DatabaseConnection, settings: IdentitySettings) -> Self {
        let role_store = Arc::new(RoleStore::new(settings.upsert_strategy));
        let user_store = Arc::new(UserStore::new(settings.upsert_strategy));
        let password_policy = Arc::new(PasswordPolicyProvider::new(settings.hash_cost));

        let user_provider = Arc::new(UserProvider::new(
            user_store.clone(),
            role_store.clone(),
            password_policy.clone(),
        ));
        let authentication_provider = Arc::new(AuthenticationProvider::new(
            user_store.clone(),
            password_policy.clone(),
        ));

        tracing::debug!(upsert_strategy = %settings.upsert_strategy, "Stores created");

        Self {
            db,
            settings,
            role_store,
            user_store,
            password_policy,
            user_provider,
            authentication_provider,
        }
    }
}
