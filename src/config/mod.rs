pub mod database;
mod env_provider;
mod errors;
mod identity_settings;
mod logging;

pub use database::{connect_database, migrate_identity_database};
#[cfg(test)]
pub use env_provider::MockEnvironment;
pub use env_provider::{EnvironmentProvider, SystemEnvironment};
pub use errors::ConfigError;
pub use identity_settings::{IdentitySettings, DEFAULT_DATABASE_URL};
pub use logging::{init_logging, LoggingConfig, LoggingError};
