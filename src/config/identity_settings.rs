use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::config::errors::ConfigError;
use crate::config::{EnvironmentProvider, SystemEnvironment};
use crate::providers::HashCost;
use crate::stores::UpsertStrategy;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://identity.db?mode=rwc";

/// Settings for the identity store, read once at startup
#[derive(Clone, PartialEq, Eq)]
pub struct IdentitySettings {
    pub database_url: String,
    pub upsert_strategy: UpsertStrategy,
    pub hash_cost: HashCost,
}

impl IdentitySettings {
    /// Load settings from the given environment
    ///
    /// Unset variables fall back to their defaults; set but unparsable ones
    /// are rejected.
    ///
    /// # Errors
    /// * `ConfigError::InvalidFormat` - A variable holds a value of the wrong shape
    pub fn from_env_provider(
        env_provider: Arc<dyn EnvironmentProvider + Send + Sync>,
    ) -> Result<Self, ConfigError> {
        let database_url = env_provider
            .get_var("DATABASE_URL")
            .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());
        if database_url.trim().is_empty() {
            return Err(ConfigError::InvalidFormat {
                setting_name: "DATABASE_URL".to_string(),
                expected: "a non-empty database URL".to_string(),
                actual: database_url,
            });
        }

        let upsert_strategy = match env_provider.get_var("UPSERT_STRATEGY") {
            None => UpsertStrategy::default(),
            Some(value) => UpsertStrategy::from_str(&value).map_err(|_| ConfigError::InvalidFormat {
                setting_name: "UPSERT_STRATEGY".to_string(),
                expected: "read_then_write, transactional or on_conflict".to_string(),
                actual: value,
            })?,
        };

        let defaults = HashCost::default();
        let hash_cost = HashCost::new(
            parse_u32(&*env_provider, "PASSWORD_HASH_MEMORY_KIB", defaults.memory_kib)?,
            parse_u32(&*env_provider, "PASSWORD_HASH_ITERATIONS", defaults.iterations)?,
            parse_u32(&*env_provider, "PASSWORD_HASH_PARALLELISM", defaults.parallelism)?,
        );

        Ok(Self {
            database_url,
            upsert_strategy,
            hash_cost,
        })
    }

    /// Convenience method that uses the system environment provider
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_provider(Arc::new(SystemEnvironment))
    }
}

fn parse_u32(
    env_provider: &(dyn EnvironmentProvider + Send + Sync),
    setting_name: &str,
    default: u32,
) -> Result<u32, ConfigError> {
    match env_provider.get_var(setting_name) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse::<u32>()
            .ok()
            .filter(|parsed| *parsed > 0)
            .ok_or_else(|| ConfigError::InvalidFormat {
                setting_name: setting_name.to_string(),
                expected: "a positive integer".to_string(),
                actual: value,
            }),
    }
}

impl fmt::Debug for IdentitySettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // The URL may carry credentials for non-SQLite backends
        let database_url = match self.database_url.split_once('@') {
            Some((_, host)) => format!("<redacted>@{}", host),
            None => self.database_url.clone(),
        };
        f.debug_struct("IdentitySettings")
            .field("database_url", &database_url)
            .field("upsert_strategy", &self.upsert_strategy)
            .field("hash_cost", &self.hash_cost)
            .finish()
    }
}
