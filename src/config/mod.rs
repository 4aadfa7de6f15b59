//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `LIMIT_ORDERS` prefix and nested values use double underscores as separators.
//!
//! Every section has defaults, so an empty environment yields a working
//! in-memory setup in UTC.
//!
//! # Example
//!
//! ```no_run
//! use limit_orders::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! let locale = config.locale.to_locale().expect("Invalid locale");
//! ```

mod cache;
mod database;
mod error;
mod locale;
mod settings;
mod telemetry;

pub use cache::{CacheBackend, CacheConfig, ScopeKind};
pub use database::DatabaseConfig;
pub use error::{ConfigError, ValidationError};
pub use locale::LocaleConfig;
pub use settings::SettingsConfig;
pub use telemetry::TelemetryConfig;

use serde::Deserialize;

/// Root application configuration
///
/// Load using [`AppConfig::load()`] which reads from environment variables.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Site offset, first weekday and display formats
    #[serde(default)]
    pub locale: LocaleConfig,

    /// Count cache backend, scope and Redis connection
    #[serde(default)]
    pub cache: CacheConfig,

    /// Settings store location
    #[serde(default)]
    pub settings: SettingsConfig,

    /// PostgreSQL connection for the order store
    #[serde(default)]
    pub database: Option<DatabaseConfig>,

    /// Logging
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `LIMIT_ORDERS` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `LIMIT_ORDERS__LOCALE__WEEK_STARTS_ON=0` -> `locale.week_starts_on = 0`
    /// - `LIMIT_ORDERS__CACHE__BACKEND=redis` -> `cache.backend = redis`
    /// - `LIMIT_ORDERS__CACHE__REDIS_URL=...` -> `cache.redis_url = ...`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("LIMIT_ORDERS")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid, or
    /// if the Redis cache backend is selected without a Redis URL.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.locale.validate()?;
        self.cache.validate()?;
        self.telemetry.validate()?;

        if let Some(database) = &self.database {
            database.validate()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::CacheScope;
    use std::env;
    use std::sync::Mutex;

    // Mutex to ensure tests don't run in parallel (env vars are global)
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const VARS: [&str; 8] = [
        "LIMIT_ORDERS__LOCALE__WEEK_STARTS_ON",
        "LIMIT_ORDERS__LOCALE__UTC_OFFSET_SECS",
        "LIMIT_ORDERS__CACHE__BACKEND",
        "LIMIT_ORDERS__CACHE__SCOPE",
        "LIMIT_ORDERS__CACHE__SITE_ID",
        "LIMIT_ORDERS__CACHE__REDIS_URL",
        "LIMIT_ORDERS__DATABASE__URL",
        "LIMIT_ORDERS__TELEMETRY__JSON",
    ];

    /// Helper to clear environment variables after testing
    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    #[test]
    fn test_load_defaults_from_empty_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        let result = AppConfig::load();

        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());
        let config = result.unwrap();
        assert_eq!(config.locale.week_starts_on, 1);
        assert_eq!(config.cache.backend, CacheBackend::InMemory);
        assert!(config.cache.redis_url.is_none());
        assert!(config.database.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_from_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("LIMIT_ORDERS__LOCALE__WEEK_STARTS_ON", "0");
        env::set_var("LIMIT_ORDERS__LOCALE__UTC_OFFSET_SECS", "-18000");
        env::set_var("LIMIT_ORDERS__CACHE__BACKEND", "redis");
        env::set_var("LIMIT_ORDERS__CACHE__SCOPE", "site");
        env::set_var("LIMIT_ORDERS__CACHE__SITE_ID", "2");
        env::set_var("LIMIT_ORDERS__CACHE__REDIS_URL", "redis://localhost:6379");
        env::set_var("LIMIT_ORDERS__DATABASE__URL", "postgresql://test@localhost/shop");
        env::set_var("LIMIT_ORDERS__TELEMETRY__JSON", "true");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.locale.week_starts_on, 0);
        assert_eq!(config.locale.utc_offset_secs, -18000);
        assert_eq!(config.cache.backend, CacheBackend::Redis);
        assert_eq!(config.cache.cache_scope().unwrap(), CacheScope::Site { site_id: 2 });
        assert_eq!(config.cache.redis_url().unwrap(), "redis://localhost:6379");
        assert_eq!(
            config.database.as_ref().unwrap().url,
            "postgresql://test@localhost/shop"
        );
        assert!(config.telemetry.json);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_redis_backend_requires_redis_url() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("LIMIT_ORDERS__CACHE__BACKEND", "redis");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert!(matches!(
            config.validate(),
            Err(ValidationError::MissingRequired(_))
        ));
    }

    #[test]
    fn test_invalid_week_start_fails_validation() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("LIMIT_ORDERS__LOCALE__WEEK_STARTS_ON", "9");
        let result = AppConfig::load();
        clear_env();

        assert!(result.unwrap().validate().is_err());
    }
}
