//! Wiring of adapters from configuration.
//!
//! `Services` holds one adapter per port, chosen from [`AppConfig`]:
//!
//! - order store: PostgreSQL when `database` is set, in-memory otherwise
//! - settings store: YAML file when `settings.path` is set, in-memory otherwise
//! - count cache: Redis or in-memory per `cache.backend`

use std::sync::Arc;
use thiserror::Error;

use crate::adapters::{
    FileSettingsStore, InMemoryCountCache, InMemoryOrderStore, InMemorySettingsStore,
    PostgresOrderStore, RedisCountCache,
};
use crate::application::OrderLimiter;
use crate::config::{AppConfig, CacheBackend, ValidationError};
use crate::domain::foundation::DomainError;
use crate::domain::limiting::{LimiterError, Locale};
use crate::ports::{CountCache, OrderStore, SettingsStore};

/// Errors raised while connecting adapters
#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ValidationError),

    #[error("Database connection failed: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Cache connection failed: {0}")]
    Cache(DomainError),

    #[error("Cache connection timed out")]
    CacheTimeout,
}

/// Adapters for every port, ready to build limiters from.
#[derive(Clone)]
pub struct Services {
    pub order_store: Arc<dyn OrderStore>,
    pub settings_store: Arc<dyn SettingsStore>,
    pub cache: Arc<dyn CountCache>,
    pub locale: Locale,
}

impl Services {
    /// Connects the adapters selected by `config`.
    pub async fn from_config(config: &AppConfig) -> Result<Self, BootstrapError> {
        config.validate()?;
        let locale = config.locale.to_locale()?;

        let order_store: Arc<dyn OrderStore> = match &config.database {
            Some(database) => {
                let pool = database.pool_options().connect(&database.url).await?;
                Arc::new(PostgresOrderStore::new(pool))
            }
            None => Arc::new(InMemoryOrderStore::new()),
        };

        let settings_store: Arc<dyn SettingsStore> = match &config.settings.path {
            Some(path) => Arc::new(FileSettingsStore::new(path)),
            None => Arc::new(InMemorySettingsStore::new()),
        };

        let cache: Arc<dyn CountCache> = match config.cache.backend {
            CacheBackend::Redis => {
                let scope = config.cache.cache_scope()?;
                let connect = RedisCountCache::connect(config.cache.redis_url()?, scope);
                let cache = tokio::time::timeout(config.cache.connect_timeout(), connect)
                    .await
                    .map_err(|_| BootstrapError::CacheTimeout)?
                    .map_err(BootstrapError::Cache)?;
                Arc::new(cache)
            }
            CacheBackend::InMemory => Arc::new(InMemoryCountCache::new()),
        };

        tracing::info!(
            backend = ?config.cache.backend,
            database = config.database.is_some(),
            settings_file = config.settings.is_file_backed(),
            "Connected limiter services"
        );

        Ok(Self {
            order_store,
            settings_store,
            cache,
            locale,
        })
    }

    /// Builds a limiter for the current request with freshly loaded settings.
    ///
    /// The ordering gate is initialised, so the limiter is already blocked
    /// when an earlier request filled the current interval.
    pub async fn limiter(&self) -> Result<OrderLimiter, LimiterError> {
        let limiter = OrderLimiter::load(
            self.order_store.clone(),
            self.settings_store.as_ref(),
            self.cache.clone(),
            self.locale.clone(),
        )
        .await?;
        limiter.init().await?;
        Ok(limiter)
    }
}

impl std::fmt::Debug for Services {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Services")
            .field("locale", &self.locale)
            .finish_non_exhaustive()
    }
}
