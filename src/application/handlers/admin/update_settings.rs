//! UpdateSettingsHandler - Command handler for saving limiter settings.
//!
//! Saving hands back the previous value; the cached count is cleared only
//! when the value actually changed.

use serde_json::Value;
use std::sync::Arc;

use crate::application::OrderLimiter;
use crate::domain::limiting::{LimiterError, LimiterSettings, OPTION_KEY};
use crate::ports::SettingsStore;

/// Command to replace the limiter settings blob.
#[derive(Debug, Clone)]
pub struct UpdateSettingsCommand {
    pub value: Value,
}

/// Result of saving settings.
#[derive(Debug, Clone)]
pub struct UpdateSettingsResult {
    pub previous: Option<Value>,
    /// The saved value, parsed.
    pub settings: LimiterSettings,
    /// Whether the cached count was cleared.
    pub reset: bool,
}

/// Handler for saving limiter settings.
pub struct UpdateSettingsHandler {
    settings: Arc<dyn SettingsStore>,
    limiter: Arc<OrderLimiter>,
}

impl UpdateSettingsHandler {
    pub fn new(settings: Arc<dyn SettingsStore>, limiter: Arc<OrderLimiter>) -> Self {
        Self { settings, limiter }
    }

    pub async fn handle(
        &self,
        cmd: UpdateSettingsCommand,
    ) -> Result<UpdateSettingsResult, LimiterError> {
        let previous = self
            .settings
            .save(OPTION_KEY, cmd.value.clone())
            .await
            .map_err(LimiterError::Settings)?;

        let reset = self
            .limiter
            .reset_on_update(previous.as_ref(), &cmd.value)
            .await?;

        Ok(UpdateSettingsResult {
            settings: LimiterSettings::from_value(Some(&cmd.value)),
            previous,
            reset,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{InMemoryCountCache, InMemoryOrderStore, InMemorySettingsStore};
    use crate::application::COUNT_CACHE_NAME;
    use crate::domain::foundation::{DomainError, ErrorCode};
    use crate::domain::limiting::Locale;
    use crate::ports::CountCache;
    use async_trait::async_trait;
    use serde_json::json;

    // ════════════════════════════════════════════════════════════════════════════
    // Mock Implementation
    // ════════════════════════════════════════════════════════════════════════════

    struct FailingSettingsStore;

    #[async_trait]
    impl SettingsStore for FailingSettingsStore {
        async fn load(&self, _key: &str) -> Result<Option<Value>, DomainError> {
            Ok(None)
        }

        async fn save(&self, _key: &str, _value: Value) -> Result<Option<Value>, DomainError> {
            Err(DomainError::new(ErrorCode::SettingsError, "Simulated save failure"))
        }
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Test Helpers
    // ════════════════════════════════════════════════════════════════════════════

    async fn setup(
        store: Arc<dyn SettingsStore>,
    ) -> (UpdateSettingsHandler, InMemoryCountCache) {
        let cache = InMemoryCountCache::new();
        cache.set(COUNT_CACHE_NAME, 3, 60).await.unwrap();

        let limiter = OrderLimiter::load(
            Arc::new(InMemoryOrderStore::new()),
            store.as_ref(),
            Arc::new(cache.clone()),
            Locale::utc(),
        )
        .await
        .unwrap();

        (UpdateSettingsHandler::new(store, Arc::new(limiter)), cache)
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Tests
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn changed_settings_reset_the_count() {
        let store = Arc::new(InMemorySettingsStore::with_value(OPTION_KEY, json!({ "limit": 5 })));
        let (handler, cache) = setup(store).await;

        let result = handler
            .handle(UpdateSettingsCommand { value: json!({ "limit": 2 }) })
            .await
            .unwrap();

        assert!(result.reset);
        assert_eq!(result.previous, Some(json!({ "limit": 5 })));
        assert_eq!(result.settings.limit, Some(2));
        assert_eq!(cache.get(COUNT_CACHE_NAME).await.unwrap(), None);
    }

    #[tokio::test]
    async fn identical_settings_keep_the_count() {
        let store = Arc::new(InMemorySettingsStore::with_value(OPTION_KEY, json!({ "limit": 5 })));
        let (handler, cache) = setup(store).await;

        let result = handler
            .handle(UpdateSettingsCommand { value: json!({ "limit": 5 }) })
            .await
            .unwrap();

        assert!(!result.reset);
        assert_eq!(cache.get(COUNT_CACHE_NAME).await.unwrap(), Some(3));
    }

    #[tokio::test]
    async fn save_failures_propagate() {
        let (handler, cache) = setup(Arc::new(FailingSettingsStore)).await;

        let err = handler
            .handle(UpdateSettingsCommand { value: json!({}) })
            .await
            .unwrap_err();

        assert!(matches!(err, LimiterError::Settings(_)));
        assert_eq!(cache.get(COUNT_CACHE_NAME).await.unwrap(), Some(3));
    }
}
