//! In-Memory Settings Store Adapter
//!
//! Useful for testing and development.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::DomainError;
use crate::ports::SettingsStore;

/// In-memory storage for settings blobs
#[derive(Debug, Clone, Default)]
pub struct InMemorySettingsStore {
    values: Arc<RwLock<HashMap<String, Value>>>,
}

impl InMemorySettingsStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding `value` under `key`
    pub fn with_value(key: impl Into<String>, value: Value) -> Self {
        let mut values = HashMap::new();
        values.insert(key.into(), value);
        Self {
            values: Arc::new(RwLock::new(values)),
        }
    }

    /// Clear all stored values (useful for tests)
    pub async fn clear(&self) {
        self.values.write().await.clear();
    }
}

#[async_trait]
impl SettingsStore for InMemorySettingsStore {
    async fn load(&self, key: &str) -> Result<Option<Value>, DomainError> {
        Ok(self.values.read().await.get(key).cloned())
    }

    async fn save(&self, key: &str, value: Value) -> Result<Option<Value>, DomainError> {
        Ok(self.values.write().await.insert(key.to_string(), value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn load_missing_key_returns_none() {
        let store = InMemorySettingsStore::new();
        assert_eq!(store.load("limit_orders").await.unwrap(), None);
    }

    #[tokio::test]
    async fn save_returns_previous_value() {
        let store = InMemorySettingsStore::with_value("limit_orders", json!({"limit": 5}));

        let previous = store
            .save("limit_orders", json!({"limit": 10}))
            .await
            .unwrap();

        assert_eq!(previous, Some(json!({"limit": 5})));
        assert_eq!(
            store.load("limit_orders").await.unwrap(),
            Some(json!({"limit": 10}))
        );
    }

    #[tokio::test]
    async fn clear_removes_values() {
        let store = InMemorySettingsStore::with_value("limit_orders", json!({}));
        store.clear().await;
        assert_eq!(store.load("limit_orders").await.unwrap(), None);
    }
}
