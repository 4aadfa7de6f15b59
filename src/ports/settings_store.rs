//! Settings store port - key/value configuration blobs.
//!
//! Mirrors the host's option storage: a value per key, where saving a value
//! hands back the previous one so callers can react to changes.

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::foundation::DomainError;

/// Port for reading and writing configuration blobs.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Loads the value stored under `key`, `None` when unset.
    async fn load(&self, key: &str) -> Result<Option<Value>, DomainError>;

    /// Stores `value` under `key` and returns the previous value.
    async fn save(&self, key: &str, value: Value) -> Result<Option<Value>, DomainError>;
}
