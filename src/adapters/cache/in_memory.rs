//! In-memory count cache for testing and single-process deployments.
//!
//! Entries carry an absolute expiry and are treated as absent once it
//! passes, matching the behaviour of a transient store.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, Timestamp};
use crate::ports::CountCache;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CacheEntry {
    value: i64,
    expires_at: Timestamp,
}

/// In-memory implementation of the CountCache port.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCountCache {
    entries: Arc<RwLock<HashMap<String, CacheEntry>>>,
}

impl InMemoryCountCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a value with an explicit expiry (useful for tests).
    pub async fn insert_expiring_at(&self, name: &str, value: i64, expires_at: Timestamp) {
        self.entries
            .write()
            .await
            .insert(name.to_string(), CacheEntry { value, expires_at });
    }

    /// Expiry of an entry, whether or not it has passed.
    pub async fn expires_at(&self, name: &str) -> Option<Timestamp> {
        self.entries.read().await.get(name).map(|e| e.expires_at)
    }

    /// Number of stored entries, including expired ones.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    /// Clear all entries (useful for tests).
    pub async fn clear(&self) {
        self.entries.write().await.clear();
    }
}

#[async_trait]
impl CountCache for InMemoryCountCache {
    async fn get(&self, name: &str) -> Result<Option<i64>, DomainError> {
        let now = Timestamp::now();
        let entries = self.entries.read().await;

        Ok(entries
            .get(name)
            .filter(|entry| now.is_before(&entry.expires_at))
            .map(|entry| entry.value))
    }

    async fn set(&self, name: &str, value: i64, ttl_secs: u64) -> Result<(), DomainError> {
        let ttl = i64::try_from(ttl_secs).unwrap_or(i64::MAX);
        let expires_at = Timestamp::now().plus_secs(ttl);

        self.entries
            .write()
            .await
            .insert(name.to_string(), CacheEntry { value, expires_at });
        Ok(())
    }

    async fn delete(&self, name: &str) -> Result<(), DomainError> {
        self.entries.write().await.remove(name);
        Ok(())
    }
}
