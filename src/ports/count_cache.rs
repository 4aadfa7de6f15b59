//! Count cache port - shared integer values with an expiry.
//!
//! Stands in for the host's transient storage. Values are shared across
//! requests, so writes must be whole values (never increments) to keep
//! concurrent writers harmless.

use async_trait::async_trait;
use std::fmt;

use crate::domain::foundation::DomainError;

/// Which sites share a cached value.
///
/// A deployment picks one scope and uses it for every cache entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CacheScope {
    /// Private to one site.
    Site { site_id: u64 },
    /// Shared by every site in the network.
    #[default]
    Network,
}

impl CacheScope {
    /// Returns the namespaced storage key for a cache entry.
    pub fn key_for(&self, name: &str) -> String {
        match self {
            CacheScope::Site { site_id } => format!("limit_orders:site:{}:{}", site_id, name),
            CacheScope::Network => format!("limit_orders:network:{}", name),
        }
    }
}

impl fmt::Display for CacheScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheScope::Site { site_id } => write!(f, "site:{}", site_id),
            CacheScope::Network => write!(f, "network"),
        }
    }
}

/// Port for the shared order-count cache.
#[async_trait]
pub trait CountCache: Send + Sync {
    /// Returns the cached value, `None` when absent or expired.
    async fn get(&self, name: &str) -> Result<Option<i64>, DomainError>;

    /// Stores a value that expires after `ttl_secs` seconds.
    async fn set(&self, name: &str, value: i64, ttl_secs: u64) -> Result<(), DomainError>;

    /// Removes a value. Deleting a missing value is not an error.
    async fn delete(&self, name: &str) -> Result<(), DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn site_scope_namespaces_by_site() {
        let scope = CacheScope::Site { site_id: 3 };
        assert_eq!(scope.key_for("limit_orders_order_count"), "limit_orders:site:3:limit_orders_order_count");
    }

    #[test]
    fn network_scope_is_shared() {
        assert_eq!(CacheScope::Network.key_for("count"), "limit_orders:network:count");
        assert_eq!(CacheScope::Network.to_string(), "network");
    }
}
