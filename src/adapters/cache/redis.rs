//! Redis-backed count cache for multi-server deployments.
//!
//! Uses SET with EX so the count expires exactly at the next interval
//! boundary. Keys are namespaced by the configured cache scope.

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;

use crate::domain::foundation::{DomainError, ErrorCode};
use crate::ports::{CacheScope, CountCache};

/// Redis implementation of the CountCache port.
#[derive(Clone)]
pub struct RedisCountCache {
    conn: MultiplexedConnection,
    scope: CacheScope,
}

impl RedisCountCache {
    /// Create a new Redis count cache.
    pub fn new(conn: MultiplexedConnection, scope: CacheScope) -> Self {
        Self { conn, scope }
    }

    /// Connects to Redis and builds the cache.
    pub async fn connect(url: &str, scope: CacheScope) -> Result<Self, DomainError> {
        let client = redis::Client::open(url).map_err(cache_error)?;
        let conn = client
            .get_multiplexed_tokio_connection()
            .await
            .map_err(cache_error)?;
        Ok(Self::new(conn, scope))
    }
}

fn cache_error(e: redis::RedisError) -> DomainError {
    DomainError::new(ErrorCode::CacheError, e.to_string())
}

#[async_trait]
impl CountCache for RedisCountCache {
    async fn get(&self, name: &str) -> Result<Option<i64>, DomainError> {
        let mut conn = self.conn.clone();
        conn.get(self.scope.key_for(name)).await.map_err(cache_error)
    }

    async fn set(&self, name: &str, value: i64, ttl_secs: u64) -> Result<(), DomainError> {
        let mut conn = self.conn.clone();
        // EX 0 is rejected by Redis.
        conn.set_ex::<_, _, ()>(self.scope.key_for(name), value, ttl_secs.max(1))
            .await
            .map_err(cache_error)
    }

    async fn delete(&self, name: &str) -> Result<(), DomainError> {
        let mut conn = self.conn.clone();
        conn.del::<_, ()>(self.scope.key_for(name))
            .await
            .map_err(cache_error)
    }
}

impl std::fmt::Debug for RedisCountCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisCountCache")
            .field("scope", &self.scope)
            .finish_non_exhaustive()
    }
}
