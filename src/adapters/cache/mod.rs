//! Count cache adapters.
//!
//! ## Available Adapters
//!
//! - `InMemoryCountCache` - In-memory for testing and single-process hosts
//! - `RedisCountCache` - Redis-backed, shared across servers
//!
//! ## Usage
//!
//! ```ignore
//! use limit_orders::adapters::cache::{InMemoryCountCache, RedisCountCache};
//! use limit_orders::ports::CacheScope;
//!
//! // For testing
//! let cache = InMemoryCountCache::new();
//!
//! // For production
//! let cache = RedisCountCache::connect("redis://127.0.0.1/", CacheScope::Network).await?;
//! ```

mod in_memory;
mod redis;

pub use in_memory::InMemoryCountCache;
pub use redis::RedisCountCache;
