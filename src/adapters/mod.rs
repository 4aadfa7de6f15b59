//! Adapters - Implementations of port interfaces.
//!
//! - `cache` - Count cache (in-memory, Redis)
//! - `orders` - Order store (in-memory, PostgreSQL)
//! - `settings` - Settings store (in-memory, YAML file)

pub mod cache;
pub mod orders;
pub mod settings;

pub use cache::{InMemoryCountCache, RedisCountCache};
pub use orders::{InMemoryOrderStore, PostgresOrderStore, StoredOrder};
pub use settings::{FileSettingsStore, InMemorySettingsStore};
