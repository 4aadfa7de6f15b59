//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the limiter and the host platform. Adapters implement these ports.
//!
//! - `OrderStore` - Countable order types, order counts, order creation
//! - `SettingsStore` - Configuration blobs with change detection on save
//! - `CountCache` - Shared, expiring order count

mod count_cache;
mod order_store;
mod settings_store;

pub use count_cache::{CacheScope, CountCache};
pub use order_store::{NewOrder, OrderQuery, OrderStore, QueryLimit};
pub use settings_store::SettingsStore;
