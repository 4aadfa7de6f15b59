//! Order store adapters.
//!
//! ## Available Adapters
//!
//! - `InMemoryOrderStore` - In-memory for testing
//! - `PostgresOrderStore` - PostgreSQL-backed

mod in_memory;
mod postgres;

pub use in_memory::{InMemoryOrderStore, StoredOrder};
pub use postgres::PostgresOrderStore;
