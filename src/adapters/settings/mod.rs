//! Settings store adapters.
//!
//! ## Available Adapters
//!
//! - `InMemorySettingsStore` - In-memory for testing
//! - `FileSettingsStore` - YAML document on disk

mod file;
mod in_memory;

pub use file::FileSettingsStore;
pub use in_memory::InMemorySettingsStore;
