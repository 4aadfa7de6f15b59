//! Ordering handlers - order intake and platform lifecycle.

mod platform_ready;
mod record_order;

pub use platform_ready::{PlatformReadyHandler, PlatformReadyResult};
pub use record_order::{RecordOrderCommand, RecordOrderHandler, RecordOrderResult};
