//! Domain layer containing the order-limiting rules.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (timestamps, IDs, errors, state machines)
//! - `limiting` - Intervals, settings, messages and the ordering gate

pub mod foundation;
pub mod limiting;
