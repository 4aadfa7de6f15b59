//! Limit Orders - cap store orders per recurring interval
//!
//! This crate counts qualifying orders in the current hourly, daily, weekly
//! or monthly interval, caches the count until the interval rolls over and
//! closes checkout once the configured limit is reached.

pub mod adapters;
pub mod application;
pub mod bootstrap;
pub mod config;
pub mod domain;
pub mod ports;
pub mod telemetry;
