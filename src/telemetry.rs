//! Tracing subscriber setup.
//!
//! ```no_run
//! use limit_orders::config::TelemetryConfig;
//! use limit_orders::telemetry::init_tracing;
//!
//! init_tracing(&TelemetryConfig::default()).expect("Failed to initialise tracing");
//! ```

use thiserror::Error;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, Registry};

use crate::config::{TelemetryConfig, ValidationError};

/// Errors raised while installing the subscriber
#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("Invalid telemetry configuration: {0}")]
    InvalidConfig(#[from] ValidationError),

    #[error("A global subscriber is already installed: {0}")]
    AlreadyInitialized(String),
}

/// Installs the global tracing subscriber.
///
/// Fails with `AlreadyInitialized` when a subscriber is already set, which
/// callers that may initialise twice (tests) can ignore.
pub fn init_tracing(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    let filter = config.env_filter()?;

    let json = config.json.then(|| fmt::layer().json().with_target(true));
    let plain = (!config.json).then(|| fmt::layer().with_target(true));

    Registry::default()
        .with(filter)
        .with(json)
        .with(plain)
        .try_init()
        .map_err(|e| TelemetryError::AlreadyInitialized(e.to_string()))
}
