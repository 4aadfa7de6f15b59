//! PlatformReadyHandler - runs work deferred until the platform finished booting.

use std::sync::Arc;

use crate::application::OrderLimiter;
use crate::domain::limiting::LimiterError;

/// Result of the platform-ready signal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformReadyResult {
    /// The fresh count, when a deferred recount ran.
    pub recounted: Option<i64>,
}

/// Handler invoked once the platform has registered its order types.
pub struct PlatformReadyHandler {
    limiter: Arc<OrderLimiter>,
}

impl PlatformReadyHandler {
    pub fn new(limiter: Arc<OrderLimiter>) -> Self {
        Self { limiter }
    }

    pub async fn handle(&self) -> Result<PlatformReadyResult, LimiterError> {
        let recounted = self.limiter.run_deferred_recount().await?;
        Ok(PlatformReadyResult { recounted })
    }
}
