//! ResetLimiterHandler - Command handler for clearing the cached order count.

use std::fmt;
use std::sync::Arc;

use crate::application::OrderLimiter;
use crate::domain::limiting::{LimiterError, OrderingState};

/// Why the limiter is being reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetReason {
    /// The "Reset limiter" debug tool was used.
    DebugTool,
    /// The platform purged its cached order data.
    OrderCachePurged,
}

impl fmt::Display for ResetReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResetReason::DebugTool => write!(f, "debug_tool"),
            ResetReason::OrderCachePurged => write!(f, "order_cache_purged"),
        }
    }
}

/// Command to reset the limiter.
#[derive(Debug, Clone)]
pub struct ResetLimiterCommand {
    pub reason: ResetReason,
}

/// Result of a reset.
#[derive(Debug, Clone)]
pub struct ResetLimiterResult {
    pub state: OrderingState,
}

/// Handler for resetting the limiter.
pub struct ResetLimiterHandler {
    limiter: Arc<OrderLimiter>,
}

impl ResetLimiterHandler {
    pub fn new(limiter: Arc<OrderLimiter>) -> Self {
        Self { limiter }
    }

    pub async fn handle(&self, cmd: ResetLimiterCommand) -> Result<ResetLimiterResult, LimiterError> {
        tracing::info!(reason = %cmd.reason, "Resetting order limiter");
        self.limiter.reset().await?;

        Ok(ResetLimiterResult {
            state: self.limiter.state(),
        })
    }
}
