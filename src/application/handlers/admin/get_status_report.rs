//! GetStatusReportHandler - Query handler for the system status report.
//!
//! The submitted-orders figure is always a fresh recount, which also
//! refreshes the cached count.

use serde::Serialize;
use std::sync::Arc;

use crate::application::OrderLimiter;
use crate::domain::limiting::{IntervalKind, LimiterError};

/// Limiter section of the system status report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusReport {
    pub enabled: bool,
    pub limit: i64,
    pub submitted_orders: i64,
    pub remaining_orders: i64,
    pub interval: IntervalKind,
    /// e.g. "Weekly (resets every Monday)".
    pub interval_description: String,
    /// RFC 3339.
    pub interval_start: String,
    /// RFC 3339.
    pub interval_resets: String,
}

impl StatusReport {
    /// Label/value pairs in display order.
    pub fn rows(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Enabled", if self.enabled { "yes" } else { "no" }.to_string()),
            ("Limit", self.limit.to_string()),
            ("Submitted orders", self.submitted_orders.to_string()),
            ("Remaining orders", self.remaining_orders.to_string()),
            ("Interval", self.interval_description.clone()),
            ("Interval start", self.interval_start.clone()),
            ("Interval resets", self.interval_resets.clone()),
        ]
    }
}

/// Handler for building the status report.
pub struct GetStatusReportHandler {
    limiter: Arc<OrderLimiter>,
}

impl GetStatusReportHandler {
    pub fn new(limiter: Arc<OrderLimiter>) -> Self {
        Self { limiter }
    }

    pub async fn handle(&self) -> Result<StatusReport, LimiterError> {
        let submitted_orders = self.limiter.regenerate_transient().await?;
        let remaining_orders = self.limiter.get_remaining_orders().await?;

        let interval = self.limiter.get_interval();

        Ok(StatusReport {
            enabled: self.limiter.is_enabled(),
            limit: self.limiter.get_limit(),
            submitted_orders,
            remaining_orders,
            interval,
            interval_description: interval.describe(self.limiter.locale().week_starts_on()),
            interval_start: self.limiter.get_interval_start().to_rfc3339(),
            interval_resets: self.limiter.get_next_interval_start().to_rfc3339(),
        })
    }
}
