//! Extension points for the order limiter.
//!
//! Each hook is an optional strategy injected at construction. A hook that
//! returns `None` (for the overrides) leaves the default behaviour in place.

use chrono::{DateTime, FixedOffset};
use std::fmt;
use std::sync::Arc;

use crate::domain::limiting::{IntervalKind, MessageKind, Placeholders};

use super::limiter::OrderLimiter;

/// Short-circuits `get_remaining_orders`.
pub type RemainingOrdersOverride = Arc<dyn Fn(&OrderLimiter) -> Option<i64> + Send + Sync>;

/// Short-circuits `count_qualifying_orders`.
pub type CountOverride = Arc<dyn Fn(&OrderLimiter) -> Option<i64> + Send + Sync>;

/// Adjusts the computed interval start.
pub type IntervalStartAdjust =
    Arc<dyn Fn(DateTime<FixedOffset>, IntervalKind) -> DateTime<FixedOffset> + Send + Sync>;

/// Adjusts the next interval start. Receives `(next, current, kind)`.
pub type NextIntervalAdjust = Arc<
    dyn Fn(DateTime<FixedOffset>, DateTime<FixedOffset>, IntervalKind) -> DateTime<FixedOffset>
        + Send
        + Sync,
>;

/// Adds or alters message placeholders. Receives the message kind being
/// built (if any) and the raw template.
pub type PlaceholderFilter =
    Arc<dyn Fn(Placeholders, Option<MessageKind>, &str) -> Placeholders + Send + Sync>;

/// Optional strategies that customise the limiter.
#[derive(Clone, Default)]
pub struct LimiterHooks {
    remaining_orders: Option<RemainingOrdersOverride>,
    count_orders: Option<CountOverride>,
    interval_start: Option<IntervalStartAdjust>,
    next_interval: Option<NextIntervalAdjust>,
    placeholders: Option<PlaceholderFilter>,
}

impl LimiterHooks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_remaining_orders<F>(mut self, f: F) -> Self
    where
        F: Fn(&OrderLimiter) -> Option<i64> + Send + Sync + 'static,
    {
        self.remaining_orders = Some(Arc::new(f));
        self
    }

    pub fn with_count_orders<F>(mut self, f: F) -> Self
    where
        F: Fn(&OrderLimiter) -> Option<i64> + Send + Sync + 'static,
    {
        self.count_orders = Some(Arc::new(f));
        self
    }

    pub fn with_interval_start<F>(mut self, f: F) -> Self
    where
        F: Fn(DateTime<FixedOffset>, IntervalKind) -> DateTime<FixedOffset> + Send + Sync + 'static,
    {
        self.interval_start = Some(Arc::new(f));
        self
    }

    pub fn with_next_interval<F>(mut self, f: F) -> Self
    where
        F: Fn(DateTime<FixedOffset>, DateTime<FixedOffset>, IntervalKind) -> DateTime<FixedOffset>
            + Send
            + Sync
            + 'static,
    {
        self.next_interval = Some(Arc::new(f));
        self
    }

    pub fn with_placeholders<F>(mut self, f: F) -> Self
    where
        F: Fn(Placeholders, Option<MessageKind>, &str) -> Placeholders + Send + Sync + 'static,
    {
        self.placeholders = Some(Arc::new(f));
        self
    }

    pub(crate) fn remaining_orders(&self, limiter: &OrderLimiter) -> Option<i64> {
        self.remaining_orders.as_ref().and_then(|f| f(limiter))
    }

    pub(crate) fn count_orders(&self, limiter: &OrderLimiter) -> Option<i64> {
        self.count_orders.as_ref().and_then(|f| f(limiter))
    }

    pub(crate) fn interval_start(
        &self,
        start: DateTime<FixedOffset>,
        kind: IntervalKind,
    ) -> DateTime<FixedOffset> {
        match &self.interval_start {
            Some(f) => f(start, kind),
            None => start,
        }
    }

    pub(crate) fn next_interval(
        &self,
        next: DateTime<FixedOffset>,
        current: DateTime<FixedOffset>,
        kind: IntervalKind,
    ) -> DateTime<FixedOffset> {
        match &self.next_interval {
            Some(f) => f(next, current, kind),
            None => next,
        }
    }

    pub(crate) fn placeholders(
        &self,
        placeholders: Placeholders,
        kind: Option<MessageKind>,
        message: &str,
    ) -> Placeholders {
        match &self.placeholders {
            Some(f) => f(placeholders, kind, message),
            None => placeholders,
        }
    }
}

impl fmt::Debug for LimiterHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LimiterHooks")
            .field("remaining_orders", &self.remaining_orders.is_some())
            .field("count_orders", &self.count_orders.is_some())
            .field("interval_start", &self.interval_start.is_some())
            .field("next_interval", &self.next_interval.is_some())
            .field("placeholders", &self.placeholders.is_some())
            .finish()
    }
}
