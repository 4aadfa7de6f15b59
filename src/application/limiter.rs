//! OrderLimiter - interval-based order counting and the ordering gate.
//!
//! The limiter answers two questions for the current request: how many
//! orders may still be accepted in the current interval, and whether the
//! store is accepting orders at all. Settings are read once when the
//! limiter is built; build a new limiter to pick up changes.
//!
//! The order count is cached under [`COUNT_CACHE_NAME`] until the next
//! interval begins. Writes are always full recounts from the order store,
//! so concurrent writers converge on the same value.

use chrono::{DateTime, FixedOffset};
use serde_json::Value;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use crate::domain::foundation::{StateMachine, Timestamp};
use crate::domain::limiting::{
    IntervalKind, IntervalWindow, LimiterError, LimiterSettings, Locale, MessageKind,
    OrderOrigin, OrderingState, PageContext, Placeholders, DEFAULT_MESSAGE, OPTION_KEY, UNLIMITED,
};
use crate::ports::{CountCache, OrderQuery, OrderStore, QueryLimit, SettingsStore};

use super::hooks::LimiterHooks;

/// Cache entry holding the number of orders in the current interval.
pub const COUNT_CACHE_NAME: &str = "limit_orders_order_count";

/// Counts orders per interval and gates checkout once the limit is reached.
pub struct OrderLimiter {
    order_store: Arc<dyn OrderStore>,
    cache: Arc<dyn CountCache>,
    settings: LimiterSettings,
    locale: Locale,
    now: DateTime<FixedOffset>,
    hooks: LimiterHooks,
    state: RwLock<OrderingState>,
    deferred_recount: AtomicBool,
}

impl OrderLimiter {
    /// Builds a limiter from already-parsed settings, anchored at the
    /// current time in the locale's offset.
    pub fn new(
        order_store: Arc<dyn OrderStore>,
        cache: Arc<dyn CountCache>,
        settings: LimiterSettings,
        locale: Locale,
    ) -> Self {
        if let Some(raw) = &settings.unknown_interval {
            tracing::warn!(interval = %raw, fallback = %settings.interval, "Unknown interval, using fallback");
        }

        let now = locale.now();
        Self {
            order_store,
            cache,
            settings,
            locale,
            now,
            hooks: LimiterHooks::default(),
            state: RwLock::new(OrderingState::Accepting),
            deferred_recount: AtomicBool::new(false),
        }
    }

    /// Loads the settings blob from the settings store and builds a limiter.
    pub async fn load(
        order_store: Arc<dyn OrderStore>,
        settings_store: &dyn SettingsStore,
        cache: Arc<dyn CountCache>,
        locale: Locale,
    ) -> Result<Self, LimiterError> {
        let raw = settings_store
            .load(OPTION_KEY)
            .await
            .map_err(LimiterError::Settings)?;
        let settings = LimiterSettings::from_value(raw.as_ref());

        Ok(Self::new(order_store, cache, settings, locale))
    }

    /// Anchors every calculation at `now` instead of the current time.
    pub fn at(mut self, now: DateTime<FixedOffset>) -> Self {
        self.now = now.with_timezone(&self.locale.offset());
        self
    }

    pub fn with_hooks(mut self, hooks: LimiterHooks) -> Self {
        self.hooks = hooks;
        self
    }

    pub fn settings(&self) -> &LimiterSettings {
        &self.settings
    }

    pub fn locale(&self) -> &Locale {
        &self.locale
    }

    /// The instant all interval calculations are based on.
    pub fn now(&self) -> DateTime<FixedOffset> {
        self.now
    }

    // ─────────────────────────────────────────────────────────────────────
    // Configuration
    // ─────────────────────────────────────────────────────────────────────

    pub fn is_enabled(&self) -> bool {
        self.settings.enabled
    }

    pub fn get_interval(&self) -> IntervalKind {
        self.settings.interval
    }

    /// Maximum orders per interval, or `-1` when limiting is off or unset.
    pub fn get_limit(&self) -> i64 {
        self.settings.effective_limit()
    }

    // ─────────────────────────────────────────────────────────────────────
    // Intervals
    // ─────────────────────────────────────────────────────────────────────

    /// Start of the current interval. Calendar-aligned unless an
    /// `interval_start` anchor is configured and already reached.
    pub fn get_interval_start(&self) -> DateTime<FixedOffset> {
        let kind = self.get_interval();
        let start = self
            .anchored_start()
            .unwrap_or_else(|| kind.start_of(&self.now, self.locale.week_starts_on()));
        self.hooks.interval_start(start, kind)
    }

    pub fn get_next_interval_start(&self) -> DateTime<FixedOffset> {
        let kind = self.get_interval();
        let current = self.get_interval_start();
        let next = match (&self.settings.interval_anchor, self.anchored_start()) {
            (Some(anchor), Some(_)) => kind.anchored_next(anchor, &current),
            _ => kind.advance(&current),
        };
        self.hooks.next_interval(next, current, kind)
    }

    fn anchored_start(&self) -> Option<DateTime<FixedOffset>> {
        let anchor = self.settings.interval_anchor.as_ref()?;
        self.get_interval().anchored_start(anchor, &self.now)
    }

    /// The current window, with any interval hooks applied.
    pub fn current_window(&self) -> IntervalWindow {
        IntervalWindow {
            kind: self.get_interval(),
            start: self.get_interval_start(),
            next_start: self.get_next_interval_start(),
        }
    }

    pub fn get_seconds_until_next_interval(&self) -> i64 {
        self.current_window().seconds_until_next(&self.now)
    }

    // ─────────────────────────────────────────────────────────────────────
    // Counting
    // ─────────────────────────────────────────────────────────────────────

    /// Orders that may still be accepted this interval, `-1` when unlimited.
    pub async fn get_remaining_orders(&self) -> Result<i64, LimiterError> {
        if let Some(remaining) = self.hooks.remaining_orders(self) {
            return Ok(remaining);
        }

        let limit = self.get_limit();
        if !self.is_enabled() || limit == UNLIMITED {
            return Ok(UNLIMITED);
        }

        let cached = self
            .cache
            .get(COUNT_CACHE_NAME)
            .await
            .map_err(LimiterError::Cache)?;

        let count = match cached {
            Some(count) => count,
            None => self.regenerate_transient().await?,
        };

        Ok(limit.saturating_sub(count).max(0))
    }

    pub async fn has_reached_limit(&self) -> Result<bool, LimiterError> {
        Ok(self.get_remaining_orders().await? == 0)
    }

    /// True once at least one order has been counted this interval.
    pub async fn has_orders_in_current_interval(&self) -> Result<bool, LimiterError> {
        Ok(self.get_limit() > self.get_remaining_orders().await?)
    }

    /// Counts orders of every countable type created since the interval start.
    pub async fn count_qualifying_orders(&self) -> Result<i64, LimiterError> {
        if let Some(count) = self.hooks.count_orders(self) {
            return Ok(count);
        }

        let types = self
            .order_store
            .countable_order_types()
            .await
            .map_err(LimiterError::OrderStore)?;

        if types.is_empty() {
            return Err(LimiterError::EmptyOrderTypes);
        }

        let query = OrderQuery {
            created_at_or_after: Timestamp::from_local(&self.get_interval_start()),
            types,
            limit: QueryLimit::Unbounded,
        };

        let count = self
            .order_store
            .count_orders(&query)
            .await
            .map_err(LimiterError::OrderStore)?;

        Ok(i64::try_from(count).unwrap_or(i64::MAX))
    }

    /// Recounts qualifying orders and caches the result until the next
    /// interval begins.
    ///
    /// When the platform has not registered any order types yet, returns 0
    /// without caching and schedules a recount for `run_deferred_recount`.
    pub async fn regenerate_transient(&self) -> Result<i64, LimiterError> {
        let count = match self.count_qualifying_orders().await {
            Ok(count) => count,
            Err(LimiterError::EmptyOrderTypes) => {
                self.deferred_recount.store(true, Ordering::SeqCst);
                tracing::warn!("No countable order types registered yet, deferring recount");
                return Ok(0);
            }
            Err(e) => return Err(e),
        };

        let ttl = self.get_seconds_until_next_interval().max(1) as u64;
        self.cache
            .set(COUNT_CACHE_NAME, count, ttl)
            .await
            .map_err(LimiterError::Cache)?;

        tracing::debug!(count, ttl, "Regenerated order count");
        Ok(count)
    }

    /// True when a recount was deferred because no order types were registered.
    pub fn has_deferred_recount(&self) -> bool {
        self.deferred_recount.load(Ordering::SeqCst)
    }

    /// Runs a deferred recount, if one is pending.
    pub async fn run_deferred_recount(&self) -> Result<Option<i64>, LimiterError> {
        if !self.deferred_recount.swap(false, Ordering::SeqCst) {
            return Ok(None);
        }

        tracing::info!("Running deferred order recount");
        self.regenerate_transient().await.map(Some)
    }

    /// Clears the cached count and reopens ordering.
    pub async fn reset(&self) -> Result<(), LimiterError> {
        self.cache
            .delete(COUNT_CACHE_NAME)
            .await
            .map_err(LimiterError::Cache)?;

        self.transition(OrderingState::Accepting);
        tracing::info!("Order limiter reset");
        Ok(())
    }

    /// Resets the limiter when a settings save actually changed the value.
    pub async fn reset_on_update(
        &self,
        previous: Option<&Value>,
        new: &Value,
    ) -> Result<bool, LimiterError> {
        if previous == Some(new) {
            return Ok(false);
        }

        self.reset().await?;
        Ok(true)
    }

    // ─────────────────────────────────────────────────────────────────────
    // Ordering gate
    // ─────────────────────────────────────────────────────────────────────

    /// Blocks ordering if the limit has already been reached.
    pub async fn init(&self) -> Result<OrderingState, LimiterError> {
        if self.has_reached_limit().await? {
            self.disable_ordering();
        }
        Ok(self.state())
    }

    pub fn state(&self) -> OrderingState {
        *self.state.read().unwrap_or_else(|e| e.into_inner())
    }

    /// Stops accepting storefront orders.
    pub fn disable_ordering(&self) {
        self.transition(OrderingState::Blocked);
    }

    fn transition(&self, target: OrderingState) {
        let mut state = self.state.write().unwrap_or_else(|e| e.into_inner());
        let from = *state;
        if let Ok(next) = from.transition_to(target) {
            tracing::info!(%from, to = %next, "Ordering gate changed");
            *state = next;
        }
    }

    /// Whether products can currently be added to a cart.
    pub fn is_purchasable(&self) -> bool {
        !self.state().is_blocked()
    }

    /// Rejects storefront checkouts while ordering is blocked.
    ///
    /// Orders created from the back office always pass.
    pub fn abort_checkout(&self, origin: OrderOrigin) -> Result<(), LimiterError> {
        if origin == OrderOrigin::Admin || !self.state().is_blocked() {
            return Ok(());
        }

        Err(LimiterError::OrdersNotAccepted(
            self.message(MessageKind::CheckoutError),
        ))
    }

    /// Replacement markup for the "place order" button, `None` while accepting.
    pub fn order_button_html(&self) -> Option<String> {
        if !self.state().is_blocked() {
            return None;
        }
        Some(format!("<p>{}</p>", self.message(MessageKind::OrderButton)))
    }

    /// The customer notice to queue on `page`, if any.
    ///
    /// `existing` holds notices already queued for this request; the same
    /// notice is never queued twice.
    pub fn customer_notice(&self, page: PageContext, existing: &[String]) -> Option<String> {
        if !self.state().is_blocked() || !page.shows_customer_notices() {
            return None;
        }

        let notice = self.message(MessageKind::CustomerNotice);
        if existing.iter().any(|queued| *queued == notice) {
            return None;
        }
        Some(notice)
    }

    // ─────────────────────────────────────────────────────────────────────
    // Messages
    // ─────────────────────────────────────────────────────────────────────

    /// Returns the message stored under `key` with placeholders replaced.
    ///
    /// Only `checkout_error`, `customer_notice` and `order_button` are
    /// readable; any other key yields an empty string.
    pub fn get_message(&self, key: &str) -> String {
        match MessageKind::from_key(key) {
            Some(kind) => self.message(kind),
            None => String::new(),
        }
    }

    pub fn message(&self, kind: MessageKind) -> String {
        let template = self.settings.message(kind).unwrap_or(DEFAULT_MESSAGE);
        self.get_placeholders(Some(kind), template).apply(template)
    }

    pub fn get_placeholders(&self, kind: Option<MessageKind>, message: &str) -> Placeholders {
        let placeholders =
            Placeholders::for_window(&self.current_window(), self.get_limit(), &self.locale);
        self.hooks.placeholders(placeholders, kind, message)
    }
}

impl std::fmt::Debug for OrderLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrderLimiter")
            .field("settings", &self.settings)
            .field("now", &self.now)
            .field("state", &self.state())
            .field("hooks", &self.hooks)
            .finish_non_exhaustive()
    }
}
