//! Limiter configuration parsed from the stored settings blob.
//!
//! Parsing never fails: every missing or malformed key falls back to its
//! documented default.

use chrono::{DateTime, FixedOffset, Utc};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use super::interval::IntervalKind;

/// Option key under which the limiter's settings are stored.
pub const OPTION_KEY: &str = "limit_orders";

/// Sentinel returned by limit/remaining queries when ordering is unlimited.
pub const UNLIMITED: i64 = -1;

/// Fallback text for any message the store owner left blank.
pub const DEFAULT_MESSAGE: &str = "Ordering is currently disabled for this store.";

/// The customer-facing messages a store owner may customise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKind {
    /// Error shown when a checkout is rejected.
    CheckoutError,
    /// Notice displayed on shop, cart and checkout pages.
    CustomerNotice,
    /// Text that replaces the "Place order" button.
    OrderButton,
}

impl MessageKind {
    pub const ALL: [MessageKind; 3] = [
        MessageKind::CheckoutError,
        MessageKind::CustomerNotice,
        MessageKind::OrderButton,
    ];

    /// Returns the settings key for this message.
    pub fn key(&self) -> &'static str {
        match self {
            MessageKind::CheckoutError => "checkout_error",
            MessageKind::CustomerNotice => "customer_notice",
            MessageKind::OrderButton => "order_button",
        }
    }

    /// Resolves a settings key, accepting only message keys.
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.key() == key)
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// Parsed limiter settings.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LimiterSettings {
    /// Whether limiting is switched on.
    pub enabled: bool,
    /// Maximum orders per interval; `None` when unset, negative or non-numeric.
    pub limit: Option<i64>,
    /// Reset interval.
    pub interval: IntervalKind,
    /// Raw interval value when it was present but unrecognised.
    pub unknown_interval: Option<String>,
    /// Optional fixed instant intervals repeat from, instead of the calendar.
    pub interval_anchor: Option<DateTime<FixedOffset>>,
    pub checkout_error: Option<String>,
    pub customer_notice: Option<String>,
    pub order_button: Option<String>,
}

impl LimiterSettings {
    /// Parses the stored settings blob, defaulting every unset key.
    pub fn from_value(value: Option<&Value>) -> Self {
        let Some(Value::Object(map)) = value else {
            return Self::default();
        };

        let (interval, unknown_interval) = match map.get("interval") {
            None | Some(Value::Null) => (IntervalKind::default(), None),
            Some(Value::String(raw)) => match IntervalKind::from_str(raw) {
                Ok(kind) => (kind, None),
                Err(_) => (IntervalKind::default(), Some(raw.clone())),
            },
            Some(other) => (IntervalKind::default(), Some(other.to_string())),
        };

        Self {
            enabled: map.get("enabled").map(truthy).unwrap_or(false),
            limit: map.get("limit").and_then(non_negative_int),
            interval,
            unknown_interval,
            interval_anchor: map.get("interval_start").and_then(anchor),
            checkout_error: message(map.get("checkout_error")),
            customer_notice: message(map.get("customer_notice")),
            order_button: message(map.get("order_button")),
        }
    }

    /// Returns the stored template for a message, if any.
    pub fn message(&self, kind: MessageKind) -> Option<&str> {
        match kind {
            MessageKind::CheckoutError => self.checkout_error.as_deref(),
            MessageKind::CustomerNotice => self.customer_notice.as_deref(),
            MessageKind::OrderButton => self.order_button.as_deref(),
        }
    }

    /// Effective limit: the configured value when enabled, `UNLIMITED` otherwise.
    pub fn effective_limit(&self) -> i64 {
        match (self.enabled, self.limit) {
            (true, Some(limit)) => limit,
            _ => UNLIMITED,
        }
    }
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(false),
        Value::String(s) => matches!(
            s.trim().to_lowercase().as_str(),
            "yes" | "true" | "1" | "on"
        ),
        _ => false,
    }
}

fn non_negative_int(value: &Value) -> Option<i64> {
    let number = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };

    if number.is_finite() && number >= 0.0 {
        Some(number.trunc() as i64)
    } else {
        None
    }
}

/// RFC 3339 strings or Unix seconds.
fn anchor(value: &Value) -> Option<DateTime<FixedOffset>> {
    match value {
        Value::String(s) => DateTime::parse_from_rfc3339(s.trim()).ok(),
        Value::Number(n) => DateTime::<Utc>::from_timestamp(n.as_i64()?, 0).map(|dt| dt.fixed_offset()),
        _ => None,
    }
}

fn message(value: Option<&Value>) -> Option<String> {
    match value {
        Some(Value::String(s)) => Some(s.clone()),
        _ => None,
    }
}
