//! Timestamp value object for immutable points in time.

use chrono::{DateTime, Duration, FixedOffset, Utc};
use serde::{Deserialize, Serialize};

/// Immutable point in time, always UTC.
///
/// Interval math happens in the site's local offset; timestamps are what
/// cross port boundaries (order creation times, cache expiries).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Creates a timestamp for the current moment.
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Creates a timestamp from a DateTime<Utc>.
    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }

    /// Creates a timestamp from a local DateTime, keeping the same instant.
    pub fn from_local(dt: &DateTime<FixedOffset>) -> Self {
        Self(dt.with_timezone(&Utc))
    }

    /// Returns the inner DateTime.
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// Returns the same instant expressed in the given offset.
    pub fn in_offset(&self, offset: FixedOffset) -> DateTime<FixedOffset> {
        self.0.with_timezone(&offset)
    }

    /// Checks if this timestamp is before another.
    pub fn is_before(&self, other: &Timestamp) -> bool {
        self.0 < other.0
    }

    /// Returns the duration from another timestamp to this one.
    ///
    /// Returns negative duration if other is after self.
    pub fn duration_since(&self, other: &Timestamp) -> Duration {
        self.0.signed_duration_since(other.0)
    }

    /// Creates a timestamp from Unix seconds.
    ///
    /// Out-of-range values clamp to the Unix epoch.
    pub fn from_unix_secs(secs: i64) -> Self {
        Self(DateTime::<Utc>::from_timestamp(secs, 0).unwrap_or_default())
    }

    /// Returns the timestamp as Unix seconds.
    pub fn as_unix_secs(&self) -> i64 {
        self.0.timestamp()
    }

    /// Creates a new timestamp by adding the specified number of seconds.
    ///
    /// Saturates at the representable range instead of overflowing.
    pub fn plus_secs(&self, secs: i64) -> Self {
        let shifted = Duration::try_seconds(secs).and_then(|d| self.0.checked_add_signed(d));
        match shifted {
            Some(dt) => Self(dt),
            None if secs > 0 => Self(DateTime::<Utc>::MAX_UTC),
            None => Self(DateTime::<Utc>::MIN_UTC),
        }
    }
}

impl Default for Timestamp {
    fn default() -> Self {
        Self::now()
    }
}

impl From<DateTime<FixedOffset>> for Timestamp {
    fn from(dt: DateTime<FixedOffset>) -> Self {
        Self::from_local(&dt)
    }
}
