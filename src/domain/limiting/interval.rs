//! Interval windows over which orders are counted.
//!
//! All calculations happen in the site's local offset. Day-based intervals
//! always start at local midnight; hourly intervals at the top of the hour.

use chrono::{
    DateTime, Datelike, Duration, FixedOffset, Months, NaiveDate, NaiveDateTime, NaiveTime,
    Timelike, Weekday,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::ValidationError;

/// How often the order limit resets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntervalKind {
    /// Resets at the top of every hour.
    Hourly,
    /// Resets every day at midnight.
    #[default]
    Daily,
    /// Resets at midnight on the configured first day of the week.
    Weekly,
    /// Resets at midnight on the first of the month.
    Monthly,
}

impl IntervalKind {
    /// All interval kinds, in the order a settings form lists them.
    pub const ALL: [IntervalKind; 4] = [
        IntervalKind::Hourly,
        IntervalKind::Daily,
        IntervalKind::Weekly,
        IntervalKind::Monthly,
    ];

    /// Returns the stored setting value for this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            IntervalKind::Hourly => "hourly",
            IntervalKind::Daily => "daily",
            IntervalKind::Weekly => "weekly",
            IntervalKind::Monthly => "monthly",
        }
    }

    /// Human readable description of when this interval resets.
    pub fn describe(&self, week_starts_on: Weekday) -> String {
        match self {
            IntervalKind::Hourly => "Hourly (resets at the top of every hour)".to_string(),
            IntervalKind::Daily => "Daily (resets every day)".to_string(),
            IntervalKind::Weekly => {
                format!("Weekly (resets every {})", weekday_name(week_starts_on))
            }
            IntervalKind::Monthly => "Monthly (resets on the first of the month)".to_string(),
        }
    }

    /// Start of the interval enclosing `now`.
    ///
    /// Idempotent: feeding the result back in returns the same instant.
    pub fn start_of(&self, now: &DateTime<FixedOffset>, week_starts_on: Weekday) -> DateTime<FixedOffset> {
        let offset = *now.offset();
        let date = now.date_naive();

        match self {
            IntervalKind::Hourly => local_datetime(
                date.and_time(NaiveTime::MIN) + Duration::hours(i64::from(now.hour())),
                offset,
            ),
            IntervalKind::Daily => local_midnight(date, offset),
            IntervalKind::Weekly => {
                let current = i64::from(now.weekday().num_days_from_sunday());
                let first = i64::from(week_starts_on.num_days_from_sunday());
                let diff = (current - first).rem_euclid(7);
                local_midnight(date - Duration::days(diff), offset)
            }
            IntervalKind::Monthly => {
                local_midnight(date - Duration::days(i64::from(date.day0())), offset)
            }
        }
    }

    /// Adds one unit of this interval to an interval start.
    ///
    /// Months use calendar arithmetic, not fixed 30-day blocks.
    pub fn advance(&self, start: &DateTime<FixedOffset>) -> DateTime<FixedOffset> {
        match self {
            IntervalKind::Hourly => *start + Duration::hours(1),
            IntervalKind::Daily => *start + Duration::days(1),
            IntervalKind::Weekly => *start + Duration::weeks(1),
            // Only fails at the end of chrono's representable range.
            IntervalKind::Monthly => start
                .checked_add_months(Months::new(1))
                .unwrap_or(*start + Duration::days(31)),
        }
    }

    /// Start of the interval following the one enclosing `now`.
    pub fn next_start_of(&self, now: &DateTime<FixedOffset>, week_starts_on: Weekday) -> DateTime<FixedOffset> {
        self.advance(&self.start_of(now, week_starts_on))
    }

    /// Start of the interval enclosing `now` when intervals repeat from a
    /// fixed anchor instead of the calendar.
    ///
    /// Returns `None` while `now` is before the anchor.
    pub fn anchored_start(
        &self,
        anchor: &DateTime<FixedOffset>,
        now: &DateTime<FixedOffset>,
    ) -> Option<DateTime<FixedOffset>> {
        if now < anchor {
            return None;
        }
        let anchor = anchor.with_timezone(now.offset());

        match self {
            IntervalKind::Monthly => {
                let mut steps = u32::try_from(months_between(&anchor, now)).ok()?;
                loop {
                    let start = anchor.checked_add_months(Months::new(steps))?;
                    if start <= *now || steps == 0 {
                        return Some(start);
                    }
                    steps -= 1;
                }
            }
            _ => {
                let unit = self.advance(&anchor).signed_duration_since(anchor).num_seconds();
                let steps = now.signed_duration_since(anchor).num_seconds() / unit;
                Some(anchor + Duration::seconds(steps * unit))
            }
        }
    }

    /// Start of the anchored interval following `start`.
    ///
    /// Months are counted from the anchor so a start clamped to a short
    /// month does not drift.
    pub fn anchored_next(
        &self,
        anchor: &DateTime<FixedOffset>,
        start: &DateTime<FixedOffset>,
    ) -> DateTime<FixedOffset> {
        match self {
            IntervalKind::Monthly => {
                let anchor = anchor.with_timezone(start.offset());
                u32::try_from(months_between(&anchor, start) + 1)
                    .ok()
                    .and_then(|steps| anchor.checked_add_months(Months::new(steps)))
                    .unwrap_or_else(|| self.advance(start))
            }
            _ => self.advance(start),
        }
    }
}

fn months_between(from: &DateTime<FixedOffset>, to: &DateTime<FixedOffset>) -> i32 {
    (to.year() - from.year()) * 12 + to.month() as i32 - from.month() as i32
}

impl fmt::Display for IntervalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for IntervalKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "hourly" => Ok(IntervalKind::Hourly),
            "daily" => Ok(IntervalKind::Daily),
            "weekly" => Ok(IntervalKind::Weekly),
            "monthly" => Ok(IntervalKind::Monthly),
            other => Err(ValidationError::invalid_format(
                "interval",
                format!("unknown interval '{}'", other),
            )),
        }
    }
}

/// A concrete interval: its start and the start of the next one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntervalWindow {
    pub kind: IntervalKind,
    pub start: DateTime<FixedOffset>,
    pub next_start: DateTime<FixedOffset>,
}

impl IntervalWindow {
    /// Builds the window enclosing `now`.
    pub fn around(kind: IntervalKind, now: &DateTime<FixedOffset>, week_starts_on: Weekday) -> Self {
        let start = kind.start_of(now, week_starts_on);
        Self {
            kind,
            start,
            next_start: kind.advance(&start),
        }
    }

    /// Checks `start <= instant < next_start`.
    pub fn contains(&self, instant: &DateTime<FixedOffset>) -> bool {
        self.start <= *instant && *instant < self.next_start
    }

    /// Length of the window.
    pub fn length(&self) -> Duration {
        self.next_start.signed_duration_since(self.start)
    }

    /// True for windows shorter than 24 hours.
    pub fn is_sub_daily(&self) -> bool {
        self.length() < Duration::days(1)
    }

    /// Seconds from `now` until the next interval starts, never negative.
    pub fn seconds_until_next(&self, now: &DateTime<FixedOffset>) -> i64 {
        self.next_start.signed_duration_since(*now).num_seconds().max(0)
    }
}

/// Converts a 0 (Sunday) to 6 (Saturday) day number into a weekday.
pub fn weekday_from_number(day: u8) -> Result<Weekday, ValidationError> {
    match day {
        0 => Ok(Weekday::Sun),
        1 => Ok(Weekday::Mon),
        2 => Ok(Weekday::Tue),
        3 => Ok(Weekday::Wed),
        4 => Ok(Weekday::Thu),
        5 => Ok(Weekday::Fri),
        6 => Ok(Weekday::Sat),
        other => Err(ValidationError::out_of_range("week_starts_on", 0, 6, i64::from(other))),
    }
}

fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

fn local_midnight(date: NaiveDate, offset: FixedOffset) -> DateTime<FixedOffset> {
    local_datetime(date.and_time(NaiveTime::MIN), offset)
}

fn local_datetime(local: NaiveDateTime, offset: FixedOffset) -> DateTime<FixedOffset> {
    let utc = local - Duration::seconds(i64::from(offset.local_minus_utc()));
    DateTime::from_naive_utc_and_offset(utc, offset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn at(s: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(s).unwrap()
    }

    #[test]
    fn hourly_starts_at_the_top_of_the_hour() {
        let now = at("2020-04-27T12:05:00+00:00");
        assert_eq!(IntervalKind::Hourly.start_of(&now, Weekday::Mon), at("2020-04-27T12:00:00+00:00"));
        assert_eq!(IntervalKind::Hourly.next_start_of(&now, Weekday::Mon), at("2020-04-27T13:00:00+00:00"));
    }

    #[test]
    fn hourly_uses_24_hour_time() {
        let now = at("2020-04-27T16:45:00+00:00");
        assert_eq!(IntervalKind::Hourly.start_of(&now, Weekday::Mon), at("2020-04-27T16:00:00+00:00"));
    }

    #[test]
    fn daily_starts_at_local_midnight() {
        let now = at("2020-03-03T12:01:00-05:00");
        let start = IntervalKind::Daily.start_of(&now, Weekday::Mon);

        assert_eq!(start, at("2020-03-03T00:00:00-05:00"));
        assert_eq!(start.offset(), now.offset());
        assert_eq!(IntervalKind::Daily.advance(&start), at("2020-03-04T00:00:00-05:00"));
    }

    #[test]
    fn weekly_starts_on_the_configured_day() {
        // Tuesday, March 3 and Monday, March 2.
        let now = at("2020-03-03T12:01:00+00:00");
        assert_eq!(IntervalKind::Weekly.start_of(&now, Weekday::Mon), at("2020-03-02T00:00:00+00:00"));
        assert_eq!(IntervalKind::Weekly.next_start_of(&now, Weekday::Mon), at("2020-03-09T00:00:00+00:00"));
    }

    #[test]
    fn weekly_handles_a_non_standard_first_day() {
        // Tuesday, March 10 and Saturday, March 7.
        let now = at("2020-03-10T12:01:00+00:00");
        assert_eq!(IntervalKind::Weekly.start_of(&now, Weekday::Sat), at("2020-03-07T00:00:00+00:00"));
    }

    #[test]
    fn weekly_on_the_first_day_starts_this_morning() {
        let now = at("2020-03-02T12:01:00+00:00");
        assert_eq!(IntervalKind::Weekly.start_of(&now, Weekday::Mon), at("2020-03-02T00:00:00+00:00"));
    }

    #[test]
    fn monthly_starts_on_the_first() {
        let now = at("2020-03-03T12:01:00+00:00");
        assert_eq!(IntervalKind::Monthly.start_of(&now, Weekday::Mon), at("2020-03-01T00:00:00+00:00"));
        assert_eq!(IntervalKind::Monthly.next_start_of(&now, Weekday::Mon), at("2020-04-01T00:00:00+00:00"));
    }

    #[test]
    fn monthly_advance_is_calendar_correct() {
        let jan = at("2021-01-01T00:00:00+00:00");
        let feb = IntervalKind::Monthly.advance(&jan);
        let mar = IntervalKind::Monthly.advance(&feb);

        assert_eq!(feb, at("2021-02-01T00:00:00+00:00"));
        assert_eq!(mar, at("2021-03-01T00:00:00+00:00"));
        assert_eq!(IntervalKind::Monthly.advance(&at("2020-12-01T00:00:00+00:00")), at("2021-01-01T00:00:00+00:00"));
    }

    #[test]
    fn window_reports_seconds_until_next_interval() {
        let now = at("2020-04-27T12:05:00+00:00");
        let window = IntervalWindow::around(IntervalKind::Hourly, &now, Weekday::Mon);

        assert_eq!(window.seconds_until_next(&now), 3300);
        assert!(window.is_sub_daily());
        assert!(!IntervalWindow::around(IntervalKind::Daily, &now, Weekday::Mon).is_sub_daily());
    }

    #[test]
    fn interval_kind_parses_case_insensitively() {
        assert_eq!("Weekly".parse::<IntervalKind>().unwrap(), IntervalKind::Weekly);
        assert!("fortnightly".parse::<IntervalKind>().is_err());
        assert_eq!(IntervalKind::default(), IntervalKind::Daily);
    }

    #[test]
    fn weekday_numbers_follow_sunday_first_convention() {
        assert_eq!(weekday_from_number(0).unwrap(), Weekday::Sun);
        assert_eq!(weekday_from_number(6).unwrap(), Weekday::Sat);
        assert!(weekday_from_number(7).is_err());
    }

    #[test]
    fn describe_names_the_first_day_of_the_week() {
        assert_eq!(
            IntervalKind::Weekly.describe(Weekday::Sat),
            "Weekly (resets every Saturday)"
        );
    }

    #[test]
    fn anchored_daily_intervals_start_at_the_anchor_time() {
        let anchor = at("2024-03-01T09:00:00+00:00");
        let now = at("2024-03-15T08:30:00+00:00");

        let start = IntervalKind::Daily.anchored_start(&anchor, &now).unwrap();
        assert_eq!(start, at("2024-03-14T09:00:00+00:00"));
        assert_eq!(IntervalKind::Daily.anchored_next(&anchor, &start), at("2024-03-15T09:00:00+00:00"));
    }

    #[test]
    fn anchored_weekly_intervals_ignore_the_first_weekday() {
        // Wednesday anchor
        let anchor = at("2024-03-06T00:00:00+00:00");
        let now = at("2024-03-19T12:00:00+00:00");

        assert_eq!(
            IntervalKind::Weekly.anchored_start(&anchor, &now),
            Some(at("2024-03-13T00:00:00+00:00"))
        );
    }

    #[test]
    fn anchored_months_do_not_drift_after_a_short_month() {
        let anchor = at("2024-01-31T00:00:00+00:00");

        let feb = IntervalKind::Monthly
            .anchored_start(&anchor, &at("2024-03-10T00:00:00+00:00"))
            .unwrap();
        assert_eq!(feb, at("2024-02-29T00:00:00+00:00"));
        assert_eq!(IntervalKind::Monthly.anchored_next(&anchor, &feb), at("2024-03-31T00:00:00+00:00"));
    }

    #[test]
    fn no_anchored_interval_before_the_anchor() {
        let anchor = at("2024-03-20T00:00:00+00:00");
        let now = at("2024-03-15T00:00:00+00:00");

        assert_eq!(IntervalKind::Hourly.anchored_start(&anchor, &now), None);
    }

    fn any_kind() -> impl Strategy<Value = IntervalKind> {
        prop::sample::select(IntervalKind::ALL.to_vec())
    }

    fn any_now() -> impl Strategy<Value = DateTime<FixedOffset>> {
        // 2000-01-01 .. 2100-01-01, offsets within +/- 14h on 15 minute steps.
        (946_684_800_i64..4_102_444_800_i64, -56_i32..=56).prop_map(|(secs, quarters)| {
            let offset = FixedOffset::east_opt(quarters * 900).unwrap();
            DateTime::from_timestamp(secs, 0).unwrap().with_timezone(&offset)
        })
    }

    proptest! {
        #[test]
        fn window_always_encloses_now(kind in any_kind(), now in any_now(), first in 0_u8..7) {
            let week_start = weekday_from_number(first).unwrap();
            let window = IntervalWindow::around(kind, &now, week_start);

            prop_assert!(window.contains(&now));
            prop_assert!(window.seconds_until_next(&now) > 0);
        }

        #[test]
        fn start_of_is_idempotent(kind in any_kind(), now in any_now(), first in 0_u8..7) {
            let week_start = weekday_from_number(first).unwrap();
            let start = kind.start_of(&now, week_start);

            prop_assert_eq!(kind.start_of(&start, week_start), start);
        }

        #[test]
        fn weekly_starts_fall_on_the_first_day_at_midnight(now in any_now(), first in 0_u8..7) {
            let week_start = weekday_from_number(first).unwrap();
            let start = IntervalKind::Weekly.start_of(&now, week_start);

            prop_assert_eq!(start.weekday(), week_start);
            prop_assert_eq!(start.time(), NaiveTime::MIN);
        }

        #[test]
        fn anchored_window_encloses_now(kind in any_kind(), anchor in any_now(), ahead in 0_i64..400_000_000) {
            let now = anchor + chrono::Duration::seconds(ahead);
            let start = kind.anchored_start(&anchor, &now).unwrap();

            prop_assert!(start <= now);
            prop_assert!(now < kind.anchored_next(&anchor, &start));
        }

        #[test]
        fn monthly_starts_fall_on_day_one_at_midnight(now in any_now()) {
            let start = IntervalKind::Monthly.start_of(&now, Weekday::Mon);

            prop_assert_eq!(start.day(), 1);
            prop_assert_eq!(start.time(), NaiveTime::MIN);
        }
    }
}
