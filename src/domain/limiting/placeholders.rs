//! Placeholder tokens substituted into customer-facing messages.

use chrono::{DateTime, FixedOffset};
use std::collections::BTreeMap;

use super::interval::IntervalWindow;
use super::locale::Locale;

/// Token → replacement map applied to message templates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Placeholders(BTreeMap<String, String>);

impl Placeholders {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the built-in tokens for an interval window.
    ///
    /// `{current_interval}` and `{next_interval}` use the time format for
    /// windows shorter than a day and the date format otherwise.
    pub fn for_window(window: &IntervalWindow, limit: i64, locale: &Locale) -> Self {
        let short = window.is_sub_daily();
        let pick = |dt: &DateTime<FixedOffset>| {
            if short {
                locale.format_time(dt)
            } else {
                locale.format_date(dt)
            }
        };

        let mut placeholders = Self::new();
        placeholders.insert("{current_interval}", pick(&window.start));
        placeholders.insert("{current_interval:date}", locale.format_date(&window.start));
        placeholders.insert("{current_interval:time}", locale.format_time(&window.start));
        placeholders.insert("{limit}", limit.to_string());
        placeholders.insert("{next_interval}", pick(&window.next_start));
        placeholders.insert("{next_interval:date}", locale.format_date(&window.next_start));
        placeholders.insert("{next_interval:time}", locale.format_time(&window.next_start));
        placeholders.insert("{timezone}", locale.timezone_label());
        placeholders
    }

    pub fn insert(&mut self, token: impl Into<String>, value: impl Into<String>) {
        self.0.insert(token.into(), value.into());
    }

    pub fn remove(&mut self, token: &str) -> Option<String> {
        self.0.remove(token)
    }

    pub fn get(&self, token: &str) -> Option<&str> {
        self.0.get(token).map(String::as_str)
    }

    /// Available tokens, sorted.
    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Replaces every known token in `message` in a single left-to-right
    /// pass. Replacement values are never scanned for further tokens; where
    /// tokens overlap the longest match wins.
    pub fn apply(&self, message: &str) -> String {
        let mut out = String::with_capacity(message.len());
        let mut rest = message;

        while let Some(ch) = rest.chars().next() {
            let matched = self
                .0
                .iter()
                .filter(|(token, _)| !token.is_empty() && rest.starts_with(token.as_str()))
                .max_by_key(|(token, _)| token.len());

            match matched {
                Some((token, value)) => {
                    out.push_str(value);
                    rest = &rest[token.len()..];
                }
                None => {
                    out.push(ch);
                    rest = &rest[ch.len_utf8()..];
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::limiting::IntervalKind;
    use chrono::Weekday;

    fn at(s: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(s).unwrap()
    }

    #[test]
    fn monthly_window_uses_dates() {
        let now = at("2020-03-03T12:01:00+00:00");
        let window = IntervalWindow::around(IntervalKind::Monthly, &now, Weekday::Mon);
        let placeholders = Placeholders::for_window(&window, 5, &Locale::utc());

        assert_eq!(placeholders.get("{current_interval}"), Some("March 1, 2020"));
        assert_eq!(placeholders.get("{next_interval}"), Some("April 1, 2020"));
        assert_eq!(placeholders.get("{next_interval:time}"), Some("12:00am"));
        assert_eq!(placeholders.get("{limit}"), Some("5"));
        assert_eq!(placeholders.get("{timezone}"), Some("UTC"));
    }

    #[test]
    fn hourly_window_uses_times() {
        let now = at("2020-04-27T12:05:00+00:00");
        let window = IntervalWindow::around(IntervalKind::Hourly, &now, Weekday::Mon);
        let placeholders = Placeholders::for_window(&window, 5, &Locale::utc());

        assert_eq!(placeholders.get("{current_interval}"), Some("12:00pm"));
        assert_eq!(placeholders.get("{next_interval}"), Some("1:00pm"));
        assert_eq!(placeholders.get("{next_interval:date}"), Some("April 27, 2020"));
    }

    #[test]
    fn apply_replaces_all_known_tokens() {
        let mut placeholders = Placeholders::new();
        placeholders.insert("{limit}", "3");
        placeholders.insert("{next_interval}", "tomorrow");

        assert_eq!(
            placeholders.apply("Only {limit} orders until {next_interval}, {unknown} stays"),
            "Only 3 orders until tomorrow, {unknown} stays"
        );
    }

    #[test]
    fn replacement_values_are_not_rescanned() {
        let mut placeholders = Placeholders::new();
        placeholders.insert("{a_reopens}", "at {limit} o'clock");
        placeholders.insert("{limit}", "5");
        placeholders.insert("{z_note}", "see {a_reopens}");

        assert_eq!(
            placeholders.apply("{limit} orders, back {a_reopens}; {z_note}"),
            "5 orders, back at {limit} o'clock; see {a_reopens}"
        );
    }

    #[test]
    fn longest_overlapping_token_wins() {
        let mut placeholders = Placeholders::new();
        placeholders.insert("%limit", "short");
        placeholders.insert("%limit%", "5");

        assert_eq!(placeholders.apply("max %limit% / %limit"), "max 5 / short");
    }

    #[test]
    fn tokens_are_listed_for_settings_help() {
        let now = at("2020-04-27T12:05:00+00:00");
        let window = IntervalWindow::around(IntervalKind::Daily, &now, Weekday::Mon);
        let placeholders = Placeholders::for_window(&window, -1, &Locale::utc());

        assert_eq!(placeholders.len(), 8);
        assert!(placeholders.tokens().any(|t| t == "{current_interval:date}"));
    }
}
