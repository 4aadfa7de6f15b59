//! Site locale: timezone offset, first day of the week and display formats.

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, FixedOffset, Offset, Utc, Weekday};

use crate::domain::foundation::ValidationError;

pub const DEFAULT_DATE_FORMAT: &str = "%B %-d, %Y";
pub const DEFAULT_TIME_FORMAT: &str = "%-I:%M%P";

/// Locale settings the limiter needs to place and describe intervals.
///
/// Format strings are validated on construction so formatting never fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locale {
    offset: FixedOffset,
    week_starts_on: Weekday,
    date_format: String,
    time_format: String,
    timezone_abbreviation: Option<String>,
}

impl Locale {
    pub fn new(
        offset: FixedOffset,
        week_starts_on: Weekday,
        date_format: impl Into<String>,
        time_format: impl Into<String>,
        timezone_abbreviation: Option<String>,
    ) -> Result<Self, ValidationError> {
        let date_format = date_format.into();
        let time_format = time_format.into();
        check_format("date_format", &date_format)?;
        check_format("time_format", &time_format)?;

        Ok(Self {
            offset,
            week_starts_on,
            date_format,
            time_format,
            timezone_abbreviation: timezone_abbreviation.filter(|s| !s.trim().is_empty()),
        })
    }

    /// UTC locale with Monday as the first day of the week.
    pub fn utc() -> Self {
        Self {
            offset: Utc.fix(),
            week_starts_on: Weekday::Mon,
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            time_format: DEFAULT_TIME_FORMAT.to_string(),
            timezone_abbreviation: None,
        }
    }

    /// Same locale with a different first day of the week.
    pub fn with_week_starts_on(mut self, day: Weekday) -> Self {
        self.week_starts_on = day;
        self
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    pub fn week_starts_on(&self) -> Weekday {
        self.week_starts_on
    }

    /// The current instant in the site's offset.
    pub fn now(&self) -> DateTime<FixedOffset> {
        Utc::now().with_timezone(&self.offset)
    }

    pub fn format_date(&self, dt: &DateTime<FixedOffset>) -> String {
        dt.format(&self.date_format).to_string()
    }

    pub fn format_time(&self, dt: &DateTime<FixedOffset>) -> String {
        dt.format(&self.time_format).to_string()
    }

    /// Abbreviation shown for `{timezone}`.
    ///
    /// Falls back to `UTC` for a zero offset and `+HH:MM` otherwise.
    pub fn timezone_label(&self) -> String {
        match &self.timezone_abbreviation {
            Some(abbr) => abbr.clone(),
            None if self.offset.local_minus_utc() == 0 => "UTC".to_string(),
            None => self.offset.to_string(),
        }
    }
}

impl Default for Locale {
    fn default() -> Self {
        Self::utc()
    }
}

fn check_format(field: &str, format: &str) -> Result<(), ValidationError> {
    if format.trim().is_empty() {
        return Err(ValidationError::empty_field(field));
    }
    if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
        return Err(ValidationError::invalid_format(
            field,
            format!("'{}' is not a valid strftime format", format),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(s: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(s).unwrap()
    }

    #[test]
    fn default_formats_render_dates_and_times() {
        let locale = Locale::utc();
        let dt = at("2020-04-27T13:05:00+00:00");

        assert_eq!(locale.format_date(&dt), "April 27, 2020");
        assert_eq!(locale.format_time(&dt), "1:05pm");
    }

    #[test]
    fn timezone_label_falls_back_to_offset() {
        assert_eq!(Locale::utc().timezone_label(), "UTC");

        let offset = FixedOffset::east_opt(2 * 3600).unwrap();
        let locale = Locale::new(offset, Weekday::Mon, "%Y-%m-%d", "%H:%M", None).unwrap();
        assert_eq!(locale.timezone_label(), "+02:00");

        let locale = Locale::new(offset, Weekday::Mon, "%Y-%m-%d", "%H:%M", Some("CEST".into())).unwrap();
        assert_eq!(locale.timezone_label(), "CEST");
    }

    #[test]
    fn invalid_formats_are_rejected() {
        let offset = FixedOffset::east_opt(0).unwrap();

        assert!(Locale::new(offset, Weekday::Mon, "%Q", "%H:%M", None).is_err());
        assert!(Locale::new(offset, Weekday::Mon, "%Y", "  ", None).is_err());
    }

    #[test]
    fn now_uses_the_site_offset() {
        let offset = FixedOffset::west_opt(5 * 3600).unwrap();
        let locale = Locale::new(offset, Weekday::Sun, "%Y", "%H", None).unwrap();

        assert_eq!(locale.now().offset(), &offset);
    }
}
