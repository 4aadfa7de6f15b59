//! Site locale configuration

use chrono::FixedOffset;
use serde::Deserialize;

use super::error::ValidationError;
use crate::domain::limiting::{
    weekday_from_number, Locale, DEFAULT_DATE_FORMAT, DEFAULT_TIME_FORMAT,
};

/// Locale configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LocaleConfig {
    /// Site offset from UTC in seconds (east positive)
    #[serde(default)]
    pub utc_offset_secs: i32,

    /// First day of the week, 0 (Sunday) to 6 (Saturday)
    #[serde(default = "default_week_starts_on")]
    pub week_starts_on: u8,

    /// strftime format for dates
    #[serde(default = "default_date_format")]
    pub date_format: String,

    /// strftime format for times
    #[serde(default = "default_time_format")]
    pub time_format: String,

    /// Label for `{timezone}`, e.g. "EST"
    #[serde(default)]
    pub timezone_abbreviation: Option<String>,
}

impl LocaleConfig {
    /// Build the domain locale
    pub fn to_locale(&self) -> Result<Locale, ValidationError> {
        let offset =
            FixedOffset::east_opt(self.utc_offset_secs).ok_or(ValidationError::InvalidUtcOffset)?;
        let week_starts_on = weekday_from_number(self.week_starts_on)?;

        Ok(Locale::new(
            offset,
            week_starts_on,
            self.date_format.clone(),
            self.time_format.clone(),
            self.timezone_abbreviation.clone(),
        )?)
    }

    /// Validate locale configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.to_locale().map(|_| ())
    }
}

impl Default for LocaleConfig {
    fn default() -> Self {
        Self {
            utc_offset_secs: 0,
            week_starts_on: default_week_starts_on(),
            date_format: default_date_format(),
            time_format: default_time_format(),
            timezone_abbreviation: None,
        }
    }
}

fn default_week_starts_on() -> u8 {
    1
}

fn default_date_format() -> String {
    DEFAULT_DATE_FORMAT.to_string()
}

fn default_time_format() -> String {
    DEFAULT_TIME_FORMAT.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;

    #[test]
    fn test_locale_config_defaults() {
        let locale = LocaleConfig::default().to_locale().unwrap();
        assert_eq!(locale.week_starts_on(), Weekday::Mon);
        assert_eq!(locale.offset().local_minus_utc(), 0);
        assert_eq!(locale.timezone_label(), "UTC");
    }

    #[test]
    fn test_custom_offset_and_week_start() {
        let config = LocaleConfig {
            utc_offset_secs: -5 * 3600,
            week_starts_on: 0,
            timezone_abbreviation: Some("EST".to_string()),
            ..Default::default()
        };
        let locale = config.to_locale().unwrap();
        assert_eq!(locale.week_starts_on(), Weekday::Sun);
        assert_eq!(locale.offset().local_minus_utc(), -18000);
        assert_eq!(locale.timezone_label(), "EST");
    }

    #[test]
    fn test_validation_offset_out_of_range() {
        let config = LocaleConfig {
            utc_offset_secs: 86_400,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ValidationError::InvalidUtcOffset)));
    }

    #[test]
    fn test_validation_week_start_out_of_range() {
        let config = LocaleConfig {
            week_starts_on: 7,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ValidationError::InvalidLocale(_))));
    }

    #[test]
    fn test_validation_bad_format() {
        let config = LocaleConfig {
            date_format: "%Q".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
