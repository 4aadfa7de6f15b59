//! GetAdminNoticeHandler - Query handler for the back-office warning shown
//! while the order limit is reached.

use chrono::{DateTime, Duration, FixedOffset, NaiveTime};
use std::sync::Arc;

use crate::application::OrderLimiter;
use crate::domain::limiting::LimiterError;

/// Default location of the limiter settings screen.
pub const DEFAULT_SETTINGS_URL: &str = "admin.php?page=wc-settings&tab=limit-orders";

/// Query for the admin notice.
#[derive(Debug, Clone, Copy, Default)]
pub struct GetAdminNoticeQuery {
    /// Whether the viewer may change store settings.
    pub can_manage_settings: bool,
}

/// Warning shown to store staff.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminNotice {
    pub message: String,
    /// Link to the settings screen, for viewers allowed to use it.
    pub settings_url: Option<String>,
}

/// Handler for building the admin notice.
pub struct GetAdminNoticeHandler {
    limiter: Arc<OrderLimiter>,
    settings_url: String,
}

impl GetAdminNoticeHandler {
    pub fn new(limiter: Arc<OrderLimiter>) -> Self {
        Self::with_settings_url(limiter, DEFAULT_SETTINGS_URL)
    }

    pub fn with_settings_url(limiter: Arc<OrderLimiter>, settings_url: impl Into<String>) -> Self {
        Self {
            limiter,
            settings_url: settings_url.into(),
        }
    }

    /// Returns `None` unless the limit has been reached.
    pub async fn handle(
        &self,
        query: GetAdminNoticeQuery,
    ) -> Result<Option<AdminNotice>, LimiterError> {
        if !self.limiter.has_reached_limit().await? {
            return Ok(None);
        }

        let message = format!(
            "Based on your store's configuration, new orders have been put on hold until {}.",
            self.describe_next_interval()
        );

        Ok(Some(AdminNotice {
            message,
            settings_url: query
                .can_manage_settings
                .then(|| self.settings_url.clone()),
        }))
    }

    /// "midnight" for a reset at the coming midnight, a time for earlier
    /// resets and a date for later ones.
    fn describe_next_interval(&self) -> String {
        let next = self.limiter.get_next_interval_start();
        let locale = self.limiter.locale();

        match next_midnight(&self.limiter.now()) {
            Some(midnight) if next == midnight => "midnight".to_string(),
            Some(midnight) if next < midnight => locale.format_time(&next),
            _ => locale.format_date(&next),
        }
    }
}

fn next_midnight(now: &DateTime<FixedOffset>) -> Option<DateTime<FixedOffset>> {
    let today = now.date_naive().and_time(NaiveTime::MIN);
    let tomorrow = today.checked_add_signed(Duration::days(1))?;
    tomorrow.and_local_timezone(*now.offset()).single()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{InMemoryCountCache, InMemoryOrderStore};
    use crate::application::COUNT_CACHE_NAME;
    use crate::domain::limiting::{LimiterSettings, Locale};
    use crate::ports::CountCache;
    use serde_json::json;

    // ════════════════════════════════════════════════════════════════════════════
    // Test Helpers
    // ════════════════════════════════════════════════════════════════════════════

    fn at(rfc3339: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(rfc3339).unwrap()
    }

    async fn handler(interval: &str, cached: i64, now: &str) -> GetAdminNoticeHandler {
        let cache = InMemoryCountCache::new();
        cache.set(COUNT_CACHE_NAME, cached, 60).await.unwrap();
        let limiter = OrderLimiter::new(
            Arc::new(InMemoryOrderStore::new()),
            Arc::new(cache),
            LimiterSettings::from_value(Some(&json!({
                "enabled": true,
                "limit": 5,
                "interval": interval,
            }))),
            Locale::utc(),
        )
        .at(at(now));

        GetAdminNoticeHandler::new(Arc::new(limiter))
    }

    fn manager() -> GetAdminNoticeQuery {
        GetAdminNoticeQuery {
            can_manage_settings: true,
        }
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Tests
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn no_notice_below_limit() {
        let handler = handler("daily", 4, "2020-04-27T12:05:00+00:00").await;
        assert_eq!(handler.handle(manager()).await.unwrap(), None);
    }

    #[tokio::test]
    async fn daily_reset_says_midnight() {
        let handler = handler("daily", 5, "2020-04-27T12:05:00+00:00").await;

        let notice = handler.handle(manager()).await.unwrap().unwrap();
        assert_eq!(
            notice.message,
            "Based on your store's configuration, new orders have been put on hold until midnight."
        );
        assert_eq!(notice.settings_url.as_deref(), Some(DEFAULT_SETTINGS_URL));
    }

    #[tokio::test]
    async fn hourly_reset_uses_time() {
        let handler = handler("hourly", 5, "2020-04-27T12:05:00+00:00").await;

        let notice = handler
            .handle(GetAdminNoticeQuery::default())
            .await
            .unwrap()
            .unwrap();
        assert!(notice.message.ends_with("until 1:00pm."));
        assert_eq!(notice.settings_url, None);
    }

    #[tokio::test]
    async fn monthly_reset_uses_date() {
        let handler = handler("monthly", 5, "2020-04-27T12:05:00+00:00").await;

        let notice = handler.handle(manager()).await.unwrap().unwrap();
        assert!(notice.message.ends_with("until May 1, 2020."));
    }

    #[test]
    fn next_midnight_is_start_of_tomorrow() {
        let midnight = next_midnight(&at("2020-02-28T23:59:59-05:00")).unwrap();
        assert_eq!(midnight, at("2020-02-29T00:00:00-05:00"));
    }
}
