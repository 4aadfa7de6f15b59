//! Admin handlers - settings, reset, status report and notices.

mod get_admin_notice;
mod get_status_report;
mod reset_limiter;
mod update_settings;

pub use get_admin_notice::{
    AdminNotice, GetAdminNoticeHandler, GetAdminNoticeQuery, DEFAULT_SETTINGS_URL,
};
pub use get_status_report::{GetStatusReportHandler, StatusReport};
pub use reset_limiter::{ResetLimiterCommand, ResetLimiterHandler, ResetLimiterResult, ResetReason};
pub use update_settings::{UpdateSettingsCommand, UpdateSettingsHandler, UpdateSettingsResult};
