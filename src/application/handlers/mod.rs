//! Application handlers.
//!
//! Command and query handlers that stand in for the host platform's
//! lifecycle hooks, admin screens and order intake.

pub mod admin;
pub mod ordering;

pub use admin::{
    AdminNotice, GetAdminNoticeHandler, GetAdminNoticeQuery, GetStatusReportHandler,
    ResetLimiterCommand, ResetLimiterHandler, ResetLimiterResult, ResetReason, StatusReport,
    UpdateSettingsCommand, UpdateSettingsHandler, UpdateSettingsResult, DEFAULT_SETTINGS_URL,
};
pub use ordering::{
    PlatformReadyHandler, PlatformReadyResult, RecordOrderCommand, RecordOrderHandler,
    RecordOrderResult,
};
