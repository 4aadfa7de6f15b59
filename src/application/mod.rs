//! Application layer - the order limiter service and its handlers.
//!
//! `OrderLimiter` coordinates the order store, settings store and count
//! cache. Handlers wrap it for the operations a host platform triggers.

pub mod handlers;
mod hooks;
mod limiter;

pub use handlers::{
    // Admin
    AdminNotice, GetAdminNoticeHandler, GetAdminNoticeQuery, GetStatusReportHandler,
    ResetLimiterCommand, ResetLimiterHandler, ResetLimiterResult, ResetReason, StatusReport,
    UpdateSettingsCommand, UpdateSettingsHandler, UpdateSettingsResult,
    // Ordering
    PlatformReadyHandler, PlatformReadyResult, RecordOrderCommand, RecordOrderHandler,
    RecordOrderResult,
};
pub use hooks::{
    CountOverride, IntervalStartAdjust, LimiterHooks, NextIntervalAdjust, PlaceholderFilter,
    RemainingOrdersOverride,
};
pub use limiter::{OrderLimiter, COUNT_CACHE_NAME};
