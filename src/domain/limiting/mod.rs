//! Limiting module - pure order-limiting rules.
//!
//! - `interval` - interval kinds and window boundaries
//! - `settings` - parsing of the stored limiter configuration
//! - `locale` - site offset, first weekday and display formats
//! - `placeholders` - message token substitution
//! - `gate` - ordering gate state machine
//! - `errors` - limiter errors

mod errors;
mod gate;
mod interval;
mod locale;
mod placeholders;
mod settings;

pub use errors::LimiterError;
pub use gate::{OrderOrigin, OrderingState, PageContext};
pub use interval::{weekday_from_number, IntervalKind, IntervalWindow};
pub use locale::{Locale, DEFAULT_DATE_FORMAT, DEFAULT_TIME_FORMAT};
pub use placeholders::Placeholders;
pub use settings::{LimiterSettings, MessageKind, DEFAULT_MESSAGE, OPTION_KEY, UNLIMITED};
