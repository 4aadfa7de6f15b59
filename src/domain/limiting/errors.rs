//! Limiter error types.

use thiserror::Error;

use crate::domain::foundation::{DomainError, ErrorCode};

/// Errors raised by the order limiter.
#[derive(Debug, Clone, Error)]
pub enum LimiterError {
    /// The platform has not registered any countable order types yet.
    ///
    /// Recoverable: recount later instead of caching a zero.
    #[error("No order types were found")]
    EmptyOrderTypes,

    /// Checkout was attempted while ordering is blocked.
    /// Carries the checkout error message shown to the customer.
    #[error("{0}")]
    OrdersNotAccepted(String),

    #[error("order store error: {0}")]
    OrderStore(DomainError),

    #[error("cache error: {0}")]
    Cache(DomainError),

    #[error("settings store error: {0}")]
    Settings(DomainError),
}

impl LimiterError {
    pub fn code(&self) -> ErrorCode {
        match self {
            LimiterError::EmptyOrderTypes => ErrorCode::EmptyOrderTypes,
            LimiterError::OrdersNotAccepted(_) => ErrorCode::OrdersNotAccepted,
            LimiterError::OrderStore(e) | LimiterError::Cache(e) | LimiterError::Settings(e) => e.code,
        }
    }

    /// True for the expected, customer-facing checkout rejection.
    pub fn is_orders_not_accepted(&self) -> bool {
        matches!(self, LimiterError::OrdersNotAccepted(_))
    }
}

impl From<LimiterError> for DomainError {
    fn from(err: LimiterError) -> Self {
        match err {
            LimiterError::OrderStore(e) | LimiterError::Cache(e) | LimiterError::Settings(e) => e,
            other => DomainError::new(other.code(), other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn orders_not_accepted_displays_the_customer_message() {
        let err = LimiterError::OrdersNotAccepted("Come back tomorrow".into());
        assert_eq!(err.to_string(), "Come back tomorrow");
        assert!(err.is_orders_not_accepted());
    }

    #[test]
    fn infrastructure_errors_keep_their_code() {
        let err = LimiterError::Cache(DomainError::new(ErrorCode::CacheError, "down"));
        assert_eq!(err.code(), ErrorCode::CacheError);

        let domain: DomainError = err.into();
        assert_eq!(domain.message, "down");
    }

    #[test]
    fn empty_order_types_maps_to_its_own_code() {
        let domain: DomainError = LimiterError::EmptyOrderTypes.into();
        assert_eq!(domain.code, ErrorCode::EmptyOrderTypes);
    }
}
