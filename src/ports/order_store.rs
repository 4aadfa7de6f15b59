//! Order store port - counting and creating store orders.
//!
//! The host platform owns order storage. The limiter only needs to know
//! which order types count towards the limit, how many qualifying orders
//! exist since a point in time, and to create orders when a checkout is
//! recorded.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::domain::foundation::{DomainError, OrderId, Timestamp};
use crate::domain::limiting::OrderOrigin;

/// How many matching orders a count query may consider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryLimit {
    /// Count every matching order.
    Unbounded,
    /// Stop counting after this many orders.
    AtMost(u64),
}

impl QueryLimit {
    /// Applies the limit to a raw count.
    pub fn cap(&self, count: u64) -> u64 {
        match self {
            QueryLimit::Unbounded => count,
            QueryLimit::AtMost(max) => count.min(*max),
        }
    }
}

/// Count query for qualifying orders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderQuery {
    /// Only orders created at or after this instant.
    pub created_at_or_after: Timestamp,
    /// Only orders of these types.
    pub types: BTreeSet<String>,
    pub limit: QueryLimit,
}

/// Data for a new order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrder {
    pub order_type: String,
    pub origin: OrderOrigin,
    pub created_at: Timestamp,
}

impl NewOrder {
    /// A storefront order of the default `shop_order` type created now.
    pub fn storefront() -> Self {
        Self {
            order_type: "shop_order".to_string(),
            origin: OrderOrigin::Storefront,
            created_at: Timestamp::now(),
        }
    }

    pub fn with_origin(mut self, origin: OrderOrigin) -> Self {
        self.origin = origin;
        self
    }

    pub fn with_type(mut self, order_type: impl Into<String>) -> Self {
        self.order_type = order_type.into();
        self
    }

    pub fn created_at(mut self, created_at: Timestamp) -> Self {
        self.created_at = created_at;
        self
    }
}

/// Port for the host platform's order storage.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Order types that count towards the limit.
    ///
    /// May legitimately be empty while the platform is still booting.
    async fn countable_order_types(&self) -> Result<BTreeSet<String>, DomainError>;

    /// Counts orders matching the query.
    async fn count_orders(&self, query: &OrderQuery) -> Result<u64, DomainError>;

    /// Persists a new order and returns its ID.
    async fn create_order(&self, order: NewOrder) -> Result<OrderId, DomainError>;
}
