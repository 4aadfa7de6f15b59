//! In-Memory Order Store Adapter
//!
//! Keeps orders in a vector. The set of countable order types is
//! configurable and may be empty to mimic a platform that has not yet
//! registered its order types.

use async_trait::async_trait;
use std::collections::BTreeSet;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, OrderId, Timestamp};
use crate::domain::limiting::OrderOrigin;
use crate::ports::{NewOrder, OrderQuery, OrderStore};

/// A stored order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredOrder {
    pub id: OrderId,
    pub order_type: String,
    pub origin: OrderOrigin,
    pub created_at: Timestamp,
}

/// In-memory implementation of the OrderStore port.
#[derive(Debug, Clone)]
pub struct InMemoryOrderStore {
    order_types: Arc<RwLock<BTreeSet<String>>>,
    orders: Arc<RwLock<Vec<StoredOrder>>>,
}

impl InMemoryOrderStore {
    /// Create a store whose only countable type is `shop_order`.
    pub fn new() -> Self {
        Self::with_order_types(["shop_order"])
    }

    /// Create a store with the given countable order types.
    pub fn with_order_types<I, S>(types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            order_types: Arc::new(RwLock::new(types.into_iter().map(Into::into).collect())),
            orders: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Replace the countable order types.
    pub async fn set_order_types<I, S>(&self, types: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        *self.order_types.write().await = types.into_iter().map(Into::into).collect();
    }

    /// Insert `count` storefront orders of `order_type` created at `created_at`.
    pub async fn seed(&self, order_type: &str, created_at: Timestamp, count: usize) {
        let mut orders = self.orders.write().await;
        orders.extend((0..count).map(|_| StoredOrder {
            id: OrderId::new(),
            order_type: order_type.to_string(),
            origin: OrderOrigin::Storefront,
            created_at,
        }));
    }

    /// Snapshot of all stored orders.
    pub async fn orders(&self) -> Vec<StoredOrder> {
        self.orders.read().await.clone()
    }

    /// Get the number of stored orders
    pub async fn order_count(&self) -> usize {
        self.orders.read().await.len()
    }

    /// Clear all stored orders (useful for tests)
    pub async fn clear(&self) {
        self.orders.write().await.clear();
    }
}

impl Default for InMemoryOrderStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OrderStore for InMemoryOrderStore {
    async fn countable_order_types(&self) -> Result<BTreeSet<String>, DomainError> {
        Ok(self.order_types.read().await.clone())
    }

    async fn count_orders(&self, query: &OrderQuery) -> Result<u64, DomainError> {
        let orders = self.orders.read().await;
        let matching = orders
            .iter()
            .filter(|o| !o.created_at.is_before(&query.created_at_or_after))
            .filter(|o| query.types.contains(&o.order_type))
            .count() as u64;

        Ok(query.limit.cap(matching))
    }

    async fn create_order(&self, order: NewOrder) -> Result<OrderId, DomainError> {
        let id = OrderId::new();
        self.orders.write().await.push(StoredOrder {
            id,
            order_type: order.order_type,
            origin: order.origin,
            created_at: order.created_at,
        });
        Ok(id)
    }
}
