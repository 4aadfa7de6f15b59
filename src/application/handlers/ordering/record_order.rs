//! RecordOrderHandler - Command handler for accepting a new order.
//!
//! Passes the order through the ordering gate, persists it, recounts the
//! current interval and closes the gate when the limit is met.

use std::sync::Arc;

use crate::application::OrderLimiter;
use crate::domain::foundation::{OrderId, Timestamp};
use crate::domain::limiting::{LimiterError, OrderOrigin, OrderingState};
use crate::ports::{NewOrder, OrderStore};

/// Command to record a new order.
#[derive(Debug, Clone)]
pub struct RecordOrderCommand {
    pub order_type: String,
    pub origin: OrderOrigin,
}

impl RecordOrderCommand {
    /// A `shop_order` placed by a customer.
    pub fn storefront() -> Self {
        Self {
            order_type: "shop_order".to_string(),
            origin: OrderOrigin::Storefront,
        }
    }

    /// A `shop_order` created by a store operator.
    pub fn admin() -> Self {
        Self {
            origin: OrderOrigin::Admin,
            ..Self::storefront()
        }
    }
}

/// Result of recording an order.
#[derive(Debug, Clone)]
pub struct RecordOrderResult {
    pub order_id: OrderId,
    /// Orders counted in the current interval, including this one.
    pub orders_in_interval: i64,
    /// Remaining capacity, `-1` when unlimited.
    pub remaining_orders: i64,
    /// Gate state after the order was recorded.
    pub state: OrderingState,
}

/// Handler for recording orders.
pub struct RecordOrderHandler {
    limiter: Arc<OrderLimiter>,
    orders: Arc<dyn OrderStore>,
}

impl RecordOrderHandler {
    pub fn new(limiter: Arc<OrderLimiter>, orders: Arc<dyn OrderStore>) -> Self {
        Self { limiter, orders }
    }

    pub async fn handle(&self, cmd: RecordOrderCommand) -> Result<RecordOrderResult, LimiterError> {
        // 1. Storefront orders are rejected once the limit is reached,
        //    even when the gate was never initialised for this request
        if cmd.origin == OrderOrigin::Storefront {
            self.limiter.init().await?;
        }
        self.limiter.abort_checkout(cmd.origin)?;

        // 2. Persist the order
        let order = NewOrder::storefront()
            .with_type(cmd.order_type)
            .with_origin(cmd.origin)
            .created_at(Timestamp::from_local(&self.limiter.now()));
        let order_id = self
            .orders
            .create_order(order)
            .await
            .map_err(LimiterError::OrderStore)?;

        // 3. Recount rather than increment
        let orders_in_interval = self.limiter.regenerate_transient().await?;
        let remaining_orders = self.limiter.get_remaining_orders().await?;

        // 4. Close the gate once the limit is met
        if remaining_orders == 0 {
            self.limiter.disable_ordering();
        }

        tracing::debug!(
            order_id = %order_id,
            orders_in_interval,
            remaining_orders,
            "Recorded order"
        );

        Ok(RecordOrderResult {
            order_id,
            orders_in_interval,
            remaining_orders,
            state: self.limiter.state(),
        })
    }
}
