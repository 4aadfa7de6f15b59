//! PostgreSQL implementation of OrderStore.
//!
//! Expects an `orders` table (`id`, `order_type`, `origin`, `created_at`)
//! and an `order_types` table flagging which types count towards the limit.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::foundation::{DomainError, ErrorCode, OrderId};
use crate::domain::limiting::OrderOrigin;
use crate::ports::{NewOrder, OrderQuery, OrderStore, QueryLimit};
use std::collections::BTreeSet;

/// PostgreSQL implementation of the OrderStore port.
pub struct PostgresOrderStore {
    pool: PgPool,
}

impl PostgresOrderStore {
    /// Creates a new PostgresOrderStore with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn origin_to_str(origin: OrderOrigin) -> &'static str {
    match origin {
        OrderOrigin::Storefront => "storefront",
        OrderOrigin::Admin => "admin",
    }
}

fn database_error(action: &str, e: sqlx::Error) -> DomainError {
    DomainError::new(
        ErrorCode::DatabaseError,
        format!("Failed to {}: {}", action, e),
    )
}

#[async_trait]
impl OrderStore for PostgresOrderStore {
    async fn countable_order_types(&self) -> Result<BTreeSet<String>, DomainError> {
        let rows: Vec<(String,)> = sqlx::query_as(
            "SELECT name FROM order_types WHERE counts_towards_limit = TRUE",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| database_error("fetch order types", e))?;

        Ok(rows.into_iter().map(|(name,)| name).collect())
    }

    async fn count_orders(&self, query: &OrderQuery) -> Result<u64, DomainError> {
        let types: Vec<String> = query.types.iter().cloned().collect();

        let result: (i64,) = match query.limit {
            QueryLimit::Unbounded => sqlx::query_as(
                r#"
                SELECT COUNT(*) FROM orders
                WHERE created_at >= $1 AND order_type = ANY($2)
                "#,
            )
            .bind(query.created_at_or_after.as_datetime())
            .bind(&types)
            .fetch_one(&self.pool)
            .await,
            QueryLimit::AtMost(max) => sqlx::query_as(
                r#"
                SELECT COUNT(*) FROM (
                    SELECT 1 FROM orders
                    WHERE created_at >= $1 AND order_type = ANY($2)
                    LIMIT $3
                ) AS capped
                "#,
            )
            .bind(query.created_at_or_after.as_datetime())
            .bind(&types)
            .bind(i64::try_from(max).unwrap_or(i64::MAX))
            .fetch_one(&self.pool)
            .await,
        }
        .map_err(|e| database_error("count orders", e))?;

        Ok(result.0.max(0) as u64)
    }

    async fn create_order(&self, order: NewOrder) -> Result<OrderId, DomainError> {
        let id = OrderId::new();

        sqlx::query(
            r#"
            INSERT INTO orders (id, order_type, origin, created_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(id.as_uuid())
        .bind(&order.order_type)
        .bind(origin_to_str(order.origin))
        .bind(order.created_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| database_error("insert order", e))?;

        Ok(id)
    }
}
