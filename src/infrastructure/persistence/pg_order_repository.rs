//! PostgreSQL implementation of the order repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{NewOrder, Order};
use crate::domain::repositories::OrderRepository;
use crate::error::AppError;

#[derive(sqlx::FromRow)]
struct OrderRow {
    id: i64,
    payment_id: String,
    email: String,
    rate_id: Option<i64>,
    created_at: DateTime<Utc>,
}

impl From<OrderRow> for Order {
    fn from(r: OrderRow) -> Self {
        Order {
            id: r.id,
            payment_id: r.payment_id,
            email: r.email,
            rate_id: r.rate_id,
            created_at: r.created_at,
        }
    }
}

/// PostgreSQL repository for the append-only order log.
pub struct PgOrderRepository {
    pool: Arc<PgPool>,
}

impl PgOrderRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OrderRepository for PgOrderRepository {
    async fn save(&self, order: NewOrder) -> Result<Order, AppError> {
        let row = sqlx::query_as::<_, OrderRow>(
            r#"
            INSERT INTO orders (payment_id, email, rate_id)
            VALUES ($1, $2, $3)
            RETURNING id, payment_id, email, rate_id, created_at
            "#,
        )
        .bind(&order.payment_id)
        .bind(&order.email)
        .bind(order.rate_id)
        .fetch_one(self.pool.as_ref())
        .await?;

        tracing::info!(payment_id = %row.payment_id, email = %row.email, "Inserted order");

        Ok(row.into())
    }

    async fn list_recent(&self, limit: i64) -> Result<Vec<Order>, AppError> {
        let rows = sqlx::query_as::<_, OrderRow>(
            r#"
            SELECT id, payment_id, email, rate_id, created_at
            FROM orders
            ORDER BY created_at DESC, id DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(Order::from).collect())
    }
}
