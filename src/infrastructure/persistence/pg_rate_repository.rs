//! PostgreSQL implementation of the rate repository.

use async_trait::async_trait;
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{Money, Rate};
use crate::domain::repositories::RateRepository;
use crate::error::AppError;

#[derive(sqlx::FromRow)]
struct RateRow {
    id: i64,
    price: i64,
    clicks: i64,
    click_limit: i64,
}

impl From<RateRow> for Rate {
    fn from(r: RateRow) -> Self {
        Rate::new(r.id, Money::from_minor(r.price), r.clicks, r.click_limit)
    }
}

/// PostgreSQL repository for rates.
///
/// Counter and limit changes are single-statement updates, so they are atomic
/// with respect to concurrent requests.
pub struct PgRateRepository {
    pool: Arc<PgPool>,
}

impl PgRateRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RateRepository for PgRateRepository {
    async fn get_by_id(&self, id: i64) -> Result<Option<Rate>, AppError> {
        let row = sqlx::query_as::<_, RateRow>(
            "SELECT id, price, clicks, click_limit FROM rates WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Rate::from))
    }

    async fn get_all(&self) -> Result<Vec<Rate>, AppError> {
        let rows = sqlx::query_as::<_, RateRow>(
            "SELECT id, price, clicks, click_limit FROM rates ORDER BY id",
        )
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(Rate::from).collect())
    }

    async fn increment_clicks(&self, id: i64) -> Result<(), AppError> {
        let result = sqlx::query("UPDATE rates SET clicks = clicks + 1 WHERE id = $1")
            .bind(id)
            .execute(self.pool.as_ref())
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(
                "RateID is not found",
                json!({ "rate_id": id }),
            ));
        }

        Ok(())
    }

    async fn update_limit(&self, id: i64, limit: i64) -> Result<(), AppError> {
        let result = sqlx::query("UPDATE rates SET click_limit = $2 WHERE id = $1")
            .bind(id)
            .bind(limit)
            .execute(self.pool.as_ref())
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(
                "RateID is not found",
                json!({ "rate_id": id }),
            ));
        }

        Ok(())
    }

    async fn create(&self, rate: Rate) -> Result<Rate, AppError> {
        let row = sqlx::query_as::<_, RateRow>(
            r#"
            INSERT INTO rates (id, price, clicks, click_limit)
            VALUES ($1, $2, $3, $4)
            RETURNING id, price, clicks, click_limit
            "#,
        )
        .bind(rate.id)
        .bind(rate.price.minor_units())
        .bind(rate.clicks)
        .bind(rate.click_limit)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(row.into())
    }
}
