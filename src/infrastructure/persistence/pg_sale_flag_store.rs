//! PostgreSQL-backed sale flag, stored as a row of the `settings` table.

use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::repositories::SaleFlagStore;
use crate::error::AppError;

const SALE_ENABLED_KEY: &str = "sale_enabled";

/// Sale flag persisted as `settings(key = 'sale_enabled', value = '0' | '1')`.
pub struct PgSaleFlagStore {
    pool: Arc<PgPool>,
}

impl PgSaleFlagStore {
    /// Creates a new store with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SaleFlagStore for PgSaleFlagStore {
    async fn read(&self) -> Result<bool, AppError> {
        let value: Option<String> =
            sqlx::query_scalar("SELECT value FROM settings WHERE key = $1")
                .bind(SALE_ENABLED_KEY)
                .fetch_optional(self.pool.as_ref())
                .await?;

        Ok(value.as_deref() == Some("1"))
    }

    async fn toggle(&self) -> Result<bool, AppError> {
        // A missing row counts as "0", so the first toggle enables the sale.
        let value: String = sqlx::query_scalar(
            r#"
            INSERT INTO settings (key, value) VALUES ($1, '1')
            ON CONFLICT (key) DO UPDATE
                SET value = CASE WHEN settings.value = '1' THEN '0' ELSE '1' END
            RETURNING value
            "#,
        )
        .bind(SALE_ENABLED_KEY)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(value == "1")
    }
}
