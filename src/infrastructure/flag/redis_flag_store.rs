//! Redis-backed sale flag.

use async_trait::async_trait;
use redis::{AsyncCommands, Client, aio::ConnectionManager};
use serde_json::json;
use tracing::{debug, info};

use crate::domain::repositories::SaleFlagStore;
use crate::error::AppError;

/// Sale flag stored as a single Redis key holding `"0"` or `"1"`.
///
/// Unlike a cache, the key is never given a TTL: Redis must be configured
/// with persistence for the flag to survive restarts.
pub struct RedisSaleFlagStore {
    client: ConnectionManager,
    key: String,
}

impl RedisSaleFlagStore {
    /// Connects to Redis and validates the connection with a PING.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if the URL is invalid, the connection
    /// cannot be established, or the PING fails.
    pub async fn connect(redis_url: &str) -> Result<Self, AppError> {
        info!("Connecting to Redis for the sale flag");

        let client = Client::open(redis_url).map_err(|e| {
            AppError::internal(
                "Failed to create Redis client",
                json!({ "reason": e.to_string() }),
            )
        })?;

        let manager = ConnectionManager::new(client).await.map_err(|e| {
            AppError::internal(
                "Failed to connect to Redis",
                json!({ "reason": e.to_string() }),
            )
        })?;

        let mut test_conn = manager.clone();
        test_conn.ping::<()>().await.map_err(|e| {
            AppError::internal("Redis PING failed", json!({ "reason": e.to_string() }))
        })?;

        info!("✓ Connected to Redis");

        Ok(Self {
            client: manager,
            key: "course_landing:sale_enabled".to_string(),
        })
    }
}

impl RedisSaleFlagStore {
    /// Stores the flag under `key` instead of `course_landing:sale_enabled`.
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }
}

fn redis_error(e: redis::RedisError) -> AppError {
    AppError::internal("Sale flag store error", json!({ "reason": e.to_string() }))
}

#[async_trait]
impl SaleFlagStore for RedisSaleFlagStore {
    async fn read(&self) -> Result<bool, AppError> {
        let mut conn = self.client.clone();
        let value: Option<String> = conn.get(&self.key).await.map_err(redis_error)?;

        Ok(value.as_deref() == Some("1"))
    }

    async fn toggle(&self) -> Result<bool, AppError> {
        let enabled = !self.read().await?;
        let mut conn = self.client.clone();

        conn.set::<_, _, ()>(&self.key, if enabled { "1" } else { "0" })
            .await
            .map_err(redis_error)?;

        debug!(enabled, "Sale flag written to Redis");
        Ok(enabled)
    }
}
