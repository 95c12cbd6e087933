//! HTTP server initialization and runtime setup.
//!
//! Handles the database pool, migrations, sale flag backend selection,
//! payment gateway construction and the Axum server lifecycle.

use crate::application::services::{AuthService, PurchaseService, StatusService};
use crate::config::{Config, FlagBackend};
use crate::domain::repositories::SaleFlagStore;
use crate::infrastructure::flag::RedisSaleFlagStore;
use crate::infrastructure::payment::YooKassaGateway;
use crate::infrastructure::persistence::{PgOrderRepository, PgRateRepository, PgSaleFlagStore};
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

/// Opens the PostgreSQL pool with the configured limits.
///
/// # Errors
///
/// Returns an error if the database is unreachable.
pub async fn connect_pool(config: &Config) -> Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .idle_timeout(Duration::from_secs(config.db_idle_timeout))
        .max_lifetime(Duration::from_secs(config.db_max_lifetime))
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;

    Ok(pool)
}

/// Builds the services and application state.
///
/// # Errors
///
/// Returns an error if the Redis flag store or the HTTP client cannot be created.
pub async fn build_state(config: &Config, pool: Arc<PgPool>) -> Result<AppState> {
    let rates = Arc::new(PgRateRepository::new(pool.clone()));
    let orders = Arc::new(PgOrderRepository::new(pool.clone()));

    let sale_flag: Arc<dyn SaleFlagStore> = match config.flag_backend {
        FlagBackend::Database => {
            tracing::info!("Sale flag stored in PostgreSQL");
            Arc::new(PgSaleFlagStore::new(pool))
        }
        FlagBackend::Redis => {
            let redis_url = config
                .redis_url
                .as_deref()
                .context("FLAG_STORE=redis requires a Redis URL")?;
            let store = RedisSaleFlagStore::connect(redis_url)
                .await
                .map_err(|e| anyhow::anyhow!("Failed to connect to Redis: {}", e))?;
            tracing::info!("Sale flag stored in Redis");
            Arc::new(store)
        }
    };

    let gateway = YooKassaGateway::new(config.yookassa())
        .map_err(|e| anyhow::anyhow!("Failed to build payment client: {}", e))?;

    let purchase_service = PurchaseService::new(
        rates.clone(),
        sale_flag.clone(),
        Arc::new(gateway),
        orders,
        config.payment_timeout(),
    );
    let status_service = StatusService::new(rates, sale_flag);

    let auth_service = AuthService::new(config.admin_token.as_deref());
    if !auth_service.is_enabled() {
        tracing::warn!("ADMIN_TOKEN is not set: /limit and /enable are open to anyone");
    }

    Ok(AppState {
        purchase_service: Arc::new(purchase_service),
        status_service: Arc::new(status_service),
        auth_service: Arc::new(auth_service),
    })
}

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - PostgreSQL connection pool
/// - Apply migrations
/// - Sale flag store (PostgreSQL or Redis)
/// - Payment gateway client
/// - Axum HTTP server with graceful shutdown
///
/// # Errors
///
/// Returns an error if:
/// - Database connection or migration fails
/// - Redis is selected but unreachable
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let pool = connect_pool(&config).await?;
    tracing::info!("Connected to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to migrate")?;

    let state = build_state(&config, Arc::new(pool)).await?;

    let app = app_router(state, config.cors_allowed_origin.as_deref())?;

    let addr: SocketAddr = config
        .listen_addr
        .parse()
        .with_context(|| format!("Invalid LISTEN address '{}'", config.listen_addr))?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutting down HTTP server...");
}
