//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `POST /buy`      - Purchase (rate limited)
//! - `GET  /status`   - Per-rate sale status (public)
//! - `POST /webhook`  - Payment notifications (public)
//! - `GET  /limit`    - Set rate limit (admin, rate limited)
//! - `*    /enable`   - Toggle sale (admin, rate limited)
//! - `GET  /health`   - Health check: database and sale flag (public)
//!
//! # Middleware
//!
//! - **CORS** - Any origin unless `CORS_ALLOWED_ORIGIN` is set
//! - **Tracing** - Structured request/response logging
//! - **Rate limiting** - Per-IP token bucket
//! - **Authentication** - Bearer admin token on admin routes
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::handlers::health_handler;
use crate::api::middleware::{auth, rate_limit, tracing};
use crate::state::AppState;
use anyhow::{Context, Result};
use axum::http::{HeaderValue, Method, header};
use axum::routing::get;
use axum::{Router, middleware};
use tower::Layer;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Builds the CORS policy.
///
/// # Errors
///
/// Returns an error if `allowed_origin` is not a valid header value.
pub fn cors_layer(allowed_origin: Option<&str>) -> Result<CorsLayer> {
    let origin = match allowed_origin {
        Some(origin) => AllowOrigin::exact(
            HeaderValue::from_str(origin)
                .with_context(|| format!("Invalid CORS origin '{}'", origin))?,
        ),
        None => AllowOrigin::any(),
    };

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]))
}

/// Constructs the application router with all routes and middleware.
///
/// # Arguments
///
/// - `state` - shared application state injected into all handlers
/// - `cors_origin` - exact allowed origin, or `None` for any origin
///
/// # Errors
///
/// Returns an error if the CORS origin is malformed.
pub fn app_router(state: AppState, cors_origin: Option<&str>) -> Result<NormalizePath<Router>> {
    let purchase_router = api::routes::purchase_routes().layer(rate_limit::purchase_layer());

    let admin_router = api::routes::admin_routes()
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::layer))
        .layer(rate_limit::admin_layer());

    let router = Router::new()
        .merge(purchase_router)
        .merge(api::routes::public_routes())
        .merge(admin_router)
        .route("/health", get(health_handler))
        .with_state(state)
        .layer(cors_layer(cors_origin)?)
        .layer(tracing::layer());

    Ok(NormalizePathLayer::trim_trailing_slash().layer(router))
}
