//! API route configuration.
//!
//! Admin routes are protected by [`crate::api::middleware::auth`] when an
//! admin token is configured.

use crate::api::handlers::{
    enable_handler, limit_handler, purchase_handler, status_handler, webhook_handler,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

/// Purchase route.
///
/// - `POST /buy` - Create a payment session and return its URL
pub fn purchase_routes() -> Router<AppState> {
    Router::new().route("/buy", post(purchase_handler))
}

/// Public read-only and provider-facing routes.
///
/// - `GET  /status`  - Per-rate sale status
/// - `POST /webhook` - Payment provider notifications
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/status", get(status_handler))
        .route("/webhook", post(webhook_handler))
}

/// Administrator routes.
///
/// - `GET       /limit?count=&rate=` - Set a rate's click limit
/// - `GET|POST  /enable`             - Toggle the global sale flag
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/limit", get(limit_handler))
        .route("/enable", get(enable_handler).post(enable_handler))
}
