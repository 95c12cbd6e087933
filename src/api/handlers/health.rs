//! Handler for health check endpoint.

use axum::{Json, extract::State, http::StatusCode};

use crate::api::dto::health::{CheckStatus, HealthChecks, HealthResponse};
use crate::state::AppState;

/// Returns service health status with component checks.
///
/// # Endpoint
///
/// `GET /health`
///
/// # Response Codes
///
/// - **200 OK**: All components healthy
/// - **503 Service Unavailable**: One or more components degraded
///
/// # Response
///
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "checks": {
///     "database": { "status": "ok", "message": "Connected, 3 rates" },
///     "sale_flag": { "status": "ok", "message": "Sale enabled" }
///   }
/// }
/// ```
pub async fn health_handler(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, (StatusCode, Json<HealthResponse>)> {
    let database = check_database(&state).await;
    let sale_flag = check_sale_flag(&state).await;

    let all_healthy = database.is_ok() && sale_flag.is_ok();

    let response = HealthResponse {
        status: if all_healthy { "healthy" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: HealthChecks {
            database,
            sale_flag,
        },
    };

    if all_healthy {
        Ok(Json(response))
    } else {
        Err((StatusCode::SERVICE_UNAVAILABLE, Json(response)))
    }
}

/// Checks database connectivity by loading the rate table.
async fn check_database(state: &AppState) -> CheckStatus {
    match state.status_service.all_statuses().await {
        Ok(statuses) => CheckStatus::ok(format!("Connected, {} rates", statuses.len())),
        Err(e) => CheckStatus::error(format!("Database error: {}", e)),
    }
}

/// Checks that the sale flag backend answers.
async fn check_sale_flag(state: &AppState) -> CheckStatus {
    match state.status_service.sale_enabled().await {
        Ok(true) => CheckStatus::ok("Sale enabled"),
        Ok(false) => CheckStatus::ok("Sale disabled"),
        Err(e) => CheckStatus::error(format!("Flag store error: {}", e)),
    }
}
