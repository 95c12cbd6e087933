//! Handler for the admin limit endpoint.

use axum::extract::{Query, State};

use crate::api::dto::limit::LimitQuery;
use crate::error::AppError;
use crate::state::AppState;

/// Sets the click limit of a rate.
///
/// # Endpoint
///
/// `GET /limit?count=<n>&rate=<id>`
///
/// # Response
///
/// Always `200 OK` with a plain-text message for malformed input, unknown
/// rates and negative counts; only storage failures produce an error status.
///
/// ```text
/// Limit for rate 2 set to 50
/// ```
pub async fn limit_handler(
    State(state): State<AppState>,
    Query(query): Query<LimitQuery>,
) -> Result<String, AppError> {
    let Some(count) = query.count else {
        return Ok("Count parameter is missing".to_string());
    };
    let Some(rate) = query.rate else {
        return Ok("Rate parameter is missing".to_string());
    };

    let Ok(count) = count.trim().parse::<i64>() else {
        return Ok("Invalid count value".to_string());
    };
    let Ok(rate) = rate.trim().parse::<i64>() else {
        return Ok("Invalid rate value".to_string());
    };

    match state.status_service.set_limit(rate, count).await {
        Ok(()) => Ok(format!("Limit for rate {} set to {}", rate, count)),
        Err(e) if e.status().is_client_error() => Ok(e.to_string()),
        Err(e) => Err(e),
    }
}
