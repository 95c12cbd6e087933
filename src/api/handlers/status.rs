//! Handler for the public sale status endpoint.

use std::collections::BTreeMap;

use axum::{Json, extract::State};

use crate::domain::entities::RateStatus;
use crate::error::AppError;
use crate::state::AppState;

/// Returns the sale status of every rate.
///
/// # Endpoint
///
/// `GET /status`
///
/// # Response
///
/// ```json
/// { "1": "start", "2": "stop", "3": "start" }
/// ```
///
/// All rates report `"off"` while the sale is closed.
pub async fn status_handler(
    State(state): State<AppState>,
) -> Result<Json<BTreeMap<i64, RateStatus>>, AppError> {
    let statuses = state.status_service.all_statuses().await?;
    Ok(Json(statuses))
}
