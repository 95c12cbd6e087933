//! Handler for the admin sale toggle.

use axum::extract::State;

use crate::error::AppError;
use crate::state::AppState;

/// Flips the global sale flag.
///
/// # Endpoint
///
/// `GET /enable` or `POST /enable`
///
/// # Response
///
/// The new flag value as plain text: `"1"` when the sale is open, `"0"` when closed.
pub async fn enable_handler(State(state): State<AppState>) -> Result<&'static str, AppError> {
    let enabled = state.status_service.toggle_sale().await?;
    Ok(if enabled { "1" } else { "0" })
}
