//! Handler for the purchase endpoint.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use validator::Validate;

use crate::api::dto::purchase::PurchaseBody;
use crate::domain::entities::PurchaseRequest;
use crate::error::AppError;
use crate::state::AppState;

/// Starts a purchase and returns the payment page URL.
///
/// # Endpoint
///
/// `POST /buy`
///
/// # Request Body
///
/// ```json
/// {
///   "rate": 1,
///   "name": "Ivan Petrov",
///   "email": "ivan@example.com",
///   "phone": "+7 (900) 123-45-67",
///   "admin": ""
/// }
/// ```
///
/// # Response
///
/// `200 OK` with the redirect URL as `text/plain`.
///
/// # Errors
///
/// - `422` - malformed body, or invalid name, email or phone
/// - `400` - unknown rate
/// - `405` - sale is closed (`Ended`)
/// - `409` - rate is sold out
/// - `502` - payment provider failure
/// - `500` - payment created but the counter or the order log was not updated
pub async fn purchase_handler(
    State(state): State<AppState>,
    payload: Result<Json<PurchaseBody>, JsonRejection>,
) -> Result<String, AppError> {
    let Json(body) = payload?;
    body.validate()?;

    let admin = state.auth_service.admin_override(body.admin.as_deref());

    let request = PurchaseRequest {
        rate_id: body.rate,
        name: body.name,
        email: body.email,
        phone: body.phone,
        admin,
    };

    state.purchase_service.purchase(request).await
}
