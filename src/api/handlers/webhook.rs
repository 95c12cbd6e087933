//! Handler for payment provider notifications.

use axum::{Json, http::StatusCode};
use tracing::info;

use crate::api::dto::webhook::PaymentNotification;

/// Accepts a payment notification and logs it.
///
/// # Endpoint
///
/// `POST /webhook`
///
/// Orders are recorded when the payment is created, so notifications do not
/// change any state.
pub async fn webhook_handler(Json(notification): Json<PaymentNotification>) -> StatusCode {
    let payment = &notification.object;

    info!(
        kind = %notification.kind,
        event = %notification.event,
        payment_id = %payment.id,
        amount = %payment.amount.value,
        currency = %payment.amount.currency,
        email = payment.metadata.email.as_deref().unwrap_or(""),
        "Payment notification received"
    );

    metrics::counter!("payment_notifications_total", "event" => notification.event.clone())
        .increment(1);

    StatusCode::OK
}
