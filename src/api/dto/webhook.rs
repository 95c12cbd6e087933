//! Payment provider notification payload.

use serde::Deserialize;

/// Notification sent by the payment provider on payment state changes.
///
/// ```json
/// {
///   "type": "notification",
///   "event": "payment.succeeded",
///   "object": {
///     "id": "2d8e6a3b-000f-5000-8000-1b1f3c7a4c6e",
///     "amount": { "value": "1500.00", "currency": "RUB" },
///     "metadata": { "email": "ivan@example.com" }
///   }
/// }
/// ```
#[derive(Debug, Deserialize)]
pub struct PaymentNotification {
    #[serde(rename = "type")]
    pub kind: String,
    pub event: String,
    pub object: NotificationPayment,
}

#[derive(Debug, Deserialize)]
pub struct NotificationPayment {
    #[serde(default)]
    pub id: String,
    pub amount: NotificationAmount,
    #[serde(default)]
    pub metadata: NotificationMetadata,
}

#[derive(Debug, Deserialize)]
pub struct NotificationAmount {
    pub value: String,
    pub currency: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct NotificationMetadata {
    #[serde(default)]
    pub email: Option<String>,
}
