//! Transient purchase and payment-session values.

use super::rate::Money;

/// A buyer's purchase attempt. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PurchaseRequest {
    pub rate_id: i64,
    pub name: String,
    pub email: String,
    pub phone: String,
    /// Bypasses the sold-out check.
    pub admin: bool,
}

/// What the payment provider needs to open a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentRequest {
    pub amount: Money,
    pub name: String,
    pub email: String,
    /// Already normalized to the `7XXXXXXXXXX` form.
    pub phone: String,
}

/// A pending payment at the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentSession {
    pub redirect_url: String,
    pub payment_id: String,
}
