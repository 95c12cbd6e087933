//! Order entity: an append-only record of a created payment session.

use chrono::{DateTime, Utc};

/// A recorded order.
#[derive(Debug, Clone)]
pub struct Order {
    pub id: i64,
    pub payment_id: String,
    pub email: String,
    pub rate_id: Option<i64>,
    pub created_at: DateTime<Utc>,
}

/// Input data for recording a new order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrder {
    pub payment_id: String,
    pub email: String,
    pub rate_id: Option<i64>,
}

impl NewOrder {
    pub fn new(payment_id: impl Into<String>, email: impl Into<String>, rate_id: i64) -> Self {
        Self {
            payment_id: payment_id.into(),
            email: email.into(),
            rate_id: Some(rate_id),
        }
    }
}
