//! External payment provider integration.
//!
//! - [`PaymentGateway`] - Trait consumed by the purchase flow
//! - [`YooKassaGateway`] - YooKassa REST API client

mod gateway;
mod yookassa;

#[cfg(test)]
pub use gateway::MockPaymentGateway;
pub use gateway::{PaymentError, PaymentGateway};
pub use yookassa::{YooKassaConfig, YooKassaGateway};
