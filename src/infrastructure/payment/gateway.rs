//! Payment gateway trait and error types.

use async_trait::async_trait;

use crate::domain::entities::{PaymentRequest, PaymentSession};

/// Errors that can occur while opening a payment session.
#[derive(Debug, thiserror::Error)]
pub enum PaymentError {
    #[error("payment provider did not answer in time")]
    Timeout,

    #[error("payment provider transport error: {0}")]
    Transport(String),

    #[error("payment provider rejected the request ({status}): {code}: {description}")]
    Rejected {
        status: u16,
        code: String,
        description: String,
    },

    #[error("unexpected payment provider response: {0}")]
    InvalidResponse(String),
}

/// Client for the external payment provider.
///
/// Implementations must not hold any lock while the remote call is in flight.
///
/// # Implementations
///
/// - [`crate::infrastructure::payment::YooKassaGateway`] - YooKassa v3 API
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Creates a remote payment session and returns its redirect URL and id.
    ///
    /// # Errors
    ///
    /// Returns a [`PaymentError`] on transport failures, timeouts, provider
    /// rejections and malformed responses.
    async fn create_session(&self, request: PaymentRequest)
    -> Result<PaymentSession, PaymentError>;
}
