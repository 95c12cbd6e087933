//! Repository trait for the append-only order log.

use crate::domain::entities::{NewOrder, Order};
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for orders.
///
/// Orders are written once per created payment session and never updated or
/// deleted.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgOrderRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Appends an order.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors, including a duplicate
    /// payment identifier.
    async fn save(&self, order: NewOrder) -> Result<Order, AppError>;

    /// Lists the most recent orders, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn list_recent(&self, limit: i64) -> Result<Vec<Order>, AppError>;
}
