//! Repository trait for rate (pricing tier) data access.

use crate::domain::entities::Rate;
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for rates.
///
/// The repository exclusively owns the mutable inventory state of a rate:
/// the click counter and the click limit.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgRateRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RateRepository: Send + Sync {
    /// Finds a rate by its identifier.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(Rate))` if found
    /// - `Ok(None)` if not found
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn get_by_id(&self, id: i64) -> Result<Option<Rate>, AppError>;

    /// Lists all rates ordered by identifier. Has no side effects.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn get_all(&self) -> Result<Vec<Rate>, AppError>;

    /// Increments the click counter of a rate by one.
    ///
    /// Implementations must perform this as a single atomic update at the
    /// storage layer so that concurrent purchases never lose an increment.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the rate does not exist.
    /// Returns [`AppError::Internal`] on database errors.
    async fn increment_clicks(&self, id: i64) -> Result<(), AppError>;

    /// Sets a new click limit. Takes effect on the next purchase check.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the rate does not exist.
    /// Returns [`AppError::Internal`] on database errors.
    async fn update_limit(&self, id: i64, limit: i64) -> Result<(), AppError>;

    /// Inserts a new rate with a zero click counter.
    ///
    /// Used by the administration CLI to seed rates.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if the identifier is taken or on database errors.
    async fn create(&self, rate: Rate) -> Result<Rate, AppError>;
}
