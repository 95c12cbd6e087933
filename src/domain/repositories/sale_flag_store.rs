//! Store for the process-wide "sale enabled" flag.

use crate::error::AppError;
use async_trait::async_trait;

/// Durable single-boolean gate controlling whether any purchase may proceed.
///
/// Exactly one flag governs all rates. A store that has never been written
/// reads as `false`.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgSaleFlagStore`] - `settings` table row
/// - [`crate::infrastructure::flag::RedisSaleFlagStore`] - single Redis key
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SaleFlagStore: Send + Sync {
    /// Reads the current flag value. Has no side effects.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if the backend is unreachable.
    async fn read(&self) -> Result<bool, AppError>;

    /// Flips the flag and returns the new value.
    ///
    /// Read-modify-write; concurrent toggles resolve as last-write-wins.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if the backend is unreachable.
    async fn toggle(&self) -> Result<bool, AppError>;
}
