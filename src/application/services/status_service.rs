//! Sale status reporting and administrator actions.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::json;
use tracing::{error, info};

use crate::domain::entities::{Rate, RateStatus};
use crate::domain::repositories::{RateRepository, SaleFlagStore};
use crate::error::AppError;

/// Service behind the public status page and the admin toggles.
pub struct StatusService {
    rates: Arc<dyn RateRepository>,
    sale_flag: Arc<dyn SaleFlagStore>,
}

impl StatusService {
    /// Creates a new status service.
    pub fn new(rates: Arc<dyn RateRepository>, sale_flag: Arc<dyn SaleFlagStore>) -> Self {
        Self { rates, sale_flag }
    }

    /// Derives the status of every rate.
    ///
    /// An unreadable sale flag is treated as off, so every rate reports
    /// [`RateStatus::Off`].
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if the rates cannot be loaded.
    pub async fn all_statuses(&self) -> Result<BTreeMap<i64, RateStatus>, AppError> {
        let sale_enabled = self.sale_flag.read().await.unwrap_or_else(|e| {
            error!(error = %e, details = %e.details(), "Failed to read sale flag");
            false
        });

        let rates = self.rates.get_all().await?;

        Ok(rates
            .iter()
            .map(|rate| (rate.id, RateStatus::derive(sale_enabled, rate)))
            .collect())
    }

    /// Lists every rate with its derived status.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if the flag or the rates cannot be loaded.
    pub async fn rates_with_status(&self) -> Result<Vec<(Rate, RateStatus)>, AppError> {
        let sale_enabled = self.sale_flag.read().await?;
        let rates = self.rates.get_all().await?;

        Ok(rates
            .into_iter()
            .map(|rate| {
                let status = RateStatus::derive(sale_enabled, &rate);
                (rate, status)
            })
            .collect())
    }

    /// Reads the global sale flag.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if the backend is unreachable.
    pub async fn sale_enabled(&self) -> Result<bool, AppError> {
        self.sale_flag.read().await
    }

    /// Flips the global sale flag and returns the new value.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if the backend is unreachable.
    pub async fn toggle_sale(&self) -> Result<bool, AppError> {
        let enabled = self.sale_flag.toggle().await?;

        metrics::counter!("sale_toggles_total").increment(1);
        info!(enabled, "Sale flag toggled");

        Ok(enabled)
    }

    /// Sets the click limit of a rate.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if `limit` is negative.
    /// Returns [`AppError::NotFound`] if the rate does not exist.
    pub async fn set_limit(&self, rate_id: i64, limit: i64) -> Result<(), AppError> {
        if limit < 0 {
            return Err(AppError::bad_request(
                "Limit must not be negative",
                json!({ "rate_id": rate_id, "limit": limit }),
            ));
        }

        self.rates.update_limit(rate_id, limit).await?;
        info!(rate_id, limit, "Rate limit updated");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::Money;
    use crate::domain::repositories::{MockRateRepository, MockSaleFlagStore};

    fn rates() -> Vec<Rate> {
        vec![
            Rate::new(1, Money::from_minor(100_00), 5, 5),
            Rate::new(2, Money::from_minor(200_00), 4, 5),
            Rate::new(3, Money::from_minor(300_00), 9, 5),
        ]
    }

    fn rate_repo() -> MockRateRepository {
        let mut mock = MockRateRepository::new();
        mock.expect_get_all().returning(|| Ok(rates()));
        mock
    }

    fn flag(enabled: bool) -> MockSaleFlagStore {
        let mut mock = MockSaleFlagStore::new();
        mock.expect_read().returning(move || Ok(enabled));
        mock
    }

    #[tokio::test]
    async fn test_all_off_when_sale_disabled() {
        let service = StatusService::new(Arc::new(rate_repo()), Arc::new(flag(false)));

        let statuses = service.all_statuses().await.unwrap();

        assert_eq!(statuses.len(), 3);
        assert!(statuses.values().all(|s| *s == RateStatus::Off));
    }

    #[tokio::test]
    async fn test_statuses_when_sale_enabled() {
        let service = StatusService::new(Arc::new(rate_repo()), Arc::new(flag(true)));

        let statuses = service.all_statuses().await.unwrap();

        assert_eq!(statuses[&1], RateStatus::Stop);
        assert_eq!(statuses[&2], RateStatus::Start);
        assert_eq!(statuses[&3], RateStatus::Stop);
    }

    #[tokio::test]
    async fn test_unreadable_flag_reports_off() {
        let mut flag = MockSaleFlagStore::new();
        flag.expect_read()
            .returning(|| Err(AppError::internal("Redis PING failed", json!({}))));
        let service = StatusService::new(Arc::new(rate_repo()), Arc::new(flag));

        let statuses = service.all_statuses().await.unwrap();

        assert!(statuses.values().all(|s| *s == RateStatus::Off));
    }

    #[tokio::test]
    async fn test_toggle_returns_new_value() {
        let mut flag = MockSaleFlagStore::new();
        flag.expect_toggle().times(1).returning(|| Ok(true));
        let service = StatusService::new(Arc::new(MockRateRepository::new()), Arc::new(flag));

        assert!(service.toggle_sale().await.unwrap());
    }

    #[tokio::test]
    async fn test_set_limit() {
        let mut repo = MockRateRepository::new();
        repo.expect_update_limit()
            .withf(|id, limit| *id == 2 && *limit == 50)
            .times(1)
            .returning(|_, _| Ok(()));
        let service = StatusService::new(Arc::new(repo), Arc::new(MockSaleFlagStore::new()));

        assert!(service.set_limit(2, 50).await.is_ok());
    }

    #[tokio::test]
    async fn test_set_negative_limit_rejected() {
        let mut repo = MockRateRepository::new();
        repo.expect_update_limit().times(0);
        let service = StatusService::new(Arc::new(repo), Arc::new(MockSaleFlagStore::new()));

        let err = service.set_limit(2, -1).await.unwrap_err();
        assert!(matches!(err, AppError::Validation { .. }));
    }
}
