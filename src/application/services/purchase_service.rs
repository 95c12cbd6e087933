//! Purchase orchestration: rate checks, payment session, inventory and order log.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use tracing::{error, info, warn};

use crate::domain::entities::{NewOrder, PaymentRequest, PurchaseRequest};
use crate::domain::repositories::{OrderRepository, RateRepository, SaleFlagStore};
use crate::error::AppError;
use crate::infrastructure::payment::PaymentGateway;
use crate::utils::phone::normalize_phone;

/// Service that turns a purchase request into a payment redirect URL.
///
/// Holds no state of its own; each call coordinates the rate repository, the
/// sale flag, the payment gateway and the order log for a single request.
///
/// # Consistency
///
/// The gateway call, the click increment and the order insert are not one
/// transaction. Once the gateway has returned a session, later failures are
/// not rolled back: they are logged with the payment id, email and rate id
/// for manual reconciliation and surfaced to the caller.
///
/// The inventory check and the increment are separate steps, so concurrent
/// purchases can oversell by at most the number of requests in flight past
/// the check. The increment itself is atomic in the repository.
pub struct PurchaseService {
    rates: Arc<dyn RateRepository>,
    sale_flag: Arc<dyn SaleFlagStore>,
    gateway: Arc<dyn PaymentGateway>,
    orders: Arc<dyn OrderRepository>,
    gateway_timeout: Duration,
}

impl PurchaseService {
    /// Creates a new purchase service.
    ///
    /// `gateway_timeout` bounds the payment provider call regardless of the
    /// gateway implementation; hitting it counts as a payment failure.
    pub fn new(
        rates: Arc<dyn RateRepository>,
        sale_flag: Arc<dyn SaleFlagStore>,
        gateway: Arc<dyn PaymentGateway>,
        orders: Arc<dyn OrderRepository>,
        gateway_timeout: Duration,
    ) -> Self {
        Self {
            rates,
            sale_flag,
            gateway,
            orders,
            gateway_timeout,
        }
    }

    /// Runs the purchase flow and returns the payment redirect URL.
    ///
    /// # Steps
    ///
    /// 1. Look up the rate
    /// 2. Require the global sale flag to be on
    /// 3. Reject sold-out rates (`clicks > click_limit`) unless `admin` is set
    /// 4. Normalize the phone number
    /// 5. Open a payment session
    /// 6. Increment the rate's click counter
    /// 7. Record the order
    ///
    /// # Errors
    ///
    /// - [`AppError::NotFound`] - unknown rate
    /// - [`AppError::SaleClosed`] - sale flag is off or unreadable
    /// - [`AppError::SoldOut`] - inventory exhausted for a non-admin request
    /// - [`AppError::PaymentFailed`] - gateway error or timeout; nothing committed
    /// - [`AppError::InventoryUpdateFailed`] - session created, counter not incremented
    /// - [`AppError::OrderRecordFailed`] - session created, order not recorded
    pub async fn purchase(&self, request: PurchaseRequest) -> Result<String, AppError> {
        let result = self.run(request).await;

        let outcome = match &result {
            Ok(_) => "success",
            Err(e) => e.code(),
        };
        metrics::counter!("purchases_total", "outcome" => outcome).increment(1);

        result
    }

    async fn run(&self, request: PurchaseRequest) -> Result<String, AppError> {
        let rate = self
            .rates
            .get_by_id(request.rate_id)
            .await?
            .ok_or_else(|| {
                AppError::not_found("RateID is not found", json!({ "rate_id": request.rate_id }))
            })?;

        let sale_enabled = self.sale_flag.read().await.unwrap_or_else(|e| {
            error!(error = %e, details = %e.details(), "Failed to read sale flag");
            false
        });
        if !sale_enabled {
            return Err(AppError::sale_closed(json!({ "rate_id": rate.id })));
        }

        if rate.is_sold_out() && !request.admin {
            return Err(AppError::sold_out(json!({
                "rate_id": rate.id,
                "clicks": rate.clicks,
                "click_limit": rate.click_limit,
            })));
        }

        let payment = PaymentRequest {
            amount: rate.price,
            name: request.name,
            email: request.email.clone(),
            phone: normalize_phone(&request.phone),
        };

        let session =
            match tokio::time::timeout(self.gateway_timeout, self.gateway.create_session(payment))
                .await
            {
                Ok(Ok(session)) => session,
                Ok(Err(e)) => {
                    warn!(rate_id = rate.id, error = %e, "Payment session was not created");
                    return Err(AppError::payment_failed(json!({
                        "rate_id": rate.id,
                        "reason": e.to_string(),
                    })));
                }
                Err(_) => {
                    warn!(
                        rate_id = rate.id,
                        timeout = ?self.gateway_timeout,
                        "Payment provider timed out"
                    );
                    return Err(AppError::payment_failed(json!({
                        "rate_id": rate.id,
                        "reason": "timeout",
                    })));
                }
            };

        if let Err(e) = self.rates.increment_clicks(rate.id).await {
            error!(
                payment_id = %session.payment_id,
                email = %request.email,
                rate_id = rate.id,
                reconciliation_required = true,
                error = %e,
                "Payment created but click counter was not incremented"
            );
            return Err(AppError::inventory_update_failed(json!({
                "payment_id": session.payment_id,
                "rate_id": rate.id,
            })));
        }

        info!(
            payment_id = %session.payment_id,
            email = %request.email,
            url = %session.redirect_url,
            "New order"
        );

        let order = NewOrder::new(session.payment_id.clone(), request.email.clone(), rate.id);
        if let Err(e) = self.orders.save(order).await {
            error!(
                payment_id = %session.payment_id,
                email = %request.email,
                rate_id = rate.id,
                reconciliation_required = true,
                error = %e,
                "Payment created but order was not recorded"
            );
            return Err(AppError::order_record_failed(json!({
                "payment_id": session.payment_id,
                "rate_id": rate.id,
            })));
        }

        Ok(session.redirect_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{Money, Order, PaymentSession, Rate};
    use crate::domain::repositories::{MockOrderRepository, MockRateRepository, MockSaleFlagStore};
    use crate::infrastructure::payment::{MockPaymentGateway, PaymentError};
    use async_trait::async_trait;
    use chrono::Utc;

    const REDIRECT: &str = "https://yoomoney.ru/checkout/payments/v2/contract?orderId=p1";

    fn rate(clicks: i64, limit: i64) -> Rate {
        Rate::new(1, Money::from_minor(990_00), clicks, limit)
    }

    fn request(admin: bool) -> PurchaseRequest {
        PurchaseRequest {
            rate_id: 1,
            name: "Ivan".to_string(),
            email: "ivan@example.com".to_string(),
            phone: "+79991234567".to_string(),
            admin,
        }
    }

    fn order() -> Order {
        Order {
            id: 1,
            payment_id: "p1".to_string(),
            email: "ivan@example.com".to_string(),
            rate_id: Some(1),
            created_at: Utc::now(),
        }
    }

    fn rates_returning(rate: Rate) -> MockRateRepository {
        let mut mock = MockRateRepository::new();
        mock.expect_get_by_id()
            .returning(move |_| Ok(Some(rate.clone())));
        mock
    }

    fn flag(enabled: bool) -> MockSaleFlagStore {
        let mut mock = MockSaleFlagStore::new();
        mock.expect_read().returning(move || Ok(enabled));
        mock
    }

    fn gateway_ok() -> MockPaymentGateway {
        let mut mock = MockPaymentGateway::new();
        mock.expect_create_session().times(1).returning(|_| {
            Ok(PaymentSession {
                redirect_url: REDIRECT.to_string(),
                payment_id: "p1".to_string(),
            })
        });
        mock
    }

    fn service(
        rates: MockRateRepository,
        flag: MockSaleFlagStore,
        gateway: MockPaymentGateway,
        orders: MockOrderRepository,
    ) -> PurchaseService {
        PurchaseService::new(
            Arc::new(rates),
            Arc::new(flag),
            Arc::new(gateway),
            Arc::new(orders),
            Duration::from_secs(5),
        )
    }

    #[tokio::test]
    async fn test_purchase_success() {
        let mut rates = rates_returning(rate(4, 5));
        rates
            .expect_increment_clicks()
            .withf(|id| *id == 1)
            .times(1)
            .returning(|_| Ok(()));

        let mut gateway = MockPaymentGateway::new();
        gateway
            .expect_create_session()
            .withf(|req| {
                req.phone == "79991234567"
                    && req.amount == Money::from_minor(990_00)
                    && req.email == "ivan@example.com"
            })
            .times(1)
            .returning(|_| {
                Ok(PaymentSession {
                    redirect_url: REDIRECT.to_string(),
                    payment_id: "p1".to_string(),
                })
            });

        let mut orders = MockOrderRepository::new();
        orders
            .expect_save()
            .withf(|o| o.payment_id == "p1" && o.email == "ivan@example.com")
            .times(1)
            .returning(|_| Ok(order()));

        let service = service(rates, flag(true), gateway, orders);

        let url = service.purchase(request(false)).await.unwrap();
        assert_eq!(url, REDIRECT);
    }

    #[tokio::test]
    async fn test_purchase_at_limit_still_sells() {
        let mut rates = rates_returning(rate(5, 5));
        rates.expect_increment_clicks().times(1).returning(|_| Ok(()));
        let mut orders = MockOrderRepository::new();
        orders.expect_save().times(1).returning(|_| Ok(order()));

        let service = service(rates, flag(true), gateway_ok(), orders);

        assert!(service.purchase(request(false)).await.is_ok());
    }

    #[tokio::test]
    async fn test_purchase_unknown_rate() {
        let mut rates = MockRateRepository::new();
        rates.expect_get_by_id().returning(|_| Ok(None));
        let mut gateway = MockPaymentGateway::new();
        gateway.expect_create_session().times(0);

        let service = service(rates, MockSaleFlagStore::new(), gateway, MockOrderRepository::new());

        let err = service.purchase(request(false)).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_purchase_sale_closed() {
        let mut gateway = MockPaymentGateway::new();
        gateway.expect_create_session().times(0);

        let service = service(
            rates_returning(rate(0, 5)),
            flag(false),
            gateway,
            MockOrderRepository::new(),
        );

        let err = service.purchase(request(true)).await.unwrap_err();
        assert!(matches!(err, AppError::SaleClosed { .. }));
    }

    #[tokio::test]
    async fn test_purchase_flag_read_error_fails_closed() {
        let mut flag = MockSaleFlagStore::new();
        flag.expect_read()
            .returning(|| Err(AppError::internal("Database error", json!({}))));

        let service = service(
            rates_returning(rate(0, 5)),
            flag,
            MockPaymentGateway::new(),
            MockOrderRepository::new(),
        );

        let err = service.purchase(request(false)).await.unwrap_err();
        assert!(matches!(err, AppError::SaleClosed { .. }));
    }

    #[tokio::test]
    async fn test_purchase_sold_out() {
        let mut gateway = MockPaymentGateway::new();
        gateway.expect_create_session().times(0);

        let service = service(
            rates_returning(rate(6, 5)),
            flag(true),
            gateway,
            MockOrderRepository::new(),
        );

        let err = service.purchase(request(false)).await.unwrap_err();
        assert!(matches!(err, AppError::SoldOut { .. }));
    }

    #[tokio::test]
    async fn test_purchase_sold_out_admin_override() {
        let mut rates = rates_returning(rate(6, 5));
        rates.expect_increment_clicks().times(1).returning(|_| Ok(()));
        let mut orders = MockOrderRepository::new();
        orders.expect_save().times(1).returning(|_| Ok(order()));

        let service = service(rates, flag(true), gateway_ok(), orders);

        assert_eq!(service.purchase(request(true)).await.unwrap(), REDIRECT);
    }

    #[tokio::test]
    async fn test_purchase_payment_failure_commits_nothing() {
        let mut rates = rates_returning(rate(0, 5));
        rates.expect_increment_clicks().times(0);
        let mut gateway = MockPaymentGateway::new();
        gateway
            .expect_create_session()
            .returning(|_| Err(PaymentError::Transport("connection refused".to_string())));
        let mut orders = MockOrderRepository::new();
        orders.expect_save().times(0);

        let service = service(rates, flag(true), gateway, orders);

        let err = service.purchase(request(false)).await.unwrap_err();
        assert!(matches!(err, AppError::PaymentFailed { .. }));
    }

    struct SlowGateway;

    #[async_trait]
    impl PaymentGateway for SlowGateway {
        async fn create_session(
            &self,
            _request: PaymentRequest,
        ) -> Result<PaymentSession, PaymentError> {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Err(PaymentError::Timeout)
        }
    }

    #[tokio::test]
    async fn test_purchase_gateway_timeout() {
        let mut rates = rates_returning(rate(0, 5));
        rates.expect_increment_clicks().times(0);

        let service = PurchaseService::new(
            Arc::new(rates),
            Arc::new(flag(true)),
            Arc::new(SlowGateway),
            Arc::new(MockOrderRepository::new()),
            Duration::from_millis(20),
        );

        let err = service.purchase(request(false)).await.unwrap_err();
        assert!(matches!(err, AppError::PaymentFailed { .. }));
    }

    #[tokio::test]
    async fn test_purchase_increment_failure() {
        let mut rates = rates_returning(rate(0, 5));
        rates
            .expect_increment_clicks()
            .returning(|_| Err(AppError::internal("Database error", json!({}))));
        let mut orders = MockOrderRepository::new();
        orders.expect_save().times(0);

        let service = service(rates, flag(true), gateway_ok(), orders);

        let err = service.purchase(request(false)).await.unwrap_err();
        assert!(matches!(err, AppError::InventoryUpdateFailed { .. }));
    }

    #[tokio::test]
    async fn test_purchase_order_failure_is_request_scoped() {
        let mut rates = rates_returning(rate(0, 5));
        rates.expect_increment_clicks().times(1).returning(|_| Ok(()));
        let mut orders = MockOrderRepository::new();
        orders
            .expect_save()
            .returning(|_| Err(AppError::internal("Database error", json!({}))));

        let service = service(rates, flag(true), gateway_ok(), orders);

        let err = service.purchase(request(false)).await.unwrap_err();
        assert!(matches!(err, AppError::OrderRecordFailed { .. }));
        assert_eq!(err.details()["payment_id"], "p1");
    }
}
