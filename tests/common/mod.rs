#![allow(dead_code)]

use async_trait::async_trait;
use axum::Router;
use chrono::Utc;
use serde_json::json;
use sqlx::PgPool;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use course_landing::application::services::{AuthService, PurchaseService, StatusService};
use course_landing::domain::entities::{
    Money, NewOrder, Order, PaymentRequest, PaymentSession, Rate,
};
use course_landing::domain::repositories::{OrderRepository, RateRepository, SaleFlagStore};
use course_landing::error::AppError;
use course_landing::infrastructure::payment::{PaymentError, PaymentGateway};
use course_landing::state::AppState;

pub const ADMIN_TOKEN: &str = "test-admin-token";

#[derive(Default)]
pub struct InMemoryRateRepository {
    rates: Mutex<BTreeMap<i64, Rate>>,
    pub fail_increment: AtomicBool,
}

impl InMemoryRateRepository {
    pub fn with_rates(rates: impl IntoIterator<Item = Rate>) -> Self {
        let repo = Self::default();
        {
            let mut map = repo.rates.lock().unwrap();
            for rate in rates {
                map.insert(rate.id, rate);
            }
        }
        repo
    }

    pub fn get(&self, id: i64) -> Option<Rate> {
        self.rates.lock().unwrap().get(&id).cloned()
    }
}

#[async_trait]
impl RateRepository for InMemoryRateRepository {
    async fn get_by_id(&self, id: i64) -> Result<Option<Rate>, AppError> {
        Ok(self.get(id))
    }

    async fn get_all(&self) -> Result<Vec<Rate>, AppError> {
        Ok(self.rates.lock().unwrap().values().cloned().collect())
    }

    async fn increment_clicks(&self, id: i64) -> Result<(), AppError> {
        if self.fail_increment.load(Ordering::SeqCst) {
            return Err(AppError::internal("Database error", json!({})));
        }
        match self.rates.lock().unwrap().get_mut(&id) {
            Some(rate) => {
                rate.clicks += 1;
                Ok(())
            }
            None => Err(AppError::not_found("RateID is not found", json!({ "id": id }))),
        }
    }

    async fn update_limit(&self, id: i64, limit: i64) -> Result<(), AppError> {
        match self.rates.lock().unwrap().get_mut(&id) {
            Some(rate) => {
                rate.click_limit = limit;
                Ok(())
            }
            None => Err(AppError::not_found("RateID is not found", json!({ "id": id }))),
        }
    }

    async fn create(&self, rate: Rate) -> Result<Rate, AppError> {
        self.rates.lock().unwrap().insert(rate.id, rate.clone());
        Ok(rate)
    }
}

#[derive(Default)]
pub struct InMemoryOrderRepository {
    orders: Mutex<Vec<Order>>,
    pub fail_save: AtomicBool,
}

impl InMemoryOrderRepository {
    pub fn all(&self) -> Vec<Order> {
        self.orders.lock().unwrap().clone()
    }
}

#[async_trait]
impl OrderRepository for InMemoryOrderRepository {
    async fn save(&self, order: NewOrder) -> Result<Order, AppError> {
        if self.fail_save.load(Ordering::SeqCst) {
            return Err(AppError::internal("Database error", json!({})));
        }
        let mut orders = self.orders.lock().unwrap();
        let saved = Order {
            id: orders.len() as i64 + 1,
            payment_id: order.payment_id,
            email: order.email,
            rate_id: order.rate_id,
            created_at: Utc::now(),
        };
        orders.push(saved.clone());
        Ok(saved)
    }

    async fn list_recent(&self, limit: i64) -> Result<Vec<Order>, AppError> {
        let orders = self.orders.lock().unwrap();
        Ok(orders.iter().rev().take(limit as usize).cloned().collect())
    }
}

#[derive(Default)]
pub struct InMemorySaleFlagStore {
    enabled: AtomicBool,
}

impl InMemorySaleFlagStore {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled: AtomicBool::new(enabled),
        }
    }
}

#[async_trait]
impl SaleFlagStore for InMemorySaleFlagStore {
    async fn read(&self) -> Result<bool, AppError> {
        Ok(self.enabled.load(Ordering::SeqCst))
    }

    async fn toggle(&self) -> Result<bool, AppError> {
        Ok(!self.enabled.fetch_xor(true, Ordering::SeqCst))
    }
}

/// Gateway that returns `https://pay.test/<n>` sessions, or fails on demand.
///
/// With `yield_first` set, every call yields to the scheduler once before
/// answering, so concurrent purchases are all in flight past the inventory
/// check before any of them increments.
#[derive(Default)]
pub struct FakeGateway {
    calls: AtomicUsize,
    pub fail: AtomicBool,
    pub yield_first: AtomicBool,
    pub requests: Mutex<Vec<PaymentRequest>>,
}

impl FakeGateway {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PaymentGateway for FakeGateway {
    async fn create_session(&self, request: PaymentRequest) -> Result<PaymentSession, PaymentError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        self.requests.lock().unwrap().push(request);

        if self.yield_first.load(Ordering::SeqCst) {
            tokio::task::yield_now().await;
        }

        if self.fail.load(Ordering::SeqCst) {
            return Err(PaymentError::Rejected {
                status: 400,
                code: "invalid_request".to_string(),
                description: "Bad receipt".to_string(),
            });
        }

        Ok(PaymentSession {
            redirect_url: format!("https://pay.test/{}", n),
            payment_id: format!("pay-{}", n),
        })
    }
}

pub struct TestContext {
    pub state: AppState,
    pub rates: Arc<InMemoryRateRepository>,
    pub orders: Arc<InMemoryOrderRepository>,
    pub sale_flag: Arc<InMemorySaleFlagStore>,
    pub gateway: Arc<FakeGateway>,
}

/// Rates 1 (4/5 sold), 2 (5/5 sold) and 3 (6/5 sold).
pub fn default_rates() -> Vec<Rate> {
    vec![
        Rate::new(1, Money::from_minor(1500_00), 4, 5),
        Rate::new(2, Money::from_minor(2500_00), 5, 5),
        Rate::new(3, Money::from_minor(4900_00), 6, 5),
    ]
}

pub fn create_test_context(sale_enabled: bool, admin_token: Option<&str>) -> TestContext {
    let rates = Arc::new(InMemoryRateRepository::with_rates(default_rates()));
    let orders = Arc::new(InMemoryOrderRepository::default());
    let sale_flag = Arc::new(InMemorySaleFlagStore::new(sale_enabled));
    let gateway = Arc::new(FakeGateway::default());

    let purchase_service = PurchaseService::new(
        rates.clone(),
        sale_flag.clone(),
        gateway.clone(),
        orders.clone(),
        Duration::from_secs(5),
    );
    let status_service = StatusService::new(rates.clone(), sale_flag.clone());

    let state = AppState {
        purchase_service: Arc::new(purchase_service),
        status_service: Arc::new(status_service),
        auth_service: Arc::new(AuthService::new(admin_token)),
    };

    TestContext {
        state,
        rates,
        orders,
        sale_flag,
        gateway,
    }
}

/// Routes, auth and request tracing without the per-IP governor, which needs
/// `ConnectInfo`.
pub fn test_router(state: AppState) -> Router {
    use axum::middleware;
    use course_landing::api::handlers::health_handler;
    use course_landing::api::middleware::auth;
    use course_landing::api::routes::{admin_routes, public_routes, purchase_routes};

    let admin = admin_routes().route_layer(middleware::from_fn_with_state(
        state.clone(),
        auth::layer,
    ));

    Router::new()
        .merge(purchase_routes())
        .merge(public_routes())
        .merge(admin)
        .route("/health", axum::routing::get(health_handler))
        .with_state(state)
        .layer(course_landing::api::middleware::tracing::layer())
}

pub async fn create_test_rate(pool: &PgPool, id: i64, price: i64, clicks: i64, limit: i64) {
    sqlx::query("INSERT INTO rates (id, price, clicks, click_limit) VALUES ($1, $2, $3, $4)")
        .bind(id)
        .bind(price)
        .bind(clicks)
        .bind(limit)
        .execute(pool)
        .await
        .unwrap();
}
