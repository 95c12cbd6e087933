//! Shared application state.

use std::sync::Arc;

use crate::application::services::{AuthService, PurchaseService, StatusService};

/// State injected into every handler.
#[derive(Clone)]
pub struct AppState {
    pub purchase_service: Arc<PurchaseService>,
    pub status_service: Arc<StatusService>,
    pub auth_service: Arc<AuthService>,
}
