//! Application layer services implementing business logic.
//!
//! Services consume repository traits and provide a clean API for HTTP
//! handlers and the administration CLI.
//!
//! # Available Services
//!
//! - [`services::purchase_service::PurchaseService`] - Purchase orchestration
//! - [`services::status_service::StatusService`] - Rate statuses, sale toggle, limits
//! - [`services::auth_service::AuthService`] - Admin token checks

pub mod services;
