//! Business logic services for the application layer.

pub mod auth_service;
pub mod purchase_service;
pub mod status_service;

pub use auth_service::AuthService;
pub use purchase_service::PurchaseService;
pub use status_service::StatusService;
