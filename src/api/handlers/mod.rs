//! HTTP request handlers for API endpoints.
//!
//! Each handler module corresponds to a logical grouping of endpoints.

pub mod enable;
pub mod health;
pub mod limit;
pub mod purchase;
pub mod status;
pub mod webhook;

pub use enable::enable_handler;
pub use health::health_handler;
pub use limit::limit_handler;
pub use purchase::purchase_handler;
pub use status::status_handler;
pub use webhook::webhook_handler;
