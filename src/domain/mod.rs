//! Domain layer containing business entities and repository contracts.
//!
//! # Architecture
//!
//! - [`entities`] - Core business data structures
//! - [`repositories`] - Data access trait definitions
//!
//! # Design Principles
//!
//! - Domain layer has no dependencies on infrastructure or presentation layers
//! - Repository traits define contracts implemented by infrastructure layer
//! - Business logic is encapsulated in services (see [`crate::application::services`])
//!
//! # Purchase Flow
//!
//! 1. HTTP handler validates the request and builds a [`entities::PurchaseRequest`]
//! 2. [`crate::application::services::PurchaseService`] checks the rate and the sale flag
//! 3. The payment gateway opens a session
//! 4. The click counter is incremented and the order is appended

pub mod entities;
pub mod repositories;
