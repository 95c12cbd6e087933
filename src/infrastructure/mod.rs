//! Infrastructure layer for external integrations.
//!
//! This layer implements interfaces defined by the domain layer.
//!
//! # Modules
//!
//! - [`persistence`] - PostgreSQL repository implementations
//! - [`flag`] - Redis-backed sale flag
//! - [`payment`] - Payment provider client

pub mod flag;
pub mod payment;
pub mod persistence;
