//! Repository trait definitions for the domain layer.
//!
//! These traits abstract data access following the Repository pattern.
//! Implementations live in `crate::infrastructure`; mocks are generated by
//! `mockall` for unit tests.
//!
//! # Available Repositories
//!
//! - [`RateRepository`] - Rate lookup, click counter and limit updates
//! - [`OrderRepository`] - Append-only order log
//! - [`SaleFlagStore`] - Global sale flag
//!
//! # Testing
//!
//! See integration tests in `tests/repository_*.rs` for usage examples.

pub mod order_repository;
pub mod rate_repository;
pub mod sale_flag_store;

pub use order_repository::OrderRepository;
pub use rate_repository::RateRepository;
pub use sale_flag_store::SaleFlagStore;

#[cfg(test)]
pub use order_repository::MockOrderRepository;
#[cfg(test)]
pub use rate_repository::MockRateRepository;
#[cfg(test)]
pub use sale_flag_store::MockSaleFlagStore;
