//! PostgreSQL repository implementations.
//!
//! Concrete implementations of domain repository traits using SQLx
//! prepared statements.
//!
//! # Repositories
//!
//! - [`PgRateRepository`] - Rate lookup and inventory updates
//! - [`PgOrderRepository`] - Order log
//! - [`PgSaleFlagStore`] - Sale flag in the `settings` table

pub mod pg_order_repository;
pub mod pg_rate_repository;
pub mod pg_sale_flag_store;

pub use pg_order_repository::PgOrderRepository;
pub use pg_rate_repository::PgRateRepository;
pub use pg_sale_flag_store::PgSaleFlagStore;
