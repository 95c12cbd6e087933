//! Core domain entities.
//!
//! - [`Rate`] - A pricing tier with price, click counter and click limit
//! - [`Order`] - A recorded payment session (append-only)
//! - [`PurchaseRequest`] / [`PaymentRequest`] / [`PaymentSession`] - Transient purchase values
//!
//! Creation inputs use separate structs (`NewOrder`).

pub mod order;
pub mod purchase;
pub mod rate;

pub use order::{NewOrder, Order};
pub use purchase::{PaymentRequest, PaymentSession, PurchaseRequest};
pub use rate::{Money, Rate, RateStatus};
