//! Small helpers shared by the request handlers and services.
//!
//! - [`phone`] - Phone number normalization

pub mod phone;
