//! Data Transfer Objects for API requests and responses.
//!
//! Request bodies use Serde for deserialization and validator for input
//! validation. Most responses are plain text and have no DTO.

pub mod health;
pub mod limit;
pub mod purchase;
pub mod webhook;
