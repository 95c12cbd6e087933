//! HTTP API layer for request/response handling.
//!
//! This layer translates HTTP requests into service calls and formats
//! responses, mostly as plain text.
//!
//! # Modules
//!
//! - [`dto`] - Request bodies and JSON responses
//! - [`handlers`] - HTTP request handlers
//! - [`middleware`] - Admin authentication, rate limiting and tracing
//! - [`routes`] - Route groups

pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod routes;
