//! Query parameters for the limit endpoint.

use serde::Deserialize;

/// `GET /limit?count=<n>&rate=<id>`.
///
/// Both values are kept as raw strings so that missing and non-numeric input
/// can be reported back as text instead of a rejection.
#[derive(Debug, Default, Deserialize)]
pub struct LimitQuery {
    pub count: Option<String>,
    pub rate: Option<String>,
}
