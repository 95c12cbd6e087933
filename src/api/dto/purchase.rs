//! DTOs for the purchase endpoint.

use regex::Regex;
use serde::Deserialize;
use std::sync::LazyLock;
use validator::Validate;

/// Digits, `+`, parentheses, dashes and spaces.
static PHONE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9+()\- ]+$").expect("phone pattern is a valid regex")
});

/// Purchase form submitted by the landing page.
///
/// ```json
/// {
///   "rate": 1,
///   "name": "Ivan Petrov",
///   "email": "ivan@example.com",
///   "phone": "+7 (900) 123-45-67",
///   "admin": ""
/// }
/// ```
#[derive(Debug, Deserialize, Validate)]
pub struct PurchaseBody {
    /// Rate identifier.
    pub rate: i64,

    #[validate(length(min = 1, max = 200, message = "Name must be 1-200 characters"))]
    pub name: String,

    #[validate(email(message = "Invalid email address"))]
    pub email: String,

    #[validate(length(min = 5, max = 32, message = "Phone must be 5-32 characters"))]
    #[validate(regex(path = "*PHONE_REGEX", message = "Phone contains invalid characters"))]
    pub phone: String,

    /// Admin override credential. Empty or absent means a regular purchase.
    #[serde(default)]
    pub admin: Option<String>,
}
