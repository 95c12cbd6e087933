//! Phone number normalization for the payment provider.

/// Normalizes a Russian phone number to the `7XXXXXXXXXX` form.
///
/// # Rules
///
/// 1. Spaces, parentheses and dashes are removed
/// 2. `+7...` drops the leading `+`
/// 3. `8...` replaces the leading `8` with `7`
/// 4. Anything else is returned without the formatting characters
///
/// # Examples
///
/// ```
/// use course_landing::utils::phone::normalize_phone;
///
/// assert_eq!(normalize_phone("+79991234567"), "79991234567");
/// assert_eq!(normalize_phone("89991234567"), "79991234567");
/// assert_eq!(normalize_phone("99991234567"), "99991234567");
/// assert_eq!(normalize_phone("+7 (900) 123-45-67"), "79001234567");
/// ```
pub fn normalize_phone(phone: &str) -> String {
    let phone: String = phone
        .chars()
        .filter(|c| !matches!(c, ' ' | '(' | ')' | '-'))
        .collect();
    let phone = phone.as_str();

    if let Some(rest) = phone.strip_prefix('+').filter(|r| r.starts_with('7')) {
        rest.to_string()
    } else if let Some(rest) = phone.strip_prefix('8') {
        format!("7{rest}")
    } else {
        phone.to_string()
    }
}
