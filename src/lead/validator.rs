//! Field validation for lead candidates.
//!
//! Both checks are pure: they trim the input, full-match it against a
//! pattern and return a boolean. Malformed input is never an error.

use regex::Regex;
use std::sync::LazyLock;

/// Indian mobile number, ten digits starting with 7, 8 or 9, with an
/// optional `+91`, `91` or `0` prefix.
pub(crate) const PHONE_PATTERN: &str = r"(?:\+91[\-\s]?)?0?(?:91)?[789]\d{9}";

/// `local@domain.tld` with a permissive character class.
pub(crate) const EMAIL_PATTERN: &str = r"[a-zA-Z0-9_.+-]+@[a-zA-Z0-9-]+\.[a-zA-Z0-9.-]+";

static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!("^{}$", PHONE_PATTERN)).unwrap());

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!("^{}$", EMAIL_PATTERN)).unwrap());

/// Validate an Indian mobile number with optional country code.
///
/// # Examples
///
/// ```
/// use leadintake::lead::validate_phone;
///
/// assert!(validate_phone("+91 9876543210"));
/// assert!(!validate_phone("12345"));
/// ```
pub fn validate_phone(phone: &str) -> bool {
    let phone = phone.trim();
    !phone.is_empty() && PHONE_RE.is_match(phone)
}

/// Basic email shape check. No DNS or MX lookups.
///
/// # Examples
///
/// ```
/// use leadintake::lead::validate_email;
///
/// assert!(validate_email("rahul@example.com"));
/// assert!(!validate_email("rahul.example.com"));
/// ```
pub fn validate_email(email: &str) -> bool {
    let email = email.trim();
    !email.is_empty() && EMAIL_RE.is_match(email)
}
