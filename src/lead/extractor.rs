//! Free-text extraction of lead fields.
//!
//! Each field is searched independently; the first match of each pattern
//! wins and a field with no match is left empty.

use regex::Regex;
use std::sync::LazyLock;

use super::validator::{EMAIL_PATTERN, PHONE_PATTERN};
use super::{IdStrategy, LeadCandidate};

static EMAIL_SEARCH: LazyLock<Regex> = LazyLock::new(|| Regex::new(EMAIL_PATTERN).unwrap());

// No lookaround in `regex`, so the boundaries are consumed and the number
// is read from the capture group. A number followed by `@` or glued to a
// dot is part of an email address.
static PHONE_SEARCH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?:^|[^\w+])({})(?:$|[^\w@.]|\.(?:$|\s))",
        PHONE_PATTERN
    ))
    .unwrap()
});

// Longer phrases first so "name is X" is not read as "name" + "is".
static NAME_SEARCH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:my name is|i am|this is|name is|name)\b[\s:,]*([A-Za-z]+)").unwrap()
});

/// Extract a lead candidate from free text.
///
/// # Examples
///
/// ```
/// use leadintake::lead::{extract, IdStrategy};
///
/// let lead = extract(
///     "Hi, I am Rahul, my email is rahul@example.com and phone 9876543210",
///     &IdStrategy::default(),
/// );
/// assert_eq!(lead.firstnm, "Rahul");
/// assert_eq!(lead.email, "rahul@example.com");
/// assert_eq!(lead.mobile, "9876543210");
/// ```
pub fn extract(text: &str, ids: &IdStrategy) -> LeadCandidate {
    LeadCandidate {
        enq_id: ids.next_id(),
        firstnm: extract_name(text).unwrap_or_default(),
        email: extract_email(text).unwrap_or_default(),
        mobile: extract_phone(text).unwrap_or_default(),
    }
}

/// First email-shaped substring, without sentence punctuation.
pub fn extract_email(text: &str) -> Option<String> {
    EMAIL_SEARCH
        .find(text)
        .map(|m| m.as_str().trim_end_matches(|c: char| c == '.' || c == '-').to_string())
}

/// First phone-shaped substring not embedded in a longer word or number.
pub fn extract_phone(text: &str) -> Option<String> {
    PHONE_SEARCH
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// First alphabetic token after a name trigger phrase. Trigger phrases
/// inside an email address are skipped.
pub fn extract_name(text: &str) -> Option<String> {
    let emails: Vec<_> = EMAIL_SEARCH.find_iter(text).map(|m| m.range()).collect();

    NAME_SEARCH
        .captures_iter(text)
        .filter(|caps| {
            let start = caps.get(0).map_or(0, |m| m.start());
            !emails.iter().any(|range| range.contains(&start))
        })
        .find_map(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}
