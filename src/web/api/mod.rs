//! API endpoints module.

pub mod chat;
pub mod conversation;
pub mod home;
pub mod leads;

pub use chat::chat;
pub use conversation::converse;
pub use home::{health_check, home};
pub use leads::{add_lead, preflight, update_lead};

use axum::body::Bytes;
use serde_json::{Map, Value};

use super::error::ApiError;

/// Parse a request body as a JSON object.
///
/// An empty body, invalid JSON or a non-object value are all reported as
/// "no data"; the caller decides whether an empty object is acceptable.
pub(crate) fn parse_object(body: &Bytes) -> Result<Map<String, Value>, ApiError> {
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(map)) => Ok(map),
        _ => Err(ApiError::NoData),
    }
}

/// Text of a body field. Strings are trimmed, numbers keep their decimal
/// form, anything else is empty.
pub(crate) fn field_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    }
}

/// A non-empty string field, trimmed.
pub(crate) fn message_field<'a>(data: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    data.get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}
