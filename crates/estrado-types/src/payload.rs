//! Opaque upstream payloads.
//!
//! Entities (speakers, events, registrations) are owned by the upstream API
//! and pass through this front-end as untyped JSON. The helpers here mirror
//! the truthiness rules the upstream contract was written against.

use serde_json::Value;

/// A decoded upstream response body or an outgoing request body.
pub type Payload = Value;

/// Whether a payload counts as "empty": null, `false`, `0`, `""`, `"0"`,
/// an empty array or an empty object.
pub fn is_empty_payload(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty() || s == "0",
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
    }
}

/// Truthiness of a single field value (the inverse of [`is_empty_payload`]).
pub fn is_truthy(value: &Value) -> bool {
    !is_empty_payload(value)
}

/// Read a numeric field leniently: numbers as-is, numeric strings parsed,
/// anything else `None`.
pub fn number_field(payload: &Value, key: &str) -> Option<f64> {
    match payload.get(key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Render a scalar field as a route parameter (`7` and `"7"` both give `7`).
pub fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
