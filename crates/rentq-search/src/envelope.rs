//! Shape detection for marketplace API bodies.
//!
//! The API signals application-level failures with a `{"msg": "..."}` object
//! carried in an ordinary 2xx response, so the body, not the status code,
//! decides between data and a domain error.

use serde_json::Value;

/// Returns the `msg` of a domain-error body, if `body` is one.
///
/// Arrays are always data. Objects count as errors only when `msg` is a string.
#[must_use]
pub fn domain_message(body: &Value) -> Option<&str> {
    body.as_object()?.get("msg")?.as_str()
}

/// Normalises a body that is either a list or a single document into a list.
#[must_use]
pub fn into_list(body: Value) -> Vec<Value> {
    match body {
        Value::Array(items) => items,
        Value::Null => Vec::new(),
        other => vec![other],
    }
}
