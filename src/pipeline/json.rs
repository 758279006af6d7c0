//! Loose accessors over `serde_json::Value`.
//!
//! Webhook payloads are produced by hand-wired automation nodes, so a field
//! may be missing, `null`, an empty string, a number where a string was
//! expected, or a JSON document encoded inside a string. These helpers give
//! every "is this field set?" question one consistent answer.

use serde_json::Value;

/// Whether a value counts as "present".
///
/// `null`, `false`, `0`, `NaN` and `""` are absent; everything else,
/// including empty arrays and objects, is present.
pub fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Look up `key` on an object, returning it only when it is present.
pub fn get<'a>(value: &'a Value, key: &str) -> Option<&'a Value> {
    value.get(key).filter(|v| truthy(v))
}

/// Look up `key` on an object and require it to be an object.
pub fn get_object<'a>(value: &'a Value, key: &str) -> Option<&'a Value> {
    value.get(key).filter(|v| v.is_object())
}

/// Render a scalar for display: strings verbatim, everything else as JSON.
pub fn display(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Present field rendered for display.
pub fn get_display(value: &Value, key: &str) -> Option<String> {
    get(value, key).map(display)
}

/// Coerce a number or numeric string to `f64`.
pub fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}
