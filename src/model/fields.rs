//! Field extraction over untrusted JSON.
//!
//! No coercion: `7.0`, `"7"` and `true` are not integers.

use serde_json::{Map, Value};

use super::errors::{ModelError, ModelResult};

/// JSON type name used in error messages
pub(crate) fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        // Integers past i64::MAX are not accepted as integers
        Value::Number(n) if n.is_i64() => "integer",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Join a field name onto a dotted path
pub(crate) fn join(prefix: &str, field: &str) -> String {
    if prefix.is_empty() {
        field.to_string()
    } else {
        format!("{}.{}", prefix, field)
    }
}

/// Require `value` to be an object
pub(crate) fn object<'a>(value: &'a Value, path: &str) -> ModelResult<&'a Map<String, Value>> {
    value.as_object().ok_or_else(|| {
        let path = if path.is_empty() { "$root" } else { path };
        ModelError::type_mismatch(path, "object", json_type_name(value))
    })
}

/// Require `field` to be present
pub(crate) fn require<'a>(
    obj: &'a Map<String, Value>,
    prefix: &str,
    field: &str,
    expected: &'static str,
) -> ModelResult<&'a Value> {
    obj.get(field)
        .ok_or_else(|| ModelError::missing(join(prefix, field), expected))
}

/// Require `field` to be an integer
pub(crate) fn require_int(obj: &Map<String, Value>, prefix: &str, field: &str) -> ModelResult<i64> {
    let value = require(obj, prefix, field, "integer")?;
    value
        .as_i64()
        .ok_or_else(|| ModelError::type_mismatch(join(prefix, field), "integer", json_type_name(value)))
}

/// Require `field` to be a string
pub(crate) fn require_str(obj: &Map<String, Value>, prefix: &str, field: &str) -> ModelResult<String> {
    let value = require(obj, prefix, field, "string")?;
    value
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| ModelError::type_mismatch(join(prefix, field), "string", json_type_name(value)))
}

/// `field` may be absent, null, or an integer
pub(crate) fn optional_int(
    obj: &Map<String, Value>,
    prefix: &str,
    field: &str,
) -> ModelResult<Option<i64>> {
    match obj.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => value.as_i64().map(Some).ok_or_else(|| {
            ModelError::type_mismatch(join(prefix, field), "integer or null", json_type_name(value))
        }),
    }
}
