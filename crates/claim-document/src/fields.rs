//! Generic tree values and their object casts

/// A document node: null, bool, number, string, array or object
pub use serde_json::Value;

/// One level of an object node, keyed by field name
pub type Fields = serde_json::Map<String, Value>;

/// View a value as an object
///
/// Returns `None` for every non-object variant, including `null`.
#[inline]
#[must_use]
pub fn as_fields(value: &Value) -> Option<&Fields> {
    match value {
        Value::Object(fields) => Some(fields),
        _ => None,
    }
}

/// Mutable counterpart of [`as_fields`]
#[inline]
#[must_use]
pub fn as_fields_mut(value: &mut Value) -> Option<&mut Fields> {
    match value {
        Value::Object(fields) => Some(fields),
        _ => None,
    }
}
