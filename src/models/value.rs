//! Values carried by an insert.

use serde_json::Value as JsonValue;

/// A value to be written into a single column.
///
/// Arrays and objects are kept as JSON documents and written as their JSON
/// text, which json/jsonb and text columns accept.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null,
    Bool(bool),
    Int(i64),
    /// Integers above `i64::MAX`
    UInt(u64),
    Float(f64),
    Text(String),
    Json(JsonValue),
}

impl From<JsonValue> for SqlValue {
    fn from(value: JsonValue) -> Self {
        match value {
            JsonValue::Null => Self::Null,
            JsonValue::Bool(b) => Self::Bool(b),
            JsonValue::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Self::Int(i)
                } else if let Some(u) = n.as_u64() {
                    Self::UInt(u)
                } else {
                    Self::Float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            JsonValue::String(s) => Self::Text(s),
            doc @ (JsonValue::Array(_) | JsonValue::Object(_)) => Self::Json(doc),
        }
    }
}
