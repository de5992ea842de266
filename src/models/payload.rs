//! Tool result payloads.

use crate::error::{GatewayError, GatewayResult};
use serde::Serialize;
use serde_json::Value as JsonValue;

/// One result row, keyed by column name in the database's column order.
pub type JsonRow = serde_json::Map<String, JsonValue>;

/// What a successful tool call returns.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ToolPayload {
    /// All rows of a read or a custom query.
    Rows(Vec<JsonRow>),
    /// The row produced by an insert.
    Row(JsonRow),
}

impl ToolPayload {
    /// Number of rows carried by this payload.
    pub fn row_count(&self) -> usize {
        match self {
            Self::Rows(rows) => rows.len(),
            Self::Row(_) => 1,
        }
    }

    /// Serialize to the JSON text handed back to the caller.
    pub fn to_text(&self) -> GatewayResult<String> {
        serde_json::to_string(self)
            .map_err(|e| GatewayError::internal(format!("Failed to serialize result: {}", e)))
    }
}
