//! Input for the `execute-custom-query` tool.

use crate::error::{GatewayError, GatewayResult};
use crate::models::{RawQueryRequest, ToolRequest};
use crate::tools::{ToolInput, parse_database_name};
use schemars::JsonSchema;
use serde::Deserialize;

/// Input for the raw-query tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RawQueryInput {
    /// SQL to execute as-is. Any statement is accepted; several statements may be separated by semicolons.
    pub query: String,
    /// Database to connect to. Defaults to the configured database.
    #[serde(default)]
    pub database_name: Option<String>,
}

impl RawQueryInput {
    pub fn into_request(self) -> GatewayResult<RawQueryRequest> {
        if self.query.trim().is_empty() {
            return Err(GatewayError::invalid_input("Query must not be empty"));
        }
        Ok(RawQueryRequest {
            sql: self.query,
            database: parse_database_name(self.database_name)?,
        })
    }
}

impl ToolInput for RawQueryInput {
    fn into_tool_request(self) -> GatewayResult<ToolRequest> {
        self.into_request().map(ToolRequest::RawQuery)
    }
}
