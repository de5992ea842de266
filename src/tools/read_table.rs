//! Input for the `get-table-data` tool.

use crate::error::{GatewayResult, IdentifierKind};
use crate::models::{Identifier, ReadTableRequest, ToolRequest};
use crate::tools::{ToolInput, parse_database_name};
use schemars::JsonSchema;
use serde::Deserialize;

/// Input for the read-table tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReadTableInput {
    /// Name of the table to read. Letters, digits and underscores only, not starting with a digit.
    pub table_name: String,
    /// Database to connect to. Defaults to the configured database.
    #[serde(default)]
    pub database_name: Option<String>,
}

impl ReadTableInput {
    pub fn into_request(self) -> GatewayResult<ReadTableRequest> {
        Ok(ReadTableRequest {
            table: Identifier::parse(IdentifierKind::Table, self.table_name)?,
            database: parse_database_name(self.database_name)?,
        })
    }
}

impl ToolInput for ReadTableInput {
    fn into_tool_request(self) -> GatewayResult<ToolRequest> {
        self.into_request().map(ToolRequest::ReadTable)
    }
}
