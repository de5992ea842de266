//! Input for the `insert-table-data` tool.

use crate::error::{GatewayResult, IdentifierKind};
use crate::models::{Identifier, InsertRowRequest, SqlValue, ToolRequest};
use crate::tools::{ToolInput, parse_database_name};
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{Map, Value as JsonValue};

/// Input for the insert-row tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct InsertRowInput {
    /// Name of the table to insert into.
    pub table_name: String,
    /// Column names mapped to the values to insert. Column names follow the same rules as table names.
    pub data: Map<String, JsonValue>,
    /// Database to connect to. Defaults to the configured database.
    #[serde(default)]
    pub database_name: Option<String>,
}

impl InsertRowInput {
    pub fn into_request(self) -> GatewayResult<InsertRowRequest> {
        let table = Identifier::parse(IdentifierKind::Table, self.table_name)?;
        let values = self
            .data
            .into_iter()
            .map(|(column, value)| {
                Ok((
                    Identifier::parse(IdentifierKind::Column, column)?,
                    SqlValue::from(value),
                ))
            })
            .collect::<GatewayResult<Vec<_>>>()?;
        let database = parse_database_name(self.database_name)?;
        InsertRowRequest::new(table, values, database)
    }
}

impl ToolInput for InsertRowInput {
    fn into_tool_request(self) -> GatewayResult<ToolRequest> {
        self.into_request().map(ToolRequest::InsertRow)
    }
}
