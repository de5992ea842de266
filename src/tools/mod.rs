//! MCP tool implementations.
//!
//! This module contains the tool inputs and the gateway that runs them:
//! - `get-table-data`: read every row of a table
//! - `execute-custom-query`: run caller-supplied SQL verbatim
//! - `insert-table-data`: insert one row and return it
//! - `gateway`: validation, connection handling and dispatch shared by all three

pub mod gateway;
pub mod insert_row;
pub mod raw_query;
pub mod read_table;

pub use gateway::ToolGateway;
pub use insert_row::InsertRowInput;
pub use raw_query::RawQueryInput;
pub use read_table::ReadTableInput;

use crate::error::{GatewayResult, IdentifierKind};
use crate::models::{Identifier, ToolRequest};
use serde::de::DeserializeOwned;

/// A tool's argument bundle, as deserialized from the call.
pub trait ToolInput: DeserializeOwned {
    /// Validate the arguments into a request the gateway can execute.
    fn into_tool_request(self) -> GatewayResult<ToolRequest>;
}

/// Validate an optional database override. Blank means "use the default".
pub(crate) fn parse_database_name(name: Option<String>) -> GatewayResult<Option<Identifier>> {
    match name {
        Some(name) if !name.trim().is_empty() => {
            Identifier::parse(IdentifierKind::Database, name).map(Some)
        }
        _ => Ok(None),
    }
}
