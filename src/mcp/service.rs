//! MCP service implementation using rmcp.
//!
//! This module defines the GatewayService struct, which exposes the three
//! database tools via the MCP protocol using the rmcp framework's macros.

use crate::error::GatewayResult;
use crate::models::ToolPayload;
use crate::tools::{InsertRowInput, RawQueryInput, ReadTableInput, ToolGateway, ToolInput};
use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::tool::ToolRouter,
    handler::server::wrapper::Parameters,
    model::{
        CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
    },
    tool, tool_handler, tool_router,
};
use std::sync::Arc;

#[derive(Clone)]
pub struct GatewayService {
    /// Shared gateway for all tool calls
    gateway: Arc<ToolGateway>,
    /// Tool router for MCP tool dispatch (auto-generated)
    tool_router: ToolRouter<Self>,
}

impl GatewayService {
    pub fn new(gateway: Arc<ToolGateway>) -> Self {
        Self {
            gateway,
            tool_router: Self::tool_router(),
        }
    }

    /// Validate the input, run it, and turn the outcome into a tool result.
    ///
    /// Gateway errors become error results the model can read; only a
    /// failure to serialize a successful payload is a protocol error.
    async fn call<I: ToolInput>(&self, input: I) -> Result<CallToolResult, McpError> {
        let result: GatewayResult<ToolPayload> = match input.into_tool_request() {
            Ok(request) => self.gateway.execute(request).await,
            Err(e) => Err(e),
        };
        match result {
            Ok(payload) => {
                let text = payload
                    .to_text()
                    .map_err(|e| McpError::internal_error(e.to_string(), None))?;
                Ok(CallToolResult::success(vec![Content::text(text)]))
            }
            Err(e) => Ok(CallToolResult::error(vec![Content::text(e.to_string())])),
        }
    }
}

#[tool_router]
impl GatewayService {
    #[tool(
        name = "get-table-data",
        description = "Retrieve all rows from a table.\nReturns a JSON array of row objects keyed by column name.\nThe table name may contain only letters, digits and underscores."
    )]
    async fn get_table_data(
        &self,
        Parameters(input): Parameters<ReadTableInput>,
    ) -> Result<CallToolResult, McpError> {
        self.call(input).await
    }

    #[tool(
        name = "execute-custom-query",
        description = "Execute a custom SQL query exactly as written.\nAny statement is accepted. Returns a JSON array of the rows produced (empty for statements without results)."
    )]
    async fn execute_custom_query(
        &self,
        Parameters(input): Parameters<RawQueryInput>,
    ) -> Result<CallToolResult, McpError> {
        self.call(input).await
    }

    #[tool(
        name = "insert-table-data",
        description = "Insert one row into a table.\n`data` maps column names to values; table and column names may contain only letters, digits and underscores.\nReturns the inserted row as stored, including database-assigned values."
    )]
    async fn insert_table_data(
        &self,
        Parameters(input): Parameters<InsertRowInput>,
    ) -> Result<CallToolResult, McpError> {
        self.call(input).await
    }
}

#[tool_handler]
impl ServerHandler for GatewayService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2025_03_26,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "db-connector-mcp".to_owned(),
                title: Some("Database Connector".to_owned()),
                version: env!("CARGO_PKG_VERSION").to_owned(),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Database tools for reading tables, running SQL and inserting rows.\n\
                \n\
                ## Tools\n\
                - `get-table-data`: all rows of `tableName`\n\
                - `execute-custom-query`: run `query` verbatim and return its rows\n\
                - `insert-table-data`: insert `data` into `tableName` and return the stored row\n\
                \n\
                Every tool accepts an optional `databaseName`; without it the configured \
                default database is used. Table, column and database names may contain only \
                letters, digits and underscores and must not start with a digit."
                    .to_string(),
            ),
        }
    }
}
