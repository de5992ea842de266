//! Tool gateway.
//!
//! Every operation follows the same shape: validate, resolve the target,
//! open one session, run one statement, close the session, return the result.
//! The session is closed before the statement's outcome is inspected, so it
//! is released on success and on failure alike.

use crate::config::DbSettings;
use crate::db::{Session, fetch_rows, statement};
use crate::error::{GatewayError, GatewayResult};
use crate::models::{
    ConnectionTarget, InsertRowRequest, JsonRow, RawQueryRequest, ReadTableRequest, ToolOperation,
    ToolPayload, ToolRequest,
};
use crate::tools::{InsertRowInput, RawQueryInput, ReadTableInput, ToolInput};
use serde_json::Value as JsonValue;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Runs tool requests against the configured database server.
///
/// Holds configuration only; there is no shared connection state, so one
/// gateway can serve any number of concurrent calls.
#[derive(Debug, Clone, Default)]
pub struct ToolGateway {
    settings: DbSettings,
}

impl ToolGateway {
    pub fn new(settings: DbSettings) -> Self {
        Self { settings }
    }

    /// Dispatch a tool by name with a JSON argument bundle.
    pub async fn invoke(&self, operation: &str, args: JsonValue) -> GatewayResult<ToolPayload> {
        let operation: ToolOperation = operation.parse()?;
        let request = match operation {
            ToolOperation::ReadTable => parse_args::<ReadTableInput>(operation, args)?,
            ToolOperation::RawQuery => parse_args::<RawQueryInput>(operation, args)?,
            ToolOperation::InsertRow => parse_args::<InsertRowInput>(operation, args)?,
        };
        self.execute(request).await
    }

    /// Execute a validated request.
    pub async fn execute(&self, request: ToolRequest) -> GatewayResult<ToolPayload> {
        let operation = request.operation();
        let database = self.settings.database_name(request.database());
        let start = Instant::now();

        let result = match request {
            ToolRequest::ReadTable(r) => self.read_table(r).await.map(ToolPayload::Rows),
            ToolRequest::RawQuery(r) => self.raw_query(r).await.map(ToolPayload::Rows),
            ToolRequest::InsertRow(r) => self.insert_row(r).await.map(ToolPayload::Row),
        };

        let elapsed_ms = start.elapsed().as_millis() as u64;
        match &result {
            Ok(payload) => info!(
                operation = %operation,
                database = %database,
                row_count = payload.row_count(),
                elapsed_ms,
                "Tool call completed"
            ),
            Err(e) => warn!(
                operation = %operation,
                database = %database,
                elapsed_ms,
                context = failure_context(e),
                error = %e,
                "Tool call failed"
            ),
        }
        result
    }

    /// Return every row of a table.
    pub async fn read_table(&self, request: ReadTableRequest) -> GatewayResult<Vec<JsonRow>> {
        let target = self.settings.resolve_target(request.database.as_ref());
        let sql = statement::select_all(&request.table);
        debug!(table = %request.table, database = %target.database, "Reading table");

        self.run(&target, &sql, |e| {
            GatewayError::query_failed(
                format!("Failed to retrieve data from table {}", request.table),
                request.table.as_str(),
                e,
            )
        })
        .await
    }

    /// Run caller-supplied SQL exactly as given.
    pub async fn raw_query(&self, request: RawQueryRequest) -> GatewayResult<Vec<JsonRow>> {
        let target = self.settings.resolve_target(request.database.as_ref());
        debug!(database = %target.database, "Executing custom query");

        self.run(&target, &request.sql, |e| {
            GatewayError::query_failed("Failed to execute custom query", request.sql.as_str(), e)
        })
        .await
    }

    /// Insert one row and return it as stored.
    pub async fn insert_row(&self, request: InsertRowRequest) -> GatewayResult<JsonRow> {
        let target = self.settings.resolve_target(request.database.as_ref());
        let sql = statement::insert_returning(&request.table, &request.values, target.backend);
        debug!(
            table = %request.table,
            database = %target.database,
            column_count = request.values.len(),
            "Inserting row"
        );

        let rows = self
            .run(&target, &sql, |e| {
                GatewayError::query_failed(
                    format!("Failed to insert data into table {}", request.table),
                    request.table.as_str(),
                    e,
                )
            })
            .await?;

        rows.into_iter()
            .next()
            .ok_or_else(|| GatewayError::empty_result(request.table.as_str()))
    }

    /// Open a session, run `sql` on it and close it again.
    async fn run<F>(
        &self,
        target: &ConnectionTarget,
        sql: &str,
        on_error: F,
    ) -> GatewayResult<Vec<JsonRow>>
    where
        F: FnOnce(&sqlx::Error) -> GatewayError,
    {
        let mut session = Session::open(target).await?;
        let result = fetch_rows(&mut session, sql).await;
        session.close().await;
        result.map_err(|e| on_error(&e))
    }
}

/// Table name or query text a failed statement was built from.
fn failure_context(err: &GatewayError) -> Option<&str> {
    match err {
        GatewayError::Query { context, .. } => Some(context.as_str()),
        _ => None,
    }
}

fn parse_args<I: ToolInput>(
    operation: ToolOperation,
    args: JsonValue,
) -> GatewayResult<ToolRequest> {
    let input: I = serde_json::from_value(args).map_err(|e| {
        GatewayError::invalid_input(format!("Invalid arguments for {}: {}", operation, e))
    })?;
    input.into_tool_request()
}
