//! Statement execution.
//!
//! Statements are sent as plain SQL text with no bound arguments, so
//! PostgreSQL runs them through the simple-query protocol (several
//! statements in one string are allowed) and SQLite prepares them unpersisted.

use crate::db::session::Session;
use crate::db::types::RowToJson;
use crate::models::JsonRow;
use futures_util::TryStreamExt;
use sqlx::Executor;
use std::time::Instant;
use tracing::debug;

/// Execute `sql` on `session` and return every row it produced.
pub async fn fetch_rows(session: &mut Session, sql: &str) -> Result<Vec<JsonRow>, sqlx::Error> {
    let start = Instant::now();
    let rows: Vec<JsonRow> = crate::session_dispatch!(session, |conn| {
        let rows: Vec<_> = conn.fetch(sql).try_collect().await?;
        rows.iter().map(RowToJson::to_json_map).collect()
    });

    debug!(
        row_count = rows.len(),
        execution_time_ms = start.elapsed().as_millis() as u64,
        "Statement executed"
    );
    Ok(rows)
}
