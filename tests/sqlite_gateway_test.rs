//! Integration tests for the tool gateway against SQLite.
//!
//! Tests verify that:
//! - Table reads return exactly the stored rows
//! - Inserts return the stored row including database-assigned values
//! - Custom queries run verbatim
//! - Invalid names are rejected before any connection is made
//! - Every error kind leaves the gateway usable for the next call

use db_connector_mcp::config::DbSettings;
use db_connector_mcp::error::{GatewayError, IdentifierKind};
use db_connector_mcp::models::{DatabaseBackend, ToolPayload};
use db_connector_mcp::tools::{InsertRowInput, RawQueryInput, ReadTableInput, ToolGateway};
use rand::Rng;
use rand::seq::SliceRandom;
use serde_json::{Value as JsonValue, json};
use sqlx::sqlite::SqliteConnectOptions;
use sqlx::{Connection, Executor, SqliteConnection};
use std::path::Path;
use tempfile::TempDir;

const SCHEMA: &str = r#"
CREATE TABLE users (id INTEGER PRIMARY KEY, name TEXT NOT NULL, age INTEGER);
INSERT INTO users (name, age) VALUES ('alice', 30), ('bob', NULL), ('carol', 41);

CREATE TABLE widgets (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    qty INTEGER NOT NULL,
    active BOOLEAN,
    attrs JSON
);

CREATE TABLE ghosts (id INTEGER PRIMARY KEY, name TEXT);
CREATE TRIGGER ghosts_vanish BEFORE INSERT ON ghosts BEGIN SELECT RAISE(IGNORE); END;
"#;

/// Create `<dir>/<name>.db` and run `sql` against it.
async fn create_database(dir: &Path, name: &str, sql: &str) {
    let options = SqliteConnectOptions::new()
        .filename(dir.join(format!("{}.db", name)))
        .create_if_missing(true);
    let mut conn = SqliteConnection::connect_with(&options).await.unwrap();
    conn.execute(sql).await.unwrap();
    conn.close().await.unwrap();
}

/// Gateway over a fresh `inventory` database in a temp directory.
async fn setup_gateway() -> (ToolGateway, TempDir) {
    let dir = tempfile::tempdir().unwrap();
    create_database(dir.path(), "inventory", SCHEMA).await;
    let settings = DbSettings {
        backend: DatabaseBackend::Sqlite,
        sqlite_dir: dir.path().to_path_buf(),
        ..DbSettings::default()
    };
    (ToolGateway::new(settings), dir)
}

fn rows(payload: ToolPayload) -> Vec<JsonValue> {
    match payload {
        ToolPayload::Rows(rows) => rows.into_iter().map(JsonValue::Object).collect(),
        other => panic!("expected rows, got {other:?}"),
    }
}

fn row(payload: ToolPayload) -> JsonValue {
    match payload {
        ToolPayload::Row(row) => JsonValue::Object(row),
        other => panic!("expected a single row, got {other:?}"),
    }
}

async fn read(gateway: &ToolGateway, table: &str) -> Result<ToolPayload, GatewayError> {
    gateway
        .invoke("get-table-data", json!({"tableName": table}))
        .await
}

// =============================================================================
// read-table
// =============================================================================

#[tokio::test]
async fn test_read_table_returns_all_rows_in_order() {
    let (gateway, _dir) = setup_gateway().await;
    let result = rows(read(&gateway, "users").await.unwrap());
    assert_eq!(
        result,
        vec![
            json!({"id": 1, "name": "alice", "age": 30}),
            json!({"id": 2, "name": "bob", "age": null}),
            json!({"id": 3, "name": "carol", "age": 41}),
        ]
    );
}

#[tokio::test]
async fn test_read_table_keeps_column_order() {
    let (gateway, _dir) = setup_gateway().await;
    let payload = read(&gateway, "users").await.unwrap();
    assert!(payload.to_text().unwrap().starts_with(r#"[{"id":1,"name":"alice","age":30}"#));
}

#[tokio::test]
async fn test_read_empty_table() {
    let (gateway, _dir) = setup_gateway().await;
    assert!(rows(read(&gateway, "widgets").await.unwrap()).is_empty());
}

#[tokio::test]
async fn test_read_missing_table_is_query_error() {
    let (gateway, _dir) = setup_gateway().await;
    let err = read(&gateway, "missing_table").await.unwrap_err();
    match &err {
        GatewayError::Query { context, message, .. } => {
            assert_eq!(context, "missing_table");
            assert!(message.contains("no such table"), "message: {message}");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(
        err.to_string()
            .starts_with("Failed to retrieve data from table missing_table: ")
    );
}

#[tokio::test]
async fn test_read_table_rejects_injection() {
    let (gateway, _dir) = setup_gateway().await;
    let err = read(&gateway, "users; DROP TABLE users;--").await.unwrap_err();
    assert!(matches!(
        err,
        GatewayError::InvalidIdentifier {
            kind: IdentifierKind::Table,
            ..
        }
    ));
    // users is untouched
    assert_eq!(rows(read(&gateway, "users").await.unwrap()).len(), 3);
}

#[tokio::test]
async fn test_read_table_from_named_database() {
    let (gateway, dir) = setup_gateway().await;
    create_database(
        dir.path(),
        "archive",
        "CREATE TABLE users (id INTEGER PRIMARY KEY, name TEXT); INSERT INTO users (name) VALUES ('zed');",
    )
    .await;

    let result = gateway
        .read_table(
            ReadTableInput {
                table_name: "users".into(),
                database_name: Some("archive".into()),
            }
            .into_request()
            .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(result.len(), 1);
    assert_eq!(result[0]["name"], "zed");
}

#[tokio::test]
async fn test_missing_database_is_connection_error() {
    let (gateway, dir) = setup_gateway().await;
    let err = gateway
        .invoke(
            "get-table-data",
            json!({"tableName": "users", "databaseName": "nowhere"}),
        )
        .await
        .unwrap_err();
    match err {
        GatewayError::Connection { database, .. } => assert_eq!(database, "nowhere"),
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(!dir.path().join("nowhere.db").exists());
}

// =============================================================================
// insert-row
// =============================================================================

#[tokio::test]
async fn test_insert_returns_stored_row() {
    let (gateway, _dir) = setup_gateway().await;
    let payload = gateway
        .invoke(
            "insert-table-data",
            json!({"tableName": "widgets", "data": {"name": "foo", "qty": 3}}),
        )
        .await
        .unwrap();
    let inserted = row(payload);

    assert_eq!(inserted["name"], "foo");
    assert_eq!(inserted["qty"], 3);
    assert!(inserted["id"].as_i64().is_some_and(|id| id > 0));

    let stored = rows(read(&gateway, "widgets").await.unwrap());
    assert_eq!(stored, vec![inserted]);
}

#[tokio::test]
async fn test_insert_escapes_values() {
    let (gateway, _dir) = setup_gateway().await;
    let tricky = "O'Brien'); DROP TABLE widgets;--";
    let inserted = gateway
        .insert_row(
            InsertRowInput {
                table_name: "widgets".into(),
                data: json!({"name": tricky, "qty": 1, "active": true, "attrs": {"color": "red"}})
                    .as_object()
                    .cloned()
                    .unwrap(),
                database_name: None,
            }
            .into_request()
            .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(inserted["name"], tricky);

    let stored = rows(read(&gateway, "widgets").await.unwrap());
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0]["name"], tricky);
    assert_eq!(stored[0]["active"], true);
    // SQLite keeps JSON documents as text
    assert_eq!(stored[0]["attrs"], r#"{"color":"red"}"#);
}

#[tokio::test]
async fn test_insert_rejects_injected_column() {
    let (gateway, _dir) = setup_gateway().await;
    let err = gateway
        .invoke(
            "insert-table-data",
            json!({"tableName": "widgets", "data": {"users; DROP TABLE users;--": 1}}),
        )
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        GatewayError::InvalidIdentifier {
            kind: IdentifierKind::Column,
            ..
        }
    ));
}

#[tokio::test]
async fn test_insert_constraint_violation_is_query_error() {
    let (gateway, _dir) = setup_gateway().await;
    let err = gateway
        .invoke(
            "insert-table-data",
            json!({"tableName": "widgets", "data": {"name": "no qty"}}),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, GatewayError::Query { .. }));
    assert!(
        err.to_string()
            .starts_with("Failed to insert data into table widgets: ")
    );
}

#[tokio::test]
async fn test_insert_suppressed_by_trigger_is_empty_result() {
    let (gateway, _dir) = setup_gateway().await;
    let err = gateway
        .invoke(
            "insert-table-data",
            json!({"tableName": "ghosts", "data": {"name": "casper"}}),
        )
        .await
        .unwrap_err();
    match err {
        GatewayError::EmptyResult { table } => assert_eq!(table, "ghosts"),
        other => panic!("unexpected error: {other:?}"),
    }
}

// =============================================================================
// raw-query
// =============================================================================

#[tokio::test]
async fn test_raw_query_select_literal() {
    let (gateway, _dir) = setup_gateway().await;
    let payload = gateway
        .invoke("execute-custom-query", json!({"query": "SELECT 1 AS x"}))
        .await
        .unwrap();
    assert_eq!(rows(payload), vec![json!({"x": 1})]);
}

async fn raw(gateway: &ToolGateway, sql: &str) -> Vec<JsonValue> {
    let request = RawQueryInput {
        query: sql.into(),
        database_name: None,
    }
    .into_request()
    .unwrap();
    gateway
        .raw_query(request)
        .await
        .unwrap()
        .into_iter()
        .map(JsonValue::Object)
        .collect()
}

#[tokio::test]
async fn test_raw_query_runs_any_statement() {
    let (gateway, _dir) = setup_gateway().await;

    assert!(raw(&gateway, "DELETE FROM users WHERE name = 'bob'").await.is_empty());
    assert!(
        raw(
            &gateway,
            "CREATE TABLE notes (body TEXT); INSERT INTO notes VALUES ('hi')"
        )
        .await
        .is_empty()
    );

    let result = raw(&gateway, "SELECT name FROM users ORDER BY id").await;
    let names: Vec<&str> = result.iter().filter_map(|r| r["name"].as_str()).collect();
    assert_eq!(names, vec!["alice", "carol"]);
    assert_eq!(raw(&gateway, "SELECT body FROM notes").await[0]["body"], "hi");
}

#[tokio::test]
async fn test_raw_query_syntax_error() {
    let (gateway, _dir) = setup_gateway().await;
    let err = gateway
        .invoke("execute-custom-query", json!({"query": "SELEKT nothing"}))
        .await
        .unwrap_err();
    match &err {
        GatewayError::Query { context, .. } => assert_eq!(context, "SELEKT nothing"),
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(err.to_string().starts_with("Failed to execute custom query: "));
}

// =============================================================================
// Connection release
// =============================================================================

#[tokio::test]
async fn test_many_mixed_calls_leave_gateway_usable() {
    let (gateway, _dir) = setup_gateway().await;

    for i in 0..60 {
        match i % 6 {
            0 => assert_eq!(rows(read(&gateway, "users").await.unwrap()).len(), 3),
            1 => assert!(read(&gateway, "bad name").await.unwrap_err().is_validation()),
            2 => assert!(matches!(
                read(&gateway, "missing_table").await.unwrap_err(),
                GatewayError::Query { .. }
            )),
            3 => assert!(matches!(
                gateway
                    .invoke(
                        "execute-custom-query",
                        json!({"query": "SELECT 1", "databaseName": "nowhere"}),
                    )
                    .await
                    .unwrap_err(),
                GatewayError::Connection { .. }
            )),
            4 => {
                gateway
                    .invoke(
                        "insert-table-data",
                        json!({"tableName": "widgets", "data": {"name": format!("w{i}"), "qty": i}}),
                    )
                    .await
                    .unwrap();
            }
            _ => assert!(matches!(
                gateway
                    .invoke(
                        "insert-table-data",
                        json!({"tableName": "ghosts", "data": {"name": "boo"}}),
                    )
                    .await
                    .unwrap_err(),
                GatewayError::EmptyResult { .. }
            )),
        }
    }

    assert_eq!(rows(read(&gateway, "widgets").await.unwrap()).len(), 10);
}

#[tokio::test]
async fn test_concurrent_reads() {
    let (gateway, _dir) = setup_gateway().await;
    let calls = (0..16).map(|_| read(&gateway, "users"));
    for result in futures_util::future::join_all(calls).await {
        assert_eq!(rows(result.unwrap()).len(), 3);
    }
}

// =============================================================================
// Identifier fuzzing
// =============================================================================

fn matches_identifier_pattern(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn random_name(rng: &mut impl Rng) -> String {
    const ALPHABET: &[char] = &[
        'a', 'Z', 'q', '_', '0', '7', ' ', ';', '\'', '"', '-', '.', '(', '*', 'é', '\0',
    ];
    let len = rng.gen_range(0..12);
    (0..len)
        .map(|_| *ALPHABET.choose(rng).unwrap_or(&'a'))
        .collect()
}

#[tokio::test]
async fn test_fuzz_table_names() {
    let (gateway, _dir) = setup_gateway().await;
    let mut rng = rand::thread_rng();

    for _ in 0..200 {
        let name = random_name(&mut rng);
        let result = read(&gateway, &name).await;
        if matches_identifier_pattern(&name) {
            // Valid names reach the database; none of them exist
            assert!(
                matches!(result, Err(GatewayError::Query { .. })),
                "{name:?}: {result:?}"
            );
        } else {
            assert!(
                matches!(
                    result,
                    Err(GatewayError::InvalidIdentifier {
                        kind: IdentifierKind::Table,
                        ..
                    })
                ),
                "{name:?}: {result:?}"
            );
        }
    }
}
