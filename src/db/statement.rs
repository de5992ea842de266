//! Statement construction.
//!
//! Identifiers and values are rendered by separate functions: identifiers
//! must already be validated [`Identifier`]s and are double-quoted, values
//! are rendered as escaped literals. Nothing from a request is ever pasted
//! into a statement any other way.

use crate::models::{DatabaseBackend, Identifier, SqlValue};

/// Quote a validated identifier.
pub fn quote_identifier(ident: &Identifier) -> String {
    format!("\"{}\"", ident.as_str().replace('"', "\"\""))
}

/// Render a value as a SQL literal for the given backend.
///
/// On PostgreSQL numbers and booleans become untyped string literals so the
/// target column's type decides how they are read, the same way a quoted
/// literal typed by hand would be.
pub fn quote_literal(value: &SqlValue, backend: DatabaseBackend) -> String {
    match (value, backend) {
        (SqlValue::Null, _) => "NULL".to_string(),
        (SqlValue::Bool(b), DatabaseBackend::Postgres) => (if *b { "'t'" } else { "'f'" }).to_string(),
        (SqlValue::Bool(b), DatabaseBackend::Sqlite) => (if *b { "1" } else { "0" }).to_string(),
        (SqlValue::Int(i), DatabaseBackend::Postgres) => format!("'{}'", i),
        (SqlValue::Int(i), DatabaseBackend::Sqlite) => i.to_string(),
        (SqlValue::UInt(u), DatabaseBackend::Postgres) => format!("'{}'", u),
        (SqlValue::UInt(u), DatabaseBackend::Sqlite) => u.to_string(),
        (SqlValue::Float(f), backend) => quote_float(*f, backend),
        (SqlValue::Text(s), backend) => quote_string(s, backend),
        (SqlValue::Json(doc), backend) => quote_string(&doc.to_string(), backend),
    }
}

fn quote_float(f: f64, backend: DatabaseBackend) -> String {
    if f.is_nan() {
        return quote_string("NaN", backend);
    }
    if f.is_infinite() {
        // NaN/Infinity only exist as quoted literals
        let text = if f > 0.0 { "Infinity" } else { "-Infinity" };
        return quote_string(text, backend);
    }
    match backend {
        DatabaseBackend::Postgres => format!("'{}'", f),
        DatabaseBackend::Sqlite => format!("{:?}", f),
    }
}

fn quote_string(s: &str, backend: DatabaseBackend) -> String {
    let escaped = s.replace('\'', "''");
    match backend {
        // E'' syntax keeps backslashes literal regardless of standard_conforming_strings
        DatabaseBackend::Postgres if escaped.contains('\\') => {
            format!("E'{}'", escaped.replace('\\', "\\\\"))
        }
        _ => format!("'{}'", escaped),
    }
}

/// `SELECT * FROM "<table>"`
pub fn select_all(table: &Identifier) -> String {
    format!("SELECT * FROM {}", quote_identifier(table))
}

/// `INSERT INTO "<table>" ("<c1>", ...) VALUES (<v1>, ...) RETURNING *`
pub fn insert_returning(
    table: &Identifier,
    values: &[(Identifier, SqlValue)],
    backend: DatabaseBackend,
) -> String {
    let columns = values
        .iter()
        .map(|(column, _)| quote_identifier(column))
        .collect::<Vec<_>>()
        .join(", ");
    let literals = values
        .iter()
        .map(|(_, value)| quote_literal(value, backend))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "INSERT INTO {} ({}) VALUES ({}) RETURNING *",
        quote_identifier(table),
        columns,
        literals
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::IdentifierKind;
    use serde_json::json;

    fn table(name: &str) -> Identifier {
        Identifier::parse(IdentifierKind::Table, name).unwrap()
    }

    fn column(name: &str) -> Identifier {
        Identifier::parse(IdentifierKind::Column, name).unwrap()
    }

    #[test]
    fn test_quote_identifier() {
        assert_eq!(quote_identifier(&table("users")), "\"users\"");
        assert_eq!(quote_identifier(&table("OrderItems")), "\"OrderItems\"");
    }

    #[test]
    fn test_select_all() {
        assert_eq!(select_all(&table("users")), "SELECT * FROM \"users\"");
    }

    #[test]
    fn test_quote_literal_postgres_scalars() {
        let pg = DatabaseBackend::Postgres;
        assert_eq!(quote_literal(&SqlValue::Null, pg), "NULL");
        assert_eq!(quote_literal(&SqlValue::Bool(true), pg), "'t'");
        assert_eq!(quote_literal(&SqlValue::Bool(false), pg), "'f'");
        assert_eq!(quote_literal(&SqlValue::Int(3), pg), "'3'");
        assert_eq!(quote_literal(&SqlValue::Int(-42), pg), "'-42'");
        assert_eq!(quote_literal(&SqlValue::Float(1.5), pg), "'1.5'");
        assert_eq!(quote_literal(&SqlValue::Text("foo".into()), pg), "'foo'");
    }

    #[test]
    fn test_quote_literal_sqlite_scalars() {
        let lite = DatabaseBackend::Sqlite;
        assert_eq!(quote_literal(&SqlValue::Bool(true), lite), "1");
        assert_eq!(quote_literal(&SqlValue::Int(3), lite), "3");
        assert_eq!(quote_literal(&SqlValue::Float(2.0), lite), "2.0");
        assert_eq!(quote_literal(&SqlValue::Text("foo".into()), lite), "'foo'");
    }

    #[test]
    fn test_quote_literal_escapes_quotes() {
        let value = SqlValue::Text("O'Brien'); DROP TABLE users;--".into());
        assert_eq!(
            quote_literal(&value, DatabaseBackend::Postgres),
            "'O''Brien''); DROP TABLE users;--'"
        );
        assert_eq!(
            quote_literal(&value, DatabaseBackend::Sqlite),
            "'O''Brien''); DROP TABLE users;--'"
        );
    }

    #[test]
    fn test_quote_literal_backslashes() {
        let value = SqlValue::Text(r"C:\temp\'x".into());
        assert_eq!(
            quote_literal(&value, DatabaseBackend::Postgres),
            r"E'C:\\temp\\''x'"
        );
        // SQLite has no backslash escapes
        assert_eq!(
            quote_literal(&value, DatabaseBackend::Sqlite),
            r"'C:\temp\''x'"
        );
    }

    #[test]
    fn test_quote_literal_json_document() {
        let value = SqlValue::Json(json!({"tag": "it's"}));
        assert_eq!(
            quote_literal(&value, DatabaseBackend::Postgres),
            r#"'{"tag":"it''s"}'"#
        );
    }

    #[test]
    fn test_quote_literal_non_finite_float() {
        assert_eq!(
            quote_literal(&SqlValue::Float(f64::NAN), DatabaseBackend::Postgres),
            "'NaN'"
        );
    }

    #[test]
    fn test_insert_returning_keeps_column_order() {
        let values = vec![
            (column("name"), SqlValue::Text("foo".into())),
            (column("qty"), SqlValue::Int(3)),
        ];
        assert_eq!(
            insert_returning(&table("widgets"), &values, DatabaseBackend::Postgres),
            "INSERT INTO \"widgets\" (\"name\", \"qty\") VALUES ('foo', '3') RETURNING *"
        );
        assert_eq!(
            insert_returning(&table("widgets"), &values, DatabaseBackend::Sqlite),
            "INSERT INTO \"widgets\" (\"name\", \"qty\") VALUES ('foo', 3) RETURNING *"
        );
    }
}
