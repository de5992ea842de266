//! Row decoding.
//!
//! This module turns driver rows into JSON maps.
//!
//! # Architecture
//!
//! Type conversion uses a two-phase approach:
//! 1. `TypeCategory` classifies column types into logical categories
//! 2. Backend-specific decoders handle the actual value extraction
//!
//! Every statement this crate runs goes through the simple-query path, so
//! PostgreSQL values arrive in text format. Types without a dedicated decoder
//! fall back to that text.

use crate::models::{DatabaseBackend, JsonRow};
use serde_json::Value as JsonValue;
use sqlx::postgres::{PgRow, PgTypeInfo, PgValueRef};
use sqlx::sqlite::SqliteRow;
use sqlx::{Column, Decode, Row, Type, TypeInfo, ValueRef};

// =============================================================================
// Type Classification
// =============================================================================

/// Logical category for database column types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeCategory {
    Integer,
    Float,
    Decimal,
    Boolean,
    Text,
    Binary,
    Json,
    Uuid,
    Timestamp,
    TimestampTz,
    Date,
    Time,
    Unknown,
}

/// Classify a database type name into a logical category.
pub fn categorize_type(type_name: &str, db: DatabaseBackend) -> TypeCategory {
    let lower = type_name.to_lowercase();

    // Temporal types first: "interval" and "timestamp" would otherwise match below
    match lower.as_str() {
        "timestamptz" | "timestamp with time zone" => return TypeCategory::TimestampTz,
        "timestamp" | "timestamp without time zone" | "datetime" => {
            return TypeCategory::Timestamp;
        }
        "date" => return TypeCategory::Date,
        "time" | "time without time zone" => return TypeCategory::Time,
        "interval" | "timetz" => return TypeCategory::Text,
        _ => {}
    }

    // Decimal/Numeric - check first as it overlaps with "numeric" in float checks
    if lower.contains("decimal") || lower.contains("numeric") {
        // SQLite's NUMERIC is actually a float
        if db == DatabaseBackend::Sqlite && lower == "numeric" {
            return TypeCategory::Float;
        }
        return TypeCategory::Decimal;
    }

    // Integer types
    if lower.contains("int") || lower.contains("serial") {
        return TypeCategory::Integer;
    }

    // Boolean
    if lower == "bool" || lower == "boolean" {
        return TypeCategory::Boolean;
    }

    // Float types
    if lower.contains("float") || lower.contains("double") || lower == "real" {
        return TypeCategory::Float;
    }

    // JSON types
    if lower == "json" || lower == "jsonb" {
        return TypeCategory::Json;
    }

    if lower == "uuid" {
        return TypeCategory::Uuid;
    }

    // Binary types
    if lower.contains("blob") || lower.contains("binary") || lower == "bytea" {
        return TypeCategory::Binary;
    }

    if lower.contains("char") || lower.contains("text") || lower == "name" {
        return TypeCategory::Text;
    }

    TypeCategory::Unknown
}

// =============================================================================
// Text Fallback
// =============================================================================

/// Wrapper type for the raw text of a PostgreSQL value.
/// Used for NUMERIC (to keep exact precision) and for types with no decoder.
#[derive(Debug)]
pub struct RawText(pub String);

impl Type<sqlx::Postgres> for RawText {
    fn type_info() -> PgTypeInfo {
        <String as Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(_ty: &PgTypeInfo) -> bool {
        true
    }
}

impl<'r> Decode<'r, sqlx::Postgres> for RawText {
    fn decode(value: PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <&str as Decode<sqlx::Postgres>>::decode(value)?;
        Ok(RawText(s.to_string()))
    }
}

// =============================================================================
// Binary Encoding
// =============================================================================

/// Decode binary data to JSON value.
///
/// Valid UTF-8 is returned as text, anything else as base64.
pub fn decode_binary_value(bytes: &[u8]) -> JsonValue {
    use base64::{Engine as _, engine::general_purpose::STANDARD};

    match std::str::from_utf8(bytes) {
        Ok(s) => JsonValue::String(s.to_string()),
        Err(_) => JsonValue::String(STANDARD.encode(bytes)),
    }
}

fn float_value(v: f64) -> JsonValue {
    serde_json::Number::from_f64(v)
        .map(JsonValue::Number)
        .unwrap_or_else(|| JsonValue::String(v.to_string()))
}

// =============================================================================
// Row to JSON Trait
// =============================================================================

/// Trait for converting database rows to JSON maps.
pub trait RowToJson {
    fn to_json_map(&self) -> JsonRow;
}

impl RowToJson for PgRow {
    fn to_json_map(&self) -> JsonRow {
        self.columns()
            .iter()
            .enumerate()
            .map(|(idx, col)| {
                let category = categorize_type(col.type_info().name(), DatabaseBackend::Postgres);
                let value = postgres::decode_column(self, idx, category);
                (col.name().to_string(), value)
            })
            .collect()
    }
}

impl RowToJson for SqliteRow {
    fn to_json_map(&self) -> JsonRow {
        self.columns()
            .iter()
            .enumerate()
            .map(|(idx, col)| {
                let declared = categorize_type(col.type_info().name(), DatabaseBackend::Sqlite);
                let value = sqlite::decode_column(self, idx, declared);
                (col.name().to_string(), value)
            })
            .collect()
    }
}

// =============================================================================
// Backend-Specific Decoders
// =============================================================================

mod postgres {
    use super::*;
    use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
    use sqlx::types::Uuid;

    pub fn decode_column(row: &PgRow, idx: usize, category: TypeCategory) -> JsonValue {
        match row.try_get_raw(idx) {
            Ok(raw) if raw.is_null() => return JsonValue::Null,
            Ok(_) => {}
            Err(e) => {
                tracing::error!("Failed to read column {}: {:?}", idx, e);
                return JsonValue::Null;
            }
        }
        let decoded = match category {
            TypeCategory::Decimal => decode_text(row, idx),
            TypeCategory::Integer => decode_integer(row, idx),
            TypeCategory::Boolean => row.try_get::<bool, _>(idx).ok().map(JsonValue::Bool),
            TypeCategory::Float => decode_float(row, idx),
            TypeCategory::Binary => row
                .try_get::<Vec<u8>, _>(idx)
                .ok()
                .map(|v| decode_binary_value(&v)),
            TypeCategory::Json => row.try_get::<JsonValue, _>(idx).ok(),
            TypeCategory::Uuid => row
                .try_get::<Uuid, _>(idx)
                .ok()
                .map(|v| JsonValue::String(v.to_string())),
            TypeCategory::TimestampTz => row
                .try_get::<DateTime<Utc>, _>(idx)
                .ok()
                .map(|v| JsonValue::String(v.to_rfc3339())),
            TypeCategory::Timestamp => row
                .try_get::<NaiveDateTime, _>(idx)
                .ok()
                .map(|v| JsonValue::String(v.format("%Y-%m-%dT%H:%M:%S%.f").to_string())),
            TypeCategory::Date => row
                .try_get::<NaiveDate, _>(idx)
                .ok()
                .map(|v| JsonValue::String(v.to_string())),
            TypeCategory::Time => row
                .try_get::<NaiveTime, _>(idx)
                .ok()
                .map(|v| JsonValue::String(v.to_string())),
            TypeCategory::Text | TypeCategory::Unknown => None,
        };
        decoded
            .or_else(|| decode_text(row, idx))
            .unwrap_or(JsonValue::Null)
    }

    fn decode_integer(row: &PgRow, idx: usize) -> Option<JsonValue> {
        if let Ok(v) = row.try_get::<i16, _>(idx) {
            return Some(JsonValue::Number(v.into()));
        }
        if let Ok(v) = row.try_get::<i32, _>(idx) {
            return Some(JsonValue::Number(v.into()));
        }
        if let Ok(v) = row.try_get::<i64, _>(idx) {
            return Some(JsonValue::Number(v.into()));
        }
        None
    }

    fn decode_float(row: &PgRow, idx: usize) -> Option<JsonValue> {
        if let Ok(v) = row.try_get::<f64, _>(idx) {
            return Some(float_value(v));
        }
        if let Ok(v) = row.try_get::<f32, _>(idx) {
            return Some(float_value(v as f64));
        }
        None
    }

    fn decode_text(row: &PgRow, idx: usize) -> Option<JsonValue> {
        match row.try_get::<RawText, _>(idx) {
            Ok(v) => Some(JsonValue::String(v.0)),
            Err(e) => {
                tracing::error!("Failed to decode column {} as text: {:?}", idx, e);
                None
            }
        }
    }
}

mod sqlite {
    use super::*;

    /// SQLite columns are dynamically typed, so the stored value's own type
    /// decides the decoder; the declared type only refines booleans. Text is
    /// returned as stored, JSON documents included.
    pub fn decode_column(row: &SqliteRow, idx: usize, declared: TypeCategory) -> JsonValue {
        let storage = match row.try_get_raw(idx) {
            Ok(raw) if raw.is_null() => return JsonValue::Null,
            Ok(raw) => raw.type_info().name().to_uppercase(),
            Err(e) => {
                tracing::error!("Failed to read column {}: {:?}", idx, e);
                return JsonValue::Null;
            }
        };

        match storage.as_str() {
            "INTEGER" | "BOOLEAN" | "INT8" => decode_integer(row, idx, declared),
            "REAL" => row
                .try_get::<f64, _>(idx)
                .map(float_value)
                .unwrap_or(JsonValue::Null),
            "BLOB" => row
                .try_get::<Vec<u8>, _>(idx)
                .map(|v| decode_binary_value(&v))
                .unwrap_or(JsonValue::Null),
            _ => row
                .try_get::<String, _>(idx)
                .map(JsonValue::String)
                .unwrap_or(JsonValue::Null),
        }
    }

    fn decode_integer(row: &SqliteRow, idx: usize, declared: TypeCategory) -> JsonValue {
        match row.try_get::<i64, _>(idx) {
            Ok(v) if declared == TypeCategory::Boolean => JsonValue::Bool(v != 0),
            Ok(v) => JsonValue::Number(v.into()),
            Err(_) => JsonValue::Null,
        }
    }
}
