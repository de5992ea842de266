//! Error types for the database connector.
//!
//! This module defines all error types using `thiserror`. Driver errors are
//! classified by the phase in which they happened: anything raised while
//! opening a connection is a [`GatewayError::Connection`], anything raised by
//! a statement is a [`GatewayError::Query`].

use std::fmt;
use thiserror::Error;

/// The position a validated name is used in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentifierKind {
    Table,
    Column,
    Database,
}

impl fmt::Display for IdentifierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Table => write!(f, "table"),
            Self::Column => write!(f, "column"),
            Self::Database => write!(f, "database"),
        }
    }
}

#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Invalid {kind} name: {value}")]
    InvalidIdentifier { kind: IdentifierKind, value: String },

    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("Unknown tool: {name}")]
    UnknownOperation { name: String },

    #[error("Failed to connect to database '{database}': {message}")]
    Connection { database: String, message: String },

    #[error("{action}: {message}")]
    Query {
        /// e.g. "Failed to retrieve data from table users"
        action: String,
        /// Table name or query text the statement was built from
        context: String,
        message: String,
        /// e.g. "42P01" for undefined table
        sql_state: Option<String>,
    },

    #[error("Insert into table {table} returned no row")]
    EmptyResult { table: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl GatewayError {
    /// Create an invalid identifier error.
    pub fn invalid_identifier(kind: IdentifierKind, value: impl Into<String>) -> Self {
        Self::InvalidIdentifier {
            kind,
            value: value.into(),
        }
    }

    /// Create an invalid input error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Create an unknown operation error.
    pub fn unknown_operation(name: impl Into<String>) -> Self {
        Self::UnknownOperation { name: name.into() }
    }

    /// Wrap a driver error raised while connecting.
    pub fn connection_failed(database: impl Into<String>, err: &sqlx::Error) -> Self {
        Self::Connection {
            database: database.into(),
            message: driver_message(err),
        }
    }

    /// Wrap a driver error raised by a statement.
    pub fn query_failed(
        action: impl Into<String>,
        context: impl Into<String>,
        err: &sqlx::Error,
    ) -> Self {
        let sql_state = match err {
            sqlx::Error::Database(db_err) => db_err.code().map(|c| c.to_string()),
            _ => None,
        };
        Self::Query {
            action: action.into(),
            context: context.into(),
            message: driver_message(err),
            sql_state,
        }
    }

    /// Create an empty result error.
    pub fn empty_result(table: impl Into<String>) -> Self {
        Self::EmptyResult {
            table: table.into(),
        }
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// True for errors raised before any connection was attempted.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InvalidIdentifier { .. } | Self::InvalidInput { .. } | Self::UnknownOperation { .. }
        )
    }

    /// SQLSTATE reported by the database, if any.
    pub fn sql_state(&self) -> Option<&str> {
        match self {
            Self::Query { sql_state, .. } => sql_state.as_deref(),
            _ => None,
        }
    }
}

/// Extract the message a caller should see from a driver error.
///
/// Database errors carry the server's own message; everything else falls back
/// to the driver's display text.
fn driver_message(err: &sqlx::Error) -> String {
    match err {
        sqlx::Error::Database(db_err) => db_err.message().to_string(),
        sqlx::Error::Io(io_err) => format!("I/O error: {}", io_err),
        sqlx::Error::Tls(tls_err) => format!("TLS error: {}", tls_err),
        sqlx::Error::Protocol(msg) => format!("Protocol error: {}", msg),
        sqlx::Error::Configuration(msg) => format!("Configuration error: {}", msg),
        other => other.to_string(),
    }
}

/// Result type alias for gateway operations.
pub type GatewayResult<T> = Result<T, GatewayError>;
