//! Validated tool requests.
//!
//! Tool inputs arrive as loosely typed JSON. Each one is turned into one of
//! the fixed request variants below before anything touches the database;
//! every name used in an identifier position is an [`Identifier`] by then.

use crate::error::{GatewayError, GatewayResult};
use crate::models::{Identifier, SqlValue};
use std::fmt;
use std::str::FromStr;

/// The three operations exposed as tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolOperation {
    ReadTable,
    RawQuery,
    InsertRow,
}

impl ToolOperation {
    pub const ALL: [ToolOperation; 3] = [Self::ReadTable, Self::RawQuery, Self::InsertRow];

    /// The MCP tool name for this operation.
    pub fn tool_name(&self) -> &'static str {
        match self {
            Self::ReadTable => "get-table-data",
            Self::RawQuery => "execute-custom-query",
            Self::InsertRow => "insert-table-data",
        }
    }
}

impl fmt::Display for ToolOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tool_name())
    }
}

impl FromStr for ToolOperation {
    type Err = GatewayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|op| op.tool_name() == s)
            .ok_or_else(|| GatewayError::unknown_operation(s))
    }
}

/// Read every row of one table.
#[derive(Debug, Clone)]
pub struct ReadTableRequest {
    pub table: Identifier,
    pub database: Option<Identifier>,
}

/// Run caller-supplied SQL verbatim.
#[derive(Debug, Clone)]
pub struct RawQueryRequest {
    pub sql: String,
    pub database: Option<Identifier>,
}

/// Insert one row and return it.
#[derive(Debug, Clone)]
pub struct InsertRowRequest {
    pub table: Identifier,
    /// Column/value pairs in the caller's order. Never empty.
    pub values: Vec<(Identifier, SqlValue)>,
    pub database: Option<Identifier>,
}

impl InsertRowRequest {
    /// Build an insert request, rejecting an empty column list.
    pub fn new(
        table: Identifier,
        values: Vec<(Identifier, SqlValue)>,
        database: Option<Identifier>,
    ) -> GatewayResult<Self> {
        if values.is_empty() {
            return Err(GatewayError::invalid_input(format!(
                "No data provided for insert into table {}",
                table
            )));
        }
        Ok(Self {
            table,
            values,
            database,
        })
    }

    pub fn columns(&self) -> impl Iterator<Item = &Identifier> {
        self.values.iter().map(|(c, _)| c)
    }
}

/// A fully validated request for one of the three operations.
#[derive(Debug, Clone)]
pub enum ToolRequest {
    ReadTable(ReadTableRequest),
    RawQuery(RawQueryRequest),
    InsertRow(InsertRowRequest),
}

impl ToolRequest {
    pub fn operation(&self) -> ToolOperation {
        match self {
            Self::ReadTable(_) => ToolOperation::ReadTable,
            Self::RawQuery(_) => ToolOperation::RawQuery,
            Self::InsertRow(_) => ToolOperation::InsertRow,
        }
    }

    /// The database override carried by the request, if any.
    pub fn database(&self) -> Option<&Identifier> {
        match self {
            Self::ReadTable(r) => r.database.as_ref(),
            Self::RawQuery(r) => r.database.as_ref(),
            Self::InsertRow(r) => r.database.as_ref(),
        }
    }
}
