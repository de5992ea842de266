//! Database access layer.
//!
//! This module provides:
//! - Per-call sessions over PostgreSQL or SQLite
//! - Statement construction from validated identifiers and escaped literals
//! - Statement execution
//! - Row to JSON type mappings

#[macro_use]
pub mod macros;
pub mod executor;
pub mod session;
pub mod statement;
pub mod types;

pub use executor::fetch_rows;
pub use session::Session;
pub use statement::{insert_returning, quote_identifier, quote_literal, select_all};
pub use types::RowToJson;
