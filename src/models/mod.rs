//! Data models for the database connector.
//!
//! This module re-exports all model types used throughout the application.

pub mod connection;
pub mod identifier;
pub mod payload;
pub mod request;
pub mod value;

// Re-export commonly used types
pub use connection::{ConnectionTarget, DatabaseBackend};
pub use identifier::{Identifier, is_valid_identifier};
pub use payload::{JsonRow, ToolPayload};
pub use request::{InsertRowRequest, RawQueryRequest, ReadTableRequest, ToolOperation, ToolRequest};
pub use value::SqlValue;
