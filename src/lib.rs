//! Database Connector MCP Server Library
//!
//! This library exposes a relational database to AI assistants through three
//! MCP (Model Context Protocol) tools: read a table, run custom SQL, and
//! insert a row. PostgreSQL and SQLite are supported.

pub mod config;
pub mod db;
pub mod error;
pub mod mcp;
pub mod models;
pub mod tools;
pub mod transport;

pub use config::Config;
pub use error::{GatewayError, GatewayResult};
pub use mcp::GatewayService;
pub use tools::ToolGateway;
