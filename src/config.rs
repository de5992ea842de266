//! Configuration handling for the database connector.
//!
//! This module provides configuration management via CLI arguments and
//! environment variables. Database settings use the `DB_*` variables, which
//! may also come from a `.env` file loaded at startup.

use crate::models::{ConnectionTarget, DatabaseBackend, Identifier};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_HTTP_HOST: &str = "127.0.0.1";
pub const DEFAULT_HTTP_PORT: u16 = 8080;
pub const DEFAULT_MCP_ENDPOINT: &str = "/";
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

pub const DEFAULT_DB_HOST: &str = "localhost";
pub const DEFAULT_DB_PORT: u16 = 5432;
pub const DEFAULT_DB_USER: &str = "postgres";
pub const DEFAULT_SQLITE_DIR: &str = ".";
/// Database used when neither the call nor the configuration names one.
pub const FALLBACK_DATABASE_NAME: &str = "inventory";

/// Transport mode for the MCP server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum TransportMode {
    /// Standard input/output (for CLI integration)
    #[default]
    Stdio,
    /// HTTP with Server-Sent Events (for web clients)
    Http,
}

impl std::fmt::Display for TransportMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Stdio => write!(f, "stdio"),
            Self::Http => write!(f, "http"),
        }
    }
}

/// Database settings shared by every tool call.
///
/// Host, port, user and password only ever come from here, never from a
/// tool request.
#[derive(Clone)]
pub struct DbSettings {
    pub backend: DatabaseBackend,
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    /// Configured default database name
    pub database: Option<String>,
    pub sqlite_dir: PathBuf,
    pub connect_timeout: Duration,
}

impl DbSettings {
    /// Database name for a call: explicit override > configured default > fallback.
    pub fn database_name(&self, requested: Option<&Identifier>) -> String {
        requested
            .map(|db| db.as_str().to_string())
            .or_else(|| self.database.clone().filter(|name| !name.is_empty()))
            .unwrap_or_else(|| FALLBACK_DATABASE_NAME.to_string())
    }

    /// Resolve the connection target for one call.
    pub fn resolve_target(&self, requested: Option<&Identifier>) -> ConnectionTarget {
        ConnectionTarget {
            backend: self.backend,
            host: self.host.clone(),
            port: self.port,
            user: self.user.clone(),
            password: self.password.clone(),
            database: self.database_name(requested),
            sqlite_dir: self.sqlite_dir.clone(),
            connect_timeout: self.connect_timeout,
        }
    }
}

impl Default for DbSettings {
    fn default() -> Self {
        Config::default().db_settings()
    }
}

impl std::fmt::Debug for DbSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DbSettings")
            .field("backend", &self.backend)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"****")
            .field("database", &self.database)
            .field("sqlite_dir", &self.sqlite_dir)
            .field("connect_timeout", &self.connect_timeout)
            .finish()
    }
}

/// Configuration for the database connector.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "db-connector-mcp",
    about = "MCP server exposing table reads, custom SQL and row inserts as tools",
    version,
    author
)]
pub struct Config {
    /// Database backend (postgres or sqlite)
    #[arg(long, value_enum, default_value = "postgres", env = "DB_BACKEND")]
    pub db_backend: DatabaseBackend,

    /// Database host
    #[arg(long, default_value = DEFAULT_DB_HOST, env = "DB_HOST")]
    pub db_host: String,

    /// Database port
    #[arg(long, default_value_t = DEFAULT_DB_PORT, env = "DB_PORT")]
    pub db_port: u16,

    /// Database user
    #[arg(long, default_value = DEFAULT_DB_USER, env = "DB_USER")]
    pub db_user: String,

    /// Database password
    #[arg(long, default_value = "", env = "DB_PASSWORD", hide_env_values = true)]
    pub db_password: String,

    /// Default database name, used when a tool call does not name one.
    /// Falls back to "inventory".
    #[arg(long, env = "DB_NAME")]
    pub db_name: Option<String>,

    /// Directory holding <name>.db files (sqlite backend only)
    #[arg(long, default_value = DEFAULT_SQLITE_DIR, env = "DB_SQLITE_DIR")]
    pub sqlite_dir: PathBuf,

    /// Connection timeout in seconds
    #[arg(
        long,
        default_value_t = DEFAULT_CONNECT_TIMEOUT_SECS,
        env = "DB_CONNECT_TIMEOUT"
    )]
    pub connect_timeout: u64,

    /// Transport mode (stdio or http)
    #[arg(
        short,
        long,
        value_enum,
        default_value = "stdio",
        env = "MCP_TRANSPORT"
    )]
    pub transport: TransportMode,

    /// HTTP host to bind to (only used with http transport)
    #[arg(
        long,
        default_value = DEFAULT_HTTP_HOST,
        env = "MCP_HTTP_HOST"
    )]
    pub http_host: String,

    /// HTTP port to bind to (only used with http transport)
    #[arg(
        long,
        default_value_t = DEFAULT_HTTP_PORT,
        env = "MCP_HTTP_PORT"
    )]
    pub http_port: u16,

    /// MCP endpoint path (only used with http transport)
    #[arg(
        long,
        default_value = DEFAULT_MCP_ENDPOINT,
        env = "MCP_ENDPOINT"
    )]
    pub mcp_endpoint: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", env = "MCP_LOG_LEVEL")]
    pub log_level: String,

    /// Enable JSON logging format
    #[arg(long, env = "MCP_JSON_LOGS")]
    pub json_logs: bool,
}

impl Config {
    /// Parse configuration from command line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Create a default configuration (useful for testing).
    pub fn default_config() -> Self {
        Self {
            db_backend: DatabaseBackend::Postgres,
            db_host: DEFAULT_DB_HOST.to_string(),
            db_port: DEFAULT_DB_PORT,
            db_user: DEFAULT_DB_USER.to_string(),
            db_password: String::new(),
            db_name: None,
            sqlite_dir: PathBuf::from(DEFAULT_SQLITE_DIR),
            connect_timeout: DEFAULT_CONNECT_TIMEOUT_SECS,
            transport: TransportMode::Stdio,
            http_host: DEFAULT_HTTP_HOST.to_string(),
            http_port: DEFAULT_HTTP_PORT,
            mcp_endpoint: DEFAULT_MCP_ENDPOINT.to_string(),
            log_level: "info".to_string(),
            json_logs: false,
        }
    }

    /// Extract the database settings used by the tool gateway.
    pub fn db_settings(&self) -> DbSettings {
        DbSettings {
            backend: self.db_backend,
            host: self.db_host.clone(),
            port: self.db_port,
            user: self.db_user.clone(),
            password: self.db_password.clone(),
            database: self.db_name.clone(),
            sqlite_dir: self.sqlite_dir.clone(),
            connect_timeout: self.connect_timeout_duration(),
        }
    }

    /// Get the connection timeout as a Duration.
    pub fn connect_timeout_duration(&self) -> Duration {
        Duration::from_secs(self.connect_timeout)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::default_config()
    }
}
