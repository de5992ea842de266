//! Connection-related data models.
//!
//! This module defines the database backends and the per-call connection
//! target resolved from configuration.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use sqlx::postgres::PgConnectOptions;
use sqlx::sqlite::SqliteConnectOptions;
use std::path::PathBuf;
use std::time::Duration;

/// Supported database backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseBackend {
    /// PostgreSQL server reached over TCP
    #[default]
    Postgres,
    /// SQLite files, one per database name
    Sqlite,
}

impl DatabaseBackend {
    /// Get the display name for this backend.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Postgres => "PostgreSQL",
            Self::Sqlite => "SQLite",
        }
    }
}

impl std::fmt::Display for DatabaseBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Everything needed to open one connection for one tool call.
#[derive(Clone)]
pub struct ConnectionTarget {
    pub backend: DatabaseBackend,
    pub host: String,
    pub port: u16,
    pub user: String,
    /// Sensitive - never log
    pub password: String,
    pub database: String,
    /// Directory holding `<database>.db` files (SQLite only)
    pub sqlite_dir: PathBuf,
    pub connect_timeout: Duration,
}

impl ConnectionTarget {
    /// Path of the SQLite file backing this target's database.
    pub fn sqlite_path(&self) -> PathBuf {
        self.sqlite_dir.join(format!("{}.db", self.database))
    }

    /// Connect options for a PostgreSQL target.
    pub fn pg_options(&self) -> PgConnectOptions {
        let options = PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .database(&self.database);
        if self.password.is_empty() {
            options
        } else {
            options.password(&self.password)
        }
    }

    /// Connect options for a SQLite target. The file must already exist.
    pub fn sqlite_options(&self) -> SqliteConnectOptions {
        SqliteConnectOptions::new()
            .filename(self.sqlite_path())
            .create_if_missing(false)
    }

    /// Display-safe description of the target (no password).
    pub fn describe(&self) -> String {
        match self.backend {
            DatabaseBackend::Postgres => format!(
                "postgres://{}@{}:{}/{}",
                self.user, self.host, self.port, self.database
            ),
            DatabaseBackend::Sqlite => format!("sqlite:{}", self.sqlite_path().display()),
        }
    }
}

impl std::fmt::Debug for ConnectionTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionTarget")
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
