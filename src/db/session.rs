//! Per-call database sessions.
//!
//! Every tool call opens exactly one connection and closes it before the
//! call resolves. There is no pool: a `Session` is owned by the call that
//! opened it, and [`Session::close`] consumes it so it cannot be released
//! twice. If the owning future is dropped mid-call, dropping the session
//! closes the socket.

use crate::error::{GatewayError, GatewayResult};
use crate::models::{ConnectionTarget, DatabaseBackend};
use sqlx::{Connection, PgConnection, SqliteConnection};
use tokio::time::timeout;
use tracing::{debug, warn};

/// An open connection to one database.
#[derive(Debug)]
pub enum Session {
    Postgres(PgConnection),
    Sqlite(SqliteConnection),
}

impl Session {
    /// Open a connection to `target`, bounded by its connect timeout.
    pub async fn open(target: &ConnectionTarget) -> GatewayResult<Self> {
        debug!(target = %target.describe(), "Opening database connection");

        let connect = async {
            match target.backend {
                DatabaseBackend::Postgres => PgConnection::connect_with(&target.pg_options())
                    .await
                    .map(Session::Postgres),
                DatabaseBackend::Sqlite => {
                    SqliteConnection::connect_with(&target.sqlite_options())
                        .await
                        .map(Session::Sqlite)
                }
            }
        };

        match timeout(target.connect_timeout, connect).await {
            Ok(Ok(session)) => Ok(session),
            Ok(Err(e)) => Err(GatewayError::connection_failed(&target.database, &e)),
            Err(_) => Err(GatewayError::Connection {
                database: target.database.clone(),
                message: format!(
                    "Timed out after {}s while connecting",
                    target.connect_timeout.as_secs()
                ),
            }),
        }
    }

    /// Get the backend this session talks to.
    pub fn backend(&self) -> DatabaseBackend {
        match self {
            Session::Postgres(_) => DatabaseBackend::Postgres,
            Session::Sqlite(_) => DatabaseBackend::Sqlite,
        }
    }

    /// Close the connection.
    ///
    /// A failed close is logged and swallowed: it must not replace the
    /// outcome of the statement that ran on this session.
    pub async fn close(self) {
        let backend = self.backend();
        let result = crate::session_dispatch!(self, |conn| conn.close().await);
        match result {
            Ok(()) => debug!(backend = %backend, "Database connection closed"),
            Err(e) => warn!(backend = %backend, error = %e, "Failed to close database connection"),
        }
    }
}
