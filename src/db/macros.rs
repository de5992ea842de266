//! Session dispatch macro for reducing code duplication.
//!
//! The PostgreSQL and SQLite connection types share the sqlx `Executor` and
//! `Connection` traits but not a concrete type, so code that works on either
//! is written once and expanded into one match arm per backend.

/// Run the same body against whichever connection a `Session` holds.
///
/// # Example
///
/// ```ignore
/// let rows = session_dispatch!(&mut session, |conn| {
///     conn.fetch_all(sql).await?.len()
/// });
/// ```
#[macro_export]
macro_rules! session_dispatch {
    ($session:expr, |$conn:ident| $body:expr) => {
        match $session {
            $crate::db::session::Session::Postgres($conn) => $body,
            $crate::db::session::Session::Sqlite($conn) => $body,
        }
    };
}
