//! Database connection management
//!
//! Provides utilities for opening and configuring SQLite connections

use rusqlite::Connection;
use std::path::Path;
use std::time::Duration;

use crate::config::DatabaseConfig;
use crate::errors::{from_rusqlite, io_error, Result};

/// How long a writer waits on a locked database before failing
pub const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Open a SQLite database at the given path, creating missing parent
/// directories
pub fn open<P: AsRef<Path>>(path: P) -> Result<Connection> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| io_error("open_database", e))?;
    }
    let conn = Connection::open(path).map_err(from_rusqlite)?;
    configure(&conn)?;
    Ok(conn)
}

/// Open an in-memory SQLite database (for testing)
pub fn open_in_memory() -> Result<Connection> {
    let conn = Connection::open_in_memory().map_err(from_rusqlite)?;
    configure(&conn)?;
    Ok(conn)
}

/// Open the database named by `config`
pub fn connect(config: &DatabaseConfig) -> Result<Connection> {
    tracing::debug!(url = %config.redacted_connection_string(), "connecting");
    if config.is_in_memory() {
        open_in_memory()
    } else {
        open(&config.name)
    }
}

/// Configure a connection
///
/// Foreign keys on, a bounded busy wait, and WAL journaling for file
/// databases (in-memory databases keep their `memory` journal).
pub fn configure(conn: &Connection) -> Result<()> {
    conn.pragma_update(None, "foreign_keys", "ON")
        .map_err(from_rusqlite)?;
    conn.busy_timeout(BUSY_TIMEOUT).map_err(from_rusqlite)?;

    let mode: String = conn
        .pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))
        .map_err(from_rusqlite)?;
    tracing::debug!(journal_mode = %mode, "connection configured");

    Ok(())
}
