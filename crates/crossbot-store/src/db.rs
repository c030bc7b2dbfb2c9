//! Database connection management
//!
//! Connections are short-lived: one is opened per store operation and
//! dropped when it returns.

#![allow(clippy::result_large_err)]

use crate::errors::{from_rusqlite, Result};
use rusqlite::{Connection, OpenFlags};
use std::path::Path;
use std::time::Duration;

/// How long a writer waits on a locked database before failing
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Open a SQLite database at the given path, creating it if needed
pub fn open<P: AsRef<Path>>(path: P) -> Result<Connection> {
    Connection::open(path).map_err(from_rusqlite)
}

/// Open an in-memory SQLite database (for testing)
pub fn open_in_memory() -> Result<Connection> {
    Connection::open_in_memory().map_err(from_rusqlite)
}

/// Open an existing database without write access
///
/// Used by query workers: any statement that would modify the file fails
/// with `SQLITE_READONLY`.
pub fn open_read_only<P: AsRef<Path>>(path: P) -> Result<Connection> {
    Connection::open_with_flags(
        path,
        OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )
    .map_err(from_rusqlite)
}

/// Configure a read-write connection
pub fn configure(conn: &Connection) -> Result<()> {
    conn.busy_timeout(BUSY_TIMEOUT).map_err(from_rusqlite)?;

    // journal_mode returns a row, so it can't go through execute()
    conn.query_row("PRAGMA journal_mode = WAL", [], |_| Ok(()))
        .map_err(from_rusqlite)?;

    Ok(())
}

/// Cap the memory SQLite may allocate on this connection's behalf
///
/// Allocations beyond the limit fail with `SQLITE_NOMEM`, which surfaces as an
/// ordinary query error.
pub fn limit_heap(conn: &Connection, bytes: u64) -> Result<()> {
    conn.query_row(&format!("PRAGMA hard_heap_limit = {}", bytes), [], |_| Ok(()))
        .map_err(from_rusqlite)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_only_connection_rejects_writes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ro.db");
        {
            let conn = open(&path).unwrap();
            conn.execute("CREATE TABLE t (x INTEGER)", []).unwrap();
        }

        let ro = open_read_only(&path).unwrap();
        let err = ro.execute("INSERT INTO t VALUES (1)", []).unwrap_err();
        assert!(err.to_string().to_lowercase().contains("readonly"));
    }

    #[test]
    fn test_configure_is_repeatable() {
        let dir = tempfile::tempdir().unwrap();
        let conn = open(dir.path().join("wal.db")).unwrap();
        configure(&conn).unwrap();
        configure(&conn).unwrap();
    }
}
