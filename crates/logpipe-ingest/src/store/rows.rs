//! Raw row retrieval

use crate::config::DEFAULT_BUSY_TIMEOUT_MS;
use crate::error::Result;
use logpipe_common::StoredLogRow;
use rusqlite::{Connection, OpenFlags};
use std::path::Path;
use std::time::Duration;

fn open_read_only(path: &Path) -> Result<Connection> {
    let conn = Connection::open_with_flags(
        path,
        OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(conn)
}

/// All rows of the `logs` table, in insertion (`id`) order
pub fn query_rows(conn: &Connection) -> Result<Vec<StoredLogRow>> {
    let mut stmt = conn.prepare("SELECT id, timestamp, level, message FROM logs ORDER BY id ASC")?;

    let rows = stmt
        .query_map([], |row| {
            Ok(StoredLogRow {
                id: row.get(0)?,
                timestamp: row.get(1)?,
                level: row.get(2)?,
                message: row.get(3)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(rows)
}

/// Read every stored row from the database at `path`
pub fn fetch_rows(path: impl AsRef<Path>) -> Result<Vec<StoredLogRow>> {
    let conn = open_read_only(path.as_ref())?;
    query_rows(&conn)
}

/// Number of stored rows in the database at `path`
pub fn count_rows(path: impl AsRef<Path>) -> Result<u64> {
    let conn = open_read_only(path.as_ref())?;
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM logs", [], |row| row.get(0))?;
    Ok(count.max(0) as u64)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::store::schema::init_schema;

    #[test]
    fn test_query_rows_orders_by_id() {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        for (ts, level, msg) in [
            ("2025-01-01 10:00:02", "INFO", "second"),
            ("2025-01-01 10:00:01", "WARN", "first"),
        ] {
            conn.execute(
                "INSERT INTO logs (timestamp, level, message) VALUES (?1, ?2, ?3)",
                [ts, level, msg],
            )
            .unwrap();
        }

        let rows = query_rows(&conn).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].id, 1);
        assert_eq!(rows[0].message, "second");
        assert_eq!(rows[1].level, "WARN");
    }

    #[test]
    fn test_fetch_rows_missing_store_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = fetch_rows(dir.path().join("never-created.db"));
        assert!(result.unwrap_err().is_store());
    }
}
