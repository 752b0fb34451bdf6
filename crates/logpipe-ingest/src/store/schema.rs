//! SQLite schema for ingested logs

use crate::error::Result;
use rusqlite::{Connection, Transaction, TransactionBehavior};

/// Name of the table rows are written to
pub const LOGS_TABLE: &str = "logs";

/// Create the `logs` table if it does not exist yet
///
/// Safe to run on every connection: an existing table is left untouched.
/// Runs in an IMMEDIATE transaction so that concurrent first-time creation
/// waits on the busy handler instead of failing with `SQLITE_BUSY`.
pub fn init_schema(conn: &Connection) -> Result<()> {
    let tx = Transaction::new_unchecked(conn, TransactionBehavior::Immediate)?;
    tx.execute(
        r#"
        CREATE TABLE IF NOT EXISTS logs (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            timestamp TEXT,
            level TEXT,
            message TEXT
        )
        "#,
        [],
    )?;
    tx.commit()?;

    Ok(())
}
