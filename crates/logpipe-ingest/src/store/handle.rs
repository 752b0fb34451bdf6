//! Scoped write access to the log store

use crate::config::StoreConfig;
use crate::error::{IngestError, Result};
use crate::store::schema;
use logpipe_common::LogRecord;
use rusqlite::{params, Connection};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

const INSERT_SQL: &str = "INSERT INTO logs (timestamp, level, message) VALUES (?1, ?2, ?3)";

/// One connection to the store, owned by one ingestion call
///
/// Rows are written inside a transaction that is opened on the first
/// [`append`](Self::append) and committed every `commit_interval` rows.
/// [`release`](Self::release) commits whatever is pending and reports
/// failures; if the handle is dropped without being released (early return
/// or panic) the pending rows are still committed before the connection
/// closes. Rows are never rolled back.
pub struct StoreHandle {
    conn: Connection,
    path: PathBuf,
    commit_interval: usize,
    pending: usize,
    appended: u64,
    released: bool,
}

impl StoreHandle {
    /// Open the store and make sure the `logs` table exists
    pub fn open(config: &StoreConfig) -> Result<Self> {
        config.validate()?;
        let path = config.path();

        // Create parent directory if needed
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| IngestError::StorePath {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let conn = Connection::open(path)?;
        conn.busy_timeout(config.busy_timeout)?;
        schema::init_schema(&conn)?;

        debug!(store = %path.display(), "Opened store connection");

        Ok(Self {
            conn,
            path: path.to_path_buf(),
            commit_interval: config.commit_interval,
            pending: 0,
            appended: 0,
            released: false,
        })
    }

    /// Insert one record, returning the id the store assigned to it
    pub fn append(&mut self, record: &LogRecord) -> Result<i64> {
        if self.conn.is_autocommit() {
            // IMMEDIATE takes the write lock up front so waits go through the busy handler
            self.conn.execute_batch("BEGIN IMMEDIATE")?;
        }

        self.conn
            .prepare_cached(INSERT_SQL)?
            .execute(params![record.timestamp, record.level, record.message])?;
        let id = self.conn.last_insert_rowid();

        self.pending += 1;
        self.appended += 1;

        if self.pending >= self.commit_interval {
            self.commit()?;
        }

        Ok(id)
    }

    /// Commit pending rows, if any
    pub fn commit(&mut self) -> Result<()> {
        if !self.conn.is_autocommit() {
            self.conn.execute_batch("COMMIT")?;
            debug!(store = %self.path.display(), rows = self.pending, "Committed rows");
        }
        self.pending = 0;
        Ok(())
    }

    /// Commit pending rows and close the connection
    ///
    /// Returns the number of rows appended through this handle.
    pub fn release(mut self) -> Result<u64> {
        // Set first so a failed commit is not retried from Drop
        self.released = true;
        self.commit()?;
        Ok(self.appended)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Rows appended so far, committed or not
    pub fn appended(&self) -> u64 {
        self.appended
    }

    /// Rows appended since the last commit
    pub fn pending(&self) -> usize {
        self.pending
    }
}

impl Drop for StoreHandle {
    fn drop(&mut self) {
        if self.released {
            return;
        }

        if let Err(e) = self.commit() {
            warn!(
                store = %self.path.display(),
                pending = self.pending,
                error = %e,
                "Failed to commit pending rows while dropping store handle"
            );
        }
    }
}
