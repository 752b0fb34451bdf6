//! Configuration for the ingestion pipeline
//!
//! Everything has a default; the only input a caller must supply is the list
//! of files. Values can be overridden from the environment (and a `.env`
//! file) through [`PipelineConfig::from_env`].

use crate::error::{IngestError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

// ============================================================================
// Pipeline Configuration Constants
// ============================================================================

/// Default store file, relative to the working directory.
pub const DEFAULT_DB_PATH: &str = "processed_logs.db";

/// Default time a writer waits on SQLite's lock before failing, in milliseconds.
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 30_000;

/// Default number of appended rows between commits.
pub const DEFAULT_COMMIT_INTERVAL: usize = 1_000;

/// Where and how rows are written
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// SQLite database file shared by all workers
    pub path: PathBuf,

    /// How long a connection waits for another writer to release the lock
    pub busy_timeout: Duration,

    /// Rows appended between commits within one file
    pub commit_interval: usize,
}

impl StoreConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    pub fn with_busy_timeout(mut self, timeout: Duration) -> Self {
        self.busy_timeout = timeout;
        self
    }

    pub fn with_commit_interval(mut self, interval: usize) -> Self {
        self.commit_interval = interval;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn validate(&self) -> Result<()> {
        if self.path.as_os_str().is_empty() {
            return Err(IngestError::config("Store path cannot be empty"));
        }

        if self.commit_interval == 0 {
            return Err(IngestError::config("Commit interval must be greater than 0"));
        }

        Ok(())
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_DB_PATH),
            busy_timeout: Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS),
            commit_interval: DEFAULT_COMMIT_INTERVAL,
        }
    }
}

/// Pipeline configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub store: StoreConfig,

    /// Upper bound on concurrently running workers. `None` runs one worker per file.
    pub max_workers: Option<usize>,
}

impl PipelineConfig {
    pub fn new(store: StoreConfig) -> Self {
        Self {
            store,
            max_workers: None,
        }
    }

    pub fn with_max_workers(mut self, max_workers: usize) -> Self {
        self.max_workers = Some(max_workers);
        self
    }

    /// Load configuration from environment and defaults
    ///
    /// Environment variables:
    /// - `LOGPIPE_DB_PATH`: store file
    /// - `LOGPIPE_MAX_WORKERS`: concurrency bound
    /// - `LOGPIPE_BUSY_TIMEOUT_MS`: SQLite busy timeout
    /// - `LOGPIPE_COMMIT_INTERVAL`: rows between commits
    ///
    /// Unparseable numbers fall back to the default.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let store = StoreConfig {
            path: std::env::var("LOGPIPE_DB_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_DB_PATH)),
            busy_timeout: Duration::from_millis(
                std::env::var("LOGPIPE_BUSY_TIMEOUT_MS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(DEFAULT_BUSY_TIMEOUT_MS),
            ),
            commit_interval: std::env::var("LOGPIPE_COMMIT_INTERVAL")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_COMMIT_INTERVAL),
        };

        let config = Self {
            store,
            max_workers: std::env::var("LOGPIPE_MAX_WORKERS")
                .ok()
                .and_then(|s| s.parse().ok()),
        };

        config.validate()?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.store.validate()?;

        if self.max_workers == Some(0) {
            return Err(IngestError::config("max_workers must be greater than 0"));
        }

        Ok(())
    }

    /// Number of workers to run for `file_count` inputs
    pub fn concurrency_for(&self, file_count: usize) -> usize {
        let unbounded = file_count.max(1);
        match self.max_workers {
            Some(limit) => unbounded.min(limit.max(1)),
            None => unbounded,
        }
    }
}
