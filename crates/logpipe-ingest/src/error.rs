//! Error types for log ingestion
//!
//! A line that does not match the log pattern is not an error: the parser
//! returns `None` for it and the line is dropped. Everything here aborts the
//! ingestion of one file only.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type alias for ingestion operations
pub type Result<T> = std::result::Result<T, IngestError>;

#[derive(Error, Debug)]
pub enum IngestError {
    /// Source file missing, unreadable, or not valid UTF-8
    #[error("Failed to read log file '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Table creation, insert, commit, or close failed
    #[error("Store error: {0}")]
    Store(#[from] rusqlite::Error),

    /// The directory holding the store file could not be created
    #[error("Failed to prepare store location '{}': {source}", path.display())]
    StorePath {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Worker for '{}' terminated abnormally: {message}", path.display())]
    WorkerPanicked { path: PathBuf, message: String },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl IngestError {
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// True for failures reading the source file
    pub fn is_io(&self) -> bool {
        matches!(self, Self::Io { .. })
    }

    /// True for failures of the store itself
    pub fn is_store(&self) -> bool {
        matches!(self, Self::Store(_) | Self::StorePath { .. })
    }
}
