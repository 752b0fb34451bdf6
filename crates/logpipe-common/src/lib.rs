//! Logpipe Common Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Shared types and logging setup for the logpipe workspace.
//!
//! # Overview
//!
//! - **Types**: the structured log record and its persisted row form
//! - **Logging**: `tracing` subscriber configuration shared by every binary
//!
//! # Example
//!
//! ```no_run
//! use logpipe_common::logging::{init_logging, LogConfig};
//! use logpipe_common::LogRecord;
//!
//! fn main() -> anyhow::Result<()> {
//!     init_logging(&LogConfig::from_env()?)?;
//!     let record = LogRecord::new("2025-01-01 10:00:00", "ERROR", "disk full");
//!     tracing::info!(level = %record.level, "parsed");
//!     Ok(())
//! }
//! ```

pub mod logging;
pub mod types;

// Re-export commonly used types
pub use types::{LogRecord, StoredLogRow};
