//! Logpipe Ingest Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Streams plain-text server logs, extracts `<timestamp> - <level> - <message>`
//! records, and appends them to a SQLite `logs` table. Several files are
//! ingested in parallel into one shared store.
//!
//! # Pipeline
//!
//! - [`source::LineSource`]: buffered, trimmed lines from one file
//! - [`parser::RecordParser`]: line to [`LogRecord`], or a silent miss
//! - [`store::StoreHandle`]: one connection, schema on open, commit on release
//! - [`ingestor::FileIngestor`]: one file end to end
//! - [`coordinator::PipelineCoordinator`]: one worker per file, joined
//!
//! # Example
//!
//! ```no_run
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let summary =
//!         logpipe_ingest::ingest_files(["server_log1.txt", "server_log2.txt"], "processed_logs.db")
//!             .await;
//!
//!     for failed in summary.failed() {
//!         eprintln!("{}: {:?}", failed.path.display(), failed.error());
//!     }
//!
//!     for row in logpipe_ingest::store::fetch_rows("processed_logs.db")? {
//!         println!("{} {} {}", row.timestamp, row.level, row.message);
//!     }
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod coordinator;
pub mod error;
pub mod execution;
pub mod ingestor;
pub mod parser;
pub mod source;
pub mod store;

// Re-export commonly used types
pub use config::{PipelineConfig, StoreConfig};
pub use coordinator::{ingest_files, FileOutcome, PipelineCoordinator, PipelineSummary};
pub use error::{IngestError, Result};
pub use ingestor::{ingest_file, FileIngestor, IngestReport};
pub use logpipe_common::{LogRecord, StoredLogRow};
pub use parser::{parse_line, RecordParser};
pub use source::LineSource;
pub use store::StoreHandle;
