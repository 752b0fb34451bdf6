//! Single-file ingestion
//!
//! [`FileIngestor`] drives one file through the pipeline: stream lines,
//! parse them, append the matches to the store, then commit and close.

use crate::config::StoreConfig;
use crate::error::Result;
use crate::execution::log_execution;
use crate::parser::RecordParser;
use crate::source::LineSource;
use crate::store::StoreHandle;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info_span, warn};

/// Counters for one ingested file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestReport {
    pub path: PathBuf,
    pub lines_read: u64,
    pub records_stored: u64,
    /// Lines that did not match the log pattern
    pub lines_skipped: u64,
}

impl IngestReport {
    fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            lines_read: 0,
            records_stored: 0,
            lines_skipped: 0,
        }
    }
}

/// Ingests files into one store target
#[derive(Debug, Clone)]
pub struct FileIngestor {
    store: StoreConfig,
    parser: RecordParser,
}

impl FileIngestor {
    pub fn new(store: StoreConfig) -> Self {
        Self {
            store,
            parser: RecordParser::new(),
        }
    }

    pub fn store(&self) -> &StoreConfig {
        &self.store
    }

    /// Ingest `path` end to end
    ///
    /// Rows appended before a failure stay committed. An unreadable file
    /// yields [`IngestError::Io`](crate::IngestError::Io), a store failure
    /// [`IngestError::Store`](crate::IngestError::Store).
    pub fn ingest(&self, path: &Path) -> Result<IngestReport> {
        let subject = path.display().to_string();
        let _span = info_span!("ingest_file", path = %subject).entered();

        log_execution("ingest_file", &subject, || self.run(path))
    }

    fn run(&self, path: &Path) -> Result<IngestReport> {
        let mut store = StoreHandle::open(&self.store)?;
        let streamed = self.stream_into(path, &mut store);
        let released = store.release();

        match (streamed, released) {
            (Ok(report), Ok(_)) => Ok(report),
            (Ok(_), Err(e)) | (Err(e), Ok(_)) => Err(e),
            (Err(e), Err(release_err)) => {
                warn!(error = %release_err, "Store release also failed after ingestion error");
                Err(e)
            },
        }
    }

    fn stream_into(&self, path: &Path, store: &mut StoreHandle) -> Result<IngestReport> {
        let mut report = IngestReport::new(path);

        for line in LineSource::open(path)? {
            let line = line?;
            report.lines_read += 1;

            match self.parser.parse(&line) {
                Some(record) => {
                    store.append(&record)?;
                    report.records_stored += 1;
                },
                None => report.lines_skipped += 1,
            }
        }

        debug!(
            lines_read = report.lines_read,
            records_stored = report.records_stored,
            lines_skipped = report.lines_skipped,
            "Reached end of file"
        );

        Ok(report)
    }
}

/// Ingest one file into the store described by `store`
pub fn ingest_file(path: impl AsRef<Path>, store: &StoreConfig) -> Result<IngestReport> {
    FileIngestor::new(store.clone()).ingest(path.as_ref())
}
