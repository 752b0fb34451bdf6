//! Concurrent multi-file ingestion
//!
//! Orchestrates one worker per input file:
//! 1. Spawn: each file gets a [`FileIngestor`] on its own blocking thread
//! 2. Join: wait for every worker, successful or not
//! 3. Report: one [`FileOutcome`] per file, in input order
//!
//! Workers share nothing but the store path. A failing or panicking worker
//! never cancels its siblings.

use crate::config::PipelineConfig;
use crate::error::{IngestError, Result};
use crate::execution::{log_execution_async, ExecutionStatus};
use crate::ingestor::{FileIngestor, IngestReport};
use futures::stream::{self, StreamExt};
use std::path::PathBuf;
use tokio::task::JoinError;
use tracing::{error, info, info_span, Instrument, Span};
use uuid::Uuid;

/// Result of ingesting one file
#[derive(Debug)]
pub struct FileOutcome {
    pub path: PathBuf,
    pub result: Result<IngestReport>,
}

impl FileOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }

    pub fn error(&self) -> Option<&IngestError> {
        self.result.as_ref().err()
    }
}

/// Per-file outcomes of one pipeline run
#[derive(Debug)]
pub struct PipelineSummary {
    /// Correlates this run's log events
    pub run_id: Uuid,
    pub outcomes: Vec<FileOutcome>,
}

impl PipelineSummary {
    pub fn is_success(&self) -> bool {
        self.outcomes.iter().all(FileOutcome::is_success)
    }

    pub fn succeeded(&self) -> impl Iterator<Item = &IngestReport> {
        self.outcomes.iter().filter_map(|o| o.result.as_ref().ok())
    }

    pub fn failed(&self) -> impl Iterator<Item = &FileOutcome> {
        self.outcomes.iter().filter(|o| !o.is_success())
    }

    pub fn failure_count(&self) -> usize {
        self.failed().count()
    }

    /// Rows written by files that completed successfully
    pub fn records_stored(&self) -> u64 {
        self.succeeded().map(|r| r.records_stored).sum()
    }

    pub fn lines_skipped(&self) -> u64 {
        self.succeeded().map(|r| r.lines_skipped).sum()
    }
}

impl ExecutionStatus for PipelineSummary {
    fn failure(&self) -> Option<String> {
        match self.failure_count() {
            0 => None,
            failed => Some(format!("{} of {} files failed", failed, self.outcomes.len())),
        }
    }
}

/// Fans files out to parallel workers and waits for all of them
pub struct PipelineCoordinator {
    config: PipelineConfig,
}

impl PipelineCoordinator {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Ingest every file into the configured store
    ///
    /// Returns only after all workers have finished.
    pub async fn run<I, P>(&self, files: I) -> PipelineSummary
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let files: Vec<PathBuf> = files.into_iter().map(Into::into).collect();
        let run_id = Uuid::new_v4();
        let subject = format!("{} files into {}", files.len(), self.config.store.path.display());
        let span = info_span!("pipeline", %run_id);

        log_execution_async("ingest_files", &subject, || self.run_workers(run_id, files))
            .instrument(span)
            .await
    }

    async fn run_workers(&self, run_id: Uuid, files: Vec<PathBuf>) -> PipelineSummary {
        let total = files.len();
        let concurrency = self.config.concurrency_for(total);

        info!(files = total, concurrency, "Spawning ingestion workers");

        let mut outcomes: Vec<(usize, FileOutcome)> = stream::iter(files.into_iter().enumerate())
            .map(|(index, path)| {
                let ingestor = FileIngestor::new(self.config.store.clone());
                let span = Span::current();

                async move {
                    let worker_path = path.clone();
                    let joined = tokio::task::spawn_blocking(move || {
                        span.in_scope(|| ingestor.ingest(&worker_path))
                    })
                    .await;

                    let result = joined.unwrap_or_else(|e| {
                        Err(IngestError::WorkerPanicked {
                            path: path.clone(),
                            message: panic_message(e),
                        })
                    });

                    match &result {
                        Ok(report) => info!(
                            path = %path.display(),
                            records_stored = report.records_stored,
                            lines_skipped = report.lines_skipped,
                            "Completed file ({} / {})",
                            index + 1,
                            total
                        ),
                        Err(e) => error!(
                            path = %path.display(),
                            error = %e,
                            "Failed file ({} / {})",
                            index + 1,
                            total
                        ),
                    }

                    (index, FileOutcome { path, result })
                }
            })
            .buffer_unordered(concurrency)
            .collect()
            .await;

        outcomes.sort_by_key(|(index, _)| *index);
        let summary = PipelineSummary {
            run_id,
            outcomes: outcomes.into_iter().map(|(_, outcome)| outcome).collect(),
        };

        info!(
            succeeded = total - summary.failure_count(),
            failed = summary.failure_count(),
            records_stored = summary.records_stored(),
            "All workers finished"
        );

        summary
    }
}

fn panic_message(err: JoinError) -> String {
    if !err.is_panic() {
        return "worker was cancelled".to_string();
    }

    let payload = err.into_panic();
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "worker panicked".to_string()
    }
}

/// Ingest `files` concurrently into the SQLite store at `store_path`
/// using default settings
pub async fn ingest_files<I, P>(files: I, store_path: impl Into<PathBuf>) -> PipelineSummary
where
    I: IntoIterator<Item = P>,
    P: Into<PathBuf>,
{
    let config = PipelineConfig::new(crate::config::StoreConfig::new(store_path));
    PipelineCoordinator::new(config).run(files).await
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::config::StoreConfig;
    use crate::store::fetch_rows;
    use std::collections::HashSet;
    use tempfile::TempDir;

    fn write_log(dir: &TempDir, name: &str, prefix: &str, count: usize) -> PathBuf {
        let mut body = String::new();
        for i in 0..count {
            body.push_str(&format!("2025-01-01 10:00:{:02} - INFO - {prefix}-{i}\n", i % 60));
            body.push_str("noise that is dropped\n");
        }
        let path = dir.path().join(name);
        std::fs::write(&path, body).unwrap();
        path
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_two_files_land_in_one_store() {
        let dir = TempDir::new().unwrap();
        let db = dir.path().join("logs.db");
        let a = write_log(&dir, "a.log", "a", 200);
        let b = write_log(&dir, "b.log", "b", 150);

        let summary = ingest_files([&a, &b], &db).await;

        assert!(summary.is_success());
        assert_eq!(summary.outcomes.len(), 2);
        assert_eq!(summary.outcomes[0].path, a);
        assert_eq!(summary.outcomes[1].path, b);
        assert_eq!(summary.records_stored(), 350);
        assert_eq!(summary.lines_skipped(), 350);

        let rows = fetch_rows(&db).unwrap();
        assert_eq!(rows.len(), 350);
        let messages: HashSet<String> = rows.iter().map(|r| r.message.clone()).collect();
        assert_eq!(messages.len(), 350);
        assert!(messages.contains("a-199"));
        assert!(messages.contains("b-0"));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_within_file_order_is_preserved() {
        let dir = TempDir::new().unwrap();
        let db = dir.path().join("logs.db");
        let a = write_log(&dir, "a.log", "a", 50);
        let b = write_log(&dir, "b.log", "b", 50);

        let summary = ingest_files([a, b], &db).await;
        assert!(summary.is_success());

        let rows = fetch_rows(&db).unwrap();
        for prefix in ["a", "b"] {
            let sequence: Vec<usize> = rows
                .iter()
                .filter_map(|r| r.message.strip_prefix(&format!("{prefix}-")).map(str::to_owned))
                .map(|n| n.parse().unwrap())
                .collect();
            assert_eq!(sequence, (0..50).collect::<Vec<_>>());
        }
    }

    #[tokio::test]
    async fn test_unreadable_file_does_not_stop_siblings() {
        let dir = TempDir::new().unwrap();
        let db = dir.path().join("logs.db");
        let missing = dir.path().join("missing.log");
        let good = write_log(&dir, "good.log", "good", 10);

        let summary = ingest_files([&missing, &good], &db).await;

        assert!(!summary.is_success());
        assert_eq!(summary.failure_count(), 1);
        let failed = summary.failed().next().unwrap();
        assert_eq!(failed.path, missing);
        assert!(failed.error().unwrap().is_io());
        assert!(summary.outcomes[1].is_success());
        assert_eq!(fetch_rows(&db).unwrap().len(), 10);
        assert!(summary.failure().unwrap().contains("1 of 2"));
    }

    #[tokio::test]
    async fn test_bounded_workers_process_every_file() {
        let dir = TempDir::new().unwrap();
        let db = dir.path().join("logs.db");
        let files: Vec<PathBuf> = (0..5)
            .map(|i| write_log(&dir, &format!("f{i}.log"), &format!("f{i}"), 20))
            .collect();

        let config = PipelineConfig::new(StoreConfig::new(&db)).with_max_workers(2);
        let summary = PipelineCoordinator::new(config).run(files.clone()).await;

        assert!(summary.is_success());
        let reported: Vec<PathBuf> = summary.outcomes.iter().map(|o| o.path.clone()).collect();
        assert_eq!(reported, files);
        assert_eq!(fetch_rows(&db).unwrap().len(), 100);
    }

    #[tokio::test]
    async fn test_no_files_is_an_empty_success() {
        let dir = TempDir::new().unwrap();
        let summary = ingest_files(Vec::<PathBuf>::new(), dir.path().join("logs.db")).await;

        assert!(summary.is_success());
        assert!(summary.outcomes.is_empty());
        assert_eq!(summary.failure(), None);
    }

    #[tokio::test]
    async fn test_panic_message_is_recovered() {
        let err = tokio::task::spawn_blocking(|| -> () { panic!("worker exploded") })
            .await
            .unwrap_err();
        assert_eq!(panic_message(err), "worker exploded");
    }
}
