//! logpipe - ingest server logs into SQLite

use anyhow::{Context, Result};
use clap::Parser;
use logpipe_common::logging::{init_logging, LogConfig, LogLevel};
use logpipe_ingest::config::DEFAULT_DB_PATH;
use logpipe_ingest::execution::ExecutionStatus;
use logpipe_ingest::{store, PipelineConfig, PipelineCoordinator};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "logpipe")]
#[command(author, version, about = "Parse server log files and load them into SQLite")]
struct Cli {
    /// Log files to ingest, one worker each
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// SQLite database file shared by all workers
    #[arg(long, env = "LOGPIPE_DB_PATH", default_value = DEFAULT_DB_PATH)]
    db: PathBuf,

    /// Upper bound on concurrently ingested files
    #[arg(long, env = "LOGPIPE_MAX_WORKERS")]
    max_workers: Option<usize>,

    /// Print every stored row as JSON after ingestion
    #[arg(long)]
    dump: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let log_level = if cli.verbose {
        LogLevel::Debug
    } else {
        LogLevel::Info
    };

    // Environment variables take precedence over the flag
    let log_config = LogConfig::builder()
        .level(log_level)
        .log_file_prefix("logpipe")
        .build()
        .merge_env()?;

    let _guard = init_logging(&log_config)?;

    let mut config = PipelineConfig::from_env().context("Invalid pipeline configuration")?;
    config.store.path = cli.db;
    config.max_workers = cli.max_workers.or(config.max_workers);
    config.validate().context("Invalid pipeline configuration")?;

    let db_path = config.store.path.clone();
    let summary = PipelineCoordinator::new(config).run(cli.files).await;

    info!(
        records_stored = summary.records_stored(),
        lines_skipped = summary.lines_skipped(),
        failed = summary.failure_count(),
        "Ingestion complete"
    );

    if cli.dump {
        let rows = store::fetch_rows(&db_path)
            .with_context(|| format!("Failed to read rows from {}", db_path.display()))?;
        println!("{}", serde_json::to_string_pretty(&rows)?);
    }

    if let Some(failure) = summary.failure() {
        anyhow::bail!(failure);
    }

    Ok(())
}
