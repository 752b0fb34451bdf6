//! Execution markers around pipeline operations
//!
//! Wraps an operation with timestamped start and end events. The wrapper
//! only observes: the wrapped operation's return value is passed through
//! untouched.

use chrono::Utc;
use std::fmt::Display;
use std::future::Future;
use std::time::Instant;
use tracing::{info, warn};

/// How a finished operation reports failure to the execution markers
pub trait ExecutionStatus {
    /// Description of the failure, or `None` on success
    fn failure(&self) -> Option<String>;
}

impl<T, E: Display> ExecutionStatus for Result<T, E> {
    fn failure(&self) -> Option<String> {
        self.as_ref().err().map(ToString::to_string)
    }
}

fn mark_start(operation: &str, subject: &str) -> Instant {
    let started_at = Utc::now();
    info!(
        operation,
        subject,
        started_at = %started_at.to_rfc3339(),
        "Starting {operation}"
    );
    Instant::now()
}

fn mark_end<T: ExecutionStatus>(operation: &str, subject: &str, clock: Instant, output: &T) {
    let finished_at = Utc::now();
    let elapsed_ms = clock.elapsed().as_millis() as u64;

    match output.failure() {
        None => info!(
            operation,
            subject,
            finished_at = %finished_at.to_rfc3339(),
            elapsed_ms,
            "Finished {operation}"
        ),
        Some(error) => warn!(
            operation,
            subject,
            finished_at = %finished_at.to_rfc3339(),
            elapsed_ms,
            error = %error,
            "Failed {operation}"
        ),
    }
}

/// Run `operation` between start and end markers
pub fn log_execution<T, F>(operation: &str, subject: &str, f: F) -> T
where
    F: FnOnce() -> T,
    T: ExecutionStatus,
{
    let clock = mark_start(operation, subject);
    let output = f();
    mark_end(operation, subject, clock, &output);
    output
}

/// Async form of [`log_execution`]
pub async fn log_execution_async<T, F, Fut>(operation: &str, subject: &str, f: F) -> T
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = T>,
    T: ExecutionStatus,
{
    let clock = mark_start(operation, subject);
    let output = f().await;
    mark_end(operation, subject, clock, &output);
    output
}
