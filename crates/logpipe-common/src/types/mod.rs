//! Common types used across logpipe

use serde::{Deserialize, Serialize};

/// Structured fields extracted from one matching log line.
///
/// Field contents are kept exactly as captured: the timestamp is not
/// validated as a calendar date and the level is not normalised.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LogRecord {
    /// `YYYY-MM-DD HH:MM:SS`
    pub timestamp: String,
    pub level: String,
    /// Remainder of the line after the second ` - ` delimiter, never empty
    pub message: String,
}

impl LogRecord {
    pub fn new(
        timestamp: impl Into<String>,
        level: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            timestamp: timestamp.into(),
            level: level.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for LogRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} - {} - {}", self.timestamp, self.level, self.message)
    }
}

// ============================================================================
// Database Types
// ============================================================================

/// A row of the `logs` table.
///
/// `id` is assigned by the store on insert. Rows are never updated or
/// deleted by the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredLogRow {
    pub id: i64,
    pub timestamp: String,
    pub level: String,
    pub message: String,
}

impl StoredLogRow {
    /// The record this row was created from
    pub fn record(&self) -> LogRecord {
        LogRecord::new(&self.timestamp, &self.level, &self.message)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_record_display_matches_input_layout() {
        let record = LogRecord::new("2025-01-01 10:00:00", "ERROR", "disk full");
        assert_eq!(record.to_string(), "2025-01-01 10:00:00 - ERROR - disk full");
    }

    #[test]
    fn test_stored_row_record() {
        let row = StoredLogRow {
            id: 7,
            timestamp: "2025-01-01 10:00:00".to_string(),
            level: "WARN".to_string(),
            message: "low memory".to_string(),
        };
        assert_eq!(
            row.record(),
            LogRecord::new("2025-01-01 10:00:00", "WARN", "low memory")
        );
    }

    #[test]
    fn test_stored_row_serializes_all_columns() {
        let row = StoredLogRow {
            id: 1,
            timestamp: "2025-01-01 10:00:00".to_string(),
            level: "INFO".to_string(),
            message: "started".to_string(),
        };
        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json["id"], 1);
        assert_eq!(json["level"], "INFO");
        assert_eq!(json["message"], "started");
    }
}
