//! Log line parser
//!
//! Lines of the form `<timestamp> - <level> - <message>` become a
//! [`LogRecord`]. Anything else is a parse miss: the parser returns `None`
//! and the caller drops the line.

use logpipe_common::LogRecord;
use regex::Regex;
use std::sync::LazyLock;

/// Full-line pattern, anchored at both ends
pub const LOG_LINE_PATTERN: &str =
    r"^(?P<timestamp>\d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2}) - (?P<level>\w+) - (?P<message>.+)$";

#[allow(clippy::expect_used)]
static LOG_LINE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(LOG_LINE_PATTERN).expect("log line pattern is valid"));

/// Stateless extractor of [`LogRecord`]s
#[derive(Debug, Clone, Copy, Default)]
pub struct RecordParser;

impl RecordParser {
    pub fn new() -> Self {
        Self
    }

    /// Extract the record from `line`, or `None` if the line does not match
    ///
    /// Captures are returned verbatim. The timestamp is only checked for
    /// shape, so `2025-13-45 99:99:99` is accepted.
    pub fn parse(&self, line: &str) -> Option<LogRecord> {
        let caps = LOG_LINE_REGEX.captures(line)?;
        Some(LogRecord::new(
            &caps["timestamp"],
            &caps["level"],
            &caps["message"],
        ))
    }

    /// Whether `line` would produce a record
    pub fn matches(&self, line: &str) -> bool {
        LOG_LINE_REGEX.is_match(line)
    }
}

/// Parse one line with the default parser
pub fn parse_line(line: &str) -> Option<LogRecord> {
    RecordParser.parse(line)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_parse_error_line() {
        let record = parse_line("2025-01-01 10:00:00 - ERROR - disk full").unwrap();
        assert_eq!(record.timestamp, "2025-01-01 10:00:00");
        assert_eq!(record.level, "ERROR");
        assert_eq!(record.message, "disk full");
    }

    #[test]
    fn test_garbage_is_a_miss() {
        assert!(parse_line("garbage line without structure").is_none());
        assert!(!RecordParser::new().matches("garbage line without structure"));
    }

    #[test]
    fn test_wrong_delimiter_is_a_miss() {
        assert!(parse_line("2025-01-01 10:00:00 | ERROR | disk full").is_none());
        assert!(parse_line("2025-01-01 10:00:00 -ERROR- disk full").is_none());
        assert!(parse_line("2025-01-01T10:00:00 - ERROR - disk full").is_none());
    }

    #[test]
    fn test_missing_level_is_a_miss() {
        assert!(parse_line("2025-01-01 10:00:00 -  - disk full").is_none());
        assert!(parse_line("2025-01-01 10:00:00 - disk full").is_none());
    }

    #[test]
    fn test_empty_message_is_a_miss() {
        assert!(parse_line("2025-01-01 10:00:00 - ERROR - ").is_none());
        assert!(parse_line("2025-01-01 10:00:00 - ERROR -").is_none());
    }

    #[test]
    fn test_match_is_anchored_at_start() {
        assert!(parse_line("[app] 2025-01-01 10:00:00 - INFO - started").is_none());
        assert!(parse_line(" 2025-01-01 10:00:00 - INFO - started").is_none());
    }

    #[test]
    fn test_message_keeps_later_delimiters() {
        let record = parse_line("2025-01-01 10:00:00 - WARN - retry - attempt 2 - of 3").unwrap();
        assert_eq!(record.level, "WARN");
        assert_eq!(record.message, "retry - attempt 2 - of 3");
    }

    #[test]
    fn test_fields_are_not_normalised() {
        let record = parse_line("2025-13-45 99:99:99 - debug_1 - padded   ").unwrap();
        assert_eq!(record.timestamp, "2025-13-45 99:99:99");
        assert_eq!(record.level, "debug_1");
        assert_eq!(record.message, "padded   ");
    }

    #[test]
    fn test_level_must_be_word_characters() {
        assert!(parse_line("2025-01-01 10:00:00 - ERR-OR - disk full").is_none());
        assert!(parse_line("2025-01-01 10:00:00 - NOT ICE - disk full").is_none());
    }

    proptest! {
        #[test]
        fn prop_matching_lines_round_trip(
            timestamp in "[0-9]{4}-[0-9]{2}-[0-9]{2} [0-9]{2}:[0-9]{2}:[0-9]{2}",
            level in "[A-Za-z0-9_]{1,12}",
            message in "[^\n]{1,60}",
        ) {
            let line = format!("{timestamp} - {level} - {message}");
            let record = parse_line(&line).unwrap();
            prop_assert_eq!(record.timestamp, timestamp);
            prop_assert_eq!(record.level, level);
            prop_assert_eq!(record.message, message);
        }

        #[test]
        fn prop_lines_without_timestamp_prefix_never_match(line in "[a-zA-Z ][^\n]{0,80}") {
            prop_assert!(parse_line(&line).is_none());
        }
    }
}
