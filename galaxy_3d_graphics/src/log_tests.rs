//! Unit tests for log.rs
//!
//! Tests Logger trait, LogEntry, LogSeverity, and DefaultLogger.

use crate::log::{DefaultLogger, LogEntry, LogSeverity, Logger};
use std::time::SystemTime;

fn entry(severity: LogSeverity, file: Option<&'static str>, line: Option<u32>) -> LogEntry {
    LogEntry {
        severity,
        timestamp: SystemTime::now(),
        source: "galaxy3d::opengl".to_string(),
        message: "Failed to set blend state".to_string(),
        file,
        line,
    }
}

// ============================================================================
// LOG SEVERITY TESTS
// ============================================================================

#[test]
fn test_log_severity_ordering() {
    assert!(LogSeverity::Trace < LogSeverity::Debug);
    assert!(LogSeverity::Debug < LogSeverity::Info);
    assert!(LogSeverity::Info < LogSeverity::Warn);
    assert!(LogSeverity::Warn < LogSeverity::Error);
}

#[test]
fn test_log_severity_labels_have_fixed_width() {
    for severity in [
        LogSeverity::Trace,
        LogSeverity::Debug,
        LogSeverity::Info,
        LogSeverity::Warn,
        LogSeverity::Error,
    ] {
        assert_eq!(severity.label().len(), 5);
    }
    assert_eq!(LogSeverity::Info.label(), "INFO ");
}

// ============================================================================
// DEFAULT LOGGER TESTS
// ============================================================================

#[test]
fn test_format_plain_without_location() {
    let line = DefaultLogger::format_plain(&entry(LogSeverity::Warn, None, None));
    assert!(line.contains("[WARN ]"));
    assert!(line.contains("[galaxy3d::opengl]"));
    assert!(line.ends_with("Failed to set blend state"));
}

#[test]
fn test_format_plain_with_location() {
    let line = DefaultLogger::format_plain(&entry(LogSeverity::Error, Some("opengl_state_cache.rs"), Some(42)));
    assert!(line.contains("[ERROR]"));
    assert!(line.ends_with("(opengl_state_cache.rs:42)"));
}

#[test]
fn test_default_logger_all_severities() {
    let logger = DefaultLogger;
    for severity in [
        LogSeverity::Trace,
        LogSeverity::Debug,
        LogSeverity::Info,
        LogSeverity::Warn,
        LogSeverity::Error,
    ] {
        logger.log(&entry(severity, None, None));
        logger.log(&entry(severity, Some("test.rs"), Some(7)));
    }
}

// ============================================================================
// LOGGER TRAIT TESTS
// ============================================================================

struct CountingLogger {
    logged_count: std::sync::Mutex<usize>,
}

impl Logger for CountingLogger {
    fn log(&self, _entry: &LogEntry) {
        *self.logged_count.lock().unwrap() += 1;
    }
}

#[test]
fn test_custom_logger_implementation() {
    let logger = CountingLogger { logged_count: std::sync::Mutex::new(0) };
    logger.log(&entry(LogSeverity::Info, None, None));
    logger.log(&entry(LogSeverity::Info, None, None));
    assert_eq!(*logger.logged_count.lock().unwrap(), 2);
}

#[test]
fn test_logger_trait_is_send_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<DefaultLogger>();
}
