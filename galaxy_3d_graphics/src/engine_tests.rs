//! Unit tests for the Engine logging facade
//!
//! LOGGER is a global shared across all tests, so every test is #[serial].

use crate::galaxy3d::log::{LogEntry, LogSeverity, Logger};
use crate::galaxy3d::{Engine, Error};
use serial_test::serial;
use std::sync::{Arc, Mutex};

// ============================================================================
// TEST HELPERS
// ============================================================================

struct CaptureLogger {
    entries: Arc<Mutex<Vec<LogEntry>>>,
}

fn capture() -> Arc<Mutex<Vec<LogEntry>>> {
    let entries = Arc::new(Mutex::new(Vec::new()));
    Engine::set_logger(CaptureLogger { entries: entries.clone() });
    entries
}

impl Logger for CaptureLogger {
    fn log(&self, entry: &LogEntry) {
        // Other unit tests log concurrently; keep only this file's sources
        if entry.source.starts_with("galaxy3d::test") {
            self.entries.lock().unwrap().push(entry.clone());
        }
    }
}

// ============================================================================
// LOGGER TESTS
// ============================================================================

#[test]
#[serial]
fn test_log_reaches_custom_logger() {
    let entries = capture();
    Engine::set_min_severity(LogSeverity::Trace);

    Engine::log(LogSeverity::Info, "galaxy3d::test::RenderThread", "Render thread started".to_string());

    let entries = entries.lock().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].source, "galaxy3d::test::RenderThread");
    assert!(entries[0].file.is_none());
    drop(entries);
    Engine::reset_logger();
}

#[test]
#[serial]
fn test_log_detailed_records_location() {
    let entries = capture();
    Engine::set_min_severity(LogSeverity::Trace);

    crate::engine_error!("galaxy3d::test::opengl", "Failed to draw elements");

    let entries = entries.lock().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].severity, LogSeverity::Error);
    assert!(entries[0].file.unwrap().ends_with("engine_tests.rs"));
    assert!(entries[0].line.is_some());
    drop(entries);
    Engine::reset_logger();
}

#[test]
#[serial]
fn test_min_severity_filters_entries() {
    let entries = capture();
    Engine::set_min_severity(LogSeverity::Warn);
    assert_eq!(Engine::min_severity(), LogSeverity::Warn);

    crate::engine_trace!("galaxy3d::test", "dropped");
    crate::engine_info!("galaxy3d::test", "dropped");
    crate::engine_warn!("galaxy3d::test", "kept {}", 1);

    assert_eq!(entries.lock().unwrap().len(), 1);
    Engine::set_min_severity(LogSeverity::Trace);
    Engine::reset_logger();
}

#[test]
#[serial]
fn test_engine_err_logs_and_builds_error() {
    let entries = capture();
    Engine::set_min_severity(LogSeverity::Trace);

    let err = crate::engine_err!("galaxy3d::test::opengl", InvalidUsage, "Buffer {} is not dynamic", 3);

    assert_eq!(err, Error::InvalidUsage("Buffer 3 is not dynamic".to_string()));
    assert_eq!(entries.lock().unwrap().len(), 1);
    Engine::reset_logger();
}

#[test]
#[serial]
fn test_engine_bail_returns_early() {
    let _entries = capture();

    fn check(size: u32) -> crate::galaxy3d::Result<u32> {
        if size == 0 {
            crate::engine_bail!("galaxy3d::test", InvalidParameter, "Size must not be zero");
        }
        Ok(size)
    }

    assert!(matches!(check(0), Err(Error::InvalidParameter(_))));
    assert_eq!(check(4).unwrap(), 4);
    Engine::reset_logger();
}
