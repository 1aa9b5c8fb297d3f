/// Galaxy3D Engine - process-wide logging facade
///
/// Render devices, the render thread and the backends all report through the
/// logger stored here. The logger is swappable at runtime and guarded by a
/// RwLock so any thread may log while another replaces the sink.

use crate::log::{DefaultLogger, LogEntry, LogSeverity, Logger};
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{OnceLock, RwLock};
use std::time::SystemTime;

// ===== INTERNAL STATE =====

/// Global logger (initialized with DefaultLogger)
static LOGGER: OnceLock<RwLock<Box<dyn Logger>>> = OnceLock::new();

/// Entries below this severity are discarded before reaching the logger
static MIN_SEVERITY: AtomicU8 = AtomicU8::new(0);

fn severity_to_u8(severity: LogSeverity) -> u8 {
    match severity {
        LogSeverity::Trace => 0,
        LogSeverity::Debug => 1,
        LogSeverity::Info => 2,
        LogSeverity::Warn => 3,
        LogSeverity::Error => 4,
    }
}

fn severity_from_u8(value: u8) -> LogSeverity {
    match value {
        0 => LogSeverity::Trace,
        1 => LogSeverity::Debug,
        2 => LogSeverity::Info,
        3 => LogSeverity::Warn,
        _ => LogSeverity::Error,
    }
}

fn logger_lock() -> &'static RwLock<Box<dyn Logger>> {
    LOGGER.get_or_init(|| RwLock::new(Box::new(DefaultLogger)))
}

// ===== PUBLIC API =====

/// Engine-wide services shared by every render device
pub struct Engine;

impl Engine {
    /// Replace the global logger
    ///
    /// # Example
    ///
    /// ```no_run
    /// use galaxy_3d_graphics::galaxy3d::Engine;
    /// use galaxy_3d_graphics::galaxy3d::log::{Logger, LogEntry};
    ///
    /// struct Silent;
    /// impl Logger for Silent {
    ///     fn log(&self, _entry: &LogEntry) {}
    /// }
    ///
    /// Engine::set_logger(Silent);
    /// ```
    pub fn set_logger<L: Logger + 'static>(logger: L) {
        let mut lock = logger_lock().write().unwrap_or_else(|poisoned| poisoned.into_inner());
        *lock = Box::new(logger);
    }

    /// Restore the default colored console logger
    pub fn reset_logger() {
        let mut lock = logger_lock().write().unwrap_or_else(|poisoned| poisoned.into_inner());
        *lock = Box::new(DefaultLogger);
    }

    /// Discard entries below `severity`
    pub fn set_min_severity(severity: LogSeverity) {
        MIN_SEVERITY.store(severity_to_u8(severity), Ordering::Relaxed);
    }

    /// Current minimum severity
    pub fn min_severity() -> LogSeverity {
        severity_from_u8(MIN_SEVERITY.load(Ordering::Relaxed))
    }

    /// Log a message (used by the engine_* macros)
    pub fn log(severity: LogSeverity, source: &str, message: String) {
        Self::dispatch(LogEntry {
            severity,
            timestamp: SystemTime::now(),
            source: source.to_string(),
            message,
            file: None,
            line: None,
        });
    }

    /// Log a message with its source location (used by engine_error!)
    pub fn log_detailed(
        severity: LogSeverity,
        source: &str,
        message: String,
        file: &'static str,
        line: u32,
    ) {
        Self::dispatch(LogEntry {
            severity,
            timestamp: SystemTime::now(),
            source: source.to_string(),
            message,
            file: Some(file),
            line: Some(line),
        });
    }

    fn dispatch(entry: LogEntry) {
        if entry.severity < Self::min_severity() {
            return;
        }
        let lock = logger_lock().read().unwrap_or_else(|poisoned| poisoned.into_inner());
        lock.log(&entry);
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
