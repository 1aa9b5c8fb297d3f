//! Logging for the Galaxy3D graphics layer
//!
//! Render devices run on their own thread and most failures never reach the
//! producer, so every component reports through one process-wide logger:
//! - Customizable sink via the `Logger` trait
//! - Severity levels (Trace, Debug, Info, Warn, Error) with a minimum filter
//! - Colored console output by default
//! - File and line information for ERROR entries

use chrono::{DateTime, Local};
use colored::*;
use std::time::SystemTime;

/// Logger trait for custom logging implementations
///
/// # Example
///
/// ```no_run
/// use galaxy_3d_graphics::galaxy3d::log::{Logger, LogEntry};
///
/// struct FrameLogger;
///
/// impl Logger for FrameLogger {
///     fn log(&self, entry: &LogEntry) {
///         eprintln!("{}: {}", entry.source, entry.message);
///     }
/// }
/// ```
pub trait Logger: Send + Sync {
    /// Log an entry
    fn log(&self, entry: &LogEntry);
}

/// Log entry containing all information about a log message
#[derive(Debug, Clone)]
pub struct LogEntry {
    /// Severity level
    pub severity: LogSeverity,

    /// Timestamp when the entry was created
    pub timestamp: SystemTime,

    /// Source component (e.g. "galaxy3d::RenderThread", "galaxy3d::opengl")
    pub source: String,

    /// Log message
    pub message: String,

    /// Source file (only for detailed ERROR logs)
    pub file: Option<&'static str>,

    /// Source line (only for detailed ERROR logs)
    pub line: Option<u32>,
}

/// Log severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LogSeverity {
    /// Per-command tracing (very verbose)
    Trace,

    /// Development information
    Debug,

    /// Device lifecycle events
    Info,

    /// Unsupported features and fallback paths
    Warn,

    /// Failed commands and native errors (with file:line details)
    Error,
}

impl LogSeverity {
    /// Fixed-width label used by the default logger
    pub fn label(&self) -> &'static str {
        match self {
            LogSeverity::Trace => "TRACE",
            LogSeverity::Debug => "DEBUG",
            LogSeverity::Info => "INFO ",
            LogSeverity::Warn => "WARN ",
            LogSeverity::Error => "ERROR",
        }
    }
}

/// Default logger implementation using colored console output
///
/// Format:
/// - Normal: `[timestamp] [SEVERITY] [source] message`
/// - Error: `[timestamp] [ERROR] [source] message (file:line)`
pub struct DefaultLogger;

impl DefaultLogger {
    /// Render an entry as a single uncolored line
    pub fn format_plain(entry: &LogEntry) -> String {
        let datetime: DateTime<Local> = entry.timestamp.into();
        let timestamp = datetime.format("%Y-%m-%d %H:%M:%S%.3f");

        match (entry.file, entry.line) {
            (Some(file), Some(line)) => format!(
                "[{}] [{}] [{}] {} ({}:{})",
                timestamp,
                entry.severity.label(),
                entry.source,
                entry.message,
                file,
                line
            ),
            _ => format!(
                "[{}] [{}] [{}] {}",
                timestamp,
                entry.severity.label(),
                entry.source,
                entry.message
            ),
        }
    }
}

impl Logger for DefaultLogger {
    fn log(&self, entry: &LogEntry) {
        let datetime: DateTime<Local> = entry.timestamp.into();
        let timestamp = datetime.format("%Y-%m-%d %H:%M:%S%.3f").to_string();

        let label = entry.severity.label();
        let severity_str = match entry.severity {
            LogSeverity::Trace => label.bright_black(),
            LogSeverity::Debug => label.cyan(),
            LogSeverity::Info => label.green(),
            LogSeverity::Warn => label.yellow(),
            LogSeverity::Error => label.red().bold(),
        };

        let source = entry.source.bright_blue();

        if let (Some(file), Some(line)) = (entry.file, entry.line) {
            eprintln!(
                "[{}] [{}] [{}] {} ({}:{})",
                timestamp, severity_str, source, entry.message, file, line
            );
        } else {
            println!("[{}] [{}] [{}] {}", timestamp, severity_str, source, entry.message);
        }
    }
}

// ===== LOGGING MACROS =====

/// Log a TRACE message
///
/// ```ignore
/// engine_trace!("galaxy3d::opengl", "Executing {}", command.name());
/// ```
#[macro_export]
macro_rules! engine_trace {
    ($source:expr, $($arg:tt)*) => {
        $crate::galaxy3d::Engine::log(
            $crate::galaxy3d::log::LogSeverity::Trace,
            $source,
            format!($($arg)*)
        )
    };
}

/// Log a DEBUG message
#[macro_export]
macro_rules! engine_debug {
    ($source:expr, $($arg:tt)*) => {
        $crate::galaxy3d::Engine::log(
            $crate::galaxy3d::log::LogSeverity::Debug,
            $source,
            format!($($arg)*)
        )
    };
}

/// Log an INFO message
#[macro_export]
macro_rules! engine_info {
    ($source:expr, $($arg:tt)*) => {
        $crate::galaxy3d::Engine::log(
            $crate::galaxy3d::log::LogSeverity::Info,
            $source,
            format!($($arg)*)
        )
    };
}

/// Log a WARN message
#[macro_export]
macro_rules! engine_warn {
    ($source:expr, $($arg:tt)*) => {
        $crate::galaxy3d::Engine::log(
            $crate::galaxy3d::log::LogSeverity::Warn,
            $source,
            format!($($arg)*)
        )
    };
}

/// Log an ERROR message with file:line information
#[macro_export]
macro_rules! engine_error {
    ($source:expr, $($arg:tt)*) => {
        $crate::galaxy3d::Engine::log_detailed(
            $crate::galaxy3d::log::LogSeverity::Error,
            $source,
            format!($($arg)*),
            file!(),
            line!()
        )
    };
}

/// Log an ERROR message and build an `Error` of the given category
///
/// ```ignore
/// let shader = shader.ok_or_else(|| engine_err!("galaxy3d::opengl", ProtocolError, "No shader set"))?;
/// ```
#[macro_export]
macro_rules! engine_err {
    ($source:expr, $kind:ident, $($arg:tt)*) => {{
        let message = format!($($arg)*);
        $crate::galaxy3d::Engine::log_detailed(
            $crate::galaxy3d::log::LogSeverity::Error,
            $source,
            message.clone(),
            file!(),
            line!()
        );
        $crate::galaxy3d::Error::$kind(message)
    }};
}

/// Log an ERROR message and return early with an `Error` of the given category
///
/// ```ignore
/// engine_bail!("galaxy3d::opengl", InvalidUsage, "Buffer is not dynamic");
/// ```
#[macro_export]
macro_rules! engine_bail {
    ($source:expr, $kind:ident, $($arg:tt)*) => {
        return Err($crate::engine_err!($source, $kind, $($arg)*))
    };
}

#[cfg(test)]
#[path = "log_tests.rs"]
mod tests;
