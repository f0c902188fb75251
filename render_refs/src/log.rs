//! Logging for render_refs
//!
//! This module provides a small pluggable logging system:
//! - Customizable logger via the Logger trait
//! - Severity levels (Trace, Debug, Info, Warn, Error) with a minimum filter
//! - Colored console output by default
//! - Process-wide logger slot guarded by an RwLock
//! - File and line information for ERROR logs
//!
//! The slot table never logs. The registry logs lifecycle events only.

use colored::*;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{OnceLock, RwLock};
use std::time::SystemTime;
use chrono::{DateTime, Local};

/// Logger trait for custom logging implementations
///
/// Implement this trait to route log entries elsewhere (file, test capture, ...).
///
/// # Example
///
/// ```no_run
/// use render_refs::refs::log::{Logger, LogEntry};
///
/// struct FileLogger {
///     file: std::fs::File,
/// }
///
/// impl Logger for FileLogger {
///     fn log(&self, entry: &LogEntry) {
///         // Write to file...
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

    /// Timestamp when the log was created
    pub timestamp: SystemTime,

    /// Source module (e.g., "render_refs::Registry")
    pub source: String,

    /// Log message
    pub message: String,

    /// Source file (only for ERROR logs)
    pub file: Option<&'static str>,

    /// Source line (only for ERROR logs)
    pub line: Option<u32>,
}

/// Log severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum LogSeverity {
    /// Very verbose information (slot churn)
    Trace = 0,

    /// Development information
    Debug = 1,

    /// Lifecycle messages
    Info = 2,

    /// Potential issues (leaked slots at deinit)
    Warn = 3,

    /// Errors, with file:line details
    Error = 4,
}

impl LogSeverity {
    fn from_u8(value: u8) -> Self {
        match value {
            0 => LogSeverity::Trace,
            1 => LogSeverity::Debug,
            2 => LogSeverity::Info,
            3 => LogSeverity::Warn,
            _ => LogSeverity::Error,
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
    /// Render an entry without colors (used for non-terminal sinks and tests)
    pub fn format_plain(entry: &LogEntry) -> String {
        let datetime: DateTime<Local> = entry.timestamp.into();
        let timestamp = datetime.format("%Y-%m-%d %H:%M:%S%.3f");
        let severity = match entry.severity {
            LogSeverity::Trace => "TRACE",
            LogSeverity::Debug => "DEBUG",
            LogSeverity::Info => "INFO ",
            LogSeverity::Warn => "WARN ",
            LogSeverity::Error => "ERROR",
        };

        match (entry.file, entry.line) {
            (Some(file), Some(line)) => format!(
                "[{}] [{}] [{}] {} ({}:{})",
                timestamp, severity, entry.source, entry.message, file, line
            ),
            _ => format!("[{}] [{}] [{}] {}", timestamp, severity, entry.source, entry.message),
        }
    }
}

impl Logger for DefaultLogger {
    fn log(&self, entry: &LogEntry) {
        let datetime: DateTime<Local> = entry.timestamp.into();
        let timestamp = datetime.format("%Y-%m-%d %H:%M:%S%.3f").to_string();

        let severity_str = match entry.severity {
            LogSeverity::Trace => "TRACE".bright_black(),
            LogSeverity::Debug => "DEBUG".cyan(),
            LogSeverity::Info => "INFO ".green(),
            LogSeverity::Warn => "WARN ".yellow(),
            LogSeverity::Error => "ERROR".red().bold(),
        };

        let source = entry.source.bright_blue();

        if let (Some(file), Some(line)) = (entry.file, entry.line) {
            println!(
                "[{}] [{}] [{}] {} ({}:{})",
                timestamp, severity_str, source, entry.message, file, line
            );
        } else {
            println!("[{}] [{}] [{}] {}", timestamp, severity_str, source, entry.message);
        }
    }
}

// ===== GLOBAL LOGGER =====

/// Process-wide logger (initialized with DefaultLogger)
static LOGGER: OnceLock<RwLock<Box<dyn Logger>>> = OnceLock::new();

/// Entries below this severity are dropped before reaching the logger
static MIN_SEVERITY: AtomicU8 = AtomicU8::new(LogSeverity::Info as u8);

fn logger_lock() -> &'static RwLock<Box<dyn Logger>> {
    LOGGER.get_or_init(|| RwLock::new(Box::new(DefaultLogger)))
}

/// Replace the active logger
pub fn set_logger<L: Logger + 'static>(logger: L) {
    if let Ok(mut lock) = logger_lock().write() {
        *lock = Box::new(logger);
    }
}

/// Reset the active logger to DefaultLogger
pub fn reset_logger() {
    if let Ok(mut lock) = logger_lock().write() {
        *lock = Box::new(DefaultLogger);
    }
}

/// Set the minimum severity forwarded to the logger
pub fn set_min_severity(severity: LogSeverity) {
    MIN_SEVERITY.store(severity as u8, Ordering::Relaxed);
}

/// Current minimum severity
pub fn min_severity() -> LogSeverity {
    LogSeverity::from_u8(MIN_SEVERITY.load(Ordering::Relaxed))
}

/// Whether an entry of `severity` would reach the logger
pub fn enabled(severity: LogSeverity) -> bool {
    severity >= min_severity()
}

/// Log without file:line (used by refs_trace! .. refs_warn!)
pub fn log(severity: LogSeverity, source: &str, message: String) {
    dispatch(severity, source, message, None, None);
}

/// Log with file:line (used by refs_error!)
pub fn log_detailed(
    severity: LogSeverity,
    source: &str,
    message: String,
    file: &'static str,
    line: u32,
) {
    dispatch(severity, source, message, Some(file), Some(line));
}

fn dispatch(
    severity: LogSeverity,
    source: &str,
    message: String,
    file: Option<&'static str>,
    line: Option<u32>,
) {
    if !enabled(severity) {
        return;
    }
    if let Ok(lock) = logger_lock().read() {
        lock.log(&LogEntry {
            severity,
            timestamp: SystemTime::now(),
            source: source.to_string(),
            message,
            file,
            line,
        });
    }
}

// ===== LOGGING MACROS =====

/// Log a TRACE message
#[macro_export]
macro_rules! refs_trace {
    ($source:expr, $($arg:tt)*) => {
        if $crate::log::enabled($crate::log::LogSeverity::Trace) {
            $crate::log::log($crate::log::LogSeverity::Trace, $source, format!($($arg)*))
        }
    };
}

/// Log a DEBUG message
///
/// # Example
///
/// ```ignore
/// refs_debug!("render_refs::Registry", "Rolled back '{}'", name);
/// ```
#[macro_export]
macro_rules! refs_debug {
    ($source:expr, $($arg:tt)*) => {
        if $crate::log::enabled($crate::log::LogSeverity::Debug) {
            $crate::log::log($crate::log::LogSeverity::Debug, $source, format!($($arg)*))
        }
    };
}

/// Log an INFO message
#[macro_export]
macro_rules! refs_info {
    ($source:expr, $($arg:tt)*) => {
        if $crate::log::enabled($crate::log::LogSeverity::Info) {
            $crate::log::log($crate::log::LogSeverity::Info, $source, format!($($arg)*))
        }
    };
}

/// Log a WARN message
#[macro_export]
macro_rules! refs_warn {
    ($source:expr, $($arg:tt)*) => {
        if $crate::log::enabled($crate::log::LogSeverity::Warn) {
            $crate::log::log($crate::log::LogSeverity::Warn, $source, format!($($arg)*))
        }
    };
}

/// Log an ERROR message with file:line information
#[macro_export]
macro_rules! refs_error {
    ($source:expr, $($arg:tt)*) => {
        $crate::log::log_detailed(
            $crate::log::LogSeverity::Error,
            $source,
            format!($($arg)*),
            file!(),
            line!()
        )
    };
}

#[cfg(test)]
#[path = "log_tests.rs"]
mod tests;
