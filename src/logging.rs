//! Structured logging for the statistics aggregator
//!
//! This module provides:
//! - Leveled logging with console, JSON and compact formats
//! - Session correlation IDs so every line of one batch can be grouped
//! - Timing of batch phases
//! - Per-file summary and error event logging
//!
//! All log output goes to stderr; stdout is reserved for summary lines in
//! single-file mode and for `--print-manifest`.

use crate::aggregator::FileSummary;
use crate::error::{AppError, Result};
use crate::models::Config;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io::{self, Write};
use uuid::Uuid;

/// Log level enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LogLevel {
    /// Trace level - most detailed
    Trace = 0,
    /// Debug level - per-run details
    Debug = 1,
    /// Info level - per-file progress
    Info = 2,
    /// Warning level - suspicious input that does not stop the batch
    Warn = 3,
    /// Error level - the failure that stops the batch
    Error = 4,
    /// Fatal level
    Fatal = 5,
}

impl LogLevel {
    /// Get log level name as string
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "TRACE",
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
            LogLevel::Fatal => "FATAL",
        }
    }

    /// Get ANSI color code for console output
    pub fn color_code(&self) -> &'static str {
        match self {
            LogLevel::Trace => "\x1b[37m",    // White
            LogLevel::Debug => "\x1b[36m",    // Cyan
            LogLevel::Info => "\x1b[32m",     // Green
            LogLevel::Warn => "\x1b[33m",     // Yellow
            LogLevel::Error => "\x1b[31m",    // Red
            LogLevel::Fatal => "\x1b[35m",    // Magenta
        }
    }

    /// Reset ANSI color code
    pub fn reset_code() -> &'static str {
        "\x1b[0m"
    }
}

impl std::str::FromStr for LogLevel {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_uppercase().as_str() {
            "TRACE" => Ok(LogLevel::Trace),
            "DEBUG" => Ok(LogLevel::Debug),
            "INFO" => Ok(LogLevel::Info),
            "WARN" | "WARNING" => Ok(LogLevel::Warn),
            "ERROR" => Ok(LogLevel::Error),
            "FATAL" => Ok(LogLevel::Fatal),
            _ => Err(AppError::parse(format!("Invalid log level: {}", s))),
        }
    }
}

/// Log entry structure for structured logging
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    /// Timestamp when log entry was created
    pub timestamp: DateTime<Utc>,
    /// Log level
    pub level: LogLevel,
    /// Log message
    pub message: String,
    /// Logger name/component
    pub logger: String,
    /// Correlation ID for tracking related events
    pub correlation_id: Option<String>,
    /// Additional structured fields
    pub fields: HashMap<String, serde_json::Value>,
    /// File and line information
    pub location: Option<LogLocation>,
}

/// Source code location information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogLocation {
    /// Source file name
    pub file: String,
    /// Line number
    pub line: u32,
    /// Module path
    pub module: Option<String>,
}

/// Log output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable console format
    #[default]
    Console,
    /// JSON format for structured logging
    Json,
    /// Compact single-line format
    Compact,
}

impl std::str::FromStr for LogFormat {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "console" => Ok(LogFormat::Console),
            "json" => Ok(LogFormat::Json),
            "compact" => Ok(LogFormat::Compact),
            _ => Err(AppError::config(format!(
                "Invalid log format '{}', expected console, json or compact",
                s
            ))),
        }
    }
}

/// Logger implementation with multiple output formats
#[derive(Debug, Clone)]
pub struct Logger {
    /// Minimum log level to output
    min_level: LogLevel,
    /// Whether to use colored output
    use_color: bool,
    /// Whether to include location information
    include_location: bool,
    /// Output format
    format: LogFormat,
    /// Logger name
    name: String,
    /// Session correlation ID attached to every entry
    session_id: Option<String>,
    /// Fields attached to every entry
    context_fields: HashMap<String, serde_json::Value>,
}

impl Logger {
    /// Create a new logger
    pub fn new(name: String) -> Self {
        Self {
            min_level: LogLevel::Info,
            use_color: true,
            include_location: false,
            format: LogFormat::Console,
            name,
            session_id: None,
            context_fields: HashMap::new(),
        }
    }

    /// Create a logger with specific configuration
    pub fn with_config(name: String, config: &Config) -> Self {
        let min_level = if config.debug {
            LogLevel::Debug
        } else if config.verbose {
            LogLevel::Info
        } else {
            LogLevel::Warn
        };

        Self {
            min_level,
            use_color: config.enable_color,
            include_location: config.debug,
            format: config.log_format,
            name,
            session_id: None,
            context_fields: HashMap::new(),
        }
    }

    /// Logger name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Set minimum log level
    pub fn set_level(&mut self, level: LogLevel) {
        self.min_level = level;
    }

    /// Set output format
    pub fn set_format(&mut self, format: LogFormat) {
        self.format = format;
    }

    /// Enable or disable colored output
    pub fn set_color(&mut self, use_color: bool) {
        self.use_color = use_color;
    }

    /// Set session correlation ID
    pub fn set_session_id(&mut self, session_id: String) {
        self.session_id = Some(session_id);
    }

    /// Add context field for all subsequent log entries
    pub fn add_context_field<T: Serialize>(&mut self, key: String, value: T) {
        if let Ok(json_value) = serde_json::to_value(value) {
            self.context_fields.insert(key, json_value);
        }
    }

    /// Create a log entry builder
    pub fn log(&self, level: LogLevel, message: &str) -> LogEntryBuilder<'_> {
        LogEntryBuilder::new(self, level, message.to_string())
    }

    /// Convenience methods for different log levels
    pub fn trace(&self, message: &str) -> LogEntryBuilder<'_> {
        self.log(LogLevel::Trace, message)
    }

    pub fn debug(&self, message: &str) -> LogEntryBuilder<'_> {
        self.log(LogLevel::Debug, message)
    }

    pub fn info(&self, message: &str) -> LogEntryBuilder<'_> {
        self.log(LogLevel::Info, message)
    }

    pub fn warn(&self, message: &str) -> LogEntryBuilder<'_> {
        self.log(LogLevel::Warn, message)
    }

    pub fn error(&self, message: &str) -> LogEntryBuilder<'_> {
        self.log(LogLevel::Error, message)
    }

    pub fn fatal(&self, message: &str) -> LogEntryBuilder<'_> {
        self.log(LogLevel::Fatal, message)
    }

    /// Check if a log level would be output
    pub fn would_log(&self, level: LogLevel) -> bool {
        level >= self.min_level
    }

    /// Render an entry with the context fields applied, or `None` below the minimum level
    fn render(&self, mut entry: LogEntry) -> Option<String> {
        if entry.level < self.min_level {
            return None;
        }

        if let Some(session_id) = &self.session_id {
            entry.fields.insert("session_id".to_string(), serde_json::Value::String(session_id.clone()));
        }
        for (key, value) in &self.context_fields {
            entry.fields.insert(key.clone(), value.clone());
        }

        Some(match self.format {
            LogFormat::Console => self.format_console(&entry),
            LogFormat::Json => self.format_json(&entry),
            LogFormat::Compact => self.format_compact(&entry),
        })
    }

    /// Write log entry to stderr
    fn write_entry(&self, entry: LogEntry) {
        if let Some(output) = self.render(entry) {
            let _ = writeln!(io::stderr(), "{}", output);
        }
    }

    /// Format log entry for console output
    fn format_console(&self, entry: &LogEntry) -> String {
        let timestamp = entry.timestamp.format("%Y-%m-%d %H:%M:%S%.3f");
        let level_str = entry.level.as_str();

        let formatted_level = if self.use_color {
            format!("{}{:>5}{}", entry.level.color_code(), level_str, LogLevel::reset_code())
        } else {
            format!("{:>5}", level_str)
        };

        let mut output = format!("{} {} [{}] {}",
            timestamp,
            formatted_level,
            entry.logger,
            entry.message
        );

        if let Some(correlation_id) = &entry.correlation_id {
            let short: String = correlation_id.chars().take(8).collect();
            output.push_str(&format!(" [{}]", short));
        }

        if !entry.fields.is_empty() {
            let mut keys: Vec<&String> = entry.fields.keys().collect();
            keys.sort();
            let fields_str: Vec<String> = keys.iter()
                .map(|k| format!("{}={}", k, entry.fields[*k]))
                .collect();
            output.push_str(&format!(" {{{}}}", fields_str.join(", ")));
        }

        if self.include_location {
            if let Some(location) = &entry.location {
                output.push_str(&format!(" @ {}:{}", location.file, location.line));
            }
        }

        output
    }

    /// Format log entry as JSON
    fn format_json(&self, entry: &LogEntry) -> String {
        match serde_json::to_string(entry) {
            Ok(json) => json,
            Err(_) => format!("{{\"error\": \"Failed to serialize log entry\", \"message\": \"{}\"}}", entry.message),
        }
    }

    /// Format log entry in compact format
    fn format_compact(&self, entry: &LogEntry) -> String {
        let timestamp = entry.timestamp.format("%H:%M:%S");
        format!("{} {} {}: {}",
            timestamp,
            entry.level.as_str().chars().next().unwrap_or('?'),
            entry.logger,
            entry.message
        )
    }
}

/// Builder pattern for creating log entries
pub struct LogEntryBuilder<'a> {
    logger: &'a Logger,
    entry: LogEntry,
}

impl<'a> LogEntryBuilder<'a> {
    fn new(logger: &'a Logger, level: LogLevel, message: String) -> Self {
        Self {
            logger,
            entry: LogEntry {
                timestamp: Utc::now(),
                level,
                message,
                logger: logger.name.clone(),
                correlation_id: None,
                fields: HashMap::new(),
                location: None,
            },
        }
    }

    /// Add a correlation ID
    pub fn correlation_id(mut self, id: &str) -> Self {
        self.entry.correlation_id = Some(id.to_string());
        self
    }

    /// Add a structured field
    pub fn field<T: Serialize>(mut self, key: &str, value: T) -> Self {
        if let Ok(json_value) = serde_json::to_value(value) {
            self.entry.fields.insert(key.to_string(), json_value);
        }
        self
    }

    /// Add location information
    pub fn location(mut self, file: &str, line: u32, module: Option<&str>) -> Self {
        self.entry.location = Some(LogLocation {
            file: file.to_string(),
            line,
            module: module.map(String::from),
        });
        self
    }

    /// Add the headline numbers of a file summary
    pub fn summary(self, summary: &FileSummary) -> Self {
        self.field("file", summary.source.display().to_string())
            .field("runs", summary.runs)
            .field("runs_with_data", summary.runs_with_data)
            .field("mean_time", summary.statistics.time.mean)
            .field("mean_success", summary.statistics.success.mean)
            .field("mean_found", summary.statistics.found.mean)
            .field("mean_packets", summary.statistics.packets.mean)
            .field("mean_overhead", summary.statistics.overhead.mean)
    }

    /// Add error information
    pub fn error_info(self, error: &AppError) -> Self {
        self.field("error_category", error.category())
            .field("error_exit_code", error.exit_code())
    }

    /// Finalize and write the log entry
    pub fn log(self) {
        self.logger.write_entry(self.entry);
    }

    /// Finalize and return the rendered line instead of writing it
    pub fn render(self) -> Option<String> {
        self.logger.render(self.entry)
    }
}

/// Logger for batch progress and phase timing
pub struct BatchLogger {
    logger: Logger,
    start_times: HashMap<String, DateTime<Utc>>,
}

impl BatchLogger {
    /// Create a new batch logger
    pub fn new(config: &Config) -> Self {
        Self {
            logger: Logger::with_config("BATCH".to_string(), config),
            start_times: HashMap::new(),
        }
    }

    /// Underlying logger
    pub fn logger(&self) -> &Logger {
        &self.logger
    }

    /// Mutable access, used to attach the session id
    pub fn logger_mut(&mut self) -> &mut Logger {
        &mut self.logger
    }

    /// Start timing an operation
    pub fn start_timing(&mut self, operation: &str) {
        let start_time = Utc::now();
        self.start_times.insert(operation.to_string(), start_time);

        self.logger.debug(&format!("Started timing: {}", operation))
            .field("operation", operation)
            .field("start_time", start_time)
            .log();
    }

    /// End timing an operation and log the duration
    pub fn end_timing(&mut self, operation: &str) -> Option<chrono::Duration> {
        if let Some(start_time) = self.start_times.remove(operation) {
            let end_time = Utc::now();
            let duration = end_time - start_time;

            self.logger.info(&format!("Completed {} in {}ms", operation, duration.num_milliseconds()))
                .field("operation", operation)
                .field("duration_ms", duration.num_milliseconds())
                .log();

            Some(duration)
        } else {
            self.logger.warn(&format!("Attempted to end timing for unknown operation: {}", operation))
                .field("operation", operation)
                .log();
            None
        }
    }

    /// Log the start of a manifest group
    pub fn log_group_start(&self, group: &str, inputs: usize) {
        self.logger.info(&format!("Processing group '{}' ({} files)", group, inputs))
            .field("group", group)
            .field("inputs", inputs)
            .log();
    }

    /// Log a processed results file
    pub fn log_file_summary(&self, summary: &FileSummary) {
        self.logger.info(&format!(
            "Aggregated {} runs from {}",
            summary.runs,
            summary.source.display()
        ))
        .summary(summary)
        .log();

        if summary.dangling_lines > 0 {
            self.logger.warn(&format!(
                "{} trailing line(s) after the last control line of {} were ignored",
                summary.dangling_lines,
                summary.source.display()
            ))
            .field("file", summary.source.display().to_string())
            .field("dangling_lines", summary.dangling_lines)
            .log();
        }

        let without_data = summary.runs - summary.runs_with_data;
        if without_data > 0 {
            self.logger.debug(&format!(
                "{} run(s) without any data only count towards found/success",
                without_data
            ))
            .field("file", summary.source.display().to_string())
            .field("runs_without_data", without_data)
            .log();
        }
    }

    /// Log the whole batch
    pub fn log_batch_summary(&self, files: usize, groups: usize, total_duration: std::time::Duration) {
        self.logger.info(&format!(
            "Batch summary: {} files in {} groups processed in {:.3}s",
            files,
            groups,
            total_duration.as_secs_f64()
        ))
        .field("files", files)
        .field("groups", groups)
        .field("total_duration_seconds", total_duration.as_secs_f64())
        .log();
    }
}

/// Error event logger with enhanced context
pub struct ErrorEventLogger {
    logger: Logger,
}

impl ErrorEventLogger {
    /// Create a new error event logger
    pub fn new(config: &Config) -> Self {
        Self {
            logger: Logger::with_config("ERR".to_string(), config),
        }
    }

    /// Log the error that stopped the batch
    pub fn log_error(&self, error: &AppError, context: Option<&str>) {
        let mut builder = self.logger.error(&error.to_string())
            .error_info(error);

        if let Some(ctx) = context {
            builder = builder.field("context", ctx);
        }

        builder.log();
    }
}

/// Logger factory sharing one session id
pub struct LoggerFactory {
    config: Config,
    session_id: String,
}

impl LoggerFactory {
    /// Create a new logger factory
    pub fn new(config: Config) -> Self {
        Self {
            config,
            session_id: Uuid::new_v4().to_string(),
        }
    }

    /// Create a logger with a specific name
    pub fn create_logger(&self, name: &str) -> Logger {
        let mut logger = Logger::with_config(name.to_string(), &self.config);
        logger.set_session_id(self.session_id.clone());
        logger
    }

    /// Create a batch logger
    pub fn create_batch_logger(&self) -> BatchLogger {
        let mut batch = BatchLogger::new(&self.config);
        batch.logger_mut().set_session_id(self.session_id.clone());
        batch
    }

    /// Create an error event logger
    pub fn create_error_logger(&self) -> ErrorEventLogger {
        let mut errors = ErrorEventLogger::new(&self.config);
        errors.logger.set_session_id(self.session_id.clone());
        errors
    }

    /// Get session ID
    pub fn session_id(&self) -> &str {
        &self.session_id
    }
}

/// Convenience macros for logging with location information
#[macro_export]
macro_rules! log_debug {
    ($logger:expr, $($arg:tt)*) => {
        $logger.debug(&format!($($arg)*))
            .location(file!(), line!(), Some(module_path!()))
            .log()
    };
}

#[macro_export]
macro_rules! log_info {
    ($logger:expr, $($arg:tt)*) => {
        $logger.info(&format!($($arg)*))
            .location(file!(), line!(), Some(module_path!()))
            .log()
    };
}

#[macro_export]
macro_rules! log_warn {
    ($logger:expr, $($arg:tt)*) => {
        $logger.warn(&format!($($arg)*))
            .location(file!(), line!(), Some(module_path!()))
            .log()
    };
}
