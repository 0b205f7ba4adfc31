//! Error handling for the batch statistics aggregator

use std::path::Path;
use thiserror::Error;

/// Custom error types for the statistics aggregator
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// I/O errors (opening inputs, writing the summary file)
    #[error("I/O error: {0}")]
    Io(String),

    /// Parsing errors (result lines, control lines, manifest JSON)
    #[error("Parsing error: {0}")]
    Parse(String),

    /// Statistics calculation errors (empty or single-sample series)
    #[error("Statistics error: {0}")]
    Statistics(String),

    /// Generic internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config(message.into())
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation(message.into())
    }

    /// Create a new I/O error
    pub fn io<S: Into<String>>(message: S) -> Self {
        Self::Io(message.into())
    }

    /// Create a new parsing error
    pub fn parse<S: Into<String>>(message: S) -> Self {
        Self::Parse(message.into())
    }

    /// Create a parsing error pointing at a line of an input file
    pub fn parse_at<S: Into<String>>(path: &Path, line: usize, message: S) -> Self {
        Self::Parse(format!("{}:{}: {}", path.display(), line, message.into()))
    }

    /// Create a new statistics error
    pub fn statistics<S: Into<String>>(message: S) -> Self {
        Self::Statistics(message.into())
    }

    /// Create a new internal error
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal(message.into())
    }

    /// Get error category for logging and reporting
    pub fn category(&self) -> &'static str {
        match self {
            Self::Config(_) => "CONFIG",
            Self::Validation(_) => "VALIDATION",
            Self::Io(_) => "IO",
            Self::Parse(_) => "PARSE",
            Self::Statistics(_) => "STATS",
            Self::Internal(_) => "INTERNAL",
        }
    }

    /// Get user-friendly error message with suggestions
    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::Config(msg) => {
                format!("Configuration problem: {}\n\nSuggestion: Check your .env file or command line arguments.", msg)
            }
            Self::Validation(msg) => {
                format!("Invalid input: {}\n\nSuggestion: Check the input root, output path and manifest entries.", msg)
            }
            Self::Io(msg) => {
                format!("File operation failed: {}\n\nSuggestion: Check that every input listed in the manifest exists under the input root.", msg)
            }
            Self::Parse(msg) => {
                format!("Failed to parse data: {}\n\nSuggestion: Result lines must look like 'time|success|found|packets' and each run must end with a control line.", msg)
            }
            Self::Statistics(msg) => {
                format!("Statistics calculation failed: {}\n\nSuggestion: Each file needs at least two runs with data for every metric.", msg)
            }
            Self::Internal(msg) => {
                format!("Internal error: {}\n\nThis is likely a bug. Please report this issue with the error details.", msg)
            }
        }
    }

    /// Get exit code for this error type
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) | Self::Validation(_) | Self::Parse(_) => 1,
            Self::Io(_) => 5,
            Self::Statistics(_) => 6,
            Self::Internal(_) => 99,
        }
    }

    /// Format error for console display with color coding
    pub fn format_for_console(&self, use_color: bool) -> String {
        let category = self.category();
        let message = self.to_string();

        if use_color {
            use colored::Colorize;
            match self {
                Self::Config(_) | Self::Validation(_) | Self::Parse(_) => {
                    format!("[{}] {}", category.red().bold(), message.red())
                }
                Self::Io(_) | Self::Statistics(_) => {
                    format!("[{}] {}", category.cyan().bold(), message.cyan())
                }
                Self::Internal(_) => {
                    format!("[{}] {}", category.bright_red().bold(), message.bright_red())
                }
            }
        } else {
            format!("[{}] {}", category, message)
        }
    }
}

// Standard library error conversions
impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::io(error.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(error: serde_json::Error) -> Self {
        Self::parse(format!("invalid JSON at line {} column {}: {}", error.line(), error.column(), error))
    }
}

impl From<dotenv::Error> for AppError {
    fn from(error: dotenv::Error) -> Self {
        Self::config(format!(".env file could not be read: {}", error))
    }
}

impl From<std::num::ParseIntError> for AppError {
    fn from(error: std::num::ParseIntError) -> Self {
        Self::parse(format!("not an integer ({})", error))
    }
}

impl From<std::num::ParseFloatError> for AppError {
    fn from(error: std::num::ParseFloatError) -> Self {
        Self::parse(format!("not a number ({})", error))
    }
}

impl From<std::str::ParseBoolError> for AppError {
    fn from(error: std::str::ParseBoolError) -> Self {
        Self::parse(format!("expected true or false ({})", error))
    }
}

// Anyhow integration
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::internal(error.to_string())
    }
}

/// Custom Result type for the application
pub type Result<T> = std::result::Result<T, AppError>;

/// Error context trait for adding context to errors
pub trait ErrorContext<T> {
    /// Add context to an error, keeping its category
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;

    /// Add static context to an error
    fn context(self, message: &'static str) -> Result<T>;
}

impl<T, E> ErrorContext<T> for std::result::Result<T, E>
where
    E: Into<AppError>,
{
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| {
            let context = f();
            match e.into() {
                AppError::Config(msg) => AppError::Config(format!("{}: {}", context, msg)),
                AppError::Validation(msg) => AppError::Validation(format!("{}: {}", context, msg)),
                AppError::Io(msg) => AppError::Io(format!("{}: {}", context, msg)),
                AppError::Parse(msg) => AppError::Parse(format!("{}: {}", context, msg)),
                AppError::Statistics(msg) => AppError::Statistics(format!("{}: {}", context, msg)),
                AppError::Internal(msg) => AppError::Internal(format!("{}: {}", context, msg)),
            }
        })
    }

    fn context(self, message: &'static str) -> Result<T> {
        self.with_context(|| message.to_string())
    }
}

/// Error reporter for user feedback on stderr
pub struct ErrorReporter {
    pub use_color: bool,
    pub verbose: bool,
}

impl ErrorReporter {
    /// Create a new error reporter
    pub fn new(use_color: bool, verbose: bool) -> Self {
        Self { use_color, verbose }
    }

    /// Report an error to the user
    pub fn report_error(&self, error: &AppError) {
        eprintln!("{}", error.format_for_console(self.use_color));

        if self.verbose {
            eprintln!();
            eprintln!("{}", error.user_friendly_message());
        }
    }
}

impl Default for ErrorReporter {
    fn default() -> Self {
        Self::new(true, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_category_and_exit_code_table() {
        let cases = [
            (AppError::config("root missing"), "CONFIG", 1, "Configuration error: root missing"),
            (AppError::validation("requesters must be positive"), "VALIDATION", 1, "Validation error: requesters must be positive"),
            (AppError::io("cannot open input"), "IO", 5, "I/O error: cannot open input"),
            (AppError::parse("expected 4 fields"), "PARSE", 1, "Parsing error: expected 4 fields"),
            (AppError::statistics("1 sample"), "STATS", 6, "Statistics error: 1 sample"),
            (AppError::internal("formatter"), "INTERNAL", 99, "Internal error: formatter"),
        ];

        for (error, category, code, display) in cases {
            assert_eq!(error.category(), category);
            assert_eq!(error.exit_code(), code);
            assert_eq!(error.to_string(), display);
        }
    }

    #[test]
    fn test_parse_at_includes_location() {
        let path = PathBuf::from("stratos/centralized_mobile_0.txt");
        let error = AppError::parse_at(&path, 7, "expected 4 fields, found 3");
        let display = error.to_string();
        assert!(display.contains("centralized_mobile_0.txt:7"));
        assert!(display.contains("expected 4 fields"));
    }

    #[test]
    fn test_user_friendly_messages() {
        let error = AppError::parse("bad line");
        let message = error.user_friendly_message();
        assert!(message.contains("Failed to parse data"));
        assert!(message.contains("Suggestion:"));
        assert!(message.contains("time|success|found|packets"));
    }

    #[test]
    fn test_error_conversions() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let app_error: AppError = io_error.into();
        assert_eq!(app_error.category(), "IO");

        let parse_error = "not_a_number".parse::<i64>().unwrap_err();
        let app_error: AppError = parse_error.into();
        assert_eq!(app_error.category(), "PARSE");

        let float_error = "bytes".parse::<f64>().unwrap_err();
        let app_error: AppError = float_error.into();
        assert!(app_error.to_string().contains("not a number"));
    }

    #[test]
    fn test_json_parse_error_conversion() {
        let json_error: serde_json::Error = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let app_error: AppError = json_error.into();
        assert_eq!(app_error.category(), "PARSE");
        assert!(app_error.to_string().contains("invalid JSON at line 1"));
    }

    #[test]
    fn test_dotenv_error_conversion() {
        let dotenv_error = dotenv::Error::LineParse(".env".to_string(), 1);
        let app_error: AppError = dotenv_error.into();
        assert_eq!(app_error.category(), "CONFIG");
        assert!(app_error.to_string().contains(".env file"));
    }

    #[test]
    fn test_bool_parse_error_conversion() {
        let bool_error = "not-a-bool".parse::<bool>().unwrap_err();
        let app_error: AppError = bool_error.into();
        assert_eq!(app_error.category(), "PARSE");
        assert!(app_error.to_string().contains("expected true or false"));
    }

    #[test]
    fn test_anyhow_integration() {
        let anyhow_error = anyhow::anyhow!("Test anyhow error");
        let app_error: AppError = anyhow_error.into();
        assert_eq!(app_error.category(), "INTERNAL");

        let app_error = AppError::config("Test config error");
        let anyhow_error = anyhow::anyhow!(app_error);
        assert!(anyhow_error.to_string().contains("Configuration error"));
    }

    #[test]
    fn test_error_context_keeps_category() {
        let result: std::result::Result<(), std::io::Error> = Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "File not found",
        ));

        let error = result
            .with_context(|| "While opening centralized_mobile_0.txt".to_string())
            .unwrap_err();
        assert_eq!(error.category(), "IO");
        assert!(error.to_string().contains("While opening centralized_mobile_0.txt"));
        assert!(error.to_string().contains("File not found"));
    }

    #[test]
    fn test_static_context() {
        let result: Result<()> = Err(AppError::statistics("series has 1 sample"));
        let error = result.context("time series").unwrap_err();
        assert_eq!(error.category(), "STATS");
        assert!(error.to_string().contains("time series: series has 1 sample"));
    }

    #[test]
    fn test_console_formatting() {
        let error = AppError::config("Test error");
        let formatted_no_color = error.format_for_console(false);
        let formatted_color = error.format_for_console(true);

        assert!(formatted_no_color.contains("[CONFIG]"));
        assert!(formatted_color.contains("CONFIG"));
        assert!(formatted_no_color.contains("Test error"));
        assert!(formatted_color.contains("Test error"));
    }

    #[test]
    fn test_error_reporter_default() {
        let reporter = ErrorReporter::default();
        assert!(reporter.use_color);
        assert!(!reporter.verbose);

        // Just test that it doesn't panic
        ErrorReporter::new(false, true).report_error(&AppError::io("missing input"));
    }
}
