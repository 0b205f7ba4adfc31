//! Colored formatter implementation with terminal color support
//!
//! Renders the same report as the plain formatter with ANSI colors; the
//! percentage columns are color coded by how close they are to 100%.

use crate::{
    aggregator::FileSummary,
    error::{AppError, Result},
    stats::SeriesSummary,
    types::Metric,
};
use super::formatter::{display_name, format_duration, metric_header, FormattingOptions, PlainFormatter, ReportFormatter};
use super::{BatchReport, GroupReport};
use colored::*;
use std::fmt::Write as _;

/// Rating of a percentage metric for color coding
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PercentageLevel {
    High,    // >= 95%
    Medium,  // 80-95%
    Low,     // < 80%
}

impl PercentageLevel {
    /// Classify a percentage in [0, 100]
    pub fn from_percentage(percentage: f64) -> Self {
        if percentage >= 95.0 {
            Self::High
        } else if percentage >= 80.0 {
            Self::Medium
        } else {
            Self::Low
        }
    }

    /// Get color for this level
    pub fn color(&self, scheme: &ColorScheme) -> Color {
        match self {
            Self::High => scheme.success,
            Self::Medium => scheme.warning,
            Self::Low => scheme.error,
        }
    }
}

/// Color scheme configuration
#[derive(Debug, Clone)]
pub struct ColorScheme {
    pub header: Color,
    pub success: Color,
    pub warning: Color,
    pub error: Color,
    pub info: Color,
    pub muted: Color,
    pub border: Color,
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self {
            header: Color::Blue,
            success: Color::Green,
            warning: Color::Yellow,
            error: Color::Red,
            info: Color::Cyan,
            muted: Color::BrightBlack,
            border: Color::BrightBlack,
        }
    }
}

const FILE_WIDTH: usize = 34;
const COUNT_WIDTH: usize = 6;
const SERIES_WIDTH: usize = 18;

/// Colored formatter implementation
pub struct ColoredFormatter {
    plain_formatter: PlainFormatter,
    options: FormattingOptions,
    color_scheme: ColorScheme,
}

impl ColoredFormatter {
    /// Create a new colored formatter with options
    pub fn new(options: FormattingOptions) -> Self {
        Self::with_color_scheme(options, ColorScheme::default())
    }

    /// Create a colored formatter with custom color scheme
    pub fn with_color_scheme(options: FormattingOptions, color_scheme: ColorScheme) -> Self {
        let plain_formatter = PlainFormatter::new(options.clone());
        Self {
            plain_formatter,
            options,
            color_scheme,
        }
    }

    /// Apply color to text if colors are enabled
    fn colorize(&self, text: &str, color: Color) -> ColoredString {
        if self.options.enable_color {
            text.color(color)
        } else {
            text.normal()
        }
    }

    /// Apply bold formatting if colors are enabled
    fn bold(&self, text: &str) -> ColoredString {
        if self.options.enable_color {
            text.bold()
        } else {
            text.normal()
        }
    }

    /// Bold text in the given color, plain when colors are disabled
    fn emphasize(&self, text: &str, color: Color) -> ColoredString {
        if self.options.enable_color {
            text.bold().color(color)
        } else {
            text.normal()
        }
    }

    /// Series cell, padded before coloring so escape codes don't skew the layout
    fn series_cell(&self, metric: Metric, series: &SeriesSummary) -> String {
        let padded = format!("{:>width$}", self.plain_formatter.format_series(series), width = SERIES_WIDTH);
        match metric {
            Metric::Success | Metric::Found | Metric::Packets => {
                let level = PercentageLevel::from_percentage(series.mean);
                self.colorize(&padded, level.color(&self.color_scheme)).to_string()
            }
            Metric::Time | Metric::Overhead => padded,
        }
    }

    fn rule(&self) -> ColoredString {
        let width = FILE_WIDTH + 2 * (COUNT_WIDTH + 1) + Metric::ALL.len() * (SERIES_WIDTH + 1);
        self.colorize(&"─".repeat(width), self.color_scheme.border)
    }

    fn table_row(&self, summary: &FileSummary) -> String {
        let mut name = display_name(summary);
        if name.chars().count() > FILE_WIDTH {
            name = format!("{}...", name.chars().take(FILE_WIDTH - 3).collect::<String>());
        }

        let mut row = format!(
            "{:<file$} {:>count$} {:>count$}",
            name,
            summary.runs,
            summary.runs_with_data,
            file = FILE_WIDTH,
            count = COUNT_WIDTH
        );
        for metric in Metric::ALL {
            row.push(' ');
            row.push_str(&self.series_cell(metric, summary.statistics.get(metric)));
        }
        row
    }

    /// Check if terminal supports colors
    pub fn supports_color() -> bool {
        std::env::var("NO_COLOR").is_err()
            && std::env::var("TERM").map(|t| t != "dumb").unwrap_or(true)
    }

    /// Enable or disable colors
    pub fn set_colors_enabled(&mut self, enabled: bool) {
        self.options.enable_color = enabled;
    }
}

fn fmt_err(e: std::fmt::Error) -> AppError {
    AppError::internal(format!("Failed to format report: {}", e))
}

impl ReportFormatter for ColoredFormatter {
    fn format_header(&self, title: &str) -> Result<String> {
        let border = "═".repeat(title.chars().count() + 4);
        Ok(format!(
            "{}\n  {}  \n{}",
            self.colorize(&border, self.color_scheme.header),
            self.emphasize(title, self.color_scheme.header),
            self.colorize(&border, self.color_scheme.header)
        ))
    }

    fn format_group_table(&self, group: &GroupReport) -> Result<String> {
        let mut output = String::new();

        writeln!(
            output,
            "{} {}",
            self.emphasize(&group.name, self.color_scheme.info),
            self.colorize(&format!("({} files)", group.files.len()), self.color_scheme.muted)
        ).map_err(fmt_err)?;

        if group.files.is_empty() {
            write!(output, "  {}", self.colorize("(no input files)", self.color_scheme.muted)).map_err(fmt_err)?;
            return Ok(output);
        }

        let mut header = format!(
            "{:<file$} {:>count$} {:>count$}",
            "File",
            "Runs",
            "Data",
            file = FILE_WIDTH,
            count = COUNT_WIDTH
        );
        for metric in Metric::ALL {
            header.push_str(&format!(" {:>width$}", metric_header(metric), width = SERIES_WIDTH));
        }

        writeln!(output, "{}", self.rule()).map_err(fmt_err)?;
        writeln!(output, "{}", self.bold(&header)).map_err(fmt_err)?;
        writeln!(output, "{}", self.rule()).map_err(fmt_err)?;
        for summary in &group.files {
            writeln!(output, "{}", self.table_row(summary)).map_err(fmt_err)?;
        }
        write!(output, "{}", self.rule()).map_err(fmt_err)?;

        Ok(output)
    }

    fn format_batch_summary(&self, report: &BatchReport) -> Result<String> {
        let mut output = String::new();
        let label = |text: &str| self.bold(&format!("{:<15}", text));

        writeln!(output, "{}", self.emphasize("📊 Batch Summary", self.color_scheme.header)).map_err(fmt_err)?;
        writeln!(output, "{} {}", label("Groups:"), report.groups.len()).map_err(fmt_err)?;
        writeln!(output, "{} {}", label("Files:"), report.file_count()).map_err(fmt_err)?;
        writeln!(output, "{} {}", label("Runs:"), report.run_count()).map_err(fmt_err)?;
        writeln!(
            output,
            "{} {}",
            label("Output:"),
            self.colorize(&report.output_path.display().to_string(), self.color_scheme.info)
        ).map_err(fmt_err)?;
        write!(output, "{} {}", label("Duration:"), format_duration(report.duration)).map_err(fmt_err)?;

        Ok(output)
    }

    fn format_file_line(&self, summary: &FileSummary) -> Result<String> {
        let found = PercentageLevel::from_percentage(summary.statistics.found.mean);
        Ok(format!(
            "{} {}: {} runs ({} with data), found {}",
            self.colorize("✓", self.color_scheme.success),
            self.bold(&display_name(summary)),
            summary.runs,
            summary.runs_with_data,
            self.colorize(
                &self.plain_formatter.format_series(&summary.statistics.found),
                found.color(&self.color_scheme)
            )
        ))
    }

    fn format_error(&self, error: &str) -> Result<String> {
        Ok(format!("{} {}", self.colorize("❌", self.color_scheme.error), self.colorize(error, self.color_scheme.error)))
    }

    fn format_warning(&self, warning: &str) -> Result<String> {
        Ok(format!("{} {}", self.colorize("⚠️", self.color_scheme.warning), self.colorize(warning, self.color_scheme.warning)))
    }

    fn format_success(&self, message: &str) -> Result<String> {
        Ok(format!("{} {}", self.colorize("✅", self.color_scheme.success), self.colorize(message, self.color_scheme.success)))
    }
}
