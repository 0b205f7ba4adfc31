//! Core formatting traits and implementations
//!
//! This module defines the console report interface and provides
//! a plain text implementation with table formatting capabilities.

use crate::{
    aggregator::FileSummary,
    error::{AppError, Result},
    stats::SeriesSummary,
    types::Metric,
};
use super::{BatchReport, GroupReport};
use std::fmt::Write as _;

/// Main trait for console report formatting
pub trait ReportFormatter {
    /// Format a header section
    fn format_header(&self, title: &str) -> Result<String>;

    /// Format the per-file table of one manifest group
    fn format_group_table(&self, group: &GroupReport) -> Result<String>;

    /// Format the closing batch summary
    fn format_batch_summary(&self, report: &BatchReport) -> Result<String>;

    /// Format a one-line progress entry for a processed file
    fn format_file_line(&self, summary: &FileSummary) -> Result<String>;

    /// Format error messages
    fn format_error(&self, error: &str) -> Result<String>;

    /// Format warning messages
    fn format_warning(&self, warning: &str) -> Result<String>;

    /// Format success messages
    fn format_success(&self, message: &str) -> Result<String>;
}

/// Configuration options for formatting
#[derive(Debug, Clone)]
pub struct FormattingOptions {
    /// Enable colored output
    pub enable_color: bool,
    /// Show standard deviations next to the confidence intervals
    pub verbose_mode: bool,
    /// Show table borders
    pub table_borders: bool,
    /// Maximum output width
    pub max_width: usize,
}

impl Default for FormattingOptions {
    fn default() -> Self {
        Self {
            enable_color: true,
            verbose_mode: false,
            table_borders: true,
            max_width: 160,
        }
    }
}

/// Table formatting configuration
#[derive(Debug, Clone)]
pub struct TableFormat {
    /// Column definitions
    pub columns: Vec<Column>,
    /// Show borders around table
    pub show_borders: bool,
    /// Show header row
    pub show_header: bool,
    /// Minimum column width
    pub min_column_width: usize,
    /// Maximum column width
    pub max_column_width: usize,
}

/// Column definition for table formatting
#[derive(Debug, Clone)]
pub struct Column {
    /// Column header
    pub header: String,
    /// Column alignment
    pub alignment: Alignment,
    /// Minimum width
    pub min_width: usize,
    /// Maximum width
    pub max_width: usize,
}

impl Column {
    fn new(header: &str, alignment: Alignment, min_width: usize, max_width: usize) -> Self {
        Self {
            header: header.to_string(),
            alignment,
            min_width,
            max_width,
        }
    }
}

/// Text alignment options
#[derive(Debug, Clone)]
pub enum Alignment {
    Left,
    Right,
    Center,
}

/// Row data for table formatting
pub type RowData = Vec<String>;

/// Plain text formatter implementation
pub struct PlainFormatter {
    options: FormattingOptions,
}

impl PlainFormatter {
    /// Create a new plain formatter with options
    pub fn new(options: FormattingOptions) -> Self {
        Self { options }
    }

    /// Column layout of a group table
    pub(crate) fn group_table_format(&self) -> TableFormat {
        let mut columns = vec![
            Column::new("File", Alignment::Left, 12, 48),
            Column::new("Runs", Alignment::Right, 4, 8),
            Column::new("With data", Alignment::Right, 4, 9),
        ];
        for metric in Metric::ALL {
            columns.push(Column::new(metric_header(metric), Alignment::Right, 10, 32));
        }

        TableFormat {
            columns,
            show_borders: self.options.table_borders,
            show_header: true,
            min_column_width: 4,
            max_column_width: self.options.max_width / 4,
        }
    }

    /// Table rows of a group, one per file
    pub(crate) fn group_rows(&self, group: &GroupReport) -> Vec<RowData> {
        group.files.iter()
            .map(|summary| {
                let mut row = vec![
                    display_name(summary),
                    summary.runs.to_string(),
                    summary.runs_with_data.to_string(),
                ];
                for metric in Metric::ALL {
                    row.push(self.format_series(summary.statistics.get(metric)));
                }
                row
            })
            .collect()
    }

    /// `mean ± half-width`, with the standard deviation in verbose mode
    pub(crate) fn format_series(&self, series: &SeriesSummary) -> String {
        if self.options.verbose_mode {
            format!("{:.2} ± {:.2} (sd {:.2})", series.mean, series.confidence_half_width, series.std_dev)
        } else {
            format!("{:.2} ± {:.2}", series.mean, series.confidence_half_width)
        }
    }

    /// Create a table with the given format and data
    pub(crate) fn create_table(&self, format: &TableFormat, rows: &[RowData]) -> Result<String> {
        if rows.is_empty() {
            return Ok(String::new());
        }

        let column_widths = self.calculate_column_widths(format, rows);

        let mut output = String::new();

        if format.show_header && !format.columns.is_empty() {
            if format.show_borders {
                output.push_str(&self.create_horizontal_border(&column_widths));
                output.push('\n');
            }

            let headers: Vec<String> = format.columns.iter().map(|c| c.header.clone()).collect();
            output.push_str(&self.create_row(&headers, &column_widths, format));
            output.push('\n');

            if format.show_borders {
                output.push_str(&self.create_horizontal_border(&column_widths));
                output.push('\n');
            }
        }

        for row in rows {
            output.push_str(&self.create_row(row, &column_widths, format));
            output.push('\n');
        }

        if format.show_borders {
            output.push_str(&self.create_horizontal_border(&column_widths));
        }

        Ok(output)
    }

    /// Calculate optimal column widths
    fn calculate_column_widths(&self, format: &TableFormat, rows: &[RowData]) -> Vec<usize> {
        let num_columns = format.columns.len().max(
            rows.iter().map(|r| r.len()).max().unwrap_or(0)
        );

        (0..num_columns)
            .map(|col_idx| {
                let mut max_width = match format.columns.get(col_idx) {
                    Some(col) => col.min_width.max(col.header.chars().count()),
                    None => format.min_column_width,
                };

                for row in rows {
                    if let Some(cell) = row.get(col_idx) {
                        max_width = max_width.max(cell.chars().count());
                    }
                }

                match format.columns.get(col_idx) {
                    Some(col) => max_width.min(col.max_width),
                    None => max_width.min(format.max_column_width),
                }
            })
            .collect()
    }

    /// Create a table row
    fn create_row(&self, data: &[String], widths: &[usize], format: &TableFormat) -> String {
        let mut row = String::new();

        if format.show_borders {
            row.push('|');
        }

        for (idx, (cell, &width)) in data.iter().zip(widths.iter()).enumerate() {
            let alignment = format.columns.get(idx)
                .map(|c| &c.alignment)
                .unwrap_or(&Alignment::Left);

            let padded_cell = align_text(cell, width, alignment);

            if format.show_borders {
                row.push(' ');
            }
            row.push_str(&padded_cell);
            if format.show_borders {
                row.push_str(" |");
            } else {
                row.push_str("  ");
            }
        }

        row.trim_end().to_string()
    }

    /// Create horizontal border for table
    fn create_horizontal_border(&self, widths: &[usize]) -> String {
        let mut border = String::new();

        if !widths.is_empty() {
            border.push('+');
            for &width in widths {
                border.push_str(&"-".repeat(width + 2));
                border.push('+');
            }
        }

        border
    }
}

/// Align text within specified width; counts chars so `±` pads correctly
pub(crate) fn align_text(text: &str, width: usize, alignment: &Alignment) -> String {
    let len = text.chars().count();
    if len >= width {
        return text.chars().take(width).collect();
    }

    let padding = width - len;
    match alignment {
        Alignment::Left => format!("{}{}", text, " ".repeat(padding)),
        Alignment::Right => format!("{}{}", " ".repeat(padding), text),
        Alignment::Center => {
            let left_pad = padding / 2;
            let right_pad = padding - left_pad;
            format!("{}{}{}", " ".repeat(left_pad), text, " ".repeat(right_pad))
        }
    }
}

/// Column header of a metric
pub(crate) fn metric_header(metric: Metric) -> &'static str {
    match metric {
        Metric::Time => "Time",
        Metric::Success => "Success %",
        Metric::Found => "Found %",
        Metric::Packets => "Packets %",
        Metric::Overhead => "Overhead",
    }
}

/// File name without the input root
pub(crate) fn display_name(summary: &FileSummary) -> String {
    summary.source.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| summary.source.display().to_string())
}

/// Format a duration in human-readable form
pub(crate) fn format_duration(duration: std::time::Duration) -> String {
    let duration_ms = duration.as_secs_f64() * 1000.0;
    if duration_ms < 1000.0 {
        format!("{:.1}ms", duration_ms)
    } else if duration_ms < 60000.0 {
        format!("{:.2}s", duration_ms / 1000.0)
    } else {
        let minutes = (duration_ms / 60000.0) as u32;
        let seconds = (duration_ms % 60000.0) / 1000.0;
        format!("{}m{:.1}s", minutes, seconds)
    }
}

fn fmt_err(e: std::fmt::Error) -> AppError {
    AppError::internal(format!("Failed to format report: {}", e))
}

impl ReportFormatter for PlainFormatter {
    fn format_header(&self, title: &str) -> Result<String> {
        let mut output = String::new();
        let border = "=".repeat(title.chars().count() + 4);

        writeln!(output, "{}", border).map_err(fmt_err)?;
        writeln!(output, "  {}  ", title).map_err(fmt_err)?;
        write!(output, "{}", border).map_err(fmt_err)?;

        Ok(output)
    }

    fn format_group_table(&self, group: &GroupReport) -> Result<String> {
        let mut output = String::new();
        writeln!(output, "Group: {} ({} files)", group.name, group.files.len()).map_err(fmt_err)?;

        if group.files.is_empty() {
            write!(output, "  (no input files)").map_err(fmt_err)?;
            return Ok(output);
        }

        let table = self.create_table(&self.group_table_format(), &self.group_rows(group))?;
        output.push_str(&table);
        Ok(output)
    }

    fn format_batch_summary(&self, report: &BatchReport) -> Result<String> {
        let mut output = String::new();

        writeln!(output, "Batch Summary:").map_err(fmt_err)?;
        writeln!(output, "--------------").map_err(fmt_err)?;
        writeln!(output, "Groups:         {}", report.groups.len()).map_err(fmt_err)?;
        writeln!(output, "Files:          {}", report.file_count()).map_err(fmt_err)?;
        writeln!(output, "Runs:           {}", report.run_count()).map_err(fmt_err)?;
        writeln!(output, "Output:         {}", report.output_path.display()).map_err(fmt_err)?;
        write!(output, "Duration:       {}", format_duration(report.duration)).map_err(fmt_err)?;

        Ok(output)
    }

    fn format_file_line(&self, summary: &FileSummary) -> Result<String> {
        Ok(format!(
            "{}: {} runs ({} with data), time {}",
            display_name(summary),
            summary.runs,
            summary.runs_with_data,
            self.format_series(&summary.statistics.time)
        ))
    }

    fn format_error(&self, error: &str) -> Result<String> {
        Ok(format!("ERROR: {}", error))
    }

    fn format_warning(&self, warning: &str) -> Result<String> {
        Ok(format!("WARNING: {}", warning))
    }

    fn format_success(&self, message: &str) -> Result<String> {
        Ok(format!("SUCCESS: {}", message))
    }
}
