//! Summary file output and console reports
//!
//! [`SummaryWriter`] produces the pipe-delimited summary file; the
//! formatters render a human-readable report of the same numbers for
//! verbose console output and never touch the summary file.

mod formatter;
mod colored;

pub use formatter::{
    ReportFormatter,
    PlainFormatter,
    TableFormat,
    FormattingOptions,
    Column,
    Alignment,
    RowData,
};
pub use colored::{
    ColoredFormatter,
    ColorScheme,
    PercentageLevel,
};

use crate::{
    aggregator::FileSummary,
    error::{ErrorContext, Result},
};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Writes summary lines: per file a confidence line then a mean line,
/// groups separated by one empty line
pub struct SummaryWriter<W: Write> {
    writer: W,
    lines_written: usize,
}

impl SummaryWriter<BufWriter<File>> {
    /// Create or truncate the summary file
    pub fn create(path: &Path) -> Result<Self> {
        let file = File::create(path)
            .with_context(|| format!("Failed to create output file {}", path.display()))?;
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write> SummaryWriter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            lines_written: 0,
        }
    }

    /// Append the two lines of one file
    pub fn write_summary(&mut self, summary: &FileSummary) -> Result<()> {
        writeln!(self.writer, "{}", summary.ci_line())
            .and_then(|_| writeln!(self.writer, "{}", summary.mean_line()))
            .with_context(|| format!("Failed to write summary of {}", summary.source.display()))?;
        self.lines_written += 2;
        Ok(())
    }

    /// Append the empty line between two groups
    pub fn write_group_separator(&mut self) -> Result<()> {
        writeln!(self.writer).context("Failed to write group separator")?;
        self.lines_written += 1;
        Ok(())
    }

    /// Lines written so far, separators included
    pub fn lines_written(&self) -> usize {
        self.lines_written
    }

    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush().context("Failed to flush output file")
    }

    /// Flush and hand back the underlying writer
    pub fn finish(mut self) -> Result<W> {
        self.flush()?;
        Ok(self.writer)
    }
}

/// The files of one manifest group, in processing order
#[derive(Debug, Clone, Default)]
pub struct GroupReport {
    pub name: String,
    pub files: Vec<FileSummary>,
}

/// Everything a batch produced, for the console report
#[derive(Debug, Clone)]
pub struct BatchReport {
    pub groups: Vec<GroupReport>,
    pub output_path: PathBuf,
    pub duration: Duration,
}

impl BatchReport {
    pub fn file_count(&self) -> usize {
        self.groups.iter().map(|g| g.files.len()).sum()
    }

    pub fn run_count(&self) -> usize {
        self.groups.iter()
            .flat_map(|g| g.files.iter())
            .map(|f| f.runs)
            .sum()
    }
}

/// Report formatter factory choosing between plain and colored output
pub struct ReportFormatterFactory;

impl ReportFormatterFactory {
    /// Create a formatter based on color support and preferences
    pub fn create_formatter(enable_color: bool, verbose: bool) -> Box<dyn ReportFormatter> {
        let options = FormattingOptions {
            enable_color,
            verbose_mode: verbose,
            ..Default::default()
        };

        if enable_color && ColoredFormatter::supports_color() {
            Box::new(ColoredFormatter::new(options))
        } else {
            Box::new(PlainFormatter::new(options))
        }
    }

    /// Create a plain text formatter for scripts/logs
    pub fn create_plain_formatter() -> Box<dyn ReportFormatter> {
        Self::create_formatter(false, false)
    }
}

/// Render the full console report of a batch
pub fn render_batch_report(formatter: &dyn ReportFormatter, report: &BatchReport) -> Result<String> {
    let mut output = formatter.format_header("Simulation Batch Statistics")?;
    output.push_str("\n\n");

    for group in &report.groups {
        output.push_str(&formatter.format_group_table(group)?);
        output.push_str("\n\n");
    }

    output.push_str(&formatter.format_batch_summary(report)?);
    Ok(output)
}
