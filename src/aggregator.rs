//! Batch Statistics Aggregator
//!
//! Turns one simulation results file into a [`FileSummary`]: every run block
//! is folded into a [`RunAggregate`], the aggregates are appended to the five
//! metric series, and each series is reduced to its mean and 95% confidence
//! half-width.

use crate::{
    error::{ErrorContext, Result},
    input::{RunBlock, RunBlockReader},
    logging::Logger,
    models::{InputSpec, RunAggregate, RunTally},
    stats::{MetricSeries, SummaryStatistics},
    types::Metric,
};
use serde::{Deserialize, Serialize};
use std::io::BufRead;
use std::path::{Path, PathBuf};

/// Aggregated statistics of one results file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileSummary {
    /// Results file the summary was computed from
    pub source: PathBuf,
    /// Expected packets per request
    pub packets: u32,
    /// Requester lines per run
    pub requesters: u32,
    /// Complete runs scanned
    pub runs: usize,
    /// Runs in which at least one requester received data
    pub runs_with_data: usize,
    /// Lines after the last control line, not part of any run
    pub dangling_lines: usize,
    pub statistics: SummaryStatistics,
}

impl FileSummary {
    /// Confidence half-widths, `time|success|found|packets|overhead`
    pub fn ci_line(&self) -> String {
        format_fields(&self.statistics.confidence_half_widths())
    }

    /// Means, `time|success|found|packets|overhead`
    pub fn mean_line(&self) -> String {
        format_fields(&self.statistics.means())
    }
}

/// Join summary fields with `|`, four decimals each
pub fn format_fields(values: &[f64]) -> String {
    values.iter()
        .map(|v| format!("{:.4}", v))
        .collect::<Vec<_>>()
        .join("|")
}

/// Aggregates results files produced with one packets/requesters setting
#[derive(Debug, Clone)]
pub struct BatchStatisticsAggregator {
    packets: u32,
    requesters: u32,
    logger: Option<Logger>,
}

impl BatchStatisticsAggregator {
    /// Create an aggregator for files with `requesters` lines per run
    /// and `packets` expected packets per request
    pub fn new(packets: u32, requesters: u32) -> Self {
        Self {
            packets,
            requesters,
            logger: None,
        }
    }

    /// Create an aggregator using the parameters of a manifest entry
    pub fn for_input(spec: &InputSpec) -> Self {
        Self::new(spec.packets, spec.requesters)
    }

    /// Emit per-run debug entries through `logger`
    pub fn with_logger(mut self, logger: Logger) -> Self {
        self.logger = Some(logger);
        self
    }

    pub fn packets(&self) -> u32 {
        self.packets
    }

    pub fn requesters(&self) -> u32 {
        self.requesters
    }

    /// Aggregate a results file on disk
    pub fn aggregate_file(&self, path: &Path) -> Result<FileSummary> {
        let reader = RunBlockReader::open(path, self.requesters)?;
        self.aggregate_blocks(reader)
    }

    /// Aggregate results read from any buffered reader; `source` names it in errors
    pub fn aggregate_reader<R: BufRead>(&self, reader: R, source: &Path) -> Result<FileSummary> {
        self.aggregate_blocks(RunBlockReader::new(reader, source, self.requesters))
    }

    fn aggregate_blocks<R: BufRead>(&self, mut blocks: RunBlockReader<R>) -> Result<FileSummary> {
        let source = blocks.source().to_path_buf();
        let mut series = MetricSeries::new();
        let mut runs_with_data = 0;

        for block in blocks.by_ref() {
            let block = block?;
            let run = self.close_run(&block, &source)?;
            if run.avg_time.is_some() {
                runs_with_data += 1;
            }
            series.push_run(&run);
        }

        let statistics = series.summarize()
            .with_context(|| source.display().to_string())?;

        if let Some(logger) = &self.logger {
            for metric in Metric::ALL {
                let summary = statistics.get(metric);
                logger.debug(&format!("{} series summarized", metric))
                    .field("file", source.display().to_string())
                    .field("samples", summary.samples)
                    .field("std_dev", summary.std_dev)
                    .log();
            }
        }

        Ok(FileSummary {
            source,
            packets: self.packets,
            requesters: self.requesters,
            runs: blocks.runs_read(),
            runs_with_data,
            dangling_lines: blocks.dangling_lines(),
            statistics,
        })
    }

    fn close_run(&self, block: &RunBlock, source: &Path) -> Result<RunAggregate> {
        let mut tally = RunTally::default();
        for line in &block.results {
            tally.record(line);
        }

        let run = RunAggregate::from_tally(&tally, block.control_bytes, self.packets, self.requesters)
            .with_context(|| format!("{}: run {} starting at line {}", source.display(), block.index + 1, block.start_line))?;

        if let Some(logger) = &self.logger {
            logger.trace(&format!("Closed run {}", block.index + 1))
                .field("responders", tally.responders)
                .field("avg_time", run.avg_time)
                .field("found_percentage", run.found_percentage)
                .field("success_percentage", run.success_percentage)
                .log();
        }

        Ok(run)
    }
}
