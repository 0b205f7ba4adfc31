//! Stratos Stats
//!
//! Batch statistics aggregator for service-discovery simulation results.
//! Each results file is scanned run by run and reduced to per-metric means
//! and 95% confidence half-widths, written as pipe-delimited summary lines.

pub mod aggregator;
pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod input;
pub mod logging;
pub mod models;
pub mod output;
pub mod stats;
pub mod types;

// Re-export commonly used types
pub use aggregator::{BatchStatisticsAggregator, FileSummary};
pub use error::{AppError, Result};
pub use models::{BatchManifest, Config, InputGroup, InputSpec, RunAggregate};
pub use stats::{MetricSeries, SeriesSummary, SummaryStatistics};
pub use output::{ColoredFormatter, PlainFormatter, ReportFormatter, ReportFormatterFactory, SummaryWriter};
pub use types::Metric;

/// Application version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const PKG_NAME: &str = env!("CARGO_PKG_NAME");
pub const PKG_DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Build metadata stamped by build.rs
pub const BUILD_TIME: &str = env!("BUILD_TIME");
pub const GIT_COMMIT: &str = env!("GIT_COMMIT");

/// Default configuration values
pub mod defaults {
    pub const DEFAULT_INPUT_ROOT: &str = ".";
    pub const DEFAULT_OUTPUT_FILE: &str = "centralized_statics.txt";
    pub const DEFAULT_PACKETS: u32 = 10;
    pub const DEFAULT_REQUESTERS: u32 = 4;
    pub const DEFAULT_ENABLE_COLOR: bool = true;
}
