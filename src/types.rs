//! Type definitions and aliases

use serde::{Deserialize, Serialize};
use std::fmt;

// Re-export commonly used types
pub use crate::error::{AppError, Result};

/// The five per-run aggregates tracked across a results file.
///
/// The declaration order is the column order of the summary lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    /// Mean time until the first data packet, over requesters that got data
    Time,
    /// Percentage of requesters that found the best provider
    Success,
    /// Percentage of requesters that found any provider
    Found,
    /// Percentage of expected data packets that arrived
    Packets,
    /// Control bytes per data byte (256-byte packets)
    Overhead,
}

impl Metric {
    /// All metrics in summary column order
    pub const ALL: [Metric; 5] = [
        Metric::Time,
        Metric::Success,
        Metric::Found,
        Metric::Packets,
        Metric::Overhead,
    ];

    /// Short name used in logs and reports
    pub fn name(&self) -> &'static str {
        match self {
            Metric::Time => "time",
            Metric::Success => "success",
            Metric::Found => "found",
            Metric::Packets => "packets",
            Metric::Overhead => "overhead",
        }
    }

    /// Whether the metric is only sampled for runs where some requester got data
    pub fn requires_data(&self) -> bool {
        matches!(self, Metric::Time | Metric::Packets | Metric::Overhead)
    }

    /// Position of the metric in the summary line
    pub fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_column_order() {
        let names: Vec<&str> = Metric::ALL.iter().map(|m| m.name()).collect();
        assert_eq!(names, vec!["time", "success", "found", "packets", "overhead"]);
        for (i, metric) in Metric::ALL.iter().enumerate() {
            assert_eq!(metric.index(), i);
        }
    }

    #[test]
    fn test_data_dependent_metrics() {
        assert!(Metric::Time.requires_data());
        assert!(Metric::Packets.requires_data());
        assert!(Metric::Overhead.requires_data());
        assert!(!Metric::Success.requires_data());
        assert!(!Metric::Found.requires_data());
    }
}
