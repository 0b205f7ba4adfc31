//! Statistical calculations over the per-run metric series

use crate::{
    error::{AppError, ErrorContext, Result},
    models::records::RunAggregate,
    types::Metric,
};
use serde::{Deserialize, Serialize};

/// Z-score for a two-sided 95% confidence interval, P(-1.96 < z < 1.96) = 0.95
pub const Z_95: f64 = 1.96;

/// Arithmetic mean; fails on an empty series
pub fn mean(values: &[f64]) -> Result<f64> {
    if values.is_empty() {
        return Err(AppError::statistics("cannot average an empty series"));
    }
    Ok(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sample standard deviation with Bessel's correction, `sqrt(sum((x - mean)^2) / (n - 1))`.
///
/// Fails for fewer than two samples instead of reporting a zero spread.
pub fn sample_std_dev(values: &[f64], mean: f64) -> Result<f64> {
    if values.len() < 2 {
        return Err(AppError::statistics(format!(
            "standard deviation needs at least 2 samples, got {}",
            values.len()
        )));
    }

    let variance = values.iter()
        .map(|x| (x - mean).powi(2))
        .sum::<f64>() / (values.len() - 1) as f64;

    Ok(variance.sqrt())
}

/// Half-width of the 95% confidence interval of the mean
pub fn confidence_half_width(std_dev: f64, samples: usize) -> f64 {
    Z_95 * (std_dev / (samples as f64).sqrt())
}

/// Mean and 95% confidence half-width of one metric series
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesSummary {
    pub samples: usize,
    pub mean: f64,
    pub std_dev: f64,
    pub confidence_half_width: f64,
}

impl SeriesSummary {
    /// Summarize a series of per-run values
    pub fn from_samples(values: &[f64]) -> Result<Self> {
        let mean = mean(values)?;
        let std_dev = sample_std_dev(values, mean)?;

        Ok(Self {
            samples: values.len(),
            mean,
            std_dev,
            confidence_half_width: confidence_half_width(std_dev, values.len()),
        })
    }

    /// Lower and upper bounds of the confidence interval
    pub fn interval(&self) -> (f64, f64) {
        (self.mean - self.confidence_half_width, self.mean + self.confidence_half_width)
    }
}

/// Growable per-run series for each of the five metrics
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetricSeries {
    time: Vec<f64>,
    success: Vec<f64>,
    found: Vec<f64>,
    packets: Vec<f64>,
    overhead: Vec<f64>,
}

impl MetricSeries {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one run; the data-dependent metrics are only appended when present
    pub fn push_run(&mut self, run: &RunAggregate) {
        if let Some(avg_time) = run.avg_time {
            self.time.push(avg_time);
        }
        if let Some(overhead) = run.control_overhead {
            self.overhead.push(overhead);
        }
        if let Some(packets) = run.packets_percentage {
            self.packets.push(packets);
        }
        self.found.push(run.found_percentage);
        self.success.push(run.success_percentage);
    }

    /// Values collected for a metric, in run order
    pub fn values(&self, metric: Metric) -> &[f64] {
        match metric {
            Metric::Time => &self.time,
            Metric::Success => &self.success,
            Metric::Found => &self.found,
            Metric::Packets => &self.packets,
            Metric::Overhead => &self.overhead,
        }
    }

    /// Number of samples collected for a metric
    pub fn len(&self, metric: Metric) -> usize {
        self.values(metric).len()
    }

    /// True when no run has been pushed
    pub fn is_empty(&self) -> bool {
        self.found.is_empty()
    }

    /// Summarize all five series; the first failing series aborts
    pub fn summarize(&self) -> Result<SummaryStatistics> {
        let summarize = |metric: Metric| {
            SeriesSummary::from_samples(self.values(metric))
                .with_context(|| format!("{} series", metric))
        };

        Ok(SummaryStatistics {
            time: summarize(Metric::Time)?,
            success: summarize(Metric::Success)?,
            found: summarize(Metric::Found)?,
            packets: summarize(Metric::Packets)?,
            overhead: summarize(Metric::Overhead)?,
        })
    }
}

/// Summaries of the five metrics of one results file
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SummaryStatistics {
    pub time: SeriesSummary,
    pub success: SeriesSummary,
    pub found: SeriesSummary,
    pub packets: SeriesSummary,
    pub overhead: SeriesSummary,
}

impl SummaryStatistics {
    pub fn get(&self, metric: Metric) -> &SeriesSummary {
        match metric {
            Metric::Time => &self.time,
            Metric::Success => &self.success,
            Metric::Found => &self.found,
            Metric::Packets => &self.packets,
            Metric::Overhead => &self.overhead,
        }
    }

    /// Confidence half-widths in summary column order
    pub fn confidence_half_widths(&self) -> [f64; 5] {
        Metric::ALL.map(|m| self.get(m).confidence_half_width)
    }

    /// Means in summary column order
    pub fn means(&self) -> [f64; 5] {
        Metric::ALL.map(|m| self.get(m).mean)
    }
}
