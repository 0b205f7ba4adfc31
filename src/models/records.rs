//! Per-requester result lines and per-run aggregates

use crate::error::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Number of `|`-separated fields in a requester result line
pub const RESULT_FIELDS: usize = 4;

/// Bytes carried by one data packet, used to scale control overhead
pub const DATA_PACKET_BYTES: f64 = 256.0;

/// One requester's outcome in one run: `time|success|found|packets`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultLine {
    /// Time from request response to first data packet; negative when no data arrived
    pub time: i64,
    /// 1 when the provider found was the best one available
    pub success: i64,
    /// 1 when any provider was found
    pub found: i64,
    /// Data packets received
    pub packets: i64,
}

impl ResultLine {
    /// Whether this requester received at least one data packet
    pub fn received_data(&self) -> bool {
        self.time >= 0
    }

    /// Parse the four fields; the error message carries no location
    pub fn parse_fields(line: &str) -> std::result::Result<Self, String> {
        let fields: Vec<&str> = line.trim().split('|').collect();
        if fields.len() != RESULT_FIELDS {
            return Err(format!(
                "expected {} '|'-separated fields, found {}",
                RESULT_FIELDS,
                fields.len()
            ));
        }

        let field = |index: usize, name: &str| -> std::result::Result<i64, String> {
            let raw = fields[index].trim();
            raw.parse::<i64>()
                .map_err(|e| format!("invalid {} field '{}': {}", name, raw, e))
        };

        Ok(Self {
            time: field(0, "time")?,
            success: field(1, "success")?,
            found: field(2, "found")?,
            packets: field(3, "packets")?,
        })
    }
}

impl FromStr for ResultLine {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse_fields(s).map_err(AppError::parse)
    }
}

/// Parse a control line: total control bytes sent during the run
pub fn parse_control_bytes(line: &str) -> std::result::Result<f64, String> {
    let raw = line.trim();
    raw.parse::<f64>()
        .map_err(|e| format!("invalid control line '{}': {}", raw, e))
}

/// Running counters over the requester lines of one run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunTally {
    /// Requesters with `time >= 0`
    pub responders: u64,
    /// Sum of times over responders
    pub times_sum: i64,
    /// Sum of packets over responders
    pub packets_sum: i64,
    /// Sum of the found flags over all requesters
    pub found: i64,
    /// Sum of the success flags over all requesters
    pub success: i64,
}

impl RunTally {
    /// Fold one requester line into the counters
    pub fn record(&mut self, line: &ResultLine) {
        if line.received_data() {
            self.responders += 1;
            self.times_sum += line.time;
            self.packets_sum += line.packets;
        }
        self.found += line.found;
        self.success += line.success;
    }

    /// Clear the counters at a block boundary
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Whether any requester in the run received data
    pub fn has_data(&self) -> bool {
        self.responders > 0
    }
}

/// The per-run values appended to the metric series
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RunAggregate {
    pub avg_time: Option<f64>,
    pub control_overhead: Option<f64>,
    pub packets_percentage: Option<f64>,
    pub found_percentage: f64,
    pub success_percentage: f64,
}

impl RunAggregate {
    /// Close a run: `packets` is the expected packets per request,
    /// `requesters` the number of requester lines in the block
    pub fn from_tally(tally: &RunTally, control_bytes: f64, packets: u32, requesters: u32) -> Result<Self> {
        if requesters == 0 {
            return Err(AppError::validation("requester count must be greater than 0"));
        }

        let requesters = f64::from(requesters);
        let found_percentage = tally.found as f64 * 100.0 / requesters;
        let success_percentage = tally.success as f64 * 100.0 / requesters;

        if !tally.has_data() {
            return Ok(Self {
                avg_time: None,
                control_overhead: None,
                packets_percentage: None,
                found_percentage,
                success_percentage,
            });
        }

        if tally.packets_sum <= 0 {
            return Err(AppError::statistics(format!(
                "{} requester(s) reported data but {} packets were received; control overhead is undefined",
                tally.responders, tally.packets_sum
            )));
        }

        let responders = tally.responders as f64;
        let packets_received = tally.packets_sum as f64;

        Ok(Self {
            avg_time: Some(tally.times_sum as f64 / responders),
            control_overhead: Some(control_bytes / (packets_received * DATA_PACKET_BYTES)),
            packets_percentage: Some(packets_received * 100.0 / (f64::from(packets) * responders)),
            found_percentage,
            success_percentage,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(time: i64, success: i64, found: i64, packets: i64) -> ResultLine {
        ResultLine { time, success, found, packets }
    }

    #[test]
    fn test_parse_result_line() {
        let parsed: ResultLine = "12|1|1|9".parse().unwrap();
        assert_eq!(parsed, line(12, 1, 1, 9));
        assert!(parsed.received_data());

        let missing: ResultLine = " -1|0|1|0 \n".parse().unwrap();
        assert_eq!(missing.time, -1);
        assert!(!missing.received_data());
    }

    #[test]
    fn test_parse_rejects_wrong_field_count() {
        let err = ResultLine::parse_fields("12|1|1").unwrap_err();
        assert!(err.contains("expected 4"));
        assert!(err.contains("found 3"));

        assert!("12|1|1|9|3".parse::<ResultLine>().is_err());
    }

    #[test]
    fn test_parse_rejects_non_numeric() {
        let err = ResultLine::parse_fields("abc|1|1|9").unwrap_err();
        assert!(err.contains("time"));

        let err = "12|1|yes|9".parse::<ResultLine>().unwrap_err();
        assert_eq!(err.category(), "PARSE");
        assert!(err.to_string().contains("found"));
    }

    #[test]
    fn test_parse_control_bytes() {
        assert_eq!(parse_control_bytes("5120\n").unwrap(), 5120.0);
        assert_eq!(parse_control_bytes("2560.5").unwrap(), 2560.5);
        assert!(parse_control_bytes("1|2|3|4").is_err());
    }

    #[test]
    fn test_tally_counts_only_responders_for_time_and_packets() {
        let mut tally = RunTally::default();
        tally.record(&line(10, 1, 1, 10));
        tally.record(&line(-1, 0, 1, 4));
        tally.record(&line(30, 0, 0, 6));

        assert_eq!(tally.responders, 2);
        assert_eq!(tally.times_sum, 40);
        assert_eq!(tally.packets_sum, 16);
        assert_eq!(tally.found, 2);
        assert_eq!(tally.success, 1);

        tally.reset();
        assert_eq!(tally, RunTally::default());
    }

    #[test]
    fn test_run_aggregate_with_data() {
        let mut tally = RunTally::default();
        for (t, p) in [(10, 10), (20, 10), (30, 5), (40, 5)] {
            tally.record(&line(t, 1, 1, p));
        }

        let run = RunAggregate::from_tally(&tally, 7680.0, 10, 4).unwrap();
        assert_eq!(run.avg_time, Some(25.0));
        assert_eq!(run.packets_percentage, Some(75.0));
        assert_eq!(run.control_overhead, Some(7680.0 / (30.0 * 256.0)));
        assert_eq!(run.found_percentage, 100.0);
        assert_eq!(run.success_percentage, 100.0);
    }

    #[test]
    fn test_run_aggregate_without_data_keeps_percentages() {
        let mut tally = RunTally::default();
        tally.record(&line(-1, 0, 1, 0));
        tally.record(&line(-1, 0, 0, 0));
        tally.record(&line(-1, 1, 1, 0));
        tally.record(&line(-1, 0, 0, 0));

        let run = RunAggregate::from_tally(&tally, 1024.0, 10, 4).unwrap();
        assert_eq!(run.avg_time, None);
        assert_eq!(run.control_overhead, None);
        assert_eq!(run.packets_percentage, None);
        assert_eq!(run.found_percentage, 50.0);
        assert_eq!(run.success_percentage, 25.0);
    }

    #[test]
    fn test_run_aggregate_rejects_zero_packets_with_responders() {
        let mut tally = RunTally::default();
        tally.record(&line(5, 1, 1, 0));

        let err = RunAggregate::from_tally(&tally, 1024.0, 10, 1).unwrap_err();
        assert_eq!(err.category(), "STATS");
    }
}
