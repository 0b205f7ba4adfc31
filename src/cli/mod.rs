//! Command-line interface module with topic help

pub mod help;

pub use help::HelpSystem;

use crate::{logging::LogFormat, models::InputSpec};
use clap::Parser;
use std::path::PathBuf;

/// Aggregates simulation results files into means and 95% confidence intervals
#[derive(Parser, Debug, Clone)]
#[command(name = "stratos-stats")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Directory the input files are resolved against [env: STATS_INPUT_ROOT]
    #[arg(short, long, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// JSON batch manifest; the built-in experiment table is used when omitted [env: STATS_MANIFEST]
    #[arg(short, long, value_name = "FILE", conflicts_with = "file")]
    pub manifest: Option<PathBuf>,

    /// Summary file, relative to the input root unless absolute [env: STATS_OUTPUT_FILE]
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Aggregate a single results file and print its two summary lines
    #[arg(short, long, value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Expected data packets per request (single-file mode)
    #[arg(short, long, value_parser = parse_positive, requires = "file")]
    pub packets: Option<u32>,

    /// Requester lines per run (single-file mode)
    #[arg(short = 'n', long, value_parser = parse_positive, requires = "file")]
    pub requesters: Option<u32>,

    /// Force colored output
    #[arg(long)]
    pub color: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Enable verbose output
    #[arg(long)]
    pub verbose: bool,

    /// Enable debug output
    #[arg(long)]
    pub debug: bool,

    /// Log line format: console, json or compact [env: LOG_FORMAT]
    #[arg(long, value_name = "FORMAT", value_parser = parse_log_format)]
    pub log_format: Option<LogFormat>,

    /// Print the effective batch manifest as JSON and exit
    #[arg(long, conflicts_with = "file")]
    pub print_manifest: bool,

    /// Show help for specific topic (config, manifest, input, output, examples)
    #[arg(long, value_name = "TOPIC")]
    pub help_topic: Option<String>,
}

impl Cli {
    /// Validate CLI arguments for conflicts and requirements
    pub fn validate(&self) -> Result<(), String> {
        if self.color && self.no_color {
            return Err("Cannot specify both --color and --no-color".to_string());
        }

        if self.file.is_none() && (self.packets.is_some() || self.requesters.is_some()) {
            return Err("--packets and --requesters only apply together with --file".to_string());
        }

        if let Some(file) = &self.file {
            if file.as_os_str().is_empty() {
                return Err("--file cannot be empty".to_string());
            }
        }

        Ok(())
    }

    /// Whether a single file is aggregated instead of a manifest
    pub fn is_single_file_mode(&self) -> bool {
        self.file.is_some()
    }

    /// The input of single-file mode, with defaults for omitted parameters
    pub fn single_file_spec(&self) -> Option<InputSpec> {
        self.file.as_ref().map(|file| {
            let mut spec = InputSpec::new(file.clone());
            if let Some(packets) = self.packets {
                spec = spec.with_packets(packets);
            }
            if let Some(requesters) = self.requesters {
                spec = spec.with_requesters(requesters);
            }
            spec
        })
    }

    /// Check if help should be displayed for a specific topic
    pub fn should_show_topic_help(&self) -> bool {
        self.help_topic.is_some()
    }

    /// Check if colors should be enabled
    pub fn use_colors(&self) -> bool {
        if self.color {
            true
        } else if self.no_color {
            false
        } else {
            supports_color()
        }
    }

    /// Display help for the specified topic or main help
    pub fn display_help(&self) -> String {
        let help_system = HelpSystem::new();
        let use_colors = self.use_colors();

        if let Some(topic) = &self.help_topic {
            help_system.display_topic_help(topic, use_colors)
                .unwrap_or_else(|| {
                    format!("Unknown help topic: '{}'\n\nAvailable topics: {}\n\n{}",
                        topic, HelpSystem::TOPICS.join(", "), help_system.display_main_help(use_colors))
                })
        } else {
            help_system.display_main_help(use_colors)
        }
    }

    /// Get argument summary for debug display
    pub fn get_config_summary(&self) -> String {
        let mut summary = String::new();

        summary.push_str("Argument Summary:\n");
        if let Some(root) = &self.root {
            summary.push_str(&format!("  Input root: {}\n", root.display()));
        }
        if let Some(manifest) = &self.manifest {
            summary.push_str(&format!("  Manifest: {}\n", manifest.display()));
        }
        if let Some(output) = &self.output {
            summary.push_str(&format!("  Output file: {}\n", output.display()));
        }
        if let Some(spec) = self.single_file_spec() {
            summary.push_str(&format!(
                "  Single file: {} (packets={}, requesters={})\n",
                spec.file.display(), spec.packets, spec.requesters
            ));
        }
        summary.push_str(&format!("  Colored output: {}\n", self.use_colors()));
        summary.push_str(&format!("  Verbose mode: {}\n", self.verbose));
        summary.push_str(&format!("  Debug mode: {}\n", self.debug));

        summary
    }
}

/// Parse a strictly positive count
fn parse_positive(s: &str) -> Result<u32, String> {
    if s.starts_with('+') {
        return Err(format!("Invalid count: {}", s));
    }

    s.parse::<u32>()
        .map_err(|_| format!("Invalid count: {}", s))
        .and_then(|n| {
            if n == 0 {
                Err("Count must be greater than 0".to_string())
            } else {
                Ok(n)
            }
        })
}

fn parse_log_format(s: &str) -> Result<LogFormat, String> {
    s.parse::<LogFormat>().map_err(|e| e.to_string())
}

/// Check if the terminal supports color output
fn supports_color() -> bool {
    if let Ok(term) = std::env::var("TERM") {
        if term == "dumb" {
            return false;
        }
    }

    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }

    if std::env::var("FORCE_COLOR").is_ok() {
        return true;
    }

    #[cfg(target_os = "windows")]
    {
        if std::env::var("ANSICON").is_ok() || std::env::var("ConEmuANSI").is_ok() {
            return true;
        }
    }

    cfg!(unix)
}
