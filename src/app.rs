//! Main application orchestration and execution

use crate::{
    aggregator::{BatchStatisticsAggregator, FileSummary},
    cli::Cli,
    config::{load_config, validate_config, ConfigValidator, ValidationLevel, ValidationWarning},
    error::{AppError, Result},
    logging::{LogFormat, Logger, LoggerFactory},
    models::{BatchManifest, Config, InputSpec},
    output::{render_batch_report, BatchReport, GroupReport, ReportFormatterFactory, SummaryWriter},
};
use std::time::Instant;

/// Main application struct that coordinates all components
pub struct App {
    cli: Cli,
}

impl App {
    /// Create a new application instance with CLI configuration
    pub fn new(cli: Cli) -> Result<Self> {
        cli.validate().map_err(AppError::validation)?;
        Ok(Self { cli })
    }

    /// Run the application
    pub fn run(self) -> Result<()> {
        if self.cli.should_show_topic_help() {
            println!("{}", self.cli.display_help());
            return Ok(());
        }

        let config = load_config(self.cli.clone())?;
        let factory = LoggerFactory::new(config.clone());
        let logger = factory.create_logger("APP");

        logger.debug(&format!("{} v{}", crate::PKG_NAME, crate::VERSION))
            .field("session_id", factory.session_id())
            .field("commit", crate::GIT_COMMIT)
            .field("built", crate::BUILD_TIME)
            .log();

        let result = if self.cli.print_manifest {
            load_manifest(&config, &logger)
                .and_then(|manifest| manifest.to_json_pretty())
                .map(|json| println!("{}", json))
        } else if let Some(spec) = self.cli.single_file_spec() {
            aggregate_single(&config, &spec, &logger).map(|summary| {
                println!("{}", summary.ci_line());
                println!("{}", summary.mean_line());
            })
        } else {
            self.run_batch(&config, &factory)
        };

        // Console users already get the reporter's message from main
        if let Err(e) = &result {
            if config.log_format == LogFormat::Json {
                factory.create_error_logger().log_error(e, Some("run aborted"));
            }
        }

        result
    }

    fn run_batch(&self, config: &Config, factory: &LoggerFactory) -> Result<()> {
        let logger = factory.create_logger("APP");

        for warning in validate_config(config)? {
            log_warning(&logger, &warning);
        }

        let manifest = load_manifest(config, &logger)?;
        let report = run_batch(config, &manifest, factory)?;

        if config.verbose {
            let formatter = ReportFormatterFactory::create_formatter(config.enable_color, config.debug);
            println!("{}", render_batch_report(formatter.as_ref(), &report)?);
        }

        Ok(())
    }
}

/// The manifest named by the configuration, or the built-in table
pub fn load_manifest(config: &Config, logger: &Logger) -> Result<BatchManifest> {
    match config.manifest_path() {
        Some(path) => {
            let manifest = BatchManifest::load(path)?;
            logger.info(&format!("Loaded manifest {}", path.display()))
                .field("groups", manifest.groups.len())
                .field("inputs", manifest.input_count())
                .log();
            Ok(manifest)
        }
        None => {
            logger.debug("Using the built-in experiment manifest").log();
            Ok(BatchManifest::builtin())
        }
    }
}

/// Aggregate one results file, resolved against the input root
pub fn aggregate_single(config: &Config, spec: &InputSpec, logger: &Logger) -> Result<FileSummary> {
    let path = config.input_path(&spec.file);
    let summary = BatchStatisticsAggregator::for_input(spec)
        .with_logger(logger.clone())
        .aggregate_file(&path)?;

    if summary.dangling_lines > 0 {
        logger.warn(&format!(
            "{} trailing line(s) after the last control line of {} were ignored",
            summary.dangling_lines,
            path.display()
        )).log();
    }

    Ok(summary)
}

/// Aggregate every manifest input into the summary file.
///
/// The summary file is truncated first; the first failing input aborts the
/// batch and the lines written before it are kept.
pub fn run_batch(config: &Config, manifest: &BatchManifest, factory: &LoggerFactory) -> Result<BatchReport> {
    let logger = factory.create_logger("APP");
    let mut batch = factory.create_batch_logger();
    let aggregator_logger = factory.create_logger("AGG");

    manifest.validate()?;
    let warnings = ConfigValidator::validate_manifest(config, manifest);
    for warning in &warnings {
        log_warning(&logger, warning);
    }
    if let Some(fatal) = warnings.iter().find(|w| w.level == ValidationLevel::Error) {
        return Err(AppError::validation(fatal.message.clone()));
    }

    let started = Instant::now();
    batch.start_timing("batch");

    let output_path = config.output_path();
    let mut writer = SummaryWriter::create(&output_path)?;
    crate::log_debug!(logger, "Writing summary to {}", output_path.display());
    let mut groups = Vec::with_capacity(manifest.groups.len());

    for (index, group) in manifest.groups.iter().enumerate() {
        if index > 0 {
            writer.write_group_separator()?;
        }
        batch.log_group_start(&group.name, group.inputs.len());

        let mut report = GroupReport {
            name: group.name.clone(),
            files: Vec::with_capacity(group.inputs.len()),
        };

        for input in &group.inputs {
            let summary = BatchStatisticsAggregator::for_input(input)
                .with_logger(aggregator_logger.clone())
                .aggregate_file(&config.input_path(&input.file))?;

            writer.write_summary(&summary)?;
            batch.log_file_summary(&summary);
            report.files.push(summary);
        }

        groups.push(report);
    }

    writer.finish()?;
    batch.end_timing("batch");

    let report = BatchReport {
        groups,
        output_path,
        duration: started.elapsed(),
    };
    batch.log_batch_summary(report.file_count(), report.groups.len(), report.duration);

    Ok(report)
}

fn log_warning(logger: &Logger, warning: &ValidationWarning) {
    let builder = match warning.level {
        ValidationLevel::Info => logger.info(&warning.message),
        ValidationLevel::Warning => logger.warn(&warning.message),
        ValidationLevel::Error => logger.error(&warning.message),
    };
    builder.field("validation", warning.level.as_str()).log();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::InputGroup;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    const TWO_RUNS: &str = "10|1|1|10\n20|1|1|10\n30|1|1|10\n40|1|1|10\n10240\n\
                            20|1|1|10\n30|1|0|10\n40|0|1|10\n50|1|1|10\n10240\n";

    fn config_in(dir: &TempDir) -> Config {
        Config {
            input_root: dir.path().to_path_buf(),
            enable_color: false,
            ..Default::default()
        }
    }

    fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    fn manifest(groups: &[(&str, &[&str])]) -> BatchManifest {
        BatchManifest {
            groups: groups.iter()
                .map(|(name, files)| InputGroup::new(*name, files.iter().map(|f| InputSpec::new(*f)).collect()))
                .collect(),
        }
    }

    #[test]
    fn test_app_rejects_conflicting_flags() {
        use clap::Parser;
        let cli = Cli::parse_from(["stratos-stats", "--color", "--no-color"]);
        let err = App::new(cli).err().unwrap();
        assert_eq!(err.category(), "VALIDATION");
    }

    #[test]
    fn test_batch_writes_groups_with_separators() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["a.txt", "b.txt", "c.txt"] {
            write(&dir, name, TWO_RUNS);
        }
        let config = config_in(&dir);
        let factory = LoggerFactory::new(config.clone());

        let report = run_batch(&config, &manifest(&[("first", &["a.txt", "b.txt"]), ("second", &["c.txt"])]), &factory).unwrap();
        assert_eq!(report.file_count(), 3);
        assert_eq!(report.groups[1].name, "second");

        let text = std::fs::read_to_string(config.output_path()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 7);
        assert_eq!(lines[4], "");
        assert!(!text.ends_with("\n\n"));
        assert_eq!(lines[1], "30.0000|87.5000|87.5000|100.0000|1.0000");
        assert_eq!(lines[1], lines[6]);
    }

    #[test]
    fn test_batch_aborts_on_first_failure_and_keeps_written_lines() {
        let dir = tempfile::tempdir().unwrap();
        write(&dir, "good.txt", TWO_RUNS);
        write(&dir, "bad.txt", "10|1|1\n");
        let config = config_in(&dir);
        let factory = LoggerFactory::new(config.clone());

        let err = run_batch(&config, &manifest(&[("g", &["good.txt", "bad.txt", "good.txt"])]), &factory).unwrap_err();
        assert_eq!(err.category(), "PARSE");
        assert!(err.to_string().contains("bad.txt:1"));

        let text = std::fs::read_to_string(config.output_path()).unwrap();
        assert_eq!(text.lines().count(), 2);
    }

    #[test]
    fn test_missing_input_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(&dir);
        let factory = LoggerFactory::new(config.clone());

        let err = run_batch(&config, &manifest(&[("g", &["absent.txt"])]), &factory).unwrap_err();
        assert_eq!(err.category(), "IO");
        assert_eq!(err.exit_code(), 5);
    }

    #[test]
    fn test_input_that_is_the_output_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        write(&dir, "centralized_statics.txt", TWO_RUNS);
        let config = config_in(&dir);
        let factory = LoggerFactory::new(config.clone());

        let err = run_batch(&config, &manifest(&[("g", &["centralized_statics.txt"])]), &factory).unwrap_err();
        assert_eq!(err.category(), "VALIDATION");
        // nothing was truncated
        assert_eq!(std::fs::read_to_string(config.output_path()).unwrap(), TWO_RUNS);
    }

    #[test]
    fn test_aggregate_single_resolves_against_root() {
        let dir = tempfile::tempdir().unwrap();
        write(&dir, "single.txt", TWO_RUNS);
        let config = config_in(&dir);

        let summary = aggregate_single(&config, &InputSpec::new("single.txt"), &Logger::new("TEST".to_string())).unwrap();
        assert_eq!(summary.source, dir.path().join("single.txt"));
        assert_eq!(summary.runs, 2);
        assert_eq!(summary.mean_line(), "30.0000|87.5000|87.5000|100.0000|1.0000");
    }

    #[test]
    fn test_load_manifest() {
        let dir = tempfile::tempdir().unwrap();
        let logger = Logger::new("TEST".to_string());

        let builtin = load_manifest(&config_in(&dir), &logger).unwrap();
        assert_eq!(builtin.input_count(), 19);

        let path = write(&dir, "m.json", r#"{"groups":[{"name":"only","inputs":[{"file":"x.txt"}]}]}"#);
        let config = Config { manifest_path: Some(path), ..config_in(&dir) };
        let loaded = load_manifest(&config, &logger).unwrap();
        assert_eq!(loaded.groups[0].inputs[0].file, Path::new("x.txt"));
        assert_eq!(loaded.groups[0].inputs[0].requesters, 4);
    }
}
