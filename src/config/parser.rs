//! Configuration parsing from CLI arguments and environment variables

use crate::{
    cli::Cli,
    config::env::EnvManager,
    error::Result,
    models::Config,
};

/// Configuration parser that combines CLI arguments with environment variables
pub struct ConfigParser {
    cli: Cli,
}

impl ConfigParser {
    /// Create a new configuration parser with CLI arguments
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Parse and build the complete configuration
    pub fn parse(&self) -> Result<Config> {
        let mut config = Config::default();

        EnvManager::load_env_file(self.cli.debug)?;
        config.merge_from_env()?;
        self.apply_cli_overrides(&mut config);
        config.validate()?;

        Ok(config)
    }

    /// Apply CLI argument overrides to configuration
    fn apply_cli_overrides(&self, config: &mut Config) {
        if let Some(root) = &self.cli.root {
            config.input_root = root.clone();
        }

        if let Some(output) = &self.cli.output {
            config.output_file = output.clone();
        }

        if let Some(manifest) = &self.cli.manifest {
            config.manifest_path = Some(manifest.clone());
        }

        if self.cli.no_color {
            config.enable_color = false;
        } else if self.cli.color {
            config.enable_color = true;
        }

        if let Some(log_format) = self.cli.log_format {
            config.log_format = log_format;
        }

        // CLI-only flags
        config.verbose = self.cli.verbose || self.cli.debug;
        config.debug = self.cli.debug;

        if config.debug {
            eprintln!("Applied CLI overrides to configuration");
            eprintln!("{}", display_config_summary(config));
        }
    }
}

/// Convenience function to load complete configuration from CLI arguments
pub fn load_config(cli: Cli) -> Result<Config> {
    ConfigParser::new(cli).parse()
}

/// Display configuration summary for debug purposes
pub fn display_config_summary(config: &Config) -> String {
    let mut summary = Vec::new();

    summary.push(format!("Input root: {}", config.input_root.display()));
    summary.push(format!("Output file: {}", config.output_path().display()));
    summary.push(format!(
        "Manifest: {}",
        config.manifest_path()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "built-in".to_string())
    ));
    summary.push(format!("Color Output: {}", config.enable_color));
    summary.push(format!("Log Format: {:?}", config.log_format));
    summary.push(format!("Verbose: {}", config.verbose));
    summary.push(format!("Debug: {}", config.debug));

    summary.join("\n")
}
