//! Configuration data model and validation

use crate::logging::LogFormat;
use crate::error::{AppError, ErrorContext, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory the manifest's input files are resolved against
    #[serde(default = "default_input_root")]
    pub input_root: PathBuf,

    /// Summary file; relative paths are resolved against `input_root`
    #[serde(default = "default_output_file")]
    pub output_file: PathBuf,

    /// JSON batch manifest; the built-in experiment table is used when unset
    #[serde(default)]
    pub manifest_path: Option<PathBuf>,

    /// Enable colored terminal output
    #[serde(default = "default_enable_color")]
    pub enable_color: bool,

    /// Enable verbose output
    #[serde(default)]
    pub verbose: bool,

    /// Enable debug output
    #[serde(default)]
    pub debug: bool,

    /// Log line format
    #[serde(default)]
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input_root: default_input_root(),
            output_file: default_output_file(),
            manifest_path: None,
            enable_color: default_enable_color(),
            verbose: false,
            debug: false,
            log_format: LogFormat::default(),
        }
    }
}

impl Config {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve an input file name against the input root
    pub fn input_path(&self, file: &Path) -> PathBuf {
        if file.is_absolute() {
            file.to_path_buf()
        } else {
            self.input_root.join(file)
        }
    }

    /// Full path of the summary file
    pub fn output_path(&self) -> PathBuf {
        self.input_path(&self.output_file)
    }

    /// Manifest path resolved against the working directory
    pub fn manifest_path(&self) -> Option<&Path> {
        self.manifest_path.as_deref()
    }

    /// Validate the configuration and return any errors
    pub fn validate(&self) -> Result<()> {
        if self.input_root.as_os_str().is_empty() {
            return Err(AppError::config("Input root cannot be empty"));
        }

        if self.output_file.as_os_str().is_empty() {
            return Err(AppError::config("Output file cannot be empty"));
        }

        if self.output_file.file_name().is_none() {
            return Err(AppError::config(format!(
                "Output file '{}' does not name a file",
                self.output_file.display()
            )));
        }

        if let Some(manifest) = &self.manifest_path {
            if manifest.as_os_str().is_empty() {
                return Err(AppError::config("Manifest path cannot be empty"));
            }
        }

        Ok(())
    }

    /// Merge environment variables into this configuration
    pub fn merge_from_env(&mut self) -> Result<()> {
        if let Ok(root) = std::env::var("STATS_INPUT_ROOT") {
            let root = root.trim();
            if !root.is_empty() {
                self.input_root = PathBuf::from(root);
            }
        }

        if let Ok(output) = std::env::var("STATS_OUTPUT_FILE") {
            let output = output.trim();
            if !output.is_empty() {
                self.output_file = PathBuf::from(output);
            }
        }

        if let Ok(manifest) = std::env::var("STATS_MANIFEST") {
            let manifest = manifest.trim();
            if !manifest.is_empty() {
                self.manifest_path = Some(PathBuf::from(manifest));
            }
        }

        if let Ok(enable_color) = std::env::var("ENABLE_COLOR") {
            self.enable_color = enable_color.trim().parse()
                .map_err(|e| AppError::config(format!("Invalid ENABLE_COLOR value '{}': {}", enable_color, e)))?;
        }

        if let Ok(log_format) = std::env::var("LOG_FORMAT") {
            self.log_format = log_format.parse()
                .context("Invalid LOG_FORMAT")?;
        }

        Ok(())
    }
}

// Default value functions for serde
fn default_input_root() -> PathBuf {
    PathBuf::from(crate::defaults::DEFAULT_INPUT_ROOT)
}

fn default_output_file() -> PathBuf {
    PathBuf::from(crate::defaults::DEFAULT_OUTPUT_FILE)
}

fn default_enable_color() -> bool {
    crate::defaults::DEFAULT_ENABLE_COLOR
}
