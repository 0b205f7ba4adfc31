//! Configuration validation utilities and rules
//!
//! Fatal problems come back as errors; anything that still lets the batch
//! run is reported as a [`ValidationWarning`].

use crate::{
    error::{AppError, Result},
    models::{BatchManifest, Config},
};
use std::collections::HashSet;
use std::path::PathBuf;

/// Configuration validator with filesystem-aware rules
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate configuration with comprehensive checks
    pub fn validate_comprehensive(config: &Config) -> Result<Vec<ValidationWarning>> {
        let mut warnings = Vec::new();

        config.validate()?;

        warnings.extend(Self::validate_input_root(config)?);
        warnings.extend(Self::validate_output_location(config)?);

        Ok(warnings)
    }

    /// The input root must be an existing directory
    fn validate_input_root(config: &Config) -> Result<Vec<ValidationWarning>> {
        let root = &config.input_root;

        if !root.exists() {
            return Err(AppError::config(format!("Input root '{}' does not exist", root.display())));
        }
        if !root.is_dir() {
            return Err(AppError::config(format!("Input root '{}' is not a directory", root.display())));
        }

        let mut warnings = Vec::new();
        if root.is_relative() {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Info,
                format!("Input root '{}' is relative to the working directory", root.display())
            ));
        }

        Ok(warnings)
    }

    /// The summary file's directory must exist; an existing file is truncated
    fn validate_output_location(config: &Config) -> Result<Vec<ValidationWarning>> {
        let output = config.output_path();
        let mut warnings = Vec::new();

        let parent = output.parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));

        if !parent.is_dir() {
            return Err(AppError::config(format!(
                "Output directory '{}' does not exist",
                parent.display()
            )));
        }

        if output.is_dir() {
            return Err(AppError::config(format!("Output file '{}' is a directory", output.display())));
        }

        if output.exists() {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Info,
                format!("Output file '{}' will be overwritten", output.display())
            ));
        }

        Ok(warnings)
    }

    /// Non-fatal manifest checks: empty groups, repeated files and missing inputs
    pub fn validate_manifest(config: &Config, manifest: &BatchManifest) -> Vec<ValidationWarning> {
        let mut warnings = Vec::new();
        let mut seen = HashSet::new();
        let output = config.output_path();

        for group in &manifest.groups {
            if group.inputs.is_empty() {
                warnings.push(ValidationWarning::new(
                    ValidationLevel::Warning,
                    format!("Group '{}' has no inputs and only contributes a separator", group.name)
                ));
            }

            for input in &group.inputs {
                let path = config.input_path(&input.file);

                if !seen.insert(path.clone()) {
                    warnings.push(ValidationWarning::new(
                        ValidationLevel::Warning,
                        format!("'{}' is listed more than once", input.file.display())
                    ));
                }

                if path == output {
                    warnings.push(ValidationWarning::new(
                        ValidationLevel::Error,
                        format!("'{}' is also the output file and will be truncated before it is read", input.file.display())
                    ));
                } else if !path.exists() {
                    warnings.push(ValidationWarning::new(
                        ValidationLevel::Warning,
                        format!("Input file '{}' does not exist", path.display())
                    ));
                }
            }
        }

        let mut names = HashSet::new();
        for group in &manifest.groups {
            if !names.insert(group.name.as_str()) {
                warnings.push(ValidationWarning::new(
                    ValidationLevel::Info,
                    format!("Group name '{}' is used more than once", group.name)
                ));
            }
        }

        warnings
    }
}

/// Validation warning levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ValidationLevel {
    Info,
    Warning,
    Error,
}

impl ValidationLevel {
    /// Get display string for level
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "INFO",
            Self::Warning => "WARNING",
            Self::Error => "ERROR",
        }
    }
}

/// Configuration validation warning
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationWarning {
    pub level: ValidationLevel,
    pub message: String,
}

impl ValidationWarning {
    /// Create a new validation warning
    pub fn new(level: ValidationLevel, message: String) -> Self {
        Self { level, message }
    }

    /// Format warning for display
    pub fn format(&self) -> String {
        format!("[{}] {}", self.level.as_str(), self.message)
    }
}

/// Convenience function for comprehensive configuration validation
pub fn validate_config(config: &Config) -> Result<Vec<ValidationWarning>> {
    ConfigValidator::validate_comprehensive(config)
}
