//! Batch manifest: which result files to aggregate, in which groups

use crate::error::{AppError, ErrorContext, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// One results file and the simulation parameters it was produced with
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputSpec {
    /// File name, relative to the input root unless absolute
    pub file: PathBuf,
    /// Data packets each requester expects per request
    #[serde(default = "default_packets")]
    pub packets: u32,
    /// Requester lines per run block
    #[serde(default = "default_requesters")]
    pub requesters: u32,
}

impl InputSpec {
    /// Input with the default packet and requester counts
    pub fn new<P: Into<PathBuf>>(file: P) -> Self {
        Self {
            file: file.into(),
            packets: default_packets(),
            requesters: default_requesters(),
        }
    }

    /// Override the expected packets per request
    pub fn with_packets(mut self, packets: u32) -> Self {
        self.packets = packets;
        self
    }

    /// Override the number of requesters per run
    pub fn with_requesters(mut self, requesters: u32) -> Self {
        self.requesters = requesters;
        self
    }
}

/// A logical group of inputs; groups are separated by a blank line in the summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputGroup {
    pub name: String,
    #[serde(default)]
    pub inputs: Vec<InputSpec>,
}

impl InputGroup {
    pub fn new<S: Into<String>>(name: S, inputs: Vec<InputSpec>) -> Self {
        Self { name: name.into(), inputs }
    }
}

/// Ordered table of input groups
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchManifest {
    pub groups: Vec<InputGroup>,
}

impl BatchManifest {
    /// The centralized-discovery experiment: mobility, requester count,
    /// service count and packet count sweeps
    pub fn builtin() -> Self {
        let mobility = [0, 25, 50, 100]
            .iter()
            .map(|speed| InputSpec::new(format!("centralized_mobile_{}.txt", speed)))
            .collect();

        let requesters = [1, 2, 4, 8, 16, 24, 32]
            .iter()
            .map(|&n| InputSpec::new(format!("centralized_requesters_{}.txt", n)).with_requesters(n))
            .collect();

        let services = [1, 2, 4, 8]
            .iter()
            .map(|n| InputSpec::new(format!("centralized_services_{}.txt", n)))
            .collect();

        let packets = [10, 20, 40, 60]
            .iter()
            .map(|&n| InputSpec::new(format!("centralized_packets_{}.txt", n)).with_packets(n))
            .collect();

        Self {
            groups: vec![
                InputGroup::new("mobility", mobility),
                InputGroup::new("requesters", requesters),
                InputGroup::new("services", services),
                InputGroup::new("packets", packets),
            ],
        }
    }

    /// Parse a manifest from JSON text
    pub fn from_json_str(json: &str) -> Result<Self> {
        let manifest: Self = serde_json::from_str(json)?;
        manifest.validate()?;
        Ok(manifest)
    }

    /// Load a manifest from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read manifest {}", path.display()))?;
        Self::from_json_str(&content)
            .with_context(|| format!("Invalid manifest {}", path.display()))
    }

    /// Serialize for `--print-manifest`
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Total number of inputs across all groups
    pub fn input_count(&self) -> usize {
        self.groups.iter().map(|g| g.inputs.len()).sum()
    }

    /// Check the structural rules every manifest must satisfy
    pub fn validate(&self) -> Result<()> {
        if self.groups.is_empty() {
            return Err(AppError::validation("Manifest must contain at least one group"));
        }

        for group in &self.groups {
            if group.name.trim().is_empty() {
                return Err(AppError::validation("Manifest group name cannot be empty"));
            }

            for input in &group.inputs {
                if input.file.as_os_str().is_empty() {
                    return Err(AppError::validation(format!(
                        "Group '{}' has an input with an empty file name",
                        group.name
                    )));
                }
                if input.packets == 0 {
                    return Err(AppError::validation(format!(
                        "{}: packets must be greater than 0",
                        input.file.display()
                    )));
                }
                if input.requesters == 0 {
                    return Err(AppError::validation(format!(
                        "{}: requesters must be greater than 0",
                        input.file.display()
                    )));
                }
            }
        }

        Ok(())
    }
}

impl Default for BatchManifest {
    fn default() -> Self {
        Self::builtin()
    }
}

fn default_packets() -> u32 {
    crate::defaults::DEFAULT_PACKETS
}

fn default_requesters() -> u32 {
    crate::defaults::DEFAULT_REQUESTERS
}
