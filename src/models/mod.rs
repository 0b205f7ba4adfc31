//! Data models and structures for the statistics aggregator

pub mod config;
pub mod manifest;
pub mod records;

// Re-export main model types
pub use config::Config;
pub use manifest::{BatchManifest, InputGroup, InputSpec};
pub use records::{ResultLine, RunAggregate, RunTally};
