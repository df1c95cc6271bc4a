//! Error types for configuration loading

use std::path::PathBuf;
use thiserror::Error;

/// Errors that reject a whole configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// No configuration file in any of the searched locations
    #[error("No configuration file found (searched ./{0} and $HOME/{0})")]
    NotFound(&'static str),

    /// Configuration file could not be read
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// TOML syntax or schema error
    #[error("Invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// Ownership endpoint is not an absolute http(s) URL
    #[error("Invalid pull_owners_endpoint '{endpoint}': {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },

    /// A merge-gate entry without any org or org/repo
    #[error("merge_gate entry #{0} has no repos")]
    NoRepos(usize),

    /// An empty label name or label prefix
    #[error("merge_gate entry #{index}: {field} must not be empty")]
    EmptyField { index: usize, field: &'static str },
}
