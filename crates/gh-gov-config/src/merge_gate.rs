//! Merge-gate settings for one set of orgs/repos

use crate::error::ConfigError;
use reqwest::Url;
use serde::{Deserialize, Serialize};

/// Label whose presence authorizes a downstream merge
pub const DEFAULT_GATE_LABEL: &str = "status/can-merge";

/// Prefix of the label that carries the satisfied-review count (e.g. "status/LGT2")
pub const DEFAULT_APPROVAL_LABEL_PREFIX: &str = "status/LGT";

/// Merge-gate configuration, listed for repositories or whole organizations
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct MergeGateConfig {
    /// Entries of the form `org/repo` or just `org`
    #[serde(default)]
    pub repos: Vec<String>,

    /// Record the tree hash in a comment when the gate label is added, so a
    /// push that keeps the same content (squash, rebase) keeps the label
    #[serde(default)]
    pub store_tree_hash: bool,

    /// Ownership service endpoint returning approvers and the required LGTM count
    pub pull_owners_endpoint: String,

    /// Name of the gate label
    #[serde(default = "default_gate_label")]
    pub gate_label: String,

    /// Prefix of the satisfied-review count label
    #[serde(default = "default_approval_label_prefix")]
    pub approval_label_prefix: String,
}

fn default_gate_label() -> String {
    DEFAULT_GATE_LABEL.to_string()
}

fn default_approval_label_prefix() -> String {
    DEFAULT_APPROVAL_LABEL_PREFIX.to_string()
}

impl MergeGateConfig {
    pub fn new(repos: &[&str], pull_owners_endpoint: impl Into<String>) -> Self {
        Self {
            repos: repos.iter().map(|r| r.to_string()).collect(),
            store_tree_hash: false,
            pull_owners_endpoint: pull_owners_endpoint.into(),
            gate_label: default_gate_label(),
            approval_label_prefix: default_approval_label_prefix(),
        }
    }

    pub fn with_tree_hash(mut self, enabled: bool) -> Self {
        self.store_tree_hash = enabled;
        self
    }

    /// Whether this entry names `key` (an `org/repo` or an `org`) exactly
    pub fn covers(&self, key: &str) -> bool {
        self.repos.iter().any(|r| r == key)
    }

    /// Validate one entry; `index` is its position in the file for messages
    pub(crate) fn validate(&self, index: usize) -> Result<(), ConfigError> {
        if self.repos.is_empty() {
            return Err(ConfigError::NoRepos(index));
        }
        if self.gate_label.trim().is_empty() {
            return Err(ConfigError::EmptyField {
                index,
                field: "gate_label",
            });
        }
        if self.approval_label_prefix.is_empty() {
            return Err(ConfigError::EmptyField {
                index,
                field: "approval_label_prefix",
            });
        }
        validate_endpoint(&self.pull_owners_endpoint)
    }
}

/// Reject anything that is not an absolute http(s) URL with a host
fn validate_endpoint(endpoint: &str) -> Result<(), ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidEndpoint {
        endpoint: endpoint.to_string(),
        reason,
    };

    let url = Url::parse(endpoint).map_err(|e| invalid(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
    }
    if url.host_str().is_none() {
        return Err(invalid("missing host".to_string()));
    }
    Ok(())
}
