//! Error types for ownership resolution

use thiserror::Error;

/// Errors that abort an evaluation before any side effect
#[derive(Error, Debug)]
pub enum OwnersError {
    /// The configured endpoint is not a usable base URL
    #[error("Invalid owners endpoint '{endpoint}': {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },

    /// Transport-level failure
    #[error("Owners request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Endpoint answered with a non-success status
    #[error("Owners endpoint {url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    /// Response body is not an owners document
    #[error("Malformed owners response: {0}")]
    Malformed(#[from] serde_json::Error),

    /// Response says no approvals are needed, which the gate cannot honor
    #[error("Owners response for {org}/{repo}#{number} requires zero LGTMs")]
    NoRequiredApprovals { org: String, repo: String, number: u64 },
}
