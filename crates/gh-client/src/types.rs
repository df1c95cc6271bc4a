//! GitHub API data transfer objects
//!
//! These types represent the data returned from the GitHub API.
//! They are intentionally separate from the octocrab models so that the
//! governance logic can be tested against in-memory fakes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A pull request from the GitHub API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PullRequest {
    /// PR number (e.g., 123)
    pub number: u64,

    /// Author's GitHub username
    pub author: String,

    /// Open or closed
    pub state: PullRequestState,

    /// Whether the PR has been merged
    pub merged: bool,

    /// HEAD commit SHA
    pub head_sha: String,

    /// PR URL for linking in comments
    pub html_url: String,
}

/// Issue/PR state as reported by GitHub
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PullRequestState {
    #[default]
    Open,
    Closed,
}

impl PullRequestState {
    /// Parse the `state` string used in webhook payloads
    pub fn from_api(state: &str) -> Self {
        if state.eq_ignore_ascii_case("open") {
            PullRequestState::Open
        } else {
            PullRequestState::Closed
        }
    }
}

/// A label attached to an issue or pull request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    /// Exact label name (e.g., "status/can-merge")
    pub name: String,
}

impl Label {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// A top-level comment on an issue or pull request conversation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssueComment {
    /// GitHub comment ID
    pub id: u64,
    /// Author's GitHub username
    pub author: String,
    /// Comment body text
    pub body: String,
    /// Comment URL
    pub html_url: String,
    /// When the comment was created
    pub created_at: DateTime<Utc>,
    /// When the comment was last updated (equals `created_at` if never edited)
    pub updated_at: DateTime<Utc>,
}

impl IssueComment {
    /// Whether the comment was edited after posting
    pub fn is_edited(&self) -> bool {
        self.updated_at != self.created_at
    }
}
