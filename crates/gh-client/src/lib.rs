//! GitHub API client for repository governance
//!
//! This crate provides a trait-based GitHub API client covering the
//! operations the governance bot needs: reading and mutating issue labels,
//! listing/creating/deleting issue comments, and resolving commit tree hashes.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │              GitHubClient trait                  │
//! │  - fetch_issue_labels() / add_label()            │
//! │  - list_issue_comments() / create_comment()      │
//! │  - fetch_commit_tree_hash()                      │
//! └─────────────────────────────────────────────────┘
//!                        │
//!        ┌───────────────┴───────────────┐
//!        ▼                               ▼
//! ┌─────────────────┐         ┌─────────────────────┐
//! │ OctocrabClient  │◄────────│ CommentPruner       │
//! │ (direct API)    │         │ (comment lifecycle) │
//! └─────────────────┘         └─────────────────────┘
//! ```
//!
//! No response is cached: every evaluation re-reads live label and comment
//! state, because the labels and comments on the PR *are* the persisted state.
//!
//! # Example
//!
//! ```rust,no_run
//! use gh_client::{GitHubClient, OctocrabClient};
//! use std::sync::Arc;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let octocrab = octocrab::Octocrab::builder()
//!     .personal_token("token".to_string())
//!     .build()?;
//!
//! let client = OctocrabClient::new(Arc::new(octocrab));
//! let labels = client.fetch_issue_labels("owner", "repo", 42).await?;
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod client;
pub mod comment_pruner;
#[cfg(any(test, feature = "test-util"))]
pub mod fake;
pub mod octocrab_client;
pub mod types;

/// Default GitHub host (public GitHub)
pub const DEFAULT_HOST: &str = "github.com";

pub use auth::{connect, TokenResolver};
pub use client::GitHubClient;
pub use comment_pruner::CommentPruner;
pub use octocrab_client::OctocrabClient;
pub use types::{IssueComment, Label, PullRequest, PullRequestState};

// Re-export octocrab so consumers don't need to depend on it directly
pub use octocrab;
