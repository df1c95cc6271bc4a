//! GitHub client trait
//!
//! This module defines the core `GitHubClient` trait that all client
//! implementations must satisfy. The governance logic only ever talks to
//! GitHub through this trait, so it can be exercised against in-memory fakes.

use crate::types::{IssueComment, Label, PullRequest};
use async_trait::async_trait;

/// GitHub API client trait
///
/// Defines the interface for interacting with the GitHub API.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` to allow sharing across
/// async tasks and threads.
///
/// # Example
///
/// ```rust,ignore
/// use gh_client::{GitHubClient, Label};
///
/// async fn labels(client: &dyn GitHubClient) -> anyhow::Result<Vec<Label>> {
///     client.fetch_issue_labels("pingcap", "tidb", 42).await
/// }
/// ```
#[async_trait]
pub trait GitHubClient: Send + Sync {
    /// Login of the authenticated identity the bot acts as
    async fn bot_login(&self) -> anyhow::Result<String>;

    /// Fetch a single pull request by number
    ///
    /// # Arguments
    ///
    /// * `owner` - Repository owner
    /// * `repo` - Repository name
    /// * `pr_number` - Pull request number
    async fn fetch_pull_request(
        &self,
        owner: &str,
        repo: &str,
        pr_number: u64,
    ) -> anyhow::Result<PullRequest>;

    /// Fetch the labels currently attached to an issue or pull request
    ///
    /// Labels are returned in the order GitHub returns them.
    async fn fetch_issue_labels(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
    ) -> anyhow::Result<Vec<Label>>;

    /// Add a label by exact name
    async fn add_label(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
        label: &str,
    ) -> anyhow::Result<()>;

    /// Remove a label by exact name
    async fn remove_label(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
        label: &str,
    ) -> anyhow::Result<()>;

    /// List all conversation comments of an issue or pull request
    ///
    /// No ordering is guaranteed; callers that care about recency must sort.
    async fn list_issue_comments(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
    ) -> anyhow::Result<Vec<IssueComment>>;

    /// Create a conversation comment with literal text
    ///
    /// # Returns
    ///
    /// The GitHub comment ID on success
    async fn create_comment(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
        body: &str,
    ) -> anyhow::Result<u64>;

    /// Delete a conversation comment
    async fn delete_comment(&self, owner: &str, repo: &str, comment_id: u64)
        -> anyhow::Result<()>;

    /// Resolve the tree hash (content fingerprint) of a commit
    ///
    /// # Arguments
    ///
    /// * `owner` - Repository owner
    /// * `repo` - Repository name
    /// * `commit_sha` - The commit SHA to resolve
    async fn fetch_commit_tree_hash(
        &self,
        owner: &str,
        repo: &str,
        commit_sha: &str,
    ) -> anyhow::Result<String>;
}
