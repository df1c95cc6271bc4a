//! Octocrab-based GitHub API client
//!
//! Direct implementation of the `GitHubClient` trait using the octocrab library.
//! This client makes real API calls without any caching.

use crate::client::GitHubClient;
use crate::types::{IssueComment, Label, PullRequest, PullRequestState};
use anyhow::Context;
use async_trait::async_trait;
use log::debug;
use octocrab::models::CommentId;
use octocrab::Octocrab;
use serde::Deserialize;
use std::sync::Arc;

const PER_PAGE: u8 = 100;

/// Direct GitHub API client using octocrab
#[derive(Debug, Clone)]
pub struct OctocrabClient {
    octocrab: Arc<Octocrab>,
    bot_login: Option<String>,
}

impl OctocrabClient {
    /// Create a new client with the given octocrab instance
    pub fn new(octocrab: Arc<Octocrab>) -> Self {
        Self {
            octocrab,
            bot_login: None,
        }
    }

    /// Use a fixed bot login instead of asking `GET /user`
    ///
    /// Installation and workflow tokens are not users and get 403 there.
    pub fn with_bot_login(mut self, login: impl Into<String>) -> Self {
        self.bot_login = Some(login.into());
        self
    }

    /// Get a reference to the underlying octocrab instance
    pub fn octocrab(&self) -> &Octocrab {
        &self.octocrab
    }
}

/// Subset of the single-commit response needed for the tree hash
#[derive(Debug, Deserialize)]
struct SingleCommit {
    commit: CommitDetail,
}

#[derive(Debug, Deserialize)]
struct CommitDetail {
    tree: TreeRef,
}

#[derive(Debug, Deserialize)]
struct TreeRef {
    sha: String,
}

#[async_trait]
impl GitHubClient for OctocrabClient {
    async fn bot_login(&self) -> anyhow::Result<String> {
        if let Some(login) = &self.bot_login {
            return Ok(login.clone());
        }

        debug!("Resolving bot login via /user");
        let user = self
            .octocrab
            .current()
            .user()
            .await
            .context("Failed to resolve the authenticated user")?;
        Ok(user.login)
    }

    async fn fetch_pull_request(
        &self,
        owner: &str,
        repo: &str,
        pr_number: u64,
    ) -> anyhow::Result<PullRequest> {
        debug!("Fetching PR {}/{}#{}", owner, repo, pr_number);

        let pr = self
            .octocrab
            .pulls(owner, repo)
            .get(pr_number)
            .await
            .with_context(|| format!("Failed to get pull request {owner}/{repo}#{pr_number}"))?;

        Ok(convert_pull_request(&pr))
    }

    async fn fetch_issue_labels(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
    ) -> anyhow::Result<Vec<Label>> {
        debug!("Fetching labels for {}/{}#{}", owner, repo, number);

        let page = self
            .octocrab
            .issues(owner, repo)
            .list_labels_for_issue(number)
            .per_page(PER_PAGE)
            .send()
            .await
            .with_context(|| format!("Failed to get labels of {owner}/{repo}#{number}"))?;
        let labels = self.octocrab.all_pages(page).await?;

        Ok(labels.into_iter().map(|l| Label::new(l.name)).collect())
    }

    async fn add_label(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
        label: &str,
    ) -> anyhow::Result<()> {
        debug!("Adding label '{}' to {}/{}#{}", label, owner, repo, number);

        self.octocrab
            .issues(owner, repo)
            .add_labels(number, &[label.to_string()])
            .await
            .with_context(|| format!("Failed to add label '{label}' to {owner}/{repo}#{number}"))?;
        Ok(())
    }

    async fn remove_label(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
        label: &str,
    ) -> anyhow::Result<()> {
        debug!("Removing label '{}' from {}/{}#{}", label, owner, repo, number);

        self.octocrab
            .issues(owner, repo)
            .remove_label(number, label)
            .await
            .with_context(|| {
                format!("Failed to remove label '{label}' from {owner}/{repo}#{number}")
            })?;
        Ok(())
    }

    async fn list_issue_comments(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
    ) -> anyhow::Result<Vec<IssueComment>> {
        debug!("Listing comments of {}/{}#{}", owner, repo, number);

        let page = self
            .octocrab
            .issues(owner, repo)
            .list_comments(number)
            .per_page(PER_PAGE)
            .send()
            .await
            .with_context(|| format!("Failed to list comments of {owner}/{repo}#{number}"))?;
        let comments = self.octocrab.all_pages(page).await?;

        debug!(
            "Fetched {} comments for {}/{}#{}",
            comments.len(),
            owner,
            repo,
            number
        );
        Ok(comments.iter().map(convert_comment).collect())
    }

    async fn create_comment(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
        body: &str,
    ) -> anyhow::Result<u64> {
        debug!("Creating comment on {}/{}#{}", owner, repo, number);

        let comment = self
            .octocrab
            .issues(owner, repo)
            .create_comment(number, body)
            .await
            .with_context(|| format!("Failed to create comment on {owner}/{repo}#{number}"))?;
        Ok(comment.id.0)
    }

    async fn delete_comment(
        &self,
        owner: &str,
        repo: &str,
        comment_id: u64,
    ) -> anyhow::Result<()> {
        debug!("Deleting comment {} in {}/{}", comment_id, owner, repo);

        self.octocrab
            .issues(owner, repo)
            .delete_comment(CommentId(comment_id))
            .await
            .with_context(|| format!("Failed to delete comment {comment_id} in {owner}/{repo}"))?;
        Ok(())
    }

    async fn fetch_commit_tree_hash(
        &self,
        owner: &str,
        repo: &str,
        commit_sha: &str,
    ) -> anyhow::Result<String> {
        debug!("Fetching commit {}/{} @ {}", owner, repo, commit_sha);

        // Raw GET: only the tree SHA is needed from the single-commit payload
        let route = format!("/repos/{}/{}/commits/{}", owner, repo, commit_sha);
        let commit: SingleCommit = self
            .octocrab
            .get(route, None::<&()>)
            .await
            .with_context(|| format!("Failed to get commit {commit_sha} in {owner}/{repo}"))?;

        Ok(commit.commit.tree.sha)
    }
}

/// Convert octocrab PullRequest to our PullRequest type
fn convert_pull_request(pr: &octocrab::models::pulls::PullRequest) -> PullRequest {
    let state = match pr.state {
        Some(octocrab::models::IssueState::Closed) => PullRequestState::Closed,
        _ => PullRequestState::Open,
    };

    PullRequest {
        number: pr.number,
        author: pr
            .user
            .as_ref()
            .map(|u| u.login.clone())
            .unwrap_or_else(|| "unknown".to_string()),
        state,
        merged: pr.merged_at.is_some(),
        head_sha: pr.head.sha.clone(),
        html_url: pr
            .html_url
            .as_ref()
            .map(|u| u.to_string())
            .unwrap_or_default(),
    }
}

/// Convert octocrab issue Comment to our IssueComment type
fn convert_comment(comment: &octocrab::models::issues::Comment) -> IssueComment {
    IssueComment {
        id: comment.id.0,
        author: comment.user.login.clone(),
        body: comment.body.clone().unwrap_or_default(),
        html_url: comment.html_url.to_string(),
        created_at: comment.created_at,
        // GitHub omits updated_at on some payloads; absent means never edited
        updated_at: comment.updated_at.unwrap_or(comment.created_at),
    }
}
