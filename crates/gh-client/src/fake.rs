//! In-memory `GitHubClient` for tests
//!
//! Holds labels, comments, pull requests and commit trees per issue number and
//! records every mutation, so tests can assert on the exact side effects of an
//! evaluation. Any operation can be made to fail with [`FakeGitHubClient::fail_on`].

use crate::client::GitHubClient;
use crate::types::{IssueComment, Label, PullRequest, PullRequestState};
use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

/// A mutation performed against the fake
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    AddLabel { number: u64, label: String },
    RemoveLabel { number: u64, label: String },
    CreateComment { number: u64, body: String },
    DeleteComment { id: u64 },
}

#[derive(Debug, Default)]
struct FakeState {
    pull_requests: HashMap<u64, PullRequest>,
    labels: HashMap<u64, Vec<Label>>,
    comments: Vec<(u64, IssueComment)>,
    trees: HashMap<String, String>,
    next_comment_id: u64,
    clock: i64,
    failing: HashSet<String>,
    mutations: Vec<Mutation>,
}

impl FakeState {
    /// Monotonic fake timestamps so comment order is well-defined
    fn tick(&mut self) -> DateTime<Utc> {
        self.clock += 1;
        Utc.timestamp_opt(1_600_000_000, 0)
            .single()
            .unwrap_or_default()
            + Duration::seconds(self.clock)
    }

    fn check(&self, op: &str) -> anyhow::Result<()> {
        if self.failing.contains(op) {
            anyhow::bail!("injected failure: {op}");
        }
        Ok(())
    }
}

/// In-memory GitHub for tests
#[derive(Debug)]
pub struct FakeGitHubClient {
    bot_login: String,
    state: Mutex<FakeState>,
}

impl FakeGitHubClient {
    pub fn new(bot_login: impl Into<String>) -> Self {
        Self {
            bot_login: bot_login.into(),
            state: Mutex::new(FakeState {
                next_comment_id: 1,
                ..FakeState::default()
            }),
        }
    }

    /// Register an open pull request with the given author and head commit
    pub fn with_pull_request(self, number: u64, author: &str, head_sha: &str) -> Self {
        self.state.lock().unwrap().pull_requests.insert(
            number,
            PullRequest {
                number,
                author: author.to_string(),
                state: PullRequestState::Open,
                merged: false,
                head_sha: head_sha.to_string(),
                html_url: format!("https://github.com/owner/repo/pull/{number}"),
            },
        );
        self
    }

    /// Replace the labels of an issue
    pub fn with_labels(self, number: u64, labels: &[&str]) -> Self {
        self.state
            .lock()
            .unwrap()
            .labels
            .insert(number, labels.iter().map(|l| Label::new(*l)).collect());
        self
    }

    /// Map a commit SHA to its tree hash
    pub fn with_tree(self, commit_sha: &str, tree_hash: &str) -> Self {
        self.state
            .lock()
            .unwrap()
            .trees
            .insert(commit_sha.to_string(), tree_hash.to_string());
        self
    }

    /// Append an unedited comment without recording a mutation
    pub fn push_comment(&self, number: u64, author: &str, body: &str) -> u64 {
        let mut state = self.state.lock().unwrap();
        let at = state.tick();
        let id = state.next_comment_id;
        state.next_comment_id += 1;
        state.comments.push((
            number,
            IssueComment {
                id,
                author: author.to_string(),
                body: body.to_string(),
                html_url: format!("https://github.com/owner/repo/pull/{number}#issuecomment-{id}"),
                created_at: at,
                updated_at: at,
            },
        ));
        id
    }

    /// Simulate a human editing a comment after it was posted
    pub fn edit_comment(&self, id: u64, body: &str) {
        let mut state = self.state.lock().unwrap();
        let at = state.tick();
        if let Some((_, c)) = state.comments.iter_mut().find(|(_, c)| c.id == id) {
            c.body = body.to_string();
            c.updated_at = at;
        }
    }

    /// Make every subsequent call of `op` fail
    pub fn fail_on(&self, op: &str) {
        self.state.lock().unwrap().failing.insert(op.to_string());
    }

    pub fn label_names(&self, number: u64) -> Vec<String> {
        self.state
            .lock()
            .unwrap()
            .labels
            .get(&number)
            .map(|ls| ls.iter().map(|l| l.name.clone()).collect())
            .unwrap_or_default()
    }

    pub fn comments(&self, number: u64) -> Vec<IssueComment> {
        self.state
            .lock()
            .unwrap()
            .comments
            .iter()
            .filter(|(n, _)| *n == number)
            .map(|(_, c)| c.clone())
            .collect()
    }

    pub fn mutations(&self) -> Vec<Mutation> {
        self.state.lock().unwrap().mutations.clone()
    }
}

#[async_trait]
impl GitHubClient for FakeGitHubClient {
    async fn bot_login(&self) -> anyhow::Result<String> {
        self.state.lock().unwrap().check("bot_login")?;
        Ok(self.bot_login.clone())
    }

    async fn fetch_pull_request(
        &self,
        _owner: &str,
        _repo: &str,
        pr_number: u64,
    ) -> anyhow::Result<PullRequest> {
        let state = self.state.lock().unwrap();
        state.check("fetch_pull_request")?;
        state
            .pull_requests
            .get(&pr_number)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("PR not found"))
    }

    async fn fetch_issue_labels(
        &self,
        _owner: &str,
        _repo: &str,
        number: u64,
    ) -> anyhow::Result<Vec<Label>> {
        let state = self.state.lock().unwrap();
        state.check("fetch_issue_labels")?;
        Ok(state.labels.get(&number).cloned().unwrap_or_default())
    }

    async fn add_label(
        &self,
        _owner: &str,
        _repo: &str,
        number: u64,
        label: &str,
    ) -> anyhow::Result<()> {
        let mut state = self.state.lock().unwrap();
        state.check("add_label")?;
        let labels = state.labels.entry(number).or_default();
        if !labels.iter().any(|l| l.name == label) {
            labels.push(Label::new(label));
        }
        state.mutations.push(Mutation::AddLabel {
            number,
            label: label.to_string(),
        });
        Ok(())
    }

    async fn remove_label(
        &self,
        _owner: &str,
        _repo: &str,
        number: u64,
        label: &str,
    ) -> anyhow::Result<()> {
        let mut state = self.state.lock().unwrap();
        state.check("remove_label")?;
        if let Some(labels) = state.labels.get_mut(&number) {
            labels.retain(|l| l.name != label);
        }
        state.mutations.push(Mutation::RemoveLabel {
            number,
            label: label.to_string(),
        });
        Ok(())
    }

    async fn list_issue_comments(
        &self,
        _owner: &str,
        _repo: &str,
        number: u64,
    ) -> anyhow::Result<Vec<IssueComment>> {
        self.state.lock().unwrap().check("list_issue_comments")?;
        Ok(self.comments(number))
    }

    async fn create_comment(
        &self,
        _owner: &str,
        _repo: &str,
        number: u64,
        body: &str,
    ) -> anyhow::Result<u64> {
        self.state.lock().unwrap().check("create_comment")?;
        let id = self.push_comment(number, &self.bot_login, body);
        self.state
            .lock()
            .unwrap()
            .mutations
            .push(Mutation::CreateComment {
                number,
                body: body.to_string(),
            });
        Ok(id)
    }

    async fn delete_comment(
        &self,
        _owner: &str,
        _repo: &str,
        comment_id: u64,
    ) -> anyhow::Result<()> {
        let mut state = self.state.lock().unwrap();
        state.check("delete_comment")?;
        state.comments.retain(|(_, c)| c.id != comment_id);
        state
            .mutations
            .push(Mutation::DeleteComment { id: comment_id });
        Ok(())
    }

    async fn fetch_commit_tree_hash(
        &self,
        _owner: &str,
        _repo: &str,
        commit_sha: &str,
    ) -> anyhow::Result<String> {
        let state = self.state.lock().unwrap();
        state.check("fetch_commit_tree_hash")?;
        state
            .trees
            .get(commit_sha)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("commit {commit_sha} not found"))
    }
}
