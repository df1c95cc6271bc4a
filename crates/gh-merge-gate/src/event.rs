//! Webhook payload decoding and normalization
//!
//! Only the fields the merge gate reads are decoded. Each supported event kind
//! is turned into one [`Trigger`] so the engine never sees event types.

use crate::context::{RepoRef, ReviewContext};
use crate::directive::Directive;
use anyhow::Context;
use gh_client::PullRequestState;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub login: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Repository {
    pub name: String,
    pub owner: User,
}

impl Repository {
    fn to_ref(&self) -> RepoRef {
        RepoRef::new(&self.owner.login, &self.name)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Comment {
    #[serde(default)]
    pub body: Option<String>,
    pub html_url: String,
    pub user: User,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Issue {
    pub number: u64,
    pub state: String,
    pub user: User,
    /// Present only when the issue is a pull request
    #[serde(default)]
    pub pull_request: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Branch {
    pub sha: String,
    #[serde(default)]
    pub repo: Option<Repository>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PullRequest {
    pub number: u64,
    pub state: String,
    pub user: User,
    #[serde(default)]
    pub merged: bool,
    pub head: Branch,
    pub base: Branch,
}

impl PullRequest {
    fn is_open(&self) -> bool {
        PullRequestState::from_api(&self.state) == PullRequestState::Open
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct IssueCommentEvent {
    pub action: String,
    pub issue: Issue,
    pub comment: Comment,
    pub repository: Repository,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReviewCommentEvent {
    pub action: String,
    pub pull_request: PullRequest,
    pub comment: Comment,
    pub repository: Repository,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReviewEvent {
    pub action: String,
    pub pull_request: PullRequest,
    pub review: Comment,
    pub repository: Repository,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PullRequestEvent {
    pub action: String,
    pub pull_request: PullRequest,
    pub repository: Repository,
}

/// A supported GitHub event
#[derive(Debug, Clone)]
pub enum GovernanceEvent {
    IssueComment(IssueCommentEvent),
    ReviewComment(ReviewCommentEvent),
    Review(ReviewEvent),
    PullRequest(PullRequestEvent),
}

/// What an event asks the merge gate to do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Trigger {
    /// Someone wrote `/merge` or `/merge cancel`
    Directive {
        ctx: ReviewContext,
        directive: Directive,
    },
    /// New commits were pushed to an open PR
    ContentChanged {
        repo: RepoRef,
        number: u64,
        head_sha: String,
    },
}

impl GovernanceEvent {
    /// Decode a payload given the `X-GitHub-Event` name
    ///
    /// Unsupported event names yield `Ok(None)`.
    pub fn from_payload(event_name: &str, payload: &[u8]) -> anyhow::Result<Option<Self>> {
        let event = match event_name {
            "issue_comment" => GovernanceEvent::IssueComment(
                serde_json::from_slice(payload).context("Invalid issue_comment payload")?,
            ),
            "pull_request_review_comment" => GovernanceEvent::ReviewComment(
                serde_json::from_slice(payload)
                    .context("Invalid pull_request_review_comment payload")?,
            ),
            "pull_request_review" => GovernanceEvent::Review(
                serde_json::from_slice(payload).context("Invalid pull_request_review payload")?,
            ),
            "pull_request" => GovernanceEvent::PullRequest(
                serde_json::from_slice(payload).context("Invalid pull_request payload")?,
            ),
            _ => return Ok(None),
        };
        Ok(Some(event))
    }

    /// Repository the event happened in
    pub fn repo(&self) -> RepoRef {
        match self {
            GovernanceEvent::IssueComment(e) => e.repository.to_ref(),
            GovernanceEvent::ReviewComment(e) => e.repository.to_ref(),
            GovernanceEvent::Review(e) => e.repository.to_ref(),
            GovernanceEvent::PullRequest(e) => e
                .pull_request
                .base
                .repo
                .as_ref()
                .unwrap_or(&e.repository)
                .to_ref(),
        }
    }

    /// Normalize into a trigger; `None` when the event is irrelevant
    pub fn into_trigger(self) -> Option<Trigger> {
        let repo = self.repo();
        match self {
            GovernanceEvent::IssueComment(e) => {
                // Only consider open PRs and new comments
                if e.issue.pull_request.is_none()
                    || PullRequestState::from_api(&e.issue.state) != PullRequestState::Open
                    || e.action != "created"
                {
                    return None;
                }
                directive_trigger(repo, e.issue.number, &e.issue.user.login, e.comment)
            }
            GovernanceEvent::ReviewComment(e) => {
                if !e.pull_request.is_open() || e.action != "created" {
                    return None;
                }
                let author = e.pull_request.user.login;
                directive_trigger(repo, e.pull_request.number, &author, e.comment)
            }
            GovernanceEvent::Review(e) => {
                if !e.pull_request.is_open() || e.action != "submitted" {
                    return None;
                }
                let author = e.pull_request.user.login;
                directive_trigger(repo, e.pull_request.number, &author, e.review)
            }
            GovernanceEvent::PullRequest(e) => {
                if e.action != "synchronize" || e.pull_request.merged || !e.pull_request.is_open() {
                    return None;
                }
                Some(Trigger::ContentChanged {
                    repo,
                    number: e.pull_request.number,
                    head_sha: e.pull_request.head.sha,
                })
            }
        }
    }
}

fn directive_trigger(
    repo: RepoRef,
    number: u64,
    pr_author: &str,
    comment: Comment,
) -> Option<Trigger> {
    let body = comment.body.unwrap_or_default();
    let directive = Directive::parse(&body)?;
    Some(Trigger::Directive {
        ctx: ReviewContext {
            actor: comment.user.login,
            pr_author: pr_author.to_string(),
            body,
            html_url: comment.html_url,
            repo,
            number,
        },
        directive,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn repository() -> serde_json::Value {
        json!({"name": "tidb", "owner": {"login": "pingcap"}})
    }

    fn pull_request(state: &str, merged: bool) -> serde_json::Value {
        json!({
            "number": 42,
            "state": state,
            "user": {"login": "bob"},
            "merged": merged,
            "head": {"sha": "head-sha"},
            "base": {"sha": "base-sha", "repo": repository()}
        })
    }

    fn issue_comment(action: &str, state: &str, is_pr: bool, body: &str) -> Vec<u8> {
        let mut issue = json!({"number": 42, "state": state, "user": {"login": "bob"}});
        if is_pr {
            issue["pull_request"] =
                json!({"url": "https://api.github.com/repos/pingcap/tidb/pulls/42"});
        }
        serde_json::to_vec(&json!({
            "action": action,
            "issue": issue,
            "comment": {
                "body": body,
                "html_url": "https://github.com/pingcap/tidb/pull/42#issuecomment-1",
                "user": {"login": "alice"}
            },
            "repository": repository()
        }))
        .unwrap()
    }

    fn trigger(event_name: &str, payload: &[u8]) -> Option<Trigger> {
        GovernanceEvent::from_payload(event_name, payload)
            .unwrap()
            .and_then(GovernanceEvent::into_trigger)
    }

    #[test]
    fn test_issue_comment_directive() {
        let trigger = trigger("issue_comment", &issue_comment("created", "open", true, "/merge"));
        assert_eq!(
            trigger,
            Some(Trigger::Directive {
                ctx: ReviewContext {
                    actor: "alice".to_string(),
                    pr_author: "bob".to_string(),
                    body: "/merge".to_string(),
                    html_url: "https://github.com/pingcap/tidb/pull/42#issuecomment-1".to_string(),
                    repo: RepoRef::new("pingcap", "tidb"),
                    number: 42,
                },
                directive: Directive::Grant,
            })
        );
    }

    #[test]
    fn test_issue_comment_filtered() {
        // plain issue, closed PR, edited comment, no directive
        for payload in [
            issue_comment("created", "open", false, "/merge"),
            issue_comment("created", "closed", true, "/merge"),
            issue_comment("edited", "open", true, "/merge"),
            issue_comment("created", "open", true, "looks good"),
        ] {
            assert_eq!(trigger("issue_comment", &payload), None);
        }
    }

    #[test]
    fn test_review_comment_directive() {
        let payload = serde_json::to_vec(&json!({
            "action": "created",
            "pull_request": pull_request("open", false),
            "comment": {
                "body": "/merge cancel",
                "html_url": "https://github.com/pingcap/tidb/pull/42#discussion_r1",
                "user": {"login": "bob"}
            },
            "repository": repository()
        }))
        .unwrap();

        match trigger("pull_request_review_comment", &payload) {
            Some(Trigger::Directive { ctx, directive }) => {
                assert_eq!(directive, Directive::Revoke);
                assert!(ctx.is_author());
            }
            other => panic!("unexpected trigger {other:?}"),
        }
    }

    #[test]
    fn test_review_without_body() {
        let payload = serde_json::to_vec(&json!({
            "action": "submitted",
            "pull_request": pull_request("open", false),
            "review": {
                "body": null,
                "html_url": "https://github.com/pingcap/tidb/pull/42#pullrequestreview-1",
                "user": {"login": "alice"}
            },
            "repository": repository()
        }))
        .unwrap();

        assert_eq!(trigger("pull_request_review", &payload), None);
    }

    fn review(action: &str, body: &str) -> Vec<u8> {
        serde_json::to_vec(&json!({
            "action": action,
            "pull_request": pull_request("open", false),
            "review": {
                "body": body,
                "html_url": "https://github.com/pingcap/tidb/pull/42#pullrequestreview-7",
                "user": {"login": "alice"}
            },
            "repository": repository()
        }))
        .unwrap()
    }

    #[test]
    fn test_submitted_review_directive() {
        let trigger = trigger("pull_request_review", &review("submitted", "LGTM\r\n/merge"));
        assert_eq!(
            trigger,
            Some(Trigger::Directive {
                ctx: ReviewContext {
                    actor: "alice".to_string(),
                    pr_author: "bob".to_string(),
                    body: "LGTM\r\n/merge".to_string(),
                    html_url: "https://github.com/pingcap/tidb/pull/42#pullrequestreview-7"
                        .to_string(),
                    repo: RepoRef::new("pingcap", "tidb"),
                    number: 42,
                },
                directive: Directive::Grant,
            })
        );
    }

    #[test]
    fn test_review_not_submitted_is_ignored() {
        for action in ["edited", "dismissed"] {
            assert_eq!(
                trigger("pull_request_review", &review(action, "/merge")),
                None,
                "{action}"
            );
        }
    }

    #[test]
    fn test_synchronize() {
        let payload = serde_json::to_vec(&json!({
            "action": "synchronize",
            "pull_request": pull_request("open", false),
            "repository": repository()
        }))
        .unwrap();

        assert_eq!(
            trigger("pull_request", &payload),
            Some(Trigger::ContentChanged {
                repo: RepoRef::new("pingcap", "tidb"),
                number: 42,
                head_sha: "head-sha".to_string(),
            })
        );
    }

    #[test]
    fn test_pull_request_filtered() {
        for (action, state, merged) in [
            ("opened", "open", false),
            ("synchronize", "closed", true),
            ("synchronize", "closed", false),
        ] {
            let payload = serde_json::to_vec(&json!({
                "action": action,
                "pull_request": pull_request(state, merged),
                "repository": repository()
            }))
            .unwrap();
            assert_eq!(trigger("pull_request", &payload), None, "{action} {state}");
        }
    }

    #[test]
    fn test_unknown_and_malformed() {
        assert!(GovernanceEvent::from_payload("push", b"{}").unwrap().is_none());
        assert!(GovernanceEvent::from_payload("issue_comment", b"{}").is_err());
    }
}
