//! Comment lifecycle management
//!
//! Deletes bot-authored conversation comments that match a caller-supplied
//! predicate. Only comments authored by the bot's own login are ever
//! considered, so a predicate can never cause a human comment to be removed.

use crate::client::GitHubClient;
use crate::types::IssueComment;
use log::{debug, info};

/// Prunes the bot's own comments on a single issue or pull request
pub struct CommentPruner<'a> {
    client: &'a dyn GitHubClient,
    owner: &'a str,
    repo: &'a str,
    number: u64,
}

impl<'a> CommentPruner<'a> {
    pub fn new(client: &'a dyn GitHubClient, owner: &'a str, repo: &'a str, number: u64) -> Self {
        Self {
            client,
            owner,
            repo,
            number,
        }
    }

    /// Delete every bot comment for which `should_prune` returns true
    ///
    /// Comments are re-listed on every call. The first failed deletion aborts
    /// the prune; comments already deleted stay deleted.
    ///
    /// # Returns
    ///
    /// The number of deleted comments
    pub async fn prune_comments<F>(&self, should_prune: F) -> anyhow::Result<usize>
    where
        F: Fn(&IssueComment) -> bool + Send + Sync,
    {
        let bot = self.client.bot_login().await?;
        let comments = self
            .client
            .list_issue_comments(self.owner, self.repo, self.number)
            .await?;

        let doomed: Vec<u64> = comments
            .iter()
            .filter(|c| c.author == bot && should_prune(c))
            .map(|c| c.id)
            .collect();

        if doomed.is_empty() {
            debug!(
                "No comments to prune on {}/{}#{}",
                self.owner, self.repo, self.number
            );
            return Ok(0);
        }

        for id in &doomed {
            self.client.delete_comment(self.owner, self.repo, *id).await?;
        }

        info!(
            "Pruned {} comment(s) on {}/{}#{}",
            doomed.len(),
            self.owner,
            self.repo,
            self.number
        );
        Ok(doomed.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake::{FakeGitHubClient, Mutation};

    #[tokio::test]
    async fn test_prune_only_bot_comments_matching_predicate() {
        let client = FakeGitHubClient::new("merge-bot");
        client.push_comment(7, "merge-bot", "stale notice");
        client.push_comment(7, "alice", "stale notice");
        client.push_comment(7, "merge-bot", "keep me");

        let pruner = CommentPruner::new(&client, "owner", "repo", 7);
        let pruned = pruner
            .prune_comments(|c| c.body.contains("stale"))
            .await
            .unwrap();

        assert_eq!(pruned, 1);
        let left: Vec<String> = client
            .comments(7)
            .into_iter()
            .map(|c| format!("{}: {}", c.author, c.body))
            .collect();
        assert_eq!(left, vec!["alice: stale notice", "merge-bot: keep me"]);
    }

    #[tokio::test]
    async fn test_prune_nothing_matches() {
        let client = FakeGitHubClient::new("merge-bot");
        client.push_comment(7, "merge-bot", "hello");

        let pruner = CommentPruner::new(&client, "owner", "repo", 7);
        let pruned = pruner.prune_comments(|_| false).await.unwrap();

        assert_eq!(pruned, 0);
        assert!(client.mutations().is_empty());
    }

    #[tokio::test]
    async fn test_prune_propagates_delete_failure() {
        let client = FakeGitHubClient::new("merge-bot");
        client.push_comment(7, "merge-bot", "stale notice");
        client.fail_on("delete_comment");

        let pruner = CommentPruner::new(&client, "owner", "repo", 7);
        let result = pruner.prune_comments(|_| true).await;

        assert!(result.is_err());
        assert!(!client
            .mutations()
            .iter()
            .any(|m| matches!(m, Mutation::DeleteComment { .. })));
    }
}
