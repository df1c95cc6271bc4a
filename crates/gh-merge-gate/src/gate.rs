//! Effect executor
//!
//! `MergeGate` reads live state through the injected collaborators, asks the
//! engine for a decision and applies the resulting effects in order. Nothing
//! is cached between evaluations and nothing is rolled back: the first failed
//! call aborts the evaluation. Transitions are idempotent, and a grant that
//! failed to record its tree hash leaves no ledger behind, so the next push
//! removes the label instead of trusting a record from an earlier grant.

use crate::context::{RepoRef, ReviewContext};
use crate::directive::Directive;
use crate::engine::{
    decide, decide_on_push, is_removal_notice, reject_self_grant, removal_notice, GateEffect,
};
use crate::event::{GovernanceEvent, Trigger};
use crate::labels::LabelSnapshot;
use crate::ledger;
use crate::response::format_response;
use anyhow::Context;
use gh_client::{CommentPruner, GitHubClient};
use gh_gov_config::{Configuration, MergeGateConfig};
use gh_owners_client::{owners_url, OwnersLoader};
use log::{debug, info};
use std::sync::Arc;

/// Result of handling one event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Not a merge-gate event, or the repository is not configured
    Ignored,
    /// Evaluated; these effects were applied (possibly none)
    Evaluated(Vec<GateEffect>),
}

/// Merge-gate handler bound to its collaborators
#[derive(Clone)]
pub struct MergeGate {
    client: Arc<dyn GitHubClient>,
    owners: Arc<dyn OwnersLoader>,
}

impl MergeGate {
    pub fn new(client: Arc<dyn GitHubClient>, owners: Arc<dyn OwnersLoader>) -> Self {
        Self { client, owners }
    }

    /// Normalize an event, resolve its repository's settings and evaluate it
    pub async fn handle_event(
        &self,
        event: GovernanceEvent,
        config: &Configuration,
    ) -> anyhow::Result<Outcome> {
        let repo = event.repo();
        let Some(opts) = config.merge_gate_for(&repo.owner, &repo.name) else {
            debug!("Merge gate is not configured for {}", repo);
            return Ok(Outcome::Ignored);
        };

        let Some(trigger) = event.into_trigger() else {
            debug!("Event in {} does not concern the merge gate", repo);
            return Ok(Outcome::Ignored);
        };

        let effects = match trigger {
            Trigger::Directive { ctx, directive } => {
                self.handle_directive(&ctx, directive, opts).await?
            }
            Trigger::ContentChanged {
                repo,
                number,
                head_sha,
            } => {
                self.handle_content_change(&repo, number, &head_sha, opts)
                    .await?
            }
        };
        Ok(Outcome::Evaluated(effects))
    }

    /// Evaluate a `/merge` or `/merge cancel`
    pub async fn handle_directive(
        &self,
        ctx: &ReviewContext,
        directive: Directive,
        opts: &MergeGateConfig,
    ) -> anyhow::Result<Vec<GateEffect>> {
        let (org, repo, number) = (ctx.repo.owner.as_str(), ctx.repo.name.as_str(), ctx.number);

        if let Some(reply) = reject_self_grant(ctx, directive) {
            info!("{} tried to merge own PR {}#{}", ctx.actor, ctx.repo, number);
            let effects = vec![reply];
            self.apply(&ctx.repo, number, &effects, opts, Some(ctx)).await?;
            return Ok(effects);
        }

        let owners = self
            .owners
            .load_owners(&opts.pull_owners_endpoint, org, repo, number)
            .await
            .with_context(|| format!("Failed to load owners of {}#{}", ctx.repo, number))?;
        let list_url = owners_url(&opts.pull_owners_endpoint, org, repo, number)?;

        let labels = self.client.fetch_issue_labels(org, repo, number).await?;
        let snapshot =
            LabelSnapshot::from_labels(&labels, &opts.gate_label, &opts.approval_label_prefix);
        debug!(
            "{}#{}: gate present={}, {} of {} LGTMs",
            ctx.repo, number, snapshot.gate_present, snapshot.satisfied_count, owners.needs_lgtm
        );

        let effects = decide(ctx, directive, &owners, &snapshot, opts, list_url.as_str());
        self.apply(&ctx.repo, number, &effects, opts, Some(ctx)).await?;
        Ok(effects)
    }

    /// Evaluate a push of new commits
    pub async fn handle_content_change(
        &self,
        repo: &RepoRef,
        number: u64,
        head_sha: &str,
        opts: &MergeGateConfig,
    ) -> anyhow::Result<Vec<GateEffect>> {
        let labels = self
            .client
            .fetch_issue_labels(&repo.owner, &repo.name, number)
            .await?;
        let snapshot =
            LabelSnapshot::from_labels(&labels, &opts.gate_label, &opts.approval_label_prefix);
        if !snapshot.gate_present {
            debug!("{}#{} has no '{}' label", repo, number, opts.gate_label);
            return Ok(Vec::new());
        }

        let mut recorded = None;
        let mut current = None;
        if opts.store_tree_hash {
            let bot = self.client.bot_login().await?;
            let comments = self
                .client
                .list_issue_comments(&repo.owner, &repo.name, number)
                .await?;

            match ledger::find_latest(&comments, &bot) {
                Some(record) => {
                    current = Some(
                        self.client
                            .fetch_commit_tree_hash(&repo.owner, &repo.name, head_sha)
                            .await?,
                    );
                    recorded = Some(record.tree_hash);
                }
                None => info!("No tree-hash record on {}#{}", repo, number),
            }
        }

        let effects = decide_on_push(
            snapshot.gate_present,
            opts.store_tree_hash,
            recorded.as_deref(),
            current.as_deref(),
        );
        if effects.is_empty() {
            info!(
                "Keeping '{}' on {}#{} as the tree-hash remained the same: {}",
                opts.gate_label,
                repo,
                number,
                current.as_deref().unwrap_or_default()
            );
        }

        self.apply(repo, number, &effects, opts, None).await?;
        Ok(effects)
    }

    async fn apply(
        &self,
        repo: &RepoRef,
        number: u64,
        effects: &[GateEffect],
        opts: &MergeGateConfig,
        trigger: Option<&ReviewContext>,
    ) -> anyhow::Result<()> {
        let (org, name) = (repo.owner.as_str(), repo.name.as_str());
        let client = self.client.as_ref();
        let pruner = CommentPruner::new(client, org, name, number);

        for effect in effects {
            match effect {
                GateEffect::Reply(reason) => {
                    let Some(ctx) = trigger else {
                        anyhow::bail!(
                            "Cannot reply on {repo}#{number} without a triggering comment"
                        );
                    };
                    info!("Replying to {} on {}#{}: \"{}\"", ctx.actor, repo, number, reason);
                    let body = format_response(&ctx.body, &ctx.html_url, &ctx.actor, reason);
                    client.create_comment(org, name, number, &body).await?;
                }
                GateEffect::AddLabel => {
                    info!("Adding '{}' label to {}#{}", opts.gate_label, repo, number);
                    client.add_label(org, name, number, &opts.gate_label).await?;
                }
                GateEffect::RemoveLabel => {
                    info!("Removing '{}' label from {}#{}", opts.gate_label, repo, number);
                    client
                        .remove_label(org, name, number, &opts.gate_label)
                        .await?;
                }
                GateEffect::RecordTreeHash => {
                    let pr = client.fetch_pull_request(org, name, number).await?;
                    let tree_hash = client
                        .fetch_commit_tree_hash(org, name, &pr.head_sha)
                        .await?;
                    info!("Recording tree-hash {} on {}#{}", tree_hash, repo, number);
                    client
                        .create_comment(org, name, number, &ledger::encode(&tree_hash))
                        .await?;
                }
                GateEffect::PruneLedger => {
                    pruner
                        .prune_comments(|c| ledger::is_ledger_comment(&c.body))
                        .await?;
                }
                GateEffect::PruneRemovalNotice => {
                    pruner
                        .prune_comments(|c| is_removal_notice(&c.body, &opts.gate_label))
                        .await?;
                }
                GateEffect::PostRemovalNotice => {
                    let notice = removal_notice(&opts.gate_label);
                    info!("Notifying {}#{}: {}", repo, number, notice);
                    client.create_comment(org, name, number, &notice).await?;
                }
            }
        }

        Ok(())
    }
}
