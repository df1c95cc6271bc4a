//! Merge-gate decision logic
//!
//! Pure functions from (context, owners, labels, ledger) to a list of
//! [`GateEffect`]s. No I/O happens here; [`crate::MergeGate`] fetches the
//! inputs and interprets the effects.
//!
//! | gate present | directive | satisfied | effects                                   |
//! |--------------|-----------|-----------|-------------------------------------------|
//! | yes          | revoke    | -         | remove label, prune ledger*               |
//! | no           | grant     | yes       | prune ledger*, add label, record tree     |
//! |              |           |           | hash*, prune removal notice               |
//! | no           | grant     | no        | reply with the required LGTM count        |
//! | yes          | grant     | -         | none                                      |
//! | no           | revoke    | -         | none                                      |
//!
//! `*` only with tree-hash tracking enabled.

use crate::context::ReviewContext;
use crate::directive::Directive;
use crate::labels::LabelSnapshot;
use gh_gov_config::MergeGateConfig;
use gh_owners_client::Owners;

/// A side effect requested by the engine, applied in order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateEffect {
    /// Reply to the triggering comment with this reason
    Reply(String),
    AddLabel,
    RemoveLabel,
    /// Post a ledger comment with the current head's tree hash
    RecordTreeHash,
    /// Delete the bot's ledger comments
    PruneLedger,
    /// Delete the bot's "label removed due to new changes" notices
    PruneRemovalNotice,
    /// Tell participants the label was removed because of new changes
    PostRemovalNotice,
}

pub const SELF_MERGE_REASON: &str = "you cannot merge your own PR.";

/// Notice text used by earlier deployments regardless of the label name
const LEGACY_REMOVAL_NOTICE: &str = "New changes are detected. Can merge label has been removed.";

/// Notice posted when a push invalidates the gate label
pub fn removal_notice(gate_label: &str) -> String {
    format!("New changes are detected. {gate_label} label has been removed.")
}

/// Whether a comment body is a removal notice, current or legacy wording
pub fn is_removal_notice(body: &str, gate_label: &str) -> bool {
    body.contains(&removal_notice(gate_label)) || body.contains(LEGACY_REMOVAL_NOTICE)
}

/// Authors may revoke but never grant on their own PR; needs no owners lookup
pub fn reject_self_grant(ctx: &ReviewContext, directive: Directive) -> Option<GateEffect> {
    (directive == Directive::Grant && ctx.is_author())
        .then(|| GateEffect::Reply(SELF_MERGE_REASON.to_string()))
}

/// Decide what a `/merge` or `/merge cancel` leads to
///
/// `owners_url` is linked in rejection replies so the actor can see who the
/// approvers are.
pub fn decide(
    ctx: &ReviewContext,
    directive: Directive,
    owners: &Owners,
    snapshot: &LabelSnapshot,
    opts: &MergeGateConfig,
    owners_url: &str,
) -> Vec<GateEffect> {
    if let Some(reply) = reject_self_grant(ctx, directive) {
        return vec![reply];
    }

    let is_approver = owners.is_approver(&ctx.actor);
    let gate = &opts.gate_label;

    match directive {
        Directive::Grant if !is_approver => {
            return vec![GateEffect::Reply(format!(
                "adding '{gate}' is restricted to approvers in [list]({owners_url})."
            ))];
        }
        Directive::Revoke if !is_approver && !ctx.is_author() => {
            return vec![GateEffect::Reply(format!(
                "removing '{gate}' is restricted to approvers in [list]({owners_url}) or PR author."
            ))];
        }
        _ => {}
    }

    match (snapshot.gate_present, directive) {
        (true, Directive::Revoke) => {
            let mut effects = vec![GateEffect::RemoveLabel];
            if opts.store_tree_hash {
                effects.push(GateEffect::PruneLedger);
            }
            effects
        }
        (false, Directive::Grant) if snapshot.is_satisfied(owners.needs_lgtm) => {
            // Records from an earlier grant must not vouch for this one
            let mut effects = Vec::new();
            if opts.store_tree_hash {
                effects.push(GateEffect::PruneLedger);
            }
            effects.push(GateEffect::AddLabel);
            if opts.store_tree_hash {
                effects.push(GateEffect::RecordTreeHash);
            }
            effects.push(GateEffect::PruneRemovalNotice);
            effects
        }
        (false, Directive::Grant) => vec![GateEffect::Reply(format!(
            "adding '{gate}' to this PR must have {} LGTMs",
            owners.needs_lgtm
        ))],
        // already in the requested state
        (true, Directive::Grant) | (false, Directive::Revoke) => Vec::new(),
    }
}

/// Decide what a push to the PR leads to
///
/// With tracking on, the label survives only if a ledger record exists and
/// matches the new head's tree hash. Removing the label also drops the
/// records so that a later grant starts from a clean ledger.
pub fn decide_on_push(
    gate_present: bool,
    store_tree_hash: bool,
    recorded_tree_hash: Option<&str>,
    current_tree_hash: Option<&str>,
) -> Vec<GateEffect> {
    if !gate_present {
        return Vec::new();
    }

    let unchanged = store_tree_hash
        && matches!((recorded_tree_hash, current_tree_hash), (Some(r), Some(c)) if r == c);
    if unchanged {
        return Vec::new();
    }

    let mut effects = vec![GateEffect::RemoveLabel];
    if store_tree_hash {
        effects.push(GateEffect::PruneLedger);
    }
    effects.push(GateEffect::PostRemovalNotice);
    effects
}
