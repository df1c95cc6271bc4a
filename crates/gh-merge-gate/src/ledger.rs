//! Tree-hash ledger
//!
//! When the gate label is added the bot records the PR's tree hash in a
//! comment. On a later push the recorded hash is compared with the new head's
//! tree: equal trees (squash, rebase onto the same content) keep the label.
//! The record is only a cache; without one every push counts as a change.

use gh_client::IssueComment;
use regex::Regex;
use std::sync::OnceLock;

const PLACEHOLDER: &str = "{tree_hash}";

/// Ledger comment template, exactly one placeholder
pub const LEDGER_TEMPLATE: &str =
    "Can merge label has been added.  <details>Git tree hash: {tree_hash}</details>";

/// A ledger entry recovered from the PR's comments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeHashRecord {
    pub tree_hash: String,
    pub comment_id: u64,
}

fn ledger_regex() -> &'static Regex {
    static LEDGER_REGEX: OnceLock<Regex> = OnceLock::new();

    LEDGER_REGEX.get_or_init(|| {
        let (head, tail) = LEDGER_TEMPLATE
            .split_once(PLACEHOLDER)
            .unwrap_or((LEDGER_TEMPLATE, ""));
        Regex::new(&format!("{}(.*){}", regex::escape(head), regex::escape(tail))).unwrap()
    })
}

/// Render the ledger comment body for a tree hash
pub fn encode(tree_hash: &str) -> String {
    LEDGER_TEMPLATE.replace(PLACEHOLDER, tree_hash)
}

/// Extract the tree hash from a ledger comment body
///
/// The template may appear anywhere in the body but must sit on one line.
pub fn decode(body: &str) -> Option<String> {
    ledger_regex()
        .captures(body)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .filter(|hash| !hash.is_empty())
}

/// Whether a comment body is a ledger comment
pub fn is_ledger_comment(body: &str) -> bool {
    ledger_regex().is_match(body)
}

/// Most recent trustworthy ledger record
///
/// Comments are sorted newest-first by creation time (ties broken by ID)
/// rather than trusting the order GitHub returned them in. A record only
/// counts if the bot wrote it and nobody edited it afterwards.
pub fn find_latest(comments: &[IssueComment], bot_login: &str) -> Option<TreeHashRecord> {
    let mut newest_first: Vec<&IssueComment> = comments.iter().collect();
    newest_first.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));

    newest_first
        .into_iter()
        .filter(|c| c.author == bot_login && !c.is_edited())
        .find_map(|c| {
            decode(&c.body).map(|tree_hash| TreeHashRecord {
                tree_hash,
                comment_id: c.id,
            })
        })
}
