//! Normalized review context

use std::fmt;

/// Repository coordinates
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepoRef {
    pub owner: String,
    pub name: String,
}

impl RepoRef {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for RepoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Everything the gate needs to know about one comment or review.
/// Built fresh per event, never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewContext {
    /// Who wrote the comment
    pub actor: String,
    /// Who opened the pull request
    pub pr_author: String,
    /// Comment or review body
    pub body: String,
    /// Link to the comment or review
    pub html_url: String,
    pub repo: RepoRef,
    pub number: u64,
}

impl ReviewContext {
    pub fn is_author(&self) -> bool {
        self.actor == self.pr_author
    }
}
