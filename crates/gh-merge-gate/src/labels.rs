//! Derives the gate state from a PR's live label list

use gh_client::Label;
use log::warn;

/// What the labels say about a pull request
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LabelSnapshot {
    /// The gate label is attached
    pub gate_present: bool,
    /// LGTM count carried by the approval-count label (0 if none)
    pub satisfied_count: u32,
}

impl LabelSnapshot {
    /// Scan labels in the order GitHub returned them
    ///
    /// Every label containing `approval_prefix` is parsed and the last one wins.
    /// The count is what remains after trimming the prefix's characters off both
    /// ends of the name, so `status/LGT2` with prefix `status/LGT` yields 2. An
    /// unparsable remainder counts as 0.
    pub fn from_labels(labels: &[Label], gate_label: &str, approval_prefix: &str) -> Self {
        let mut snapshot = LabelSnapshot::default();

        for label in labels {
            if label.name == gate_label {
                snapshot.gate_present = true;
            }
            if !approval_prefix.is_empty() && label.name.contains(approval_prefix) {
                snapshot.satisfied_count = parse_count(&label.name, approval_prefix);
            }
        }

        snapshot
    }

    /// Strict equality: more LGTMs than required is not satisfied either
    pub fn is_satisfied(&self, needs_lgtm: u32) -> bool {
        self.satisfied_count == needs_lgtm
    }
}

fn parse_count(name: &str, prefix: &str) -> u32 {
    let rest = name.trim_matches(|c| prefix.contains(c));
    match rest.parse() {
        Ok(count) => count,
        Err(_) => {
            warn!("Ignoring malformed approval label '{}'", name);
            0
        }
    }
}
