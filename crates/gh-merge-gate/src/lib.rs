//! Merge gate for pull requests
//!
//! Maintains the `status/can-merge` label. Approvers grant it with `/merge`
//! once the PR carries the required number of LGTMs; approvers or the PR
//! author revoke it with `/merge cancel`; a push of new content removes it
//! unless the git tree of the new head is identical to the one recorded when
//! the label was granted.
//!
//! All state lives on the PR itself (labels and bot comments), so every
//! evaluation starts from a fresh read.
//!
//! ```text
//! webhook payload ──► GovernanceEvent ──► Trigger
//!                                           │
//!                  owners + labels + ledger ▼
//!                                     engine::decide ──► Vec<GateEffect>
//!                                                              │
//!                                       MergeGate::apply ◄─────┘
//! ```

pub mod context;
pub mod directive;
pub mod engine;
pub mod event;
pub mod gate;
pub mod labels;
pub mod ledger;
pub mod response;

pub use context::{RepoRef, ReviewContext};
pub use directive::Directive;
pub use engine::{decide, decide_on_push, is_removal_notice, removal_notice, GateEffect};
pub use event::{GovernanceEvent, Trigger};
pub use gate::{MergeGate, Outcome};
pub use labels::LabelSnapshot;
pub use ledger::TreeHashRecord;
pub use response::format_response;
