//! Configuration for the governance bot
//!
//! This crate provides:
//! - Configuration file discovery (TOML)
//! - The per org/repo merge-gate settings (`MergeGateConfig`)
//! - The validated configuration snapshot (`Configuration`) with
//!   exact-repo-then-org lookup

pub mod configuration;
pub mod error;
pub mod merge_gate;

pub use configuration::{Configuration, CONFIG_FILE_NAME};
pub use error::ConfigError;
pub use merge_gate::{MergeGateConfig, DEFAULT_APPROVAL_LABEL_PREFIX, DEFAULT_GATE_LABEL};
