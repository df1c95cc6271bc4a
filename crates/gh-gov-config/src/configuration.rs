//! Validated configuration snapshot
//!
//! A `Configuration` is loaded and validated once, then passed by reference
//! into every evaluation. It is never mutated after loading; reloading means
//! building a new snapshot.

use crate::error::ConfigError;
use crate::merge_gate::MergeGateConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File name looked up when no explicit path is given
pub const CONFIG_FILE_NAME: &str = ".gh-gov-bot.toml";

/// Top-level configuration file contents
#[derive(Debug, Default, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Configuration {
    /// Login the bot posts as. Needed with installation tokens, which cannot
    /// read `/user`; when unset the login is asked from GitHub.
    #[serde(default)]
    pub bot_login: Option<String>,

    /// Merge-gate settings, listed per repository or organization
    #[serde(default)]
    pub merge_gate: Vec<MergeGateConfig>,
}

impl Configuration {
    /// Parse and validate configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Configuration = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from an explicit path, or from the first existing candidate
    /// returned by [`Configuration::search_paths`]
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => Self::search_paths()
                .into_iter()
                .find(|candidate| candidate.is_file())
                .ok_or(ConfigError::NotFound(CONFIG_FILE_NAME))?,
        };

        log::debug!("Reading configuration from {}", path.display());
        let content =
            std::fs::read_to_string(&path).map_err(|source| ConfigError::Io { path, source })?;

        let config = Self::from_toml(&content)?;
        log::info!(
            "Loaded configuration with {} merge-gate entr{}",
            config.merge_gate.len(),
            if config.merge_gate.len() == 1 { "y" } else { "ies" }
        );
        Ok(config)
    }

    /// Candidate files: the working directory first, then `$HOME`
    pub fn search_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(CONFIG_FILE_NAME)];
        if let Some(home) = std::env::var_os("HOME") {
            paths.push(PathBuf::from(home).join(CONFIG_FILE_NAME));
        }
        paths
    }

    /// Validate every entry; the first invalid entry rejects the whole configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (index, entry) in self.merge_gate.iter().enumerate() {
            entry.validate(index)?;
        }
        Ok(())
    }

    /// Find the merge-gate settings for a repository
    ///
    /// An entry listing `org/repo` wins over one listing only `org`; among
    /// entries of the same kind the first one in the file wins.
    pub fn merge_gate_for(&self, org: &str, repo: &str) -> Option<&MergeGateConfig> {
        let full_name = format!("{}/{}", org, repo);
        self.merge_gate
            .iter()
            .find(|entry| entry.covers(&full_name))
            .or_else(|| self.merge_gate.iter().find(|entry| entry.covers(org)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = r#"
        [[merge_gate]]
        repos = ["pingcap"]
        pull_owners_endpoint = "https://owners.example.com/org"

        [[merge_gate]]
        repos = ["pingcap/tidb", "tikv/tikv"]
        store_tree_hash = true
        pull_owners_endpoint = "https://owners.example.com/repo"
        gate_label = "can-merge"
    "#;

    #[test]
    fn test_repo_entry_wins_over_org_entry() {
        let config = Configuration::from_toml(SAMPLE).unwrap();

        let tidb = config.merge_gate_for("pingcap", "tidb").unwrap();
        assert!(tidb.store_tree_hash);
        assert_eq!(tidb.gate_label, "can-merge");

        let docs = config.merge_gate_for("pingcap", "docs").unwrap();
        assert!(!docs.store_tree_hash);
        assert_eq!(docs.pull_owners_endpoint, "https://owners.example.com/org");

        assert!(config.merge_gate_for("tikv", "pd").is_none());
        assert!(config.merge_gate_for("rust-lang", "rust").is_none());
    }

    #[test]
    fn test_invalid_endpoint_rejects_whole_configuration() {
        let toml = r#"
            [[merge_gate]]
            repos = ["pingcap"]
            pull_owners_endpoint = "https://owners.example.com"

            [[merge_gate]]
            repos = ["tikv"]
            pull_owners_endpoint = "not a url"
        "#;
        let err = Configuration::from_toml(toml).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEndpoint { .. }));
    }

    #[test]
    fn test_missing_endpoint_is_parse_error() {
        let toml = r#"
            [[merge_gate]]
            repos = ["pingcap"]
        "#;
        assert!(matches!(
            Configuration::from_toml(toml),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_empty_configuration() {
        let config = Configuration::from_toml("").unwrap();
        assert!(config.merge_gate.is_empty());
        assert!(config.merge_gate_for("any", "repo").is_none());
    }

    #[test]
    fn test_load_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let config = Configuration::load(Some(file.path())).unwrap();
        assert_eq!(config.merge_gate.len(), 2);
    }

    #[test]
    fn test_bot_login() {
        let config = Configuration::from_toml(&format!("bot_login = \"ti-chi-bot\"\n{SAMPLE}"))
            .unwrap();
        assert_eq!(config.bot_login.as_deref(), Some("ti-chi-bot"));
        assert_eq!(Configuration::from_toml(SAMPLE).unwrap().bot_login, None);
    }

    #[test]
    fn test_search_paths_start_in_working_directory() {
        let paths = Configuration::search_paths();
        assert_eq!(paths[0], PathBuf::from(".gh-gov-bot.toml"));
        assert!(paths.iter().all(|p| p.ends_with(CONFIG_FILE_NAME)));
    }

    #[test]
    fn test_load_missing_path() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(matches!(
            Configuration::load(Some(&missing)),
            Err(ConfigError::Io { .. })
        ));
    }
}
