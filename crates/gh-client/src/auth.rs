//! Token resolution and client construction
//!
//! The bot authenticates with a token taken from the environment. Enterprise
//! hosts get their own variable so one deployment can serve several hosts.

use crate::{OctocrabClient, DEFAULT_HOST};
use anyhow::{Context, Result};
use log::debug;
use octocrab::Octocrab;
use std::sync::Arc;

/// Resolves GitHub tokens for different hosts
///
/// Tries multiple sources in order:
/// 1. Host-specific env var (e.g., `GITHUB_TOKEN_GHE_EXAMPLE_COM`)
/// 2. Generic `GITHUB_TOKEN` or `GH_TOKEN` (github.com only)
#[derive(Debug, Clone)]
pub struct TokenResolver {
    /// Cached default token from GITHUB_TOKEN/GH_TOKEN
    default_token: Option<String>,
}

impl Default for TokenResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenResolver {
    /// Create a new token resolver from the process environment
    pub fn new() -> Self {
        let default_token = std::env::var("GITHUB_TOKEN")
            .or_else(|_| std::env::var("GH_TOKEN"))
            .ok();

        Self { default_token }
    }

    /// Create a resolver with an explicit default token
    pub fn with_default_token(token: impl Into<String>) -> Self {
        Self {
            default_token: Some(token.into()),
        }
    }

    /// Name of the host-specific token variable
    pub fn env_key(host: &str) -> String {
        format!(
            "GITHUB_TOKEN_{}",
            host.replace(['.', '-'], "_").to_uppercase()
        )
    }

    /// Get a token for the given host (None = github.com)
    pub fn get_token(&self, host: Option<&str>) -> Result<String> {
        let host = host.unwrap_or(DEFAULT_HOST);

        let env_key = Self::env_key(host);
        if let Ok(token) = std::env::var(&env_key) {
            debug!("Using token from env var {} for host {}", env_key, host);
            return Ok(token);
        }

        // Fallback to default token (for github.com only)
        if host == DEFAULT_HOST {
            if let Some(ref token) = self.default_token {
                debug!("Using default token (GITHUB_TOKEN/GH_TOKEN) for github.com");
                return Ok(token.clone());
            }
        }

        Err(anyhow::anyhow!(
            "No token found for host '{}'. Set {}{}",
            host,
            env_key,
            if host == DEFAULT_HOST {
                " or GITHUB_TOKEN"
            } else {
                ""
            }
        ))
    }
}

/// API base URI for a host; github.com uses octocrab's default
fn api_base_uri(host: &str) -> Option<String> {
    if host == DEFAULT_HOST {
        None
    } else {
        Some(format!("https://{}/api/v3", host))
    }
}

/// Build an authenticated client for the given host (None = github.com)
pub fn connect(host: Option<&str>, tokens: &TokenResolver) -> Result<OctocrabClient> {
    let token = tokens.get_token(host)?;
    let host = host.unwrap_or(DEFAULT_HOST);

    let mut builder = Octocrab::builder().personal_token(token);
    if let Some(base_uri) = api_base_uri(host) {
        debug!("Using API base URI {} for host {}", base_uri, host);
        builder = builder
            .base_uri(base_uri)
            .context("Invalid GitHub API base URI")?;
    }

    let octocrab = builder
        .build()
        .with_context(|| format!("Failed to build GitHub client for {host}"))?;

    Ok(OctocrabClient::new(Arc::new(octocrab)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_key() {
        assert_eq!(
            TokenResolver::env_key("ghe.example-corp.com"),
            "GITHUB_TOKEN_GHE_EXAMPLE_CORP_COM"
        );
    }

    #[test]
    fn test_default_token_only_for_github_com() {
        let resolver = TokenResolver::with_default_token("secret");
        assert_eq!(resolver.get_token(None).unwrap(), "secret");

        let err = resolver
            .get_token(Some("ghe.nowhere.invalid"))
            .unwrap_err()
            .to_string();
        assert!(err.contains("GITHUB_TOKEN_GHE_NOWHERE_INVALID"));
    }

    #[test]
    fn test_api_base_uri() {
        assert_eq!(api_base_uri("github.com"), None);
        assert_eq!(
            api_base_uri("ghe.example.com").as_deref(),
            Some("https://ghe.example.com/api/v3")
        );
    }
}
