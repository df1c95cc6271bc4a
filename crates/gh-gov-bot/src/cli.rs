//! Command-line arguments

use clap::Parser;
use gh_gov_config::Configuration;
use std::io::Read;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "gh-gov-bot",
    version = env!("CARGO_PKG_VERSION"),
    about = "Evaluate one GitHub webhook event against the merge gate"
)]
pub(crate) struct Cli {
    /// Event name as sent in the X-GitHub-Event header
    #[arg(long, env = "GITHUB_EVENT_NAME")]
    pub event: String,

    /// Path to the JSON payload, or '-' for stdin
    #[arg(long, env = "GITHUB_EVENT_PATH")]
    pub payload: String,

    /// Configuration file (default: .gh-gov-bot.toml in CWD, then HOME)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// GitHub host, for GitHub Enterprise
    #[arg(long)]
    pub host: Option<String>,

    /// Login the bot posts as; required with installation tokens
    #[arg(long, env = "GH_GOV_BOT_LOGIN")]
    pub bot_login: Option<String>,
}

impl Cli {
    /// Bot login from the command line, else from the configuration file
    pub fn resolve_bot_login(&self, config: &Configuration) -> Option<String> {
        self.bot_login
            .clone()
            .or_else(|| config.bot_login.clone())
            .filter(|login| !login.is_empty())
    }

    /// Read the payload from the given file or from stdin
    pub fn read_payload(&self) -> anyhow::Result<Vec<u8>> {
        read_payload(&self.payload)
    }
}

fn read_payload(source: &str) -> anyhow::Result<Vec<u8>> {
    use anyhow::Context;

    if source == "-" {
        let mut buf = Vec::new();
        std::io::stdin()
            .read_to_end(&mut buf)
            .context("Failed to read payload from stdin")?;
        return Ok(buf);
    }

    std::fs::read(source).with_context(|| format!("Failed to read payload from {source}"))
}
