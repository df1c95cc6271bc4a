//! gh-gov-bot: apply the merge gate to one delivered GitHub event
//!
//! Intended to run from a webhook relay or a workflow step:
//!
//! ```text
//! gh-gov-bot --event issue_comment --payload event.json
//! ```

mod cli;

use anyhow::Context;
use clap::Parser;
use cli::Cli;
use gh_client::TokenResolver;
use gh_gov_config::Configuration;
use gh_merge_gate::{GovernanceEvent, MergeGate, Outcome};
use gh_owners_client::HttpOwnersLoader;
use std::process::ExitCode;
use std::sync::Arc;

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env file if GITHUB_TOKEN not set
    let dotenv = std::env::var("GITHUB_TOKEN")
        .is_err()
        .then(dotenvy::dotenv);

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match dotenv {
        Some(Ok(path)) => log::debug!("Loaded .env file from: {:?}", path),
        Some(Err(_)) => log::debug!(".env file not found, will rely on environment variables"),
        None => {}
    }

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config =
        Configuration::load(cli.config.as_deref()).context("Failed to load configuration")?;

    let payload = cli.read_payload()?;
    let Some(event) = GovernanceEvent::from_payload(&cli.event, &payload)? else {
        log::info!("Ignoring unsupported event '{}'", cli.event);
        return Ok(());
    };

    let mut client = gh_client::connect(cli.host.as_deref(), &TokenResolver::new())?;
    if let Some(login) = cli.resolve_bot_login(&config) {
        log::debug!("Acting as bot '{}'", login);
        client = client.with_bot_login(login);
    }
    let owners = HttpOwnersLoader::new()?;
    let gate = MergeGate::new(Arc::new(client), Arc::new(owners));

    match gate.handle_event(event, &config).await? {
        Outcome::Ignored => log::info!("Event '{}' ignored", cli.event),
        Outcome::Evaluated(effects) if effects.is_empty() => {
            log::info!("Event '{}' evaluated, nothing to do", cli.event)
        }
        Outcome::Evaluated(effects) => {
            log::info!("Event '{}' evaluated, applied {:?}", cli.event, effects)
        }
    }

    Ok(())
}
