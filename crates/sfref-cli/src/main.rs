//! sfref CLI - Jump to Salesforce developer documentation
//!
//! This is the main entry point for the sfref command-line interface.
//! Command implementations live in separate modules.

use anyhow::{Context, Result};
use clap::Parser;
use sfref_core::{Coordinator, RetrievalRequest, Settings};
use tokio::task::JoinHandle;
use tracing::debug;

mod cli;
mod commands;
mod output;
mod utils;

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    utils::logging::initialize_logging(&cli)?;

    let settings = Settings::load(cli.config.as_deref()).context("Failed to load settings")?;
    let coordinator = commands::build_coordinator(settings)?;

    let background = start_background_refresh(&cli, &coordinator);
    let result = execute_command(cli, &coordinator).await;

    if let Some(handle) = background {
        // Jobs still in flight end with the process.
        handle.abort();
    }
    result
}

/// Kick off the startup refresh when the settings ask for it.
///
/// It shares the cache with the foreground command; `warm` and `types`
/// skip it because they either do the same work or need none.
fn start_background_refresh(cli: &Cli, coordinator: &Coordinator) -> Option<JoinHandle<()>> {
    if !coordinator.settings().refresh_cache_on_load
        || matches!(cli.command, Commands::Warm { .. } | Commands::Types { .. })
    {
        return None;
    }

    let coordinator = coordinator.clone();
    Some(tokio::spawn(async move {
        match coordinator.retrieve(&RetrievalRequest::startup()).await {
            Ok(report) => debug!(state = %report.state, "startup refresh finished"),
            Err(e) => debug!(error = %e, "startup refresh failed"),
        }
    }))
}

async fn execute_command(cli: Cli, coordinator: &Coordinator) -> Result<()> {
    let quiet = cli.quiet;
    match cli.command {
        Commands::Open {
            target,
            print,
            refresh,
        } => {
            commands::open_entry(coordinator, &target, print, refresh, quiet).await?;
        },

        Commands::List { target, format } => {
            commands::list_entries(coordinator, &target, format, quiet).await?;
        },

        Commands::Url { target, index } => {
            commands::resolve_url(coordinator, &target, index).await?;
        },

        Commands::Warm { format } => {
            commands::warm_cache(coordinator, format, quiet).await?;
        },

        Commands::Types { format } => {
            commands::show_types(coordinator, format)?;
        },
    }

    Ok(())
}
