//! Command implementations for the sfref CLI.

mod list;
mod open;
mod types;
mod url;
mod warm;

pub use list::execute as list_entries;
pub use open::execute as open_entry;
pub use types::execute as show_types;
pub use url::execute as resolve_url;
pub use warm::execute as warm_cache;

use anyhow::{Context, Result};
use sfref_core::{Coordinator, Fetcher, ReferenceCache, Registry, Settings, Target};
use std::sync::Arc;

/// Wire the registry, cache, and fetcher for one process run.
pub fn build_coordinator(settings: Settings) -> Result<Coordinator> {
    let registry = Registry::with_settings(&settings);
    let cache = ReferenceCache::with_order(registry.names());
    let fetcher =
        Fetcher::with_timeout(settings.fetch_timeout()).context("Failed to create HTTP client")?;
    Ok(Coordinator::new(
        Arc::new(registry),
        Arc::new(cache),
        Arc::new(fetcher),
        Arc::new(settings),
    ))
}

/// Human label for a target, used in progress messages.
fn describe(coordinator: &Coordinator, target: &Target) -> String {
    match target {
        Target::All => "all documentation".to_string(),
        Target::DocType(name) => coordinator
            .registry()
            .get(name)
            .map_or_else(|_| name.clone(), |d| format!("{} documentation", d.label)),
    }
}
