//! Startup refresh on demand.

use anyhow::Result;
use serde::Serialize;
use sfref_core::{CachedDocType, Coordinator, RetrievalReport, RetrievalRequest};

use crate::cli::OutputFormat;
use crate::output::{self, progress};

/// JSON shape of `sfref warm`: the retrieval report plus the cache contents.
#[derive(Serialize)]
struct WarmOutput {
    #[serde(flatten)]
    report: RetrievalReport,
    cached: Vec<CachedDocType>,
}

pub async fn execute(coordinator: &Coordinator, format: OutputFormat, quiet: bool) -> Result<()> {
    let spinner = progress::spinner(
        "Refreshing documentation indexes...",
        quiet || format == OutputFormat::Json,
    );
    let report = coordinator.retrieve(&RetrievalRequest::startup()).await;
    spinner.finish_and_clear();
    let report = report?;
    let cached = coordinator.cache().populated().await;

    match format {
        OutputFormat::Json => output::print_json(&WarmOutput { report, cached })?,
        OutputFormat::Text => {
            output::print_report(&report);
            output::print_cached(&cached);
        },
    }
    Ok(())
}
