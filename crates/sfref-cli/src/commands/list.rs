//! Non-interactive listing of cached entries.

use anyhow::Result;
use colored::Colorize;
use serde::Serialize;
use sfref_core::{Coordinator, RetrievalRequest, Target};

use crate::cli::OutputFormat;
use crate::output::{self, progress};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ListRow {
    index: usize,
    doc_type: String,
    title: String,
    url: String,
}

pub async fn execute(
    coordinator: &Coordinator,
    target: &str,
    format: OutputFormat,
    quiet: bool,
) -> Result<()> {
    let target = coordinator.registry().resolve_target(target)?;

    let spinner = progress::spinner(
        &format!("Fetching {}...", super::describe(coordinator, &target)),
        quiet || format == OutputFormat::Json,
    );
    let retrieved = coordinator
        .retrieve(&RetrievalRequest::warm(target.clone()))
        .await;
    spinner.finish_and_clear();
    retrieved?;

    let presentation = coordinator.present(&target).await?;
    let rows = presentation
        .entries
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            let url = coordinator
                .registry()
                .get(&entry.doc_type)?
                .resolve_url(&entry.url)?;
            Ok(ListRow {
                index,
                doc_type: entry.doc_type.clone(),
                title: entry.title.clone(),
                url,
            })
        })
        .collect::<sfref_core::Result<Vec<_>>>()?;

    match format {
        OutputFormat::Json => output::print_json(&rows)?,
        OutputFormat::Text => print_text(&rows, &target),
    }
    Ok(())
}

fn print_text(rows: &[ListRow], target: &Target) {
    if rows.is_empty() {
        eprintln!("{}", format!("No entries available for {target}.").yellow());
        return;
    }
    let width = output::index_width(rows.len());
    for row in rows {
        let prefix = if target.is_all() {
            format!("[{}] ", row.doc_type).cyan().to_string()
        } else {
            String::new()
        };
        println!(
            "{:>width$}  {prefix}{}  {}",
            row.index,
            row.title.bold(),
            row.url.dimmed()
        );
    }
}
