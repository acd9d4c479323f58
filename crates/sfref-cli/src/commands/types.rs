//! Show the registry.

use anyhow::Result;
use colored::Colorize;
use serde::Serialize;
use sfref_core::{Coordinator, StrategyKind};

use crate::cli::OutputFormat;
use crate::output;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TypeRow<'a> {
    name: &'a str,
    label: &'a str,
    strategy: StrategyKind,
    source_url: &'a str,
    base_url: &'a str,
    exclude_from_all_documentation_command: bool,
    refresh_cache_on_load: bool,
}

pub fn execute(coordinator: &Coordinator, format: OutputFormat) -> Result<()> {
    let settings = coordinator.settings();
    let rows: Vec<TypeRow<'_>> = coordinator
        .registry()
        .get_all()
        .iter()
        .map(|doc_type| {
            let overrides = settings.doc_type(&doc_type.name);
            TypeRow {
                name: &doc_type.name,
                label: &doc_type.label,
                strategy: doc_type.strategy,
                source_url: &doc_type.source_url,
                base_url: &doc_type.base_url,
                exclude_from_all_documentation_command: overrides
                    .exclude_from_all_documentation_command,
                refresh_cache_on_load: overrides.refresh_cache_on_load,
            }
        })
        .collect();

    match format {
        OutputFormat::Json => output::print_json(&rows)?,
        OutputFormat::Text => {
            for row in &rows {
                let mut flags = Vec::new();
                if row.exclude_from_all_documentation_command {
                    flags.push("excluded from *");
                }
                if !row.refresh_cache_on_load {
                    flags.push("no refresh on load");
                }
                let flags = if flags.is_empty() {
                    String::new()
                } else {
                    format!(" [{}]", flags.join(", ")).yellow().to_string()
                };
                println!("{} ({}, {}){flags}", row.name.bold(), row.label, row.strategy);
                println!("  {}", row.source_url.dimmed());
            }
        },
    }
    Ok(())
}
