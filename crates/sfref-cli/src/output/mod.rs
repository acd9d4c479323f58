//! # Output Formatting
//!
//! Text output is colored and aligned for people; JSON output is a single
//! document on stdout for scripts. Diagnostics always go to stderr.

pub mod progress;

use anyhow::Result;
use colored::Colorize;
use serde::Serialize;
use sfref_core::{CachedDocType, JobOutcome, RetrievalReport};

/// Print `value` as pretty JSON on stdout.
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Print a one-line-per-doc-type summary of a retrieval to stdout.
pub fn print_report(report: &RetrievalReport) {
    if report.is_noop() {
        println!("{}", "Nothing to fetch; the cache is up to date.".dimmed());
        return;
    }
    for outcome in &report.outcomes {
        match &outcome.outcome {
            JobOutcome::Populated { entries } => println!(
                "{} {} {}",
                "✓".green(),
                outcome.doc_type.bold(),
                format!("({entries} entries)").dimmed()
            ),
            JobOutcome::Failed { error, retryable } => {
                let hint = if *retryable {
                    "(temporary; try again later)"
                } else {
                    ""
                };
                println!(
                    "{} {} {} {}",
                    "✗".red(),
                    outcome.doc_type.bold(),
                    error.red(),
                    hint.dimmed()
                );
            },
        }
    }
}

/// Print what the cache holds after a retrieval, one line per doc-type.
pub fn print_cached(cached: &[CachedDocType]) {
    if cached.is_empty() {
        println!("{}", "Cache is empty.".dimmed());
        return;
    }
    println!("{}", "Cached:".bold());
    for doc in cached {
        println!(
            "  {:<16} {:>5} entries  {}",
            doc.name,
            doc.entries,
            format!("fetched {}", doc.fetched_at.format("%Y-%m-%d %H:%M:%S UTC")).dimmed()
        );
    }
}

/// Width needed to right-align indexes up to `len - 1`.
pub fn index_width(len: usize) -> usize {
    len.saturating_sub(1).to_string().len()
}
