//! Interactive pick-and-open.

use anyhow::{Result, bail};
use colored::Colorize;
use is_terminal::IsTerminal;
use sfref_core::{Coordinator, RetrievalRequest, RunOutcome, UrlOpener};

use crate::output::progress;
use crate::utils::browser::{BrowserOpener, PrintOpener};
use crate::utils::picker::InquirePicker;

pub async fn execute(
    coordinator: &Coordinator,
    target: &str,
    print: bool,
    refresh: bool,
    quiet: bool,
) -> Result<()> {
    let target = coordinator.registry().resolve_target(target)?;

    if !std::io::stdin().is_terminal() {
        bail!("`sfref open` needs an interactive terminal; use `sfref list` and `sfref url` instead");
    }

    let spinner = progress::spinner(
        &format!("Fetching {}...", super::describe(coordinator, &target)),
        quiet,
    );
    let picker = InquirePicker::new().with_spinner(spinner.clone());
    let opener: &dyn UrlOpener = if print { &PrintOpener } else { &BrowserOpener };

    let request = RetrievalRequest::open(target).with_force_refresh(refresh);
    let outcome = coordinator.run(request, &picker, opener).await;
    spinner.finish_and_clear();

    match outcome? {
        RunOutcome::Opened { url } => {
            if !print && !quiet {
                eprintln!("{} {url}", "Opening".green());
            }
        },
        RunOutcome::NothingToShow => {
            eprintln!(
                "{}",
                "No documentation entries available; check the warnings above.".yellow()
            );
        },
        RunOutcome::Cancelled | RunOutcome::Cached(_) => {},
    }
    Ok(())
}
