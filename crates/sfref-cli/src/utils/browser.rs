//! Opening documentation pages.

use sfref_core::{Error, Result, UrlOpener};
use std::ffi::OsString;
use std::process::{Command, Stdio};
use tracing::debug;

/// Launches the user's browser: `$BROWSER` when set, otherwise the platform
/// opener.
#[derive(Debug, Default)]
pub struct BrowserOpener;

impl UrlOpener for BrowserOpener {
    fn open(&self, url: &str) -> Result<()> {
        let mut command = browser_command(url, std::env::var_os("BROWSER"));
        debug!(program = ?command.get_program(), %url, "launching browser");
        command
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| Error::Other(format!("Failed to launch browser for {url}: {e}")))?;
        Ok(())
    }
}

/// Writes the URL to stdout instead of opening it (`--print`).
#[derive(Debug, Default)]
pub struct PrintOpener;

impl UrlOpener for PrintOpener {
    fn open(&self, url: &str) -> Result<()> {
        println!("{url}");
        Ok(())
    }
}

/// Build the launch command.
///
/// `$BROWSER` follows the common convention: a `:`-separated list of
/// commands (the first is used), where `%s` marks the URL position.
fn browser_command(url: &str, browser: Option<OsString>) -> Command {
    let configured = browser
        .and_then(|value| value.into_string().ok())
        .and_then(|value| value.split(':').map(str::trim).find(|c| !c.is_empty()).map(String::from));

    if let Some(entry) = configured {
        let mut parts = entry.split_whitespace();
        // `find` above guarantees at least one part.
        let program = parts.next().unwrap_or_default();
        let mut command = Command::new(program);
        let mut placed = false;
        for arg in parts {
            if arg.contains("%s") {
                command.arg(arg.replace("%s", url));
                placed = true;
            } else {
                command.arg(arg);
            }
        }
        if !placed {
            command.arg(url);
        }
        return command;
    }

    platform_command(url)
}

#[cfg(target_os = "macos")]
fn platform_command(url: &str) -> Command {
    let mut command = Command::new("open");
    command.arg(url);
    command
}

#[cfg(windows)]
fn platform_command(url: &str) -> Command {
    let mut command = Command::new("cmd");
    // The empty string is the window title `start` expects first.
    command.args(["/C", "start", "", url]);
    command
}

#[cfg(not(any(target_os = "macos", windows)))]
fn platform_command(url: &str) -> Command {
    let mut command = Command::new("xdg-open");
    command.arg(url);
    command
}
