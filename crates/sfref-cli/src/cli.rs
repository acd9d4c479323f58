//! # CLI Structure and Argument Parsing
//!
//! `sfref` fetches the tables of contents of the Salesforce developer guides
//! and jumps straight to a page.
//!
//! ```bash
//! # Pick an Apex page and open it in the browser
//! sfref open apex
//!
//! # Search every documentation set at once
//! sfref open '*'
//!
//! # Scripting: list entries, then resolve one
//! sfref list visualforce --format json
//! sfref url visualforce 12
//! ```
//!
//! Targets are doc-type names (`apex`, `visualforce`, `service-console`) or
//! `*`/`all` for every set.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use sfref_core::config::CONFIG_ENV;

/// Main CLI structure for the `sfref` command
#[derive(Parser, Clone, Debug)]
#[command(name = "sfref")]
#[command(version)]
#[command(about = "sfref - Jump to Salesforce developer documentation", long_about = None)]
#[allow(clippy::struct_excessive_bools)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// Suppress informational messages (only show errors)
    #[arg(short = 'q', long, global = true)]
    pub quiet: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Disable all ANSI colors in output (also respects `NO_COLOR` env)
    #[arg(long = "no-color", global = true)]
    pub no_color: bool,

    /// Path to the settings file (overrides autodiscovery). Also via `SFREF_CONFIG`.
    #[arg(long, global = true, value_name = "FILE", env = CONFIG_ENV)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Clone, Debug)]
pub enum Commands {
    /// Fetch a documentation index, pick an entry, and open it
    Open {
        /// Doc-type name, or `*`/`all` for every documentation set
        target: String,

        /// Print the URL instead of launching a browser
        #[arg(long)]
        print: bool,

        /// Fetch again even if the index is already cached
        #[arg(long)]
        refresh: bool,
    },

    /// List entries with their resolved URLs
    List {
        /// Doc-type name, or `*`/`all` for every documentation set
        target: String,

        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Resolve one entry to its absolute URL
    ///
    /// A negative index means nothing was chosen and prints nothing.
    Url {
        /// Doc-type name, or `*`/`all` for every documentation set
        target: String,

        /// Position in the list shown by `sfref list`
        #[arg(allow_negative_numbers = true)]
        index: i64,
    },

    /// Run the startup refresh and report what was fetched
    Warm {
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Show the known documentation sets and their settings
    Types {
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
}

/// Output format for listing commands
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text (default)
    Text,
    /// JSON for scripts
    Json,
}

impl Cli {
    /// Output format of the selected command, if it has one.
    pub const fn format(&self) -> Option<OutputFormat> {
        match &self.command {
            Commands::List { format, .. }
            | Commands::Warm { format }
            | Commands::Types { format } => Some(*format),
            Commands::Open { .. } | Commands::Url { .. } => None,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_url_accepts_negative_index() {
        let cli = Cli::try_parse_from(["sfref", "url", "apex", "-1"]).unwrap();
        match cli.command {
            Commands::Url { target, index } => {
                assert_eq!(target, "apex");
                assert_eq!(index, -1);
            },
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_open_flags() {
        let cli = Cli::try_parse_from(["sfref", "open", "*", "--print", "--refresh"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Open {
                print: true,
                refresh: true,
                ..
            }
        ));
        assert_eq!(cli.format(), None);
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["sfref", "list", "apex", "--format", "json", "-q"]).unwrap();
        assert!(cli.quiet);
        assert_eq!(cli.format(), Some(OutputFormat::Json));
    }
}
