//! Error types and handling for sfref-core operations.
//!
//! Errors fall into two groups that the retrieval coordinator treats very
//! differently:
//!
//! - **Job-level failures** ([`Error::Network`], [`Error::Fetch`],
//!   [`Error::Timeout`], [`Error::Parse`]) happen inside a single retrieval
//!   job. They are logged and recorded in the retrieval report; the doc-type
//!   simply stays out of the cache.
//! - **Precondition failures** ([`Error::UnknownDocType`], [`Error::Index`],
//!   [`Error::Config`]) propagate to the caller and abort the command.
//!
//! ```rust
//! use sfref_core::Error;
//!
//! let err = Error::Parse("no table of contents".to_string());
//! assert!(err.is_fetch_failure());
//! assert_eq!(err.category(), "parse");
//! assert!(!err.is_recoverable());
//! ```

use thiserror::Error;

/// The main error type for sfref-core operations.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation failed (reading settings, spawning an opener).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Transport-level failure while fetching a source document.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The server answered, but not with a success status.
    #[error("Fetch failed for '{url}': HTTP {status}")]
    Fetch {
        /// URL that was requested.
        url: String,
        /// HTTP status code returned by the server.
        status: u16,
    },

    /// The request did not complete within the configured timeout.
    #[error("Timeout: {0}")]
    Timeout(String),

    /// Content was received but could not be parsed into reference entries.
    #[error("Parse error: {0}")]
    Parse(String),

    /// A doc-type name that is not part of the registry.
    ///
    /// The message carries the closest known name when one exists.
    #[error("Unknown documentation type: {name}{}", suggestion_suffix(.suggestion.as_deref()))]
    UnknownDocType {
        /// Name that was requested.
        name: String,
        /// Closest registry name, if any.
        suggestion: Option<String>,
    },

    /// A selection index does not exist in the requested view.
    #[error("Index {index} out of range for '{target}' ({len} entries)")]
    Index {
        /// Doc-type name, or `*` for the global view.
        target: String,
        /// Index that was requested.
        index: usize,
        /// Number of entries in the view at lookup time.
        len: usize,
    },

    /// Settings file is unreadable or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A base or resolved URL is malformed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Serialization or deserialization failed.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic error for uncategorized failures.
    #[error("{0}")]
    Other(String),
}

fn suggestion_suffix(suggestion: Option<&str>) -> String {
    suggestion.map_or_else(String::new, |s| format!(" (did you mean '{s}'?)"))
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Self::InvalidUrl(err.to_string())
    }
}

impl Error {
    /// Whether this error belongs to the fetch/parse family that a retrieval
    /// job contains instead of propagating.
    #[must_use]
    pub const fn is_fetch_failure(&self) -> bool {
        matches!(
            self,
            Self::Network(_) | Self::Fetch { .. } | Self::Timeout(_) | Self::Parse(_)
        )
    }

    /// Check if the error might succeed on a later attempt.
    ///
    /// Nothing in sfref retries automatically; failed jobs carry this as
    /// `retryable` so the user knows whether running again is worthwhile.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Network(e) => e.is_timeout() || e.is_connect(),
            Self::Timeout(_) => true,
            Self::Fetch { status, .. } => *status >= 500 || *status == 429,
            Self::Io(e) => matches!(
                e.kind(),
                std::io::ErrorKind::TimedOut | std::io::ErrorKind::Interrupted
            ),
            _ => false,
        }
    }

    /// Get the error category as a string identifier, for structured logs.
    #[must_use]
    pub const fn category(&self) -> &'static str {
        match self {
            Self::Io(_) => "io",
            Self::Network(_) | Self::Fetch { .. } => "network",
            Self::Timeout(_) => "timeout",
            Self::Parse(_) => "parse",
            Self::UnknownDocType { .. } => "unknown_doc_type",
            Self::Index { .. } => "index",
            Self::Config(_) => "config",
            Self::InvalidUrl(_) => "invalid_url",
            Self::Serialization(_) => "serialization",
            Self::Other(_) => "other",
        }
    }
}

/// Convenience type alias for `std::result::Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
