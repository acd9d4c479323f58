use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A (title, href) pair as extracted by a retrieval strategy, before it is
/// attached to a doc-type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawLink {
    /// Link text, whitespace collapsed.
    pub title: String,
    /// Href exactly as written in the source.
    pub href: String,
}

impl RawLink {
    /// Create a link.
    pub fn new(title: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            href: href.into(),
        }
    }
}

/// One documentation page belonging to exactly one doc-type.
///
/// `url` is relative to the owning doc-type's base URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceEntry {
    /// Canonical name of the owning doc-type.
    pub doc_type: String,
    /// Title shown in the picker.
    pub title: String,
    /// Page path relative to the doc-type base URL.
    pub url: String,
}

impl ReferenceEntry {
    /// Create an entry.
    pub fn new(doc_type: &str, title: &str, url: &str) -> Self {
        Self {
            doc_type: doc_type.to_string(),
            title: title.to_string(),
            url: url.to_string(),
        }
    }

    pub(crate) fn from_raw(doc_type: &str, link: RawLink) -> Self {
        Self {
            doc_type: doc_type.to_string(),
            title: link.title,
            url: link.href,
        }
    }
}

/// Which view of the cache a request addresses.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Target {
    /// Every doc-type at once (`*`).
    All,
    /// A single doc-type, by canonical registry name.
    DocType(String),
}

impl Target {
    /// Selector string that addresses every doc-type.
    pub const ALL_SELECTOR: &'static str = "*";

    /// Target a single doc-type.
    pub fn doc_type(name: impl Into<String>) -> Self {
        Self::DocType(name.into())
    }

    /// Whether this is the all-documentation view.
    pub const fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str(Self::ALL_SELECTOR),
            Self::DocType(name) => f.write_str(name),
        }
    }
}

/// What the user picked from a presented list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// The picker was dismissed without choosing anything.
    Cancelled,
    /// Position in the presented list.
    Index(usize),
}

impl Selection {
    /// Map the picker convention where `-1` (or any negative value) means
    /// the user cancelled.
    pub fn from_signed(index: i64) -> Self {
        usize::try_from(index).map_or(Self::Cancelled, Self::Index)
    }
}

/// Summary of one populated doc-type in the cache.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CachedDocType {
    /// Canonical doc-type name.
    pub name: String,
    /// Number of cached entries.
    pub entries: usize,
    /// When the entries were installed.
    pub fetched_at: DateTime<Utc>,
}
