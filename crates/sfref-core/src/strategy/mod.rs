//! Fetch+parse strategies that turn a doc-type's source document into an
//! ordered list of links.
//!
//! Doc-type sources differ in delivery format. Each format has one
//! [`RetrievalStrategy`] implementation; a [`DocType`](crate::DocType) only
//! records which one it uses through [`StrategyKind`], so the coordinator
//! never needs to know about formats.
//!
//! ```rust
//! use sfref_core::StrategyKind;
//!
//! let html = r#"<ul id="toc"><li><a href="apex_dev_guide.htm">Apex Developer Guide</a></li></ul>"#;
//! let links = StrategyKind::Scrape.parse(html)?;
//! assert_eq!(links[0].title, "Apex Developer Guide");
//! assert_eq!(links[0].href, "apex_dev_guide.htm");
//! # Ok::<(), sfref_core::Error>(())
//! ```

mod index_file;
mod scrape;

pub use index_file::IndexFileStrategy;
pub use scrape::ScrapeStrategy;

use crate::fetcher::ContentSource;
use crate::{RawLink, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// A parser for one source format.
pub trait RetrievalStrategy: Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &'static str;

    /// Extract links from the downloaded document, preserving document order.
    ///
    /// Returns [`Error::Parse`](crate::Error::Parse) when the document has no
    /// recognizable table of contents or it yields no links.
    fn parse(&self, content: &str) -> Result<Vec<RawLink>>;
}

/// Which strategy a doc-type uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StrategyKind {
    /// Structured XML table-of-contents file.
    IndexFile,
    /// Table of contents scraped out of an HTML page.
    Scrape,
}

static INDEX_FILE: IndexFileStrategy = IndexFileStrategy;
static SCRAPE: ScrapeStrategy = ScrapeStrategy;

impl StrategyKind {
    /// The implementation behind this tag.
    pub fn strategy(self) -> &'static dyn RetrievalStrategy {
        match self {
            Self::IndexFile => &INDEX_FILE,
            Self::Scrape => &SCRAPE,
        }
    }

    /// Parse already-downloaded content.
    pub fn parse(self, content: &str) -> Result<Vec<RawLink>> {
        self.strategy().parse(content)
    }

    /// Download `url` through `source` and parse the result.
    pub async fn fetch_and_parse(
        self,
        source: &dyn ContentSource,
        url: &str,
    ) -> Result<Vec<RawLink>> {
        let content = source.fetch_text(url).await?;
        let links = self.parse(&content)?;
        debug!(strategy = self.strategy().name(), %url, links = links.len(), "parsed source");
        Ok(links)
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.strategy().name())
    }
}

/// Collapse runs of whitespace into single spaces and trim the ends.
pub(crate) fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Whether an href points somewhere other than the current page.
pub(crate) fn is_navigable_href(href: &str) -> bool {
    let href = href.trim();
    let script = href
        .get(..11)
        .is_some_and(|scheme| scheme.eq_ignore_ascii_case("javascript:"));
    !href.is_empty() && !href.starts_with('#') && !script
}
