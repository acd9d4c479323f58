//! Table-of-contents scraping from rendered documentation pages.
//!
//! Current documentation pages no longer ship a separate index file, so the
//! navigation tree is pulled out of the page itself. The container is found
//! by conventional markup (`#toc`, `.toc`, a navigation landmark, or a
//! `data-toc` attribute); every link inside it becomes an entry.

use super::{RetrievalStrategy, is_navigable_href, normalize_whitespace};
use crate::{Error, RawLink, Result};
use scraper::{Html, Selector};
use std::sync::LazyLock;
use tracing::{instrument, trace};

/// Selector for the table-of-contents container. The first match in
/// document order is used.
///
/// SAFETY: Pattern is a compile-time constant that is known to be valid.
#[allow(clippy::unwrap_used)]
static TOC_CONTAINER: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("#toc, .toc, nav[role='navigation'], [data-toc]").unwrap()
});

/// SAFETY: Pattern is a compile-time constant that is known to be valid.
#[allow(clippy::unwrap_used)]
static ANCHOR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a").unwrap());

/// Scrapes HTML pages.
#[derive(Debug, Default, Clone, Copy)]
pub struct ScrapeStrategy;

impl RetrievalStrategy for ScrapeStrategy {
    fn name(&self) -> &'static str {
        "scrape"
    }

    #[instrument(skip_all, fields(html_len = content.len()))]
    fn parse(&self, content: &str) -> Result<Vec<RawLink>> {
        let document = Html::parse_document(content);
        let container = document
            .select(&TOC_CONTAINER)
            .next()
            .ok_or_else(|| Error::Parse("page has no table of contents".to_string()))?;

        let mut links = Vec::new();
        for anchor in container.select(&ANCHOR) {
            let Some(href) = anchor.value().attr("href").map(str::trim) else {
                continue;
            };
            if !is_navigable_href(href) {
                continue;
            }
            let title = normalize_whitespace(&anchor.text().collect::<String>());
            if title.is_empty() {
                continue;
            }
            trace!(%title, %href, "toc link");
            links.push(RawLink::new(title, href));
        }

        if links.is_empty() {
            return Err(Error::Parse(
                "table of contents contains no links".to_string(),
            ));
        }
        Ok(links)
    }
}
