use crate::cache::ReferenceCache;
use crate::fetcher::ContentSource;
use crate::{DocType, ReferenceEntry};
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Result of one retrieval job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum JobOutcome {
    /// Entries were installed in the cache.
    Populated {
        /// Number of entries installed.
        entries: usize,
    },
    /// Fetching or parsing failed; the doc-type stays out of the cache.
    Failed {
        /// Rendered error message.
        error: String,
        /// Whether running the request again might succeed.
        retryable: bool,
    },
}

impl JobOutcome {
    /// Whether the job populated the cache.
    pub const fn is_populated(&self) -> bool {
        matches!(self, Self::Populated { .. })
    }
}

/// One pending fetch for one doc-type, bound to the shared cache.
pub struct RetrievalJob {
    doc_type: DocType,
    source: Arc<dyn ContentSource>,
    cache: Arc<ReferenceCache>,
}

impl RetrievalJob {
    pub(crate) fn new(
        doc_type: DocType,
        source: Arc<dyn ContentSource>,
        cache: Arc<ReferenceCache>,
    ) -> Self {
        Self {
            doc_type,
            source,
            cache,
        }
    }

    /// The doc-type this job retrieves.
    pub const fn doc_type(&self) -> &DocType {
        &self.doc_type
    }

    /// Fetch, parse, and install. Errors stop here: they are logged and
    /// returned as [`JobOutcome::Failed`], never propagated.
    #[instrument(skip(self), fields(doc_type = %self.doc_type.name, strategy = %self.doc_type.strategy))]
    pub async fn run(self) -> JobOutcome {
        let Self {
            doc_type,
            source,
            cache,
        } = self;

        match doc_type
            .strategy
            .fetch_and_parse(source.as_ref(), &doc_type.source_url)
            .await
        {
            Ok(links) => {
                let entries: Vec<ReferenceEntry> = links
                    .into_iter()
                    .map(|link| ReferenceEntry::from_raw(&doc_type.name, link))
                    .collect();
                let count = entries.len();
                cache.replace(&doc_type.name, entries).await;
                info!(entries = count, "{} reference index cached", doc_type.label);
                JobOutcome::Populated { entries: count }
            },
            Err(err) => {
                warn!(
                    error = %err,
                    category = err.category(),
                    url = %doc_type.source_url,
                    "failed to retrieve {} reference index",
                    doc_type.label
                );
                JobOutcome::Failed {
                    error: err.to_string(),
                    retryable: err.is_recoverable(),
                }
            },
        }
    }
}
