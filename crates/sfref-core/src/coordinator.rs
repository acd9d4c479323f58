//! Concurrent retrieval and presentation of documentation entries.
//!
//! A [`Coordinator`] serves one request at a time per call, but any number of
//! calls may overlap (for example a startup refresh racing a user command).
//! They share the same [`ReferenceCache`]; a doc-type fetched twice simply
//! ends with the last successful result.
//!
//! Each request moves through [`RetrievalState`]:
//!
//! ```text
//! Planning -> Dispatched -> AwaitingCompletion -> Ready | PartialFailure
//! ```
//!
//! During `Dispatched` one task is spawned per planned doc-type. A failed job
//! is recorded in the [`RetrievalReport`] and never affects its siblings.

use crate::cache::ReferenceCache;
use crate::config::Settings;
use crate::fetcher::ContentSource;
use crate::job::JobOutcome;
use crate::registry::{DocType, Registry};
use crate::{Error, ReferenceEntry, Result, Selection, Target};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Chooses one entry from a list of titles.
pub trait Picker: Send + Sync {
    /// Show `titles` under `prompt` and report the choice.
    fn pick(&self, prompt: &str, titles: &[String]) -> Result<Selection>;
}

/// Opens an absolute URL, typically in a web browser.
pub trait UrlOpener: Send + Sync {
    /// Open `url`. Failures propagate to the caller of [`Coordinator::run`].
    fn open(&self, url: &str) -> Result<()>;
}

/// A user- or startup-triggered retrieval.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetrievalRequest {
    /// Doc-type or all-documentation view to fill.
    pub target: Target,
    /// Present the results and open the chosen page afterwards.
    pub open_when_done: bool,
    /// Honour per doc-type `refreshCacheOnLoad` when planning.
    pub startup_refresh: bool,
    /// Fetch even doc-types that are already cached.
    pub force_refresh: bool,
}

impl RetrievalRequest {
    /// Fetch what is missing for `target`, then let the user pick an entry.
    pub const fn open(target: Target) -> Self {
        Self {
            target,
            open_when_done: true,
            startup_refresh: false,
            force_refresh: false,
        }
    }

    /// Fetch what is missing for `target` without presenting anything.
    pub const fn warm(target: Target) -> Self {
        Self {
            target,
            open_when_done: false,
            startup_refresh: false,
            force_refresh: false,
        }
    }

    /// The refresh performed when the program starts: every eligible
    /// doc-type, nothing presented.
    pub const fn startup() -> Self {
        Self {
            target: Target::All,
            open_when_done: false,
            startup_refresh: true,
            force_refresh: false,
        }
    }

    /// Set [`Self::force_refresh`].
    #[must_use]
    pub const fn with_force_refresh(mut self, force_refresh: bool) -> Self {
        self.force_refresh = force_refresh;
        self
    }
}

/// Lifecycle of one retrieval request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum RetrievalState {
    /// Choosing which doc-types need fetching.
    Planning,
    /// One task spawned per planned doc-type.
    Dispatched,
    /// Waiting for every task to finish.
    AwaitingCompletion,
    /// Every dispatched job populated the cache.
    Ready,
    /// At least one dispatched job failed.
    PartialFailure,
}

impl fmt::Display for RetrievalState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Planning => "planning",
            Self::Dispatched => "dispatched",
            Self::AwaitingCompletion => "awaiting-completion",
            Self::Ready => "ready",
            Self::PartialFailure => "partial-failure",
        };
        f.write_str(name)
    }
}

/// Outcome of one doc-type's job within a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocTypeOutcome {
    /// Canonical doc-type name.
    pub doc_type: String,
    /// What its job did.
    #[serde(flatten)]
    pub outcome: JobOutcome,
}

/// What a retrieval request did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RetrievalReport {
    /// Target selector as the user would type it.
    pub target: String,
    /// Terminal state of the request.
    pub state: RetrievalState,
    /// One record per dispatched job, in registry order. Doc-types that
    /// were already cached or excluded do not appear.
    pub outcomes: Vec<DocTypeOutcome>,
}

impl RetrievalReport {
    /// Names of doc-types whose job failed.
    pub fn failed(&self) -> Vec<&str> {
        self.outcomes
            .iter()
            .filter(|o| !o.outcome.is_populated())
            .map(|o| o.doc_type.as_str())
            .collect()
    }

    /// Whether nothing needed fetching.
    pub fn is_noop(&self) -> bool {
        self.outcomes.is_empty()
    }
}

/// A view of the cache ready to hand to a [`Picker`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Presentation {
    /// View the entries were taken from.
    pub target: Target,
    /// Prompt shown above the titles.
    pub prompt: String,
    /// Index-aligned with `entries`.
    pub titles: Vec<String>,
    /// Entries in presentation order.
    pub entries: Vec<ReferenceEntry>,
}

impl Presentation {
    /// Whether there is nothing to pick from.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

/// How [`Coordinator::run`] finished.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// The request did not ask for presentation; the cache is warm.
    Cached(RetrievalReport),
    /// The chosen view had no entries, so the picker was not shown.
    NothingToShow,
    /// The user dismissed the picker.
    Cancelled,
    /// The chosen page was handed to the opener.
    Opened {
        /// Absolute URL of the page.
        url: String,
    },
}

/// Plans, dispatches, and joins retrieval jobs against a shared cache.
#[derive(Clone)]
pub struct Coordinator {
    registry: Arc<Registry>,
    cache: Arc<ReferenceCache>,
    source: Arc<dyn ContentSource>,
    settings: Arc<Settings>,
}

impl Coordinator {
    /// Wire a coordinator to its registry, cache, content source and settings.
    pub fn new(
        registry: Arc<Registry>,
        cache: Arc<ReferenceCache>,
        source: Arc<dyn ContentSource>,
        settings: Arc<Settings>,
    ) -> Self {
        Self {
            registry,
            cache,
            source,
            settings,
        }
    }

    /// Registry the coordinator plans against.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Shared cache; clones of this coordinator see the same one.
    pub const fn cache(&self) -> &Arc<ReferenceCache> {
        &self.cache
    }

    /// Settings in effect.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Doc-types that `request` needs fetched, in registry order.
    ///
    /// Fails only when a single-doc-type target names an unknown doc-type.
    pub async fn plan(&self, request: &RetrievalRequest) -> Result<Vec<DocType>> {
        debug!(state = %RetrievalState::Planning, target = %request.target, "planning retrieval");

        let candidates: Vec<&DocType> = match &request.target {
            Target::All => self
                .registry
                .get_all()
                .iter()
                .filter(|doc_type| {
                    let settings = self.settings.doc_type(&doc_type.name);
                    if settings.exclude_from_all_documentation_command {
                        debug!(doc_type = %doc_type.name, "excluded from all-documentation requests");
                        return false;
                    }
                    if request.startup_refresh && !settings.refresh_cache_on_load {
                        debug!(doc_type = %doc_type.name, "refresh on load disabled");
                        return false;
                    }
                    true
                })
                .collect(),
            Target::DocType(name) => vec![self.registry.get(name)?],
        };

        let mut planned = Vec::with_capacity(candidates.len());
        for doc_type in candidates {
            if !request.force_refresh && self.cache.has(&doc_type.name).await {
                debug!(doc_type = %doc_type.name, "already cached");
                continue;
            }
            planned.push(doc_type.clone());
        }
        Ok(planned)
    }

    /// Fetch every planned doc-type in parallel and wait for all of them.
    pub async fn retrieve(&self, request: &RetrievalRequest) -> Result<RetrievalReport> {
        let planned = self.plan(request).await?;

        let mut names = Vec::with_capacity(planned.len());
        let mut handles = Vec::with_capacity(planned.len());
        for doc_type in &planned {
            let job = doc_type.job(Arc::clone(&self.source), Arc::clone(&self.cache));
            names.push(doc_type.name.clone());
            handles.push(tokio::spawn(job.run()));
        }
        debug!(state = %RetrievalState::Dispatched, jobs = handles.len(), "jobs dispatched");

        debug!(state = %RetrievalState::AwaitingCompletion, "waiting for jobs");
        let results = futures::future::join_all(handles).await;

        let outcomes: Vec<DocTypeOutcome> = names
            .into_iter()
            .zip(results)
            .map(|(doc_type, joined)| {
                let outcome = joined.unwrap_or_else(|e| {
                    warn!(doc_type = %doc_type, error = %e, "retrieval task aborted");
                    JobOutcome::Failed {
                        error: format!("retrieval task aborted: {e}"),
                        retryable: false,
                    }
                });
                DocTypeOutcome { doc_type, outcome }
            })
            .collect();

        let state = if outcomes.iter().all(|o| o.outcome.is_populated()) {
            RetrievalState::Ready
        } else {
            RetrievalState::PartialFailure
        };
        info!(
            %state,
            target = %request.target,
            fetched = outcomes.len(),
            "retrieval finished"
        );

        Ok(RetrievalReport {
            target: request.target.to_string(),
            state,
            outcomes,
        })
    }

    /// Titles and entries for `target` as currently cached.
    ///
    /// Doc-types that are not cached contribute nothing.
    pub async fn present(&self, target: &Target) -> Result<Presentation> {
        let (target, prompt) = match target {
            Target::All => (Target::All, "All Documentation".to_string()),
            Target::DocType(name) => {
                let doc_type = self.registry.get(name)?;
                (
                    Target::doc_type(doc_type.name.clone()),
                    format!("{} Documentation", doc_type.label),
                )
            },
        };
        let (titles, entries) = self.cache.snapshot(&target).await;
        Ok(Presentation {
            target,
            prompt,
            titles,
            entries,
        })
    }

    /// Absolute URL for a selection made against `target`'s view.
    ///
    /// `Selection::Cancelled` resolves to `None`.
    pub async fn resolve(&self, target: &Target, selection: Selection) -> Result<Option<String>> {
        let Selection::Index(index) = selection else {
            return Ok(None);
        };
        let target = match target {
            Target::All => Target::All,
            Target::DocType(name) => Target::doc_type(self.registry.get(name)?.name.clone()),
        };
        let entry = self.cache.entry_at(&target, index).await?;
        self.absolute_url(&entry).map(Some)
    }

    /// Full request flow: retrieve, then optionally pick and open.
    pub async fn run(
        &self,
        request: RetrievalRequest,
        picker: &dyn Picker,
        opener: &dyn UrlOpener,
    ) -> Result<RunOutcome> {
        let report = self.retrieve(&request).await?;
        if !request.open_when_done {
            return Ok(RunOutcome::Cached(report));
        }

        let presentation = self.present(&request.target).await?;
        if presentation.is_empty() {
            info!(target = %presentation.target, "nothing cached to show");
            return Ok(RunOutcome::NothingToShow);
        }

        // Resolve against the snapshot that was shown, not the live cache,
        // which a concurrent refresh may have replaced.
        let index = match picker.pick(&presentation.prompt, &presentation.titles)? {
            Selection::Cancelled => return Ok(RunOutcome::Cancelled),
            Selection::Index(index) => index,
        };
        let entry = presentation.entries.get(index).ok_or_else(|| Error::Index {
            target: presentation.target.to_string(),
            index,
            len: presentation.len(),
        })?;

        let url = self.absolute_url(entry)?;
        debug!(%url, "opening");
        opener.open(&url)?;
        Ok(RunOutcome::Opened { url })
    }

    fn absolute_url(&self, entry: &ReferenceEntry) -> Result<String> {
        self.registry.get(&entry.doc_type)?.resolve_url(&entry.url)
    }
}
