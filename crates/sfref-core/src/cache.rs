//! In-memory reference cache shared by retrieval jobs and readers.
//!
//! The cache keeps, per doc-type, the entries in source order, plus derived
//! views: one flattened list across all doc-types and title lists that are
//! index-aligned with their entry lists. Every write goes through
//! [`ReferenceCache::replace`], which installs a doc-type's entries and
//! rebuilds every derived view while holding the write lock, so readers
//! never observe a half-updated cache.
//!
//! ```rust
//! use sfref_core::{ReferenceCache, ReferenceEntry, Target};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! # let runtime = tokio::runtime::Builder::new_current_thread().build()?;
//! # runtime.block_on(async {
//! let cache = ReferenceCache::with_order(vec!["APEX".into(), "VISUALFORCE".into()]);
//! cache
//!     .replace("APEX", vec![ReferenceEntry::new("APEX", "Trigger", "trig.htm")])
//!     .await;
//!
//! assert!(cache.has("APEX").await);
//! assert_eq!(cache.titles().await, vec!["Trigger"]);
//! let entry = cache.entry_at(&Target::All, 0).await?;
//! assert_eq!(entry.url, "trig.htm");
//! # Ok::<(), sfref_core::Error>(())
//! # })?;
//! # Ok(())
//! # }
//! ```

use crate::{CachedDocType, Error, ReferenceEntry, Result, Target};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::{debug, instrument};

#[derive(Debug, Default)]
struct CacheState {
    /// Presentation order of doc-types. Names not known up front are appended
    /// the first time they are installed.
    order: Vec<String>,
    by_doc_type: HashMap<String, DocTypeEntries>,
    all_entries: Vec<ReferenceEntry>,
    titles: Vec<String>,
}

#[derive(Debug)]
struct DocTypeEntries {
    entries: Vec<ReferenceEntry>,
    titles: Vec<String>,
    fetched_at: DateTime<Utc>,
}

impl CacheState {
    fn rebuild_global_views(&mut self) {
        let total: usize = self.by_doc_type.values().map(|d| d.entries.len()).sum();
        let mut all_entries = Vec::with_capacity(total);
        let mut titles = Vec::with_capacity(total);
        for name in &self.order {
            if let Some(doc) = self.by_doc_type.get(name) {
                all_entries.extend(doc.entries.iter().cloned());
                titles.extend(doc.titles.iter().cloned());
            }
        }
        self.all_entries = all_entries;
        self.titles = titles;
    }

    fn view(&self, target: &Target) -> (&[String], &[ReferenceEntry]) {
        match target {
            Target::All => (self.titles.as_slice(), self.all_entries.as_slice()),
            Target::DocType(name) => self
                .by_doc_type
                .get(name)
                .map_or((&[][..], &[][..]), |doc| {
                    (doc.titles.as_slice(), doc.entries.as_slice())
                }),
        }
    }
}

/// Process-lifetime store of documentation entries keyed by doc-type.
///
/// Share it between tasks with `Arc<ReferenceCache>`.
#[derive(Debug, Default)]
pub struct ReferenceCache {
    state: RwLock<CacheState>,
}

impl ReferenceCache {
    /// An empty cache whose global view follows installation order.
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty cache whose global view lists doc-types in `order`,
    /// regardless of which job finishes first.
    pub fn with_order(order: Vec<String>) -> Self {
        Self {
            state: RwLock::new(CacheState {
                order,
                ..CacheState::default()
            }),
        }
    }

    /// Whether entries for `doc_type` are populated.
    pub async fn has(&self, doc_type: &str) -> bool {
        self.state.read().await.by_doc_type.contains_key(doc_type)
    }

    /// Install the complete entry list for `doc_type`, replacing any previous
    /// content, and rebuild the derived views in the same critical section.
    ///
    /// An empty list removes the doc-type.
    #[instrument(skip(self, entries), fields(entries = entries.len()))]
    pub async fn replace(&self, doc_type: &str, entries: Vec<ReferenceEntry>) {
        let mut state = self.state.write().await;

        if entries.is_empty() {
            state.by_doc_type.remove(doc_type);
        } else {
            if !state.order.iter().any(|name| name == doc_type) {
                state.order.push(doc_type.to_string());
            }
            let titles = entries.iter().map(|entry| entry.title.clone()).collect();
            state.by_doc_type.insert(
                doc_type.to_string(),
                DocTypeEntries {
                    entries,
                    titles,
                    fetched_at: Utc::now(),
                },
            );
        }

        state.rebuild_global_views();
        debug!(total = state.all_entries.len(), "cache views rebuilt");
    }

    /// Entries for one doc-type in source order; empty when absent.
    pub async fn entries_by_doc_type(&self, doc_type: &str) -> Vec<ReferenceEntry> {
        let state = self.state.read().await;
        state.view(&Target::doc_type(doc_type)).1.to_vec()
    }

    /// Every cached entry, doc-types in presentation order.
    pub async fn all_entries(&self) -> Vec<ReferenceEntry> {
        self.state.read().await.all_entries.clone()
    }

    /// Display titles for one doc-type, aligned with
    /// [`entries_by_doc_type`](Self::entries_by_doc_type).
    pub async fn titles_by_doc_type(&self, doc_type: &str) -> Vec<String> {
        let state = self.state.read().await;
        state.view(&Target::doc_type(doc_type)).0.to_vec()
    }

    /// Display titles across all doc-types, aligned with
    /// [`all_entries`](Self::all_entries).
    pub async fn titles(&self) -> Vec<String> {
        self.state.read().await.titles.clone()
    }

    /// Entry at `index` in the view selected by `target`.
    pub async fn entry_at(&self, target: &Target, index: usize) -> Result<ReferenceEntry> {
        let state = self.state.read().await;
        let (_, entries) = state.view(target);
        entries.get(index).cloned().ok_or_else(|| Error::Index {
            target: target.to_string(),
            index,
            len: entries.len(),
        })
    }

    /// Titles and entries of one view, read under a single lock.
    pub async fn snapshot(&self, target: &Target) -> (Vec<String>, Vec<ReferenceEntry>) {
        let state = self.state.read().await;
        let (titles, entries) = state.view(target);
        (titles.to_vec(), entries.to_vec())
    }

    /// Populated doc-types in presentation order.
    pub async fn populated(&self) -> Vec<CachedDocType> {
        let state = self.state.read().await;
        state
            .order
            .iter()
            .filter_map(|name| {
                state.by_doc_type.get(name).map(|doc| CachedDocType {
                    name: name.clone(),
                    entries: doc.entries.len(),
                    fetched_at: doc.fetched_at,
                })
            })
            .collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use std::sync::Arc;

    fn entries(doc_type: &str, titles: &[&str]) -> Vec<ReferenceEntry> {
        titles
            .iter()
            .map(|title| ReferenceEntry::new(doc_type, title, &format!("{}.htm", title.to_lowercase())))
            .collect()
    }

    #[tokio::test]
    async fn test_empty_cache() {
        let cache = ReferenceCache::new();
        assert!(!cache.has("APEX").await);
        assert!(cache.all_entries().await.is_empty());
        assert!(cache.titles().await.is_empty());
        assert!(cache.entries_by_doc_type("APEX").await.is_empty());
        assert!(cache.titles_by_doc_type("APEX").await.is_empty());
        assert!(cache.populated().await.is_empty());
    }

    #[tokio::test]
    async fn test_replace_installs_and_aligns_views() {
        let cache = ReferenceCache::new();
        cache.replace("APEX", entries("APEX", &["Trigger", "SOQL"])).await;

        assert!(cache.has("APEX").await);
        assert_eq!(cache.titles_by_doc_type("APEX").await, vec!["Trigger", "SOQL"]);
        assert_eq!(cache.titles().await, vec!["Trigger", "SOQL"]);
        assert_eq!(cache.all_entries().await, cache.entries_by_doc_type("APEX").await);
    }

    #[tokio::test]
    async fn test_replace_fully_replaces_previous_content() {
        let cache = ReferenceCache::new();
        cache.replace("APEX", entries("APEX", &["Old", "Stale", "Gone"])).await;
        cache.replace("APEX", entries("APEX", &["New"])).await;

        assert_eq!(cache.titles_by_doc_type("APEX").await, vec!["New"]);
        assert_eq!(cache.titles().await, vec!["New"]);
        assert_eq!(cache.all_entries().await.len(), 1);
    }

    #[tokio::test]
    async fn test_global_view_follows_configured_order() {
        let cache = ReferenceCache::with_order(vec!["APEX".into(), "VISUALFORCE".into()]);
        // Install out of order, as parallel jobs may.
        cache.replace("VISUALFORCE", entries("VISUALFORCE", &["apex:page"])).await;
        cache.replace("APEX", entries("APEX", &["Trigger"])).await;
        cache.replace("EXTRA", entries("EXTRA", &["Unlisted"])).await;

        assert_eq!(cache.titles().await, vec!["Trigger", "apex:page", "Unlisted"]);
        let names: Vec<_> = cache.populated().await.into_iter().map(|d| d.name).collect();
        assert_eq!(names, vec!["APEX", "VISUALFORCE", "EXTRA"]);
    }

    #[tokio::test]
    async fn test_empty_replace_removes_doc_type() {
        let cache = ReferenceCache::new();
        cache.replace("APEX", entries("APEX", &["Trigger"])).await;
        cache.replace("VISUALFORCE", entries("VISUALFORCE", &["apex:page"])).await;

        cache.replace("APEX", Vec::new()).await;
        assert!(!cache.has("APEX").await);
        assert_eq!(cache.titles().await, vec!["apex:page"]);
        assert_eq!(cache.populated().await.len(), 1);
    }

    #[tokio::test]
    async fn test_entry_at_bounds() {
        let cache = ReferenceCache::new();
        cache.replace("APEX", entries("APEX", &["Trigger", "SOQL"])).await;

        let entry = cache.entry_at(&Target::doc_type("APEX"), 1).await.unwrap();
        assert_eq!(entry.title, "SOQL");
        let entry = cache.entry_at(&Target::All, 0).await.unwrap();
        assert_eq!(entry.title, "Trigger");

        match cache.entry_at(&Target::All, 2).await {
            Err(Error::Index { target, index, len }) => {
                assert_eq!((target.as_str(), index, len), ("*", 2, 2));
            },
            other => panic!("expected Index error, got {other:?}"),
        }

        match cache.entry_at(&Target::doc_type("VISUALFORCE"), 0).await {
            Err(Error::Index { target, len, .. }) => {
                assert_eq!(target, "VISUALFORCE");
                assert_eq!(len, 0);
            },
            other => panic!("expected Index error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_snapshot_matches_individual_reads() {
        let cache = ReferenceCache::new();
        cache.replace("APEX", entries("APEX", &["A", "B"])).await;
        cache.replace("VISUALFORCE", entries("VISUALFORCE", &["C"])).await;

        let (titles, all) = cache.snapshot(&Target::All).await;
        assert_eq!(titles, cache.titles().await);
        assert_eq!(all, cache.all_entries().await);

        let (titles, apex) = cache.snapshot(&Target::doc_type("APEX")).await;
        assert_eq!(titles, vec!["A", "B"]);
        assert_eq!(apex.len(), 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_writers_do_not_mix_doc_types() {
        let cache = Arc::new(ReferenceCache::new());
        let names: Vec<String> = (0..16).map(|i| format!("DOC{i}")).collect();

        let handles: Vec<_> = names
            .iter()
            .cloned()
            .map(|name| {
                let cache = Arc::clone(&cache);
                tokio::spawn(async move {
                    let titles: Vec<String> = (0..50).map(|j| format!("{name}-{j}")).collect();
                    let refs: Vec<&str> = titles.iter().map(String::as_str).collect();
                    cache.replace(&name, entries(&name, &refs)).await;
                })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(cache.populated().await.len(), names.len());
        assert_eq!(cache.all_entries().await.len(), names.len() * 50);
        for name in &names {
            let doc_entries = cache.entries_by_doc_type(name).await;
            assert_eq!(doc_entries.len(), 50);
            assert!(doc_entries.iter().all(|e| &e.doc_type == name && e.title.starts_with(name.as_str())));
        }
        let titles = cache.titles().await;
        let all = cache.all_entries().await;
        assert!(titles.iter().zip(&all).all(|(t, e)| t == &e.title));
    }

    proptest! {
        #[test]
        fn prop_titles_stay_aligned_with_entries(
            installs in prop::collection::vec(
                (0usize..4, prop::collection::vec("[A-Za-z ]{1,12}", 0..8)),
                1..20,
            )
        ) {
            let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
            runtime.block_on(async {
                let cache = ReferenceCache::with_order(vec!["D0".into(), "D1".into()]);
                for (doc, titles) in &installs {
                    let name = format!("D{doc}");
                    let refs: Vec<&str> = titles.iter().map(String::as_str).collect();
                    cache.replace(&name, entries(&name, &refs)).await;
                }

                let (titles, all) = cache.snapshot(&Target::All).await;
                prop_assert_eq!(titles.len(), all.len());
                for (title, entry) in titles.iter().zip(&all) {
                    prop_assert_eq!(title, &entry.title);
                }

                for doc in 0..4 {
                    let name = format!("D{doc}");
                    let (titles, doc_entries) = cache.snapshot(&Target::doc_type(name.clone())).await;
                    prop_assert_eq!(titles.len(), doc_entries.len());
                    prop_assert!(doc_entries.iter().all(|e| e.doc_type == name));
                    prop_assert_eq!(cache.has(&name).await, !doc_entries.is_empty());
                }
                Ok(())
            })?;
        }
    }
}
