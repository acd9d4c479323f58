use crate::cache::ReferenceCache;
use crate::config::Settings;
use crate::fetcher::ContentSource;
use crate::job::RetrievalJob;
use crate::{Error, Result, StrategyKind, Target};
use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;
use serde::Serialize;
use std::sync::Arc;
use url::Url;

/// A documentation category with its own source and link base.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocType {
    /// Canonical upper-case name, e.g. `APEX`.
    pub name: String,
    /// Human-readable name used in log messages.
    pub label: String,
    /// Page or index file the entries are retrieved from.
    pub source_url: String,
    /// Directory that entry URLs are relative to.
    pub base_url: String,
    /// How `source_url` is turned into entries.
    pub strategy: StrategyKind,
}

impl DocType {
    /// Describe a doc-type.
    pub fn new(
        name: &str,
        label: &str,
        source_url: &str,
        base_url: &str,
        strategy: StrategyKind,
    ) -> Self {
        Self {
            name: name.to_string(),
            label: label.to_string(),
            source_url: source_url.to_string(),
            base_url: base_url.to_string(),
            strategy,
        }
    }

    /// Bind this doc-type's strategy to a content source and the shared
    /// cache. The returned job has not started.
    pub fn job(
        &self,
        source: Arc<dyn ContentSource>,
        cache: Arc<ReferenceCache>,
    ) -> RetrievalJob {
        RetrievalJob::new(self.clone(), source, cache)
    }

    /// Join a relative entry URL onto this doc-type's base URL.
    ///
    /// The base always names a directory, with or without a trailing `/`.
    /// Absolute URLs are returned unchanged.
    pub fn resolve_url(&self, relative: &str) -> Result<String> {
        let mut base = Url::parse(&self.base_url)
            .map_err(|e| Error::InvalidUrl(format!("base URL '{}' for {}: {e}", self.base_url, self.name)))?;
        if !base.path().ends_with('/') {
            let directory = format!("{}/", base.path());
            base.set_path(&directory);
        }
        Ok(base.join(relative)?.to_string())
    }

    fn with_overrides(mut self, settings: &Settings) -> Self {
        let overrides = settings.doc_type(&self.name);
        if let Some(source_url) = overrides.source_url {
            self.source_url = source_url;
        }
        if let Some(base_url) = overrides.base_url {
            self.base_url = base_url;
        }
        self
    }
}

/// The fixed set of documentation categories, in presentation order.
#[derive(Debug, Clone)]
pub struct Registry {
    doc_types: Vec<DocType>,
}

impl Registry {
    /// The built-in Salesforce documentation sets.
    pub fn new() -> Self {
        let doc_types = vec![
            DocType::new(
                "APEX",
                "Apex",
                "https://developer.salesforce.com/docs/atlas.en-us.apexcode.meta/apexcode/apex_dev_guide.htm",
                "https://developer.salesforce.com/docs/atlas.en-us.apexcode.meta/apexcode/",
                StrategyKind::Scrape,
            ),
            DocType::new(
                "VISUALFORCE",
                "Visualforce",
                "https://developer.salesforce.com/docs/atlas.en-us.pages.meta/pages/pages_intro.htm",
                "https://developer.salesforce.com/docs/atlas.en-us.pages.meta/pages/",
                StrategyKind::Scrape,
            ),
            DocType::new(
                "SERVICECONSOLE",
                "Service Console",
                "https://developer.salesforce.com/docs/atlas.en-us.api_console.meta/api_console/toc.xml",
                "https://developer.salesforce.com/docs/atlas.en-us.api_console.meta/api_console/",
                StrategyKind::IndexFile,
            ),
        ];

        Self { doc_types }
    }

    /// A registry with a custom set of doc-types.
    pub const fn from_doc_types(doc_types: Vec<DocType>) -> Self {
        Self { doc_types }
    }

    /// The built-in set with URL overrides from settings applied.
    pub fn with_settings(settings: &Settings) -> Self {
        let doc_types = Self::new()
            .doc_types
            .into_iter()
            .map(|doc_type| doc_type.with_overrides(settings))
            .collect();
        Self { doc_types }
    }

    /// Look up a doc-type by name.
    ///
    /// Matching ignores case, `-` and `_`, so `service-console` finds
    /// `SERVICECONSOLE`.
    pub fn get(&self, name: &str) -> Result<&DocType> {
        let wanted = canonical(name);
        self.doc_types
            .iter()
            .find(|doc_type| canonical(&doc_type.name) == wanted)
            .ok_or_else(|| Error::UnknownDocType {
                name: name.to_string(),
                suggestion: self.suggest(name),
            })
    }

    /// All doc-types in registry order.
    pub fn get_all(&self) -> &[DocType] {
        &self.doc_types
    }

    /// Doc-type names in registry order.
    pub fn names(&self) -> Vec<String> {
        self.doc_types.iter().map(|d| d.name.clone()).collect()
    }

    /// Parse a user-supplied selector: `*` or `all` for every doc-type,
    /// otherwise a doc-type name.
    pub fn resolve_target(&self, selector: &str) -> Result<Target> {
        let selector = selector.trim();
        if selector == Target::ALL_SELECTOR || selector.eq_ignore_ascii_case("all") {
            return Ok(Target::All);
        }
        Ok(Target::DocType(self.get(selector)?.name.clone()))
    }

    fn suggest(&self, name: &str) -> Option<String> {
        let matcher = SkimMatcherV2::default();
        let query = canonical(name);
        if query.is_empty() {
            return None;
        }
        self.doc_types
            .iter()
            .filter_map(|doc_type| {
                let candidate = canonical(&doc_type.name);
                let by_name = matcher.fuzzy_match(&candidate, &query);
                let by_label = matcher.fuzzy_match(&canonical(&doc_type.label), &query);
                by_name.max(by_label).map(|score| (score, &doc_type.name))
            })
            .max_by_key(|(score, _)| *score)
            .map(|(_, name)| name.clone())
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

fn canonical(name: &str) -> String {
    name.chars()
        .filter(|c| !matches!(c, '-' | '_' | ' '))
        .flat_map(char::to_lowercase)
        .collect()
}
