//! # sfref-core
//!
//! Core functionality for sfref - quick access to Salesforce developer
//! documentation.
//!
//! The crate downloads the table of contents of each documentation set
//! (Apex, Visualforce, Service Console), keeps the entries in an in-memory
//! cache for the life of the process, and resolves a chosen entry to the
//! absolute URL of its page.
//!
//! ## Architecture
//!
//! - **Registry**: the fixed set of doc-types with their source and base URLs
//! - **Strategies**: how a doc-type's source is turned into links (XML
//!   index file or scraped HTML table of contents)
//! - **Cache**: per doc-type entry lists plus index-aligned title views
//! - **Coordinator**: plans which doc-types need fetching, runs one task per
//!   doc-type in parallel, and drives picking and opening
//! - **Error Handling**: structured errors with categorization
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use sfref_core::{
//!     Coordinator, Fetcher, ReferenceCache, Registry, RetrievalRequest, Settings, Target,
//! };
//! use std::sync::Arc;
//!
//! # async fn example() -> sfref_core::Result<()> {
//! let settings = Settings::load(None)?;
//! let registry = Registry::with_settings(&settings);
//! let cache = Arc::new(ReferenceCache::with_order(registry.names()));
//! let fetcher = Fetcher::with_timeout(settings.fetch_timeout())?;
//!
//! let coordinator = Coordinator::new(
//!     Arc::new(registry),
//!     Arc::clone(&cache),
//!     Arc::new(fetcher),
//!     Arc::new(settings),
//! );
//! coordinator
//!     .retrieve(&RetrievalRequest::warm(Target::doc_type("APEX")))
//!     .await?;
//!
//! for title in cache.titles_by_doc_type("APEX").await {
//!     println!("{title}");
//! }
//! # Ok(())
//! # }
//! ```

/// Shared in-memory reference cache
pub mod cache;
/// Settings file handling
pub mod config;
/// Concurrent retrieval, presentation, and resolution
pub mod coordinator;
/// Error types and result aliases
pub mod error;
/// HTTP fetching
pub mod fetcher;
/// A single doc-type retrieval
pub mod job;
/// Built-in documentation sets
pub mod registry;
/// Fetch-and-parse strategies
pub mod strategy;
/// Core data types
pub mod types;

pub use cache::ReferenceCache;
pub use config::{DocTypeSettings, Settings};
pub use coordinator::{
    Coordinator, DocTypeOutcome, Picker, Presentation, RetrievalReport, RetrievalRequest,
    RetrievalState, RunOutcome, UrlOpener,
};
pub use error::{Error, Result};
pub use fetcher::{ContentSource, Fetcher};
pub use job::{JobOutcome, RetrievalJob};
pub use registry::{DocType, Registry};
pub use strategy::{RetrievalStrategy, StrategyKind};
pub use types::*;
