//! Settings for sfref.
//!
//! Settings are stored as TOML with the camelCase keys of the editor
//! plugin settings, so existing values can be carried over:
//!
//! ```toml
//! refreshCacheOnLoad = true
//! fetchTimeoutSecs = 20
//!
//! [docTypes.apex]
//! excludeFromAllDocumentationCommand = false
//! refreshCacheOnLoad = true
//!
//! [docTypes.serviceconsole]
//! excludeFromAllDocumentationCommand = true
//! refreshCacheOnLoad = false
//! ```
//!
//! ## Location
//!
//! 1. An explicit path (`--config`)
//! 2. `$SFREF_CONFIG`
//! 3. `settings.toml` in the platform config directory
//!    (Linux: `~/.config/sfref/settings.toml`)
//!
//! A missing file means defaults; an unreadable or malformed file is an error.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable that points at a settings file.
pub const CONFIG_ENV: &str = "SFREF_CONFIG";

const SETTINGS_FILE: &str = "settings.toml";

/// Global settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// Whether a background refresh of every eligible doc-type runs when the
    /// program starts.
    pub refresh_cache_on_load: bool,

    /// Request timeout in seconds. Unset means
    /// [`DEFAULT_TIMEOUT`](crate::fetcher::DEFAULT_TIMEOUT).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fetch_timeout_secs: Option<u64>,

    /// Per doc-type settings, keyed by lower-cased doc-type name.
    pub doc_types: HashMap<String, DocTypeSettings>,
}

/// Settings for one doc-type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DocTypeSettings {
    /// Leave this doc-type out of `*` requests.
    pub exclude_from_all_documentation_command: bool,

    /// Include this doc-type in the startup refresh.
    pub refresh_cache_on_load: bool,

    /// Replace the built-in source URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,

    /// Replace the built-in base URL used to resolve relative links.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

impl Default for DocTypeSettings {
    fn default() -> Self {
        Self {
            exclude_from_all_documentation_command: false,
            refresh_cache_on_load: true,
            source_url: None,
            base_url: None,
        }
    }
}

impl Settings {
    /// Load settings from `explicit`, `$SFREF_CONFIG`, or the platform
    /// config directory, in that order.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => match std::env::var_os(CONFIG_ENV) {
                Some(path) => PathBuf::from(path),
                None => Self::default_path()?,
            },
        };
        Self::load_from(&path)
    }

    /// Load settings from a specific file; a missing file yields defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no settings file, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read settings: {e}")))?;
        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Failed to parse settings: {e}")))
    }

    /// Platform location of the settings file.
    pub fn default_path() -> Result<PathBuf> {
        let project_dirs = directories::ProjectDirs::from("dev", "sfref", "sfref")
            .ok_or_else(|| Error::Config("Failed to determine project directories".into()))?;
        Ok(project_dirs.config_dir().join(SETTINGS_FILE))
    }

    /// Settings for a doc-type; defaults when the file has no record for it.
    pub fn doc_type(&self, name: &str) -> DocTypeSettings {
        self.doc_types
            .get(&name.to_lowercase())
            .cloned()
            .unwrap_or_default()
    }

    /// Effective request timeout.
    pub fn fetch_timeout(&self) -> Duration {
        self.fetch_timeout_secs
            .map_or(crate::fetcher::DEFAULT_TIMEOUT, Duration::from_secs)
    }
}
