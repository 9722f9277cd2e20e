// Corpus Search Configuration
// Tunable settings, loadable from a JSON file

use crate::cache::DEFAULT_CACHE_CAPACITY;
use crate::highlight::HighlightMarkers;
use crate::matcher::DEFAULT_DISPLAY_LIMIT;
use crate::pattern::{WildcardClass, DEFAULT_WILDCARD_CLASS};
use crate::types::QueryRejection;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// A source that concatenates other sources, e.g. questions followed by contexts
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CompositeSource {
    pub label: String,
    pub members: Vec<String>,
}

/// Settings for a [`CorpusSearch`](crate::search::CorpusSearch)
///
/// Every field has a default, so a config file only lists what it changes:
///
/// ```json
/// {
///   "data_dir": "corpora",
///   "display_limit": 200,
///   "composites": [
///     { "label": "HotpotQA Full", "members": ["HotpotQA Questions", "HotpotQA Contexts"] }
///   ]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Directory scanned for `.txt` and `.tsv` sources
    pub data_dir: PathBuf,

    /// Corpora kept in memory at once
    pub cache_capacity: usize,

    /// Matching entries retained for display per search
    pub display_limit: usize,

    /// Body of the regex character class a `*` expands over
    pub wildcard_class: String,

    pub highlight: HighlightMarkers,

    pub composites: Vec<CompositeSource>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            display_limit: DEFAULT_DISPLAY_LIMIT,
            wildcard_class: DEFAULT_WILDCARD_CLASS.to_string(),
            highlight: HighlightMarkers::default(),
            composites: Vec::new(),
        }
    }
}

impl SearchConfig {
    /// Parse a JSON config
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a JSON config file
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    pub fn with_data_dir(mut self, data_dir: impl Into<PathBuf>) -> Self {
        self.data_dir = data_dir.into();
        self
    }

    pub fn with_display_limit(mut self, display_limit: usize) -> Self {
        self.display_limit = display_limit;
        self
    }

    pub fn with_cache_capacity(mut self, cache_capacity: usize) -> Self {
        self.cache_capacity = cache_capacity;
        self
    }

    pub fn with_highlight(mut self, highlight: HighlightMarkers) -> Self {
        self.highlight = highlight;
        self
    }

    /// Validated wildcard class
    pub fn wildcard(&self) -> Result<WildcardClass, ConfigError> {
        Ok(WildcardClass::new(&self.wildcard_class)?)
    }
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error(transparent)]
    Wildcard(#[from] QueryRejection),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SearchConfig::default();
        assert_eq!(config.data_dir, PathBuf::from("data"));
        assert_eq!(config.cache_capacity, 1);
        assert_eq!(config.display_limit, 1000);
        assert_eq!(config.wildcard().unwrap(), WildcardClass::default());
        assert!(config.composites.is_empty());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = SearchConfig::from_json_str(
            r#"{
                "display_limit": 200,
                "highlight": { "open": "<b>", "close": "</b>" },
                "composites": [{ "label": "Full", "members": ["Questions", "Contexts"] }]
            }"#,
        )
        .unwrap();

        assert_eq!(config.display_limit, 200);
        assert_eq!(config.cache_capacity, 1);
        assert_eq!(config.highlight, HighlightMarkers::new("<b>", "</b>"));
        assert_eq!(config.composites[0].members, vec!["Questions", "Contexts"]);
    }

    #[test]
    fn test_bad_json() {
        assert!(matches!(
            SearchConfig::from_json_str("{ not json"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_bad_wildcard_class() {
        let config = SearchConfig {
            wildcard_class: "z-a".to_string(),
            ..SearchConfig::default()
        };
        assert!(matches!(config.wildcard(), Err(ConfigError::Wildcard(_))));
    }

    #[test]
    fn test_missing_file() {
        let result = SearchConfig::from_json_file(Path::new("/nonexistent/corpus-search.json"));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }

    #[test]
    fn test_builders() {
        let config = SearchConfig::default()
            .with_data_dir("corpora")
            .with_display_limit(5)
            .with_cache_capacity(2);
        assert_eq!(config.data_dir, PathBuf::from("corpora"));
        assert_eq!(config.display_limit, 5);
        assert_eq!(config.cache_capacity, 2);
    }
}
