// Corpus Search Engine
// Main API that wires the source registry, cache, compiler, matcher and renderer

use crate::cache::CorpusCache;
use crate::config::{ConfigError, SearchConfig};
use crate::data::{load_source, Corpus, SourceRegistry};
use crate::highlight::Highlighter;
use crate::matcher::MatchEngine;
use crate::pattern::{compile_query, CompiledPattern, WildcardClass};
use crate::stats::{token_table, vocabulary_table, FrequencyRow, Summary};
use crate::types::{CorpusError, MatchResult, QueryRejection, ScoreRange};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

/// Failure to set up a [`CorpusSearch`]
#[derive(Debug, Error)]
pub enum SetupError {
    #[error(transparent)]
    Corpus(#[from] CorpusError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Figures restricted to the chosen score range
#[derive(Debug, Clone, PartialEq)]
pub struct RangeReport {
    pub range: ScoreRange,

    /// In-range token table
    pub tokens: Vec<FrequencyRow>,

    /// Entries matched out of corpus entries inside the range
    pub summary: Summary,
}

/// Everything the UI needs to show for a search with matches
#[derive(Debug, Clone, PartialEq)]
pub struct SearchReport {
    pub source: String,
    pub query: String,

    /// Raw match data
    pub result: MatchResult,

    /// Display entries with highlight markers, in corpus order
    pub display: Vec<String>,

    /// Token table over the whole corpus
    pub tokens: Vec<FrequencyRow>,

    pub summary: Summary,

    /// Present when a score range was applied
    pub range: Option<RangeReport>,
}

/// Result of a search request
///
/// Rejected queries and empty results are ordinary outcomes, not errors.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    /// The query was refused before the corpus was touched
    Rejected(QueryRejection),

    /// A valid query with no matches anywhere
    NoMatches,

    /// Matches exist, but none inside the chosen score range
    OutsideRange(SearchReport),

    Matches(SearchReport),
}

impl SearchOutcome {
    /// The report, for outcomes that have one
    pub fn report(&self) -> Option<&SearchReport> {
        match self {
            SearchOutcome::Matches(report) | SearchOutcome::OutsideRange(report) => Some(report),
            _ => None,
        }
    }
}

/// Corpus search engine
///
/// Combines all components:
/// - Source registry (which sources exist and where their files are)
/// - Corpus cache (one loaded corpus at a time by default)
/// - Pattern compiler (wildcard queries → whole-token matchers)
/// - Match engine (counts, entry hits, score-range filtering)
/// - Highlighter (display text with matches marked)
#[derive(Debug)]
pub struct CorpusSearch {
    registry: SourceRegistry,
    cache: CorpusCache,
    engine: MatchEngine,
    highlighter: Highlighter,
    wildcard: WildcardClass,
}

impl CorpusSearch {
    /// Discover sources in `config.data_dir` and register composites
    pub fn new(config: &SearchConfig) -> Result<Self, SetupError> {
        let registry = SourceRegistry::discover(&config.data_dir)?;
        Self::with_registry(registry, config)
    }

    /// Build on an existing registry; composites from `config` are added to it
    pub fn with_registry(
        mut registry: SourceRegistry,
        config: &SearchConfig,
    ) -> Result<Self, SetupError> {
        for composite in &config.composites {
            registry.add_composite(&composite.label, &composite.members)?;
        }

        Ok(Self {
            registry,
            cache: CorpusCache::new(config.cache_capacity),
            engine: MatchEngine::new(config.display_limit),
            highlighter: Highlighter::new(config.highlight.clone()),
            wildcard: config.wildcard()?,
        })
    }

    pub fn sources(&self) -> &SourceRegistry {
        &self.registry
    }

    pub fn cache(&self) -> &CorpusCache {
        &self.cache
    }

    pub fn highlighter(&self) -> &Highlighter {
        &self.highlighter
    }

    /// Loaded corpus for a source, from the cache when possible
    pub fn corpus(&self, source: &str) -> Result<Arc<Corpus>, CorpusError> {
        let spec = self.registry.get(source)?;
        self.cache.get_or_load(&spec.label, || load_source(spec))
    }

    /// Compile a query with the configured wildcard class
    pub fn compile(&self, query: &str, case_sensitive: bool) -> Result<CompiledPattern, QueryRejection> {
        compile_query(query, case_sensitive, &self.wildcard)
    }

    /// Execute a search query against a source
    ///
    /// # Arguments
    /// * `source` - Source label (case-insensitive)
    /// * `query` - Wildcard query, e.g. "cat*" or "^What"
    /// * `case_sensitive` - Match and count tokens with their original casing
    /// * `range` - Optional inclusive complexity score range; ignored for
    ///   sources without scores
    ///
    /// # Returns
    /// A [`SearchOutcome`], or an error if the source cannot be loaded
    pub fn search(
        &self,
        source: &str,
        query: &str,
        case_sensitive: bool,
        range: Option<ScoreRange>,
    ) -> Result<SearchOutcome, CorpusError> {
        // Step 1: Compile the query; rejected queries never load a corpus
        let pattern = match self.compile(query, case_sensitive) {
            Ok(pattern) => pattern,
            Err(rejection) => {
                debug!(query, %rejection, "query rejected");
                return Ok(SearchOutcome::Rejected(rejection));
            }
        };

        // Step 2: Load or reuse the corpus
        let corpus = self.corpus(source)?;

        let range = match range {
            Some(_) if !corpus.is_scored() => {
                debug!(source = corpus.source(), "ignoring score range for unscored source");
                None
            }
            other => other,
        };

        // Step 3: Scan
        let result = self.engine.search(&pattern, &corpus, range);
        info!(
            source = corpus.source(),
            query = pattern.query(),
            regex = pattern.as_str(),
            entries_matched = result.entry_match_count,
            "search complete"
        );

        if !result.has_matches() {
            return Ok(SearchOutcome::NoMatches);
        }

        // Step 4: Render and summarize
        let report = self.build_report(&corpus, &pattern, result, range);
        let outside_range = report
            .range
            .as_ref()
            .is_some_and(|r| r.summary.entries_matched == 0);

        if outside_range {
            Ok(SearchOutcome::OutsideRange(report))
        } else {
            Ok(SearchOutcome::Matches(report))
        }
    }

    /// Vocabulary table of a source, most frequent first
    pub fn vocabulary(&self, source: &str) -> Result<Vec<FrequencyRow>, CorpusError> {
        let corpus = self.corpus(source)?;
        Ok(vocabulary_table(corpus.vocabulary()))
    }

    fn build_report(
        &self,
        corpus: &Corpus,
        pattern: &CompiledPattern,
        result: MatchResult,
        range: Option<ScoreRange>,
    ) -> SearchReport {
        let display = result
            .display_entries
            .iter()
            .map(|entry| self.highlighter.render_entry(entry))
            .collect();

        let range_report = match (range, result.in_range.as_ref()) {
            (Some(range), Some(counts)) => {
                let entries_in_range = corpus
                    .entries()
                    .iter()
                    .filter(|e| e.score.is_some_and(|s| range.contains(s)))
                    .count();
                Some(RangeReport {
                    range,
                    tokens: token_table(&counts.token_counts),
                    summary: Summary::new(
                        counts.entry_match_count,
                        entries_in_range,
                        counts.total_matches(),
                    ),
                })
            }
            _ => None,
        };

        SearchReport {
            source: corpus.source().to_string(),
            query: pattern.query().to_string(),
            tokens: token_table(&result.token_counts),
            summary: Summary::new(result.entry_match_count, corpus.len(), result.total_matches()),
            display,
            range: range_report,
            result,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::SourceFile;
    use std::fs;
    use tempfile::TempDir;

    fn create_search() -> Result<(TempDir, CorpusSearch), Box<dyn std::error::Error>> {
        let dir = TempDir::new()?;
        fs::write(
            dir.path().join("animals.txt"),
            "The cat sat.\nThe cats sat on cats.\nDogs ran.\n",
        )?;
        fs::write(
            dir.path().join("scored_animals.tsv"),
            "text\tscore\nThe cat sat.\t0.2\nA cat and a cat.\t0.7\nDogs ran.\t0.5\n",
        )?;
        let config = SearchConfig::default().with_data_dir(dir.path());
        let search = CorpusSearch::new(&config)?;
        Ok((dir, search))
    }

    #[test]
    fn test_search_creation() -> Result<(), Box<dyn std::error::Error>> {
        let (_dir, search) = create_search()?;
        assert_eq!(search.sources().labels(), vec!["animals", "scored animals"]);
        Ok(())
    }

    #[test]
    fn test_matches_outcome() -> Result<(), Box<dyn std::error::Error>> {
        let (_dir, search) = create_search()?;
        let outcome = search.search("animals", "cat*", false, None)?;

        let SearchOutcome::Matches(report) = outcome else {
            panic!("expected matches");
        };
        assert_eq!(report.result.entry_match_count, 1);
        assert_eq!(report.display, vec!["The **cats** sat on **cats**."]);
        assert_eq!(report.tokens[0].token, "cats");
        assert_eq!(report.tokens[0].count, 2);
        assert_eq!(report.summary.total_matches, 2);
        assert!(report.range.is_none());
        Ok(())
    }

    #[test]
    fn test_rejected_outcome_skips_load() -> Result<(), Box<dyn std::error::Error>> {
        let (_dir, search) = create_search()?;
        let outcome = search.search("animals", "a(b", false, None)?;
        assert_eq!(
            outcome,
            SearchOutcome::Rejected(QueryRejection::ForbiddenCharacter { char: '(' })
        );
        assert!(search.cache().is_empty());
        Ok(())
    }

    #[test]
    fn test_no_matches_outcome() -> Result<(), Box<dyn std::error::Error>> {
        let (_dir, search) = create_search()?;
        let outcome = search.search("animals", "horse", false, None)?;
        assert_eq!(outcome, SearchOutcome::NoMatches);
        assert!(outcome.report().is_none());
        Ok(())
    }

    #[test]
    fn test_range_outcomes() -> Result<(), Box<dyn std::error::Error>> {
        let (_dir, search) = create_search()?;

        let inside = ScoreRange::new(0.6, 1.0)?;
        let outcome = search.search("scored animals", "cat", false, Some(inside))?;
        let SearchOutcome::Matches(report) = outcome else {
            panic!("expected matches");
        };
        let range = report.range.as_ref().unwrap();
        assert_eq!(range.summary.entries_matched, 1);
        assert_eq!(range.summary.corpus_entries, 1);
        assert_eq!(range.tokens[0].count, 2);
        assert_eq!(report.summary.entries_matched, 2);
        assert_eq!(report.display, vec!["A **cat** and a **cat**."]);

        let outside = ScoreRange::new(0.4, 0.6)?;
        let outcome = search.search("scored animals", "cat", false, Some(outside))?;
        assert!(matches!(outcome, SearchOutcome::OutsideRange(_)));
        Ok(())
    }

    #[test]
    fn test_range_ignored_for_unscored_source() -> Result<(), Box<dyn std::error::Error>> {
        let (_dir, search) = create_search()?;
        let range = ScoreRange::new(0.9, 1.0)?;
        let outcome = search.search("animals", "cat", false, Some(range))?;
        let report = outcome.report().unwrap();
        assert!(report.range.is_none());
        assert_eq!(report.display.len(), 1);
        Ok(())
    }

    #[test]
    fn test_unknown_source_is_error() -> Result<(), Box<dyn std::error::Error>> {
        let (_dir, search) = create_search()?;
        let result = search.search("birds", "cat", false, None);
        assert!(matches!(result, Err(CorpusError::UnknownSource(_))));
        Ok(())
    }

    #[test]
    fn test_vocabulary() -> Result<(), Box<dyn std::error::Error>> {
        let (_dir, search) = create_search()?;
        let rows = search.vocabulary("animals")?;
        assert_eq!(rows[0].token, "cats");
        assert_eq!(rows[0].count, 2);
        Ok(())
    }

    #[test]
    fn test_composite_from_config() -> Result<(), Box<dyn std::error::Error>> {
        let dir = TempDir::new()?;
        fs::write(dir.path().join("q.txt"), "Who wrote it?\n")?;
        fs::write(dir.path().join("c.txt"), "It was written by a cat.\n")?;

        let mut registry = SourceRegistry::new();
        for (label, file) in [("Questions", "q.txt"), ("Contexts", "c.txt")] {
            let source_file = SourceFile::from_path(dir.path().join(file)).unwrap();
            registry.register(label, vec![source_file]);
        }

        let config = SearchConfig::from_json_str(
            r#"{ "composites": [{ "label": "Full", "members": ["Questions", "Contexts"] }] }"#,
        )?;
        let search = CorpusSearch::with_registry(registry, &config)?;

        let corpus = search.corpus("full")?;
        assert_eq!(corpus.len(), 2);
        assert_eq!(corpus.entries()[0].text, "Who wrote it?");
        Ok(())
    }
}
