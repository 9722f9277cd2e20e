// Corpus Search Match Engine
// Applies a compiled pattern to every corpus entry and accumulates match statistics

use crate::data::Corpus;
use crate::pattern::CompiledPattern;
use crate::types::{DisplayEntry, MatchResult, RangeCounts, ScoreRange};

/// Default number of matching entries retained for display
pub const DEFAULT_DISPLAY_LIMIT: usize = 1000;

/// Scans a corpus with a compiled pattern
#[derive(Debug, Clone, Copy)]
pub struct MatchEngine {
    display_limit: usize,
}

impl MatchEngine {
    /// Create an engine that retains at most `display_limit` entries per search
    pub fn new(display_limit: usize) -> Self {
        Self { display_limit }
    }

    pub fn display_limit(&self) -> usize {
        self.display_limit
    }

    /// Search every entry of `corpus` once, in corpus order
    ///
    /// Every non-overlapping match is counted under its normalized form.
    /// Entries past the display limit still contribute to the counts. With
    /// a `range`, a second set of counts covers only scored entries inside
    /// it, and only those entries are retained for display.
    ///
    /// # Example
    /// ```
    /// # use corpus_search::data::Corpus;
    /// # use corpus_search::matcher::MatchEngine;
    /// # use corpus_search::pattern::{compile_query, WildcardClass};
    /// # use corpus_search::types::Entry;
    /// let corpus = Corpus::from_entries("demo", vec![
    ///     Entry::plain("The cat sat."),
    ///     Entry::plain("The cats sat on cats."),
    /// ]);
    /// let pattern = compile_query("cat*", false, &WildcardClass::default()).unwrap();
    /// let result = MatchEngine::default().search(&pattern, &corpus, None);
    /// assert_eq!(result.entry_match_count, 1);
    /// assert_eq!(result.token_counts["cats"], 2);
    /// ```
    pub fn search(
        &self,
        pattern: &CompiledPattern,
        corpus: &Corpus,
        range: Option<ScoreRange>,
    ) -> MatchResult {
        let mut result = MatchResult {
            in_range: range.map(|_| RangeCounts::default()),
            ..MatchResult::default()
        };

        for (index, entry) in corpus.entries().iter().enumerate() {
            let found: Vec<&str> = pattern.find_iter(&entry.text).map(|m| m.as_str()).collect();
            if found.is_empty() {
                continue;
            }

            result.entry_match_count += 1;
            for token in &found {
                *result.token_counts.entry(pattern.normalize(token)).or_insert(0) += 1;
            }

            let in_range = match (range, entry.score) {
                (Some(range), Some(score)) => range.contains(score),
                _ => false,
            };

            if in_range {
                if let Some(counts) = result.in_range.as_mut() {
                    counts.entry_match_count += 1;
                    for token in &found {
                        *counts.token_counts.entry(pattern.normalize(token)).or_insert(0) += 1;
                    }
                }
            }

            let displayable = range.is_none() || in_range;
            if displayable && result.display_entries.len() < self.display_limit {
                result.display_entries.push(DisplayEntry {
                    index,
                    text: entry.text.clone(),
                    tokens: unique_tokens(&found),
                });
            }
        }

        result
    }
}

impl Default for MatchEngine {
    fn default() -> Self {
        Self::new(DEFAULT_DISPLAY_LIMIT)
    }
}

/// Distinct strings in first-seen order
fn unique_tokens(found: &[&str]) -> Vec<String> {
    let mut unique: Vec<String> = Vec::new();
    for token in found {
        if !unique.iter().any(|u| u == token) {
            unique.push(token.to_string());
        }
    }
    unique
}
