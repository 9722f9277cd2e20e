// Corpus Search Type Definitions
// Core types shared by the loader, pattern compiler, match engine and renderer

use rustc_hash::FxHashMap;
use std::path::PathBuf;
use thiserror::Error;

/// On-disk layout of a corpus source file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceFormat {
    /// One entry per line (`.txt`)
    Lines,

    /// Header row, then `text<TAB>score` per line (`.tsv`)
    Scored,
}

impl std::fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceFormat::Lines => write!(f, "lines"),
            SourceFormat::Scored => write!(f, "scored"),
        }
    }
}

/// One searchable unit of corpus text
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    /// Raw text as read from the source (may carry trailing whitespace)
    pub text: String,

    /// Normalized complexity score in [0, 1], scored sources only
    pub score: Option<f64>,
}

impl Entry {
    /// Create an unscored entry
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            score: None,
        }
    }

    /// Create an entry carrying a complexity score
    pub fn scored(text: impl Into<String>, score: f64) -> Self {
        Self {
            text: text.into(),
            score: Some(score),
        }
    }

    /// Text with surrounding whitespace trimmed, as shown to the user
    pub fn display_text(&self) -> &str {
        self.text.trim()
    }
}

/// Inclusive complexity score interval used to filter matches
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreRange {
    lower: f64,
    upper: f64,
}

impl ScoreRange {
    /// Create a range, checking `0 <= lower <= upper <= 1`
    ///
    /// # Examples
    /// ```
    /// # use corpus_search::types::ScoreRange;
    /// let range = ScoreRange::new(0.25, 0.75).unwrap();
    /// assert!(range.contains(0.25));
    /// assert!(!range.contains(0.8));
    ///
    /// assert!(ScoreRange::new(0.9, 0.1).is_err());
    /// ```
    pub fn new(lower: f64, upper: f64) -> Result<Self, RangeError> {
        if lower.is_nan() || upper.is_nan() {
            return Err(RangeError::NotANumber);
        }
        if !(0.0..=1.0).contains(&lower) || !(0.0..=1.0).contains(&upper) {
            return Err(RangeError::OutOfBounds { lower, upper });
        }
        if lower > upper {
            return Err(RangeError::Inverted { lower, upper });
        }
        Ok(Self { lower, upper })
    }

    /// The full [0, 1] interval
    pub fn full() -> Self {
        Self {
            lower: 0.0,
            upper: 1.0,
        }
    }

    pub fn lower(&self) -> f64 {
        self.lower
    }

    pub fn upper(&self) -> f64 {
        self.upper
    }

    #[inline]
    pub fn contains(&self, score: f64) -> bool {
        score >= self.lower && score <= self.upper
    }
}

impl std::fmt::Display for ScoreRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:.2}, {:.2}]", self.lower, self.upper)
    }
}

/// A matching entry retained for display
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayEntry {
    /// Position of the entry in the corpus
    pub index: usize,

    /// Raw entry text
    pub text: String,

    /// Unique matched token strings in original casing, first-seen order
    pub tokens: Vec<String>,
}

/// Counts accumulated only over entries whose score lies in the chosen range
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RangeCounts {
    pub token_counts: FxHashMap<String, usize>,
    pub entry_match_count: usize,
}

impl RangeCounts {
    /// Total token matches inside the range
    pub fn total_matches(&self) -> usize {
        self.token_counts.values().sum()
    }
}

/// Raw output of one search over a corpus
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatchResult {
    /// Normalized matched token → occurrences across the corpus
    pub token_counts: FxHashMap<String, usize>,

    /// Entries with at least one match
    pub entry_match_count: usize,

    /// First matching entries in corpus order, capped
    pub display_entries: Vec<DisplayEntry>,

    /// Present only when a score range was applied
    pub in_range: Option<RangeCounts>,
}

impl MatchResult {
    /// Total token matches across the corpus
    pub fn total_matches(&self) -> usize {
        self.token_counts.values().sum()
    }

    pub fn has_matches(&self) -> bool {
        self.entry_match_count > 0
    }
}

/// Invalid score range bounds
#[derive(Debug, Clone, Error, PartialEq)]
pub enum RangeError {
    #[error("Score range bounds must be numbers")]
    NotANumber,

    #[error("Score range [{lower}, {upper}] must lie within [0, 1]")]
    OutOfBounds { lower: f64, upper: f64 },

    #[error("Score range lower bound {lower} exceeds upper bound {upper}")]
    Inverted { lower: f64, upper: f64 },
}

/// A query that was not compiled; reported to the user as a warning
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum QueryRejection {
    #[error("Enter a search term")]
    Empty,

    #[error(
        "The character '{char}' can't be used in a search. Use letters and punctuation, \
         '*' as a wildcard, '|' between alternatives and a leading '^' to match entry openings"
    )]
    ForbiddenCharacter { char: char },

    #[error(
        "'{symbol}' on its own would match everything. Combine it with some letters, \
         search '^*' to list entry openings, or check the vocabulary table for every token"
    )]
    BareWildcard { symbol: char },

    #[error("Every alternative separated by '|' needs some text")]
    EmptyAlternative,

    #[error("Wildcard character class '{class}' is not valid: {reason}")]
    InvalidWildcardClass { class: String, reason: String },

    #[error("This search can't be run: {reason}")]
    Uncompilable { reason: String },
}

/// Failure to produce a corpus for a source selection
#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed row at {}:{line}: {reason}", path.display())]
    MalformedRow {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    #[error("Unknown corpus source '{0}'")]
    UnknownSource(String),

    #[error("Composite source '{composite}' refers to unknown source '{member}'")]
    UnknownCompositeMember { composite: String, member: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_format_display() {
        assert_eq!(SourceFormat::Lines.to_string(), "lines");
        assert_eq!(SourceFormat::Scored.to_string(), "scored");
    }

    #[test]
    fn test_entry_display_text_trims() {
        let entry = Entry::plain("  The cat sat.\n");
        assert_eq!(entry.display_text(), "The cat sat.");
        assert_eq!(entry.score, None);
    }

    #[test]
    fn test_score_range_inclusive_bounds() {
        let range = ScoreRange::new(0.2, 0.4).unwrap();
        assert!(range.contains(0.2));
        assert!(range.contains(0.4));
        assert!(!range.contains(0.19));
        assert!(!range.contains(0.41));
    }

    #[test]
    fn test_score_range_rejects_bad_bounds() {
        assert!(matches!(
            ScoreRange::new(-0.1, 0.5),
            Err(RangeError::OutOfBounds { .. })
        ));
        assert!(matches!(
            ScoreRange::new(0.6, 0.5),
            Err(RangeError::Inverted { .. })
        ));
        assert!(matches!(
            ScoreRange::new(f64::NAN, 0.5),
            Err(RangeError::NotANumber)
        ));
    }

    #[test]
    fn test_match_result_totals() {
        let mut result = MatchResult::default();
        assert!(!result.has_matches());

        result.token_counts.insert("cat".to_string(), 2);
        result.token_counts.insert("cats".to_string(), 3);
        result.entry_match_count = 2;

        assert_eq!(result.total_matches(), 5);
        assert!(result.has_matches());
    }

    #[test]
    fn test_rejection_messages() {
        let msg = QueryRejection::ForbiddenCharacter { char: '(' }.to_string();
        assert!(msg.contains("'('"));

        let msg = QueryRejection::BareWildcard { symbol: '*' }.to_string();
        assert!(msg.contains("^*"));
        assert!(msg.contains("vocabulary"));
    }
}
