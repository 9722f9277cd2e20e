// Corpus Search Statistics
// Token and vocabulary tables plus summary figures for display

use crate::vocab::VocabularyTable;
use rustc_hash::FxHashMap;

/// A percentage that is safe to display
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Percentage {
    /// Rounded to two decimals
    Value(f64),

    /// Positive, but rounds to zero
    BelowThreshold,

    /// Denominator was zero
    NotApplicable,
}

impl Percentage {
    /// `100 * part / whole`, guarded against an empty whole
    ///
    /// # Examples
    /// ```
    /// # use corpus_search::stats::Percentage;
    /// assert_eq!(Percentage::of(1, 3).to_string(), "33.33");
    /// assert_eq!(Percentage::of(1, 1_000_000).to_string(), "<0.01");
    /// assert_eq!(Percentage::of(0, 0).to_string(), "n/a");
    /// ```
    pub fn of(part: usize, whole: usize) -> Self {
        if whole == 0 {
            return Percentage::NotApplicable;
        }
        let value = (100.0 * part as f64 / whole as f64 * 100.0).round() / 100.0;
        if part > 0 && value == 0.0 {
            Percentage::BelowThreshold
        } else {
            Percentage::Value(value)
        }
    }

    /// Numeric value, if there is one
    pub fn value(&self) -> Option<f64> {
        match self {
            Percentage::Value(v) => Some(*v),
            _ => None,
        }
    }
}

impl std::fmt::Display for Percentage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Percentage::Value(v) => write!(f, "{:.2}", v),
            Percentage::BelowThreshold => write!(f, "<0.01"),
            Percentage::NotApplicable => write!(f, "n/a"),
        }
    }
}

/// One row of a frequency table
#[derive(Debug, Clone, PartialEq)]
pub struct FrequencyRow {
    pub token: String,
    pub count: usize,
    pub percent: Percentage,
}

/// Matched tokens with their share of all matches
pub fn token_table(counts: &FxHashMap<String, usize>) -> Vec<FrequencyRow> {
    let total: usize = counts.values().sum();
    frequency_rows(counts.iter().map(|(t, c)| (t.as_str(), *c)), total)
}

/// Vocabulary words with their share of all corpus tokens
pub fn vocabulary_table(vocab: &VocabularyTable) -> Vec<FrequencyRow> {
    frequency_rows(vocab.iter(), vocab.token_count())
}

/// Rows sorted by count descending, then token ascending
fn frequency_rows<'a, I>(items: I, total: usize) -> Vec<FrequencyRow>
where
    I: Iterator<Item = (&'a str, usize)>,
{
    let mut rows: Vec<FrequencyRow> = items
        .map(|(token, count)| FrequencyRow {
            token: token.to_string(),
            count,
            percent: Percentage::of(count, total),
        })
        .collect();
    rows.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.token.cmp(&b.token)));
    rows
}

/// Scalar figures shown above the results
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub entries_matched: usize,
    pub corpus_entries: usize,
    pub percent_matched: Percentage,
    pub total_matches: usize,
}

impl Summary {
    pub fn new(entries_matched: usize, corpus_entries: usize, total_matches: usize) -> Self {
        Self {
            entries_matched,
            corpus_entries,
            percent_matched: Percentage::of(entries_matched, corpus_entries),
            total_matches,
        }
    }
}

impl std::fmt::Display for Summary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "There are matches in {} of the {} entries ({}%), {} matches in total",
            self.entries_matched, self.corpus_entries, self.percent_matched, self.total_matches
        )
    }
}
