// Corpus Search Vocabulary
// Word frequency table derived from every entry of a corpus at load time

use rustc_hash::FxHashMap;

/// Punctuation stripped from entries before splitting into words
pub const STRIPPED_PUNCTUATION: &[char] = &[',', ';', '!', '/', ':', '(', ')', '.', '?', '"', '[', ']'];

/// Lowercased alphabetic word → occurrence count
///
/// Hyphenated compounds contribute their parts separately: `well-known`
/// counts once for `well` and once for `known`. Tokens with any
/// non-alphabetic character left after stripping (digits, apostrophes)
/// are not counted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VocabularyTable {
    counts: FxHashMap<String, usize>,
    token_count: usize,
}

impl VocabularyTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table over a sequence of entry texts
    ///
    /// # Examples
    /// ```
    /// # use corpus_search::vocab::VocabularyTable;
    /// let vocab = VocabularyTable::from_texts(["Well-known, cats-and-dogs!"]);
    /// assert_eq!(vocab.get("well"), 1);
    /// assert_eq!(vocab.get("dogs"), 1);
    /// assert_eq!(vocab.token_count(), 5);
    /// ```
    pub fn from_texts<'a, I>(texts: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut table = Self::new();
        for text in texts {
            table.add_text(text);
        }
        table
    }

    /// Count the words of one entry
    pub fn add_text(&mut self, text: &str) {
        let cleaned: String = text
            .chars()
            .filter(|c| !STRIPPED_PUNCTUATION.contains(c))
            .map(|c| if c == '-' { ' ' } else { c })
            .collect();

        for word in cleaned.split_whitespace() {
            if !word.chars().all(char::is_alphabetic) {
                continue;
            }
            *self.counts.entry(word.to_lowercase()).or_insert(0) += 1;
            self.token_count += 1;
        }
    }

    /// Occurrences of a word (0 when absent)
    pub fn get(&self, word: &str) -> usize {
        self.counts.get(word).copied().unwrap_or(0)
    }

    /// Sum of all counts
    pub fn token_count(&self) -> usize {
        self.token_count
    }

    /// Number of distinct words
    pub fn vocab_size(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Iterate over `(word, count)` pairs in arbitrary order
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.counts.iter().map(|(word, count)| (word.as_str(), *count))
    }

    /// Underlying count map
    pub fn counts(&self) -> &FxHashMap<String, usize> {
        &self.counts
    }
}
