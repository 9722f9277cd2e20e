// Corpus Search Data Loader
// Discovers corpus source files and reads them into in-memory corpora

use crate::types::{CorpusError, Entry, SourceFormat};
use crate::vocab::VocabularyTable;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};

/// An ordered, immutable collection of entries with precomputed vocabulary
#[derive(Debug, Clone)]
pub struct Corpus {
    source: String,
    entries: Vec<Entry>,
    vocabulary: VocabularyTable,
}

impl Corpus {
    /// Build a corpus from entries in source order
    ///
    /// # Examples
    /// ```
    /// # use corpus_search::data::Corpus;
    /// # use corpus_search::types::Entry;
    /// let corpus = Corpus::from_entries("demo", vec![Entry::plain("The cat sat.")]);
    /// assert_eq!(corpus.len(), 1);
    /// assert_eq!(corpus.token_count(), 3);
    /// ```
    pub fn from_entries(source: impl Into<String>, entries: Vec<Entry>) -> Self {
        let vocabulary = VocabularyTable::from_texts(entries.iter().map(|e| e.text.as_str()));
        Self {
            source: source.into(),
            entries,
            vocabulary,
        }
    }

    /// Label of the source this corpus was loaded from
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn vocabulary(&self) -> &VocabularyTable {
        &self.vocabulary
    }

    /// Total vocabulary tokens across all entries
    pub fn token_count(&self) -> usize {
        self.vocabulary.token_count()
    }

    /// Distinct vocabulary words across all entries
    pub fn vocab_size(&self) -> usize {
        self.vocabulary.vocab_size()
    }

    /// True when at least one entry carries a complexity score
    pub fn is_scored(&self) -> bool {
        self.entries.iter().any(|e| e.score.is_some())
    }
}

/// One file backing a source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub path: PathBuf,
    pub format: SourceFormat,
}

impl SourceFile {
    /// Infer the format from the file extension (`.txt` or `.tsv`)
    pub fn from_path(path: impl Into<PathBuf>) -> Option<Self> {
        let path = path.into();
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        let format = match ext.as_str() {
            "txt" => SourceFormat::Lines,
            "tsv" => SourceFormat::Scored,
            _ => return None,
        };
        Some(Self { path, format })
    }
}

/// A selectable source: a label and the files whose entries it concatenates
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceSpec {
    pub label: String,
    pub files: Vec<SourceFile>,
}

impl SourceSpec {
    pub fn is_composite(&self) -> bool {
        self.files.len() > 1
    }

    /// True when any backing file carries scores
    pub fn is_scored(&self) -> bool {
        self.files.iter().any(|f| f.format == SourceFormat::Scored)
    }
}

/// Lookup key for a label: trimmed, lowercased, spaces → underscores
///
/// # Examples
/// ```
/// # use corpus_search::data::source_key;
/// assert_eq!(source_key(" HotpotQA Questions "), "hotpotqa_questions");
/// ```
pub fn source_key(label: &str) -> String {
    label.trim().to_lowercase().replace(' ', "_")
}

/// Display label for a file stem: underscores → spaces
pub fn label_from_stem(stem: &str) -> String {
    stem.replace('_', " ")
}

/// Registry of selectable sources, keyed by normalized label
#[derive(Debug, Clone, Default)]
pub struct SourceRegistry {
    sources: BTreeMap<String, SourceSpec>,
}

impl SourceRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Scan a data directory for `.txt` and `.tsv` sources
    ///
    /// Files are visited in name order; when two files share a label the
    /// first one wins.
    pub fn discover(dir: &Path) -> Result<Self, CorpusError> {
        let read_dir = fs::read_dir(dir).map_err(|source| CorpusError::Io {
            path: dir.to_path_buf(),
            source,
        })?;

        let mut paths = Vec::new();
        for dir_entry in read_dir {
            let dir_entry = dir_entry.map_err(|source| CorpusError::Io {
                path: dir.to_path_buf(),
                source,
            })?;
            let path = dir_entry.path();
            if path.is_file() {
                paths.push(path);
            }
        }
        paths.sort();

        let mut registry = Self::new();
        for path in paths {
            let Some(file) = SourceFile::from_path(&path) else {
                debug!(path = %path.display(), "skipping non-corpus file");
                continue;
            };
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let label = label_from_stem(stem);
            if registry.contains(&label) {
                warn!(path = %path.display(), label = %label, "duplicate source label, ignoring file");
                continue;
            }
            registry.register(label, vec![file]);
        }

        info!(dir = %dir.display(), sources = registry.len(), "discovered corpus sources");
        Ok(registry)
    }

    /// Register a source under a label, replacing any previous one
    pub fn register(&mut self, label: impl Into<String>, files: Vec<SourceFile>) {
        let label = label.into();
        self.sources
            .insert(source_key(&label), SourceSpec { label, files });
    }

    /// Register a source that concatenates existing sources in order
    pub fn add_composite(&mut self, label: &str, members: &[String]) -> Result<(), CorpusError> {
        let mut files = Vec::new();
        for member in members {
            let spec = self
                .sources
                .get(&source_key(member))
                .ok_or_else(|| CorpusError::UnknownCompositeMember {
                    composite: label.to_string(),
                    member: member.clone(),
                })?;
            files.extend(spec.files.iter().cloned());
        }
        self.register(label, files);
        Ok(())
    }

    /// Look up a source by label (case-insensitive)
    pub fn get(&self, label: &str) -> Result<&SourceSpec, CorpusError> {
        self.sources
            .get(&source_key(label))
            .ok_or_else(|| CorpusError::UnknownSource(label.to_string()))
    }

    pub fn contains(&self, label: &str) -> bool {
        self.sources.contains_key(&source_key(label))
    }

    /// All sources in label order
    pub fn iter(&self) -> impl Iterator<Item = &SourceSpec> {
        self.sources.values()
    }

    pub fn labels(&self) -> Vec<&str> {
        self.sources.values().map(|s| s.label.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

/// Read every file of a source into one corpus
///
/// Any unreadable file or malformed row fails the whole load; no partial
/// corpus is returned.
pub fn load_source(spec: &SourceSpec) -> Result<Corpus, CorpusError> {
    let start = Instant::now();

    let mut entries = Vec::new();
    for file in &spec.files {
        entries.extend(read_entries(file)?);
    }
    let corpus = Corpus::from_entries(spec.label.clone(), entries);

    info!(
        source = %spec.label,
        entries = corpus.len(),
        vocab_size = corpus.vocab_size(),
        tokens = corpus.token_count(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "corpus loaded"
    );
    Ok(corpus)
}

/// Read the entries of one file according to its format
pub fn read_entries(file: &SourceFile) -> Result<Vec<Entry>, CorpusError> {
    let text = fs::read_to_string(&file.path).map_err(|source| CorpusError::Io {
        path: file.path.clone(),
        source,
    })?;

    match file.format {
        SourceFormat::Lines => Ok(parse_lines(&text)),
        SourceFormat::Scored => parse_scored(&file.path, &text),
    }
}

/// One entry per line, blank lines included
pub fn parse_lines(text: &str) -> Vec<Entry> {
    text.lines().map(Entry::plain).collect()
}

/// Header row, then `text<TAB>score` rows; blank rows are skipped
pub fn parse_scored(path: &Path, text: &str) -> Result<Vec<Entry>, CorpusError> {
    let malformed = |line: usize, reason: String| CorpusError::MalformedRow {
        path: path.to_path_buf(),
        line,
        reason,
    };

    let mut entries = Vec::new();
    for (idx, row) in text.lines().enumerate().skip(1) {
        let line = idx + 1;
        if row.trim().is_empty() {
            continue;
        }

        let (entry_text, score_text) = row
            .split_once('\t')
            .ok_or_else(|| malformed(line, "missing tab between text and score".to_string()))?;

        let score: f64 = score_text
            .trim()
            .parse()
            .map_err(|_| malformed(line, format!("score '{}' is not a number", score_text.trim())))?;

        if !(0.0..=1.0).contains(&score) {
            return Err(malformed(line, format!("score {} is outside [0, 1]", score)));
        }

        entries.push(Entry::scored(entry_text, score));
    }
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_lines_keeps_order_and_blanks() {
        let entries = parse_lines("first\n\nthird\n");
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].text, "first");
        assert_eq!(entries[1].text, "");
        assert_eq!(entries[2].text, "third");
        assert!(entries.iter().all(|e| e.score.is_none()));
    }

    #[test]
    fn test_parse_scored_skips_header() {
        let entries = parse_scored(
            Path::new("s.tsv"),
            "text\tscore\nThe cat sat.\t0.25\nDogs ran.\t1\n",
        )
        .unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0], Entry::scored("The cat sat.", 0.25));
        assert_eq!(entries[1].score, Some(1.0));
    }

    #[test]
    fn test_parse_scored_splits_on_first_tab() {
        let entries = parse_scored(Path::new("s.tsv"), "text\tscore\na\tb\t0.5\n");
        // "b\t0.5" is not a number
        assert!(matches!(
            entries,
            Err(CorpusError::MalformedRow { line: 2, .. })
        ));
    }

    #[test]
    fn test_parse_scored_missing_tab() {
        let result = parse_scored(Path::new("s.tsv"), "text\tscore\nno tab here\n");
        assert!(matches!(
            result,
            Err(CorpusError::MalformedRow { line: 2, .. })
        ));
    }

    #[test]
    fn test_parse_scored_bad_number() {
        let result = parse_scored(Path::new("s.tsv"), "text\tscore\nok\t0.1\nbad\thigh\n");
        match result {
            Err(CorpusError::MalformedRow { line, reason, .. }) => {
                assert_eq!(line, 3);
                assert!(reason.contains("high"));
            }
            other => panic!("expected malformed row, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_scored_out_of_range() {
        let result = parse_scored(Path::new("s.tsv"), "text\tscore\nx\t1.5\n");
        assert!(matches!(result, Err(CorpusError::MalformedRow { .. })));
    }

    #[test]
    fn test_source_file_format_from_extension() {
        assert_eq!(
            SourceFile::from_path("a/b.txt").map(|f| f.format),
            Some(SourceFormat::Lines)
        );
        assert_eq!(
            SourceFile::from_path("a/b.TSV").map(|f| f.format),
            Some(SourceFormat::Scored)
        );
        assert!(SourceFile::from_path("a/b.json").is_none());
        assert!(SourceFile::from_path("a/README").is_none());
    }

    #[test]
    fn test_label_key_mapping() {
        assert_eq!(label_from_stem("hotpotqa_questions"), "hotpotqa questions");
        assert_eq!(source_key("HotpotQA Questions"), "hotpotqa_questions");
    }

    #[test]
    fn test_registry_lookup_and_composite() {
        let mut registry = SourceRegistry::new();
        registry.register(
            "Questions",
            vec![SourceFile::from_path("q.txt").unwrap()],
        );
        registry.register(
            "Contexts",
            vec![SourceFile::from_path("c.txt").unwrap()],
        );
        registry
            .add_composite("Full", &["Questions".to_string(), "contexts".to_string()])
            .unwrap();

        let full = registry.get("full").unwrap();
        assert!(full.is_composite());
        assert_eq!(full.files[0].path, PathBuf::from("q.txt"));
        assert_eq!(full.files[1].path, PathBuf::from("c.txt"));
        assert_eq!(registry.labels(), vec!["Contexts", "Full", "Questions"]);

        assert!(matches!(
            registry.get("missing"),
            Err(CorpusError::UnknownSource(_))
        ));
        assert!(matches!(
            registry.add_composite("Bad", &["nope".to_string()]),
            Err(CorpusError::UnknownCompositeMember { .. })
        ));
    }

    #[test]
    fn test_corpus_stats() {
        let corpus = Corpus::from_entries(
            "demo",
            vec![
                Entry::plain("The cat sat."),
                Entry::plain("The cats sat on cats."),
                Entry::plain("Dogs ran."),
            ],
        );
        assert_eq!(corpus.source(), "demo");
        assert_eq!(corpus.len(), 3);
        assert_eq!(corpus.token_count(), 10);
        assert_eq!(corpus.vocab_size(), 7);
        assert!(!corpus.is_scored());
    }
}
