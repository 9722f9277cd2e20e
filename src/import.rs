// Corpus Search Benchmark Import
// Extracts titles, contexts and questions from QA benchmark JSON into corpus files

use serde::Deserialize;
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;
use tracing::info;

/// Supported benchmark dataset layouts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Benchmark {
    /// `{id: {"passage": .., "qa_pairs": [{"question": ..}]}}`
    Drop,

    /// `[{"level": .., "question": .., "context": [[title, [sentence, ..]]], "supporting_facts": [[title, idx]]}]`
    Hotpot,

    /// `{"data": [{"title": .., "paragraphs": [{"context": .., "qas": [{"question": ..}]}]}]}`
    Squad2,
}

impl FromStr for Benchmark {
    type Err = ImportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "drop" => Ok(Benchmark::Drop),
            "hotpot" | "hotpotqa" => Ok(Benchmark::Hotpot),
            "squad" | "squad2" => Ok(Benchmark::Squad2),
            other => Err(ImportError::UnknownBenchmark(other.to_string())),
        }
    }
}

impl std::fmt::Display for Benchmark {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Benchmark::Drop => write!(f, "drop"),
            Benchmark::Hotpot => write!(f, "hotpot"),
            Benchmark::Squad2 => write!(f, "squad2"),
        }
    }
}

/// Kind of text extracted from a test case
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentKind {
    Titles,
    Contexts,
    Questions,
}

impl ContentKind {
    pub const ALL: [ContentKind; 3] = [
        ContentKind::Titles,
        ContentKind::Contexts,
        ContentKind::Questions,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ContentKind::Titles => "titles",
            ContentKind::Contexts => "contexts",
            ContentKind::Questions => "questions",
        }
    }
}

impl FromStr for ContentKind {
    type Err = ImportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "titles" | "title" => Ok(ContentKind::Titles),
            "contexts" | "context" => Ok(ContentKind::Contexts),
            "questions" | "question" => Ok(ContentKind::Questions),
            other => Err(ImportError::UnknownContentKind(other.to_string())),
        }
    }
}

impl std::fmt::Display for ContentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What to extract and which HotpotQA cases to keep
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportOptions {
    pub inclusions: Vec<ContentKind>,

    /// HotpotQA difficulty levels to keep
    pub hotpot_levels: Vec<String>,

    /// Keep HotpotQA contexts that are not supporting facts
    pub hotpot_distractors: bool,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            inclusions: ContentKind::ALL.to_vec(),
            hotpot_levels: vec!["hard".to_string()],
            hotpot_distractors: false,
        }
    }
}

impl ImportOptions {
    fn includes(&self, kind: ContentKind) -> bool {
        self.inclusions.contains(&kind)
    }
}

/// One benchmark test case in the common schema
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BenchmarkCase {
    pub titles: Vec<String>,
    pub contexts: Vec<String>,
    pub questions: Vec<String>,
}

/// All extracted text grouped by kind, across test cases
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentCollection {
    pub titles: Vec<String>,
    pub contexts: Vec<String>,
    pub questions: Vec<String>,
}

impl ContentCollection {
    /// Regroup cases by content kind, keeping case order
    pub fn from_cases(cases: &[BenchmarkCase]) -> Self {
        let mut collection = Self::default();
        for case in cases {
            collection.titles.extend(case.titles.iter().cloned());
            collection.contexts.extend(case.contexts.iter().cloned());
            collection.questions.extend(case.questions.iter().cloned());
        }
        collection
    }

    pub fn get(&self, kind: ContentKind) -> &[String] {
        match kind {
            ContentKind::Titles => &self.titles,
            ContentKind::Contexts => &self.contexts,
            ContentKind::Questions => &self.questions,
        }
    }

    /// Write `<prefix>_<kind>.txt` line-oriented corpus files into `dir`
    ///
    /// Kinds with no content are skipped. Interior line breaks are collapsed
    /// to spaces so each item stays one entry.
    pub fn write_corpus_files(
        &self,
        dir: &Path,
        prefix: &str,
        kinds: &[ContentKind],
    ) -> Result<Vec<PathBuf>, ImportError> {
        fs::create_dir_all(dir).map_err(|source| ImportError::Io {
            path: dir.to_path_buf(),
            source,
        })?;

        let mut written = Vec::new();
        for kind in kinds {
            let items = self.get(*kind);
            if items.is_empty() {
                continue;
            }

            let mut body = String::new();
            for item in items {
                body.push_str(&single_line(item));
                body.push('\n');
            }

            let path = dir.join(format!("{}_{}.txt", prefix, kind));
            fs::write(&path, body).map_err(|source| ImportError::Io {
                path: path.clone(),
                source,
            })?;
            info!(path = %path.display(), entries = items.len(), "wrote corpus file");
            written.push(path);
        }
        Ok(written)
    }
}

/// Read and extract a benchmark JSON file
pub fn import_benchmark(
    path: &Path,
    benchmark: Benchmark,
    options: &ImportOptions,
) -> Result<Vec<BenchmarkCase>, ImportError> {
    let json = fs::read_to_string(path).map_err(|source| ImportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let cases = parse_benchmark(&json, benchmark, options)?;
    info!(path = %path.display(), %benchmark, cases = cases.len(), "imported benchmark");
    Ok(cases)
}

/// Extract test cases from benchmark JSON text
pub fn parse_benchmark(
    json: &str,
    benchmark: Benchmark,
    options: &ImportOptions,
) -> Result<Vec<BenchmarkCase>, ImportError> {
    match benchmark {
        Benchmark::Drop => parse_drop(json, options),
        Benchmark::Hotpot => parse_hotpot(json, options),
        Benchmark::Squad2 => parse_squad(json, options),
    }
}

#[derive(Debug, Deserialize)]
struct QuestionItem {
    question: String,
}

#[derive(Debug, Deserialize)]
struct DropCase {
    passage: String,
    qa_pairs: Vec<QuestionItem>,
}

#[derive(Debug, Deserialize)]
struct HotpotCase {
    level: String,
    question: String,
    context: Vec<(String, Vec<String>)>,
    supporting_facts: Vec<(String, Value)>,
}

#[derive(Debug, Deserialize)]
struct SquadFile {
    data: Vec<SquadArticle>,
}

#[derive(Debug, Deserialize)]
struct SquadArticle {
    title: String,
    paragraphs: Vec<SquadParagraph>,
}

#[derive(Debug, Deserialize)]
struct SquadParagraph {
    context: String,
    qas: Vec<QuestionItem>,
}

fn parse_drop(json: &str, options: &ImportOptions) -> Result<Vec<BenchmarkCase>, ImportError> {
    // Keyed by case id; file order is kept
    let source: Map<String, Value> = serde_json::from_str(json)?;

    let mut cases = Vec::with_capacity(source.len());
    for value in source.into_iter().map(|(_, v)| v) {
        let drop_case: DropCase = serde_json::from_value(value)?;
        let mut case = BenchmarkCase::default();
        if options.includes(ContentKind::Contexts) {
            case.contexts.push(drop_case.passage.trim().to_string());
        }
        if options.includes(ContentKind::Questions) {
            case.questions = drop_case
                .qa_pairs
                .iter()
                .map(|qa| qa.question.trim().to_string())
                .collect();
        }
        cases.push(case);
    }
    Ok(cases)
}

fn parse_hotpot(json: &str, options: &ImportOptions) -> Result<Vec<BenchmarkCase>, ImportError> {
    let source: Vec<HotpotCase> = serde_json::from_str(json)?;

    let mut cases = Vec::new();
    for hotpot_case in source {
        if !options.hotpot_levels.iter().any(|l| *l == hotpot_case.level) {
            continue;
        }

        let mut case = BenchmarkCase::default();
        if options.includes(ContentKind::Contexts) {
            let supporting: Vec<&str> = hotpot_case
                .supporting_facts
                .iter()
                .map(|(title, _)| title.as_str())
                .collect();
            case.contexts = hotpot_case
                .context
                .iter()
                .filter(|(title, _)| options.hotpot_distractors || supporting.contains(&title.as_str()))
                .map(|(_, sentences)| sentences.join(" ").trim().to_string())
                .collect();
        }
        if options.includes(ContentKind::Questions) {
            case.questions.push(hotpot_case.question.trim().to_string());
        }
        cases.push(case);
    }
    Ok(cases)
}

fn parse_squad(json: &str, options: &ImportOptions) -> Result<Vec<BenchmarkCase>, ImportError> {
    let source: SquadFile = serde_json::from_str(json)?;

    let mut cases = Vec::new();
    for article in source.data {
        for paragraph in article.paragraphs {
            let mut case = BenchmarkCase::default();
            if options.includes(ContentKind::Titles) {
                case.titles.push(article.title.clone());
            }
            if options.includes(ContentKind::Contexts) {
                case.contexts.push(paragraph.context.trim().to_string());
            }
            if options.includes(ContentKind::Questions) {
                case.questions = paragraph
                    .qas
                    .iter()
                    .map(|qa| qa.question.trim().to_string())
                    .collect();
            }
            cases.push(case);
        }
    }
    Ok(cases)
}

fn single_line(text: &str) -> String {
    text.split(['\n', '\r']).filter(|s| !s.is_empty()).collect::<Vec<_>>().join(" ")
}

/// Benchmark import errors
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("Failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Benchmark JSON does not have the expected layout: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unknown benchmark '{0}': expected drop, hotpot or squad2")]
    UnknownBenchmark(String),

    #[error("Unknown content kind '{0}': expected titles, contexts or questions")]
    UnknownContentKind(String),
}
