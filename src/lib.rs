//! # Corpus Search: wildcard search over QA benchmark corpora
//!
//! Search a named text corpus for a pattern, view matching entries with the
//! match highlighted, and inspect match and vocabulary statistics.
//!
//! ## Query Syntax
//!
//! - Plain text matches whole tokens only: `cat` does not match `cats`
//! - `*` stands for one or more in-token characters: `cat*` → `cats`, `cat's`
//! - `|` separates alternatives: `cat|dog`
//! - A leading `^` matches at the start of an entry: `^What`
//! - `\ ( ) [ ] ? $ +` are refused, as are `*` and `^` on their own
//!
//! ## Example Usage
//!
//! ```no_run
//! use corpus_search::{CorpusSearch, SearchConfig, SearchOutcome};
//!
//! let config = SearchConfig::default().with_data_dir("data");
//! let search = CorpusSearch::new(&config)?;
//!
//! match search.search("HotpotQA Questions", "which*", false, None)? {
//!     SearchOutcome::Matches(report) => {
//!         println!("{}", report.summary);
//!         for line in &report.display {
//!             println!("{}", line);
//!         }
//!     }
//!     SearchOutcome::Rejected(warning) => println!("{}", warning),
//!     _ => println!("No matches"),
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Architecture
//!
//! - **Corpus Loader** ([`data`], [`vocab`]) - Reads `.txt` / `.tsv` sources and counts vocabulary
//! - **Corpus Cache** ([`cache`]) - Keeps the current corpus, loads serialized
//! - **Pattern Compiler** ([`pattern`]) - Validates queries and builds whole-token regexes
//! - **Match Engine** ([`matcher`]) - Counts matches per token and per entry, with range filtering
//! - **Result Renderer** ([`highlight`]) - Marks matched tokens in display text
//! - **CorpusSearch API** ([`search`]) - Main entry point combining all components

pub mod cache;
pub mod config;
pub mod data;
pub mod export;
pub mod highlight;
pub mod import;
pub mod logging;
pub mod matcher;
pub mod pattern;
pub mod search;
pub mod stats;
pub mod types;
pub mod vocab;

// Re-export main types and functions for convenience
pub use cache::CorpusCache;
pub use config::{CompositeSource, ConfigError, SearchConfig};
pub use data::{load_source, Corpus, SourceFile, SourceRegistry, SourceSpec};
pub use highlight::{HighlightMarkers, Highlighter};
pub use matcher::MatchEngine;
pub use pattern::{compile_query, parse_query, pattern_to_regex, CompiledPattern, WildcardClass};
pub use search::{CorpusSearch, SearchOutcome, SearchReport, SetupError};
pub use stats::{FrequencyRow, Percentage, Summary};
pub use types::{
    CorpusError, DisplayEntry, Entry, MatchResult, QueryRejection, RangeError, ScoreRange,
    SourceFormat,
};
pub use vocab::VocabularyTable;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
