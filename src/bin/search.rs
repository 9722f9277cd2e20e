// Corpus Search CLI Tool
// Command-line interface for searching and inspecting corpora

use clap::{Parser, Subcommand};
use corpus_search::export::{annotation_rows, write_rows};
use corpus_search::import::{import_benchmark, Benchmark, ContentCollection, ContentKind, ImportOptions};
use corpus_search::stats::{FrequencyRow, Percentage};
use corpus_search::{
    logging, CorpusSearch, HighlightMarkers, ScoreRange, SearchConfig, SearchOutcome, SearchReport,
};
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

/// Corpus Search Tool - Search QA benchmark corpora with wildcard patterns
#[derive(Parser, Debug)]
#[command(name = "corpus-search")]
#[command(about = "Search QA benchmark corpora with wildcard patterns", long_about = None)]
#[command(version)]
struct Args {
    /// Directory holding .txt and .tsv corpus sources
    #[arg(short, long, global = true, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// JSON config file
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Show detailed information
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List available corpus sources
    Sources,

    /// Search a source for a pattern
    Search {
        /// Source label, e.g. "HotpotQA Questions"
        source: String,

        /// Search pattern
        /// - Plain text: whole tokens (e.g., "cat")
        /// - "*": wildcard (e.g., "cat*")
        /// - "|": alternatives (e.g., "cat|dog")
        /// - Leading "^": start of entry (e.g., "^What")
        #[arg(value_name = "PATTERN")]
        query: String,

        /// Match case exactly
        #[arg(short, long)]
        case_sensitive: bool,

        /// Lowest complexity score to include (scored sources)
        #[arg(long, value_name = "SCORE")]
        min: Option<f64>,

        /// Highest complexity score to include (scored sources)
        #[arg(long, value_name = "SCORE")]
        max: Option<f64>,

        /// Maximum number of entries to display
        #[arg(short, long, default_value = "20")]
        limit: usize,

        /// Number of token table rows to display
        #[arg(short, long, default_value = "10")]
        top: usize,

        /// Write displayed entries to a tab-separated annotation file
        #[arg(long, value_name = "FILE")]
        export: Option<PathBuf>,

        /// Use the configured highlight markers instead of terminal colors
        #[arg(long)]
        plain: bool,
    },

    /// Show the vocabulary table of a source
    Vocab {
        source: String,

        /// Number of rows to display
        #[arg(short, long, default_value = "20")]
        top: usize,
    },

    /// Convert benchmark JSON into line-oriented corpus files
    Import {
        /// One of drop, hotpot, squad2
        benchmark: Benchmark,

        /// Benchmark JSON file
        json: PathBuf,

        /// Directory to write corpus files into
        #[arg(short, long)]
        out_dir: PathBuf,

        /// File name prefix (defaults to the benchmark name)
        #[arg(long)]
        prefix: Option<String>,

        /// Content to extract: titles, contexts, questions
        #[arg(long, value_delimiter = ',')]
        include: Vec<ContentKind>,

        /// HotpotQA difficulty levels to keep
        #[arg(long, value_delimiter = ',', default_value = "hard")]
        levels: Vec<String>,

        /// Keep HotpotQA distractor contexts
        #[arg(long)]
        distractors: bool,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    logging::init(args.verbose);

    let mut config = match &args.config {
        Some(path) => SearchConfig::from_json_file(path)?,
        None => SearchConfig::default(),
    };
    if let Some(dir) = &args.data_dir {
        config = config.with_data_dir(dir);
    }

    match args.command {
        Command::Sources => list_sources(&config),
        Command::Search {
            source,
            query,
            case_sensitive,
            min,
            max,
            limit,
            top,
            export,
            plain,
        } => {
            if !plain {
                config = config.with_highlight(HighlightMarkers::ansi());
            }
            let range = match (min, max) {
                (None, None) => None,
                (lower, upper) => Some(ScoreRange::new(lower.unwrap_or(0.0), upper.unwrap_or(1.0))?),
            };
            let search = CorpusSearch::new(&config)?;
            if args.verbose {
                println!("🔍 Searching '{}' for: {}", source, query);
            }
            let outcome = search.search(&source, &query, case_sensitive, range)?;
            print_outcome(&outcome, limit, top);

            if let (Some(path), Some(report)) = (export, outcome.report()) {
                let mut writer = BufWriter::new(File::create(&path)?);
                let rows = annotation_rows(report);
                write_rows(&mut writer, &rows)?;
                println!("💾 Exported {} entries to {}", rows.len(), path.display());
            }
            Ok(())
        }
        Command::Vocab { source, top } => {
            let search = CorpusSearch::new(&config)?;
            let corpus = search.corpus(&source)?;
            println!(
                "{}: {} entries, {} tokens, {} distinct words\n",
                corpus.source(),
                corpus.len(),
                corpus.token_count(),
                corpus.vocab_size()
            );
            print_table(&search.vocabulary(&source)?, top);
            Ok(())
        }
        Command::Import {
            benchmark,
            json,
            out_dir,
            prefix,
            include,
            levels,
            distractors,
        } => {
            let inclusions = if include.is_empty() {
                ContentKind::ALL.to_vec()
            } else {
                include
            };
            let options = ImportOptions {
                inclusions,
                hotpot_levels: levels,
                hotpot_distractors: distractors,
            };
            let cases = import_benchmark(&json, benchmark, &options)?;
            let collection = ContentCollection::from_cases(&cases);
            let prefix = prefix.unwrap_or_else(|| benchmark.to_string());
            let written = collection.write_corpus_files(&out_dir, &prefix, &options.inclusions)?;

            println!("✅ Imported {} test cases from {}", cases.len(), json.display());
            for path in written {
                println!("   {}", path.display());
            }
            Ok(())
        }
    }
}

fn list_sources(config: &SearchConfig) -> Result<(), Box<dyn std::error::Error>> {
    let search = CorpusSearch::new(config)?;
    if search.sources().is_empty() {
        println!("❌ No sources found in {}", config.data_dir.display());
        return Ok(());
    }

    for spec in search.sources().iter() {
        let kind = if spec.is_scored() { "scored" } else { "lines" };
        print!("{:<30} {:<8}", spec.label, kind);
        if spec.is_composite() {
            print!(" ({} files)", spec.files.len());
        }
        println!();
    }
    Ok(())
}

fn print_outcome(outcome: &SearchOutcome, limit: usize, top: usize) {
    match outcome {
        SearchOutcome::Rejected(warning) => println!("⚠️  {}", warning),
        SearchOutcome::NoMatches => println!("❌ No matches found."),
        SearchOutcome::OutsideRange(report) => {
            println!("✅ {}", report.summary);
            if let Some(range) = &report.range {
                println!("❌ None of the matching entries have a score in {}.", range.range);
            }
        }
        SearchOutcome::Matches(report) => print_report(report, limit, top),
    }
}

fn print_report(report: &SearchReport, limit: usize, top: usize) {
    println!("✅ {}\n", report.summary);

    let tokens = match &report.range {
        Some(range) => {
            println!("   In score range {}: {}\n", range.range, range.summary);
            &range.tokens
        }
        None => &report.tokens,
    };
    print_table(tokens, top);

    let shown = report.display.len().min(limit);
    println!("\nHere are the first {}:\n", shown);
    for (idx, line) in report.display.iter().take(limit).enumerate() {
        println!("{}. {}", idx + 1, line);
    }
}

fn print_table(rows: &[FrequencyRow], top: usize) {
    for row in rows.iter().take(top) {
        println!(
            "  {:<24} {:>8} {:>7}% {}",
            row.token,
            row.count,
            row.percent.to_string(),
            percent_bar(row.percent)
        );
    }
    if rows.len() > top {
        println!("  … {} more", rows.len() - top);
    }
}

/// Generate a visual share bar
fn percent_bar(percent: Percentage) -> String {
    let bar_len = 10;
    let fraction = percent.value().unwrap_or(0.0) / 100.0;
    let filled = (fraction * bar_len as f64).round() as usize;
    let mut bar = String::from("[");
    for i in 0..bar_len {
        if i < filled {
            bar.push('█');
        } else {
            bar.push('░');
        }
    }
    bar.push(']');
    bar
}
