// Corpus Search Logging
// tracing subscriber setup for the command-line tool

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset
pub fn default_filter(verbose: bool) -> &'static str {
    if verbose {
        "corpus_search=debug"
    } else {
        "corpus_search=warn"
    }
}

/// Install a stderr subscriber; `RUST_LOG` overrides the default filter
///
/// Returns false if a global subscriber was already installed.
pub fn init(verbose: bool) -> bool {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter(verbose)));

    let subscriber = tracing_subscriber::registry().with(env_filter).with(
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false),
    );

    if subscriber.try_init().is_err() {
        return false;
    }

    tracing::debug!("tracing initialized");
    true
}
