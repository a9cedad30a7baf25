//! Logging setup for the tote CLI.
//!
//! Verbosity, in order of precedence:
//! 1. `--verbose`: DEBUG for the tote crates
//! 2. `--quiet`: errors only
//! 3. `RUST_LOG`
//! 4. INFO for the tote crates
//!
//! # Example
//!
//! ```rust,no_run
//! use tote_cli::logger::init_logger;
//!
//! init_logger(false, false, false);
//! tracing::info!("starting build");
//! ```

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const VERBOSE_FILTER: &str = "tote=debug,tote_bundler=debug,tote_config=debug,tote_cli=debug";
const QUIET_FILTER: &str = "error";
const DEFAULT_FILTER: &str = "tote=info,tote_bundler=info,tote_config=info,tote_cli=info";

/// Install the global tracing subscriber. Call once, before any logging.
pub fn init_logger(verbose: bool, quiet: bool, no_color: bool) {
    let filter = build_filter(verbose, quiet);

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .with_ansi(!no_color)
        .compact();

    // A second init (e.g. from tests) keeps the first subscriber.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}

fn build_filter(verbose: bool, quiet: bool) -> EnvFilter {
    if verbose {
        EnvFilter::new(VERBOSE_FILTER)
    } else if quiet {
        EnvFilter::new(QUIET_FILTER)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
    }
}
