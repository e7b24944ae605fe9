//! Structured JSON logging.

use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber with JSON output.
///
/// `RUST_LOG` takes precedence; `fallback` is used when it is unset or
/// unparseable (e.g. "info,courseway=debug").
///
/// # Panics
///
/// Panics if a global subscriber is already installed.
pub fn init_logging(fallback: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(fallback))
        .unwrap_or_else(|e| {
            eprintln!("FATAL: invalid log filter {fallback:?}: {e}");
            std::process::exit(1);
        });

    tracing_subscriber::fmt()
        .json()
        .flatten_event(true)
        .with_file(true)
        .with_line_number(true)
        .with_env_filter(filter)
        .init();

    tracing::info!(fallback = %fallback, "Logging initialized");
}
