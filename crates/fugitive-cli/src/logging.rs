//! Tracing subscriber setup.

use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

/// Picks the filter directive: `-v` forces `debug`, then `RUST_LOG`, then
/// the configured filter.
pub fn filter_directive(verbose: bool, rust_log: Option<&str>, config: &LoggingConfig) -> String {
    if verbose {
        return "debug".to_string();
    }
    match rust_log {
        Some(env) if !env.trim().is_empty() => env.to_string(),
        _ => config.filter.clone(),
    }
}

/// Installs the global subscriber, writing to stderr so command output on
/// stdout stays clean.
pub fn init(verbose: bool, config: &LoggingConfig) {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let directive = filter_directive(verbose, rust_log.as_deref(), config);
    let filter = EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
