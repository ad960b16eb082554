//! Tracing subscriber setup for binaries and tests.

use tracing_subscriber::EnvFilter;

/// Initialize the global tracing subscriber. Respects `RUST_LOG`;
/// defaults to `info`. Safe to call more than once.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
