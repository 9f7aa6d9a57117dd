//! Structured logging setup.
//!
//! The crate itself only emits `tracing` events (request URLs, retry
//! decisions, failure acknowledgements); these helpers install a formatted
//! subscriber for applications that have not set one up themselves. Filter
//! with the standard `RUST_LOG` variable, e.g.
//! `RUST_LOG=ebay_shopping=debug`.

use tracing_subscriber::EnvFilter;

/// Installs a formatted `tracing` subscriber filtered by `RUST_LOG`.
///
/// # Errors
///
/// Fails when a global subscriber is already installed.
pub fn try_init_logging() -> Result<(), Box<dyn std::error::Error + Send + Sync + 'static>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .try_init()
}

/// Like [`try_init_logging`] but ignores an already installed subscriber.
pub fn init_logging() {
    let _ = try_init_logging();
}
