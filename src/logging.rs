//! Logging setup.
//!
//! Structured logging via `tracing`, filtered by the `TREESUM_LOG`
//! environment variable (standard `tracing_subscriber` directive syntax).
//! Events go to stderr so stdout stays reserved for command output.

use tracing_subscriber::{fmt, EnvFilter};

/// Filter applied when `TREESUM_LOG` is unset.
const DEFAULT_FILTER: &str = "warn";

/// Initialize the global subscriber. Later calls are no-ops, so tests and
/// embedding callers may call this freely.
pub fn init() {
    let filter = EnvFilter::try_from_env("TREESUM_LOG")
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .try_init();
}
