//! Structured logging setup.

use tracing_subscriber::fmt;
use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset and no level is requested
pub const DEFAULT_DIRECTIVE: &str = "jab_fixtures=info";

/// Build the filter: `RUST_LOG` wins, then `directive`.
#[must_use]
pub fn filter(directive: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive))
}

/// Install a stderr fmt subscriber.
///
/// Returns `false` if a global subscriber was already set, which is expected
/// when several tests initialize logging.
pub fn init(directive: &str) -> bool {
    fmt()
        .with_env_filter(filter(directive))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .is_ok()
}
