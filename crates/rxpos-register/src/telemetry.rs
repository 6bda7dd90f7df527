//! # Logging Setup
//!
//! Installs the global tracing subscriber.
//!
//! ## Log Levels
//! - `RUST_LOG=debug` - Show debug messages from everything
//! - `RUST_LOG=rxpos=trace` - Trace for the rxpos crates only
//! - Default: `info,rxpos=debug`

use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset or unparsable.
pub const DEFAULT_LOG_FILTER: &str = "info,rxpos=debug";

/// Initializes the tracing subscriber for structured logging.
///
/// Safe to call more than once: returns `false` when a global subscriber
/// was already installed (by an earlier call, a test harness or the host
/// application).
pub fn init_tracing() -> bool {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    match tracing_subscriber::fmt().with_env_filter(filter).try_init() {
        Ok(()) => true,
        Err(e) => {
            debug!("Tracing subscriber already installed: {}", e);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_does_not_panic() {
        init_tracing();
        assert!(!init_tracing());
    }
}
