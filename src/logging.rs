//! Logging initialization for the pacetrack CLI
//!
//! Library code emits through `tracing` macros only; the binary decides
//! where that goes. `RUST_LOG` overrides the verbosity flag when set.

use tracing_subscriber::EnvFilter;

/// Map the `-v` counter to a default filter level.
pub fn filter_for_verbosity(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Install the global subscriber. Safe to call more than once; later calls
/// are ignored.
pub fn init(verbosity: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_for_verbosity(verbosity)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .try_init();
}
