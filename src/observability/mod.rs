//! Logging setup for the binary.
//!
//! Everything goes to stderr so report output on stdout stays machine
//! readable. `RUST_LOG` takes precedence over `-v` flags.

use tracing_subscriber::EnvFilter;

/// Filter directive for a `-v` count
pub fn level_for_verbosity(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Install the global fmt subscriber. Safe to call more than once.
pub fn init_tracing(verbosity: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level_for_verbosity(verbosity)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(verbosity >= 2)
        .try_init();
}
