//! Tracing subscriber setup shared by both binaries
//!
//! Logs always go to stderr; stdout belongs to the command's own output.

use tracing_subscriber::EnvFilter;

/// Filter directive for a `-v` count
pub fn level_for(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace", // -vvv or more
    }
}

/// Build the filter, letting `RUST_LOG` win when it is set
pub fn env_filter(verbosity: u8) -> EnvFilter {
    match std::env::var("RUST_LOG") {
        Ok(directives) if !directives.trim().is_empty() => EnvFilter::new(directives),
        _ => EnvFilter::new(level_for(verbosity)),
    }
}

/// Install the global subscriber. A second call is a no-op.
pub fn init_logging(verbosity: u8) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter(verbosity))
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
