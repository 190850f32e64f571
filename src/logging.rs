//! Diagnostic logging to stderr.
//!
//! `RUST_LOG` takes precedence. Otherwise the level follows the number of
//! `-v` flags: warn, info, debug, trace.

use tracing_subscriber::EnvFilter;

/// Filter directive for a `-v` count.
pub fn default_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "noteboard=warn",
        1 => "noteboard=info",
        2 => "noteboard=debug",
        _ => "noteboard=trace",
    }
}

/// Install the global subscriber. Calling it twice is harmless.
pub fn init(verbosity: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_ansi(atty::is(atty::Stream::Stderr))
        .try_init();
}
