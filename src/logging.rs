//! Logging setup shared by the presentation shells.

use std::io;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the tracing subscriber.
///
/// Use the RUST_LOG env var to control the log level (e.g. RUST_LOG=debug);
/// defaults to `warn`. Logs go to stderr so TUI shells keep stdout clean.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}
