//! Diagnostic logging setup.

use std::io;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

/// Environment variable holding the filter directives (`debug`, `labgrade=trace`, ...).
pub const LOG_ENV: &str = "LABGRADE_LOG";

const DEFAULT_FILTER: &str = "warn";

/// Install the global subscriber: compact lines on stderr, filtered by
/// `LABGRADE_LOG`. Calling it twice is harmless.
pub fn init() {
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let fmt_layer = fmt::layer()
        .with_writer(io::stderr)
        .with_target(false)
        .compact();

    // a second init (tests calling run() twice) is not an error for us
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}
