//! Tracing subscriber setup
//!
//! `RUST_LOG` selects the filter (default `info`). Output goes to stderr so
//! stdout stays clean for reports.

use tracing_subscriber::{fmt, EnvFilter};

/// Install the global subscriber, human-readable or JSON lines
pub fn init(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_line_number(true);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

/// Subscriber for tests: debug level, captured by the test harness
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}
