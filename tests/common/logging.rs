//! Logging for the integration tests.
//!
//! Every test starts the logging once with `INIT.call_once`. Logs go to
//! `stderr` so they don't mix with the test harness output. Raise the level
//! filter of a test to see the server logs while debugging it.
use std::sync::Once;

use tracing::level_filters::LevelFilter;

#[allow(dead_code)]
pub static INIT: Once = Once::new();

#[allow(dead_code)]
pub fn tracing_stderr_init(filter: LevelFilter) {
    let builder = tracing_subscriber::fmt()
        .with_max_level(filter)
        .with_ansi(true)
        .with_writer(std::io::stderr);

    builder.pretty().with_file(true).init();

    tracing::info!("Logging initialized");
}
