//! Tracing subscriber setup.

use std::fs::File;
use std::path::Path;
use std::sync::Mutex;

use tracing::warn;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

/// Level filter from `RUST_LOG`, or `info` when it is unset or invalid.
pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install the global `tracing` subscriber.
///
/// Events go to stdout and, if `log_file` can be created, to that file as
/// well (without ANSI colors). The level filter is read from `RUST_LOG` and
/// defaults to `info`.
///
/// Calling this more than once is harmless: later calls leave the first
/// subscriber in place.
pub fn init(log_file: Option<&Path>) {
    let file = log_file.and_then(|path| match File::create(path) {
        Ok(file) => Some(file),
        Err(e) => {
            eprintln!("Couldn't create log file {}: {e}", path.display());
            None
        },
    });

    let filter = env_filter();

    let result = tracing_subscriber::registry()
        .with(
            fmt::layer().event_format(
                fmt::format()
                    .with_level(true)
                    .with_thread_ids(true)
                    .with_file(true)
                    .with_line_number(true)
                    .with_thread_names(true),
            ),
        )
        .with(file.map(|file| {
            fmt::layer()
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true)
                .with_thread_names(true)
                .with_writer(Mutex::new(file))
                .with_ansi(false)
        }))
        .with(filter)
        .try_init();

    if let Err(e) = result {
        warn!("tracing subscriber already installed: {e}");
    }
}
