//! Log file setup.
//!
//! Every run truncates the log file and writes to it through a
//! non-blocking appender. `-v` mirrors events to stderr as well.

use std::fs::File;
use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

use crate::error::CliError;

const DEFAULT_FILE_FILTER: &str = "warn,picfg=debug,picfg_core=debug,picfg_api=debug,picfg_config=debug";

/// Install the global subscriber. Keep the returned guard alive until the
/// run ends so buffered lines reach the file.
pub fn init(log_file: &Path, verbosity: u8) -> Result<WorkerGuard, CliError> {
    let file = File::create(log_file).map_err(|e| CliError::io(log_file, e))?;
    let (writer, guard) = tracing_appender::non_blocking(file);

    let file_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILE_FILTER));
    let file_layer = fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_target(false)
        .with_filter(file_filter);

    let stderr_layer = (verbosity > 0).then(|| {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_filter(stderr_level(verbosity))
    });

    // A second init (tests) keeps the first subscriber.
    let _ = tracing_subscriber::registry()
        .with(file_layer)
        .with(stderr_layer)
        .try_init();

    Ok(guard)
}

fn stderr_level(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 | 1 => LevelFilter::WARN,
        2 => LevelFilter::INFO,
        3 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}
