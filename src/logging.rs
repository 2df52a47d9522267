//! Logging setup shared by the binaries.
//!
//! Everything logs through `tracing`. Verbose mode starts at `debug` and
//! lets `RUST_LOG` override it; otherwise the level is fixed so a stray
//! `RUST_LOG` in the environment cannot flood the console.
//!
//! `fbpaint` draws straight onto the console's framebuffer, so anything
//! printed to stderr while it runs lands on top of the picture. Passing a
//! log file routes output there through a non-blocking `tracing-appender`
//! writer instead; the returned guard must be kept alive until exit so the
//! last lines get flushed.

use std::fs::OpenOptions;
use std::io;
use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Build the level filter.
fn filter(verbose: bool, quiet_level: &str) -> EnvFilter {
    if verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::new(quiet_level)
    }
}

/// Install the global subscriber.
///
/// Without `log_file`, output goes to stderr at `warn` (or `debug` when
/// verbose). With it, output is appended to the file at `info` (or `debug`).
/// Calling this twice is harmless; the second call changes nothing.
///
/// # Errors
///
/// Returns an error if the log file cannot be opened.
pub fn init(verbose: bool, log_file: Option<&Path>) -> io::Result<Option<WorkerGuard>> {
    match log_file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            let (writer, guard) = tracing_appender::non_blocking(file);
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter(verbose, "info"))
                .with_writer(writer)
                .with_ansi(false)
                .try_init();
            Ok(Some(guard))
        }
        None => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter(verbose, "warn"))
                .with_writer(io::stderr)
                .try_init();
            Ok(None)
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
