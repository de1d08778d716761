//! Logging Infrastructure
//!
//! Structured logging setup for development (pretty, stdout) and production
//! (JSON, daily rolling file).

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Initialize the logger with stdout output only
pub fn init_logger(log_level: Option<&str>) {
    // stdout writer needs no guard
    let _ = init_logger_with_file(log_level, false, None);
}

/// Initialize the logger with optional file output
///
/// `RUST_LOG` takes precedence over `log_level`. When `log_dir` is given and
/// exists, logs go to a daily rolling file `order-server.<date>` in it; the
/// returned guard must be held until shutdown so buffered lines are flushed.
pub fn init_logger_with_file(
    log_level: Option<&str>,
    json: bool,
    log_dir: Option<&Path>,
) -> Option<WorkerGuard> {
    let level = log_level.unwrap_or("info");
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_target(true);

    if let Some(dir) = log_dir
        && dir.exists()
    {
        let file_appender = tracing_appender::rolling::daily(dir, "order-server");
        let (writer, guard) = tracing_appender::non_blocking(file_appender);
        let result = if json {
            builder.json().with_writer(writer).try_init()
        } else {
            builder.with_ansi(false).with_writer(writer).try_init()
        };
        if result.is_err() {
            // already initialised (tests, embedded use)
            return None;
        }
        return Some(guard);
    }

    let _ = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    None
}
