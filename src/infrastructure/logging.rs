use std::fs;
use std::path::Path;

use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use crate::domain::EngineError;

/// Initialize logging with console output and optional JSON file rotation.
///
/// The returned guard must stay alive for the life of the process; dropping
/// it flushes any buffered file output. `RUST_LOG` overrides the configured
/// level. When the log directory cannot be prepared, file output is dropped
/// with a warning and logging continues console-only.
pub fn init_logging(logs_dir: &Path, level: &str, file_logging: bool) -> Option<WorkerGuard> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("audioscribe={},warn", level)));

    // Console output goes to stderr so transcript text on stdout stays clean.
    let console_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_span_events(FmtSpan::NONE)
        .with_filter(env_filter);

    let file_writer = if file_logging {
        match open_file_writer(logs_dir) {
            Ok(writer) => Some(writer),
            Err(err) => {
                eprintln!(
                    "warning: file logging disabled, could not prepare {}: {err}",
                    logs_dir.display()
                );
                None
            }
        }
    } else {
        None
    };

    match file_writer {
        Some((non_blocking, guard)) => {
            let file_layer = tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .json()
                .with_span_events(FmtSpan::CLOSE)
                .with_filter(EnvFilter::new(format!("audioscribe={}", level)));

            // try_init so a second call (tests, embedded use) does not panic
            if tracing_subscriber::registry()
                .with(console_layer)
                .with(file_layer)
                .try_init()
                .is_ok()
            {
                tracing::info!(
                    logs_dir = ?logs_dir,
                    level = level,
                    "Logging initialized with file output"
                );
            }

            Some(guard)
        }
        None => {
            let _ = tracing_subscriber::registry()
                .with(console_layer)
                .try_init();

            tracing::info!(level = level, "Logging initialized (console only)");

            None
        }
    }
}

/// Prepare the daily-rolling appender behind a non-blocking writer.
fn open_file_writer(logs_dir: &Path) -> Result<(NonBlocking, WorkerGuard), EngineError> {
    fs::create_dir_all(logs_dir)?;
    // The builder reports an unwritable directory as an error where
    // `RollingFileAppender::new` would panic.
    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("audioscribe.log")
        .build(logs_dir)
        .map_err(|e| EngineError::Config(format!("could not open the log file: {e}")))?;
    Ok(tracing_appender::non_blocking(file_appender))
}
