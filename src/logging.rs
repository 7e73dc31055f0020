use std::fs;
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::error::{Result, ZipCleanError};

/// Initializes logging to the event log file (JSON) and the console.
///
/// `RUST_LOG` wins when set; otherwise the crate logs at `info`, or `debug`
/// when `debug` is true. The returned guard must be held until exit so the
/// file writer is flushed.
pub fn init_logging(log_file: &Path, debug: bool) -> Result<WorkerGuard> {
    let file_appender = file_appender(log_file)?;
    let (non_blocking_writer, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = fmt::layer().json().with_writer(non_blocking_writer);

    let console_layer = fmt::layer()
        .with_target(true)
        .with_writer(std::io::stdout);

    let default_directive = if debug { "zipclean=debug,info" } else { "zipclean=info,warn" };
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(console_layer)
        .try_init()
        .map_err(|e| ZipCleanError::Logging(e.to_string()))?;

    Ok(guard)
}

/// Appender writing to exactly `log_file`, creating its directory first
fn file_appender(log_file: &Path) -> Result<RollingFileAppender> {
    let directory = log_file
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let file_name = log_file
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "zipclean.log".to_string());

    fs::create_dir_all(directory).map_err(|e| {
        ZipCleanError::Logging(format!(
            "could not create log directory '{}': {}",
            directory.display(),
            e
        ))
    })?;

    RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(file_name)
        .build(directory)
        .map_err(|e| {
            ZipCleanError::Logging(format!("could not open log file '{}': {}", log_file.display(), e))
        })
}
