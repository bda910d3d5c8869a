//! Logging system initialization
//!
//! Sets up tracing-based logging with file output under the appliance data
//! directory and rotation on startup, keeping a short history of previous
//! sessions. Each boot of the device gets its own log file.

use crate::error::{CamdeckError, Result, StringError};
use std::path::{Path, PathBuf};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt};

/// Number of historical log files to keep (camdeck.log.1 through .5)
const MAX_LOG_FILES: u8 = 5;

/// Initialize the logging system, writing to `<data_dir>/camdeck.log`
///
/// Log level defaults to INFO and can be overridden via `RUST_LOG`.
/// Existing logs are rotated so each session starts a fresh file.
pub fn init_logging(data_dir: &Path) -> Result<()> {
    std::fs::create_dir_all(data_dir)?;

    let log_path = data_dir.join("camdeck.log");
    rotate_logs_on_startup(&log_path)?;

    // tracing_appender's rolling rotation is time-based; session-based
    // rotation is handled above, so the appender itself never rotates
    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix("camdeck")
        .filename_suffix("log")
        .build(data_dir)
        .map_err(|e| CamdeckError::Logging(Box::new(e)))?;

    let subscriber = fmt()
        .with_writer(file_appender)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_ansi(false)
        .with_target(true)
        .with_thread_names(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| CamdeckError::Logging(Box::new(e)))?;

    tracing::info!("camdeck v{} started", env!("CARGO_PKG_VERSION"));

    Ok(())
}

/// Rotate log files on startup
///
/// camdeck.log.5 is deleted, each numbered file shifts up by one, and the
/// current camdeck.log becomes camdeck.log.1. A fresh camdeck.log is then
/// created by the appender.
fn rotate_logs_on_startup(log_path: &PathBuf) -> Result<()> {
    if !log_path.exists() {
        return Ok(());
    }

    let log_dir = log_path
        .parent()
        .ok_or_else(|| CamdeckError::Logging(StringError::new("Invalid log path")))?;

    let log_name = log_path
        .file_name()
        .ok_or_else(|| CamdeckError::Logging(StringError::new("Invalid log filename")))?
        .to_string_lossy();

    let oldest_log = log_dir.join(format!("{log_name}.{MAX_LOG_FILES}"));
    if oldest_log.exists() {
        std::fs::remove_file(&oldest_log)?;
    }

    for i in (1..MAX_LOG_FILES).rev() {
        let current_log = log_dir.join(format!("{log_name}.{i}"));
        let next_log = log_dir.join(format!("{log_name}.{}", i + 1));

        if current_log.exists() {
            std::fs::rename(&current_log, &next_log)?;
        }
    }

    let log_1 = log_dir.join(format!("{log_name}.1"));
    std::fs::rename(log_path, &log_1)?;

    Ok(())
}
