//! ## Sets up logging by reading configuration from environment variables.
//!
//! Environment variables used:
//! - LOG_MODE: "stdout" (default) or "file"
//! - LOG_FILE_PATH: when using file mode, the path of the log file (default "logs/relayer.log")
//! - RUST_LOG: optional filter directives layered over the configured log level

use std::{
    env,
    fs::{create_dir_all, File},
    io,
    path::Path,
    sync::Mutex,
};

use chrono::Utc;
use thiserror::Error;
use tracing::info;
use tracing_subscriber::{filter::LevelFilter, EnvFilter};

use crate::constants::{DEFAULT_LOG_FILE_PATH, DEFAULT_LOG_MODE};

#[derive(Error, Debug)]
pub enum LoggingError {
    #[error("Invalid log level {0}")]
    InvalidLevel(String),
    #[error("Unable to create log file {path}: {source}")]
    File {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("Failed to initialize logger: {0}")]
    Init(String),
}

/// Filter with `level` as the default directive, refined by `RUST_LOG`.
pub fn build_filter(level: &str) -> Result<EnvFilter, LoggingError> {
    let level: LevelFilter = level
        .parse()
        .map_err(|_| LoggingError::InvalidLevel(level.to_string()))?;
    Ok(EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy())
}

/// Appends the UTC date to the configured log file path.
pub fn rolled_file_path(base_file_path: &str, date_str: &str) -> String {
    match base_file_path.strip_suffix(".log") {
        Some(trimmed) => format!("{}-{}.log", trimmed, date_str),
        None => format!("{}-{}.log", base_file_path, date_str),
    }
}

pub fn setup_logging(level: &str) -> Result<(), LoggingError> {
    let log_mode = env::var("LOG_MODE").unwrap_or_else(|_| DEFAULT_LOG_MODE.to_string());
    let filter = build_filter(level)?;

    if log_mode.to_lowercase() == "file" {
        let base_file_path =
            env::var("LOG_FILE_PATH").unwrap_or_else(|_| DEFAULT_LOG_FILE_PATH.to_string());
        let date_str = Utc::now().format("%Y-%m-%d").to_string();
        let rolled_file_path = rolled_file_path(&base_file_path, &date_str);

        if let Some(parent) = Path::new(&rolled_file_path).parent() {
            create_dir_all(parent).map_err(|source| LoggingError::File {
                path: rolled_file_path.clone(),
                source,
            })?;
        }
        let log_file = File::create(&rolled_file_path).map_err(|source| LoggingError::File {
            path: rolled_file_path.clone(),
            source,
        })?;

        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_writer(Mutex::new(log_file))
            .try_init()
            .map_err(|e| LoggingError::Init(e.to_string()))?;
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .try_init()
            .map_err(|e| LoggingError::Init(e.to_string()))?;
    }

    info!(mode = %log_mode, level, "logging is successfully configured");
    Ok(())
}
