//! Logging initialisation.
//!
//! Sets up a `tracing` registry with:
//! - an `EnvFilter` (`RUST_LOG` wins over the configured level)
//! - a human-readable layer on stderr, so stdout stays free for results
//! - an optional JSON file layer with daily rolling files in the data dir
//!
//! Standard `log` records are redirected into `tracing`.

use std::fs;
use std::io;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, EnvFilter, Layer};

/// File name prefix for rolling log files.
pub const LOG_FILE_NAME: &str = "statforge.log";

/// Logging section of the application config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset.
    pub level: String,
    /// Also write JSON logs to rolling files.
    pub file: bool,
    /// Override the log directory.
    pub directory: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            file: false,
            directory: None,
        }
    }
}

impl LoggingConfig {
    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.level = level.into();
        self
    }

    /// Resolved log directory (override or data dir default).
    pub fn log_dir(&self) -> PathBuf {
        self.directory.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .map(|d| d.join("statforge").join("logs"))
                .unwrap_or_else(|| PathBuf::from("logs"))
        })
    }

    /// Filter from `RUST_LOG`, else from `level`, else `warn`.
    pub fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(&self.level))
            .unwrap_or_else(|_| EnvFilter::new("warn"))
    }
}

/// Initialize the logging system.
///
/// Returns a `WorkerGuard` when the file layer is active; it must be kept
/// alive for the duration of the program so buffered logs are flushed.
/// Only the first call installs a subscriber; later calls return early.
pub fn init(config: &LoggingConfig) -> Option<WorkerGuard> {
    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(io::stderr)
        .with_target(false)
        .with_filter(config.env_filter());

    let (file_layer, guard) = if config.file {
        let log_dir = config.log_dir();
        if !log_dir.exists() {
            if let Err(e) = fs::create_dir_all(&log_dir) {
                eprintln!("Failed to create logs directory: {}", e);
            }
        }

        let file_appender = tracing_appender::rolling::daily(&log_dir, LOG_FILE_NAME);
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
        let layer = tracing_subscriber::fmt::layer()
            .with_writer(non_blocking)
            .json()
            .with_file(true)
            .with_line_number(true)
            .with_target(true)
            .with_filter(config.env_filter());
        (Some(layer), Some(guard))
    } else {
        (None, None)
    };

    let subscriber = tracing_subscriber::registry()
        .with(stderr_layer)
        .with(file_layer);
    if tracing::subscriber::set_global_default(subscriber).is_err() {
        return guard;
    }

    if let Err(e) = tracing_log::LogTracer::init() {
        eprintln!("Failed to initialize LogTracer: {}", e);
    }

    if config.file {
        log::info!(
            "Logging initialized. Writing to: {:?} (daily rolling)",
            config.log_dir().join(LOG_FILE_NAME)
        );
    }

    guard
}
