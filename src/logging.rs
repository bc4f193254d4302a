//! Logging setup
//!
//! Logs go to stderr and, optionally, to a daily-rotated file. `RUST_LOG`
//! takes precedence over the configured level.

use crate::config::LoggingConfig;
use crate::error::{RemoError, Result};
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::{fmt, layer::SubscriberExt, EnvFilter, Layer};

/// Runtime logging configuration
#[derive(Debug, Clone)]
pub struct LogConfig {
    pub level: Level,
    pub file_path: Option<PathBuf>,
    pub stderr: bool,
    pub json: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            file_path: None,
            stderr: true,
            json: false,
        }
    }
}

/// Parse a level name, falling back to INFO
pub fn parse_level(name: &str) -> Level {
    name.trim().parse().unwrap_or(Level::INFO)
}

impl LogConfig {
    /// Build from the file/env configuration section
    pub fn from_settings(settings: &LoggingConfig) -> Self {
        Self {
            level: parse_level(&settings.level),
            file_path: settings.file.clone(),
            stderr: settings.stderr,
            json: settings.json,
        }
    }

    /// Apply `REMO_LOG_FILE`, `REMO_LOG_STDERR` and `REMO_LOG_JSON`
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(log_file) = std::env::var("REMO_LOG_FILE") {
            self.file_path = Some(PathBuf::from(log_file));
        }

        if let Ok(log_stderr) = std::env::var("REMO_LOG_STDERR") {
            self.stderr = log_stderr.to_lowercase() != "false";
        }

        if let Ok(log_json) = std::env::var("REMO_LOG_JSON") {
            self.json = matches!(log_json.to_lowercase().as_str(), "1" | "true");
        }

        self
    }

    /// Raise verbosity to DEBUG
    pub fn verbose(mut self, verbose: bool) -> Self {
        if verbose {
            self.level = Level::DEBUG;
        }
        self
    }
}

/// Install the global subscriber
pub fn init_logging(config: LogConfig) -> Result<()> {
    let env_filter = EnvFilter::builder()
        .with_default_directive(config.level.into())
        .from_env_lossy();

    let stderr_layer = config.stderr.then(|| {
        if config.json {
            fmt::layer().json().with_writer(std::io::stderr).boxed()
        } else {
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .boxed()
        }
    });

    let file_layer = match &config.file_path {
        Some(file_path) => {
            let directory = file_path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| std::path::Path::new("."));
            std::fs::create_dir_all(directory)?;

            let file_name = file_path
                .file_name()
                .unwrap_or_else(|| std::ffi::OsStr::new("remo-commander.log"));
            let appender = tracing_appender::rolling::daily(directory, file_name);

            Some(fmt::layer().with_writer(appender).with_ansi(false).boxed())
        }
        None => None,
    };

    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .with(file_layer);

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| RemoError::config(format!("Failed to install logger: {e}")))
}
