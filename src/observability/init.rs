//! Tracing initialization and subscriber setup.
//!
//! Builds a `tracing-subscriber` registry with an [`EnvFilter`] and a single
//! `fmt` layer. Output goes to a rotating log file by default so log lines do
//! not interleave with the dashboard on stdout.

use super::file_writer::FileWriter;
use crate::infrastructure::paths;
use crate::{Config, LogFormat};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// File name of the default log inside the data directory.
pub const LOG_FILE_NAME: &str = "cryptodash.log";

/// `log_file` value that selects stderr instead of a file.
pub const STDERR_SINK: &str = "-";

/// Initializes the global tracing subscriber.
///
/// # Level Resolution
///
/// 1. `RUST_LOG` if set and valid
/// 2. `config.log_level`
///
/// # Sink
///
/// `config.log_file` if set (`-` means stderr), otherwise
/// `<data dir>/cryptodash.log`. If the log directory cannot be created the
/// subscriber falls back to stderr.
///
/// Idempotent: only the first call installs a subscriber.
///
/// # Example
///
/// ```rust
/// use cryptodash::observability::init_tracing;
/// use cryptodash::Config;
///
/// let config = Config {
///     log_file: Some("-".to_string()),
///     ..Default::default()
/// };
/// init_tracing(&config);
///
/// tracing::debug!("tracing is now active");
/// ```
pub fn init_tracing(config: &Config) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    let writer = make_writer(log_path(config));

    let registry = tracing_subscriber::registry().with(filter);
    let installed = match config.log_format {
        LogFormat::Pretty => registry
            .with(
                fmt::layer()
                    .with_writer(writer)
                    .with_ansi(false)
                    .with_target(true),
            )
            .try_init(),
        LogFormat::Json => registry
            .with(
                fmt::layer()
                    .with_writer(writer)
                    .json()
                    .flatten_event(true)
                    .with_current_span(true),
            )
            .try_init(),
    };

    if installed.is_ok() {
        tracing::debug!(level = %config.log_level, format = ?config.log_format, "tracing initialized");
    }
}

/// Resolves the log destination; `None` means stderr.
#[must_use]
pub fn log_path(config: &Config) -> Option<PathBuf> {
    match config.log_file.as_deref() {
        Some(STDERR_SINK) => None,
        Some(path) => Some(PathBuf::from(paths::expand_tilde(path))),
        None => Some(paths::get_data_dir().join(LOG_FILE_NAME)),
    }
}

fn make_writer(path: Option<PathBuf>) -> BoxMakeWriter {
    let Some(path) = path else {
        return BoxMakeWriter::new(std::io::stderr);
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        if std::fs::create_dir_all(parent).is_err() {
            return BoxMakeWriter::new(std::io::stderr);
        }
    }

    BoxMakeWriter::new(Arc::new(FileWriter::new(path)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dash_selects_stderr() {
        let config = Config {
            log_file: Some("-".to_string()),
            ..Config::default()
        };
        assert_eq!(log_path(&config), None);
    }

    #[test]
    fn default_log_lives_in_data_dir() {
        let path = log_path(&Config::default()).unwrap();
        assert!(path.ends_with(LOG_FILE_NAME));
        assert!(path.starts_with(paths::get_data_dir()));
    }
}
