//! Error types for the dashboard.
//!
//! This module defines the centralized error type [`DashboardError`], the
//! remote-fetch failure taxonomy [`FetchError`], and the [`Result`] alias used
//! throughout the crate. All errors are implemented with `thiserror`.

use thiserror::Error;

/// The main error type for dashboard operations.
///
/// Fetch failures are normally absorbed by the fetch controller and turned
/// into state; this type is what surfaces from the outer shell (configuration
/// loading, terminal I/O, one-shot CLI commands).
///
/// # Examples
///
/// ```
/// use cryptodash::domain::DashboardError;
///
/// fn validate_config() -> Result<(), DashboardError> {
///     Err(DashboardError::Config("per_page must be positive".to_string()))
/// }
/// ```
#[derive(Debug, Error)]
pub enum DashboardError {
    /// A remote fetch failed outside the controller (one-shot commands).
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// Filesystem or I/O operation failed.
    ///
    /// Wraps errors from standard library I/O operations, such as reading the
    /// configuration file or creating the log directory.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration is invalid or missing.
    ///
    /// The string describes the specific configuration problem.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Failure of a single remote fetch attempt.
///
/// Callers that only render state see the [`Display`](std::fmt::Display)
/// message; the variant is kept so the capture point can log which layer
/// failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// The remote answered with a non-2xx status.
    #[error("HTTP error! status: {status}")]
    Http {
        /// The HTTP status code returned.
        status: u16,
    },

    /// Request construction, network, timeout, or body decoding failed.
    #[error("{0}")]
    Transport(String),
}

impl FetchError {
    /// Short label of the failure class, used as a structured log field.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Http { .. } => "http",
            Self::Transport(_) => "transport",
        }
    }
}

/// A specialized `Result` type for dashboard operations.
pub type Result<T> = std::result::Result<T, DashboardError>;

/// Result of a single remote call.
pub type FetchResult<T> = std::result::Result<T, FetchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_error_message_carries_status() {
        let err = FetchError::Http { status: 500 };
        assert_eq!(err.to_string(), "HTTP error! status: 500");
        assert_eq!(err.kind(), "http");
    }

    #[test]
    fn transport_error_message_is_verbatim() {
        let err = FetchError::Transport("connection refused".to_string());
        assert_eq!(err.to_string(), "connection refused");
        assert_eq!(err.kind(), "transport");
    }

    #[test]
    fn fetch_error_converts_into_dashboard_error() {
        let err: DashboardError = FetchError::Http { status: 429 }.into();
        assert_eq!(err.to_string(), "Fetch error: HTTP error! status: 429");
    }
}
