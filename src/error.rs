//! Unified error handling for the sentinel crate
//!
//! Domain errors live next to the code that raises them ([`FetchError`] for
//! provider calls); this module wraps them into a single [`Error`] enum for
//! use across module boundaries.

use std::io;
use thiserror::Error;

/// Errors that can occur while querying the trend provider
#[derive(Error, Debug)]
pub enum FetchError {
    /// HTTP request error
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Request timeout (connect or read)
    #[error("Request timeout")]
    Timeout,

    /// Provider responded with a non-success status
    #[error("Provider returned status {0}")]
    ServerError(u16),

    /// Provider response could not be interpreted
    #[error("Invalid provider response: {0}")]
    InvalidResponse(String),
}

impl FetchError {
    /// Check if this error is transient (a later request may succeed)
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Http(_) | Self::Timeout => true,
            Self::ServerError(status) => matches!(status, 429 | 500 | 502 | 503 | 504),
            Self::InvalidResponse(_) => false,
        }
    }
}

/// Unified error type for the sentinel crate
#[derive(Error, Debug)]
pub enum Error {
    /// Trend provider errors
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// Configuration errors (bad catalog file, unknown disease)
    #[error("Config error: {0}")]
    Config(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP client errors outside the fetch path
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

/// Result type alias using the unified Error type
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recoverable_statuses() {
        assert!(FetchError::ServerError(429).is_recoverable());
        assert!(FetchError::ServerError(503).is_recoverable());
        assert!(!FetchError::ServerError(400).is_recoverable());
        assert!(!FetchError::ServerError(404).is_recoverable());
        assert!(FetchError::Timeout.is_recoverable());
    }

    #[test]
    fn test_fetch_error_converts_to_unified() {
        let err: Error = FetchError::Timeout.into();
        assert!(matches!(err, Error::Fetch(_)));
    }

    #[test]
    fn test_config_error_display() {
        let err = Error::config("Disease not configured");
        assert_eq!(err.to_string(), "Config error: Disease not configured");
    }
}
