//! Crate-level error type.

use thiserror::Error;

use crate::fetcher::FetchError;

/// Errors surfaced by the tracker outside of a single fetch.
#[derive(Debug, Error)]
pub enum TrackerError {
    /// A polling cycle failed.
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Invalid configuration.
    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

impl TrackerError {
    /// Shorthand for a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        TrackerError::Configuration {
            message: message.into(),
        }
    }
}

/// Result type for tracker operations.
pub type Result<T> = std::result::Result<T, TrackerError>;
