// Error types for steady-e2e

use crate::wait::WaitCondition;
use std::time::Duration;
use thiserror::Error;

/// Result type alias for steady-e2e operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while interacting with a page
#[derive(Debug, Error)]
pub enum Error {
    /// No candidate selector of a logical element resolved to a visible match
    ///
    /// Carries every selector that was tried, in preference order, and the
    /// scope the search ran in.
    #[error("Element '{element}' not found in {scope}; tried selectors: {}", selectors.join(" | "))]
    ElementNotFound {
        element: String,
        selectors: Vec<String>,
        scope: String,
    },

    /// A wait condition was not reached before its deadline
    #[error("Timeout after {elapsed:?} waiting for '{locator}' to be {condition}{detail}")]
    Timeout {
        locator: String,
        condition: WaitCondition,
        elapsed: Duration,
        /// Last engine error observed while polling, pre-formatted as `" (last error: ...)"`
        detail: String,
    },

    /// Every attempt of a retried operation failed
    ///
    /// The source is the failure of the final attempt.
    #[error("Gave up after {attempts} attempts: {source}")]
    RetryExhausted {
        attempts: u32,
        #[source]
        source: Box<Error>,
    },

    /// The automation engine rejected or failed an operation
    #[error("Driver error: {0}")]
    Driver(String),

    /// Navigation failed or did not reach the requested load state
    #[error("Navigation to '{url}' failed: {reason}")]
    Navigation { url: String, reason: String },

    /// Invalid argument provided to a method
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Configuration value could not be parsed
    #[error("Invalid configuration for {key}: {reason}")]
    Config { key: String, reason: String },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Error with additional context
    #[error("{0}: {1}")]
    Context(String, #[source] Box<Error>),
}

impl Error {
    /// Adds context to the error
    pub fn context(self, msg: impl Into<String>) -> Self {
        Error::Context(msg.into(), Box::new(self))
    }

    /// Returns true when the root cause is a missed deadline.
    pub fn is_timeout(&self) -> bool {
        matches!(self.root(), Error::Timeout { .. })
    }

    /// Returns true when the root cause is an unresolved logical element.
    pub fn is_not_found(&self) -> bool {
        matches!(self.root(), Error::ElementNotFound { .. })
    }

    /// Strips retry and context wrappers.
    pub fn root(&self) -> &Error {
        match self {
            Error::RetryExhausted { source, .. } => source.root(),
            Error::Context(_, inner) => inner.root(),
            other => other,
        }
    }
}

#[cfg(feature = "playwright")]
impl From<playwright_rs::Error> for Error {
    fn from(error: playwright_rs::Error) -> Self {
        Error::Driver(error.to_string())
    }
}
