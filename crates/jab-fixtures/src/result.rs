//! Result and error types for the harness.

use thiserror::Error;

/// Result type for harness operations
pub type HarnessResult<T> = Result<T, HarnessError>;

/// Errors that can occur while fetching, launching or driving a demo application
#[derive(Debug, Error)]
pub enum HarnessError {
    /// A catalog entry could not be resolved
    #[error("Catalog entry {name} is malformed: {message}")]
    Catalog {
        /// Entry name
        name: String,
        /// Error message
        message: String,
    },

    /// Download failed
    #[error("Download of {url} failed: {message}")]
    Transport {
        /// URL that failed
        url: String,
        /// Error message
        message: String,
    },

    /// Launch command could not be started
    #[error("Failed to launch `{command}`: {message}")]
    Launch {
        /// Rendered command line
        command: String,
        /// Error message
        message: String,
    },

    /// Driver could not be bound or used
    #[error("Driver error for window '{title}': {message}")]
    Driver {
        /// Window title the driver targets
        title: String,
        /// Error message
        message: String,
    },

    /// Operation timed out
    #[error("Operation timed out after {ms}ms")]
    Timeout {
        /// Timeout in milliseconds
        ms: u64,
    },

    /// Fixture error (setup/teardown failed)
    #[error("Fixture error: {message}")]
    FixtureError {
        /// Error message
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Config {
        /// Error message
        message: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),
}

impl HarnessError {
    /// Create a driver error
    #[must_use]
    pub fn driver(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Driver {
            title: title.into(),
            message: message.into(),
        }
    }

    /// Create a configuration error
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}
