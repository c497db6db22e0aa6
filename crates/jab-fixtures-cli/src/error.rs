//! Error types for the CLI

use thiserror::Error;

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;

/// Errors that can occur in the CLI
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {message}")]
    Config {
        /// Error message
        message: String,
    },

    /// Invalid argument
    #[error("Invalid argument: {message}")]
    InvalidArgument {
        /// Error message
        message: String,
    },

    /// IO error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Harness error
    #[error(transparent)]
    Harness(#[from] jab_fixtures::HarnessError),

    /// JSON rendering error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Create a configuration error
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an invalid argument error
    #[must_use]
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_harness_error_is_transparent() {
        let inner = jab_fixtures::HarnessError::Timeout { ms: 10 };
        let err: CliError = inner.into();
        assert_eq!(err.to_string(), "Operation timed out after 10ms");
    }

    #[test]
    fn test_constructors() {
        assert!(matches!(CliError::config("x"), CliError::Config { .. }));
        assert_eq!(
            CliError::invalid_argument("bad app").to_string(),
            "Invalid argument: bad app"
        );
    }
}
