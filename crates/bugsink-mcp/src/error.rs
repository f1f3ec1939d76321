//! Error types for the Bugsink MCP server.

use rmcp::ErrorData as McpError;
use thiserror::Error;

/// Errors that can occur in the Bugsink MCP server.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid argument value provided.
    #[error("Invalid {field}: '{value}'. {reason}")]
    InvalidArgument {
        /// The field name that had an invalid value.
        field: &'static str,
        /// The invalid value that was provided.
        value: String,
        /// What a valid value looks like.
        reason: &'static str,
    },

    /// An error from the Bugsink API client.
    #[error(transparent)]
    Api(#[from] bugsink::Error),
}

impl Error {
    /// Shorthand for [`Error::InvalidArgument`].
    pub fn invalid(field: &'static str, value: impl Into<String>, reason: &'static str) -> Self {
        Self::InvalidArgument {
            field,
            value: value.into(),
            reason,
        }
    }
}

impl From<Error> for McpError {
    fn from(err: Error) -> Self {
        match err {
            Error::InvalidArgument { .. } => McpError::invalid_params(err.to_string(), None),
            Error::Api(_) => McpError::internal_error(err.to_string(), None),
        }
    }
}

/// Result type for Bugsink MCP operations.
pub type Result<T> = std::result::Result<T, Error>;
