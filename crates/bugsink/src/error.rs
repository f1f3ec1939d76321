//! Error types for Bugsink API operations.

use thiserror::Error;

/// The error type for Bugsink API operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Client configuration is missing or malformed.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The server answered with a non-2xx status.
    #[error("Bugsink API error (HTTP {status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body text.
        body: String,
    },

    /// The request could not be sent or the response could not be read.
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// A 2xx response body did not match the expected shape.
    #[error("Failed to decode response from {path}: {source}")]
    Decode {
        /// API path that produced the body.
        path: String,
        /// The underlying JSON error.
        #[source]
        source: serde_json::Error,
    },
}

impl Error {
    /// HTTP status of an [`Error::Api`] response, if this is one.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// A specialized Result type for Bugsink operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_message_carries_status_and_body() {
        let err = Error::Api {
            status: 404,
            body: "\"Not found\"".to_string(),
        };
        let message = err.to_string();
        assert!(message.contains("404"));
        assert!(message.contains("Not found"));
        assert_eq!(err.status(), Some(404));
    }

    #[test]
    fn test_status_is_none_for_other_errors() {
        assert_eq!(Error::Config("x".into()).status(), None);
    }
}
