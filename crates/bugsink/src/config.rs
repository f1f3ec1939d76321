//! Client configuration.
//!
//! Holds the server base URL, the bearer token and the per-request timeout.
//! Values are validated once, at construction.

use crate::error::{Error, Result};
use reqwest::Url;
use std::fmt;
use std::time::Duration;

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration for a [`BugsinkClient`](crate::client::BugsinkClient).
#[derive(Clone, PartialEq, Eq)]
pub struct ClientConfig {
    base_url: String,
    token: String,
    timeout: Duration,
}

impl ClientConfig {
    /// Create a configuration from a server base URL and an API token.
    ///
    /// Trailing slashes on `base_url` are removed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if either value is empty, or if `base_url` is
    /// not an absolute `http`/`https` URL.
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Result<Self> {
        let base_url = base_url.into().trim().trim_end_matches('/').to_string();
        let token = token.into().trim().to_string();

        if base_url.is_empty() {
            return Err(Error::Config("base URL must not be empty".to_string()));
        }
        if token.is_empty() {
            return Err(Error::Config("API token must not be empty".to_string()));
        }

        let parsed = Url::parse(&base_url)
            .map_err(|e| Error::Config(format!("invalid base URL '{base_url}': {e}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(Error::Config(format!(
                "base URL must use http or https, got '{}'",
                parsed.scheme()
            )));
        }

        Ok(Self {
            base_url,
            token,
            timeout: DEFAULT_TIMEOUT,
        })
    }

    /// Override the per-request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// The server base URL, without a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The bearer token.
    #[must_use]
    pub fn token(&self) -> &str {
        &self.token
    }

    /// The per-request timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

// The token never appears in logs or panic messages.
impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("token", &"<redacted>")
            .field("timeout", &self.timeout)
            .finish()
    }
}
