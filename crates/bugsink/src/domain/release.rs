use serde::{Deserialize, Serialize};

/// A versioned deployment marker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Release {
    /// Release id (UUID).
    pub id: String,

    /// Owning project id.
    #[serde(default)]
    pub project: i64,

    /// Version string; may be empty.
    #[serde(default)]
    pub version: String,

    /// Release date (ISO 8601).
    #[serde(default)]
    pub date_released: Option<String>,

    /// Normalized semantic version, when the version parses as one.
    #[serde(default)]
    pub semver: Option<String>,

    /// Whether `version` is a semantic version.
    #[serde(default)]
    pub is_semver: Option<bool>,

    /// Server ordering key.
    #[serde(default)]
    pub sort_epoch: Option<i64>,
}

/// Payload for creating a release.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewRelease {
    /// Owning project id.
    pub project: i64,
    /// Version string.
    pub version: String,
    /// Release time (RFC 3339); the server uses "now" when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}
