use serde::{Deserialize, Serialize};
use std::fmt;

/// A group of events sharing a fingerprint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    /// Issue id (UUID).
    pub id: String,

    /// Owning project id.
    #[serde(default)]
    pub project: i64,

    /// Ingestion ordering key within the project.
    #[serde(default)]
    pub digest_order: u64,

    /// First occurrence (ISO 8601).
    #[serde(default)]
    pub first_seen: String,

    /// Most recent occurrence (ISO 8601).
    #[serde(default)]
    pub last_seen: String,

    /// Events processed into this issue.
    #[serde(default)]
    pub digested_event_count: u64,

    /// Events currently retained.
    #[serde(default)]
    pub stored_event_count: u64,

    /// Exception type, e.g. `ValueError`.
    #[serde(default)]
    pub calculated_type: String,

    /// Exception message.
    #[serde(default)]
    pub calculated_value: String,

    /// Transaction (route, task name) the issue occurred in.
    #[serde(default)]
    pub transaction: String,

    /// Resolved flag.
    #[serde(default)]
    pub is_resolved: bool,

    /// Resolved, pending the next release.
    #[serde(default)]
    pub is_resolved_by_next_release: bool,

    /// Muted flag.
    #[serde(default)]
    pub is_muted: bool,
}

impl Issue {
    /// Status derived from the flags: resolved wins over muted.
    #[must_use]
    pub fn status(&self) -> IssueStatus {
        if self.is_resolved {
            IssueStatus::Resolved
        } else if self.is_muted {
            IssueStatus::Muted
        } else {
            IssueStatus::Unresolved
        }
    }

    /// `type: value` headline, or whichever half is present.
    #[must_use]
    pub fn title(&self) -> String {
        match (
            self.calculated_type.is_empty(),
            self.calculated_value.is_empty(),
        ) {
            (false, false) => format!("{}: {}", self.calculated_type, self.calculated_value),
            (false, true) => self.calculated_type.clone(),
            (true, false) => self.calculated_value.clone(),
            (true, true) => "(untitled issue)".to_string(),
        }
    }
}

/// Displayed issue status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueStatus {
    /// Neither resolved nor muted.
    Unresolved,
    /// Muted, not resolved.
    Muted,
    /// Resolved.
    Resolved,
}

impl IssueStatus {
    /// Lowercase display value.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unresolved => "unresolved",
            Self::Muted => "muted",
            Self::Resolved => "resolved",
        }
    }
}

impl fmt::Display for IssueStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
