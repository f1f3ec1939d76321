//! Domain types for the Bugsink canonical API.
//!
//! Response types are read-only snapshots of server state. Fields other than
//! identifiers default when the server omits them, so a sparse payload never
//! fails to decode.

mod event;
mod issue;
mod project;
mod release;
mod team;

pub use event::{Event, EventPayload, Exception, Frame, RequestInfo, Stacktrace};
pub use issue::{Issue, IssueStatus};
pub use project::{NewProject, Project, ProjectUpdate, ProjectVisibility};
pub use release::{NewRelease, Release};
pub use team::{NewTeam, Team, TeamUpdate, TeamVisibility};

use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// One page of a list endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    /// Cursor URL of the next page, if any.
    #[serde(default)]
    pub next: Option<String>,

    /// Cursor URL of the previous page, if any.
    #[serde(default)]
    pub previous: Option<String>,

    /// Items on this page, in server order.
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
}

impl<T> Page<T> {
    /// A single page holding `results` with no neighbours.
    #[must_use]
    pub fn of(results: Vec<T>) -> Self {
        Self {
            next: None,
            previous: None,
            results,
        }
    }

    /// Whether the server reported more results after this page.
    #[must_use]
    pub fn has_more(&self) -> bool {
        self.next.is_some()
    }
}

/// Sort field for issue listings: `digest_order` (order of first ingestion)
/// or `last_seen` (most recent occurrence).
///
/// Variants carry no doc comments so the derived schema stays a plain
/// string `enum`.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
#[schemars(inline)]
pub enum IssueSort {
    DigestOrder,
    LastSeen,
}

impl IssueSort {
    /// Query-string value.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::DigestOrder => "digest_order",
            Self::LastSeen => "last_seen",
        }
    }
}

/// Sort direction: `asc` or `desc`.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
#[schemars(inline)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    /// Query-string value.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

impl fmt::Display for IssueSort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Filter and pagination options for list endpoints.
///
/// Only fields that are set become query parameters; unset fields are left
/// out entirely rather than sent as empty values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListOptions {
    /// Status filter, passed through verbatim.
    pub status: Option<String>,

    /// Maximum number of results.
    pub limit: Option<u32>,

    /// Sort field.
    pub sort: Option<IssueSort>,

    /// Sort direction.
    pub order: Option<SortOrder>,
}

impl ListOptions {
    /// Query pairs for the fields that are present, in a stable order.
    #[must_use]
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        if let Some(status) = &self.status {
            query.push(("status", status.clone()));
        }
        if let Some(limit) = self.limit {
            query.push(("limit", limit.to_string()));
        }
        if let Some(sort) = self.sort {
            query.push(("sort", sort.as_str().to_string()));
        }
        if let Some(order) = self.order {
            query.push(("order", order.as_str().to_string()));
        }
        query
    }
}

/// Deserialize an optional field, treating a value of the wrong shape as absent.
///
/// Event payloads are produced by many SDKs and are not uniform; a malformed
/// sub-object should hide that section, not fail the whole event.
pub(crate) fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| serde_json::from_value(v).ok()))
}
