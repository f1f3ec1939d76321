use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A Bugsink project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    /// Numeric project id.
    pub id: i64,

    /// Owning team (UUID), if any.
    #[serde(default)]
    pub team: Option<String>,

    /// Display name.
    #[serde(default)]
    pub name: String,

    /// URL slug.
    #[serde(default)]
    pub slug: String,

    /// Data source name used by SDKs to submit events.
    #[serde(default)]
    pub dsn: String,

    /// Events processed into issues.
    #[serde(default)]
    pub digested_event_count: u64,

    /// Events currently retained.
    #[serde(default)]
    pub stored_event_count: u64,

    /// Alert when a new issue appears.
    #[serde(default)]
    pub alert_on_new_issue: bool,

    /// Alert when a resolved issue recurs.
    #[serde(default)]
    pub alert_on_regression: bool,

    /// Alert when a muted issue is unmuted.
    #[serde(default)]
    pub alert_on_unmute: bool,

    /// Visibility as reported by the server.
    #[serde(default)]
    pub visibility: String,

    /// Maximum number of retained events.
    #[serde(default)]
    pub retention_max_event_count: Option<u64>,
}

/// Who can see a project: `joinable` (any user may join), `discoverable`
/// (listed to all users, joining requires an invite) or `team_members`
/// (only members of the owning team, the default).
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
#[schemars(inline)]
pub enum ProjectVisibility {
    Joinable,
    Discoverable,
    #[default]
    TeamMembers,
}

impl ProjectVisibility {
    /// Wire value.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Joinable => "joinable",
            Self::Discoverable => "discoverable",
            Self::TeamMembers => "team_members",
        }
    }
}

impl fmt::Display for ProjectVisibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payload for creating a project.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewProject {
    /// Owning team (UUID).
    pub team: String,
    /// Display name.
    pub name: String,
    /// Visibility.
    pub visibility: ProjectVisibility,
    /// Alert on new issues.
    pub alert_on_new_issue: bool,
    /// Alert on regressions.
    pub alert_on_regression: bool,
    /// Alert on unmute.
    pub alert_on_unmute: bool,
}

/// Partial update for a project.
///
/// Absent fields are not serialized, so the server keeps its current value.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProjectUpdate {
    /// New owning team (UUID).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team: Option<String>,
    /// New display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New visibility.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visibility: Option<ProjectVisibility>,
    /// New new-issue alert flag.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alert_on_new_issue: Option<bool>,
    /// New regression alert flag.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alert_on_regression: Option<bool>,
    /// New unmute alert flag.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alert_on_unmute: Option<bool>,
}

impl ProjectUpdate {
    /// Whether no field is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
