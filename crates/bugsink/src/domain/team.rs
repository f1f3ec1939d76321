use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A Bugsink team.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    /// Team id (UUID).
    pub id: String,

    /// Display name.
    #[serde(default)]
    pub name: String,

    /// Visibility as reported by the server.
    #[serde(default)]
    pub visibility: String,
}

/// Who can see a team: `joinable` (any user may join), `discoverable`
/// (listed to all users, the default) or `hidden` (members only).
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
#[schemars(inline)]
pub enum TeamVisibility {
    Joinable,
    #[default]
    Discoverable,
    Hidden,
}

impl TeamVisibility {
    /// Wire value.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Joinable => "joinable",
            Self::Discoverable => "discoverable",
            Self::Hidden => "hidden",
        }
    }
}

impl fmt::Display for TeamVisibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payload for creating a team.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewTeam {
    /// Display name.
    pub name: String,
    /// Visibility.
    pub visibility: TeamVisibility,
}

/// Partial update for a team. Absent fields are not serialized.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TeamUpdate {
    /// New display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New visibility.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visibility: Option<TeamVisibility>,
}

impl TeamUpdate {
    /// Whether no field is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.visibility.is_none()
    }
}
