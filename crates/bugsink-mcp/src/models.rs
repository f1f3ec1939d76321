//! MCP tool parameter models.
//!
//! Each tool takes a parameter struct that rmcp deserializes from the call
//! arguments and advertises as a JSON schema. Structs that need more than a
//! type check convert into a validated request via `TryFrom`, which is also
//! where defaults are filled in. Validation happens before any remote call.

use crate::error::{Error, Result};
use bugsink::domain::{
    IssueSort, ListOptions, NewProject, NewRelease, NewTeam, ProjectUpdate, ProjectVisibility,
    SortOrder, TeamUpdate, TeamVisibility,
};
use schemars::JsonSchema;
use serde::Deserialize;
use uuid::Uuid;

/// Default number of issues returned by `list_issues`.
pub const DEFAULT_ISSUE_LIMIT: u32 = 25;

/// Default number of events returned by `list_events`.
pub const DEFAULT_EVENT_LIMIT: u32 = 10;

// ============================================================================
// Parameters
// ============================================================================

/// Parameters for tools addressing a single project.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ProjectIdParams {
    /// Numeric project ID.
    pub project_id: i64,
}

/// Parameters for tools addressing a single team.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct TeamIdParams {
    /// Team ID (UUID).
    pub team_id: String,
}

/// Parameters for tools addressing a single issue.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct IssueIdParams {
    /// Issue ID (UUID).
    pub issue_id: String,
}

/// Parameters for tools addressing a single event.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct EventIdParams {
    /// Event ID (UUID).
    pub event_id: String,
}

/// Parameters for tools addressing a single release.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ReleaseIdParams {
    /// Release ID (UUID).
    pub release_id: String,
}

/// Parameters for `list_issues`.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ListIssuesParams {
    /// Numeric project ID.
    pub project_id: i64,

    /// Status filter, passed to Bugsink as-is.
    pub status: Option<String>,

    /// Maximum number of issues.
    #[serde(default = "default_issue_limit")]
    #[schemars(range(min = 1))]
    pub limit: u32,

    /// Sort field.
    pub sort: Option<IssueSort>,

    /// Sort direction.
    pub order: Option<SortOrder>,
}

fn default_issue_limit() -> u32 {
    DEFAULT_ISSUE_LIMIT
}

/// Parameters for `list_events`.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ListEventsParams {
    /// Issue ID (UUID).
    pub issue_id: String,

    /// Maximum number of events.
    #[serde(default = "default_event_limit")]
    #[schemars(range(min = 1))]
    pub limit: u32,

    /// Append a compact stacktrace to each event that carries one (default false).
    pub include_stacktrace: Option<bool>,
}

fn default_event_limit() -> u32 {
    DEFAULT_EVENT_LIMIT
}

/// Parameters for `create_project`.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CreateProjectParams {
    /// Owning team ID (UUID).
    pub team_id: String,

    /// Project name.
    pub name: String,

    /// Visibility (default "team_members").
    pub visibility: Option<ProjectVisibility>,

    /// Alert when a new issue appears (default true).
    pub alert_on_new_issue: Option<bool>,

    /// Alert when a resolved issue recurs (default true).
    pub alert_on_regression: Option<bool>,

    /// Alert when a muted issue is unmuted (default true).
    pub alert_on_unmute: Option<bool>,
}

/// Parameters for `update_project`. Only supplied fields are changed.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct UpdateProjectParams {
    /// Numeric project ID.
    pub project_id: i64,

    /// New owning team ID (UUID).
    pub team_id: Option<String>,

    /// New project name.
    pub name: Option<String>,

    /// New visibility.
    pub visibility: Option<ProjectVisibility>,

    /// Alert when a new issue appears.
    pub alert_on_new_issue: Option<bool>,

    /// Alert when a resolved issue recurs.
    pub alert_on_regression: Option<bool>,

    /// Alert when a muted issue is unmuted.
    pub alert_on_unmute: Option<bool>,
}

/// Parameters for `create_team`.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CreateTeamParams {
    /// Team name.
    pub name: String,

    /// Visibility (default "discoverable").
    pub visibility: Option<TeamVisibility>,
}

/// Parameters for `update_team`. Only supplied fields are changed.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct UpdateTeamParams {
    /// Team ID (UUID).
    pub team_id: String,

    /// New team name.
    pub name: Option<String>,

    /// New visibility.
    pub visibility: Option<TeamVisibility>,
}

/// Parameters for `create_release`.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CreateReleaseParams {
    /// Numeric project ID.
    pub project_id: i64,

    /// Release version, e.g. "1.4.2" or a commit hash.
    pub version: String,

    /// Release time as an ISO-8601 / RFC 3339 string. Defaults to now.
    pub timestamp: Option<String>,
}

// ============================================================================
// Validated Requests
// ============================================================================

/// A validated `list_issues` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListIssuesRequest {
    /// Project to list.
    pub project_id: i64,
    /// Query options, limit defaulted.
    pub options: ListOptions,
}

impl TryFrom<ListIssuesParams> for ListIssuesRequest {
    type Error = Error;

    fn try_from(params: ListIssuesParams) -> Result<Self> {
        let status = params
            .status
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        Ok(Self {
            project_id: params.project_id,
            options: ListOptions {
                status,
                limit: Some(validate_limit(params.limit)?),
                sort: params.sort,
                order: params.order,
            },
        })
    }
}

/// A validated `list_events` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListEventsRequest {
    /// Issue whose events to list.
    pub issue_id: String,
    /// Query options, limit defaulted.
    pub options: ListOptions,
    /// Whether to render compact stacktraces.
    pub include_stacktrace: bool,
}

impl TryFrom<ListEventsParams> for ListEventsRequest {
    type Error = Error;

    fn try_from(params: ListEventsParams) -> Result<Self> {
        Ok(Self {
            issue_id: validate_uuid("issue_id", &params.issue_id)?,
            options: ListOptions {
                limit: Some(validate_limit(params.limit)?),
                ..Default::default()
            },
            include_stacktrace: params.include_stacktrace.unwrap_or(false),
        })
    }
}

impl TryFrom<CreateProjectParams> for NewProject {
    type Error = Error;

    fn try_from(params: CreateProjectParams) -> Result<Self> {
        Ok(Self {
            team: validate_uuid("team_id", &params.team_id)?,
            name: validate_name("name", &params.name)?,
            visibility: params.visibility.unwrap_or_default(),
            alert_on_new_issue: params.alert_on_new_issue.unwrap_or(true),
            alert_on_regression: params.alert_on_regression.unwrap_or(true),
            alert_on_unmute: params.alert_on_unmute.unwrap_or(true),
        })
    }
}

/// A validated `update_project` call.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateProjectRequest {
    /// Project to update.
    pub project_id: i64,
    /// Fields to change; never empty.
    pub update: ProjectUpdate,
}

impl TryFrom<UpdateProjectParams> for UpdateProjectRequest {
    type Error = Error;

    fn try_from(params: UpdateProjectParams) -> Result<Self> {
        let update = ProjectUpdate {
            team: params
                .team_id
                .as_deref()
                .map(|id| validate_uuid("team_id", id))
                .transpose()?,
            name: params
                .name
                .as_deref()
                .map(|name| validate_name("name", name))
                .transpose()?,
            visibility: params.visibility,
            alert_on_new_issue: params.alert_on_new_issue,
            alert_on_regression: params.alert_on_regression,
            alert_on_unmute: params.alert_on_unmute,
        };

        if update.is_empty() {
            return Err(Error::invalid(
                "update",
                "{}",
                "Provide at least one field to change.",
            ));
        }

        Ok(Self {
            project_id: params.project_id,
            update,
        })
    }
}

impl TryFrom<CreateTeamParams> for NewTeam {
    type Error = Error;

    fn try_from(params: CreateTeamParams) -> Result<Self> {
        Ok(Self {
            name: validate_name("name", &params.name)?,
            visibility: params.visibility.unwrap_or_default(),
        })
    }
}

/// A validated `update_team` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateTeamRequest {
    /// Team to update.
    pub team_id: String,
    /// Fields to change; never empty.
    pub update: TeamUpdate,
}

impl TryFrom<UpdateTeamParams> for UpdateTeamRequest {
    type Error = Error;

    fn try_from(params: UpdateTeamParams) -> Result<Self> {
        let update = TeamUpdate {
            name: params
                .name
                .as_deref()
                .map(|name| validate_name("name", name))
                .transpose()?,
            visibility: params.visibility,
        };

        if update.is_empty() {
            return Err(Error::invalid(
                "update",
                "{}",
                "Provide at least one field to change.",
            ));
        }

        Ok(Self {
            team_id: validate_uuid("team_id", &params.team_id)?,
            update,
        })
    }
}

impl TryFrom<CreateReleaseParams> for NewRelease {
    type Error = Error;

    fn try_from(params: CreateReleaseParams) -> Result<Self> {
        let timestamp = params
            .timestamp
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(|t| {
                chrono::DateTime::parse_from_rfc3339(t)
                    .map(|_| t.to_string())
                    .map_err(|_| {
                        Error::invalid("timestamp", t, "Expected an RFC 3339 timestamp.")
                    })
            })
            .transpose()?;

        Ok(Self {
            project: params.project_id,
            version: validate_name("version", &params.version)?,
            timestamp,
        })
    }
}

// ============================================================================
// Field Validation
// ============================================================================

/// Validate a UUID argument and return it in hyphenated lowercase form.
///
/// # Errors
///
/// Returns [`Error::InvalidArgument`] if `value` is not a UUID.
pub fn validate_uuid(field: &'static str, value: &str) -> Result<String> {
    Uuid::parse_str(value.trim())
        .map(|id| id.hyphenated().to_string())
        .map_err(|_| Error::invalid(field, value, "Expected a UUID."))
}

fn validate_limit(limit: u32) -> Result<u32> {
    if limit == 0 {
        return Err(Error::invalid("limit", "0", "Must be at least 1."));
    }
    Ok(limit)
}

fn validate_name(field: &'static str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(Error::invalid(field, value, "Must not be empty."));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    const TEAM_ID: &str = "9a1c1d4e-7b2f-4c3d-8e9f-a0b1c2d3e4f5";

    #[rstest]
    #[case::digest_order("digest_order", IssueSort::DigestOrder)]
    #[case::last_seen("last_seen", IssueSort::LastSeen)]
    fn test_list_issues_accepts_sort_values(#[case] input: &str, #[case] expected: IssueSort) {
        let params: ListIssuesParams =
            serde_json::from_value(json!({"project_id": 3, "sort": input})).unwrap();
        assert_eq!(params.sort, Some(expected));
    }

    #[rstest]
    #[case::unknown_sort(json!({"project_id": 3, "sort": "first_seen"}))]
    #[case::hyphenated_sort(json!({"project_id": 3, "sort": "last-seen"}))]
    #[case::unknown_order(json!({"project_id": 3, "order": "up"}))]
    #[case::uppercase_order(json!({"project_id": 3, "order": "DESC"}))]
    fn test_list_issues_rejects_values_outside_enum(#[case] input: serde_json::Value) {
        assert!(serde_json::from_value::<ListIssuesParams>(input).is_err());
    }

    #[test]
    fn test_visibility_is_per_entity() {
        let hidden_project = serde_json::from_value::<CreateProjectParams>(json!({
            "team_id": TEAM_ID, "name": "Backend", "visibility": "hidden"
        }));
        let team_members_team = serde_json::from_value::<CreateTeamParams>(json!({
            "name": "Core", "visibility": "team_members"
        }));

        assert!(hidden_project.is_err());
        assert!(team_members_team.is_err());
    }

    #[test]
    fn test_list_issues_defaults_limit() {
        let params: ListIssuesParams = serde_json::from_value(json!({"project_id": 3})).unwrap();
        let request = ListIssuesRequest::try_from(params).unwrap();

        assert_eq!(request.project_id, 3);
        assert_eq!(
            request.options,
            ListOptions {
                limit: Some(DEFAULT_ISSUE_LIMIT),
                ..Default::default()
            }
        );
    }

    #[rstest]
    #[case::padded(" open ", Some("open"))]
    #[case::plain("resolved", Some("resolved"))]
    #[case::blank("   ", None)]
    fn test_list_issues_trims_status(#[case] status: &str, #[case] expected: Option<&str>) {
        let request = ListIssuesRequest::try_from(ListIssuesParams {
            project_id: 3,
            status: Some(status.to_string()),
            limit: DEFAULT_ISSUE_LIMIT,
            sort: None,
            order: None,
        })
        .unwrap();

        assert_eq!(request.options.status.as_deref(), expected);
    }

    #[test]
    fn test_list_events_rejects_zero_limit() {
        let err = ListEventsRequest::try_from(ListEventsParams {
            issue_id: "5e1b7a62-3f0e-4a59-9c52-0a4f7c1d2e3f".to_string(),
            limit: 0,
            include_stacktrace: None,
        })
        .unwrap_err();

        assert!(matches!(err, Error::InvalidArgument { field: "limit", .. }));
    }

    #[test]
    fn test_list_events_defaults() {
        let params: ListEventsParams = serde_json::from_value(json!({
            "issue_id": "5E1B7A62-3F0E-4A59-9C52-0A4F7C1D2E3F"
        }))
        .unwrap();
        let request = ListEventsRequest::try_from(params).unwrap();

        assert_eq!(request.issue_id, "5e1b7a62-3f0e-4a59-9c52-0a4f7c1d2e3f");
        assert_eq!(request.options.limit, Some(DEFAULT_EVENT_LIMIT));
        assert!(!request.include_stacktrace);
    }

    #[test]
    fn test_validate_uuid_rejects_numeric_ids() {
        let err = validate_uuid("issue_id", "12345").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid issue_id: '12345'. Expected a UUID."
        );
    }

    #[test]
    fn test_create_project_defaults() {
        let project = NewProject::try_from(CreateProjectParams {
            team_id: TEAM_ID.to_string(),
            name: "  Backend  ".to_string(),
            visibility: None,
            alert_on_new_issue: None,
            alert_on_regression: Some(false),
            alert_on_unmute: None,
        })
        .unwrap();

        assert_eq!(project.name, "Backend");
        assert_eq!(project.visibility, ProjectVisibility::TeamMembers);
        assert!(project.alert_on_new_issue);
        assert!(!project.alert_on_regression);
        assert!(project.alert_on_unmute);
    }

    #[test]
    fn test_update_project_keeps_only_supplied_fields() {
        let request = UpdateProjectRequest::try_from(UpdateProjectParams {
            project_id: 1,
            team_id: None,
            name: None,
            visibility: Some(ProjectVisibility::Discoverable),
            alert_on_new_issue: Some(false),
            alert_on_regression: None,
            alert_on_unmute: None,
        })
        .unwrap();

        assert_eq!(
            request.update,
            ProjectUpdate {
                visibility: Some(ProjectVisibility::Discoverable),
                alert_on_new_issue: Some(false),
                ..Default::default()
            }
        );
    }

    #[test]
    fn test_update_project_requires_a_field() {
        let err = UpdateProjectRequest::try_from(UpdateProjectParams {
            project_id: 1,
            team_id: None,
            name: None,
            visibility: None,
            alert_on_new_issue: None,
            alert_on_regression: None,
            alert_on_unmute: None,
        })
        .unwrap_err();

        assert!(matches!(err, Error::InvalidArgument { field: "update", .. }));
    }

    #[test]
    fn test_create_team_default_visibility() {
        let team = NewTeam::try_from(CreateTeamParams {
            name: "Core".to_string(),
            visibility: None,
        })
        .unwrap();
        assert_eq!(team.visibility, TeamVisibility::Discoverable);
    }

    #[test]
    fn test_update_team_rejects_bad_team_id() {
        let err = UpdateTeamRequest::try_from(UpdateTeamParams {
            team_id: "core".to_string(),
            name: Some("Core".to_string()),
            visibility: None,
        })
        .unwrap_err();
        assert!(matches!(err, Error::InvalidArgument { field: "team_id", .. }));
    }

    #[rstest]
    #[case::utc("2024-05-01T10:00:00Z", true)]
    #[case::offset("2024-05-01T10:00:00+02:00", true)]
    #[case::date_only("2024-05-01", false)]
    #[case::garbage("yesterday", false)]
    fn test_create_release_timestamp(#[case] timestamp: &str, #[case] valid: bool) {
        let result = NewRelease::try_from(CreateReleaseParams {
            project_id: 1,
            version: "1.0.0".to_string(),
            timestamp: Some(timestamp.to_string()),
        });
        assert_eq!(result.is_ok(), valid);
    }

    #[test]
    fn test_create_release_without_timestamp() {
        let release = NewRelease::try_from(CreateReleaseParams {
            project_id: 1,
            version: "abc123".to_string(),
            timestamp: None,
        })
        .unwrap();
        assert_eq!(release.timestamp, None);
    }

    #[test]
    fn test_create_release_rejects_blank_version() {
        let result = NewRelease::try_from(CreateReleaseParams {
            project_id: 1,
            version: "   ".to_string(),
            timestamp: None,
        });
        assert!(matches!(
            result,
            Err(Error::InvalidArgument {
                field: "version",
                ..
            })
        ));
    }
}
