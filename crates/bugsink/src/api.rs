//! The Bugsink API abstraction.
//!
//! [`BugsinkApi`] has one method per remote operation. The production
//! implementation is [`BugsinkClient`](crate::client::BugsinkClient); tests
//! and embedders can supply their own.
//!
//! # Method Categories
//!
//! - **Projects**: `list_projects`, `get_project`, `create_project`, `update_project`
//! - **Teams**: `list_teams`, `get_team`, `create_team`, `update_team`
//! - **Issues**: `list_issues`, `get_issue`
//! - **Events**: `list_events`, `get_event`, `get_stacktrace`
//! - **Releases**: `list_releases`, `get_release`, `create_release`
//! - **Health**: `test_connection`
//!
//! # Error Handling
//!
//! Every method except `test_connection` returns [`Result`]. A non-2xx
//! response is [`Error::Api`](crate::Error::Api) carrying the status and body.

use crate::domain::{
    Event, Issue, ListOptions, NewProject, NewRelease, NewTeam, Page, Project, ProjectUpdate,
    Release, Team, TeamUpdate,
};
use crate::error::Result;
use async_trait::async_trait;

/// Outcome of [`BugsinkApi::test_connection`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionReport {
    /// Whether the server answered successfully.
    pub ok: bool,
    /// Human-readable summary.
    pub message: String,
}

/// Operations exposed by the Bugsink canonical API.
#[async_trait]
pub trait BugsinkApi: Send + Sync {
    // ========== Projects ==========

    /// List projects visible to the token.
    async fn list_projects(&self) -> Result<Page<Project>>;

    /// Get one project.
    async fn get_project(&self, project_id: i64) -> Result<Project>;

    /// Create a project.
    async fn create_project(&self, project: &NewProject) -> Result<Project>;

    /// Apply a partial update to a project.
    async fn update_project(&self, project_id: i64, update: &ProjectUpdate) -> Result<Project>;

    // ========== Teams ==========

    /// List teams.
    async fn list_teams(&self) -> Result<Page<Team>>;

    /// Get one team.
    async fn get_team(&self, team_id: &str) -> Result<Team>;

    /// Create a team.
    async fn create_team(&self, team: &NewTeam) -> Result<Team>;

    /// Apply a partial update to a team.
    async fn update_team(&self, team_id: &str, update: &TeamUpdate) -> Result<Team>;

    // ========== Issues ==========

    /// List issues of a project.
    async fn list_issues(&self, project_id: i64, options: &ListOptions) -> Result<Page<Issue>>;

    /// Get one issue.
    async fn get_issue(&self, issue_id: &str) -> Result<Issue>;

    // ========== Events ==========

    /// List events of an issue. List results usually omit the SDK payload.
    async fn list_events(&self, issue_id: &str, options: &ListOptions) -> Result<Page<Event>>;

    /// Get one event with its full payload.
    async fn get_event(&self, event_id: &str) -> Result<Event>;

    /// Get the server-rendered stacktrace of an event, as text.
    async fn get_stacktrace(&self, event_id: &str) -> Result<String>;

    // ========== Releases ==========

    /// List releases of a project.
    async fn list_releases(&self, project_id: i64) -> Result<Page<Release>>;

    /// Get one release.
    async fn get_release(&self, release_id: &str) -> Result<Release>;

    /// Create a release.
    async fn create_release(&self, release: &NewRelease) -> Result<Release>;

    // ========== Health ==========

    /// Check connectivity and credentials by listing projects.
    ///
    /// Failures are reported in the returned value, never as an error.
    async fn test_connection(&self) -> ConnectionReport {
        match self.list_projects().await {
            Ok(page) => ConnectionReport {
                ok: true,
                message: format!(
                    "Connection successful. Found {} project(s).",
                    page.results.len()
                ),
            },
            Err(e) => {
                tracing::warn!(error = %e, "Connection check failed");
                ConnectionReport {
                    ok: false,
                    message: format!("Connection failed: {e}"),
                }
            }
        }
    }
}
