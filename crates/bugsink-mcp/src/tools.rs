//! MCP tool implementations.
//!
//! Each tool validates its arguments, makes one API call and renders the
//! result as text. Validation always runs before any request is sent.

use crate::error::Result;
use crate::format;
use crate::models::{
    CreateProjectParams, CreateReleaseParams, CreateTeamParams, ListEventsParams,
    ListEventsRequest, ListIssuesParams, ListIssuesRequest, UpdateProjectParams,
    UpdateProjectRequest, UpdateTeamParams, UpdateTeamRequest, validate_uuid,
};
use bugsink::BugsinkApi;
use bugsink::domain::{NewProject, NewRelease, NewTeam};
use std::sync::Arc;
use tracing::debug;

/// Tool implementations for the Bugsink MCP server.
pub struct Tools {
    api: Arc<dyn BugsinkApi>,
}

impl Tools {
    /// Create tools backed by the given API.
    pub fn new(api: Arc<dyn BugsinkApi>) -> Self {
        Self { api }
    }

    /// Check that the server is reachable and the token is accepted.
    ///
    /// Never fails; an unreachable server is reported in the text.
    pub async fn test_connection(&self) -> String {
        let report = self.api.test_connection().await;
        format::format_connection(&report)
    }

    // ========== Projects ==========

    /// List all projects.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    pub async fn list_projects(&self) -> Result<String> {
        let page = self.api.list_projects().await?;
        debug!(count = page.results.len(), "Listed projects");
        Ok(format::format_projects(&page))
    }

    /// Show one project.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    pub async fn get_project(&self, project_id: i64) -> Result<String> {
        let project = self.api.get_project(project_id).await?;
        Ok(format::format_project(&project))
    }

    /// Create a project.
    ///
    /// # Errors
    ///
    /// Returns an error if the arguments are invalid or the API request fails.
    pub async fn create_project(&self, params: CreateProjectParams) -> Result<String> {
        let new_project = NewProject::try_from(params)?;
        let project = self.api.create_project(&new_project).await?;
        debug!(project_id = project.id, "Created project");
        Ok(format::format_created_project(&project))
    }

    /// Apply a partial update to a project.
    ///
    /// # Errors
    ///
    /// Returns an error if no field is supplied, a value is invalid, or the
    /// API request fails.
    pub async fn update_project(&self, params: UpdateProjectParams) -> Result<String> {
        let request = UpdateProjectRequest::try_from(params)?;
        let project = self
            .api
            .update_project(request.project_id, &request.update)
            .await?;
        Ok(format!(
            "Project updated.\n\n{}",
            format::format_project(&project)
        ))
    }

    // ========== Teams ==========

    /// List all teams.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    pub async fn list_teams(&self) -> Result<String> {
        let page = self.api.list_teams().await?;
        debug!(count = page.results.len(), "Listed teams");
        Ok(format::format_teams(&page))
    }

    /// Show one team.
    ///
    /// # Errors
    ///
    /// Returns an error if the id is not a UUID or the API request fails.
    pub async fn get_team(&self, team_id: &str) -> Result<String> {
        let team_id = validate_uuid("team_id", team_id)?;
        let team = self.api.get_team(&team_id).await?;
        Ok(format::format_team(&team, None))
    }

    /// Create a team.
    ///
    /// # Errors
    ///
    /// Returns an error if the arguments are invalid or the API request fails.
    pub async fn create_team(&self, params: CreateTeamParams) -> Result<String> {
        let new_team = NewTeam::try_from(params)?;
        let team = self.api.create_team(&new_team).await?;
        debug!(team_id = %team.id, "Created team");
        Ok(format::format_team(&team, Some("Team created.")))
    }

    /// Apply a partial update to a team.
    ///
    /// # Errors
    ///
    /// Returns an error if no field is supplied, a value is invalid, or the
    /// API request fails.
    pub async fn update_team(&self, params: UpdateTeamParams) -> Result<String> {
        let request = UpdateTeamRequest::try_from(params)?;
        let team = self
            .api
            .update_team(&request.team_id, &request.update)
            .await?;
        Ok(format::format_team(&team, Some("Team updated.")))
    }

    // ========== Issues ==========

    /// List issues of a project.
    ///
    /// # Errors
    ///
    /// Returns an error if the arguments are invalid or the API request fails.
    pub async fn list_issues(&self, params: ListIssuesParams) -> Result<String> {
        let request = ListIssuesRequest::try_from(params)?;
        let page = self
            .api
            .list_issues(request.project_id, &request.options)
            .await?;
        debug!(
            project_id = request.project_id,
            count = page.results.len(),
            "Listed issues"
        );
        Ok(format::format_issues(&page))
    }

    /// Show one issue.
    ///
    /// # Errors
    ///
    /// Returns an error if the id is not a UUID or the API request fails.
    pub async fn get_issue(&self, issue_id: &str) -> Result<String> {
        let issue_id = validate_uuid("issue_id", issue_id)?;
        let issue = self.api.get_issue(&issue_id).await?;
        Ok(format::format_issue(&issue))
    }

    // ========== Events ==========

    /// List events of an issue.
    ///
    /// # Errors
    ///
    /// Returns an error if the arguments are invalid or the API request fails.
    pub async fn list_events(&self, params: ListEventsParams) -> Result<String> {
        let request = ListEventsRequest::try_from(params)?;
        let page = self
            .api
            .list_events(&request.issue_id, &request.options)
            .await?;
        debug!(count = page.results.len(), "Listed events");
        Ok(format::format_events(&page, request.include_stacktrace))
    }

    /// Show one event in full.
    ///
    /// # Errors
    ///
    /// Returns an error if the id is not a UUID or the API request fails.
    pub async fn get_event(&self, event_id: &str) -> Result<String> {
        let event_id = validate_uuid("event_id", event_id)?;
        let event = self.api.get_event(&event_id).await?;
        Ok(format::format_event_detail(&event))
    }

    /// The server-rendered stacktrace of an event, passed through unchanged.
    ///
    /// # Errors
    ///
    /// Returns an error if the id is not a UUID or the API request fails.
    pub async fn get_stacktrace(&self, event_id: &str) -> Result<String> {
        let event_id = validate_uuid("event_id", event_id)?;
        Ok(self.api.get_stacktrace(&event_id).await?)
    }

    // ========== Releases ==========

    /// List releases of a project.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    pub async fn list_releases(&self, project_id: i64) -> Result<String> {
        let page = self.api.list_releases(project_id).await?;
        debug!(project_id, count = page.results.len(), "Listed releases");
        Ok(format::format_releases(&page))
    }

    /// Show one release.
    ///
    /// # Errors
    ///
    /// Returns an error if the id is not a UUID or the API request fails.
    pub async fn get_release(&self, release_id: &str) -> Result<String> {
        let release_id = validate_uuid("release_id", release_id)?;
        let release = self.api.get_release(&release_id).await?;
        Ok(format::format_release(&release, None))
    }

    /// Create a release.
    ///
    /// # Errors
    ///
    /// Returns an error if the arguments are invalid or the API request fails.
    pub async fn create_release(&self, params: CreateReleaseParams) -> Result<String> {
        let new_release = NewRelease::try_from(params)?;
        let release = self.api.create_release(&new_release).await?;
        debug!(release_id = %release.id, "Created release");
        Ok(format::format_release(&release, Some("Release created.")))
    }
}
