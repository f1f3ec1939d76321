//! Bugsink HTTP client.
//!
//! Each [`BugsinkApi`] method maps to exactly one request against
//! `<base-url>/api/canonical/0`. There is no retry or rate limiting: a failed
//! request fails the call and the caller decides what to do.

use crate::api::BugsinkApi;
use crate::config::ClientConfig;
use crate::domain::{
    Event, Issue, ListOptions, NewProject, NewRelease, NewTeam, Page, Project, ProjectUpdate,
    Release, Team, TeamUpdate,
};
use crate::error::{Error, Result};
use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

/// Path prefix of the canonical API.
pub const API_PREFIX: &str = "/api/canonical/0";

/// Bugsink API client.
pub struct BugsinkClient {
    config: ClientConfig,
    http: Client,
}

impl BugsinkClient {
    /// Create a client from a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Request`] if the HTTP client cannot be built (for
    /// example, no TLS backend is available).
    pub fn new(config: ClientConfig) -> Result<Self> {
        let http = Client::builder()
            .user_agent(concat!("bugsink-mcp/", env!("CARGO_PKG_VERSION")))
            .timeout(config.timeout())
            .build()?;
        Ok(Self { config, http })
    }

    /// Get config reference.
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Absolute URL for an API path such as `/projects/`.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{API_PREFIX}{path}", self.config.base_url())
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        debug!(%method, path, "Sending Bugsink request");
        self.http
            .request(method, self.url(path))
            .bearer_auth(self.config.token())
            .header(ACCEPT, "application/json")
    }

    /// Send a request and turn non-2xx statuses into [`Error::Api`].
    async fn send(&self, request: RequestBuilder, path: &str) -> Result<Response> {
        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|e| format!("<unreadable response body: {e}>"));
            warn!(status = status.as_u16(), path, "Bugsink request failed");
            return Err(Error::Api {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response)
    }

    async fn decode<T: DeserializeOwned>(response: Response, path: &str) -> Result<T> {
        let bytes = response.bytes().await?;
        debug!(path, bytes = bytes.len(), "Bugsink response received");
        serde_json::from_slice(&bytes).map_err(|source| Error::Decode {
            path: path.to_string(),
            source,
        })
    }

    /// Make a GET request with query parameters.
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        let request = self.request(Method::GET, path).query(query);
        let response = self.send(request, path).await?;
        Self::decode(response, path).await
    }

    /// Make a POST or PATCH request with a JSON body.
    async fn send_json<B, T>(&self, method: Method, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + Sync + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.request(method, path).json(body);
        let response = self.send(request, path).await?;
        Self::decode(response, path).await
    }
}

/// Resource filter followed by the optional list parameters.
fn filtered_query(
    key: &'static str,
    value: String,
    options: &ListOptions,
) -> Vec<(&'static str, String)> {
    let mut query = vec![(key, value)];
    query.extend(options.to_query());
    query
}

#[async_trait]
impl BugsinkApi for BugsinkClient {
    async fn list_projects(&self) -> Result<Page<Project>> {
        self.get_json("/projects/", &[]).await
    }

    async fn get_project(&self, project_id: i64) -> Result<Project> {
        self.get_json(&format!("/projects/{project_id}/"), &[]).await
    }

    async fn create_project(&self, project: &NewProject) -> Result<Project> {
        self.send_json(Method::POST, "/projects/", project).await
    }

    async fn update_project(&self, project_id: i64, update: &ProjectUpdate) -> Result<Project> {
        self.send_json(Method::PATCH, &format!("/projects/{project_id}/"), update)
            .await
    }

    async fn list_teams(&self) -> Result<Page<Team>> {
        self.get_json("/teams/", &[]).await
    }

    async fn get_team(&self, team_id: &str) -> Result<Team> {
        self.get_json(&format!("/teams/{team_id}/"), &[]).await
    }

    async fn create_team(&self, team: &NewTeam) -> Result<Team> {
        self.send_json(Method::POST, "/teams/", team).await
    }

    async fn update_team(&self, team_id: &str, update: &TeamUpdate) -> Result<Team> {
        self.send_json(Method::PATCH, &format!("/teams/{team_id}/"), update)
            .await
    }

    async fn list_issues(&self, project_id: i64, options: &ListOptions) -> Result<Page<Issue>> {
        let query = filtered_query("project", project_id.to_string(), options);
        self.get_json("/issues/", &query).await
    }

    async fn get_issue(&self, issue_id: &str) -> Result<Issue> {
        self.get_json(&format!("/issues/{issue_id}/"), &[]).await
    }

    async fn list_events(&self, issue_id: &str, options: &ListOptions) -> Result<Page<Event>> {
        let query = filtered_query("issue", issue_id.to_string(), options);
        self.get_json("/events/", &query).await
    }

    async fn get_event(&self, event_id: &str) -> Result<Event> {
        self.get_json(&format!("/events/{event_id}/"), &[]).await
    }

    async fn get_stacktrace(&self, event_id: &str) -> Result<String> {
        let path = format!("/events/{event_id}/stacktrace/");
        let request = self.request(Method::GET, &path);
        let response = self.send(request, &path).await?;
        Ok(response.text().await?)
    }

    async fn list_releases(&self, project_id: i64) -> Result<Page<Release>> {
        self.get_json("/releases/", &[("project", project_id.to_string())])
            .await
    }

    async fn get_release(&self, release_id: &str) -> Result<Release> {
        self.get_json(&format!("/releases/{release_id}/"), &[]).await
    }

    async fn create_release(&self, release: &NewRelease) -> Result<Release> {
        self.send_json(Method::POST, "/releases/", release).await
    }
}
