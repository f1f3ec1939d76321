//! MCP server implementation.
//!
//! This module wires the tools into rmcp and serves them over stdio.

use crate::models::{
    CreateProjectParams, CreateReleaseParams, CreateTeamParams, EventIdParams, IssueIdParams,
    ListEventsParams, ListIssuesParams, ProjectIdParams, ReleaseIdParams, TeamIdParams,
    UpdateProjectParams, UpdateTeamParams,
};
use crate::error::Error;
use crate::tools::Tools;
use bugsink::BugsinkApi;
use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
};
use rmcp::{
    ErrorData as McpError, ServiceExt, handler::server::ServerHandler, tool, tool_handler,
    tool_router,
};
use std::sync::Arc;

/// Wrap a tool outcome for rmcp.
///
/// Bugsink failures become tool results flagged `is_error` so the caller sees
/// the status and body. Bad arguments stay protocol errors (`invalid_params`).
fn text(tool: &'static str, result: crate::Result<String>) -> Result<CallToolResult, McpError> {
    tracing::debug!(tool, ok = result.is_ok(), "Tool call finished");
    match result {
        Ok(body) => Ok(CallToolResult::success(vec![Content::text(body)])),
        Err(e @ Error::Api(_)) => Ok(CallToolResult::error(vec![Content::text(e.to_string())])),
        Err(e) => Err(e.into()),
    }
}

/// The Bugsink MCP server.
///
/// Provides MCP protocol handling over stdio transport.
#[derive(Clone)]
pub struct BugsinkMcpServer {
    /// Tool implementations.
    tools: Arc<Tools>,
    /// Tool router for MCP dispatch.
    tool_router: ToolRouter<Self>,
}

#[tool_router]
#[allow(clippy::missing_errors_doc)]
impl BugsinkMcpServer {
    /// Check connectivity and credentials.
    #[tool(
        description = "Check that the Bugsink server is reachable and the API token is accepted. Reports the number of visible projects."
    )]
    pub async fn test_connection(&self) -> Result<CallToolResult, McpError> {
        text("test_connection", Ok(self.tools.test_connection().await))
    }

    // ========== Projects ==========

    /// List all projects.
    #[tool(description = "List all Bugsink projects with their IDs and slugs.")]
    pub async fn list_projects(&self) -> Result<CallToolResult, McpError> {
        text("list_projects", self.tools.list_projects().await)
    }

    /// Show one project.
    #[tool(
        description = "Get details of a project: DSN, event counts, retention and alert settings."
    )]
    pub async fn get_project(
        &self,
        Parameters(params): Parameters<ProjectIdParams>,
    ) -> Result<CallToolResult, McpError> {
        text("get_project", self.tools.get_project(params.project_id).await)
    }

    /// Create a project.
    #[tool(
        description = "Create a project in a team. Visibility: joinable, discoverable or team_members (default). Returns the new project's ID and DSN."
    )]
    pub async fn create_project(
        &self,
        Parameters(params): Parameters<CreateProjectParams>,
    ) -> Result<CallToolResult, McpError> {
        text("create_project", self.tools.create_project(params).await)
    }

    /// Update a project.
    #[tool(
        description = "Update a project's name, team, visibility or alert settings. Only the supplied fields are changed."
    )]
    pub async fn update_project(
        &self,
        Parameters(params): Parameters<UpdateProjectParams>,
    ) -> Result<CallToolResult, McpError> {
        text("update_project", self.tools.update_project(params).await)
    }

    // ========== Teams ==========

    /// List all teams.
    #[tool(description = "List all teams with their IDs and visibility.")]
    pub async fn list_teams(&self) -> Result<CallToolResult, McpError> {
        text("list_teams", self.tools.list_teams().await)
    }

    /// Show one team.
    #[tool(description = "Get details of a team by its UUID.")]
    pub async fn get_team(
        &self,
        Parameters(params): Parameters<TeamIdParams>,
    ) -> Result<CallToolResult, McpError> {
        text("get_team", self.tools.get_team(&params.team_id).await)
    }

    /// Create a team.
    #[tool(description = "Create a team. Visibility: joinable, discoverable (default) or hidden.")]
    pub async fn create_team(
        &self,
        Parameters(params): Parameters<CreateTeamParams>,
    ) -> Result<CallToolResult, McpError> {
        text("create_team", self.tools.create_team(params).await)
    }

    /// Update a team.
    #[tool(
        description = "Update a team's name or visibility. Only the supplied fields are changed."
    )]
    pub async fn update_team(
        &self,
        Parameters(params): Parameters<UpdateTeamParams>,
    ) -> Result<CallToolResult, McpError> {
        text("update_team", self.tools.update_team(params).await)
    }

    // ========== Issues ==========

    /// List issues of a project.
    #[tool(
        description = "List issues of a project with their status, event counts and first/last seen times. Optional: status, limit (default 25), sort (digest_order or last_seen), order (asc or desc)."
    )]
    pub async fn list_issues(
        &self,
        Parameters(params): Parameters<ListIssuesParams>,
    ) -> Result<CallToolResult, McpError> {
        text("list_issues", self.tools.list_issues(params).await)
    }

    /// Show one issue.
    #[tool(description = "Get details of an issue by its UUID, including its resolution status.")]
    pub async fn get_issue(
        &self,
        Parameters(params): Parameters<IssueIdParams>,
    ) -> Result<CallToolResult, McpError> {
        text("get_issue", self.tools.get_issue(&params.issue_id).await)
    }

    // ========== Events ==========

    /// List events of an issue.
    #[tool(
        description = "List events (occurrences) of an issue. Optional: limit (default 10), include_stacktrace for a compact trace per event."
    )]
    pub async fn list_events(
        &self,
        Parameters(params): Parameters<ListEventsParams>,
    ) -> Result<CallToolResult, McpError> {
        text("list_events", self.tools.list_events(params).await)
    }

    /// Show one event.
    #[tool(
        description = "Get full details of an event: exception, stacktrace with source context, tags, contexts and request."
    )]
    pub async fn get_event(
        &self,
        Parameters(params): Parameters<EventIdParams>,
    ) -> Result<CallToolResult, McpError> {
        text("get_event", self.tools.get_event(&params.event_id).await)
    }

    /// Get the server-rendered stacktrace of an event.
    #[tool(
        description = "Get the stacktrace of an event as rendered by Bugsink, in the familiar text format."
    )]
    pub async fn get_stacktrace(
        &self,
        Parameters(params): Parameters<EventIdParams>,
    ) -> Result<CallToolResult, McpError> {
        text("get_stacktrace", self.tools.get_stacktrace(&params.event_id).await)
    }

    // ========== Releases ==========

    /// List releases of a project.
    #[tool(description = "List releases of a project with their versions and release dates.")]
    pub async fn list_releases(
        &self,
        Parameters(params): Parameters<ProjectIdParams>,
    ) -> Result<CallToolResult, McpError> {
        text("list_releases", self.tools.list_releases(params.project_id).await)
    }

    /// Show one release.
    #[tool(description = "Get details of a release by its UUID.")]
    pub async fn get_release(
        &self,
        Parameters(params): Parameters<ReleaseIdParams>,
    ) -> Result<CallToolResult, McpError> {
        text("get_release", self.tools.get_release(&params.release_id).await)
    }

    /// Create a release.
    #[tool(
        description = "Create a release for a project. Optional timestamp (RFC 3339) sets the release date."
    )]
    pub async fn create_release(
        &self,
        Parameters(params): Parameters<CreateReleaseParams>,
    ) -> Result<CallToolResult, McpError> {
        text("create_release", self.tools.create_release(params).await)
    }
}

impl BugsinkMcpServer {
    /// Create a server backed by the given API.
    #[must_use]
    pub fn new(api: Arc<dyn BugsinkApi>) -> Self {
        Self {
            tools: Arc::new(Tools::new(api)),
            tool_router: Self::tool_router(),
        }
    }

    /// Serve MCP over stdin/stdout until the client disconnects.
    ///
    /// # Errors
    ///
    /// Returns an error if the MCP handshake fails or the service task panics.
    pub async fn run(self) -> anyhow::Result<()> {
        let service = self.serve(rmcp::transport::stdio()).await?;
        tracing::info!("Bugsink MCP server ready");
        service.waiting().await?;
        tracing::info!("Client disconnected");
        Ok(())
    }
}

#[tool_handler]
impl ServerHandler for BugsinkMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "bugsink-mcp".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                title: None,
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Bugsink error tracking. Start with list_projects, then list_issues for a project, list_events for an issue and get_event or get_stacktrace for details."
                    .into(),
            ),
        }
    }
}
