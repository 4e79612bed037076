//! MCP Server implementation
//!
//! Exposes the backlog CLI as tools and a fixed set of `backlog://`
//! resources. Every tool call funnels through one shared [`CommandRunner`].

use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;

use mcp_common::{
    async_trait, resource_not_found, EmbeddableError, EmbeddableMcp, EmbeddableResult, McpError,
    McpResult, ResultExt,
};
use rmcp::{
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{
        AnnotateAble, CallToolResult, ListResourcesResult, PaginatedRequestParam, RawResource,
        ReadResourceRequestParam, ReadResourceResult, Resource, ResourceContents,
        ServerCapabilities, ServerInfo, Tool,
    },
    service::{RequestContext, RoleServer},
    tool, tool_handler, tool_router,
};
use serde_json::Value;

use crate::backlog::{project_dir_from_env, CommandRunner, ExecutableResolver};
use crate::config::{ConfigStore, LocalConfig};
use crate::handlers;
use crate::params::{
    BoardExportParams, ConfigGetParams, ConfigSetParams, DecisionCreateParams, DocCreateParams,
    DocViewParams, DraftCreateParams, DraftIdParams, TaskCreateParams, TaskEditParams,
    TaskIdParams, TaskListParams,
};
use crate::resources::BacklogResource;

const INSTRUCTIONS: &str = "Backlog.md MCP Server - manage tasks, drafts, documents, decisions \
     and the Kanban board of a Backlog.md project through the backlog CLI. The project must \
     be initialized with `backlog init`.";

/// The main backlog MCP Server
#[derive(Clone)]
pub struct BacklogMcpServer {
    runner: Arc<CommandRunner>,
    tool_router: ToolRouter<Self>,
}

// ============================================================================
// Tool Router Implementation
// ============================================================================

#[tool_router]
impl BacklogMcpServer {
    /// Server for the project in `PWD`, configured from the local config file
    pub fn new() -> Self {
        let settings = ConfigStore::from_env()
            .map(|store| store.settings())
            .unwrap_or_else(|e| {
                tracing::warn!(error = %e, "local config unavailable, using defaults");
                LocalConfig::default()
            });
        Self::with_runner(runner_from_settings(&settings))
    }

    pub fn with_runner(runner: CommandRunner) -> Self {
        Self {
            runner: Arc::new(runner),
            tool_router: Self::tool_router(),
        }
    }

    pub fn runner(&self) -> &CommandRunner {
        &self.runner
    }

    // ------------------------------------------------------------------------
    // Tasks
    // ------------------------------------------------------------------------

    #[tool(
        description = "Create a task. Include acceptance criteria (ac) for measurable completion, dependencies ('task-1,task-2') for execution order and parent ('task-8') for sub-tasks."
    )]
    async fn task_create(
        &self,
        Parameters(params): Parameters<TaskCreateParams>,
    ) -> Result<CallToolResult, McpError> {
        handlers::task_create(&self.runner, params).await
    }

    #[tool(
        description = "List tasks with optional filters. Use parent to see the sub-tasks of a task; filters can be combined, e.g. parent 'task-8', priority 'high', label 'frontend'."
    )]
    async fn task_list(
        &self,
        Parameters(params): Parameters<TaskListParams>,
    ) -> Result<CallToolResult, McpError> {
        handlers::task_list(&self.runner, params).await
    }

    #[tool(
        description = "Edit a task. Use checkAc/uncheckAc with criterion indexes (checkAc: [1,2]) to mark acceptance criteria, ac to add criteria and dependencies to set task order."
    )]
    async fn task_edit(
        &self,
        Parameters(params): Parameters<TaskEditParams>,
    ) -> Result<CallToolResult, McpError> {
        handlers::task_edit(&self.runner, params).await
    }

    #[tool(description = "View a task's details")]
    async fn task_view(
        &self,
        Parameters(params): Parameters<TaskIdParams>,
    ) -> Result<CallToolResult, McpError> {
        handlers::task_view(&self.runner, params).await
    }

    #[tool(description = "Archive a task")]
    async fn task_archive(
        &self,
        Parameters(params): Parameters<TaskIdParams>,
    ) -> Result<CallToolResult, McpError> {
        handlers::task_archive(&self.runner, params).await
    }

    #[tool(description = "Demote a task to draft status")]
    async fn task_demote(
        &self,
        Parameters(params): Parameters<TaskIdParams>,
    ) -> Result<CallToolResult, McpError> {
        handlers::task_demote(&self.runner, params).await
    }

    #[tool(description = "Show the tasks a task depends on. Use to verify workflow before starting work")]
    async fn task_dependencies(
        &self,
        Parameters(params): Parameters<TaskIdParams>,
    ) -> Result<CallToolResult, McpError> {
        handlers::task_dependencies(&self.runner, params).await
    }

    #[tool(description = "List all children of a parent task")]
    async fn task_children(
        &self,
        Parameters(params): Parameters<TaskIdParams>,
    ) -> Result<CallToolResult, McpError> {
        handlers::task_children(&self.runner, params).await
    }

    // ------------------------------------------------------------------------
    // Board, overview, sequences
    // ------------------------------------------------------------------------

    #[tool(description = "Show the Kanban board")]
    async fn board_show(&self) -> Result<CallToolResult, McpError> {
        handlers::board_show(&self.runner).await
    }

    #[tool(description = "Export the Kanban board to a markdown file")]
    async fn board_export(
        &self,
        Parameters(params): Parameters<BoardExportParams>,
    ) -> Result<CallToolResult, McpError> {
        handlers::board_export(&self.runner, params).await
    }

    #[tool(description = "Show project overview and statistics")]
    async fn overview(&self) -> Result<CallToolResult, McpError> {
        handlers::overview(&self.runner).await
    }

    #[tool(
        description = "View task execution sequences based on dependencies: which tasks can run in parallel and which must wait"
    )]
    async fn sequence_list(&self) -> Result<CallToolResult, McpError> {
        handlers::sequence_list(&self.runner).await
    }

    // ------------------------------------------------------------------------
    // Backlog configuration
    // ------------------------------------------------------------------------

    #[tool(description = "Get a backlog configuration value")]
    async fn config_get(
        &self,
        Parameters(params): Parameters<ConfigGetParams>,
    ) -> Result<CallToolResult, McpError> {
        handlers::config_get(&self.runner, params).await
    }

    #[tool(description = "Set a backlog configuration value")]
    async fn config_set(
        &self,
        Parameters(params): Parameters<ConfigSetParams>,
    ) -> Result<CallToolResult, McpError> {
        handlers::config_set(&self.runner, params).await
    }

    #[tool(description = "List all backlog configuration values")]
    async fn config_list(&self) -> Result<CallToolResult, McpError> {
        handlers::config_list(&self.runner).await
    }

    // ------------------------------------------------------------------------
    // Drafts
    // ------------------------------------------------------------------------

    #[tool(description = "Create a new draft task")]
    async fn draft_create(
        &self,
        Parameters(params): Parameters<DraftCreateParams>,
    ) -> Result<CallToolResult, McpError> {
        handlers::draft_create(&self.runner, params).await
    }

    #[tool(description = "List all draft tasks")]
    async fn draft_list(&self) -> Result<CallToolResult, McpError> {
        handlers::draft_list(&self.runner).await
    }

    #[tool(description = "Promote a draft task to a full task")]
    async fn draft_promote(
        &self,
        Parameters(params): Parameters<DraftIdParams>,
    ) -> Result<CallToolResult, McpError> {
        handlers::draft_promote(&self.runner, params).await
    }

    #[tool(description = "Archive a draft task")]
    async fn draft_archive(
        &self,
        Parameters(params): Parameters<DraftIdParams>,
    ) -> Result<CallToolResult, McpError> {
        handlers::draft_archive(&self.runner, params).await
    }

    #[tool(description = "View a draft task's details")]
    async fn draft_view(
        &self,
        Parameters(params): Parameters<DraftIdParams>,
    ) -> Result<CallToolResult, McpError> {
        handlers::draft_view(&self.runner, params).await
    }

    // ------------------------------------------------------------------------
    // Documents and decisions
    // ------------------------------------------------------------------------

    #[tool(description = "Create a new documentation file")]
    async fn doc_create(
        &self,
        Parameters(params): Parameters<DocCreateParams>,
    ) -> Result<CallToolResult, McpError> {
        handlers::doc_create(&self.runner, params).await
    }

    #[tool(description = "List all documentation files")]
    async fn doc_list(&self) -> Result<CallToolResult, McpError> {
        handlers::doc_list(&self.runner).await
    }

    #[tool(description = "View a specific documentation file")]
    async fn doc_view(
        &self,
        Parameters(params): Parameters<DocViewParams>,
    ) -> Result<CallToolResult, McpError> {
        handlers::doc_view(&self.runner, params).await
    }

    #[tool(description = "Create a new decision record")]
    async fn decision_create(
        &self,
        Parameters(params): Parameters<DecisionCreateParams>,
    ) -> Result<CallToolResult, McpError> {
        handlers::decision_create(&self.runner, params).await
    }

    #[tool(description = "List all decision records")]
    async fn decision_list(&self) -> Result<CallToolResult, McpError> {
        handlers::decision_list(&self.runner).await
    }
}

// ============================================================================
// Resources
// ============================================================================

impl BacklogMcpServer {
    /// Static resource catalog
    pub fn resources() -> Vec<Resource> {
        BacklogResource::ALL
            .into_iter()
            .map(|r| {
                let mut raw = RawResource::new(r.uri(), r.name());
                raw.description = Some(r.description().to_string());
                raw.mime_type = Some(r.mime_type().to_string());
                raw.no_annotation()
            })
            .collect()
    }

    /// Read a `backlog://` resource
    ///
    /// Unknown URIs and CLI failures are protocol errors here, unlike tool
    /// calls.
    pub async fn read_backlog_resource(&self, uri: &str) -> McpResult<ReadResourceResult> {
        let resource = BacklogResource::from_uri(uri).ok_or_else(|| resource_not_found(uri))?;
        let text = resource.read(&self.runner).await.to_mcp_err()?;

        let mut contents = ResourceContents::text(text, uri);
        if let ResourceContents::TextResourceContents { mime_type, .. } = &mut contents {
            *mime_type = Some(resource.mime_type().to_string());
        }
        Ok(ReadResourceResult {
            contents: vec![contents],
        })
    }
}

// ============================================================================
// Server Handler Implementation
// ============================================================================

#[tool_handler]
impl rmcp::ServerHandler for BacklogMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(INSTRUCTIONS.into()),
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .enable_resources()
                .build(),
            ..Default::default()
        }
    }

    fn list_resources(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> impl Future<Output = Result<ListResourcesResult, McpError>> + Send + '_ {
        std::future::ready(Ok(ListResourcesResult::with_all_items(Self::resources())))
    }

    fn read_resource(
        &self,
        request: ReadResourceRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> impl Future<Output = Result<ReadResourceResult, McpError>> + Send + '_ {
        async move { self.read_backlog_resource(&request.uri).await }
    }
}

impl Default for BacklogMcpServer {
    fn default() -> Self {
        Self::new()
    }
}

/// Runner for the project in `PWD`, honoring `backlogCliPath` and
/// `maxConcurrentSpawns`
pub fn runner_from_settings(settings: &LocalConfig) -> CommandRunner {
    let resolver = ExecutableResolver::new(settings.backlog_cli_path.as_ref().map(PathBuf::from));
    CommandRunner::new(
        resolver,
        project_dir_from_env(),
        settings.max_concurrent_spawns(),
    )
}

// ============================================================================
// EmbeddableMcp Implementation
// ============================================================================

#[async_trait]
impl EmbeddableMcp for BacklogMcpServer {
    fn server_name(&self) -> &str {
        "backlog"
    }

    fn server_description(&self) -> Option<&str> {
        Some(INSTRUCTIONS)
    }

    fn list_tools(&self) -> Vec<Tool> {
        self.tool_router.list_all()
    }

    async fn call_tool(&self, name: &str, params: Value) -> EmbeddableResult<CallToolResult> {
        match name {
            "task_create" => {
                let params: TaskCreateParams = serde_json::from_value(params)?;
                self.task_create(Parameters(params)).await.map_err(Into::into)
            }
            "task_list" => {
                let params: TaskListParams = serde_json::from_value(params)?;
                self.task_list(Parameters(params)).await.map_err(Into::into)
            }
            "task_edit" => {
                let params: TaskEditParams = serde_json::from_value(params)?;
                self.task_edit(Parameters(params)).await.map_err(Into::into)
            }
            "task_view" => {
                let params: TaskIdParams = serde_json::from_value(params)?;
                self.task_view(Parameters(params)).await.map_err(Into::into)
            }
            "task_archive" => {
                let params: TaskIdParams = serde_json::from_value(params)?;
                self.task_archive(Parameters(params)).await.map_err(Into::into)
            }
            "task_demote" => {
                let params: TaskIdParams = serde_json::from_value(params)?;
                self.task_demote(Parameters(params)).await.map_err(Into::into)
            }
            "task_dependencies" => {
                let params: TaskIdParams = serde_json::from_value(params)?;
                self.task_dependencies(Parameters(params))
                    .await
                    .map_err(Into::into)
            }
            "task_children" => {
                let params: TaskIdParams = serde_json::from_value(params)?;
                self.task_children(Parameters(params)).await.map_err(Into::into)
            }

            "board_show" => self.board_show().await.map_err(Into::into),
            "board_export" => {
                let params: BoardExportParams = serde_json::from_value(params)?;
                self.board_export(Parameters(params)).await.map_err(Into::into)
            }
            "overview" => self.overview().await.map_err(Into::into),
            "sequence_list" => self.sequence_list().await.map_err(Into::into),

            "config_get" => {
                let params: ConfigGetParams = serde_json::from_value(params)?;
                self.config_get(Parameters(params)).await.map_err(Into::into)
            }
            "config_set" => {
                let params: ConfigSetParams = serde_json::from_value(params)?;
                self.config_set(Parameters(params)).await.map_err(Into::into)
            }
            "config_list" => self.config_list().await.map_err(Into::into),

            "draft_create" => {
                let params: DraftCreateParams = serde_json::from_value(params)?;
                self.draft_create(Parameters(params)).await.map_err(Into::into)
            }
            "draft_list" => self.draft_list().await.map_err(Into::into),
            "draft_promote" => {
                let params: DraftIdParams = serde_json::from_value(params)?;
                self.draft_promote(Parameters(params)).await.map_err(Into::into)
            }
            "draft_archive" => {
                let params: DraftIdParams = serde_json::from_value(params)?;
                self.draft_archive(Parameters(params)).await.map_err(Into::into)
            }
            "draft_view" => {
                let params: DraftIdParams = serde_json::from_value(params)?;
                self.draft_view(Parameters(params)).await.map_err(Into::into)
            }

            "doc_create" => {
                let params: DocCreateParams = serde_json::from_value(params)?;
                self.doc_create(Parameters(params)).await.map_err(Into::into)
            }
            "doc_list" => self.doc_list().await.map_err(Into::into),
            "doc_view" => {
                let params: DocViewParams = serde_json::from_value(params)?;
                self.doc_view(Parameters(params)).await.map_err(Into::into)
            }
            "decision_create" => {
                let params: DecisionCreateParams = serde_json::from_value(params)?;
                self.decision_create(Parameters(params))
                    .await
                    .map_err(Into::into)
            }
            "decision_list" => self.decision_list().await.map_err(Into::into),

            _ => Err(EmbeddableError::ToolNotFound(name.to_string())),
        }
    }
}
