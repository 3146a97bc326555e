use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::Result;
use rmcp::{
    ErrorData as McpError, ServerHandler, ServiceExt,
    handler::server::tool::ToolRouter,
    handler::server::wrapper::Parameters,
    model::{CallToolResult, Content, ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router,
};
use serde::Serialize;

use crate::{
    cli::{
        actions::{Action, RewriteCoverage},
        args::CommonArgs,
        commands::resolve::resolve_class_name,
    },
    config::load_config,
    core::{CheckContext, names::QualifiedName, resolver::CoverageAnnotationResolver},
    rules::check_coverage_issues,
};

use super::types::{
    ApplyCoverageParams, ApplyCoverageResult, ConfigDto, ConfigValues, CoverageItem,
    CoverageScanResult, GetConfigParams, Pagination, ParseErrorItem, ResolveCoverageParams,
    ResolveCoverageResult, ScanCoverageParams,
};

#[derive(Clone)]
pub struct CovfixMcpServer {
    tool_router: ToolRouter<Self>,
}

impl Default for CovfixMcpServer {
    fn default() -> Self {
        Self::new()
    }
}

fn to_json_result<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let json_str = serde_json::to_string_pretty(value).map_err(|e| {
        McpError::internal_error(format!("JSON serialization failed: {}", e), None)
    })?;
    Ok(CallToolResult::success(vec![Content::text(json_str)]))
}

fn load_context(project_root_path: &str) -> Result<CheckContext, McpError> {
    let common = CommonArgs {
        path: PathBuf::from(project_root_path),
        verbose: false,
    };
    CheckContext::new(&common)
        .map_err(|e| McpError::internal_error(format!("Failed to initialize: {}", e), None))
}

#[tool_router]
impl CovfixMcpServer {
    pub fn new() -> Self {
        Self {
            tool_router: Self::tool_router(),
        }
    }

    /// List test classes whose coverage attributes are missing or wrong
    #[tool(
        description = "Scan PHP test classes for missing or wrong CoversClass/CoversMethod attributes. Returns paginated list of issues with the expected attributes."
    )]
    pub async fn scan_coverage(
        &self,
        params: Parameters<ScanCoverageParams>,
    ) -> Result<CallToolResult, McpError> {
        let limit = params.0.limit.map(|v| v as usize).unwrap_or(50).min(100);
        let offset = params.0.offset.map(|v| v as usize).unwrap_or(0);

        let ctx = load_context(&params.0.project_root_path)?;
        let issues = check_coverage_issues(&ctx);

        let total_count = issues.len();
        let total_file_count = issues
            .iter()
            .map(|issue| issue.context.file_path())
            .collect::<HashSet<_>>()
            .len();

        let items: Vec<CoverageItem> = issues
            .iter()
            .skip(offset)
            .take(limit)
            .map(CoverageItem::from)
            .collect();
        let has_more = offset + items.len() < total_count;

        to_json_result(&CoverageScanResult {
            total_count,
            total_file_count,
            parse_errors: ctx
                .parsed_files_errors()
                .iter()
                .map(ParseErrorItem::from)
                .collect(),
            items,
            pagination: Pagination {
                offset,
                limit,
                has_more,
            },
        })
    }

    /// Resolve the class a test class covers
    #[tool(
        description = "Resolve the production class (and CRUD method, if any) that a fully qualified PHP test class name covers."
    )]
    pub async fn resolve_coverage(
        &self,
        params: Parameters<ResolveCoverageParams>,
    ) -> Result<CallToolResult, McpError> {
        let class_name = params.0.class_name.trim();
        if class_name.is_empty() {
            return Err(McpError::invalid_params(
                "className must not be empty".to_string(),
                None,
            ));
        }

        let config = load_config(Path::new(&params.0.project_root_path))
            .map_err(|e| McpError::internal_error(format!("Failed to load config: {}", e), None))?
            .config;
        let resolver = CoverageAnnotationResolver::new(config.resolver_options());
        let target = resolve_class_name(&resolver, class_name);

        to_json_result(&ResolveCoverageResult {
            class_name: QualifiedName::parse(class_name).to_string(),
            is_test_class: target.is_some(),
            tested_class: target.as_ref().map(|t| t.tested_class.to_string()),
            covered_method: target.and_then(|t| t.covered_method),
        })
    }

    /// Rewrite coverage attributes in place
    #[tool(
        description = "Rewrite CoversClass/CoversMethod attributes of every PHP test class under the project root so they name the tested class. Modifies files."
    )]
    pub async fn apply_coverage(
        &self,
        params: Parameters<ApplyCoverageParams>,
    ) -> Result<CallToolResult, McpError> {
        let ctx = load_context(&params.0.project_root_path)?;
        let issues = check_coverage_issues(&ctx);

        let stats = RewriteCoverage::run(&issues)
            .map_err(|e| McpError::internal_error(format!("Rewrite failed: {}", e), None))?;

        to_json_result(&ApplyCoverageResult {
            classes_rewritten: stats.changes_applied,
            files_modified: stats.files_modified,
            parse_errors: ctx
                .parsed_files_errors()
                .iter()
                .map(ParseErrorItem::from)
                .collect(),
        })
    }

    /// Get project configuration
    #[tool(
        description = "Get covfix configuration (.covfixrc.json) for the project, or defaults if no config file exists."
    )]
    pub async fn get_config(
        &self,
        params: Parameters<GetConfigParams>,
    ) -> Result<CallToolResult, McpError> {
        let path = Path::new(&params.0.project_root_path);

        let result = load_config(path)
            .map_err(|e| McpError::internal_error(format!("Failed to load config: {}", e), None))?;

        to_json_result(&ConfigDto {
            from_file: result.from_file(),
            config_path: result.path.map(|p| p.to_string_lossy().into_owned()),
            config: ConfigValues::from(result.config),
        })
    }
}

#[tool_handler]
impl ServerHandler for CovfixMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Covfix MCP keeps PHPUnit CoversClass/CoversMethod attributes in line with the classes tests exercise.\n\n\
                 Available tools:\n\
                 1. get_config - Get project configuration\n\
                 2. scan_coverage - List test classes with missing or wrong coverage attributes (paginated)\n\
                 3. resolve_coverage - Resolve the class a single test class name covers\n\
                 4. apply_coverage - Rewrite coverage attributes in place\n\n\
                 Recommended Workflow:\n\
                 1. Use scan_coverage to review what would change\n\
                 2. Use resolve_coverage to check individual names if a target looks wrong\n\
                 3. Run apply_coverage, then scan_coverage again to confirm totalCount is 0"
                    .into(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

/// Entry point for MCP server
pub fn run_server() -> Result<()> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?
        .block_on(async {
            let service = CovfixMcpServer::new();
            let server = service.serve(rmcp::transport::stdio()).await?;
            server.waiting().await?;
            Ok(())
        })
}
