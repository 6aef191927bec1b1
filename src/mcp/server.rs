use std::path::Path;

use anyhow::Result;
use rmcp::{
    ErrorData as McpError, ServerHandler, ServiceExt,
    handler::server::tool::ToolRouter,
    handler::server::wrapper::Parameters,
    model::{CallToolResult, Content, ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router,
};

use crate::{
    catalog::Catalog,
    cli::args::{CheckArgs, CheckCommand, CommonArgs},
    cli::commands::check::check,
    config::load_config,
    findings::Severity,
    scanner,
};

use super::types::{
    ConfigDto, ConfigValues, FindingItem, GetConfigParams, Pagination, ScanFileParams,
    ScanFileResult, ScanThemeParams, ScanThemeResult,
};

#[derive(Clone)]
pub struct ThemelintMcpServer {
    tool_router: ToolRouter<Self>,
}

impl Default for ThemelintMcpServer {
    fn default() -> Self {
        Self::new()
    }
}

#[tool_router]
impl ThemelintMcpServer {
    pub fn new() -> Self {
        Self {
            tool_router: Self::tool_router(),
        }
    }

    /// Scan a whole theme and report conformance findings
    #[tool(
        description = "Scan a WordPress theme directory against marketplace review rules. Returns a paginated list of findings plus totals per severity."
    )]
    async fn scan_theme(
        &self,
        params: Parameters<ScanThemeParams>,
    ) -> Result<CallToolResult, McpError> {
        let path = &params.0.theme_root_path;
        let limit = params.0.limit.map(|v| v as usize).unwrap_or(20).min(100);
        let offset = params.0.offset.map(|v| v as usize).unwrap_or(0);

        let cmd = CheckCommand {
            categories: Vec::new(),
            args: CheckArgs {
                common: CommonArgs {
                    theme_root: std::path::PathBuf::from(path),
                    verbose: false,
                },
            },
        };

        let result =
            check(cmd).map_err(|e| McpError::internal_error(format!("Scan failed: {}", e), None))?;

        let count_of = |severity: Severity| {
            result
                .findings
                .iter()
                .filter(|f| f.severity == severity)
                .count()
        };
        let total_count = result.findings.len();
        let error_count = count_of(Severity::Error);
        let warning_count = count_of(Severity::Warning);
        let info_count = count_of(Severity::Info);

        let items: Vec<FindingItem> = result
            .findings
            .iter()
            .skip(offset)
            .take(limit)
            .map(FindingItem::from)
            .collect();

        let has_more = offset + items.len() < total_count;

        let scan_result = ScanThemeResult {
            total_count,
            files_checked: result.files_checked,
            error_count,
            warning_count,
            info_count,
            items,
            pagination: Pagination {
                offset,
                limit,
                has_more,
            },
        };

        let json_str = serde_json::to_string_pretty(&scan_result).map_err(|e| {
            McpError::internal_error(format!("JSON serialization failed: {}", e), None)
        })?;

        Ok(CallToolResult::success(vec![Content::text(json_str)]))
    }

    /// Scan a single theme file
    #[tool(
        description = "Scan a single theme file against the per-file rules. Theme-wide checks (missing required features, companion files) need scan_theme."
    )]
    async fn scan_file(
        &self,
        params: Parameters<ScanFileParams>,
    ) -> Result<CallToolResult, McpError> {
        let path = &params.0.file_path;

        let text = std::fs::read_to_string(path)
            .map_err(|e| McpError::internal_error(format!("Failed to read {}: {}", path, e), None))?;

        let findings = scanner::scan_file(Catalog::global(), path, &text);
        let items: Vec<FindingItem> = findings.iter().map(FindingItem::from).collect();

        let scan_result = ScanFileResult {
            file_path: path.clone(),
            total_count: items.len(),
            items,
        };

        let json_str = serde_json::to_string_pretty(&scan_result).map_err(|e| {
            McpError::internal_error(format!("JSON serialization failed: {}", e), None)
        })?;

        Ok(CallToolResult::success(vec![Content::text(json_str)]))
    }

    /// Get the current themelint configuration
    #[tool(description = "Get the current themelint configuration.")]
    async fn get_config(
        &self,
        params: Parameters<GetConfigParams>,
    ) -> Result<CallToolResult, McpError> {
        let path = Path::new(&params.0.theme_root_path);

        let result = load_config(path)
            .map_err(|e| McpError::internal_error(format!("Failed to load config: {}", e), None))?;

        let config_dto = ConfigDto {
            from_file: result.from_file,
            config: ConfigValues::from(result.config),
        };

        let json_str = serde_json::to_string_pretty(&config_dto).map_err(|e| {
            McpError::internal_error(format!("JSON serialization failed: {}", e), None)
        })?;

        Ok(CallToolResult::success(vec![Content::text(json_str)]))
    }
}

#[tool_handler]
impl ServerHandler for ThemelintMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Themelint MCP helps AI agents review WordPress themes against marketplace rules.\n\n\
                 Available tools:\n\
                 1. get_config - Get theme configuration\n\
                 2. scan_theme - Scan the whole theme (paginated findings, severity totals)\n\
                 3. scan_file - Scan one file with the per-file rules\n\n\
                 Recommended Workflow:\n\
                 1. Use scan_theme to get the overall state, errors first\n\
                 2. Fix security errors (eval, system calls, base64_decode)\n\
                 3. Add missing required features to functions.php\n\
                 4. Add missing companion files (screenshot, license, readme) and stylesheet headers\n\
                 5. Re-run scan_theme; use scan_file to verify individual fixes quickly."
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
            let service = ThemelintMcpServer::new();
            let server = service.serve(rmcp::transport::stdio()).await?;
            server.waiting().await?;
            Ok(())
        })
}
