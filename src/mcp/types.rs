use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::findings::Finding;

// ============================================================
// Tool Parameters
// ============================================================

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScanThemeParams {
    /// Path to the theme root directory
    pub theme_root_path: String,
    /// Max number of findings to return (default 20, max 100)
    pub limit: Option<u32>,
    /// Number of findings to skip
    pub offset: Option<u32>,
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScanFileParams {
    /// Path to a single theme file to scan
    pub file_path: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GetConfigParams {
    /// Path to the theme root directory
    pub theme_root_path: String,
}

// ============================================================
// Finding Types
// ============================================================

/// One finding, shaped for MCP consumers.
#[derive(Debug, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct FindingItem {
    pub file_path: String,
    /// 1-based line number
    pub line: usize,
    /// Half-open byte column range of the match
    pub col_start: usize,
    pub col_end: usize,
    pub severity: String,
    pub category: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub replacement: Option<String>,
}

impl From<&Finding> for FindingItem {
    fn from(finding: &Finding) -> Self {
        Self {
            file_path: finding.location.file_path.clone(),
            line: finding.location.line + 1,
            col_start: finding.location.col_start,
            col_end: finding.location.col_end,
            severity: finding.severity.to_string(),
            category: finding.category.to_string(),
            message: finding.message.clone(),
            replacement: finding.replacement.clone(),
        }
    }
}

#[derive(Debug, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub offset: usize,
    pub limit: usize,
    pub has_more: bool,
}

/// Result of scan_theme operation
#[derive(Debug, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScanThemeResult {
    pub total_count: usize,
    pub files_checked: usize,
    pub error_count: usize,
    pub warning_count: usize,
    pub info_count: usize,
    pub items: Vec<FindingItem>,
    pub pagination: Pagination,
}

/// Result of scan_file operation
#[derive(Debug, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScanFileResult {
    pub file_path: String,
    pub total_count: usize,
    pub items: Vec<FindingItem>,
}

// ============================================================
// Config Types (get_config)
// ============================================================

/// Configuration DTO for MCP
#[derive(Debug, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConfigDto {
    /// True if config was loaded from a file, false if using defaults
    pub from_file: bool,
    pub config: ConfigValues,
}

#[derive(Debug, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConfigValues {
    pub ignores: Vec<String>,
    pub includes: Vec<String>,
    pub entry_file: String,
    pub stylesheet: String,
    pub debounce_ms: u64,
}

impl From<crate::config::Config> for ConfigValues {
    fn from(c: crate::config::Config) -> Self {
        Self {
            ignores: c.ignores,
            includes: c.includes,
            entry_file: c.entry_file,
            stylesheet: c.stylesheet,
            debounce_ms: c.debounce_ms,
        }
    }
}
