use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{
    config::{Config, TestRootConfig},
    issues::{CoverageIssue, CoverageProblem, ParseErrorIssue},
};

// ============================================================
// Tool Parameters
// ============================================================

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GetConfigParams {
    /// Absolute path to the project root
    pub project_root_path: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScanCoverageParams {
    /// Absolute path to the project root
    pub project_root_path: String,
    /// Number of items to skip (default 0)
    pub offset: Option<u32>,
    /// Maximum number of items to return (default 50, max 100)
    pub limit: Option<u32>,
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResolveCoverageParams {
    /// Absolute path to the project root (used to load configuration)
    pub project_root_path: String,
    /// Fully qualified test class name, e.g. `Tests\Unit\Services\InvoiceServiceTest`
    pub class_name: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApplyCoverageParams {
    /// Absolute path to the project root
    pub project_root_path: String,
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
    pub config_path: Option<String>,
    pub config: ConfigValues,
}

#[derive(Debug, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConfigValues {
    pub ignores: Vec<String>,
    pub includes: Vec<String>,
    pub test_roots: Vec<TestRootValue>,
    pub fallback_namespace: String,
    pub special_names: Vec<String>,
    pub verify_covered_method: bool,
}

#[derive(Debug, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TestRootValue {
    pub prefix: String,
    pub replacement: String,
}

impl From<TestRootConfig> for TestRootValue {
    fn from(root: TestRootConfig) -> Self {
        Self {
            prefix: root.prefix,
            replacement: root.replacement,
        }
    }
}

impl From<Config> for ConfigValues {
    fn from(c: Config) -> Self {
        Self {
            ignores: c.ignores,
            includes: c.includes,
            test_roots: c.test_roots.into_iter().map(TestRootValue::from).collect(),
            fallback_namespace: c.fallback_namespace,
            special_names: c.special_names,
            verify_covered_method: c.verify_covered_method,
        }
    }
}

// ============================================================
// Scan Types (scan_coverage)
// ============================================================

#[derive(Debug, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CoverageScanResult {
    pub total_count: usize,
    pub total_file_count: usize,
    pub parse_errors: Vec<ParseErrorItem>,
    pub items: Vec<CoverageItem>,
    pub pagination: Pagination,
}

/// A single test class with wrong coverage attributes
#[derive(Debug, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CoverageItem {
    pub file_path: String,
    pub line: usize,
    pub class_name: String,
    /// One of `missing`, `wrongTarget`, `methodMismatch`
    pub problem: String,
    /// Class named by the current `CoversClass`, if any
    pub current_class: Option<String>,
    pub expected_class: String,
    pub covered_method: Option<String>,
    pub attributes_before: Vec<String>,
    pub attributes_after: Vec<String>,
}

impl From<&CoverageIssue> for CoverageItem {
    fn from(issue: &CoverageIssue) -> Self {
        let (problem, current_class) = match &issue.problem {
            CoverageProblem::Missing => ("missing", None),
            CoverageProblem::WrongTarget { current } => ("wrongTarget", Some(current.to_string())),
            CoverageProblem::MethodMismatch => {
                ("methodMismatch", Some(issue.expected_class.to_string()))
            }
        };
        Self {
            file_path: issue.context.file_path().to_string(),
            line: issue.context.line(),
            class_name: issue.class_name.to_string(),
            problem: problem.to_string(),
            current_class,
            expected_class: issue.expected_class.to_string(),
            covered_method: issue.covered_method.clone(),
            attributes_before: issue.attributes_before.clone(),
            attributes_after: issue.attributes_after.clone(),
        }
    }
}

#[derive(Debug, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ParseErrorItem {
    pub file_path: String,
    pub error: String,
}

impl From<&ParseErrorIssue> for ParseErrorItem {
    fn from(issue: &ParseErrorIssue) -> Self {
        Self {
            file_path: issue.file_path.clone(),
            error: issue.error.clone(),
        }
    }
}

// ============================================================
// Resolve Types (resolve_coverage)
// ============================================================

#[derive(Debug, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResolveCoverageResult {
    pub class_name: String,
    /// False when the name does not end with `Test`
    pub is_test_class: bool,
    pub tested_class: Option<String>,
    pub covered_method: Option<String>,
}

// ============================================================
// Apply Types (apply_coverage)
// ============================================================

#[derive(Debug, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApplyCoverageResult {
    pub classes_rewritten: usize,
    pub files_modified: usize,
    pub parse_errors: Vec<ParseErrorItem>,
}

// ============================================================
// Common
// ============================================================

#[derive(Debug, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub offset: usize,
    pub limit: usize,
    pub has_more: bool,
}
