//! Issue types for coverage analysis results.
//!
//! Each issue is self-contained with all information needed by:
//! - Reporter: to display the issue to users (CLI, MCP)
//! - Action: to fix the issue (rewrite attribute groups)

use enum_dispatch::enum_dispatch;

use crate::core::{SourceContext, names::QualifiedName, rewrite::TextEdit};

// ============================================================
// Rule
// ============================================================

/// Rule identifier for each issue type. Every issue is reported as an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Rule {
    CoversClass,
    ParseError,
}

impl std::fmt::Display for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Rule::CoversClass => write!(f, "covers-class"),
            Rule::ParseError => write!(f, "parse-error"),
        }
    }
}

// ============================================================
// Coverage Problem
// ============================================================

/// What is wrong with a test class's coverage attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoverageProblem {
    /// No `CoversClass` attribute at all.
    Missing,
    /// `CoversClass` names a different class.
    WrongTarget { current: QualifiedName },
    /// Class target is right but `CoversMethod` is missing or stale.
    MethodMismatch,
}

impl std::fmt::Display for CoverageProblem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CoverageProblem::Missing => write!(f, "missing CoversClass"),
            CoverageProblem::WrongTarget { current } => {
                write!(f, "CoversClass points to {}", current)
            }
            CoverageProblem::MethodMismatch => write!(f, "missing or stale CoversMethod"),
        }
    }
}

// ============================================================
// Issue Types
// ============================================================

/// Test class whose coverage attributes do not match the class it tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverageIssue {
    pub context: SourceContext,
    /// Fully qualified name of the test class.
    pub class_name: QualifiedName,
    pub problem: CoverageProblem,
    pub expected_class: QualifiedName,
    /// Set for CRUD-style test names.
    pub covered_method: Option<String>,
    /// Source edits that bring the class in line.
    pub edits: Vec<TextEdit>,
    /// Attribute groups as currently written.
    pub attributes_before: Vec<String>,
    /// Attribute groups after the fix.
    pub attributes_after: Vec<String>,
}

impl CoverageIssue {
    pub fn rule() -> Rule {
        Rule::CoversClass
    }

    /// Expected attributes, rendered fully qualified.
    pub fn expected_attributes(&self) -> String {
        match &self.covered_method {
            Some(method) => format!(
                "CoversClass({}::class), CoversMethod({}::class, '{}')",
                self.expected_class, self.expected_class, method
            ),
            None => format!("CoversClass({}::class)", self.expected_class),
        }
    }
}

/// File could not be read or scanned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseErrorIssue {
    pub file_path: String,
    pub error: String,
}

impl ParseErrorIssue {
    pub fn rule() -> Rule {
        Rule::ParseError
    }
}

// ============================================================
// Issue Enum
// ============================================================

/// A coverage issue found during analysis.
#[enum_dispatch(Report)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Issue {
    Coverage(CoverageIssue),
    ParseError(ParseErrorIssue),
}

impl Issue {
    pub fn rule(&self) -> Rule {
        match self {
            Issue::Coverage(_) => CoverageIssue::rule(),
            Issue::ParseError(_) => ParseErrorIssue::rule(),
        }
    }
}

// ============================================================
// Report Trait (for CLI output)
// ============================================================

/// Location information for report output.
pub enum ReportLocation<'a> {
    /// Source code location (has source_line for context display).
    Source(&'a SourceContext),
    /// File-level only (for ParseError - no line context).
    File { path: &'a str },
}

/// Trait for types that can be reported to CLI.
///
/// Uses `enum_dispatch` for zero-cost dispatch on the `Issue` enum.
#[enum_dispatch]
pub trait Report {
    /// Get the location for this issue.
    fn location(&self) -> ReportLocation<'_>;

    /// Primary message to display.
    fn message(&self) -> String;

    fn report_rule(&self) -> Rule;

    /// Optional hint for fixing the issue.
    fn hint(&self) -> Option<&str> {
        None
    }

    /// Optional details for the "= note:" line.
    fn details(&self) -> Option<String> {
        None
    }
}

impl Report for CoverageIssue {
    fn location(&self) -> ReportLocation<'_> {
        ReportLocation::Source(&self.context)
    }

    fn message(&self) -> String {
        format!("{}: {}", self.class_name, self.problem)
    }

    fn report_rule(&self) -> Rule {
        Self::rule()
    }

    fn hint(&self) -> Option<&str> {
        Some("run `covfix fix --apply` to rewrite the attributes")
    }

    fn details(&self) -> Option<String> {
        Some(format!("expected: {}", self.expected_attributes()))
    }
}

impl Report for ParseErrorIssue {
    fn location(&self) -> ReportLocation<'_> {
        ReportLocation::File {
            path: &self.file_path,
        }
    }

    fn message(&self) -> String {
        self.error.clone()
    }

    fn report_rule(&self) -> Rule {
        Self::rule()
    }
}

// ============================================================
// Ordering for Issue (for sorting in reports)
// ============================================================

impl Issue {
    fn sort_file_path(&self) -> &str {
        match self.location() {
            ReportLocation::Source(ctx) => &ctx.location.file_path,
            ReportLocation::File { path } => path,
        }
    }

    fn sort_position(&self) -> (usize, usize) {
        match self.location() {
            ReportLocation::Source(ctx) => (ctx.location.line, ctx.location.col),
            ReportLocation::File { .. } => (0, 0),
        }
    }
}

impl Ord for Issue {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.sort_file_path()
            .cmp(other.sort_file_path())
            .then_with(|| self.sort_position().cmp(&other.sort_position()))
            .then_with(|| self.rule().cmp(&other.rule()))
            .then_with(|| self.message().cmp(&other.message()))
    }
}

impl PartialOrd for Issue {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}
