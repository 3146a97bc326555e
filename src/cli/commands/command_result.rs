use super::super::{actions::ActionStats, exit_status::ExitStatus};
use crate::{
    core::resolver::ResolvedTarget,
    issues::{CoverageIssue, Issue},
};

#[derive(Debug)]
pub enum CommandSummary {
    Check,
    Fix(FixSummary),
    Resolve(ResolveSummary),
    Init(InitSummary),
}

#[derive(Debug)]
pub struct FixSummary {
    pub is_apply: bool,
    /// Number of files with pending (or applied) rewrites.
    pub file_count: usize,
    pub stats: ActionStats,
    pub coverage_issues: Vec<CoverageIssue>,
}

#[derive(Debug)]
pub struct ResolveSummary {
    pub class_name: String,
    /// `None` when the name is not a test class.
    pub target: Option<ResolvedTarget>,
}

#[derive(Debug)]
pub struct InitSummary {
    pub created: bool,
}

/// Result of running covfix commands
pub struct CommandResult {
    pub summary: CommandSummary,
    pub error_count: usize,
    /// If true, exit code 1 is returned when error_count > 0.
    /// If false, issues were handled (e.g. fixed with `--apply`).
    pub exit_on_errors: bool,
    /// Issues to report. Empty for commands that print their own output.
    pub issues: Vec<Issue>,
    /// Number of files that failed to parse.
    pub parse_error_count: usize,
    /// Number of PHP files that were checked.
    pub files_checked: usize,
}

impl CommandResult {
    pub fn exit_status(&self) -> ExitStatus {
        if self.parse_error_count > 0 {
            ExitStatus::Error
        } else if self.exit_on_errors && self.error_count > 0 {
            ExitStatus::Failure
        } else {
            ExitStatus::Success
        }
    }
}
