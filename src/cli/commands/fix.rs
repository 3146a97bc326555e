//! Fix command - rewrite coverage attributes.
//!
//! Every test class whose `CoversClass` is missing or points elsewhere gets
//! its attribute groups rewritten. CRUD-style test names also get a
//! `CoversMethod` group.
//!
//! Use `--apply` to actually write files (default is dry-run mode).

use std::collections::HashSet;

use anyhow::Result;

use super::super::{
    actions::{Action, ActionStats, RewriteCoverage},
    args::FixCommand,
};
use super::{CommandResult, CommandSummary, FixSummary, helper::finish};
use crate::{
    core::CheckContext,
    issues::{CoverageIssue, Issue},
    rules::check_coverage_issues,
};

pub fn fix(cmd: FixCommand) -> Result<CommandResult> {
    let args = &cmd.args;
    let ctx = CheckContext::new(&args.common)?;
    let apply = args.apply;

    let coverage_issues: Vec<CoverageIssue> = check_coverage_issues(&ctx);
    let file_count = coverage_issues
        .iter()
        .map(|issue| issue.context.file_path())
        .collect::<HashSet<_>>()
        .len();

    let stats = if apply && !coverage_issues.is_empty() {
        RewriteCoverage::run(&coverage_issues)?
    } else {
        ActionStats::default()
    };

    let parse_errors: Vec<Issue> = ctx
        .parsed_files_errors()
        .iter()
        .map(|i| Issue::ParseError(i.clone()))
        .collect();

    let pending = if apply { 0 } else { coverage_issues.len() };

    let mut result = finish(
        CommandSummary::Fix(FixSummary {
            is_apply: apply,
            file_count,
            stats,
            coverage_issues,
        }),
        parse_errors,
        ctx.files.len(),
        true,
    );
    // Pending rewrites in dry-run count as errors.
    result.error_count += pending;
    Ok(result)
}
