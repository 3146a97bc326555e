//! RewriteCoverage action.
//!
//! Rewrites the attribute groups of test classes so `CoversClass` (and
//! `CoversMethod`) name the tested class. Used by `covfix fix`.

use super::{operation::Operation, traits::Action};
use crate::issues::CoverageIssue;

pub struct RewriteCoverage;

impl Action<CoverageIssue> for RewriteCoverage {
    fn to_operations(issues: &[CoverageIssue]) -> Vec<Operation> {
        issues
            .iter()
            .filter(|issue| !issue.edits.is_empty())
            .map(|issue| Operation::RewriteAttributes {
                context: issue.context.clone(),
                edits: issue.edits.clone(),
                before: issue.attributes_before.clone(),
                after: issue.attributes_after.clone(),
            })
            .collect()
    }
}
