//! Class-level rules.
//!
//! A rule looks at one [`ClassDeclaration`] and decides which attribute groups
//! it should carry. Rules are collected into a [`RuleSet`] when a command
//! starts and run in order, each seeing the groups produced by the previous one.
//!
//! ## Module Structure
//!
//! - `coverage`: `CoversClass` / `CoversMethod` checks over parsed files

pub mod coverage;

use enum_dispatch::enum_dispatch;

use crate::core::{
    declaration::ClassDeclaration,
    resolver::{CoverageAnnotationResolver, RewriteDecision},
};

pub use coverage::{check_coverage_issues, check_file};

#[enum_dispatch]
pub trait ClassRule {
    /// Stable rule name, used in diagnostics.
    fn name(&self) -> &'static str;

    fn apply(&self, decl: &ClassDeclaration) -> RewriteDecision;
}

#[enum_dispatch(ClassRule)]
#[derive(Debug, Clone)]
pub enum Rules {
    CoverageAnnotationResolver,
}

/// Ordered list of rules applied to every class.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<Rules>,
}

impl RuleSet {
    pub fn new(rules: Vec<Rules>) -> Self {
        Self { rules }
    }

    /// The standard rule list for a configured resolver.
    pub fn from_resolver(resolver: &CoverageAnnotationResolver) -> Self {
        Self::new(vec![resolver.clone().into()])
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|rule| rule.name()).collect()
    }

    /// Run every rule over `decl`.
    ///
    /// Returns `Replace` with the final group list if any rule changed it.
    pub fn apply(&self, decl: &ClassDeclaration) -> RewriteDecision {
        let mut current = decl.clone();
        let mut changed = false;

        for rule in &self.rules {
            if let RewriteDecision::Replace(groups) = rule.apply(&current) {
                current.annotation_groups = groups;
                changed = true;
            }
        }

        if changed && current.annotation_groups != decl.annotation_groups {
            RewriteDecision::Replace(current.annotation_groups)
        } else {
            RewriteDecision::NoChange
        }
    }
}
