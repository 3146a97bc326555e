//! Coverage attribute rule.
//!
//! Runs the rule set over every class of every parsed file and turns
//! `Replace` decisions into [`CoverageIssue`]s carrying the planned edits.

use rayon::prelude::*;

use super::{ClassRule, RuleSet};
use crate::{
    core::{
        CheckContext, SourceContext, SourceLocation,
        declaration::{AnnotationArg, AnnotationGroup, COVERS_CLASS, ClassDeclaration},
        names::QualifiedName,
        parsers::php::{ParsedClass, ParsedPhpFile},
        resolver::{CoverageAnnotationResolver, RewriteDecision},
        rewrite::{NameRenderer, plan_edits},
    },
    issues::{CoverageIssue, CoverageProblem},
};

impl ClassRule for CoverageAnnotationResolver {
    fn name(&self) -> &'static str {
        "covers-class"
    }

    fn apply(&self, decl: &ClassDeclaration) -> RewriteDecision {
        self.resolve(decl)
    }
}

pub fn check_coverage_issues(ctx: &CheckContext) -> Vec<CoverageIssue> {
    let mut files: Vec<&ParsedPhpFile> = ctx.parsed_files().values().collect();
    files.sort_by(|a, b| a.file_path.cmp(&b.file_path));

    let rules = ctx.rules();
    let resolver = ctx.resolver();
    files
        .par_iter()
        .flat_map_iter(|file| check_file(file, rules, resolver))
        .collect()
}

/// Issues for one parsed file, in source order.
pub fn check_file(
    file: &ParsedPhpFile,
    rules: &RuleSet,
    resolver: &CoverageAnnotationResolver,
) -> Vec<CoverageIssue> {
    let mut issues = Vec::new();

    for class in &file.classes {
        let decl = &class.declaration;
        let RewriteDecision::Replace(groups) = rules.apply(decl) else {
            continue;
        };
        let Some(target) = resolver.resolve_target(decl) else {
            continue;
        };
        let Some(class_name) = decl.full_name() else {
            continue;
        };

        let problem = match current_covered_class(decl) {
            None => CoverageProblem::Missing,
            Some(current) if current != &target.tested_class => CoverageProblem::WrongTarget {
                current: current.clone(),
            },
            Some(_) => CoverageProblem::MethodMismatch,
        };

        issues.push(CoverageIssue {
            context: SourceContext::new(
                SourceLocation::new(&file.file_path, class.line, class.col),
                class.source_line.clone(),
            ),
            class_name,
            problem,
            expected_class: target.tested_class,
            covered_method: target.covered_method,
            edits: plan_edits(class, &groups, &file.imports),
            attributes_before: class
                .group_spans
                .iter()
                .map(|span| file.source[span.clone()].to_string())
                .collect(),
            attributes_after: render_groups(class, &groups, file),
        });
    }

    issues
}

/// New groups as they will read after the rewrite. Unchanged groups keep
/// their original text.
fn render_groups(class: &ParsedClass, groups: &[AnnotationGroup], file: &ParsedPhpFile) -> Vec<String> {
    let renderer = NameRenderer::new(&file.imports);
    groups
        .iter()
        .enumerate()
        .map(|(i, group)| match class.declaration.annotation_groups.get(i) {
            Some(existing) if existing == group => file.source[class.group_spans[i].clone()].to_string(),
            _ => renderer.group(group),
        })
        .collect()
}

/// Target of the first `CoversClass` attribute, if any.
fn current_covered_class(decl: &ClassDeclaration) -> Option<&QualifiedName> {
    decl.annotations()
        .filter(|annotation| annotation.is_kind(COVERS_CLASS))
        .find_map(|annotation| annotation.first_arg().and_then(AnnotationArg::as_class_ref))
}
