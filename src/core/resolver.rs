//! Coverage target resolution.
//!
//! Maps a test class to the production class it covers and decides whether the
//! class's attribute groups already say so. Everything here is a pure function
//! of the [`ClassDeclaration`] and the [`ResolverOptions`]; applying the
//! returned [`RewriteDecision`] to source text is the rewriter's job.
//!
//! ## Naming convention
//!
//! ```text
//! Tests\Unit\Services\Billing\InvoiceServiceTest      -> \App\Services\Billing\InvoiceService
//! Tests\Feature\Http\Controllers\TeamController\DeleteTest
//!                                                     -> \App\Http\Controllers\TeamController::Delete
//! Custom\Path\FooTest                                 -> \App\Foo
//! ```

use super::declaration::{
    AnnotationArg, AnnotationGroup, AnnotationUse, COVERS_CLASS, COVERS_METHOD, ClassDeclaration,
};
use super::names::QualifiedName;

/// Suffix every test class name ends with.
pub const TEST_SUFFIX: &str = "Test";

/// CRUD-style test names that cover a single controller method.
pub const SPECIAL_TEST_NAMES: [&str; 6] = [
    "CreateTest",
    "UpdateTest",
    "DeleteTest",
    "ShowTest",
    "IndexTest",
    "DestroyTest",
];

/// A test namespace root and the production root it maps to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestRoot {
    pub prefix: QualifiedName,
    pub replacement: QualifiedName,
}

impl TestRoot {
    pub fn new(prefix: &str, replacement: &str) -> Self {
        Self {
            prefix: QualifiedName::parse(prefix),
            replacement: QualifiedName::parse(replacement),
        }
    }
}

pub fn default_test_roots() -> Vec<TestRoot> {
    vec![
        TestRoot::new("Tests\\Feature", "App"),
        TestRoot::new("Tests\\Unit", "App"),
    ]
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverOptions {
    /// Checked in order, first prefix match wins.
    pub test_roots: Vec<TestRoot>,
    /// Namespace used when no test root matches.
    pub fallback_namespace: QualifiedName,
    pub special_names: Vec<String>,
    /// Also require a matching `CoversMethod` before reporting no change.
    pub verify_covered_method: bool,
}

impl Default for ResolverOptions {
    fn default() -> Self {
        Self {
            test_roots: default_test_roots(),
            fallback_namespace: QualifiedName::parse("App"),
            special_names: SPECIAL_TEST_NAMES.map(String::from).to_vec(),
            verify_covered_method: false,
        }
    }
}

/// The class (and optionally the method) a test class covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTarget {
    pub tested_class: QualifiedName,
    /// Set only for special test names.
    pub covered_method: Option<String>,
}

/// What should happen to a class's attribute groups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RewriteDecision {
    NoChange,
    /// The complete new list of attribute groups, in order.
    Replace(Vec<AnnotationGroup>),
}

impl RewriteDecision {
    pub fn groups(&self) -> Option<&[AnnotationGroup]> {
        match self {
            RewriteDecision::NoChange => None,
            RewriteDecision::Replace(groups) => Some(groups),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct CoverageAnnotationResolver {
    options: ResolverOptions,
}

impl CoverageAnnotationResolver {
    pub fn new(options: ResolverOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ResolverOptions {
        &self.options
    }

    pub fn is_special(&self, simple_name: &str) -> bool {
        self.options.special_names.iter().any(|n| n == simple_name)
    }

    /// Compute the covered class for a test class.
    ///
    /// Returns `None` when the declaration has no name or namespace, or when the
    /// name does not end with `Test`.
    pub fn resolve_target(&self, decl: &ClassDeclaration) -> Option<ResolvedTarget> {
        let simple_name = decl.simple_name.as_deref()?;
        let namespace = decl.namespace.as_ref()?;
        let stem = simple_name.strip_suffix(TEST_SUFFIX)?;

        let is_special = self.is_special(simple_name);
        // Special names cover the enclosing namespace segment itself. A class
        // named just `Test` degenerates the same way.
        let tested_simple_name = if is_special { "" } else { stem };
        let covered_method = is_special.then(|| stem.to_string());

        let full_name = namespace.join(simple_name);
        let mapped = self
            .options
            .test_roots
            .iter()
            .find_map(|root| full_name.replace_prefix(&root.prefix, &root.replacement));

        let tested_class = match mapped {
            Some(mapped) => mapped.parent().join(tested_simple_name),
            None => self.options.fallback_namespace.join(tested_simple_name),
        };
        let tested_class = if tested_class.is_root() {
            self.options.fallback_namespace.join(tested_simple_name)
        } else {
            tested_class
        };

        Some(ResolvedTarget {
            tested_class,
            covered_method,
        })
    }

    /// Decide the attribute groups a test class should carry.
    pub fn resolve(&self, decl: &ClassDeclaration) -> RewriteDecision {
        let Some(target) = self.resolve_target(decl) else {
            return RewriteDecision::NoChange;
        };

        if has_covers_class(decl, &target.tested_class) {
            if !self.options.verify_covered_method {
                return RewriteDecision::NoChange;
            }
            return match &target.covered_method {
                Some(method) if !has_covers_method(decl, &target.tested_class, method) => {
                    RewriteDecision::Replace(replace_covers_method(decl, &target, method))
                }
                _ => RewriteDecision::NoChange,
            };
        }

        RewriteDecision::Replace(place_groups(decl, &target))
    }
}

fn has_covers_class(decl: &ClassDeclaration, tested_class: &QualifiedName) -> bool {
    decl.annotations().any(|annotation| {
        annotation.is_kind(COVERS_CLASS)
            && annotation.first_arg().and_then(AnnotationArg::as_class_ref) == Some(tested_class)
    })
}

fn has_covers_method(decl: &ClassDeclaration, tested_class: &QualifiedName, method: &str) -> bool {
    decl.annotations().any(|annotation| {
        annotation.is_kind(COVERS_METHOD)
            && annotation.first_arg().and_then(AnnotationArg::as_class_ref) == Some(tested_class)
            && annotation.args.get(1).and_then(AnnotationArg::as_str) == Some(method)
    })
}

/// First existing group becomes the covers-class group, the covers-method
/// group goes last. Groups in between are left alone.
fn place_groups(decl: &ClassDeclaration, target: &ResolvedTarget) -> Vec<AnnotationGroup> {
    let covers_class = AnnotationGroup::single(AnnotationUse::covers_class(&target.tested_class));

    let mut groups = Vec::with_capacity(decl.annotation_groups.len() + 1);
    groups.push(covers_class);
    groups.extend(decl.annotation_groups.iter().skip(1).cloned());

    if let Some(method) = &target.covered_method {
        groups.push(AnnotationGroup::single(AnnotationUse::covers_method(
            &target.tested_class,
            method,
        )));
    }
    groups
}

/// Class target is right but the method is stale or missing: strip every
/// `CoversMethod` use, drop groups left empty by that, and append the correct one.
fn replace_covers_method(
    decl: &ClassDeclaration,
    target: &ResolvedTarget,
    method: &str,
) -> Vec<AnnotationGroup> {
    let mut groups: Vec<AnnotationGroup> = decl
        .annotation_groups
        .iter()
        .filter_map(|group| {
            let kept: Vec<AnnotationUse> = group
                .annotations
                .iter()
                .filter(|a| !a.is_kind(COVERS_METHOD))
                .cloned()
                .collect();
            match kept.len() {
                n if n == group.annotations.len() => Some(group.clone()),
                0 => None,
                _ => Some(AnnotationGroup::new(kept)),
            }
        })
        .collect();
    groups.push(AnnotationGroup::single(AnnotationUse::covers_method(
        &target.tested_class,
        method,
    )));
    groups
}
