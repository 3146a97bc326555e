//! Resolve command - print the class a test class covers.

use anyhow::Result;

use super::{CommandResult, CommandSummary, ResolveSummary, helper::finish};
use crate::{
    config::load_config,
    core::{
        declaration::ClassDeclaration,
        names::QualifiedName,
        resolver::{CoverageAnnotationResolver, ResolvedTarget},
    },
};

use super::super::args::ResolveCommand;

pub fn resolve(cmd: ResolveCommand) -> Result<CommandResult> {
    let config = load_config(&cmd.config_dir)?.config;
    let resolver = CoverageAnnotationResolver::new(config.resolver_options());

    let target = resolve_class_name(&resolver, &cmd.class_name);
    let not_a_test = target.is_none();

    let mut result = finish(
        CommandSummary::Resolve(ResolveSummary {
            class_name: QualifiedName::parse(&cmd.class_name).to_string(),
            target,
        }),
        Vec::new(),
        0,
        true,
    );
    if not_a_test {
        result.error_count += 1;
    }
    Ok(result)
}

/// Resolve a fully qualified test class name, e.g. `Tests\Unit\FooTest`.
pub fn resolve_class_name(
    resolver: &CoverageAnnotationResolver,
    class_name: &str,
) -> Option<ResolvedTarget> {
    let name = QualifiedName::parse(class_name);
    let simple_name = name.last()?;
    let decl = ClassDeclaration::new(simple_name, name.parent(), Vec::new());
    resolver.resolve_target(&decl)
}
