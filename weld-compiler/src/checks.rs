//! Module-level checks built on the reference model.

use tracing::debug;
use weld_support::quoted;

use crate::diagnostics::Diagnostics;
use crate::error::CompilationResult;
use crate::module::ModuleContext;
use crate::names::{well_known, FqName};
use crate::reference::ClassReference;

/// In restrictive mode no class of the module may carry a merge annotation. Fails at the first
/// such class.
pub fn check_no_merge_annotations(module: &ModuleContext) -> CompilationResult<()> {
    if !module.options().disable_component_merging {
        return Ok(());
    }

    let merge_annotations: Vec<FqName> = well_known::MERGE_ANNOTATIONS
        .iter()
        .map(|name| FqName::new(*name))
        .collect();
    let offending = module.syntax_classes().find(|class| {
        merge_annotations
            .iter()
            .any(|annotation| class.is_annotated_with(annotation))
    });

    match offending {
        Some(class) => Err(class.error(format!(
            "Module {} is configured to only generate code with the {} flag. However, it \
             contains code that uses merge annotations. That's not supported.",
            module.name(),
            quoted("disable_component_merging"),
        ))),
        None => Ok(()),
    }
}

fn check_class_contributions(class: &ClassReference<'_>) -> CompilationResult<()> {
    for annotation in [
        well_known::CONTRIBUTES_BINDING,
        well_known::CONTRIBUTES_MULTIBINDING,
    ] {
        let annotation = FqName::new(annotation);
        let contributions: Vec<_> = class
            .annotations()
            .into_iter()
            .filter(|candidate| *candidate.fq_name() == annotation)
            .collect();
        class.check_no_duplicate_scope_and_bound_type(&contributions)?;
    }
    Ok(())
}

/// Runs the duplicate scope and bound type check over the binding and multibinding
/// contributions of every class in the module.
pub fn check_contributed_bindings(module: &ModuleContext) -> CompilationResult<()> {
    module
        .syntax_classes()
        .try_for_each(|class| check_class_contributions(&class))
}

/// Runs every check and collects the failures instead of stopping at the first one.
pub fn run_checks(module: &ModuleContext) -> Diagnostics {
    let mut diagnostics = Diagnostics::new();
    if let Err(error) = check_no_merge_annotations(module) {
        diagnostics.report(&error);
    }
    for class in module.syntax_classes() {
        if let Err(error) = check_class_contributions(&class) {
            diagnostics.report(&error);
        }
    }
    debug!(
        module = module.name(),
        errors = diagnostics.entries().len(),
        "ran module checks"
    );
    diagnostics
}
