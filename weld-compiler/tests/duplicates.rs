mod common;

use common::*;
use proptest::prelude::*;
use weld_compiler::{
    check_no_duplicate_scope_and_bound_type, find_duplicate_bound_types, AnnotationDescriptor,
    AnnotationEntry, ClassDescriptor, ClassKind, ClassNode, CompilationResult, ConstantArgument,
    ConstantValue, FqName, ModuleContext, ModuleOptions, ResolvedType, ScopedContribution,
    TypeRefNode, ValueArgument,
};

const DUPLICATE_SUFFIX: &str = ". Contributing multiple times to the same scope with the same \
     bound type is forbidden and all scope - bound type combinations must be distinct.";

fn binding(scope: &str, bound_type: Option<&str>, line: usize) -> AnnotationEntry {
    let mut arguments = vec![ValueArgument::named("scope", class_literal(scope))];
    if let Some(bound_type) = bound_type {
        arguments.push(ValueArgument::named("boundType", class_literal(bound_type)));
    }
    entry("ContributesBinding", arguments, line)
}

fn contributing(name: &str, super_types: &[&str], annotations: Vec<AnnotationEntry>) -> ClassNode {
    let mut node = ClassNode::new(name, ClassKind::Class);
    node.super_types = super_types.iter().map(|name| TypeRefNode::simple(*name)).collect();
    node.annotations = annotations;
    node.span = span(40);
    node
}

fn module_of(classes: Vec<ClassNode>) -> ModuleContext {
    let mut classes = classes;
    classes.push(ClassNode::new("Repository", ClassKind::Interface));
    classes.push(ClassNode::new("Cache", ClassKind::Interface));
    ModuleContext::new(
        ModuleOptions::default(),
        vec![file_with("src/main/kotlin/app/Contributions.kt", classes)],
        library_symbols(),
    )
}

fn check(module: &ModuleContext, name: &str) -> CompilationResult<()> {
    let class = class(module, name);
    let annotations = class.annotations();
    class.check_no_duplicate_scope_and_bound_type(&annotations)
}

#[test]
fn same_scope_with_different_bound_types_is_allowed() {
    let module = module_of(vec![contributing(
        "Both",
        &["Repository", "Cache"],
        vec![
            binding("AppScope", Some("Repository"), 1),
            binding("AppScope", Some("Cache"), 2),
        ],
    )]);
    check(&module, "app.Both").expect("distinct bound types are fine");
}

#[test]
fn explicit_and_implicit_bound_types_are_distinct() {
    let module = module_of(vec![contributing(
        "Mixed",
        &["Repository"],
        vec![
            binding("AppScope", None, 1),
            binding("AppScope", Some("Repository"), 2),
        ],
    )]);
    check(&module, "app.Mixed").expect("an absent bound type only matches another absent one");
}

#[test]
fn different_scopes_with_the_same_bound_type_are_allowed() {
    let module = module_of(vec![contributing(
        "Scoped",
        &["Repository"],
        vec![
            binding("AppScope", Some("Repository"), 1),
            binding("UserScope", Some("Repository"), 2),
            binding("AppScope", Some("Cache"), 3),
        ],
    )]);
    check(&module, "app.Scoped").expect("each scope binds a type once");
}

#[test]
fn duplicate_bound_types_in_one_scope_fail() {
    let module = module_of(vec![contributing(
        "Twice",
        &["Repository"],
        vec![
            binding("AppScope", Some("Repository"), 1),
            binding("AppScope", Some("Repository"), 2),
        ],
    )]);

    let error = check(&module, "app.Twice").expect_err("duplicate contribution");
    assert_eq!(
        error.message(),
        format!(
            "app.Twice contributes multiple times to the same scope using the same bound type: \
             [Repository]{DUPLICATE_SUFFIX}"
        )
    );
    let element = error.element().expect("error is located at the class");
    assert_eq!(element.description, "app.Twice");
    assert_eq!(element.span.map(|span| span.line), Some(40));
}

#[test]
fn absent_bound_types_are_named_after_the_single_supertype() {
    let module = module_of(vec![contributing(
        "Implicit",
        &["Repository"],
        vec![binding("AppScope", None, 1), binding("AppScope", None, 2)],
    )]);

    let error = check(&module, "app.Implicit").expect_err("duplicate implicit contribution");
    assert!(
        error.message().contains("bound type: [Repository]."),
        "unexpected message: {}",
        error.message()
    );
}

#[test]
fn every_conflicting_bound_type_is_listed_once_in_order() {
    let module = module_of(vec![contributing(
        "Many",
        &["Repository", "Cache"],
        vec![
            binding("AppScope", Some("Cache"), 1),
            binding("AppScope", Some("Repository"), 2),
            binding("AppScope", Some("Repository"), 3),
            binding("AppScope", Some("Cache"), 4),
            binding("AppScope", Some("Cache"), 5),
        ],
    )]);

    let error = check(&module, "app.Many").expect_err("duplicate contributions");
    assert!(
        error.message().contains("bound type: [Cache, Repository]."),
        "unexpected message: {}",
        error.message()
    );
}

#[test]
fn symbol_classes_are_checked_the_same_way() {
    let mut symbols = library_symbols();
    symbols.insert(ClassDescriptor::new("lib", "Repository", ClassKind::Interface));
    let mut descriptor = ClassDescriptor::new("lib", "RealRepository", ClassKind::Class);
    descriptor.super_types.push(ResolvedType::class("lib.Repository"));
    let contribution = AnnotationDescriptor::new(
        "weld.annotations.ContributesBinding",
        vec![ConstantArgument::new(
            "scope",
            ConstantValue::KClass(FqName::new("app.scopes.AppScope")),
        )],
    );
    descriptor.annotations = vec![contribution.clone(), contribution];
    symbols.insert(descriptor);
    let module = ModuleContext::new(ModuleOptions::default(), Vec::new(), symbols);

    let error = check(&module, "lib.RealRepository").expect_err("duplicate contribution");
    assert!(error
        .message()
        .starts_with("lib.RealRepository contributes multiple times to the same scope using the same bound type: [Repository]."));
    assert_eq!(error.element().and_then(|element| element.path.clone()), None);
}

#[test]
fn missing_scopes_surface_as_errors() {
    let module = module_of(vec![contributing(
        "Unscoped",
        &["Repository"],
        vec![
            entry("ContributesBinding", Vec::new(), 1),
            entry("ContributesBinding", Vec::new(), 2),
        ],
    )]);

    let error = check(&module, "app.Unscoped").expect_err("scope is required");
    assert_eq!(
        error.message(),
        "Couldn't find scope for weld.annotations.ContributesBinding."
    );
}

#[derive(Debug, Clone)]
struct Usage {
    scope: u8,
    bound_type: Option<u8>,
}

impl ScopedContribution for Usage {
    type Scope = u8;
    type BoundType = u8;

    fn scope(&self) -> CompilationResult<u8> {
        Ok(self.scope)
    }

    fn bound_type_or_null(&self) -> Option<u8> {
        self.bound_type
    }
}

fn usage() -> impl Strategy<Value = Usage> {
    (0u8..4, proptest::option::of(0u8..4)).prop_map(|(scope, bound_type)| Usage { scope, bound_type })
}

proptest! {
    /// Inputs the early exits skip never contain a violation.
    #[test]
    fn short_inputs_never_violate(usages in proptest::collection::vec(usage(), 0..2)) {
        prop_assert_eq!(find_duplicate_bound_types(&usages).expect("scopes resolve"), None);
    }

    /// Two usages with different scopes never violate, whatever their bound types.
    #[test]
    fn two_scopes_never_violate(first in usage(), second in usage()) {
        prop_assume!(first.scope != second.scope);
        prop_assert_eq!(
            find_duplicate_bound_types(&[first, second]).expect("scopes resolve"),
            None
        );
    }

    /// A violation is reported exactly when some scope repeats a bound type.
    #[test]
    fn violations_match_a_naive_pairwise_check(usages in proptest::collection::vec(usage(), 0..8)) {
        let expected = usages.iter().enumerate().any(|(index, usage)| {
            usages[index + 1..]
                .iter()
                .any(|other| other.scope == usage.scope && other.bound_type == usage.bound_type)
        });
        let result = check_no_duplicate_scope_and_bound_type(&usages, "app.Generated", |bound| {
            format!("{bound:?}")
        });
        prop_assert_eq!(result.is_err(), expected);
    }
}
