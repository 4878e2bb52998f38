//! The reference model. Every reference kind has a syntax-backed and a symbol-backed source,
//! but identity (equality and hashing) only ever looks at fully-qualified names and structural
//! position, so references obtained through either front-end are interchangeable.
//!
//! Ownership runs strictly downwards: the module caches class data, class data memoizes its
//! functions, properties and annotations, function data memoizes its parameters. The
//! `declaring_*` links of the reference handles are plain back-references into that tree.

mod annotation;
mod class;
mod function;
mod parameter;
mod property;

use crate::module::ModuleContext;
use crate::names::FqName;
use crate::symbols::ResolvedType;
use crate::syntax::TypeRefNode;
use crate::type_name::TypeName;

pub use annotation::{AnnotationArgument, AnnotationReference, AnnotationValue};
pub use class::{ClassReference, ClassSource, SuperTypeReference};
pub use function::{FunctionKind, FunctionReference};
pub use parameter::ParameterReference;
pub use property::PropertyReference;

pub(crate) use class::ClassData;

/// Cache key of a class: the node's position in the module's sources, or the descriptor name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) enum ClassKey {
    Syntax(SyntaxClassKey),
    Symbol(FqName),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) struct SyntaxClassKey {
    pub(crate) file: usize,
    /// Indices into the file's classes and then into each class's nested classes.
    pub(crate) path: Vec<usize>,
}

/// Identity of an annotated declaration.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DeclarationKey {
    Class(FqName),
    Function {
        class: FqName,
        signature: String,
    },
    Parameter {
        class: FqName,
        function: String,
        name: String,
    },
    Property {
        class: FqName,
        name: String,
    },
}

/// A type usage handed to [`ClassReference::resolve_type_reference`].
#[derive(Debug, Clone, Copy)]
pub enum TypeUsage<'a> {
    Syntax(&'a TypeRefNode),
    Symbol(&'a ResolvedType),
}

fn class_of<'m>(module: &'m ModuleContext, ty: &TypeName) -> Option<ClassReference<'m>> {
    module.class_reference_or_null(ty.as_function_type().fq_name_or_null()?)
}

/// Shared by parameters and properties: a declared class type wins, otherwise the declared type
/// variable is resolved from `implementing` up to `declaring`. Variables in `function_scoped`
/// belong to the declaring function and are never bound by a supertype.
fn resolve_generic_class<'m>(
    declared: Option<TypeName>,
    function_scoped: &[String],
    declaring: &ClassReference<'m>,
    implementing: &ClassReference<'m>,
) -> Option<ClassReference<'m>> {
    let declared = declared?;
    if let Some(class) = class_of(declaring.module(), &declared) {
        return Some(class);
    }
    if declared
        .variable_name()
        .is_some_and(|name| function_scoped.iter().any(|parameter| parameter == name))
    {
        return None;
    }
    implementing.resolve_generic_kotlin_type_or_null(declaring, &declared)
}

fn resolve_type_name<'m>(
    declared: Option<TypeName>,
    function_scoped: &[String],
    declaring: &ClassReference<'m>,
    implementing: &ClassReference<'m>,
) -> Option<TypeName> {
    let declared = declared?;
    Some(
        implementing
            .substitute_generics(declaring, &declared, function_scoped)
            .as_function_type(),
    )
}
