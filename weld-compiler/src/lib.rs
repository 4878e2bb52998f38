mod ast;
mod checks;
mod diagnostics;
mod duplicates;
mod error;
mod module;
mod names;
mod options;
mod reference;
mod resolve;
mod source;
mod symbols;
mod syntax;
mod type_name;

pub use crate::ast::SourceSpan;
pub use crate::checks::{check_contributed_bindings, check_no_merge_annotations, run_checks};
pub use crate::diagnostics::{Diagnostic, DiagnosticLevel, Diagnostics};
pub use crate::duplicates::{
    check_no_duplicate_scope_and_bound_type, find_duplicate_bound_types, ScopedContribution,
};
pub use crate::error::{CompilationError, CompilationResult, ErrorElement};
pub use crate::module::{ModuleContext, ResolutionCounts};
pub use crate::names::{well_known, FqName};
pub use crate::options::{MarkerAnnotation, MarkerTable, ModuleOptions};
pub use crate::reference::{
    AnnotationArgument, AnnotationReference, AnnotationValue, ClassReference, ClassSource,
    DeclarationKey, FunctionKind, FunctionReference, ParameterReference, PropertyReference,
    SuperTypeReference, TypeUsage,
};
pub use crate::source::SourceId;
pub use crate::symbols::{
    AnnotationDescriptor, ClassDescriptor, ConstantArgument, ConstantValue, FunctionDescriptor,
    PropertyDescriptor, ResolvedType, SymbolTable, ValueParameterDescriptor,
};
pub use crate::syntax::{
    AnnotationEntry, ArgumentExpr, ClassKind, ClassNode, FunctionNode, ImportDirective,
    ParameterNode, PropertyNode, SyntaxFile, TypeRefNode, ValueArgument,
};
pub use crate::type_name::TypeName;
