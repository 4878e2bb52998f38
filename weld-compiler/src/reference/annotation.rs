use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

use once_cell::unsync::OnceCell;
use tracing::debug;
use weld_support::missing_argument_error;

use super::{ClassReference, ClassSource, DeclarationKey};
use crate::error::{CompilationError, CompilationResult, ErrorElement};
use crate::module::ModuleContext;
use crate::names::{well_known, FqName};
use crate::options::MarkerAnnotation;
use crate::resolve::TypeScope;
use crate::symbols::{AnnotationDescriptor, ConstantArgument, ConstantValue};
use crate::syntax::{AnnotationEntry, ArgumentExpr, ValueArgument};

/// A resolved annotation argument value. Both front-ends produce the same values for the same
/// source.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AnnotationValue {
    Class(FqName),
    Enum { class: FqName, entry: String },
    String(String),
    Int(i64),
    Bool(bool),
    Array(Vec<AnnotationValue>),
    Annotation {
        fq_name: FqName,
        arguments: Vec<AnnotationArgument>,
    },
}

impl AnnotationValue {
    pub fn as_class(&self) -> Option<&FqName> {
        match self {
            AnnotationValue::Class(fq_name) => Some(fq_name),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AnnotationArgument {
    pub name: String,
    pub value: AnnotationValue,
}

pub(crate) struct AnnotationData {
    /// Position of the usage in the declaration's annotation list.
    index: usize,
    fq_name: FqName,
    arguments: OnceCell<Vec<AnnotationArgument>>,
}

#[derive(Debug, Clone, Copy)]
pub(crate) enum AnnotationSources<'m> {
    Syntax(&'m [AnnotationEntry]),
    Symbol(&'m [AnnotationDescriptor]),
}

#[derive(Clone)]
enum AnnotationSource<'m> {
    /// Arguments are resolved through the imports of `class`'s file.
    Syntax {
        entry: &'m AnnotationEntry,
        class: ClassReference<'m>,
    },
    Symbol(&'m AnnotationDescriptor),
}

/// Builds the annotation references of one declaration inside `declaring_class`, computing the
/// list at most once. Syntax annotations whose type cannot be resolved are left out.
pub(crate) fn memoized_annotations<'m>(
    cell: &OnceCell<Vec<Rc<AnnotationData>>>,
    declaring_class: &ClassReference<'m>,
    declaration: DeclarationKey,
    sources: AnnotationSources<'m>,
) -> Vec<AnnotationReference<'m>> {
    let module = declaring_class.module();
    let data = cell.get_or_init(|| {
        module.record(|counts| counts.annotations += 1);
        let data: Vec<Rc<AnnotationData>> = match sources {
            AnnotationSources::Syntax(entries) => {
                let scope = declaring_class.type_scope();
                entries
                    .iter()
                    .enumerate()
                    .filter_map(|(index, entry)| {
                        let fq_name = scope
                            .as_ref()
                            .and_then(|scope| scope.resolve_class_name(&entry.name));
                        if fq_name.is_none() {
                            debug!(annotation = %entry.name, ?declaration, "skipping unresolvable annotation");
                        }
                        Some(Rc::new(AnnotationData::new(index, fq_name?)))
                    })
                    .collect()
            }
            AnnotationSources::Symbol(descriptors) => descriptors
                .iter()
                .enumerate()
                .map(|(index, descriptor)| {
                    Rc::new(AnnotationData::new(index, descriptor.fq_name.clone()))
                })
                .collect(),
        };
        debug!(?declaration, count = data.len(), "computed annotations");
        data
    });

    data.iter()
        .filter_map(|data| {
            let source = match sources {
                AnnotationSources::Syntax(entries) => AnnotationSource::Syntax {
                    entry: entries.get(data.index)?,
                    class: declaring_class.clone(),
                },
                AnnotationSources::Symbol(descriptors) => {
                    AnnotationSource::Symbol(descriptors.get(data.index)?)
                }
            };
            Some(AnnotationReference {
                module,
                declaration: declaration.clone(),
                data: data.clone(),
                source,
            })
        })
        .collect()
}

impl AnnotationData {
    fn new(index: usize, fq_name: FqName) -> Self {
        Self {
            index,
            fq_name,
            arguments: OnceCell::new(),
        }
    }
}

/// One annotation usage on a declaration.
#[derive(Clone)]
pub struct AnnotationReference<'m> {
    module: &'m ModuleContext,
    declaration: DeclarationKey,
    data: Rc<AnnotationData>,
    source: AnnotationSource<'m>,
}

impl<'m> AnnotationReference<'m> {
    pub fn fq_name(&self) -> &FqName {
        &self.data.fq_name
    }

    pub fn short_name(&self) -> &str {
        self.data.fq_name.short_name()
    }

    pub fn declaration(&self) -> &DeclarationKey {
        &self.declaration
    }

    pub fn module(&self) -> &'m ModuleContext {
        self.module
    }

    /// The annotation class itself, if either front-end knows it.
    pub fn class_reference_or_null(&self) -> Option<ClassReference<'m>> {
        self.module.class_reference_or_null(&self.data.fq_name)
    }

    /// Arguments that were written at the usage site, in the order the annotation class declares
    /// its parameters. Defaults that were not written are absent.
    pub fn arguments(&self) -> &[AnnotationArgument] {
        self.data.arguments.get_or_init(|| {
            self.module
                .record(|counts| counts.annotation_arguments += 1);
            let declared = declared_argument_names(self.module, &self.data.fq_name);
            let arguments = match &self.source {
                AnnotationSource::Syntax { entry, class } => match class.type_scope() {
                    Some(scope) => syntax_arguments(self.module, &scope, &entry.arguments, &declared),
                    None => Vec::new(),
                },
                AnnotationSource::Symbol(descriptor) => {
                    symbol_arguments(self.module, &descriptor.arguments, &declared)
                }
            };
            debug!(annotation = %self.data.fq_name, count = arguments.len(), "computed annotation arguments");
            arguments
        })
    }

    pub fn argument_or_null(&self, name: &str) -> Option<&AnnotationValue> {
        self.arguments()
            .iter()
            .find(|argument| argument.name == name)
            .map(|argument| &argument.value)
    }

    fn class_argument_or_null(&self, name: &str) -> Option<ClassReference<'m>> {
        let fq_name = self.argument_or_null(name)?.as_class()?;
        self.module.class_reference_or_null(fq_name)
    }

    pub fn scope_or_null(&self) -> Option<ClassReference<'m>> {
        self.class_argument_or_null(well_known::SCOPE_ARGUMENT)
    }

    pub fn scope(&self) -> CompilationResult<ClassReference<'m>> {
        self.scope_or_null().ok_or_else(|| {
            self.error(missing_argument_error(
                well_known::SCOPE_ARGUMENT,
                &self.data.fq_name,
            ))
        })
    }

    pub fn bound_type_or_null(&self) -> Option<ClassReference<'m>> {
        self.class_argument_or_null(well_known::BOUND_TYPE_ARGUMENT)
    }

    fn is_marked_with(&self, marker: MarkerAnnotation) -> bool {
        let marker = self.module.options().markers.fq_name(marker);
        self.class_reference_or_null()
            .map_or(false, |class| class.is_annotated_with(marker))
    }

    pub fn is_qualifier(&self) -> bool {
        self.is_marked_with(MarkerAnnotation::Qualifier)
    }

    pub fn is_map_key(&self) -> bool {
        self.is_marked_with(MarkerAnnotation::MapKey)
    }

    pub fn is_dagger_scope(&self) -> bool {
        self.is_marked_with(MarkerAnnotation::Scope)
    }

    pub fn error_element(&self) -> ErrorElement {
        let description = format!("@{}", self.data.fq_name);
        match &self.source {
            AnnotationSource::Syntax { entry, class } => match class.source() {
                ClassSource::Syntax { file, .. } => {
                    ErrorElement::located(description, file.path.clone(), entry.span)
                }
                ClassSource::Symbol(_) => ErrorElement::described(description),
            },
            AnnotationSource::Symbol(_) => ErrorElement::described(description),
        }
    }

    pub fn error(&self, message: impl Into<String>) -> CompilationError {
        CompilationError::new(message).with_element(self.error_element())
    }
}

fn declared_argument_names(module: &ModuleContext, fq_name: &FqName) -> Vec<String> {
    let Some(class) = module.class_reference_or_null(fq_name) else {
        return Vec::new();
    };
    if let Some(constructor) = class.constructors().first() {
        return constructor
            .parameters()
            .iter()
            .map(|parameter| parameter.name().to_string())
            .collect();
    }
    class
        .properties()
        .iter()
        .map(|property| property.name().to_string())
        .collect()
}

fn in_declaration_order(mut arguments: Vec<AnnotationArgument>, declared: &[String]) -> Vec<AnnotationArgument> {
    arguments.sort_by_key(|argument| {
        declared
            .iter()
            .position(|name| *name == argument.name)
            .unwrap_or(declared.len())
    });
    arguments
}

fn syntax_arguments(
    module: &ModuleContext,
    scope: &TypeScope<'_>,
    arguments: &[ValueArgument],
    declared: &[String],
) -> Vec<AnnotationArgument> {
    let mut resolved = Vec::with_capacity(arguments.len());
    for (position, argument) in arguments.iter().enumerate() {
        let name = match (&argument.name, declared.get(position)) {
            (Some(name), _) => name.clone(),
            (None, Some(name)) => name.clone(),
            (None, None) => {
                debug!(position, "dropping positional argument without a declared parameter");
                continue;
            }
        };
        match syntax_value(module, scope, &argument.value) {
            Some(value) => resolved.push(AnnotationArgument { name, value }),
            None => debug!(argument = %name, "dropping unresolvable argument"),
        }
    }
    in_declaration_order(resolved, declared)
}

fn syntax_value(module: &ModuleContext, scope: &TypeScope<'_>, value: &ArgumentExpr) -> Option<AnnotationValue> {
    let value = match value {
        ArgumentExpr::ClassLiteral(type_ref) => {
            let ty = scope.resolve(type_ref)?.as_function_type();
            AnnotationValue::Class(ty.fq_name_or_null()?.clone())
        }
        ArgumentExpr::Reference(reference) => {
            let (class, entry) = scope.resolve_enum_entry(reference)?;
            AnnotationValue::Enum { class, entry }
        }
        ArgumentExpr::String(value) => AnnotationValue::String(value.clone()),
        ArgumentExpr::Int(value) => AnnotationValue::Int(*value),
        ArgumentExpr::Bool(value) => AnnotationValue::Bool(*value),
        ArgumentExpr::Array(values) => AnnotationValue::Array(
            values
                .iter()
                .map(|value| syntax_value(module, scope, value))
                .collect::<Option<_>>()?,
        ),
        ArgumentExpr::Annotation(entry) => {
            let fq_name = scope.resolve_class_name(&entry.name)?;
            let declared = declared_argument_names(module, &fq_name);
            AnnotationValue::Annotation {
                arguments: syntax_arguments(module, scope, &entry.arguments, &declared),
                fq_name,
            }
        }
    };
    Some(value)
}

fn symbol_arguments(
    module: &ModuleContext,
    arguments: &[ConstantArgument],
    declared: &[String],
) -> Vec<AnnotationArgument> {
    let arguments = arguments
        .iter()
        .map(|argument| AnnotationArgument {
            name: argument.name.clone(),
            value: symbol_value(module, &argument.value),
        })
        .collect();
    in_declaration_order(arguments, declared)
}

fn symbol_value(module: &ModuleContext, value: &ConstantValue) -> AnnotationValue {
    match value {
        ConstantValue::KClass(fq_name) => AnnotationValue::Class(fq_name.clone()),
        ConstantValue::Enum { class, entry } => AnnotationValue::Enum {
            class: class.clone(),
            entry: entry.clone(),
        },
        ConstantValue::String(value) => AnnotationValue::String(value.clone()),
        ConstantValue::Int(value) => AnnotationValue::Int(*value),
        ConstantValue::Bool(value) => AnnotationValue::Bool(*value),
        ConstantValue::Array(values) => AnnotationValue::Array(
            values
                .iter()
                .map(|value| symbol_value(module, value))
                .collect(),
        ),
        ConstantValue::Annotation(descriptor) => {
            let declared = declared_argument_names(module, &descriptor.fq_name);
            AnnotationValue::Annotation {
                fq_name: descriptor.fq_name.clone(),
                arguments: symbol_arguments(module, &descriptor.arguments, &declared),
            }
        }
    }
}

impl PartialEq for AnnotationReference<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.declaration == other.declaration
            && self.data.fq_name == other.data.fq_name
            && self.arguments() == other.arguments()
    }
}

impl Eq for AnnotationReference<'_> {}

impl Hash for AnnotationReference<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.declaration.hash(state);
        self.data.fq_name.hash(state);
        self.arguments().hash(state);
    }
}

impl fmt::Debug for AnnotationReference<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AnnotationReference(@{} on {:?})", self.data.fq_name, self.declaration)
    }
}
