use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

use once_cell::unsync::OnceCell;
use tracing::debug;

use super::annotation::{memoized_annotations, AnnotationData, AnnotationSources};
use super::parameter::{ParameterData, ParameterSource};
use super::{
    class_of, AnnotationReference, ClassReference, DeclarationKey, ParameterReference, TypeUsage,
};
use crate::error::{CompilationError, CompilationResult, ErrorElement};
use crate::module::ModuleContext;
use crate::names::FqName;
use crate::symbols::FunctionDescriptor;
use crate::syntax::FunctionNode;
use crate::type_name::TypeName;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FunctionKind {
    Function,
    Constructor,
}

pub(crate) struct FunctionData {
    kind: FunctionKind,
    name: String,
    signature: OnceCell<String>,
    parameters: OnceCell<Vec<Rc<ParameterData>>>,
    annotations: OnceCell<Vec<Rc<AnnotationData>>>,
}

impl FunctionData {
    pub(crate) fn new(kind: FunctionKind, name: String) -> Self {
        Self {
            kind,
            name,
            signature: OnceCell::new(),
            parameters: OnceCell::new(),
            annotations: OnceCell::new(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) enum FunctionSource<'m> {
    Syntax(&'m FunctionNode),
    Symbol(&'m FunctionDescriptor),
}

/// A function or constructor. All type resolution is delegated to the declaring class.
#[derive(Clone)]
pub struct FunctionReference<'m> {
    declaring_class: ClassReference<'m>,
    data: Rc<FunctionData>,
    source: FunctionSource<'m>,
}

impl<'m> FunctionReference<'m> {
    pub(crate) fn new(
        declaring_class: ClassReference<'m>,
        data: Rc<FunctionData>,
        source: FunctionSource<'m>,
    ) -> Self {
        Self {
            declaring_class,
            data,
            source,
        }
    }

    pub fn declaring_class(&self) -> &ClassReference<'m> {
        &self.declaring_class
    }

    pub fn module(&self) -> &'m ModuleContext {
        self.declaring_class.module()
    }

    pub fn name(&self) -> &str {
        &self.data.name
    }

    pub fn kind(&self) -> FunctionKind {
        self.data.kind
    }

    pub fn is_constructor(&self) -> bool {
        self.data.kind == FunctionKind::Constructor
    }

    pub fn fq_name(&self) -> FqName {
        self.declaring_class.fq_name().child(&self.data.name)
    }

    pub fn type_parameters(&self) -> &'m [String] {
        match self.source {
            FunctionSource::Syntax(node) => &node.type_parameters,
            FunctionSource::Symbol(descriptor) => &descriptor.type_parameters,
        }
    }

    /// `name(T1, T2)` with each parameter's declared type in canonical form. Unresolvable
    /// parameter types are rendered as `?`.
    pub fn signature(&self) -> &str {
        self.data.signature.get_or_init(|| {
            let parameters = self
                .parameters()
                .iter()
                .map(|parameter| match parameter.declared_type_name_or_null() {
                    Some(ty) => ty.to_string(),
                    None => "?".to_string(),
                })
                .collect::<Vec<_>>()
                .join(", ");
            format!("{}({parameters})", self.data.name)
        })
    }

    pub(crate) fn declaration_key(&self) -> DeclarationKey {
        DeclarationKey::Function {
            class: self.declaring_class.fq_name().clone(),
            signature: self.signature().to_string(),
        }
    }

    pub fn parameters(&self) -> Vec<ParameterReference<'m>> {
        let data = self.data.parameters.get_or_init(|| {
            self.module().record(|counts| counts.parameters += 1);
            let names: Vec<&str> = match self.source {
                FunctionSource::Syntax(node) => node
                    .parameters
                    .iter()
                    .map(|parameter| parameter.name.as_str())
                    .collect(),
                FunctionSource::Symbol(descriptor) => descriptor
                    .value_parameters
                    .iter()
                    .map(|parameter| parameter.name.as_str())
                    .collect(),
            };
            debug!(function = %self.fq_name(), count = names.len(), "computed parameters");
            names
                .into_iter()
                .map(|name| Rc::new(ParameterData::new(name.to_string())))
                .collect()
        });

        match self.source {
            FunctionSource::Syntax(node) => data
                .iter()
                .zip(&node.parameters)
                .map(|(data, parameter)| {
                    ParameterReference::new(self.clone(), data.clone(), ParameterSource::Syntax(parameter))
                })
                .collect(),
            FunctionSource::Symbol(descriptor) => data
                .iter()
                .zip(&descriptor.value_parameters)
                .map(|(data, parameter)| {
                    ParameterReference::new(self.clone(), data.clone(), ParameterSource::Symbol(parameter))
                })
                .collect(),
        }
    }

    pub fn annotations(&self) -> Vec<AnnotationReference<'m>> {
        let sources = match self.source {
            FunctionSource::Syntax(node) => AnnotationSources::Syntax(&node.annotations),
            FunctionSource::Symbol(descriptor) => AnnotationSources::Symbol(&descriptor.annotations),
        };
        memoized_annotations(
            &self.data.annotations,
            &self.declaring_class,
            self.declaration_key(),
            sources,
        )
    }

    /// Resolves a type usage inside this function, with the function's own type parameters in
    /// scope, through the declaring class.
    pub(crate) fn resolve_type_reference(&self, usage: TypeUsage<'_>) -> Option<TypeName> {
        self.declaring_class
            .resolve_type_reference_with(usage, self.type_parameters())
    }

    pub fn return_type_name_or_null(&self) -> Option<TypeName> {
        let usage = match self.source {
            FunctionSource::Syntax(node) => TypeUsage::Syntax(node.return_type.as_ref()?),
            FunctionSource::Symbol(descriptor) => TypeUsage::Symbol(descriptor.return_type.as_ref()?),
        };
        self.resolve_type_reference(usage)
            .map(|ty| ty.as_function_type())
    }

    pub fn return_type_or_null(&self) -> Option<ClassReference<'m>> {
        class_of(self.module(), &self.return_type_name_or_null()?)
    }

    pub fn return_type(&self) -> CompilationResult<ClassReference<'m>> {
        self.return_type_or_null().ok_or_else(|| {
            self.error(format!(
                "Unable to get the return type of function {}.",
                self.fq_name()
            ))
        })
    }

    pub fn resolve_return_type_name_or_null(
        &self,
        implementing_class: &ClassReference<'m>,
    ) -> Option<TypeName> {
        super::resolve_type_name(
            self.return_type_name_or_null(),
            self.type_parameters(),
            &self.declaring_class,
            implementing_class,
        )
    }

    pub fn error_element(&self) -> ErrorElement {
        let description = self.fq_name().to_string();
        match (self.source, self.declaring_class.source()) {
            (FunctionSource::Syntax(node), super::ClassSource::Syntax { file, .. }) => {
                ErrorElement::located(description, file.path.clone(), node.span)
            }
            _ => ErrorElement::described(description),
        }
    }

    pub fn error(&self, message: impl Into<String>) -> CompilationError {
        CompilationError::new(message).with_element(self.error_element())
    }
}

impl PartialEq for FunctionReference<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.declaring_class == other.declaring_class && self.signature() == other.signature()
    }
}

impl Eq for FunctionReference<'_> {}

impl Hash for FunctionReference<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.declaring_class.hash(state);
        self.signature().hash(state);
    }
}

impl fmt::Debug for FunctionReference<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "FunctionReference({}.{})",
            self.declaring_class.fq_name(),
            self.signature()
        )
    }
}
