use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

use once_cell::unsync::OnceCell;
use weld_support::{implementing_member_error, member_error};

use super::annotation::{memoized_annotations, AnnotationData, AnnotationSources};
use super::{
    class_of, resolve_generic_class, resolve_type_name, AnnotationReference, ClassReference,
    ClassSource, DeclarationKey, FunctionReference, TypeUsage,
};
use crate::error::{CompilationError, CompilationResult, ErrorElement};
use crate::module::ModuleContext;
use crate::symbols::ValueParameterDescriptor;
use crate::syntax::ParameterNode;
use crate::type_name::TypeName;

pub(crate) struct ParameterData {
    name: String,
    annotations: OnceCell<Vec<Rc<AnnotationData>>>,
}

impl ParameterData {
    pub(crate) fn new(name: String) -> Self {
        Self {
            name,
            annotations: OnceCell::new(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) enum ParameterSource<'m> {
    Syntax(&'m ParameterNode),
    Symbol(&'m ValueParameterDescriptor),
}

#[derive(Clone)]
pub struct ParameterReference<'m> {
    declaring_function: FunctionReference<'m>,
    data: Rc<ParameterData>,
    source: ParameterSource<'m>,
}

impl<'m> ParameterReference<'m> {
    pub(crate) fn new(
        declaring_function: FunctionReference<'m>,
        data: Rc<ParameterData>,
        source: ParameterSource<'m>,
    ) -> Self {
        Self {
            declaring_function,
            data,
            source,
        }
    }

    pub fn name(&self) -> &str {
        &self.data.name
    }

    pub fn declaring_function(&self) -> &FunctionReference<'m> {
        &self.declaring_function
    }

    pub fn module(&self) -> &'m ModuleContext {
        self.declaring_function.module()
    }

    pub fn annotations(&self) -> Vec<AnnotationReference<'m>> {
        let sources = match self.source {
            ParameterSource::Syntax(node) => AnnotationSources::Syntax(&node.annotations),
            ParameterSource::Symbol(descriptor) => AnnotationSources::Symbol(&descriptor.annotations),
        };
        let declaration = DeclarationKey::Parameter {
            class: self.declaring_class().fq_name().clone(),
            function: self.declaring_function.signature().to_string(),
            name: self.data.name.clone(),
        };
        memoized_annotations(&self.data.annotations, self.declaring_class(), declaration, sources)
    }

    fn declaring_class(&self) -> &ClassReference<'m> {
        self.declaring_function.declaring_class()
    }

    /// The declared type in canonical form, with lambda sugar rewritten to function types. Type
    /// variables stay variables.
    pub fn declared_type_name_or_null(&self) -> Option<TypeName> {
        let usage = match self.source {
            ParameterSource::Syntax(node) => TypeUsage::Syntax(node.type_ref.as_ref()?),
            ParameterSource::Symbol(descriptor) => TypeUsage::Symbol(&descriptor.ty),
        };
        self.declaring_function
            .resolve_type_reference(usage)
            .map(|ty| ty.as_function_type())
    }

    /// The declared class type. `None` for type variables such as `T`, which need
    /// [`Self::resolve_generic_type_or_null`].
    pub fn type_or_null(&self) -> Option<ClassReference<'m>> {
        class_of(self.module(), &self.declared_type_name_or_null()?)
    }

    pub fn type_(&self) -> CompilationResult<ClassReference<'m>> {
        self.type_or_null().ok_or_else(|| {
            self.error(member_error(
                "get type",
                "parameter",
                self.name(),
                "function",
                self.declaring_function.fq_name().as_str(),
            ))
        })
    }

    pub fn resolve_generic_type_or_null(
        &self,
        implementing_class: &ClassReference<'m>,
    ) -> Option<ClassReference<'m>> {
        resolve_generic_class(
            self.declared_type_name_or_null(),
            self.declaring_function.type_parameters(),
            self.declaring_class(),
            implementing_class,
        )
    }

    pub fn resolve_generic_type(
        &self,
        implementing_class: &ClassReference<'m>,
    ) -> CompilationResult<ClassReference<'m>> {
        self.resolve_generic_type_or_null(implementing_class)
            .ok_or_else(|| self.implementing_error("resolve type", implementing_class))
    }

    /// The parameter's type as seen from `implementing_class`: type variables bound along the
    /// supertype path are substituted and lambda sugar is rewritten to function types, so the
    /// result does not depend on the front-end the parameter came from.
    pub fn resolve_type_name_or_null(&self, implementing_class: &ClassReference<'m>) -> Option<TypeName> {
        resolve_type_name(
            self.declared_type_name_or_null(),
            self.declaring_function.type_parameters(),
            self.declaring_class(),
            implementing_class,
        )
    }

    pub fn resolve_type_name(
        &self,
        implementing_class: &ClassReference<'m>,
    ) -> CompilationResult<TypeName> {
        self.resolve_type_name_or_null(implementing_class)
            .ok_or_else(|| self.implementing_error("resolve type name", implementing_class))
    }

    fn implementing_error(
        &self,
        action: &str,
        implementing_class: &ClassReference<'m>,
    ) -> CompilationError {
        self.error(implementing_member_error(
            action,
            "parameter",
            self.name(),
            "function",
            self.declaring_function.fq_name().as_str(),
            implementing_class.fq_name().as_str(),
        ))
    }

    pub fn error_element(&self) -> ErrorElement {
        let description = format!("{}.{}", self.declaring_function.fq_name(), self.name());
        match (self.source, self.declaring_class().source()) {
            (ParameterSource::Syntax(node), ClassSource::Syntax { file, .. }) => {
                ErrorElement::located(description, file.path.clone(), node.span)
            }
            _ => ErrorElement::described(description),
        }
    }

    pub fn error(&self, message: impl Into<String>) -> CompilationError {
        CompilationError::new(message).with_element(self.error_element())
    }
}

impl PartialEq for ParameterReference<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.data.name == other.data.name && self.declaring_function == other.declaring_function
    }
}

impl Eq for ParameterReference<'_> {}

impl Hash for ParameterReference<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.data.name.hash(state);
        self.declaring_function.hash(state);
    }
}

impl fmt::Debug for ParameterReference<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ParameterReference({}(.., {},..))",
            self.declaring_function.fq_name(),
            self.data.name
        )
    }
}
