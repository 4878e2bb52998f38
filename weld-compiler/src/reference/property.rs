use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

use once_cell::unsync::OnceCell;
use weld_support::{implementing_member_error, member_error};

use super::annotation::{memoized_annotations, AnnotationData, AnnotationSources};
use super::{
    class_of, resolve_generic_class, resolve_type_name, AnnotationReference, ClassReference,
    ClassSource, DeclarationKey, TypeUsage,
};
use crate::error::{CompilationError, CompilationResult, ErrorElement};
use crate::module::ModuleContext;
use crate::symbols::PropertyDescriptor;
use crate::syntax::PropertyNode;
use crate::type_name::TypeName;

pub(crate) struct PropertyData {
    name: String,
    annotations: OnceCell<Vec<Rc<AnnotationData>>>,
}

impl PropertyData {
    pub(crate) fn new(name: String) -> Self {
        Self {
            name,
            annotations: OnceCell::new(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) enum PropertySource<'m> {
    Syntax(&'m PropertyNode),
    Symbol(&'m PropertyDescriptor),
}

/// A property declared by a class. Resolves its type the same way a parameter does.
#[derive(Clone)]
pub struct PropertyReference<'m> {
    declaring_class: ClassReference<'m>,
    data: Rc<PropertyData>,
    source: PropertySource<'m>,
}

impl<'m> PropertyReference<'m> {
    pub(crate) fn new(
        declaring_class: ClassReference<'m>,
        data: Rc<PropertyData>,
        source: PropertySource<'m>,
    ) -> Self {
        Self {
            declaring_class,
            data,
            source,
        }
    }

    pub fn name(&self) -> &str {
        &self.data.name
    }

    pub fn declaring_class(&self) -> &ClassReference<'m> {
        &self.declaring_class
    }

    pub fn module(&self) -> &'m ModuleContext {
        self.declaring_class.module()
    }

    pub fn fq_name(&self) -> String {
        format!("{}.{}", self.declaring_class.fq_name(), self.data.name)
    }

    pub fn annotations(&self) -> Vec<AnnotationReference<'m>> {
        let sources = match self.source {
            PropertySource::Syntax(node) => AnnotationSources::Syntax(&node.annotations),
            PropertySource::Symbol(descriptor) => AnnotationSources::Symbol(&descriptor.annotations),
        };
        let declaration = DeclarationKey::Property {
            class: self.declaring_class.fq_name().clone(),
            name: self.data.name.clone(),
        };
        memoized_annotations(&self.data.annotations, &self.declaring_class, declaration, sources)
    }

    pub fn declared_type_name_or_null(&self) -> Option<TypeName> {
        let usage = match self.source {
            PropertySource::Syntax(node) => TypeUsage::Syntax(node.type_ref.as_ref()?),
            PropertySource::Symbol(descriptor) => TypeUsage::Symbol(&descriptor.ty),
        };
        self.declaring_class
            .resolve_type_reference(usage)
            .map(|ty| ty.as_function_type())
    }

    pub fn type_or_null(&self) -> Option<ClassReference<'m>> {
        class_of(self.module(), &self.declared_type_name_or_null()?)
    }

    pub fn type_(&self) -> CompilationResult<ClassReference<'m>> {
        self.type_or_null().ok_or_else(|| {
            self.error(member_error(
                "get type",
                "property",
                self.name(),
                "class",
                self.declaring_class.fq_name().as_str(),
            ))
        })
    }

    pub fn resolve_generic_type_or_null(
        &self,
        implementing_class: &ClassReference<'m>,
    ) -> Option<ClassReference<'m>> {
        resolve_generic_class(
            self.declared_type_name_or_null(),
            &[],
            &self.declaring_class,
            implementing_class,
        )
    }

    pub fn resolve_generic_type(
        &self,
        implementing_class: &ClassReference<'m>,
    ) -> CompilationResult<ClassReference<'m>> {
        self.resolve_generic_type_or_null(implementing_class)
            .ok_or_else(|| {
                self.error(implementing_member_error(
                    "resolve type",
                    "property",
                    self.name(),
                    "class",
                    self.declaring_class.fq_name().as_str(),
                    implementing_class.fq_name().as_str(),
                ))
            })
    }

    pub fn resolve_type_name_or_null(&self, implementing_class: &ClassReference<'m>) -> Option<TypeName> {
        resolve_type_name(
            self.declared_type_name_or_null(),
            &[],
            &self.declaring_class,
            implementing_class,
        )
    }

    pub fn resolve_type_name(
        &self,
        implementing_class: &ClassReference<'m>,
    ) -> CompilationResult<TypeName> {
        self.resolve_type_name_or_null(implementing_class)
            .ok_or_else(|| {
                self.error(implementing_member_error(
                    "resolve type name",
                    "property",
                    self.name(),
                    "class",
                    self.declaring_class.fq_name().as_str(),
                    implementing_class.fq_name().as_str(),
                ))
            })
    }

    pub fn error_element(&self) -> ErrorElement {
        match (self.source, self.declaring_class.source()) {
            (PropertySource::Syntax(node), ClassSource::Syntax { file, .. }) => {
                ErrorElement::located(self.fq_name(), file.path.clone(), node.span)
            }
            _ => ErrorElement::described(self.fq_name()),
        }
    }

    pub fn error(&self, message: impl Into<String>) -> CompilationError {
        CompilationError::new(message).with_element(self.error_element())
    }
}

impl PartialEq for PropertyReference<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.data.name == other.data.name && self.declaring_class == other.declaring_class
    }
}

impl Eq for PropertyReference<'_> {}

impl Hash for PropertyReference<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.data.name.hash(state);
        self.declaring_class.hash(state);
    }
}

impl fmt::Debug for PropertyReference<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PropertyReference({})", self.fq_name())
    }
}
