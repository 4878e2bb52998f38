//! File-scoped name resolution for the syntax front-end.
//!
//! A simple name is looked up, in order, among the type parameters in scope, the classes
//! enclosing the usage (and their nested classes), explicit imports, the file's own package,
//! star imports and finally the default imports. Qualified names resolve their first segment
//! the same way and then descend into nested classes; if that fails the whole name is tried as
//! a fully-qualified name.

use tracing::trace;

use crate::module::ModuleContext;
use crate::names::{well_known, FqName};
use crate::syntax::{SyntaxFile, TypeRefNode};
use crate::type_name::TypeName;

#[derive(Clone)]
pub(crate) struct TypeScope<'m> {
    module: &'m ModuleContext,
    file: &'m SyntaxFile,
    enclosing: Vec<FqName>,
    type_parameters: Vec<&'m str>,
}

impl<'m> TypeScope<'m> {
    /// `enclosing` lists the surrounding classes outermost first, with their type parameters.
    pub(crate) fn new(
        module: &'m ModuleContext,
        file: &'m SyntaxFile,
        enclosing: Vec<(FqName, &'m [String])>,
    ) -> Self {
        let mut type_parameters = Vec::new();
        let mut names = Vec::with_capacity(enclosing.len());
        for (fq_name, parameters) in enclosing {
            type_parameters.extend(parameters.iter().map(String::as_str));
            names.push(fq_name);
        }
        Self {
            module,
            file,
            enclosing: names,
            type_parameters,
        }
    }

    pub(crate) fn with_type_parameters(mut self, parameters: &'m [String]) -> Self {
        self.type_parameters
            .extend(parameters.iter().map(String::as_str));
        self
    }

    /// Resolves `node` to a fully-qualified type name, keeping lambda sugar as written. Returns
    /// `None` when any part of the type cannot be resolved.
    pub(crate) fn resolve(&self, node: &TypeRefNode) -> Option<TypeName> {
        match node {
            TypeRefNode::User {
                name,
                arguments,
                nullable,
                ..
            } => {
                if arguments.is_empty() && self.type_parameters.iter().any(|parameter| *parameter == name) {
                    return Some(TypeName::Variable {
                        name: name.clone(),
                        nullable: *nullable,
                    });
                }
                let fq_name = self.resolve_class_name(name)?;
                let arguments = arguments
                    .iter()
                    .map(|argument| self.resolve(argument))
                    .collect::<Option<Vec<_>>>()?;
                Some(TypeName::Class {
                    fq_name,
                    arguments,
                    nullable: *nullable,
                })
            }
            TypeRefNode::Function {
                receiver,
                parameters,
                return_type,
                nullable,
                ..
            } => {
                let receiver = match receiver {
                    Some(receiver) => Some(Box::new(self.resolve(receiver)?)),
                    None => None,
                };
                let parameters = parameters
                    .iter()
                    .map(|parameter| self.resolve(parameter))
                    .collect::<Option<Vec<_>>>()?;
                let return_type = Box::new(self.resolve(return_type)?);
                Some(TypeName::Lambda {
                    receiver,
                    parameters,
                    return_type,
                    nullable: *nullable,
                })
            }
            TypeRefNode::Star => Some(TypeName::Star),
        }
    }

    pub(crate) fn resolve_class_name(&self, name: &str) -> Option<FqName> {
        let mut segments = name.split('.');
        let first = segments.next()?;
        let resolved = self.resolve_simple_name(first).and_then(|mut fq_name| {
            for segment in segments {
                fq_name = fq_name.child(segment);
                if !self.module.class_exists(&fq_name) {
                    return None;
                }
            }
            Some(fq_name)
        });

        let resolved = resolved.or_else(|| {
            let candidate = FqName::new(name);
            self.module.class_exists(&candidate).then_some(candidate)
        });
        trace!(name, resolved = ?resolved.as_ref().map(FqName::as_str), "resolved class name");
        resolved
    }

    /// Resolves a reference such as `Scope.App` or an imported `App` to the enum class and
    /// entry name.
    pub(crate) fn resolve_enum_entry(&self, reference: &str) -> Option<(FqName, String)> {
        if let Some((class_name, entry)) = reference.rsplit_once('.') {
            let class = self.resolve_class_name(class_name)?;
            return Some((class, entry.to_string()));
        }

        self.file
            .imports
            .iter()
            .filter(|import| import.imported_name() == Some(reference))
            .find_map(|import| {
                let class = import.path.parent();
                self.module
                    .class_exists(&class)
                    .then(|| (class, import.path.short_name().to_string()))
            })
    }

    fn resolve_simple_name(&self, name: &str) -> Option<FqName> {
        let exists = |candidate: &FqName| self.module.class_exists(candidate);

        for enclosing in self.enclosing.iter().rev() {
            if enclosing.short_name() == name {
                return Some(enclosing.clone());
            }
            let nested = enclosing.child(name);
            if exists(&nested) {
                return Some(nested);
            }
        }

        if let Some(import) = self
            .file
            .imports
            .iter()
            .find(|import| import.imported_name() == Some(name) && exists(&import.path))
        {
            return Some(import.path.clone());
        }

        let same_package = self.file.package.child(name);
        if exists(&same_package) {
            return Some(same_package);
        }

        if let Some(candidate) = self
            .file
            .imports
            .iter()
            .filter(|import| import.all_under)
            .map(|import| import.path.child(name))
            .find(|candidate| exists(candidate))
        {
            return Some(candidate);
        }

        well_known::DEFAULT_IMPORTS
            .iter()
            .map(|package| FqName::new(*package).child(name))
            .find(|candidate| exists(candidate))
    }
}
