use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

use once_cell::unsync::OnceCell;
use tracing::{debug, warn};

use super::annotation::{memoized_annotations, AnnotationData, AnnotationSources};
use super::function::{FunctionData, FunctionSource};
use super::property::{PropertyData, PropertySource};
use super::{
    AnnotationReference, ClassKey, DeclarationKey, FunctionKind, FunctionReference,
    PropertyReference, SyntaxClassKey, TypeUsage,
};
use crate::duplicates;
use crate::error::{CompilationError, CompilationResult, ErrorElement};
use crate::module::ModuleContext;
use crate::names::{well_known, FqName};
use crate::resolve::TypeScope;
use crate::symbols::ClassDescriptor;
use crate::syntax::{ClassKind, ClassNode, SyntaxFile};
use crate::type_name::TypeName;

/// Memoized state of one class, shared by every handle to it.
pub(crate) struct ClassData {
    fq_name: FqName,
    key: ClassKey,
    super_types: OnceCell<Vec<SuperTypeData>>,
    functions: OnceCell<Vec<Rc<FunctionData>>>,
    constructors: OnceCell<Vec<Rc<FunctionData>>>,
    properties: OnceCell<Vec<Rc<PropertyData>>>,
    annotations: OnceCell<Vec<Rc<AnnotationData>>>,
}

impl ClassData {
    pub(crate) fn new(fq_name: FqName, key: ClassKey) -> Self {
        Self {
            fq_name,
            key,
            super_types: OnceCell::new(),
            functions: OnceCell::new(),
            constructors: OnceCell::new(),
            properties: OnceCell::new(),
            annotations: OnceCell::new(),
        }
    }
}

struct SuperTypeData {
    fq_name: FqName,
    arguments: Vec<TypeName>,
}

#[derive(Debug, Clone, Copy)]
pub enum ClassSource<'m> {
    Syntax {
        file: &'m SyntaxFile,
        node: &'m ClassNode,
    },
    Symbol(&'m ClassDescriptor),
}

/// A direct supertype together with the type arguments supplied at that position, expressed in
/// terms of the subclass's own type parameters.
#[derive(Debug, Clone)]
pub struct SuperTypeReference<'m> {
    pub class: ClassReference<'m>,
    pub arguments: Vec<TypeName>,
}

#[derive(Clone)]
pub struct ClassReference<'m> {
    module: &'m ModuleContext,
    data: Rc<ClassData>,
    source: ClassSource<'m>,
}

impl<'m> ClassReference<'m> {
    pub(crate) fn new(module: &'m ModuleContext, data: Rc<ClassData>, source: ClassSource<'m>) -> Self {
        Self {
            module,
            data,
            source,
        }
    }

    pub fn module(&self) -> &'m ModuleContext {
        self.module
    }

    pub fn fq_name(&self) -> &FqName {
        &self.data.fq_name
    }

    pub fn short_name(&self) -> &str {
        self.data.fq_name.short_name()
    }

    pub fn source(&self) -> ClassSource<'m> {
        self.source
    }

    pub fn is_syntax(&self) -> bool {
        matches!(self.source, ClassSource::Syntax { .. })
    }

    pub fn package_fq_name(&self) -> &'m FqName {
        match self.source {
            ClassSource::Syntax { file, .. } => &file.package,
            ClassSource::Symbol(descriptor) => &descriptor.package,
        }
    }

    pub fn kind(&self) -> ClassKind {
        match self.source {
            ClassSource::Syntax { node, .. } => node.kind,
            ClassSource::Symbol(descriptor) => descriptor.kind,
        }
    }

    pub fn is_interface(&self) -> bool {
        self.kind() == ClassKind::Interface
    }

    pub fn is_abstract(&self) -> bool {
        self.is_interface()
            || match self.source {
                ClassSource::Syntax { node, .. } => node.is_abstract,
                ClassSource::Symbol(descriptor) => descriptor.is_abstract,
            }
    }

    pub fn type_parameters(&self) -> &'m [String] {
        match self.source {
            ClassSource::Syntax { node, .. } => &node.type_parameters,
            ClassSource::Symbol(descriptor) => &descriptor.type_parameters,
        }
    }

    pub(crate) fn declaration_key(&self) -> DeclarationKey {
        DeclarationKey::Class(self.data.fq_name.clone())
    }

    pub(crate) fn type_scope(&self) -> Option<TypeScope<'m>> {
        let ClassKey::Syntax(key) = &self.data.key else {
            return None;
        };
        let (file, chain) = self.module.syntax_chain(key)?;
        self.module.record(|counts| counts.type_scopes += 1);
        let enclosing = chain
            .into_iter()
            .map(|(fq_name, node)| (fq_name, node.type_parameters.as_slice()))
            .collect();
        Some(TypeScope::new(self.module, file, enclosing))
    }

    /// Resolves a type usage found inside this class's source unit to its canonical form.
    /// Syntax usages go through the file's imports and only resolve for syntax classes; symbol
    /// usages are already canonical.
    pub fn resolve_type_reference(&self, usage: TypeUsage<'_>) -> Option<TypeName> {
        self.resolve_type_reference_with(usage, &[])
    }

    pub(crate) fn resolve_type_reference_with(
        &self,
        usage: TypeUsage<'_>,
        type_parameters: &'m [String],
    ) -> Option<TypeName> {
        match usage {
            TypeUsage::Syntax(node) => self
                .type_scope()?
                .with_type_parameters(type_parameters)
                .resolve(node),
            TypeUsage::Symbol(ty) => Some(TypeName::from(ty)),
        }
    }

    fn super_type_data(&self) -> &[SuperTypeData] {
        self.data.super_types.get_or_init(|| {
            self.module.record(|counts| counts.super_types += 1);
            let super_types: Vec<TypeName> = match self.source {
                ClassSource::Syntax { node, .. } => {
                    let scope = self.type_scope();
                    node.super_types
                        .iter()
                        .filter_map(|type_ref| {
                            let resolved = scope.as_ref().and_then(|scope| scope.resolve(type_ref));
                            if resolved.is_none() {
                                debug!(class = %self.fq_name(), ?type_ref, "skipping unresolvable super type");
                            }
                            resolved
                        })
                        .collect()
                }
                ClassSource::Symbol(descriptor) => {
                    descriptor.super_types.iter().map(TypeName::from).collect()
                }
            };

            let super_types: Vec<SuperTypeData> = super_types
                .into_iter()
                .filter_map(|ty| match ty.as_function_type() {
                    TypeName::Class {
                        fq_name, arguments, ..
                    } => Some(SuperTypeData { fq_name, arguments }),
                    _ => None,
                })
                .collect();
            debug!(class = %self.fq_name(), count = super_types.len(), "computed super types");
            super_types
        })
    }

    pub fn direct_super_type_references(&self) -> Vec<SuperTypeReference<'m>> {
        self.super_type_data()
            .iter()
            .filter_map(|data| {
                let class = self.module.class_reference_or_null(&data.fq_name)?;
                Some(SuperTypeReference {
                    class,
                    arguments: data.arguments.clone(),
                })
            })
            .collect()
    }

    pub fn direct_super_types(&self) -> Vec<ClassReference<'m>> {
        self.direct_super_type_references()
            .into_iter()
            .map(|super_type| super_type.class)
            .collect()
    }

    /// Every transitive supertype, breadth first, each listed once.
    pub fn all_super_types(&self) -> Vec<ClassReference<'m>> {
        let mut seen = HashSet::from([self.fq_name().clone()]);
        let mut queue: VecDeque<ClassReference<'m>> = self.direct_super_types().into();
        let mut result = Vec::new();
        while let Some(class) = queue.pop_front() {
            if !seen.insert(class.fq_name().clone()) {
                continue;
            }
            queue.extend(class.direct_super_types());
            result.push(class);
        }
        result
    }

    fn function_data(&self, kind: FunctionKind) -> &[Rc<FunctionData>] {
        let cell = match kind {
            FunctionKind::Function => &self.data.functions,
            FunctionKind::Constructor => &self.data.constructors,
        };
        cell.get_or_init(|| {
            self.module.record(|counts| match kind {
                FunctionKind::Function => counts.functions += 1,
                FunctionKind::Constructor => counts.constructors += 1,
            });
            let names: Vec<&str> = match self.source {
                ClassSource::Syntax { node, .. } => function_nodes(node, kind)
                    .iter()
                    .map(|function| function.name.as_str())
                    .collect(),
                ClassSource::Symbol(descriptor) => function_descriptors(descriptor, kind)
                    .iter()
                    .map(|function| function.name.as_str())
                    .collect(),
            };
            debug!(class = %self.fq_name(), ?kind, count = names.len(), "computed functions");
            // Constructors are unnamed in source, so both front-ends use the JVM name.
            names
                .into_iter()
                .map(|name| match kind {
                    FunctionKind::Function => name,
                    FunctionKind::Constructor => well_known::CONSTRUCTOR_NAME,
                })
                .map(|name| Rc::new(FunctionData::new(kind, name.to_string())))
                .collect()
        })
    }

    fn function_references(&self, kind: FunctionKind) -> Vec<FunctionReference<'m>> {
        let data = self.function_data(kind);
        match self.source {
            ClassSource::Syntax { node, .. } => data
                .iter()
                .zip(function_nodes(node, kind))
                .map(|(data, function)| {
                    FunctionReference::new(self.clone(), data.clone(), FunctionSource::Syntax(function))
                })
                .collect(),
            ClassSource::Symbol(descriptor) => data
                .iter()
                .zip(function_descriptors(descriptor, kind))
                .map(|(data, function)| {
                    FunctionReference::new(self.clone(), data.clone(), FunctionSource::Symbol(function))
                })
                .collect(),
        }
    }

    pub fn functions(&self) -> Vec<FunctionReference<'m>> {
        self.function_references(FunctionKind::Function)
    }

    pub fn constructors(&self) -> Vec<FunctionReference<'m>> {
        self.function_references(FunctionKind::Constructor)
    }

    pub fn properties(&self) -> Vec<PropertyReference<'m>> {
        let data = self.data.properties.get_or_init(|| {
            self.module.record(|counts| counts.properties += 1);
            let names: Vec<&str> = match self.source {
                ClassSource::Syntax { node, .. } => {
                    node.properties.iter().map(|property| property.name.as_str()).collect()
                }
                ClassSource::Symbol(descriptor) => descriptor
                    .properties
                    .iter()
                    .map(|property| property.name.as_str())
                    .collect(),
            };
            names
                .into_iter()
                .map(|name| Rc::new(PropertyData::new(name.to_string())))
                .collect()
        });

        match self.source {
            ClassSource::Syntax { node, .. } => data
                .iter()
                .zip(&node.properties)
                .map(|(data, property)| {
                    PropertyReference::new(self.clone(), data.clone(), PropertySource::Syntax(property))
                })
                .collect(),
            ClassSource::Symbol(descriptor) => data
                .iter()
                .zip(&descriptor.properties)
                .map(|(data, property)| {
                    PropertyReference::new(self.clone(), data.clone(), PropertySource::Symbol(property))
                })
                .collect(),
        }
    }

    pub fn annotations(&self) -> Vec<AnnotationReference<'m>> {
        let sources = match self.source {
            ClassSource::Syntax { node, .. } => AnnotationSources::Syntax(&node.annotations),
            ClassSource::Symbol(descriptor) => AnnotationSources::Symbol(&descriptor.annotations),
        };
        memoized_annotations(&self.data.annotations, self, self.declaration_key(), sources)
    }

    pub fn is_annotated_with(&self, fq_name: &FqName) -> bool {
        self.annotations()
            .iter()
            .any(|annotation| annotation.fq_name() == fq_name)
    }

    pub fn annotation_or_null(&self, fq_name: &FqName) -> Option<AnnotationReference<'m>> {
        self.annotations()
            .into_iter()
            .find(|annotation| annotation.fq_name() == fq_name)
    }

    pub fn inner_classes(&self) -> Vec<ClassReference<'m>> {
        match (&self.data.key, self.source) {
            (ClassKey::Syntax(key), ClassSource::Syntax { node, .. }) => node
                .nested
                .iter()
                .enumerate()
                .filter_map(|(index, nested)| {
                    let mut path = key.path.clone();
                    path.push(index);
                    let key = SyntaxClassKey {
                        file: key.file,
                        path,
                    };
                    self.module
                        .class_for_key(ClassKey::Syntax(key), &self.fq_name().child(&nested.name))
                })
                .collect(),
            _ => self
                .module
                .symbols()
                .iter()
                .filter(|descriptor| descriptor.enclosing_class.as_ref() == Some(self.fq_name()))
                .filter_map(|descriptor| {
                    self.module
                        .symbol_class_reference_or_null(&descriptor.fq_name)
                })
                .collect(),
        }
    }

    pub fn enclosing_class_or_null(&self) -> Option<ClassReference<'m>> {
        match (&self.data.key, self.source) {
            (ClassKey::Syntax(key), _) => {
                if key.path.len() < 2 {
                    return None;
                }
                let parent = SyntaxClassKey {
                    file: key.file,
                    path: key.path[..key.path.len() - 1].to_vec(),
                };
                self.module
                    .class_for_key(ClassKey::Syntax(parent), &self.fq_name().parent())
            }
            (_, ClassSource::Symbol(descriptor)) => self
                .module
                .symbol_class_reference_or_null(descriptor.enclosing_class.as_ref()?),
            _ => None,
        }
    }

    /// Resolves the type variable `type_to_resolve`, declared by `declaring_class`, to the type
    /// this class binds it to. Walks the supertype edges from `self` up to `declaring_class`,
    /// composing the type arguments supplied at each edge. Returns `None` when no path reaches
    /// `declaring_class` or the variable is never bound to a concrete type.
    pub fn resolve_generic_type_name_or_null(
        &self,
        declaring_class: &ClassReference<'m>,
        type_to_resolve: &TypeName,
    ) -> Option<TypeName> {
        let variable = type_to_resolve.variable_name()?;
        let bindings = self.generic_bindings_to(declaring_class)?;
        let resolved = bindings.get(variable)?;
        if resolved.variable_name().is_some() {
            return None;
        }
        let nullable = resolved.is_nullable() || type_to_resolve.is_nullable();
        Some(resolved.clone().with_nullable(nullable))
    }

    pub fn resolve_generic_kotlin_type_or_null(
        &self,
        declaring_class: &ClassReference<'m>,
        type_to_resolve: &TypeName,
    ) -> Option<ClassReference<'m>> {
        let resolved = self.resolve_generic_type_name_or_null(declaring_class, type_to_resolve)?;
        self.module
            .class_reference_or_null(resolved.as_function_type().fq_name_or_null()?)
    }

    /// Substitutes every type variable of `declaring_class` that this class binds, at any depth
    /// of `ty`. Variables without a binding, and those named in `shadowed`, are left in place.
    pub(crate) fn substitute_generics(
        &self,
        declaring_class: &ClassReference<'m>,
        ty: &TypeName,
        shadowed: &[String],
    ) -> TypeName {
        match self.generic_bindings_to(declaring_class) {
            Some(mut bindings) => {
                for name in shadowed {
                    bindings.remove(name);
                }
                ty.substitute(&bindings)
            }
            None => ty.clone(),
        }
    }

    fn generic_bindings_to(
        &self,
        declaring_class: &ClassReference<'m>,
    ) -> Option<HashMap<String, TypeName>> {
        if self == declaring_class {
            return Some(HashMap::new());
        }

        let mut visited = HashMap::new();
        let bindings = self.collect_generic_bindings(declaring_class.fq_name(), &mut visited);
        if bindings.is_none() {
            debug!(
                implementing = %self.fq_name(),
                declaring = %declaring_class.fq_name(),
                "declaring class is not a supertype"
            );
        }
        bindings
    }

    /// Binds the type parameters of `target` in terms of this class's own type parameters. The
    /// first supertype in declaration order that reaches `target` wins. Each class is expanded
    /// once per lookup; a class met again while it is still being expanded does not reach
    /// `target` along that edge.
    fn collect_generic_bindings(
        &self,
        target: &FqName,
        visited: &mut HashMap<FqName, Option<HashMap<String, TypeName>>>,
    ) -> Option<HashMap<String, TypeName>> {
        if let Some(known) = visited.get(self.fq_name()) {
            return known.clone();
        }
        visited.insert(self.fq_name().clone(), None);

        let mut first: Option<HashMap<String, TypeName>> = None;
        for super_type in self.direct_super_type_references() {
            let edge: HashMap<String, TypeName> = super_type
                .class
                .type_parameters()
                .iter()
                .cloned()
                .zip(super_type.arguments.iter().cloned())
                .collect();

            let candidate: Option<HashMap<String, TypeName>> = if super_type.class.fq_name() == target {
                Some(edge)
            } else {
                super_type
                    .class
                    .collect_generic_bindings(target, visited)
                    .map(|bindings| {
                        bindings
                            .into_iter()
                            .map(|(name, ty)| (name, ty.substitute(&edge)))
                            .collect()
                    })
            };
            let Some(candidate) = candidate else {
                continue;
            };
            if let Some(existing) = &first {
                if *existing != candidate {
                    warn!(
                        implementing = %self.fq_name(),
                        declaring = %target,
                        via = %super_type.class.fq_name(),
                        "generic parameters are bound differently along several supertype paths, using the first path"
                    );
                }
                continue;
            }
            first = Some(candidate);
        }

        visited.insert(self.fq_name().clone(), first.clone());
        first
    }

    /// Fails if `annotations` contribute to the same scope with the same bound type more than
    /// once. See [`duplicates::check_no_duplicate_scope_and_bound_type`].
    pub fn check_no_duplicate_scope_and_bound_type(
        &self,
        annotations: &[AnnotationReference<'m>],
    ) -> CompilationResult<()> {
        duplicates::check_no_duplicate_scope_and_bound_type(
            annotations,
            self.fq_name().as_str(),
            |bound_type: Option<&ClassReference<'m>>| match bound_type {
                Some(bound_type) => bound_type.short_name().to_string(),
                None => self.implicit_bound_type_name(),
            },
        )
        .map_err(|error| error.with_element(self.error_element()))
    }

    fn implicit_bound_type_name(&self) -> String {
        match self.direct_super_types().as_slice() {
            [single] => single.short_name().to_string(),
            _ => self.short_name().to_string(),
        }
    }

    pub fn error_element(&self) -> ErrorElement {
        match self.source {
            ClassSource::Syntax { file, node } => {
                ErrorElement::located(self.fq_name().as_str(), file.path.clone(), node.span)
            }
            ClassSource::Symbol(_) => ErrorElement::described(self.fq_name().as_str()),
        }
    }

    pub fn error(&self, message: impl Into<String>) -> CompilationError {
        CompilationError::new(message).with_element(self.error_element())
    }
}

fn function_nodes(node: &ClassNode, kind: FunctionKind) -> &[crate::syntax::FunctionNode] {
    match kind {
        FunctionKind::Function => &node.functions,
        FunctionKind::Constructor => &node.constructors,
    }
}

fn function_descriptors(
    descriptor: &ClassDescriptor,
    kind: FunctionKind,
) -> &[crate::symbols::FunctionDescriptor] {
    match kind {
        FunctionKind::Function => &descriptor.functions,
        FunctionKind::Constructor => &descriptor.constructors,
    }
}

impl PartialEq for ClassReference<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.data.fq_name == other.data.fq_name
    }
}

impl Eq for ClassReference<'_> {}

impl Hash for ClassReference<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.data.fq_name.hash(state);
    }
}

impl fmt::Debug for ClassReference<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let variant = if self.is_syntax() { "Syntax" } else { "Symbol" };
        write!(f, "ClassReference::{variant}({})", self.data.fq_name)
    }
}

impl fmt::Display for ClassReference<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.data.fq_name)
    }
}
