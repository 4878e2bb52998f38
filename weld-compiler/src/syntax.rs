//! Input model of the syntax front-end. Nodes carry names exactly as written in source and
//! positions; nothing here is resolved. Name resolution against the file's package and import
//! table happens in [`crate::resolve`].

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::ast::SourceSpan;
use crate::names::FqName;
use crate::source::SourceId;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SyntaxFile {
    pub id: SourceId,
    pub path: PathBuf,
    #[serde(default)]
    pub package: FqName,
    #[serde(default)]
    pub imports: Vec<ImportDirective>,
    #[serde(default)]
    pub classes: Vec<ClassNode>,
}

impl SyntaxFile {
    pub fn new(id: SourceId, path: impl Into<PathBuf>, package: impl Into<FqName>) -> Self {
        Self {
            id,
            path: path.into(),
            package: package.into(),
            imports: Vec::new(),
            classes: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImportDirective {
    pub path: FqName,
    #[serde(default)]
    pub alias: Option<String>,
    #[serde(default)]
    pub all_under: bool,
    #[serde(default)]
    pub span: SourceSpan,
}

impl ImportDirective {
    pub fn new(path: impl Into<FqName>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    pub fn aliased(path: impl Into<FqName>, alias: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            alias: Some(alias.into()),
            ..Self::default()
        }
    }

    pub fn star(package: impl Into<FqName>) -> Self {
        Self {
            path: package.into(),
            all_under: true,
            ..Self::default()
        }
    }

    /// The simple name this import makes visible, or `None` for star imports.
    pub fn imported_name(&self) -> Option<&str> {
        if self.all_under {
            return None;
        }
        Some(self.alias.as_deref().unwrap_or_else(|| self.path.short_name()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassKind {
    #[default]
    Class,
    Interface,
    Object,
    AnnotationClass,
    EnumClass,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClassNode {
    pub name: String,
    #[serde(default)]
    pub kind: ClassKind,
    #[serde(default)]
    pub is_abstract: bool,
    #[serde(default)]
    pub type_parameters: Vec<String>,
    #[serde(default)]
    pub super_types: Vec<TypeRefNode>,
    #[serde(default)]
    pub annotations: Vec<AnnotationEntry>,
    #[serde(default)]
    pub constructors: Vec<FunctionNode>,
    #[serde(default)]
    pub functions: Vec<FunctionNode>,
    #[serde(default)]
    pub properties: Vec<PropertyNode>,
    #[serde(default)]
    pub nested: Vec<ClassNode>,
    #[serde(default)]
    pub span: SourceSpan,
}

impl ClassNode {
    pub fn new(name: impl Into<String>, kind: ClassKind) -> Self {
        Self {
            name: name.into(),
            kind,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FunctionNode {
    pub name: String,
    #[serde(default)]
    pub type_parameters: Vec<String>,
    #[serde(default)]
    pub parameters: Vec<ParameterNode>,
    #[serde(default)]
    pub return_type: Option<TypeRefNode>,
    #[serde(default)]
    pub annotations: Vec<AnnotationEntry>,
    #[serde(default)]
    pub span: SourceSpan,
}

impl FunctionNode {
    pub fn new(name: impl Into<String>, parameters: Vec<ParameterNode>) -> Self {
        Self {
            name: name.into(),
            parameters,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParameterNode {
    pub name: String,
    /// Missing for parameters whose type is inferred, which the reference model treats as
    /// unresolvable.
    #[serde(default)]
    pub type_ref: Option<TypeRefNode>,
    #[serde(default)]
    pub annotations: Vec<AnnotationEntry>,
    #[serde(default)]
    pub span: SourceSpan,
}

impl ParameterNode {
    pub fn new(name: impl Into<String>, type_ref: TypeRefNode) -> Self {
        Self {
            name: name.into(),
            type_ref: Some(type_ref),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PropertyNode {
    pub name: String,
    #[serde(default)]
    pub type_ref: Option<TypeRefNode>,
    #[serde(default)]
    pub annotations: Vec<AnnotationEntry>,
    #[serde(default)]
    pub span: SourceSpan,
}

impl PropertyNode {
    pub fn new(name: impl Into<String>, type_ref: TypeRefNode) -> Self {
        Self {
            name: name.into(),
            type_ref: Some(type_ref),
            ..Self::default()
        }
    }
}

/// A type as spelled in source. `User` names may be simple (`List`), qualified
/// (`kotlin.collections.List`) or reach into nested classes (`Outer.Inner`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TypeRefNode {
    User {
        name: String,
        #[serde(default)]
        arguments: Vec<TypeRefNode>,
        #[serde(default)]
        nullable: bool,
        #[serde(default)]
        span: SourceSpan,
    },
    /// Lambda sugar such as `(Int) -> String` or `Receiver.(Int) -> Unit`.
    Function {
        #[serde(default)]
        receiver: Option<Box<TypeRefNode>>,
        #[serde(default)]
        parameters: Vec<TypeRefNode>,
        return_type: Box<TypeRefNode>,
        #[serde(default)]
        nullable: bool,
        #[serde(default)]
        span: SourceSpan,
    },
    Star,
}

impl TypeRefNode {
    pub fn simple(name: impl Into<String>) -> Self {
        Self::generic(name, Vec::new())
    }

    pub fn generic(name: impl Into<String>, arguments: Vec<TypeRefNode>) -> Self {
        TypeRefNode::User {
            name: name.into(),
            arguments,
            nullable: false,
            span: SourceSpan::default(),
        }
    }

    pub fn lambda(parameters: Vec<TypeRefNode>, return_type: TypeRefNode) -> Self {
        TypeRefNode::Function {
            receiver: None,
            parameters,
            return_type: Box::new(return_type),
            nullable: false,
            span: SourceSpan::default(),
        }
    }

    pub fn nullable(self) -> Self {
        match self {
            TypeRefNode::User {
                name,
                arguments,
                span,
                ..
            } => TypeRefNode::User {
                name,
                arguments,
                nullable: true,
                span,
            },
            TypeRefNode::Function {
                receiver,
                parameters,
                return_type,
                span,
                ..
            } => TypeRefNode::Function {
                receiver,
                parameters,
                return_type,
                nullable: true,
                span,
            },
            TypeRefNode::Star => TypeRefNode::Star,
        }
    }

    pub fn span(&self) -> SourceSpan {
        match self {
            TypeRefNode::User { span, .. } | TypeRefNode::Function { span, .. } => *span,
            TypeRefNode::Star => SourceSpan::default(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnnotationEntry {
    /// Annotation type as written, for example `ContributesBinding` or `weld.Qualifier`.
    pub name: String,
    #[serde(default)]
    pub arguments: Vec<ValueArgument>,
    #[serde(default)]
    pub span: SourceSpan,
}

impl AnnotationEntry {
    pub fn new(name: impl Into<String>, arguments: Vec<ValueArgument>) -> Self {
        Self {
            name: name.into(),
            arguments,
            span: SourceSpan::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValueArgument {
    #[serde(default)]
    pub name: Option<String>,
    pub value: ArgumentExpr,
}

impl ValueArgument {
    pub fn named(name: impl Into<String>, value: ArgumentExpr) -> Self {
        Self {
            name: Some(name.into()),
            value,
        }
    }

    pub fn positional(value: ArgumentExpr) -> Self {
        Self { name: None, value }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ArgumentExpr {
    /// `Foo::class`
    ClassLiteral(TypeRefNode),
    /// A dotted reference, used for enum entries such as `Retention.RUNTIME`.
    Reference(String),
    String(String),
    Int(i64),
    Bool(bool),
    Array(Vec<ArgumentExpr>),
    Annotation(AnnotationEntry),
}
