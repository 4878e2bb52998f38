//! Input model of the symbol front-end: descriptors whose names and types are already
//! resolved to canonical fully-qualified form.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::names::{well_known, FqName};
use crate::syntax::ClassKind;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResolvedType {
    Class {
        fq_name: FqName,
        #[serde(default)]
        arguments: Vec<ResolvedType>,
        #[serde(default)]
        nullable: bool,
    },
    TypeParameter {
        name: String,
        #[serde(default)]
        nullable: bool,
    },
    Star,
}

impl ResolvedType {
    pub fn class(fq_name: impl Into<FqName>) -> Self {
        Self::generic(fq_name, Vec::new())
    }

    pub fn generic(fq_name: impl Into<FqName>, arguments: Vec<ResolvedType>) -> Self {
        ResolvedType::Class {
            fq_name: fq_name.into(),
            arguments,
            nullable: false,
        }
    }

    pub fn type_parameter(name: impl Into<String>) -> Self {
        ResolvedType::TypeParameter {
            name: name.into(),
            nullable: false,
        }
    }

    /// `kotlin.FunctionN<P1, .., PN, R>`, the only shape function types take in this front-end.
    pub fn function(parameters: Vec<ResolvedType>, return_type: ResolvedType) -> Self {
        let arity = parameters.len();
        let mut arguments = parameters;
        arguments.push(return_type);
        Self::generic(
            format!("{}{arity}", well_known::FUNCTION_TYPE_PREFIX),
            arguments,
        )
    }

    pub fn nullable(self) -> Self {
        match self {
            ResolvedType::Class {
                fq_name, arguments, ..
            } => ResolvedType::Class {
                fq_name,
                arguments,
                nullable: true,
            },
            ResolvedType::TypeParameter { name, .. } => ResolvedType::TypeParameter {
                name,
                nullable: true,
            },
            ResolvedType::Star => ResolvedType::Star,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClassDescriptor {
    pub fq_name: FqName,
    #[serde(default)]
    pub package: FqName,
    #[serde(default)]
    pub enclosing_class: Option<FqName>,
    #[serde(default)]
    pub kind: ClassKind,
    #[serde(default)]
    pub is_abstract: bool,
    #[serde(default)]
    pub type_parameters: Vec<String>,
    #[serde(default)]
    pub super_types: Vec<ResolvedType>,
    #[serde(default)]
    pub annotations: Vec<AnnotationDescriptor>,
    #[serde(default)]
    pub constructors: Vec<FunctionDescriptor>,
    #[serde(default)]
    pub functions: Vec<FunctionDescriptor>,
    #[serde(default)]
    pub properties: Vec<PropertyDescriptor>,
}

impl ClassDescriptor {
    /// A top-level class in `package`.
    pub fn new(package: impl Into<FqName>, name: &str, kind: ClassKind) -> Self {
        let package = package.into();
        Self {
            fq_name: package.child(name),
            package,
            kind,
            ..Self::default()
        }
    }

    pub fn nested_in(outer: &ClassDescriptor, name: &str, kind: ClassKind) -> Self {
        Self {
            fq_name: outer.fq_name.child(name),
            package: outer.package.clone(),
            enclosing_class: Some(outer.fq_name.clone()),
            kind,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FunctionDescriptor {
    pub name: String,
    #[serde(default)]
    pub type_parameters: Vec<String>,
    #[serde(default)]
    pub value_parameters: Vec<ValueParameterDescriptor>,
    #[serde(default)]
    pub return_type: Option<ResolvedType>,
    #[serde(default)]
    pub annotations: Vec<AnnotationDescriptor>,
}

impl FunctionDescriptor {
    pub fn new(name: impl Into<String>, value_parameters: Vec<ValueParameterDescriptor>) -> Self {
        Self {
            name: name.into(),
            value_parameters,
            ..Self::default()
        }
    }

    pub fn constructor(value_parameters: Vec<ValueParameterDescriptor>) -> Self {
        Self::new(well_known::CONSTRUCTOR_NAME, value_parameters)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValueParameterDescriptor {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: ResolvedType,
    #[serde(default)]
    pub annotations: Vec<AnnotationDescriptor>,
}

impl ValueParameterDescriptor {
    pub fn new(name: impl Into<String>, ty: ResolvedType) -> Self {
        Self {
            name: name.into(),
            ty,
            annotations: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropertyDescriptor {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: ResolvedType,
    #[serde(default)]
    pub annotations: Vec<AnnotationDescriptor>,
}

impl PropertyDescriptor {
    pub fn new(name: impl Into<String>, ty: ResolvedType) -> Self {
        Self {
            name: name.into(),
            ty,
            annotations: Vec::new(),
        }
    }
}

/// An annotation usage as the symbol front-end reports it. Arguments that were left at their
/// declared default are absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnnotationDescriptor {
    pub fq_name: FqName,
    #[serde(default)]
    pub arguments: Vec<ConstantArgument>,
}

impl AnnotationDescriptor {
    pub fn new(fq_name: impl Into<FqName>, arguments: Vec<ConstantArgument>) -> Self {
        Self {
            fq_name: fq_name.into(),
            arguments,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConstantArgument {
    pub name: String,
    pub value: ConstantValue,
}

impl ConstantArgument {
    pub fn new(name: impl Into<String>, value: ConstantValue) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ConstantValue {
    KClass(FqName),
    Enum { class: FqName, entry: String },
    String(String),
    Int(i64),
    Bool(bool),
    Array(Vec<ConstantValue>),
    Annotation(AnnotationDescriptor),
}

/// All descriptors known to the symbol front-end, in registration order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "Vec<ClassDescriptor>", into = "Vec<ClassDescriptor>")]
pub struct SymbolTable {
    classes: Vec<ClassDescriptor>,
    index: HashMap<FqName, usize>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// A table pre-populated with the language's core classes, enough to resolve default
    /// imports and function types.
    pub fn with_builtins() -> Self {
        let mut table = Self::new();
        for name in [
            "Any", "Unit", "Nothing", "String", "CharSequence", "Char", "Boolean", "Byte", "Short",
            "Int", "Long", "Float", "Double", "Number",
        ] {
            table.insert(ClassDescriptor::new(
                well_known::KOTLIN_PACKAGE,
                name,
                ClassKind::Class,
            ));
        }

        let mut array = ClassDescriptor::new(well_known::KOTLIN_PACKAGE, "Array", ClassKind::Class);
        array.type_parameters = vec!["T".to_string()];
        table.insert(array);

        for (name, parameters) in [
            ("Iterable", &["T"][..]),
            ("Collection", &["E"][..]),
            ("List", &["E"][..]),
            ("MutableList", &["E"][..]),
            ("Set", &["E"][..]),
            ("MutableSet", &["E"][..]),
            ("Map", &["K", "V"][..]),
            ("MutableMap", &["K", "V"][..]),
        ] {
            let mut descriptor =
                ClassDescriptor::new("kotlin.collections", name, ClassKind::Interface);
            descriptor.type_parameters = parameters.iter().map(|p| p.to_string()).collect();
            table.insert(descriptor);
        }

        for arity in 0..=well_known::MAX_FUNCTION_ARITY {
            let mut function = ClassDescriptor::new(
                well_known::KOTLIN_PACKAGE,
                &format!("Function{arity}"),
                ClassKind::Interface,
            );
            function.type_parameters = (1..=arity)
                .map(|index| format!("P{index}"))
                .chain(std::iter::once("R".to_string()))
                .collect();
            table.insert(function);
        }

        table
    }

    /// Registers `descriptor`, replacing an earlier descriptor with the same name.
    pub fn insert(&mut self, descriptor: ClassDescriptor) {
        match self.index.get(&descriptor.fq_name) {
            Some(&position) => self.classes[position] = descriptor,
            None => {
                self.index
                    .insert(descriptor.fq_name.clone(), self.classes.len());
                self.classes.push(descriptor);
            }
        }
    }

    pub fn get(&self, fq_name: &FqName) -> Option<&ClassDescriptor> {
        self.index.get(fq_name).map(|&position| &self.classes[position])
    }

    pub fn contains(&self, fq_name: &FqName) -> bool {
        self.index.contains_key(fq_name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ClassDescriptor> {
        self.classes.iter()
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

impl From<Vec<ClassDescriptor>> for SymbolTable {
    fn from(classes: Vec<ClassDescriptor>) -> Self {
        let mut table = SymbolTable::new();
        for descriptor in classes {
            table.insert(descriptor);
        }
        table
    }
}

impl From<SymbolTable> for Vec<ClassDescriptor> {
    fn from(table: SymbolTable) -> Self {
        table.classes
    }
}
