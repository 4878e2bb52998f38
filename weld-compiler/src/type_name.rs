use std::collections::HashMap;
use std::fmt;

use crate::names::{well_known, FqName};
use crate::symbols::ResolvedType;

/// Type representation handed to code generators. Unlike the front-end inputs every class name
/// here is fully qualified.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeName {
    Class {
        fq_name: FqName,
        arguments: Vec<TypeName>,
        nullable: bool,
    },
    Variable {
        name: String,
        nullable: bool,
    },
    Lambda {
        receiver: Option<Box<TypeName>>,
        parameters: Vec<TypeName>,
        return_type: Box<TypeName>,
        nullable: bool,
    },
    Star,
}

impl TypeName {
    pub fn class(fq_name: impl Into<FqName>) -> Self {
        Self::parameterized(fq_name, Vec::new())
    }

    pub fn parameterized(fq_name: impl Into<FqName>, arguments: Vec<TypeName>) -> Self {
        TypeName::Class {
            fq_name: fq_name.into(),
            arguments,
            nullable: false,
        }
    }

    pub fn variable(name: impl Into<String>) -> Self {
        TypeName::Variable {
            name: name.into(),
            nullable: false,
        }
    }

    pub fn fq_name_or_null(&self) -> Option<&FqName> {
        match self {
            TypeName::Class { fq_name, .. } => Some(fq_name),
            _ => None,
        }
    }

    pub fn variable_name(&self) -> Option<&str> {
        match self {
            TypeName::Variable { name, .. } => Some(name),
            _ => None,
        }
    }

    pub fn is_nullable(&self) -> bool {
        match self {
            TypeName::Class { nullable, .. }
            | TypeName::Variable { nullable, .. }
            | TypeName::Lambda { nullable, .. } => *nullable,
            TypeName::Star => false,
        }
    }

    pub fn with_nullable(self, nullable: bool) -> Self {
        match self {
            TypeName::Class {
                fq_name, arguments, ..
            } => TypeName::Class {
                fq_name,
                arguments,
                nullable,
            },
            TypeName::Variable { name, .. } => TypeName::Variable { name, nullable },
            TypeName::Lambda {
                receiver,
                parameters,
                return_type,
                ..
            } => TypeName::Lambda {
                receiver,
                parameters,
                return_type,
                nullable,
            },
            TypeName::Star => TypeName::Star,
        }
    }

    /// Rewrites lambda sugar into `kotlin.FunctionN`, at every depth. A receiver becomes the
    /// first type argument.
    pub fn as_function_type(&self) -> TypeName {
        match self {
            TypeName::Lambda {
                receiver,
                parameters,
                return_type,
                nullable,
            } => {
                let mut arguments: Vec<TypeName> = receiver
                    .iter()
                    .map(|receiver| receiver.as_function_type())
                    .chain(parameters.iter().map(TypeName::as_function_type))
                    .collect();
                let arity = arguments.len();
                arguments.push(return_type.as_function_type());
                TypeName::Class {
                    fq_name: FqName::new(format!("{}{arity}", well_known::FUNCTION_TYPE_PREFIX)),
                    arguments,
                    nullable: *nullable,
                }
            }
            TypeName::Class {
                fq_name,
                arguments,
                nullable,
            } => TypeName::Class {
                fq_name: fq_name.clone(),
                arguments: arguments.iter().map(TypeName::as_function_type).collect(),
                nullable: *nullable,
            },
            other => other.clone(),
        }
    }

    /// Replaces type variables bound in `mapping`. A nullable variable stays nullable after
    /// substitution.
    pub fn substitute(&self, mapping: &HashMap<String, TypeName>) -> TypeName {
        match self {
            TypeName::Variable { name, nullable } => match mapping.get(name) {
                Some(replacement) => {
                    let nullable = *nullable || replacement.is_nullable();
                    replacement.clone().with_nullable(nullable)
                }
                None => self.clone(),
            },
            TypeName::Class {
                fq_name,
                arguments,
                nullable,
            } => TypeName::Class {
                fq_name: fq_name.clone(),
                arguments: arguments
                    .iter()
                    .map(|argument| argument.substitute(mapping))
                    .collect(),
                nullable: *nullable,
            },
            TypeName::Lambda {
                receiver,
                parameters,
                return_type,
                nullable,
            } => TypeName::Lambda {
                receiver: receiver
                    .as_ref()
                    .map(|receiver| Box::new(receiver.substitute(mapping))),
                parameters: parameters
                    .iter()
                    .map(|parameter| parameter.substitute(mapping))
                    .collect(),
                return_type: Box::new(return_type.substitute(mapping)),
                nullable: *nullable,
            },
            TypeName::Star => TypeName::Star,
        }
    }

    pub fn contains_variables(&self) -> bool {
        match self {
            TypeName::Variable { .. } => true,
            TypeName::Class { arguments, .. } => arguments.iter().any(TypeName::contains_variables),
            TypeName::Lambda {
                receiver,
                parameters,
                return_type,
                ..
            } => {
                receiver
                    .as_ref()
                    .is_some_and(|receiver| receiver.contains_variables())
                    || parameters.iter().any(TypeName::contains_variables)
                    || return_type.contains_variables()
            }
            TypeName::Star => false,
        }
    }
}

impl From<&ResolvedType> for TypeName {
    fn from(ty: &ResolvedType) -> Self {
        match ty {
            ResolvedType::Class {
                fq_name,
                arguments,
                nullable,
            } => TypeName::Class {
                fq_name: fq_name.clone(),
                arguments: arguments.iter().map(TypeName::from).collect(),
                nullable: *nullable,
            },
            ResolvedType::TypeParameter { name, nullable } => TypeName::Variable {
                name: name.clone(),
                nullable: *nullable,
            },
            ResolvedType::Star => TypeName::Star,
        }
    }
}

fn write_joined(f: &mut fmt::Formatter<'_>, items: &[TypeName]) -> fmt::Result {
    for (index, item) in items.iter().enumerate() {
        if index > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeName::Class {
                fq_name,
                arguments,
                nullable,
            } => {
                write!(f, "{fq_name}")?;
                if !arguments.is_empty() {
                    f.write_str("<")?;
                    write_joined(f, arguments)?;
                    f.write_str(">")?;
                }
                if *nullable {
                    f.write_str("?")?;
                }
                Ok(())
            }
            TypeName::Variable { name, nullable } => {
                write!(f, "{name}{}", if *nullable { "?" } else { "" })
            }
            TypeName::Lambda {
                receiver,
                parameters,
                return_type,
                nullable,
            } => {
                if *nullable {
                    f.write_str("(")?;
                }
                if let Some(receiver) = receiver {
                    write!(f, "{receiver}.")?;
                }
                f.write_str("(")?;
                write_joined(f, parameters)?;
                write!(f, ") -> {return_type}")?;
                if *nullable {
                    f.write_str(")?")?;
                }
                Ok(())
            }
            TypeName::Star => f.write_str("*"),
        }
    }
}
