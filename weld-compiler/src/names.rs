use std::fmt;

use serde::{Deserialize, Serialize};

/// A dot separated, fully-qualified name such as `kotlin.collections.List`. The root name is
/// the empty string and is used for the default package.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FqName(String);

impl FqName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn root() -> Self {
        Self(String::new())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn short_name(&self) -> &str {
        match self.0.rfind('.') {
            Some(index) => &self.0[index + 1..],
            None => &self.0,
        }
    }

    pub fn parent(&self) -> FqName {
        match self.0.rfind('.') {
            Some(index) => FqName(self.0[..index].to_string()),
            None => FqName::root(),
        }
    }

    pub fn child(&self, name: &str) -> FqName {
        if self.is_root() {
            FqName(name.to_string())
        } else {
            FqName(format!("{}.{name}", self.0))
        }
    }

}

impl fmt::Display for FqName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FqName {
    fn from(value: &str) -> Self {
        FqName::new(value)
    }
}

impl From<String> for FqName {
    fn from(value: String) -> Self {
        FqName(value)
    }
}

pub mod well_known {
    pub const KOTLIN_PACKAGE: &str = "kotlin";
    pub const FUNCTION_TYPE_PREFIX: &str = "kotlin.Function";
    pub const MAX_FUNCTION_ARITY: usize = 22;
    pub const CONSTRUCTOR_NAME: &str = "<init>";

    /// Packages whose classes are visible in every file without an import.
    pub const DEFAULT_IMPORTS: &[&str] = &[
        "kotlin",
        "kotlin.annotation",
        "kotlin.collections",
        "kotlin.ranges",
        "kotlin.sequences",
        "kotlin.text",
    ];

    pub const DEFAULT_QUALIFIER: &str = "javax.inject.Qualifier";
    pub const DEFAULT_MAP_KEY: &str = "dagger.MapKey";
    pub const DEFAULT_SCOPE: &str = "javax.inject.Scope";

    pub const CONTRIBUTES_BINDING: &str = "weld.annotations.ContributesBinding";
    pub const CONTRIBUTES_MULTIBINDING: &str = "weld.annotations.ContributesMultibinding";

    pub const MERGE_COMPONENT: &str = "weld.annotations.MergeComponent";
    pub const MERGE_SUBCOMPONENT: &str = "weld.annotations.MergeSubcomponent";
    pub const MERGE_INTERFACES: &str = "weld.annotations.compat.MergeInterfaces";
    pub const MERGE_MODULES: &str = "weld.annotations.compat.MergeModules";

    pub const MERGE_ANNOTATIONS: &[&str] = &[
        MERGE_COMPONENT,
        MERGE_SUBCOMPONENT,
        MERGE_INTERFACES,
        MERGE_MODULES,
    ];

    pub const SCOPE_ARGUMENT: &str = "scope";
    pub const BOUND_TYPE_ARGUMENT: &str = "boundType";
}
