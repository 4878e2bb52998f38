use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::names::{well_known, FqName};

/// Per-module configuration handed over by the build integration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModuleOptions {
    pub module_name: String,
    /// Restrictive mode: merge annotations are rejected instead of being processed.
    pub disable_component_merging: bool,
    pub markers: MarkerTable,
}

impl Default for ModuleOptions {
    fn default() -> Self {
        Self {
            module_name: "main".to_string(),
            disable_component_merging: false,
            markers: MarkerTable::default(),
        }
    }
}

impl ModuleOptions {
    pub fn from_json_str(source: &str) -> Result<Self> {
        serde_json::from_str(source).context("failed to parse module options")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let source = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::from_json_str(&source)
            .with_context(|| format!("invalid module options in {}", path.display()))
    }
}

/// Meta-annotations that classify the annotations carrying them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarkerAnnotation {
    Qualifier,
    MapKey,
    Scope,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkerTable {
    pub qualifier: FqName,
    pub map_key: FqName,
    pub scope: FqName,
}

impl Default for MarkerTable {
    fn default() -> Self {
        Self {
            qualifier: FqName::new(well_known::DEFAULT_QUALIFIER),
            map_key: FqName::new(well_known::DEFAULT_MAP_KEY),
            scope: FqName::new(well_known::DEFAULT_SCOPE),
        }
    }
}

impl MarkerTable {
    pub fn fq_name(&self, marker: MarkerAnnotation) -> &FqName {
        match marker {
            MarkerAnnotation::Qualifier => &self.qualifier,
            MarkerAnnotation::MapKey => &self.map_key,
            MarkerAnnotation::Scope => &self.scope,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_use_defaults() {
        let options = ModuleOptions::from_json_str(r#"{ "module_name": "app" }"#)
            .expect("options should parse");
        assert_eq!(options.module_name, "app");
        assert!(!options.disable_component_merging);
        assert_eq!(options.markers, MarkerTable::default());
    }

    #[test]
    fn marker_overrides_are_partial() {
        let options = ModuleOptions::from_json_str(
            r#"{ "markers": { "qualifier": "jakarta.inject.Qualifier" } }"#,
        )
        .expect("options should parse");
        assert_eq!(
            options.markers.fq_name(MarkerAnnotation::Qualifier).as_str(),
            "jakarta.inject.Qualifier"
        );
        assert_eq!(
            options.markers.fq_name(MarkerAnnotation::Scope).as_str(),
            well_known::DEFAULT_SCOPE
        );
    }

    #[test]
    fn malformed_json_is_reported() {
        let error = ModuleOptions::from_json_str("{").expect_err("should fail");
        assert!(error.to_string().contains("failed to parse module options"));
    }
}
