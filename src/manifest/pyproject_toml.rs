//! pyproject.toml scanner for Python projects
//!
//! Handles:
//! - build-system.requires (PEP 518)
//! - project.dependencies (PEP 621)
//! - project.optional-dependencies (PEP 621)
//! - dependency-groups (PEP 735, string entries only)
//!
//! Every array element is deserialized as a `toml::Spanned` value, so the
//! byte range of each specifier comes from the parser itself and the rest of
//! the file is never re-serialized.

use crate::error::ManifestError;
use crate::manifest::{ManifestEntry, ManifestKind, ManifestScanner, Quoting};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use toml::{Spanned, Value};
use tracing::debug;

type SpannedArray = Vec<Spanned<Value>>;

/// The parts of pyproject.toml that hold specifiers
#[derive(Debug, Default, Deserialize)]
struct Pyproject {
    #[serde(default, rename = "build-system")]
    build_system: Option<BuildSystem>,
    #[serde(default)]
    project: Option<Project>,
    #[serde(default, rename = "dependency-groups")]
    dependency_groups: BTreeMap<String, SpannedArray>,
}

#[derive(Debug, Default, Deserialize)]
struct BuildSystem {
    #[serde(default)]
    requires: SpannedArray,
}

#[derive(Debug, Default, Deserialize)]
struct Project {
    #[serde(default)]
    dependencies: SpannedArray,
    #[serde(default, rename = "optional-dependencies")]
    optional_dependencies: BTreeMap<String, SpannedArray>,
}

/// Scanner for pyproject.toml files
pub struct PyprojectTomlScanner;

impl ManifestScanner for PyprojectTomlScanner {
    fn scan(&self, path: &Path, content: &str) -> Result<Vec<ManifestEntry>, ManifestError> {
        let pyproject: Pyproject = toml::from_str(content)
            .map_err(|e: toml::de::Error| ManifestError::toml_parse_error(path, e.to_string()))?;

        let mut arrays: Vec<&SpannedArray> = Vec::new();
        if let Some(build_system) = &pyproject.build_system {
            arrays.push(&build_system.requires);
        }
        if let Some(project) = &pyproject.project {
            arrays.push(&project.dependencies);
            arrays.extend(project.optional_dependencies.values());
        }
        // `{include-group = "..."}` tables are not specifiers
        arrays.extend(pyproject.dependency_groups.values());

        let mut entries: Vec<ManifestEntry> = arrays
            .into_iter()
            .flatten()
            .filter_map(|value| string_entry(content, value))
            .collect();
        entries.sort_by_key(|e| e.range.start);
        Ok(entries)
    }

    fn kind(&self) -> ManifestKind {
        ManifestKind::PyprojectToml
    }
}

/// Entry for a spanned string element, with the range narrowed to the text
/// between its quotes
fn string_entry(content: &str, value: &Spanned<Value>) -> Option<ManifestEntry> {
    let spec = value.get_ref().as_str()?;
    let span = value.span();
    let raw = content.get(span.clone())?;
    if raw.starts_with("\"\"\"") || raw.starts_with("'''") {
        debug!("Skipping multi-line string {:?}", spec);
        return None;
    }

    let body = if raw.len() >= 2 && (raw.starts_with('"') || raw.starts_with('\'')) {
        span.start + 1..span.end - 1
    } else {
        span
    };

    let before = content.get(..body.start)?;
    if before.ends_with("\"\"\"") || before.ends_with("'''") {
        debug!("Skipping multi-line string {:?}", spec);
        return None;
    }
    let quoting = match before.chars().last()? {
        '"' => Quoting::TomlBasic,
        '\'' => Quoting::TomlLiteral,
        _ => return None,
    };

    Some(ManifestEntry {
        spec: spec.to_string(),
        range: body,
        quoting,
    })
}
