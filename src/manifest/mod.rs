//! Manifest file detection, scanning and rewriting
//!
//! This module provides functionality to:
//! - Recognize supported manifest files by name
//! - Locate every dependency specifier in a manifest, with its byte range
//! - Splice rewritten specifiers back without touching the rest of the file

mod detector;
mod ini;
mod pre_commit;
mod pyproject_toml;
mod requirements;
mod writer;

pub use detector::{detect_manifests, ManifestKind};
pub use ini::{SetupCfgScanner, ToxIniScanner};
pub use pre_commit::PreCommitScanner;
pub use pyproject_toml::PyprojectTomlScanner;
pub use requirements::RequirementsScanner;
pub use writer::{apply_replacements, read_manifest, write_manifest, ManifestWriter, WriteResult};

use crate::domain::Ecosystem;
use crate::error::ManifestError;
use std::ops::Range;
use std::path::{Path, PathBuf};

/// How a specifier is spelled inside its manifest
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quoting {
    /// Written as-is (INI values, requirement lines, plain YAML scalars)
    Bare,
    /// Inside a TOML basic string (`"..."`, with backslash escapes)
    TomlBasic,
    /// Inside a TOML literal string (`'...'`, no escapes)
    TomlLiteral,
}

impl Quoting {
    /// Encode specifier text for this spelling
    pub fn encode(&self, text: &str) -> String {
        match self {
            Quoting::Bare | Quoting::TomlLiteral => text.to_string(),
            Quoting::TomlBasic => text.replace('\\', "\\\\").replace('"', "\\\""),
        }
    }
}

/// One dependency specifier found in a manifest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    /// Decoded specifier text
    pub spec: String,
    /// Byte range of the encoded specifier inside the file
    pub range: Range<usize>,
    /// How the specifier is spelled
    pub quoting: Quoting,
}

impl ManifestEntry {
    /// Create an entry for text written without quoting
    pub fn bare(spec: impl Into<String>, range: Range<usize>) -> Self {
        Self {
            spec: spec.into(),
            range,
            quoting: Quoting::Bare,
        }
    }

    /// Ecosystem the specifier belongs to
    pub fn ecosystem(&self) -> Ecosystem {
        Ecosystem::detect(&self.spec)
    }
}

/// Trait for locating specifiers in a manifest format
pub trait ManifestScanner {
    /// Find every specifier in the content, in file order
    fn scan(&self, path: &Path, content: &str) -> Result<Vec<ManifestEntry>, ManifestError>;

    /// Returns the manifest kind this scanner handles
    fn kind(&self) -> ManifestKind;
}

/// Get the scanner for a manifest kind
pub fn get_scanner(kind: ManifestKind) -> Box<dyn ManifestScanner> {
    match kind {
        ManifestKind::PyprojectToml => Box::new(PyprojectTomlScanner),
        ManifestKind::ToxIni => Box::new(ToxIniScanner),
        ManifestKind::SetupCfg => Box::new(SetupCfgScanner),
        ManifestKind::PreCommitConfig => Box::new(PreCommitScanner),
        ManifestKind::Requirements => Box::new(RequirementsScanner),
    }
}

/// A manifest read from disk together with its specifiers
#[derive(Debug, Clone)]
pub struct ManifestFile {
    /// Path to the manifest file
    pub path: PathBuf,
    /// Detected format
    pub kind: ManifestKind,
    /// Content at the time of scanning
    pub content: String,
    /// Specifiers found in the content
    pub entries: Vec<ManifestEntry>,
}

/// Read and scan a manifest file
pub fn load_manifest(path: &Path) -> Result<ManifestFile, ManifestError> {
    if !path.exists() {
        return Err(ManifestError::not_found(path));
    }
    let kind =
        ManifestKind::from_path(path).ok_or_else(|| ManifestError::unsupported_format(path))?;
    let content = read_manifest(path)?;
    let entries = get_scanner(kind).scan(path, &content)?;

    Ok(ManifestFile {
        path: path.to_path_buf(),
        kind,
        content,
        entries,
    })
}

/// Trim a value and strip a trailing ` #` comment, returning the byte range
/// of what is left relative to `value`
pub(crate) fn trimmed_value(value: &str) -> Option<Range<usize>> {
    let value = match value.find(" #") {
        Some(idx) => &value[..idx],
        None => value,
    };
    let start = value.len() - value.trim_start().len();
    let end = value.trim_end().len();
    (start < end).then_some(start..end)
}

/// Returns true for text that cannot be a specifier: options, comments and
/// substitutions
pub(crate) fn is_directive(text: &str) -> bool {
    text.starts_with('-') || text.starts_with('#') || text.starts_with('{')
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_get_scanner_kinds() {
        for kind in ManifestKind::all() {
            assert_eq!(get_scanner(*kind).kind(), *kind);
        }
    }

    #[test]
    fn test_quoting_encode() {
        assert_eq!(Quoting::Bare.encode(r#"a; b=="c""#), r#"a; b=="c""#);
        assert_eq!(Quoting::TomlBasic.encode(r#"a; b=="c""#), r#"a; b==\"c\""#);
        assert_eq!(Quoting::TomlLiteral.encode("a\\b"), "a\\b");
    }

    #[test]
    fn test_trimmed_value() {
        assert_eq!(trimmed_value("  pkg>=1  # pinned"), Some(2..8));
        assert_eq!(trimmed_value("pkg"), Some(0..3));
        assert_eq!(trimmed_value("   "), None);
        assert_eq!(trimmed_value(" # only a comment"), None);
    }

    #[test]
    fn test_is_directive() {
        assert!(is_directive("-r requirements.txt"));
        assert!(is_directive("# comment"));
        assert!(is_directive("{[testenv]deps}"));
        assert!(!is_directive("pkg>=1"));
    }

    #[test]
    fn test_entry_ecosystem() {
        assert_eq!(ManifestEntry::bare("black==22.6.0", 0..13).ecosystem(), Ecosystem::Python);
        assert_eq!(ManifestEntry::bare("prettier@22", 0..11).ecosystem(), Ecosystem::JavaScript);
    }

    #[test]
    fn test_load_manifest() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("requirements.txt");
        fs::write(&path, "A\nB==2\n").unwrap();

        let manifest = load_manifest(&path).unwrap();
        assert_eq!(manifest.kind, ManifestKind::Requirements);
        let specs: Vec<&str> = manifest.entries.iter().map(|e| e.spec.as_str()).collect();
        assert_eq!(specs, vec!["A", "B==2"]);
    }

    #[test]
    fn test_load_manifest_not_found() {
        let dir = TempDir::new().unwrap();
        let result = load_manifest(&dir.path().join("tox.ini"));
        assert!(matches!(result, Err(ManifestError::NotFound { .. })));
    }

    #[test]
    fn test_load_manifest_unsupported() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("Cargo.toml");
        fs::write(&path, "[package]\n").unwrap();
        let result = load_manifest(&path);
        assert!(matches!(result, Err(ManifestError::UnsupportedFormat { .. })));
    }
}
