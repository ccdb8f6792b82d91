//! Manifest file detection
//!
//! Features:
//! - Recognizes pyproject.toml, tox.ini, setup.cfg, .pre-commit-config.yaml
//! - Recognizes pip requirement files (requirements*.txt, *.in)
//! - Lists the supported manifests of a directory

use std::fmt;
use std::path::{Path, PathBuf};

/// Supported manifest formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ManifestKind {
    /// PEP 517/621 project metadata
    PyprojectToml,
    /// tox configuration
    ToxIni,
    /// setuptools declarative configuration
    SetupCfg,
    /// pre-commit hook configuration
    PreCommitConfig,
    /// pip requirement file
    Requirements,
}

impl ManifestKind {
    /// Returns all supported kinds
    pub fn all() -> &'static [ManifestKind] {
        &[
            ManifestKind::PyprojectToml,
            ManifestKind::ToxIni,
            ManifestKind::SetupCfg,
            ManifestKind::PreCommitConfig,
            ManifestKind::Requirements,
        ]
    }

    /// Detect the kind from a file name
    pub fn from_path(path: &Path) -> Option<Self> {
        let name = path.file_name()?.to_str()?;
        match name {
            "pyproject.toml" => Some(ManifestKind::PyprojectToml),
            "tox.ini" => Some(ManifestKind::ToxIni),
            "setup.cfg" => Some(ManifestKind::SetupCfg),
            ".pre-commit-config.yaml" => Some(ManifestKind::PreCommitConfig),
            _ if is_requirements_file(name) => Some(ManifestKind::Requirements),
            _ => None,
        }
    }
}

impl fmt::Display for ManifestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ManifestKind::PyprojectToml => "pyproject.toml",
            ManifestKind::ToxIni => "tox.ini",
            ManifestKind::SetupCfg => "setup.cfg",
            ManifestKind::PreCommitConfig => ".pre-commit-config.yaml",
            ManifestKind::Requirements => "requirements",
        };
        write!(f, "{}", name)
    }
}

fn is_requirements_file(name: &str) -> bool {
    (name.starts_with("requirements") && name.ends_with(".txt")) || name.ends_with(".in")
}

/// Detect all supported manifest files directly inside `dir`, sorted by path
pub fn detect_manifests(dir: &Path) -> Vec<PathBuf> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };

    let mut manifests: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && ManifestKind::from_path(path).is_some())
        .collect();
    manifests.sort();
    manifests
}
