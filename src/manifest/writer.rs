//! Manifest file writing
//!
//! This module provides:
//! - Splicing of rewritten specifiers into their byte ranges
//! - Dry-run mode support (no actual file modifications)
//! - Format preservation: bytes outside replaced ranges are never touched

use crate::error::ManifestError;
use crate::manifest::ManifestEntry;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Writer for manifest files that applies specifier replacements
pub struct ManifestWriter {
    /// Whether to run in dry-run mode (no file modifications)
    dry_run: bool,
}

/// Result of applying replacements to a manifest file
#[derive(Debug)]
pub struct WriteResult {
    /// Path to the manifest file
    pub path: PathBuf,
    /// Number of replacements applied to the content
    pub replacements_applied: usize,
    /// Whether the file was actually modified
    pub file_modified: bool,
}

impl WriteResult {
    /// Returns true if any replacement was applied
    pub fn has_updates(&self) -> bool {
        self.replacements_applied > 0
    }
}

impl ManifestWriter {
    /// Create a new ManifestWriter
    pub fn new(dry_run: bool) -> Self {
        Self { dry_run }
    }

    /// Apply replacements to `content` and write it to `path` unless in
    /// dry-run mode or nothing changed
    pub fn write(
        &self,
        path: &Path,
        content: &str,
        replacements: &[(&ManifestEntry, &str)],
    ) -> Result<WriteResult, ManifestError> {
        let updated = apply_replacements(content, replacements);
        let mut result = WriteResult {
            path: path.to_path_buf(),
            replacements_applied: replacements.len(),
            file_modified: false,
        };

        if updated == content {
            return Ok(result);
        }

        if self.dry_run {
            debug!("Dry run: not writing {}", path.display());
        } else {
            write_manifest(path, &updated)?;
            result.file_modified = true;
        }

        Ok(result)
    }
}

/// Splice replacement specifiers into their entries' ranges.
///
/// Replacements are applied back to front so earlier ranges stay valid.
/// Each replacement is encoded with its entry's quoting.
pub fn apply_replacements(content: &str, replacements: &[(&ManifestEntry, &str)]) -> String {
    let mut ordered: Vec<&(&ManifestEntry, &str)> = replacements.iter().collect();
    ordered.sort_by_key(|(entry, _)| std::cmp::Reverse(entry.range.start));

    let mut updated = content.to_string();
    for (entry, replacement) in ordered {
        updated.replace_range(entry.range.clone(), &entry.quoting.encode(replacement));
    }
    updated
}

/// Read a manifest file content safely
pub fn read_manifest(path: &Path) -> Result<String, ManifestError> {
    fs::read_to_string(path).map_err(|e| ManifestError::read_error(path, e))
}

/// Write content to a manifest file
pub fn write_manifest(path: &Path, content: &str) -> Result<(), ManifestError> {
    fs::write(path, content).map_err(|e| ManifestError::write_error(path, e))
}
