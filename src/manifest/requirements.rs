//! pip requirement files (requirements*.txt, *.in)

use crate::error::ManifestError;
use crate::manifest::{is_directive, trimmed_value, ManifestEntry, ManifestKind, ManifestScanner};
use std::path::Path;

/// Scanner for pip requirement files
pub struct RequirementsScanner;

impl ManifestScanner for RequirementsScanner {
    fn scan(&self, _path: &Path, content: &str) -> Result<Vec<ManifestEntry>, ManifestError> {
        let mut entries = Vec::new();
        let mut offset = 0;

        for line in content.split_inclusive('\n') {
            let line_start = offset;
            offset += line.len();

            // per-requirement options such as `--hash=...` follow the specifier
            let text = line.trim_end_matches(['\n', '\r']);
            let text = match text.find(" --") {
                Some(idx) => &text[..idx],
                None => text,
            };
            let text = text.trim_end_matches('\\');

            let Some(range) = trimmed_value(text) else {
                continue;
            };
            let spec = &text[range.clone()];
            if is_directive(spec) || spec.contains("://") {
                continue;
            }
            entries.push(ManifestEntry::bare(
                spec,
                line_start + range.start..line_start + range.end,
            ));
        }

        Ok(entries)
    }

    fn kind(&self) -> ManifestKind {
        ManifestKind::Requirements
    }
}
