//! INI-style manifests: tox.ini and setup.cfg
//!
//! Handles:
//! - tox.ini: `deps` of `[testenv]` and `[testenv:*]`
//! - setup.cfg: `install_requires` of `[options]` and every key of
//!   `[options.extras_require]`
//!
//! Values are one specifier per line, either after `=` or on indented
//! continuation lines.

use crate::error::ManifestError;
use crate::manifest::{is_directive, trimmed_value, ManifestEntry, ManifestKind, ManifestScanner};
use std::path::Path;

/// Scanner for tox.ini files
pub struct ToxIniScanner;

/// Scanner for setup.cfg files
pub struct SetupCfgScanner;

impl ManifestScanner for ToxIniScanner {
    fn scan(&self, _path: &Path, content: &str) -> Result<Vec<ManifestEntry>, ManifestError> {
        Ok(scan_ini(content, |section, key| {
            (section == "testenv" || section.starts_with("testenv:")) && key == "deps"
        }))
    }

    fn kind(&self) -> ManifestKind {
        ManifestKind::ToxIni
    }
}

impl ManifestScanner for SetupCfgScanner {
    fn scan(&self, _path: &Path, content: &str) -> Result<Vec<ManifestEntry>, ManifestError> {
        Ok(scan_ini(content, |section, key| {
            (section == "options" && key == "install_requires")
                || section == "options.extras_require"
        }))
    }

    fn kind(&self) -> ManifestKind {
        ManifestKind::SetupCfg
    }
}

/// Collect the specifier lines of every selected `(section, key)` value
fn scan_ini(content: &str, selects: impl Fn(&str, &str) -> bool) -> Vec<ManifestEntry> {
    let mut entries = Vec::new();
    let mut section = String::new();
    let mut collecting = false;
    let mut offset = 0;

    for line in content.split_inclusive('\n') {
        let line_start = offset;
        offset += line.len();
        let text = line.trim_end_matches(['\n', '\r']);
        let trimmed = text.trim();

        if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with(';') {
            continue;
        }

        if text.starts_with(char::is_whitespace) {
            if collecting {
                push_value(&mut entries, text, line_start);
            }
            continue;
        }

        if let Some(name) = trimmed.strip_prefix('[').and_then(|t| t.strip_suffix(']')) {
            section = name.trim().to_string();
            collecting = false;
            continue;
        }

        collecting = false;
        if let Some(eq) = text.find('=') {
            let key = text[..eq].trim();
            if selects(&section, key) {
                collecting = true;
                push_value(&mut entries, &text[eq + 1..], line_start + eq + 1);
            }
        }
    }

    entries
}

fn push_value(entries: &mut Vec<ManifestEntry>, value: &str, value_start: usize) {
    if let Some(range) = trimmed_value(value) {
        let spec = &value[range.clone()];
        if !is_directive(spec) {
            entries.push(ManifestEntry::bare(
                spec,
                value_start + range.start..value_start + range.end,
            ));
        }
    }
}
