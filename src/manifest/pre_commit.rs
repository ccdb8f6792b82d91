//! .pre-commit-config.yaml scanner
//!
//! Handles `additional_dependencies` of every hook, in block style
//! (`- item` lines) or flow style (`[a, b]`). Items may be Python
//! requirements or npm `name@version` specifiers.

use crate::error::ManifestError;
use crate::manifest::{is_directive, trimmed_value, ManifestEntry, ManifestKind, ManifestScanner};
use std::path::Path;

const KEY: &str = "additional_dependencies:";

/// Scanner for .pre-commit-config.yaml files
pub struct PreCommitScanner;

impl ManifestScanner for PreCommitScanner {
    fn scan(&self, _path: &Path, content: &str) -> Result<Vec<ManifestEntry>, ManifestError> {
        let mut entries = Vec::new();
        // indentation of the key whose block list is being read
        let mut list_indent: Option<usize> = None;
        let mut offset = 0;

        for line in content.split_inclusive('\n') {
            let line_start = offset;
            offset += line.len();
            let text = line.trim_end_matches(['\n', '\r']);
            let trimmed = text.trim_start();
            let indent = text.len() - trimmed.len();

            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            if let Some(key_indent) = list_indent {
                if indent >= key_indent && trimmed.starts_with('-') {
                    let item_start = indent + 1;
                    push_item(&mut entries, &text[item_start..], line_start + item_start);
                    continue;
                }
                list_indent = None;
            }

            // `- additional_dependencies:` as the first key of a sequence item
            let key_at = if trimmed.starts_with(KEY) {
                Some(indent)
            } else {
                trimmed
                    .strip_prefix('-')
                    .map(|rest| indent + 1 + (rest.len() - rest.trim_start().len()))
                    .filter(|&at| text[at..].starts_with(KEY))
            };

            if let Some(at) = key_at {
                let value_start = at + KEY.len();
                let value = &text[value_start..];
                match value.trim_start().strip_prefix('[') {
                    Some(_) => scan_flow(&mut entries, value, line_start + value_start),
                    None => list_indent = Some(at),
                }
            }
        }

        Ok(entries)
    }

    fn kind(&self) -> ManifestKind {
        ManifestKind::PreCommitConfig
    }
}

/// Read `[a, "b", 'c']` items
fn scan_flow(entries: &mut Vec<ManifestEntry>, value: &str, value_start: usize) {
    let Some(open) = value.find('[') else {
        return;
    };
    let close = value.rfind(']').unwrap_or(value.len());
    if close <= open {
        return;
    }

    let mut item_start = open + 1;
    for item in value[open + 1..close].split(',') {
        push_item(entries, item, value_start + item_start);
        item_start += item.len() + 1;
    }
}

/// Push one list item, dropping surrounding quotes
fn push_item(entries: &mut Vec<ManifestEntry>, item: &str, item_start: usize) {
    let Some(range) = trimmed_value(item) else {
        return;
    };
    let mut text = &item[range.clone()];
    let mut start = item_start + range.start;

    for quote in ['"', '\''] {
        if text.len() >= 2 && text.starts_with(quote) && text.ends_with(quote) {
            text = &text[1..text.len() - 1];
            start += 1;
            break;
        }
    }

    if !text.is_empty() && !is_directive(text) {
        entries.push(ManifestEntry::bare(text, start..start + text.len()));
    }
}
