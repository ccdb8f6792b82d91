//! Output formatting for bump results
//!
//! Changed and unchanged specifiers go to stdout, one per line; failures go
//! to stderr so stdout stays usable as a list of specifiers.

mod text;

pub use text::TextFormatter;

use std::io::IsTerminal;

/// Configuration for output formatting
#[derive(Debug, Clone, Default)]
pub struct OutputConfig {
    /// Whether this is a dry-run
    pub dry_run: bool,
    /// Whether to use colors
    pub color: bool,
}

impl OutputConfig {
    /// Create configuration from CLI arguments; colors need a terminal
    pub fn from_cli(no_color: bool, dry_run: bool) -> Self {
        Self {
            dry_run,
            color: !no_color && std::io::stdout().is_terminal(),
        }
    }
}
