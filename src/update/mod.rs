//! Version selection and specifier rewriting
//!
//! This module provides:
//! - The version model (parsing, ordering, pre-release detection, display)
//! - Selection of the winning version from a candidate set
//! - Rewriting of Python and npm specifiers around the chosen version

mod rewriter;
mod selector;
mod version_info;

pub use rewriter::{js_package_name, rewrite_js, rewrite_python};
pub use selector::{select_js, select_python};
pub use version_info::{
    is_prerelease, normalize_version, parse_version, VersionInfo, VersionParseError,
};
