//! Package ecosystem definitions
//!
//! The ecosystem decides which registry protocol is queried and which
//! specifier grammar applies when a specifier is rewritten.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Package index protocol families
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Ecosystem {
    /// PyPI-style static HTML index (PEP 503 simple API)
    Python,
    /// npm-style JSON registry
    JavaScript,
}

impl Ecosystem {
    /// Returns the display name used in the "using index" banner
    pub fn display_name(&self) -> &'static str {
        match self {
            Ecosystem::Python => "Python",
            Ecosystem::JavaScript => "JavaScript",
        }
    }

    /// Returns the registry name used in error messages
    pub fn registry_name(&self) -> &'static str {
        match self {
            Ecosystem::Python => "Python index",
            Ecosystem::JavaScript => "npm registry",
        }
    }

    /// Guess the ecosystem of a bare specifier string.
    ///
    /// `name@version` and `@scope/name` are npm specifiers. A PEP 508 URL
    /// requirement (`name @ https://...`) contains whitespace or a scheme
    /// separator and stays Python.
    pub fn detect(spec: &str) -> Self {
        let spec = spec.trim();
        if spec.contains('@') && !spec.contains(char::is_whitespace) && !spec.contains("://") {
            Ecosystem::JavaScript
        } else {
            Ecosystem::Python
        }
    }

    /// Returns all supported ecosystems
    pub fn all() -> &'static [Ecosystem] {
        &[Ecosystem::Python, Ecosystem::JavaScript]
    }
}

impl fmt::Display for Ecosystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}
