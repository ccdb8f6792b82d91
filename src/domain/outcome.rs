//! Per-specifier outcome of a bump run

use super::Ecosystem;
use std::fmt;

/// What happened to one specifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BumpOutcome {
    /// The specifier was rewritten
    Changed {
        /// The specifier as found
        old: String,
        /// The rewritten specifier
        new: String,
        /// Ecosystem the specifier was resolved against
        ecosystem: Ecosystem,
    },
    /// Nothing better was found
    Unchanged {
        /// The specifier as found
        spec: String,
        /// Ecosystem the specifier was resolved against
        ecosystem: Ecosystem,
    },
    /// Resolution failed
    Failed {
        /// The specifier as found
        spec: String,
        /// Ecosystem the specifier was resolved against
        ecosystem: Ecosystem,
        /// Rendered error message
        error: String,
    },
}

impl BumpOutcome {
    /// Build an outcome from the old and new specifier text
    pub fn from_resolution(old: impl Into<String>, new: impl Into<String>, ecosystem: Ecosystem) -> Self {
        let old = old.into();
        let new = new.into();
        if old == new {
            BumpOutcome::Unchanged {
                spec: old,
                ecosystem,
            }
        } else {
            BumpOutcome::Changed {
                old,
                new,
                ecosystem,
            }
        }
    }

    /// Creates a Failed outcome
    pub fn failed(spec: impl Into<String>, ecosystem: Ecosystem, error: impl fmt::Display) -> Self {
        BumpOutcome::Failed {
            spec: spec.into(),
            ecosystem,
            error: error.to_string(),
        }
    }

    /// The specifier as it was found
    pub fn spec(&self) -> &str {
        match self {
            BumpOutcome::Changed { old, .. } => old,
            BumpOutcome::Unchanged { spec, .. } => spec,
            BumpOutcome::Failed { spec, .. } => spec,
        }
    }

    /// Returns the replacement text if the specifier changed
    pub fn replacement(&self) -> Option<&str> {
        match self {
            BumpOutcome::Changed { new, .. } => Some(new),
            _ => None,
        }
    }

    /// Returns true if this is a changed outcome
    pub fn is_changed(&self) -> bool {
        matches!(self, BumpOutcome::Changed { .. })
    }

    /// Returns true if this is a failed outcome
    pub fn is_failed(&self) -> bool {
        matches!(self, BumpOutcome::Failed { .. })
    }
}

impl fmt::Display for BumpOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BumpOutcome::Changed { old, new, .. } => write!(f, "{} -> {}", old, new),
            BumpOutcome::Unchanged { spec, .. } => write!(f, "{}", spec),
            BumpOutcome::Failed { spec, error, .. } => write!(f, "failed {} with {}", spec, error),
        }
    }
}
