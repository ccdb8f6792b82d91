//! Core domain models
//!
//! This module contains:
//! - Ecosystem types for the supported package indexes
//! - The Python dependency specifier grammar
//! - Per-specifier outcomes of a bump run

mod ecosystem;
mod outcome;
mod specifier;

pub use ecosystem::Ecosystem;
pub use outcome::BumpOutcome;
pub use specifier::{Constraint, Operator, Specifier};
