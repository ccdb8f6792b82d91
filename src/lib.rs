//! bump-deps-index - dependency specifier bumping library
//!
//! This library resolves the newest acceptable version of a package from a
//! PyPI-style simple index or an npm registry and rewrites dependency
//! specifiers around it, keeping their operator, extras and markers.

pub mod cli;
pub mod dispatch;
pub mod domain;
pub mod error;
pub mod manifest;
pub mod orchestrator;
pub mod output;
pub mod registry;
pub mod update;
