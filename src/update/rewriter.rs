//! Rewriting specifiers around a chosen version
//!
//! Python specifiers keep their original spelling wherever possible: only
//! the version text of the bumped constraint changes. npm specifiers are
//! rebuilt as `name@version`.

use crate::domain::{Operator, Specifier};
use crate::error::SpecifierError;
use crate::update::VersionInfo;

/// Rewrite a Python specifier to require the chosen version.
///
/// `==` constraints are bumped in place when the specifier is pinned,
/// otherwise the `>=` constraint is. Without either, a `>=` constraint is
/// appended and the result is rendered canonically.
pub fn rewrite_python(spec: &Specifier, chosen: &VersionInfo) -> Result<String, SpecifierError> {
    let version = chosen.normalized();
    let target = if spec.has_equality() {
        spec.find_constraint(Operator::Equal)
    } else {
        spec.find_constraint(Operator::GreaterThanEqual)
    };

    if let Some(constraint) = target {
        return Ok(spec.with_constraint_version(constraint, &version));
    }

    let mut rebuilt = spec.name.clone();
    if !spec.extras.is_empty() {
        rebuilt.push_str(&format!("[{}]", spec.extras.join(", ")));
    }
    let existing: Vec<String> = spec.constraints.iter().map(|c| c.to_string()).collect();
    if !existing.is_empty() {
        rebuilt.push_str(&existing.join(","));
        rebuilt.push(',');
    }
    rebuilt.push_str(&format!(">={}", version));
    if let Some(marker) = &spec.marker {
        rebuilt.push_str(&format!(";{}", marker));
    }
    Ok(Specifier::parse(&rebuilt)?.to_string())
}

/// Package name of an npm specifier (`name` or `name@version`)
pub fn js_package_name(spec: &str) -> &str {
    match spec.rfind('@') {
        // a leading `@` starts a scope, not a version
        Some(0) | None => spec,
        Some(idx) => &spec[..idx],
    }
}

/// Rewrite an npm specifier to `name@version`
pub fn rewrite_js(spec: &str, chosen: &VersionInfo) -> String {
    format!("{}@{}", js_package_name(spec), chosen.normalized_raw())
}
