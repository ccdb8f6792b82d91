//! Picking the winning version out of a candidate set
//!
//! Candidate sets are sorted newest first, so both selectors walk from the
//! front and stop at the first acceptable entry.

use crate::domain::Specifier;
use crate::update::VersionInfo;

/// Select the version a Python specifier should be bumped to.
///
/// A specifier pinned with `==` takes the newest candidate unconditionally.
/// Otherwise the newest candidate satisfying every existing constraint wins.
/// `None` means nothing better was found.
pub fn select_python<'a>(spec: &Specifier, candidates: &'a [VersionInfo]) -> Option<&'a VersionInfo> {
    let pinned = spec.has_equality();
    candidates
        .iter()
        .find(|candidate| pinned || spec.is_satisfied_by(&candidate.version))
}

/// Select the version an npm specifier should be bumped to: always the newest.
pub fn select_js(candidates: &[VersionInfo]) -> Option<&VersionInfo> {
    candidates.first()
}
