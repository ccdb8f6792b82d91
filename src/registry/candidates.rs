//! Turning raw registry tokens into a candidate set

use crate::update::VersionInfo;
use pep440_rs::Version;
use std::collections::BTreeMap;
use tracing::debug;

/// Build the candidate set from raw version tokens.
///
/// Tokens that do not parse are skipped. Entries equal by version value,
/// local segments aside, collapse to the first one seen, pre-releases are dropped unless
/// `allow_prerelease` is set, and the result is sorted newest first.
pub fn candidate_set<I, S>(tokens: I, allow_prerelease: bool) -> Vec<VersionInfo>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut distinct: BTreeMap<Version, VersionInfo> = BTreeMap::new();

    for token in tokens {
        let token = token.as_ref();
        match VersionInfo::parse(token) {
            Ok(info) => {
                if !allow_prerelease && info.is_prerelease() {
                    continue;
                }
                distinct.entry(info.public_version().clone()).or_insert(info);
            }
            Err(e) => debug!("Skipping token: {}", e),
        }
    }

    distinct.into_values().rev().collect()
}
