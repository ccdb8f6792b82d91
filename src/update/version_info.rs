//! Version values discovered on a registry
//!
//! Versions are parsed and ordered following PEP 440: release segments are
//! compared numerically and pre-releases sort below the final release. Local
//! segments (`+build`) are ignored when two versions are compared.

use pep440_rs::Version;
use std::cmp::Ordering;
use std::str::FromStr;
use thiserror::Error;

/// A token that does not look like a version
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid version '{token}': {message}")]
pub struct VersionParseError {
    /// The rejected token
    pub token: String,
    /// Why the parser rejected it
    pub message: String,
}

/// Parse a raw version token
pub fn parse_version(token: &str) -> Result<Version, VersionParseError> {
    Version::from_str(token.trim()).map_err(|e| VersionParseError {
        token: token.to_string(),
        message: e.to_string(),
    })
}

/// Returns true for alpha, beta, release candidate and dev versions
pub fn is_prerelease(version: &Version) -> bool {
    version.any_prerelease()
}

/// Normalize a version for display in a specifier.
///
/// Drops the local/build segment, then strips trailing `.0` release
/// components: `2.4.0` becomes `2.4`, `2.0.0` becomes `2`.
pub fn normalize_version(version: &str) -> String {
    let mut ver = version.split('+').next().unwrap_or(version);
    while let Some(stripped) = ver.strip_suffix(".0") {
        if stripped.is_empty() {
            break;
        }
        ver = stripped;
    }
    ver.to_string()
}

/// A version from a registry listing together with its raw token
#[derive(Debug, Clone)]
pub struct VersionInfo {
    /// The parsed version
    pub version: Version,
    /// The token as the registry spelled it (e.g. "1.0.0-beta.1")
    pub raw: String,
    // `version` without its local segment; equality and ordering use this
    public: Version,
}

impl VersionInfo {
    /// Parse a registry token into a VersionInfo
    pub fn parse(token: &str) -> Result<Self, VersionParseError> {
        let raw = token.trim();
        let version = parse_version(raw)?;
        let public = match raw.split_once('+') {
            Some((public, _)) => parse_version(public)?,
            None => version.clone(),
        };
        Ok(Self {
            version,
            raw: raw.to_string(),
            public,
        })
    }

    /// The version without its local segment
    pub fn public_version(&self) -> &Version {
        &self.public
    }

    /// Returns true if this is a pre-release
    pub fn is_prerelease(&self) -> bool {
        is_prerelease(&self.version)
    }

    /// Normalized PEP 440 spelling, used for Python specifiers
    pub fn normalized(&self) -> String {
        normalize_version(&self.version.to_string())
    }

    /// Normalized registry spelling, used for npm specifiers
    pub fn normalized_raw(&self) -> String {
        normalize_version(&self.raw)
    }
}

impl PartialEq for VersionInfo {
    fn eq(&self, other: &Self) -> bool {
        self.public == other.public
    }
}

impl Eq for VersionInfo {}

impl Ord for VersionInfo {
    fn cmp(&self, other: &Self) -> Ordering {
        self.public.cmp(&other.public)
    }
}

impl PartialOrd for VersionInfo {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
