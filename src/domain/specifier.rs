//! Python dependency specifiers
//!
//! Handles requirement strings of the form:
//! - Bare name: `requests`
//! - Extras: `requests[socks, security]`
//! - Constraints: `requests>=2.28,<3`, `requests (>=2.28)`
//! - Markers: `requests>=2.28; python_version >= "3.8"`
//!
//! Validation is delegated to `pep508_rs`, which also yields the normalized
//! marker. The original text is kept verbatim so a rewrite only touches the
//! version being bumped; every constraint remembers the byte range of its
//! version text inside that original string.

use crate::error::SpecifierError;
use pep440_rs::{Version, VersionSpecifier};
use pep508_rs::{Pep508Error, Requirement, VersionOrUrl};
use regex::Regex;
use std::fmt;
use std::ops::Range;
use std::str::FromStr;
use std::sync::LazyLock;

// Locating, not validating: the requirement has been accepted by pep508_rs
// before these run
static NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*[A-Za-z0-9][A-Za-z0-9._-]*").unwrap());
static CONSTRAINT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(===|==|!=|<=|>=|~=|<|>)\s*([^\s,;()]+)\s*$").unwrap()
});

/// Comparison operator of a version constraint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    /// `===`
    ArbitraryEqual,
    /// `==`
    Equal,
    /// `!=`
    NotEqual,
    /// `~=` (compatible release)
    Compatible,
    /// `<=`
    LessThanEqual,
    /// `>=`
    GreaterThanEqual,
    /// `<`
    LessThan,
    /// `>`
    GreaterThan,
}

impl Operator {
    /// Parse an operator symbol
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        let op = match symbol {
            "===" => Operator::ArbitraryEqual,
            "==" => Operator::Equal,
            "!=" => Operator::NotEqual,
            "~=" => Operator::Compatible,
            "<=" => Operator::LessThanEqual,
            ">=" => Operator::GreaterThanEqual,
            "<" => Operator::LessThan,
            ">" => Operator::GreaterThan,
            _ => return None,
        };
        Some(op)
    }

    /// Returns the operator symbol
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::ArbitraryEqual => "===",
            Operator::Equal => "==",
            Operator::NotEqual => "!=",
            Operator::Compatible => "~=",
            Operator::LessThanEqual => "<=",
            Operator::GreaterThanEqual => ">=",
            Operator::LessThan => "<",
            Operator::GreaterThan => ">",
        }
    }

    /// Operators that admit pre-releases when their own version is one
    fn is_inclusive(&self) -> bool {
        matches!(
            self,
            Operator::ArbitraryEqual
                | Operator::Equal
                | Operator::Compatible
                | Operator::LessThanEqual
                | Operator::GreaterThanEqual
        )
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single `(operator, version)` pair of a specifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Constraint {
    /// The comparison operator
    pub operator: Operator,
    /// The version text exactly as written
    pub version: String,
    version_span: Range<usize>,
    specifier: VersionSpecifier,
}

impl Constraint {
    /// Byte range of the version text inside the original specifier
    pub fn version_span(&self) -> Range<usize> {
        self.version_span.clone()
    }

    /// Check whether a candidate version satisfies this constraint.
    ///
    /// Pre-release candidates only match when the constraint itself names a
    /// pre-release with an inclusive operator.
    pub fn is_satisfied_by(&self, candidate: &Version) -> bool {
        if candidate.any_prerelease() && !self.admits_prereleases() {
            return false;
        }
        self.specifier.contains(candidate)
    }

    fn admits_prereleases(&self) -> bool {
        self.operator.is_inclusive() && self.specifier.version().any_prerelease()
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.operator, self.version)
    }
}

/// A parsed Python dependency specifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Specifier {
    raw: String,
    /// Package name as written
    pub name: String,
    /// Requested extras, in source order
    pub extras: Vec<String>,
    /// Version constraints, in source order
    pub constraints: Vec<Constraint>,
    /// Normalized environment marker, without the `;`
    pub marker: Option<String>,
}

impl Specifier {
    /// Parse a specifier string
    pub fn parse(raw: &str) -> Result<Self, SpecifierError> {
        let requirement: Requirement = raw
            .parse()
            .map_err(|e: Pep508Error| SpecifierError::invalid(raw, e.message.to_string()))?;

        let expected = match &requirement.version_or_url {
            None => 0,
            Some(VersionOrUrl::VersionSpecifier(specifiers)) => specifiers.iter().count(),
            Some(VersionOrUrl::Url(_)) => {
                return Err(SpecifierError::invalid(
                    raw,
                    "URL requirements are not supported",
                ))
            }
        };
        let marker = requirement.marker.contents().map(|m| m.to_string());

        let name = NAME_RE
            .find(raw)
            .ok_or_else(|| SpecifierError::invalid(raw, "missing package name"))?;
        let mut pos = skip_whitespace(raw, name.end());
        let name = name.as_str().trim_start().to_string();

        let mut extras = Vec::new();
        if raw[pos..].starts_with('[') {
            let close = raw[pos..]
                .find(']')
                .map(|idx| pos + idx)
                .ok_or_else(|| SpecifierError::invalid(raw, "unclosed extras"))?;
            extras = raw[pos + 1..close]
                .split(',')
                .map(str::trim)
                .filter(|extra| !extra.is_empty())
                .map(String::from)
                .collect();
            pos = close + 1;
        }

        let section_end = match raw[pos..].find(';') {
            Some(idx) => {
                if raw[pos + idx + 1..].trim().is_empty() {
                    return Err(SpecifierError::invalid(raw, "empty environment marker"));
                }
                pos + idx
            }
            None => raw.len(),
        };
        let mut start = skip_whitespace(raw, pos);
        let mut end = start + raw[start..section_end].trim_end().len();
        if raw[start..end].starts_with('(') && raw[start..end].ends_with(')') {
            start += 1;
            end -= 1;
        }

        let constraints = parse_constraints(raw, start..end)?;
        if constraints.len() != expected {
            return Err(SpecifierError::invalid(
                raw,
                "could not locate every version constraint",
            ));
        }

        Ok(Self {
            raw: raw.to_string(),
            name,
            extras,
            constraints,
            marker,
        })
    }

    /// The specifier exactly as it was written
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Returns true if any constraint pins with `==`
    pub fn has_equality(&self) -> bool {
        self.constraints
            .iter()
            .any(|c| c.operator == Operator::Equal)
    }

    /// Find the first constraint using the given operator
    pub fn find_constraint(&self, operator: Operator) -> Option<&Constraint> {
        self.constraints.iter().find(|c| c.operator == operator)
    }

    /// Check whether a version satisfies every constraint
    pub fn is_satisfied_by(&self, version: &Version) -> bool {
        self.constraints.iter().all(|c| c.is_satisfied_by(version))
    }

    /// Replace the version text of one constraint inside the original string.
    ///
    /// Everything outside the constraint's version (whitespace, extras
    /// spelling, marker text) is kept byte-for-byte.
    pub fn with_constraint_version(&self, constraint: &Constraint, new_version: &str) -> String {
        let span = constraint.version_span();
        let mut result = String::with_capacity(self.raw.len() + new_version.len());
        result.push_str(&self.raw[..span.start]);
        result.push_str(new_version);
        result.push_str(&self.raw[span.end..]);
        result
    }
}

impl FromStr for Specifier {
    type Err = SpecifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Specifier::parse(s)
    }
}

/// Canonical rendering: sorted extras, comma-joined constraints, `; marker`
impl fmt::Display for Specifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if !self.extras.is_empty() {
            let mut extras: Vec<&str> = self.extras.iter().map(String::as_str).collect();
            extras.sort_unstable();
            write!(f, "[{}]", extras.join(","))?;
        }
        let constraints: Vec<String> = self.constraints.iter().map(|c| c.to_string()).collect();
        write!(f, "{}", constraints.join(","))?;
        if let Some(marker) = &self.marker {
            write!(f, "; {}", marker)?;
        }
        Ok(())
    }
}

fn skip_whitespace(text: &str, pos: usize) -> usize {
    let rest = &text[pos..];
    pos + (rest.len() - rest.trim_start().len())
}

fn parse_constraints(raw: &str, section: Range<usize>) -> Result<Vec<Constraint>, SpecifierError> {
    let text = &raw[section.clone()];
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }

    let mut constraints = Vec::new();
    let mut offset = section.start;
    for piece in text.split(',') {
        let caps = CONSTRAINT_RE.captures(piece).ok_or_else(|| {
            SpecifierError::invalid_constraint(
                raw,
                piece.trim(),
                "expected an operator followed by a version",
            )
        })?;
        let (Some(op), Some(version)) = (caps.get(1), caps.get(2)) else {
            return Err(SpecifierError::invalid_constraint(
                raw,
                piece.trim(),
                "expected an operator followed by a version",
            ));
        };
        let operator = Operator::from_symbol(op.as_str()).ok_or_else(|| {
            SpecifierError::invalid_constraint(raw, piece.trim(), "unknown operator")
        })?;
        let specifier = VersionSpecifier::from_str(&format!("{}{}", op.as_str(), version.as_str()))
            .map_err(|e| SpecifierError::invalid_constraint(raw, piece.trim(), e.to_string()))?;

        constraints.push(Constraint {
            operator,
            version: version.as_str().to_string(),
            version_span: offset + version.start()..offset + version.end(),
            specifier,
        });
        offset += piece.len() + 1;
    }
    Ok(constraints)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn v(s: &str) -> Version {
        Version::from_str(s).unwrap()
    }

    #[test]
    fn test_parse_bare_name() {
        let spec = Specifier::parse("requests").unwrap();
        assert_eq!(spec.name, "requests");
        assert!(spec.extras.is_empty());
        assert!(spec.constraints.is_empty());
        assert!(spec.marker.is_none());
        assert_eq!(spec.raw(), "requests");
    }

    #[test]
    fn test_parse_full_specifier() {
        let spec =
            Specifier::parse("requests[socks, security]>=2.28,<3; sys_platform == \"linux\"")
                .unwrap();
        assert_eq!(spec.name, "requests");
        assert_eq!(spec.extras, vec!["socks", "security"]);
        assert_eq!(spec.constraints.len(), 2);
        assert_eq!(spec.constraints[0].operator, Operator::GreaterThanEqual);
        assert_eq!(spec.constraints[0].version, "2.28");
        assert_eq!(spec.constraints[1].operator, Operator::LessThan);
        assert_eq!(spec.constraints[1].version, "3");
        assert_eq!(spec.marker.as_deref(), Some("sys_platform == 'linux'"));
    }

    #[test]
    fn test_parse_parenthesized_constraints() {
        let spec = Specifier::parse("pkg (>=1.0, !=1.5)").unwrap();
        assert_eq!(spec.constraints.len(), 2);
        assert_eq!(spec.constraints[1].operator, Operator::NotEqual);
        assert_eq!(spec.constraints[1].version, "1.5");
    }

    #[test]
    fn test_version_span_points_into_raw() {
        let raw = "pkg [x] >= 1.2 , < 2";
        let spec = Specifier::parse(raw).unwrap();
        let first = &spec.constraints[0];
        assert_eq!(&raw[first.version_span()], "1.2");
        let second = &spec.constraints[1];
        assert_eq!(&raw[second.version_span()], "2");
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("pkg[")]
    #[case("pkg[bad extra]")]
    #[case("pkg>=")]
    #[case("pkg>=1.0,")]
    #[case("pkg 1.0")]
    #[case("pkg>=not-a-version")]
    #[case("pkg;")]
    #[case("pkg (>=1.0")]
    #[case("pkg @ https://example.com/pkg.whl")]
    #[case("pkg>=1.0; this is not a marker")]
    #[case("pkg; os_name ==")]
    #[case("pkg>=1.0; python_version >= \"3.8\" and")]
    fn test_parse_rejects_malformed(#[case] raw: &str) {
        assert!(Specifier::parse(raw).is_err(), "{raw:?} should not parse");
    }

    #[test]
    fn test_marker_is_normalized() {
        let spec = Specifier::parse("pkg>=1.0;os_name==\"nt\"").unwrap();
        assert_eq!(spec.marker.as_deref(), Some("os_name == 'nt'"));
        assert_eq!(spec.to_string(), "pkg>=1.0; os_name == 'nt'");

        let err = Specifier::parse("pkg>=1.0; this is not a marker").unwrap_err();
        assert!(matches!(err, SpecifierError::Invalid { .. }));
    }

    #[test]
    fn test_name_keeps_its_spelling() {
        let spec = Specifier::parse("Typing_Extensions>=4").unwrap();
        assert_eq!(spec.name, "Typing_Extensions");
    }

    #[test]
    fn test_operator_symbols() {
        for symbol in ["===", "==", "!=", "~=", "<=", ">=", "<", ">"] {
            let op = Operator::from_symbol(symbol).unwrap();
            assert_eq!(op.as_str(), symbol);
        }
        assert!(Operator::from_symbol("=>").is_none());
    }

    #[test]
    fn test_has_equality() {
        assert!(Specifier::parse("pkg==1.0").unwrap().has_equality());
        assert!(!Specifier::parse("pkg>=1.0").unwrap().has_equality());
        assert!(!Specifier::parse("pkg===1.0").unwrap().has_equality());
    }

    #[rstest]
    #[case("pkg>=1.0,<2.0", "1.5", true)]
    #[case("pkg>=1.0,<2.0", "2.1", false)]
    #[case("pkg>=1.0,<2.0", "0.9", false)]
    #[case("pkg!=1.5", "1.5", false)]
    #[case("pkg~=1.4", "1.9", true)]
    #[case("pkg~=1.4", "2.0", false)]
    #[case("pkg==1.*", "1.7", true)]
    #[case("pkg>1", "1.0.1", true)]
    #[case("pkg<=2", "2.0.0", true)]
    #[case("pkg", "0.1", true)]
    fn test_is_satisfied_by(#[case] raw: &str, #[case] version: &str, #[case] expected: bool) {
        let spec = Specifier::parse(raw).unwrap();
        assert_eq!(spec.is_satisfied_by(&v(version)), expected);
    }

    #[test]
    fn test_prerelease_needs_prerelease_constraint() {
        let spec = Specifier::parse("pkg>=1.0").unwrap();
        assert!(!spec.is_satisfied_by(&v("2.0a1")));

        let spec = Specifier::parse("pkg>=2.0a1").unwrap();
        assert!(spec.is_satisfied_by(&v("2.0b1")));

        // no constraints at all admits anything
        let spec = Specifier::parse("pkg").unwrap();
        assert!(spec.is_satisfied_by(&v("2.0rc1")));
    }

    #[test]
    fn test_with_constraint_version_preserves_text() {
        let raw = "Pkg[b,a] >= 1.0 ; sys_platform == 'linux'";
        let spec = Specifier::parse(raw).unwrap();
        let ge = spec.find_constraint(Operator::GreaterThanEqual).unwrap();
        assert_eq!(
            spec.with_constraint_version(ge, "2.4"),
            "Pkg[b,a] >= 2.4 ; sys_platform == 'linux'"
        );
    }

    #[test]
    fn test_display_is_canonical() {
        let spec = Specifier::parse("pkg[b, a] >= 1.0 , <2 ;  os_name == 'nt'").unwrap();
        assert_eq!(spec.to_string(), "pkg[a,b]>=1.0,<2; os_name == 'nt'");
    }

    #[test]
    fn test_from_str() {
        let spec: Specifier = "black==22.6.0".parse().unwrap();
        assert_eq!(spec.name, "black");
        assert!(spec.find_constraint(Operator::Equal).is_some());
    }
}
