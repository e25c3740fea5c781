use crate::error::{GitSemverError, Result};
use semver::Version;
use std::fmt;

/// Magnitude of version change a commit implies.
///
/// Ordered so that the aggregate of a set of commits is simply the maximum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Severity {
    #[default]
    None,
    Patch,
    Minor,
    Major,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Severity::None => "none",
            Severity::Patch => "patch",
            Severity::Minor => "minor",
            Severity::Major => "major",
        };
        f.write_str(name)
    }
}

/// Apply a severity to a version.
///
/// Pre-release and build metadata are dropped whenever the version changes.
pub fn bump(version: &Version, severity: Severity) -> Version {
    match severity {
        Severity::None => version.clone(),
        Severity::Major => Version::new(version.major + 1, 0, 0),
        Severity::Minor => Version::new(version.major, version.minor + 1, 0),
        Severity::Patch => Version::new(version.major, version.minor, version.patch + 1),
    }
}

/// Parse a version string, tolerating a leading `v` or `V`
pub fn parse_version(text: &str) -> Result<Version> {
    let clean = text.trim().trim_start_matches(['v', 'V']);
    Version::parse(clean)
        .map_err(|e| GitSemverError::version(format!("'{}' is not a semantic version: {}", text, e)))
}

/// The version a release note belongs to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReleaseVersion {
    Released(Version),
    Unreleased,
}

impl ReleaseVersion {
    pub fn version(&self) -> Option<&Version> {
        match self {
            ReleaseVersion::Released(v) => Some(v),
            ReleaseVersion::Unreleased => None,
        }
    }
}

impl From<Version> for ReleaseVersion {
    fn from(version: Version) -> Self {
        ReleaseVersion::Released(version)
    }
}
