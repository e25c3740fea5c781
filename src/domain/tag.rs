use crate::domain::version::parse_version;
use crate::error::{GitSemverError, Result};
use chrono::{DateTime, Utc};
use regex::Regex;
use semver::Version;

const VERSION_PLACEHOLDER: &str = "{version}";

/// A git tag and the moment it was created
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub name: String,
    pub date: DateTime<Utc>,
}

impl Tag {
    pub fn new(name: impl Into<String>, date: DateTime<Utc>) -> Self {
        Tag {
            name: name.into(),
            date,
        }
    }
}

/// Sort tags oldest first; ties keep name order so the result is stable
pub fn sort_by_date(tags: &mut [Tag]) {
    tags.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.name.cmp(&b.name)));
}

/// Tag naming pattern (e.g., "v{version}", "release-{version}")
#[derive(Debug, Clone)]
pub struct TagPattern {
    pattern: String,
    regex: Regex,
}

impl TagPattern {
    /// Compile a tag pattern; it must contain the `{version}` placeholder
    pub fn new(pattern: impl Into<String>) -> Result<Self> {
        let pattern = pattern.into();
        if !pattern.contains(VERSION_PLACEHOLDER) {
            return Err(GitSemverError::config(format!(
                "Tag pattern '{}' must contain {} placeholder",
                pattern, VERSION_PLACEHOLDER
            )));
        }

        let escaped = regex::escape(&pattern);
        let regex_pattern = escaped.replace(
            &regex::escape(VERSION_PLACEHOLDER),
            r"(?P<version>\d+\.\d+\.\d+(?:-[0-9A-Za-z.-]+)?(?:\+[0-9A-Za-z.-]+)?)",
        );
        let regex = Regex::new(&format!("^{}$", regex_pattern))
            .map_err(|e| GitSemverError::config(format!("Invalid tag pattern '{}': {}", pattern, e)))?;

        Ok(TagPattern { pattern, regex })
    }

    pub fn as_str(&self) -> &str {
        &self.pattern
    }

    /// Format a version according to pattern
    /// Example: pattern="v{version}", version=1.2.3 -> "v1.2.3"
    pub fn format(&self, version: &Version) -> String {
        self.pattern
            .replace(VERSION_PLACEHOLDER, &version.to_string())
    }

    /// Check if a tag name follows this pattern
    pub fn matches(&self, tag: &str) -> bool {
        self.regex.is_match(tag)
    }

    /// Extract the version from a tag name following this pattern
    pub fn parse_version(&self, tag: &str) -> Result<Version> {
        let captures = self.regex.captures(tag).ok_or_else(|| {
            GitSemverError::version(format!(
                "Tag '{}' does not match pattern '{}'",
                tag, self.pattern
            ))
        })?;
        let version = captures
            .name("version")
            .map(|m| m.as_str())
            .unwrap_or_default();
        parse_version(version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_pattern_format() {
        let pattern = TagPattern::new("v{version}").unwrap();
        assert_eq!(pattern.format(&Version::new(1, 2, 3)), "v1.2.3");
    }

    #[test]
    fn test_pattern_format_with_suffix() {
        let pattern = TagPattern::new("release-{version}").unwrap();
        assert_eq!(pattern.format(&Version::new(1, 2, 3)), "release-1.2.3");
    }

    #[test]
    fn test_pattern_matches() {
        let pattern = TagPattern::new("v{version}").unwrap();
        assert!(pattern.matches("v1.2.3"));
        assert!(pattern.matches("v1.2.3-rc.1"));
        assert!(!pattern.matches("release-1.2.3"));
        assert!(!pattern.matches("v1.2"));
    }

    #[test]
    fn test_pattern_parse_version() {
        let pattern = TagPattern::new("release-{version}").unwrap();
        assert_eq!(
            pattern.parse_version("release-2.0.1").unwrap(),
            Version::new(2, 0, 1)
        );
        assert!(pattern.parse_version("v2.0.1").is_err());
    }

    #[test]
    fn test_pattern_requires_placeholder() {
        assert!(TagPattern::new("v1").is_err());
    }

    #[test]
    fn test_sort_by_date() {
        let mut tags = vec![
            Tag::new("v1.1.0", Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap()),
            Tag::new("v1.0.0", Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()),
        ];
        sort_by_date(&mut tags);
        assert_eq!(tags[0].name, "v1.0.0");
        assert_eq!(tags[1].name, "v1.1.0");
    }
}
