use crate::domain::tag::sort_by_date;
use crate::domain::{LogRange, RawCommit, Tag, TagPattern};
use crate::error::{GitSemverError, Result};
use crate::git::Repository;
use crate::grammar::FormattedMessage;
use chrono::{DateTime, NaiveDate, Utc};
use std::cell::RefCell;

/// Mock repository for testing without actual git operations.
///
/// History is linear: commits are added oldest first and tags point at the
/// most recently added commit.
pub struct MockRepository {
    commits: Vec<RawCommit>,
    tags: Vec<(Tag, usize)>,
    branch: String,
    detached: bool,
    created_commits: RefCell<Vec<String>>,
    created_tags: RefCell<Vec<(String, String)>>,
}

impl MockRepository {
    /// Create a new empty mock repository on `main`
    pub fn new() -> Self {
        MockRepository {
            commits: Vec::new(),
            tags: Vec::new(),
            branch: "main".to_string(),
            detached: false,
            created_commits: RefCell::new(Vec::new()),
            created_tags: RefCell::new(Vec::new()),
        }
    }

    /// Append a commit on top of the history
    pub fn add_commit(&mut self, hash: impl Into<String>, date: NaiveDate, message: &str) {
        self.commits.push(RawCommit::new(hash, date, message));
    }

    /// Tag the latest commit
    pub fn add_tag(&mut self, name: impl Into<String>, date: DateTime<Utc>) {
        let index = self.commits.len().saturating_sub(1);
        self.tags.push((Tag::new(name, date), index));
    }

    pub fn set_branch(&mut self, branch: impl Into<String>) {
        self.branch = branch.into();
    }

    pub fn set_detached(&mut self, detached: bool) {
        self.detached = detached;
    }

    /// Messages passed to [`Repository::commit`]
    pub fn created_commits(&self) -> Vec<String> {
        self.created_commits.borrow().clone()
    }

    /// `(name, message)` pairs passed to [`Repository::create_tag`]
    pub fn created_tags(&self) -> Vec<(String, String)> {
        self.created_tags.borrow().clone()
    }

    fn tag_position(&self, name: &str) -> Result<usize> {
        self.tags
            .iter()
            .find(|(tag, _)| tag.name == name)
            .map(|(_, index)| *index)
            .ok_or_else(|| GitSemverError::not_found(format!("revision '{}'", name)))
    }

    fn hash_position(&self, hash: &str) -> Result<usize> {
        self.commits
            .iter()
            .position(|c| c.hash.starts_with(hash))
            .ok_or_else(|| GitSemverError::not_found(format!("revision '{}'", hash)))
    }

    /// Commits in `(start, end]`, newest first
    fn slice(&self, start: Option<usize>, end: Option<usize>) -> Vec<RawCommit> {
        let from = start.map_or(0, |s| s + 1);
        let to = end.map_or(self.commits.len(), |e| e + 1);
        if from >= to {
            return Vec::new();
        }
        self.commits[from..to].iter().rev().cloned().collect()
    }
}

impl Default for MockRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl Repository for MockRepository {
    fn last_tag(&self, pattern: &TagPattern) -> Result<Option<String>> {
        Ok(self
            .tags
            .iter()
            .filter(|(tag, _)| pattern.matches(&tag.name))
            .max_by_key(|(tag, index)| (*index, pattern.parse_version(&tag.name).ok()))
            .map(|(tag, _)| tag.name.clone()))
    }

    fn tags(&self, pattern: &TagPattern) -> Result<Vec<Tag>> {
        let mut tags: Vec<Tag> = self
            .tags
            .iter()
            .filter(|(tag, _)| pattern.matches(&tag.name))
            .map(|(tag, _)| tag.clone())
            .collect();
        sort_by_date(&mut tags);
        Ok(tags)
    }

    fn log(&self, range: &LogRange) -> Result<Vec<RawCommit>> {
        match range {
            LogRange::Tag { start, end } => {
                let start = start.as_deref().map(|t| self.tag_position(t)).transpose()?;
                let end = end.as_deref().map(|t| self.tag_position(t)).transpose()?;
                Ok(self.slice(start, end))
            }
            LogRange::Hash { start, end } => {
                let start = start.as_deref().map(|h| self.hash_position(h)).transpose()?;
                let end = end.as_deref().map(|h| self.hash_position(h)).transpose()?;
                Ok(self.slice(start, end))
            }
            LogRange::Date { start, end } => Ok(self
                .slice(None, None)
                .into_iter()
                .filter(|c| {
                    start.map_or(true, |s| c.date >= s) && end.map_or(true, |e| c.date <= e)
                })
                .collect()),
        }
    }

    fn branch(&self) -> Result<String> {
        Ok(self.branch.clone())
    }

    fn is_detached(&self) -> Result<bool> {
        Ok(self.detached)
    }

    fn commit(&self, message: &FormattedMessage) -> Result<()> {
        self.created_commits.borrow_mut().push(message.to_string());
        Ok(())
    }

    fn create_tag(&self, name: &str, message: &str) -> Result<()> {
        let exists = self.tags.iter().any(|(tag, _)| tag.name == name)
            || self.created_tags.borrow().iter().any(|(n, _)| n == name);
        if exists {
            return Err(git2::Error::from_str(&format!("tag '{}' already exists", name)).into());
        }
        self.created_tags
            .borrow_mut()
            .push((name.to_string(), message.to_string()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn at(d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, d, 12, 0, 0).unwrap()
    }

    fn repo() -> MockRepository {
        let mut repo = MockRepository::new();
        repo.add_commit("aaa111", day(1), "feat: first");
        repo.add_tag("v1.0.0", at(1));
        repo.add_commit("bbb222", day(2), "fix: second");
        repo.add_commit("ccc333", day(3), "feat: third");
        repo.add_tag("v1.1.0", at(3));
        repo.add_commit("ddd444", day(4), "docs: fourth");
        repo
    }

    fn pattern() -> TagPattern {
        TagPattern::new("v{version}").unwrap()
    }

    fn hashes(commits: &[RawCommit]) -> Vec<&str> {
        commits.iter().map(|c| c.hash.as_str()).collect()
    }

    #[test]
    fn test_last_tag() {
        assert_eq!(repo().last_tag(&pattern()).unwrap().as_deref(), Some("v1.1.0"));
        assert_eq!(MockRepository::new().last_tag(&pattern()).unwrap(), None);
    }

    #[test]
    fn test_tags_sorted_by_date() {
        let names: Vec<String> = repo()
            .tags(&pattern())
            .unwrap()
            .into_iter()
            .map(|t| t.name)
            .collect();
        assert_eq!(names, vec!["v1.0.0", "v1.1.0"]);
    }

    #[test]
    fn test_log_since_tag_is_newest_first() {
        let log = repo().log(&LogRange::since_tag(Some("v1.0.0"))).unwrap();
        assert_eq!(hashes(&log), vec!["ddd444", "ccc333", "bbb222"]);
    }

    #[test]
    fn test_log_between_tags() {
        let log = repo()
            .log(&LogRange::between_tags(Some("v1.0.0"), "v1.1.0"))
            .unwrap();
        assert_eq!(hashes(&log), vec!["ccc333", "bbb222"]);

        let first = repo().log(&LogRange::between_tags(None, "v1.0.0")).unwrap();
        assert_eq!(hashes(&first), vec!["aaa111"]);
    }

    #[test]
    fn test_log_unknown_tag() {
        let result = repo().log(&LogRange::since_tag(Some("v9.9.9")));
        assert!(matches!(result, Err(GitSemverError::NotFound(_))));
    }

    #[test]
    fn test_log_by_date_and_hash() {
        let by_date = repo()
            .log(&LogRange::Date {
                start: Some(day(2)),
                end: Some(day(3)),
            })
            .unwrap();
        assert_eq!(hashes(&by_date), vec!["ccc333", "bbb222"]);

        let by_hash = repo()
            .log(&LogRange::Hash {
                start: Some("bbb".to_string()),
                end: None,
            })
            .unwrap();
        assert_eq!(hashes(&by_hash), vec!["ddd444", "ccc333"]);
    }

    #[test]
    fn test_create_tag_rejects_duplicates() {
        let repo = repo();
        repo.create_tag("v1.2.0", "Version 1.2.0").unwrap();
        assert!(repo.create_tag("v1.2.0", "again").is_err());
        assert!(repo.create_tag("v1.1.0", "existing").is_err());
        assert_eq!(
            repo.created_tags(),
            vec![("v1.2.0".to_string(), "Version 1.2.0".to_string())]
        );
    }

    #[test]
    fn test_commit_records_message() {
        let repo = MockRepository::default();
        let message = FormattedMessage {
            header: "feat: x".to_string(),
            body: String::new(),
            footer: "refs: JIRA-1".to_string(),
        };
        repo.commit(&message).unwrap();
        assert_eq!(repo.created_commits(), vec!["feat: x\n\nrefs: JIRA-1"]);
    }
}
