//! Release note assembly: groups parsed commits into typed sections

use crate::config::{Config, SectionConfig};
use crate::domain::{Outcome, ParsedCommit, RawCommit, ReleaseVersion};
use crate::grammar::MessageProcessor;
use chrono::NaiveDate;
use tracing::{debug, instrument};

/// A single bullet in a release note section
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub subject: String,
    pub scope: Option<String>,
    pub short_hash: String,
    pub issue: Option<String>,
}

impl Entry {
    fn from_commit(commit: &ParsedCommit, raw: &RawCommit) -> Self {
        Entry {
            subject: commit.subject.clone(),
            scope: commit.scope.clone(),
            short_hash: raw.short_hash().to_string(),
            issue: commit.issue.clone(),
        }
    }
}

/// Entries of one commit type, titled from the configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub commit_type: String,
    pub title: String,
    pub entries: Vec<Entry>,
}

/// Everything needed to render the notes of one version or an unreleased window
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseNote {
    pub version: ReleaseVersion,
    pub date: Option<NaiveDate>,
    /// Non-empty sections in configured order
    pub sections: Vec<Section>,
    pub breaking_changes: Vec<String>,
}

impl ReleaseNote {
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty() && self.breaking_changes.is_empty()
    }

    pub fn section(&self, commit_type: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.commit_type == commit_type)
    }
}

/// Builds [`ReleaseNote`]s from raw repository commits
pub struct ReleaseNoteBuilder<'a> {
    sections: &'a [SectionConfig],
    processor: &'a MessageProcessor,
}

impl<'a> ReleaseNoteBuilder<'a> {
    pub fn new(config: &'a Config, processor: &'a MessageProcessor) -> Self {
        ReleaseNoteBuilder {
            sections: &config.release_notes.sections,
            processor,
        }
    }

    /// Assemble a note; commits outside the convention are left out.
    ///
    /// Entries keep the order of `commits` within each section.
    #[instrument(skip(self, commits), fields(version = ?version, commits = commits.len()))]
    pub fn create(
        &self,
        version: ReleaseVersion,
        date: Option<NaiveDate>,
        commits: &[RawCommit],
    ) -> ReleaseNote {
        let mut sections: Vec<Section> = self
            .sections
            .iter()
            .map(|s| Section {
                commit_type: s.commit_type.clone(),
                title: s.title.clone(),
                entries: Vec::new(),
            })
            .collect();
        let mut breaking_changes = Vec::new();

        for raw in commits {
            let commit = match self.processor.parse_commit(raw) {
                Outcome::Applied(commit) => commit,
                Outcome::Skipped(reason) => {
                    debug!("left out of release note: {}", reason);
                    continue;
                }
            };

            if let Some(message) = commit.breaking_message() {
                breaking_changes.push(message.to_string());
            }
            if let Some(section) = sections
                .iter_mut()
                .find(|s| s.commit_type == commit.commit_type)
            {
                section.entries.push(Entry::from_commit(&commit, raw));
            }
        }

        sections.retain(|s| !s.entries.is_empty());

        ReleaseNote {
            version,
            date,
            sections,
            breaking_changes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use semver::Version;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 2, day).unwrap()
    }

    fn build(commits: &[RawCommit]) -> ReleaseNote {
        let config = Config::default();
        let processor = MessageProcessor::new(&config).unwrap();
        ReleaseNoteBuilder::new(&config, &processor).create(
            ReleaseVersion::Released(Version::new(1, 1, 0)),
            Some(date(1)),
            commits,
        )
    }

    #[test]
    fn test_single_feature_section() {
        let note = build(&[RawCommit::new("abcdef0123", date(1), "feat: add X")]);
        assert_eq!(note.sections.len(), 1);
        let section = &note.sections[0];
        assert_eq!(section.title, "Features");
        assert_eq!(section.entries.len(), 1);
        assert_eq!(section.entries[0].subject, "add X");
        assert_eq!(section.entries[0].short_hash, "abcdef0");
        assert!(note.breaking_changes.is_empty());
    }

    #[test]
    fn test_sections_follow_configured_order() {
        let note = build(&[
            RawCommit::new("3", date(3), "perf: faster"),
            RawCommit::new("2", date(2), "fix: crash"),
            RawCommit::new("1", date(1), "feat: thing"),
        ]);
        let titles: Vec<&str> = note.sections.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["Features", "Bug Fixes", "Performance Improvements"]);
    }

    #[test]
    fn test_entries_keep_input_order() {
        let note = build(&[
            RawCommit::new("3", date(3), "fix: third"),
            RawCommit::new("2", date(2), "fix: second"),
            RawCommit::new("1", date(1), "fix: first"),
        ]);
        let subjects: Vec<&str> = note.sections[0]
            .entries
            .iter()
            .map(|e| e.subject.as_str())
            .collect();
        assert_eq!(subjects, vec!["third", "second", "first"]);
    }

    #[test]
    fn test_unparseable_commits_are_skipped() {
        let note = build(&[
            RawCommit::new("3", date(3), "Merge pull request #4"),
            RawCommit::new("2", date(2), "feature: unknown type"),
            RawCommit::new("1", date(1), "fix(api): handle null"),
        ]);
        assert_eq!(note.sections.len(), 1);
        assert_eq!(note.sections[0].entries[0].scope.as_deref(), Some("api"));
    }

    #[test]
    fn test_breaking_changes_collected_separately() {
        let note = build(&[
            RawCommit::new("2", date(2), "refactor!: drop legacy config"),
            RawCommit::new(
                "1",
                date(1),
                "feat: new auth\n\nBREAKING CHANGE: tokens must be rotated",
            ),
        ]);
        assert_eq!(
            note.breaking_changes,
            vec!["drop legacy config", "tokens must be rotated"]
        );
        // refactor has no section, but its breaking change is still listed
        assert!(note.section("refactor").is_none());
        assert_eq!(note.section("feat").map(|s| s.entries.len()), Some(1));
    }

    #[test]
    fn test_issue_carried_on_entry() {
        let note = build(&[RawCommit::new("1", date(1), "fix: login\n\nrefs: JIRA-12")]);
        assert_eq!(note.sections[0].entries[0].issue.as_deref(), Some("JIRA-12"));
    }

    #[test]
    fn test_empty_note() {
        let note = build(&[RawCommit::new("1", date(1), "docs: readme")]);
        assert!(note.is_empty());
    }
}
