use crate::config::VersioningConfig;
use crate::domain::version::bump;
use crate::domain::{Outcome, ParsedCommit, RawCommit, Severity};
use crate::grammar::MessageProcessor;
use semver::Version;
use tracing::{debug, instrument};

/// Analyzes commits to determine the next version
pub struct VersionAnalyzer {
    config: VersioningConfig,
}

impl VersionAnalyzer {
    /// Create a new version analyzer
    pub fn new(config: VersioningConfig) -> Self {
        VersionAnalyzer { config }
    }

    /// Severity implied by a single commit; breaking changes always dominate
    pub fn severity(&self, commit: &ParsedCommit) -> Severity {
        if commit.is_breaking_change {
            return Severity::Major;
        }
        let listed = |types: &[String]| types.iter().any(|t| *t == commit.commit_type);
        if listed(&self.config.update_major) {
            Severity::Major
        } else if listed(&self.config.update_minor) {
            Severity::Minor
        } else if listed(&self.config.update_patch) {
            Severity::Patch
        } else {
            Severity::None
        }
    }

    /// Highest severity across the commits, independent of their order
    pub fn aggregate(&self, commits: &[ParsedCommit]) -> Severity {
        commits
            .iter()
            .map(|c| self.severity(c))
            .max()
            .unwrap_or_default()
    }

    /// Compute the version that follows `current` and whether it changed
    #[instrument(skip(self, commits), fields(current = %current, commits = commits.len()))]
    pub fn next_version(&self, current: &Version, commits: &[ParsedCommit]) -> (Version, bool) {
        let mut severity = self.aggregate(commits);
        if severity == Severity::Major && current.major == 0 && self.config.initial_development {
            severity = Severity::Minor;
        }

        let next = bump(current, severity);
        debug!(%severity, next = %next, "version computed");
        (next, severity != Severity::None)
    }

    /// Like [`next_version`](Self::next_version) for repository commits.
    ///
    /// Commits outside the commit convention are logged and carry no severity.
    pub fn next_version_from_log(
        &self,
        processor: &MessageProcessor,
        current: &Version,
        commits: &[RawCommit],
    ) -> (Version, bool) {
        let parsed: Vec<ParsedCommit> = commits
            .iter()
            .filter_map(|c| match processor.parse_commit(c) {
                Outcome::Applied(parsed) => Some(parsed),
                Outcome::Skipped(reason) => {
                    debug!("ignored for versioning: {}", reason);
                    None
                }
            })
            .collect();
        self.next_version(current, &parsed)
    }
}
