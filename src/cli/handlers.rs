//! Command handlers.
//!
//! Each handler reads what it needs from the repository, runs it through the
//! grammar, analyzer, assembler and renderer, and returns the text to print.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use anyhow::{bail, Context, Result};
use chrono::{Local, NaiveDate};
use semver::Version;
use serde::Serialize;
use tracing::{info, warn};

use super::{ChangelogArgs, Command, CommitLogArgs, ConfigCommand, RangeArgs, ValidateArgs};
use crate::analyzer::VersionAnalyzer;
use crate::config::Config;
use crate::domain::{LogRange, Outcome, ParsedCommit, RawCommit, ReleaseVersion, Tag, TagPattern};
use crate::error::GitSemverError;
use crate::formatter::OutputFormatter;
use crate::git::Repository;
use crate::grammar::MessageProcessor;
use crate::release_notes::{ReleaseNote, ReleaseNoteBuilder};
use crate::ui;

/// Default configuration as TOML
pub fn config_default() -> Result<String> {
    Ok(Config::default().to_toml()?)
}

/// Effective configuration as TOML
pub fn config_show(config: &Config) -> Result<String> {
    Ok(config.to_toml()?)
}

/// One line of `commit-log` output
#[derive(Debug, Serialize)]
struct CommitLogRecord<'a> {
    date: NaiveDate,
    hash: &'a str,
    message: ParsedCommit,
}

/// Next version computed from the commits since the last tag
struct NextVersion {
    last_tag: Option<String>,
    version: Version,
    changed: bool,
    commits: Vec<RawCommit>,
}

fn major_minor_patch(version: &Version) -> String {
    format!("{}.{}.{}", version.major, version.minor, version.patch)
}

/// All commands, bound to one configuration and repository
pub struct Workflow<R: Repository> {
    config: Config,
    repo: R,
    tag_pattern: TagPattern,
    processor: MessageProcessor,
    analyzer: VersionAnalyzer,
    formatter: OutputFormatter,
    today: NaiveDate,
}

impl<R: Repository> Workflow<R> {
    pub fn new(config: Config, repo: R) -> crate::error::Result<Self> {
        Ok(Workflow {
            tag_pattern: TagPattern::new(config.tag.pattern.as_str())?,
            processor: MessageProcessor::new(&config)?,
            analyzer: VersionAnalyzer::new(config.versioning.clone()),
            formatter: OutputFormatter::new(&config)?,
            today: Local::now().date_naive(),
            config,
            repo,
        })
    }

    /// Use a fixed date for release notes of the next version
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// Run a command; `Some` holds the text for stdout
    pub fn execute(&self, command: &Command) -> Result<Option<String>> {
        let output = match command {
            Command::Config(ConfigCommand::Default) => Some(config_default()?),
            Command::Config(ConfigCommand::Show) => Some(config_show(&self.config)?),
            Command::CurrentVersion => Some(self.current_version()?),
            Command::NextVersion => Some(self.next_version()?),
            Command::CommitLog(args) => Some(self.commit_log(args)?),
            Command::CommitNotes(args) => Some(self.commit_notes(args)?),
            Command::ReleaseNotes { tag } => Some(self.release_notes(tag.as_deref())?),
            Command::Changelog(args) => Some(self.changelog(args)?),
            Command::Tag => Some(self.tag()?),
            Command::Commit => {
                self.commit_interactive()?;
                None
            }
            Command::ValidateCommitMessage(args) => {
                self.validate_commit_message(args)?;
                None
            }
        };
        Ok(output)
    }

    fn last_tag(&self) -> Result<Option<String>> {
        self.repo
            .last_tag(&self.tag_pattern)
            .context("Failed to look up the last tag")
    }

    /// Version of the last tag, 0.0.0 without one
    fn current(&self) -> Result<(Option<String>, Version)> {
        let last_tag = self.last_tag()?;
        let version = match &last_tag {
            Some(tag) => self
                .tag_pattern
                .parse_version(tag)
                .with_context(|| format!("Failed to parse version from tag '{}'", tag))?,
            None => Version::new(0, 0, 0),
        };
        Ok((last_tag, version))
    }

    fn next(&self) -> Result<NextVersion> {
        let (last_tag, current) = self.current()?;
        let commits = self
            .repo
            .log(&LogRange::since_tag(last_tag.as_deref()))
            .context("Failed to read the commit log")?;
        let (version, changed) =
            self.analyzer
                .next_version_from_log(&self.processor, &current, &commits);
        info!(%current, next = %version, changed, "next version");
        Ok(NextVersion {
            last_tag,
            version,
            changed,
            commits,
        })
    }

    pub fn current_version(&self) -> Result<String> {
        let (_, version) = self.current()?;
        Ok(major_minor_patch(&version))
    }

    pub fn next_version(&self) -> Result<String> {
        Ok(major_minor_patch(&self.next()?.version))
    }

    /// Tag `name` and the tag before it in date order
    fn find_tag(&self, name: &str) -> Result<(Option<String>, Tag)> {
        let tags = self
            .repo
            .tags(&self.tag_pattern)
            .context("Failed to list tags")?;
        let index = tags
            .iter()
            .position(|t| t.name == name)
            .ok_or_else(|| GitSemverError::not_found(format!("tag '{}'", name)))?;
        let previous = index.checked_sub(1).map(|i| tags[i].name.clone());
        Ok((previous, tags[index].clone()))
    }

    fn range(&self, args: &RangeArgs) -> Result<LogRange> {
        let last_tag = self.last_tag()?;
        Ok(LogRange::resolve(
            args.range,
            args.start.as_deref(),
            args.end.as_deref(),
            last_tag.as_deref(),
        )?)
    }

    pub fn commit_log(&self, args: &CommitLogArgs) -> Result<String> {
        let range = match &args.tag {
            Some(tag) => {
                let range = &args.range;
                if range.range != Default::default() || range.start.is_some() || range.end.is_some()
                {
                    return Err(GitSemverError::range(
                        "--tag cannot be combined with --range, --start or --end",
                    )
                    .into());
                }
                let (previous, tag) = self.find_tag(tag)?;
                LogRange::between_tags(previous.as_deref(), &tag.name)
            }
            None => self.range(&args.range)?,
        };

        let commits = self.repo.log(&range).context("Failed to read the commit log")?;
        let mut lines = Vec::with_capacity(commits.len());
        for commit in &commits {
            match self.processor.parse_commit(commit) {
                Outcome::Applied(message) => {
                    let record = CommitLogRecord {
                        date: commit.date,
                        hash: &commit.hash,
                        message,
                    };
                    lines.push(serde_json::to_string(&record)?);
                }
                Outcome::Skipped(reason) => warn!("left out of commit log: {}", reason),
            }
        }
        Ok(lines.join("\n"))
    }

    pub fn commit_notes(&self, args: &RangeArgs) -> Result<String> {
        let range = self.range(args)?;
        let commits = self
            .repo
            .log(&range)
            .with_context(|| format!("Failed to read the commit log for {} range", args.range))?;
        let date = commits.first().map(|c| c.date);

        let note = self.builder().create(ReleaseVersion::Unreleased, date, &commits);
        Ok(self.formatter.format_release_note(&note))
    }

    pub fn release_notes(&self, tag: Option<&str>) -> Result<String> {
        let note = match tag {
            Some(name) => {
                let version = self
                    .tag_pattern
                    .parse_version(name)
                    .with_context(|| format!("Failed to parse version from tag '{}'", name))?;
                let (previous, tag) = self.find_tag(name)?;
                let commits = self
                    .repo
                    .log(&LogRange::between_tags(previous.as_deref(), &tag.name))
                    .with_context(|| format!("Failed to read the commit log of tag '{}'", name))?;
                self.builder().create(
                    ReleaseVersion::Released(version),
                    Some(tag.date.date_naive()),
                    &commits,
                )
            }
            None => {
                let next = self.next()?;
                self.builder().create(
                    ReleaseVersion::Released(next.version),
                    Some(self.today),
                    &next.commits,
                )
            }
        };
        Ok(self.formatter.format_release_note(&note))
    }

    pub fn changelog(&self, args: &ChangelogArgs) -> Result<String> {
        let mut tags = self
            .repo
            .tags(&self.tag_pattern)
            .context("Failed to list tags")?;
        tags.reverse();

        let mut notes: Vec<ReleaseNote> = Vec::new();
        if args.add_next_version {
            let next = self.next()?;
            if next.changed {
                notes.push(self.builder().create(
                    ReleaseVersion::Released(next.version),
                    Some(self.today),
                    &next.commits,
                ));
            }
        }

        let limit = if args.all { tags.len() } else { args.size };
        for (i, tag) in tags.iter().enumerate().take(limit) {
            let previous = tags.get(i + 1).map(|t| t.name.as_str());
            let commits = self
                .repo
                .log(&LogRange::between_tags(previous, &tag.name))
                .with_context(|| format!("Failed to read the commit log of tag '{}'", tag.name))?;
            let version = self
                .tag_pattern
                .parse_version(&tag.name)
                .with_context(|| format!("Failed to parse version from tag '{}'", tag.name))?;
            notes.push(self.builder().create(
                ReleaseVersion::Released(version),
                Some(tag.date.date_naive()),
                &commits,
            ));
        }

        Ok(self.formatter.format_changelog(&notes))
    }

    /// Create the next version tag; returns the version
    pub fn tag(&self) -> Result<String> {
        let next = self.next()?;
        if !next.changed {
            bail!(
                "No commit since {} requires a new version",
                next.last_tag.as_deref().unwrap_or("the start of history")
            );
        }

        let name = self.tag_pattern.format(&next.version);
        ui::display_proposed_tag(next.last_tag.as_deref(), &name);

        let message = format!("Version {}", next.version);
        self.repo
            .create_tag(&name, &message)
            .with_context(|| format!("Failed to create tag '{}'", name))?;
        ui::display_success(&format!("Created tag: {}", name));
        Ok(major_minor_patch(&next.version))
    }

    /// Format `commit`, check it against the grammar and commit it
    pub fn commit(&self, commit: &ParsedCommit) -> Result<String> {
        let message = self.processor.format(commit);
        let text = message.to_string();
        self.processor
            .validate(&text)
            .context("Composed commit message is invalid")?;
        self.repo
            .commit(&message)
            .context("Failed to create the commit")?;
        Ok(message.header)
    }

    fn commit_interactive(&self) -> Result<()> {
        let branch = self.repo.branch().context("Failed to read the current branch")?;
        let default_issue = match self.processor.issue_id(&branch) {
            Ok(issue) => issue,
            Err(e) => {
                warn!("{}", e);
                None
            }
        };

        let commit =
            ui::prompt_commit_interactive(&self.config.commit_message.types, default_issue.as_deref())?;
        ui::display_commit_preview(&self.processor.format(&commit).to_string());
        if !ui::confirm_action("Create this commit?")? {
            ui::display_status("Commit cancelled by user.");
            return Ok(());
        }

        let header = self.commit(&commit)?;
        ui::display_success(&format!("Committed: {}", header));
        Ok(())
    }

    pub fn validate_commit_message(&self, args: &ValidateArgs) -> Result<()> {
        let branch = self.repo.branch().context("Failed to read the current branch")?;
        let detached = match self.repo.is_detached() {
            Ok(detached) => detached,
            Err(e) => {
                warn!("could not inspect HEAD: {}", e);
                false
            }
        };

        if self.processor.skip_branch(&branch, detached) {
            ui::display_warning(
                "commit message validation skipped, branch in ignore list or detached",
            );
            return Ok(());
        }
        if let Some(source) = args.source.as_deref().filter(|s| *s == "merge") {
            ui::display_warning(&format!(
                "commit message validation skipped, ignoring source: {}",
                source
            ));
            return Ok(());
        }

        let path = Path::new(&args.path).join(&args.file);
        let message = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read commit message from {}", path.display()))?;

        self.processor
            .validate(&message)
            .context("Invalid commit message")?;

        match self.processor.enhance(&branch, &message) {
            Outcome::Applied(footer) => {
                let mut file = OpenOptions::new()
                    .append(true)
                    .open(&path)
                    .with_context(|| format!("Failed to open {}", path.display()))?;
                file.write_all(footer.as_bytes())
                    .context("Failed to append the issue footer")?;
                info!(path = %path.display(), "issue footer appended");
            }
            Outcome::Skipped(reason) => {
                warn!("commit message not enhanced: {}", reason);
                ui::display_warning(&format!("could not enhance commit message, {}", reason));
            }
        }
        Ok(())
    }

    fn builder(&self) -> ReleaseNoteBuilder<'_> {
        ReleaseNoteBuilder::new(&self.config, &self.processor)
    }
}
