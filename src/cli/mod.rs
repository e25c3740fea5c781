//! Command-line surface.
//!
//! Argument definitions live here; [`handlers::Workflow`] runs them against a
//! [`Repository`](crate::git::Repository) so every command can be driven from tests.

pub mod handlers;

use clap::{Args, Parser, Subcommand};

use crate::domain::RangeKind;

pub use handlers::{config_default, config_show, Workflow};

#[derive(Debug, Parser)]
#[command(
    name = "git-semver",
    version,
    about = "Semantic versions and release notes from conventional commits"
)]
pub struct Cli {
    #[arg(short, long, global = true, help = "Custom configuration file path")]
    pub config: Option<String>,

    #[arg(short, long, global = true, help = "Enable debug logging")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the default or the effective configuration
    #[command(subcommand, visible_alias = "cfg")]
    Config(ConfigCommand),

    /// Version of the last tag reachable from HEAD
    #[command(visible_alias = "cv")]
    CurrentVersion,

    /// Version the next tag would get
    #[command(visible_alias = "nv")]
    NextVersion,

    /// Parsed commits as JSON lines
    #[command(visible_alias = "cl")]
    CommitLog(CommitLogArgs),

    /// Release notes for an arbitrary commit range
    #[command(visible_alias = "cn")]
    CommitNotes(RangeArgs),

    /// Release notes for the next version or an existing tag
    #[command(visible_alias = "rn")]
    ReleaseNotes {
        #[arg(short, long, help = "Existing tag to describe")]
        tag: Option<String>,
    },

    /// Release notes of the most recent tags, newest first
    #[command(visible_alias = "cgl")]
    Changelog(ChangelogArgs),

    /// Create the next version tag on HEAD
    #[command(visible_alias = "tg")]
    Tag,

    /// Compose a commit message interactively and commit
    #[command(visible_alias = "cmt")]
    Commit,

    /// Validate a commit message file, for use as a commit-msg hook
    #[command(visible_alias = "vcm")]
    ValidateCommitMessage(ValidateArgs),
}

#[derive(Debug, Clone, Copy, Subcommand)]
pub enum ConfigCommand {
    /// Built-in default configuration
    Default,
    /// Configuration after loading the config file
    Show,
}

#[derive(Debug, Clone, Args)]
pub struct RangeArgs {
    #[arg(short, long, default_value = "tag", help = "Range kind: tag, date or hash")]
    pub range: RangeKind,

    #[arg(short, long, help = "Start of the range, exclusive for tags and hashes")]
    pub start: Option<String>,

    #[arg(short, long, help = "End of the range, inclusive")]
    pub end: Option<String>,
}

#[derive(Debug, Clone, Args)]
pub struct CommitLogArgs {
    #[arg(short, long, help = "Commits of an existing tag")]
    pub tag: Option<String>,

    #[command(flatten)]
    pub range: RangeArgs,
}

#[derive(Debug, Clone, Args)]
pub struct ChangelogArgs {
    #[arg(short = 'n', long, default_value_t = 10, help = "Number of tags to include")]
    pub size: usize,

    #[arg(short, long, help = "Include every tag")]
    pub all: bool,

    #[arg(long, help = "Prepend the notes of the next version when it changed")]
    pub add_next_version: bool,
}

#[derive(Debug, Clone, Args)]
pub struct ValidateArgs {
    #[arg(short, long, default_value = ".git", help = "Directory of the message file")]
    pub path: String,

    #[arg(short, long, default_value = "COMMIT_EDITMSG", help = "Message file name")]
    pub file: String,

    #[arg(short, long, help = "Source of the message, as passed to git hooks")]
    pub source: Option<String>,
}
