use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{GitSemverError, Result};

/// Name of the configuration file looked up in the working and user config directories.
pub const CONFIG_FILE_NAME: &str = "gitsemver.toml";

/// Represents the complete configuration for git-semver.
///
/// Built once per invocation and shared by reference; nothing mutates it afterwards.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub tag: TagConfig,

    #[serde(default)]
    pub versioning: VersioningConfig,

    #[serde(default)]
    pub commit_message: CommitMessageConfig,

    #[serde(default)]
    pub branches: BranchesConfig,

    #[serde(default)]
    pub release_notes: ReleaseNotesConfig,
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

/// Tag naming configuration.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct TagConfig {
    /// Tag pattern with a `{version}` placeholder, e.g. `v{version}`
    #[serde(default = "default_tag_pattern")]
    pub pattern: String,
}

fn default_tag_pattern() -> String {
    "v{version}".to_string()
}

impl Default for TagConfig {
    fn default() -> Self {
        TagConfig {
            pattern: default_tag_pattern(),
        }
    }
}

/// Maps commit types to bump severities.
///
/// A type listed nowhere has no severity and never changes the version.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct VersioningConfig {
    #[serde(default)]
    pub update_major: Vec<String>,

    #[serde(default = "default_update_minor")]
    pub update_minor: Vec<String>,

    #[serde(default = "default_update_patch")]
    pub update_patch: Vec<String>,

    /// While the major version is 0, breaking changes bump the minor version
    #[serde(default = "default_true")]
    pub initial_development: bool,
}

fn default_update_minor() -> Vec<String> {
    strings(&["feat"])
}

fn default_update_patch() -> Vec<String> {
    strings(&["fix", "perf"])
}

fn default_true() -> bool {
    true
}

impl Default for VersioningConfig {
    fn default() -> Self {
        VersioningConfig {
            update_major: Vec::new(),
            update_minor: default_update_minor(),
            update_patch: default_update_patch(),
            initial_development: true,
        }
    }
}

/// Commit message grammar configuration.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct CommitMessageConfig {
    /// Allowed commit types, in the order they are offered when composing a commit
    #[serde(default = "default_commit_types")]
    pub types: Vec<String>,

    /// Optional regex with a `header` group selecting the conventional header out of the first line
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header_selector: Option<String>,

    #[serde(default)]
    pub scope: ScopeConfig,

    #[serde(default)]
    pub issue: IssueConfig,
}

/// Returns the default list of conventional commit types.
fn default_commit_types() -> Vec<String> {
    strings(&[
        "build", "ci", "chore", "docs", "feat", "fix", "perf", "refactor", "revert", "style",
        "test",
    ])
}

impl Default for CommitMessageConfig {
    fn default() -> Self {
        CommitMessageConfig {
            types: default_commit_types(),
            header_selector: None,
            scope: ScopeConfig::default(),
            issue: IssueConfig::default(),
        }
    }
}

/// Scope validation: an enumerated set, a regex, or both. Empty means any scope.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct ScopeConfig {
    #[serde(default)]
    pub values: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
}

/// Issue reference footer and extraction pattern.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct IssueConfig {
    /// Footer token written for issue references
    #[serde(default = "default_issue_key")]
    pub key: String,

    /// Other footer tokens recognised as issue references
    #[serde(default = "default_issue_key_synonyms")]
    pub key_synonyms: Vec<String>,

    /// Write `Key #ID` instead of `Key: ID`
    #[serde(default)]
    pub use_hash: bool,

    /// Issue id pattern, empty disables extraction from branch names
    #[serde(default)]
    pub regex: String,
}

fn default_issue_key() -> String {
    "refs".to_string()
}

fn default_issue_key_synonyms() -> Vec<String> {
    strings(&["Refs", "REFS"])
}

impl Default for IssueConfig {
    fn default() -> Self {
        IssueConfig {
            key: default_issue_key(),
            key_synonyms: default_issue_key_synonyms(),
            use_hash: false,
            regex: String::new(),
        }
    }
}

impl IssueConfig {
    /// Whether a footer token refers to the issue footer
    pub fn is_issue_key(&self, token: &str) -> bool {
        !self.key.is_empty() && (token == self.key || self.key_synonyms.iter().any(|k| k == token))
    }
}

/// Branch handling for validation and issue extraction.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct BranchesConfig {
    /// Regex matched before the issue id in a branch name
    #[serde(default = "default_branch_prefix")]
    pub prefix: String,

    /// Regex matched after the issue id in a branch name
    #[serde(default = "default_branch_suffix")]
    pub suffix: String,

    #[serde(default)]
    pub disable_issue: bool,

    /// Branch names or glob patterns on which validation is skipped
    #[serde(default = "default_skip_branches")]
    pub skip: Vec<String>,
}

fn default_branch_prefix() -> String {
    "([a-z]+/)?".to_string()
}

fn default_branch_suffix() -> String {
    "(-.*)?".to_string()
}

fn default_skip_branches() -> Vec<String> {
    strings(&["master", "main", "developer"])
}

impl Default for BranchesConfig {
    fn default() -> Self {
        BranchesConfig {
            prefix: default_branch_prefix(),
            suffix: default_branch_suffix(),
            disable_issue: false,
            skip: default_skip_branches(),
        }
    }
}

/// A release note section: which commit type it collects and its heading.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct SectionConfig {
    #[serde(rename = "type")]
    pub commit_type: String,
    pub title: String,
}

impl SectionConfig {
    pub fn new(commit_type: impl Into<String>, title: impl Into<String>) -> Self {
        SectionConfig {
            commit_type: commit_type.into(),
            title: title.into(),
        }
    }
}

/// Release note and changelog rendering options.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ReleaseNotesConfig {
    #[serde(default = "default_breaking_change_title")]
    pub breaking_change_title: String,

    #[serde(default = "default_changelog_title")]
    pub changelog_title: String,

    /// Sections in display order; commit types without a section are left out of notes
    #[serde(default = "default_sections")]
    pub sections: Vec<SectionConfig>,
}

fn default_sections() -> Vec<SectionConfig> {
    vec![
        SectionConfig::new("feat", "Features"),
        SectionConfig::new("fix", "Bug Fixes"),
        SectionConfig::new("perf", "Performance Improvements"),
    ]
}

fn default_breaking_change_title() -> String {
    "Breaking Changes".to_string()
}

fn default_changelog_title() -> String {
    "Changelog".to_string()
}

impl Default for ReleaseNotesConfig {
    fn default() -> Self {
        ReleaseNotesConfig {
            breaking_change_title: default_breaking_change_title(),
            changelog_title: default_changelog_title(),
            sections: default_sections(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            tag: TagConfig::default(),
            versioning: VersioningConfig::default(),
            commit_message: CommitMessageConfig::default(),
            branches: BranchesConfig::default(),
            release_notes: ReleaseNotesConfig::default(),
        }
    }
}

impl Config {
    /// Parse a configuration from TOML text and validate it.
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Render the configuration back to TOML.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| GitSemverError::config(format!("Cannot serialize configuration: {}", e)))
    }

    /// Check the cross-references between sections.
    ///
    /// Regex fields are compiled later, when the message processor is built.
    pub fn validate(&self) -> Result<()> {
        let types = &self.commit_message.types;
        if types.is_empty() {
            return Err(GitSemverError::config("commit_message.types must not be empty"));
        }

        let mut seen = HashSet::new();
        for t in types {
            if t.trim().is_empty() {
                return Err(GitSemverError::config("commit_message.types contains an empty type"));
            }
            if !seen.insert(t.as_str()) {
                return Err(GitSemverError::config(format!(
                    "commit_message.types lists '{}' more than once",
                    t
                )));
            }
        }

        let referenced = self
            .versioning
            .update_major
            .iter()
            .map(|t| ("versioning.update_major", t))
            .chain(
                self.versioning
                    .update_minor
                    .iter()
                    .map(|t| ("versioning.update_minor", t)),
            )
            .chain(
                self.versioning
                    .update_patch
                    .iter()
                    .map(|t| ("versioning.update_patch", t)),
            )
            .chain(
                self.release_notes
                    .sections
                    .iter()
                    .map(|s| ("release_notes.sections", &s.commit_type)),
            );
        for (field, t) in referenced {
            if !seen.contains(t.as_str()) {
                return Err(GitSemverError::config(format!(
                    "{} references unknown commit type '{}'",
                    field, t
                )));
            }
        }

        if !self.tag.pattern.contains("{version}") {
            return Err(GitSemverError::config(format!(
                "tag.pattern '{}' must contain the {{version}} placeholder",
                self.tag.pattern
            )));
        }

        Ok(())
    }
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `gitsemver.toml` in current directory
/// 3. `gitsemver.toml` in the user config directory
/// 4. Default configuration if no file found
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If a file exists but cannot be read, parsed or validated
pub fn load_config(config_path: Option<&str>) -> Result<Config> {
    match find_config_file(config_path) {
        Some(path) => {
            debug!(path = %path.display(), "loading configuration");
            let content = fs::read_to_string(&path)?;
            Config::from_toml(&content)
        }
        None => {
            debug!("no configuration file found, using defaults");
            Ok(Config::default())
        }
    }
}

fn find_config_file(config_path: Option<&str>) -> Option<PathBuf> {
    if let Some(path) = config_path {
        return Some(PathBuf::from(path));
    }

    let local = Path::new(".").join(CONFIG_FILE_NAME);
    if local.exists() {
        return Some(local);
    }

    dirs::config_dir()
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .filter(|path| path.exists())
}
