//! Conventional commit message grammar.
//!
//! [`MessageProcessor`] parses and validates raw messages against the configured
//! commit types and scopes, formats structured commits back into
//! header/body/footer text, and derives issue references from branch names.

use std::fmt;
use std::sync::LazyLock;

use glob::Pattern;
use regex::Regex;
use tracing::debug;

use crate::config::{BranchesConfig, CommitMessageConfig, Config, IssueConfig};
use crate::domain::{Footer, FooterSeparator, Outcome, ParsedCommit, RawCommit};
use crate::error::{GitSemverError, Result};

static HEADER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?P<type>[A-Za-z0-9_-]+)(?:\((?P<scope>[^()\r\n]+)\))?(?P<breaking>!)?:[ \t]*(?P<subject>.*)$",
    )
    .expect("valid header regex")
});

static FOOTER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?P<token>BREAKING[ -]CHANGE|[A-Za-z][A-Za-z0-9-]*)(?P<sep>:[ \t]+| #)(?P<value>\S.*)$",
    )
    .expect("valid footer regex")
});

const SCISSORS: &str = "# ------------------------ >8 ------------------------";

/// Header, body and footer text of a commit message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormattedMessage {
    pub header: String,
    pub body: String,
    pub footer: String,
}

impl fmt::Display for FormattedMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<&str> = [&self.header, &self.body, &self.footer]
            .into_iter()
            .map(|s| s.as_str())
            .filter(|s| !s.is_empty())
            .collect();
        f.write_str(&parts.join("\n\n"))
    }
}

/// Parses, validates and formats commit messages for one configuration
#[derive(Debug)]
pub struct MessageProcessor {
    types: Vec<String>,
    scope_values: Vec<String>,
    scope_pattern: Option<Regex>,
    header_selector: Option<Regex>,
    issue: IssueConfig,
    branch_issue: Option<Regex>,
    skip_branches: Vec<(String, Pattern)>,
}

fn compile(field: &str, pattern: &str) -> Result<Regex> {
    Regex::new(pattern)
        .map_err(|e| GitSemverError::config(format!("{} is not a valid regex: {}", field, e)))
}

impl MessageProcessor {
    /// Compile every configured pattern; a malformed one is a configuration error
    pub fn new(config: &Config) -> Result<Self> {
        Self::from_parts(&config.commit_message, &config.branches)
    }

    fn from_parts(message: &CommitMessageConfig, branches: &BranchesConfig) -> Result<Self> {
        let scope_pattern = message
            .scope
            .pattern
            .as_deref()
            .filter(|p| !p.is_empty())
            .map(|p| compile("commit_message.scope.pattern", &format!("^(?:{})$", p)))
            .transpose()?;

        let header_selector = message
            .header_selector
            .as_deref()
            .filter(|p| !p.is_empty())
            .map(|p| compile("commit_message.header_selector", p))
            .transpose()?;
        if let Some(selector) = &header_selector {
            if !selector.capture_names().any(|n| n == Some("header")) {
                return Err(GitSemverError::config(
                    "commit_message.header_selector must define a 'header' capture group",
                ));
            }
        }

        let branch_issue = if branches.disable_issue || message.issue.regex.is_empty() {
            None
        } else {
            Some(compile(
                "commit_message.issue.regex",
                &format!(
                    "^(?:{})(?P<issue>{})(?:{})$",
                    branches.prefix, message.issue.regex, branches.suffix
                ),
            )?)
        };

        let skip_branches = branches
            .skip
            .iter()
            .map(|name| {
                Pattern::new(name)
                    .map(|p| (name.clone(), p))
                    .map_err(|e| {
                        GitSemverError::config(format!(
                            "branches.skip entry '{}' is not a valid glob: {}",
                            name, e
                        ))
                    })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(MessageProcessor {
            types: message.types.clone(),
            scope_values: message.scope.values.clone(),
            scope_pattern,
            header_selector,
            issue: message.issue.clone(),
            branch_issue,
            skip_branches,
        })
    }

    /// Parse a raw commit message into its structured form.
    ///
    /// Fails when the header does not follow `type[(scope)][!]: subject`, the type or
    /// scope is not allowed, the subject is empty, or a footer line is malformed.
    pub fn parse(&self, raw: &str) -> Result<ParsedCommit> {
        let normalized = raw.replace("\r\n", "\n");
        let mut lines = normalized.trim_end().lines();
        let first_line = lines
            .next()
            .map(str::trim_end)
            .filter(|l| !l.trim().is_empty())
            .ok_or_else(|| GitSemverError::grammar("commit message is empty"))?;

        let mut commit = self.parse_header(first_line)?;

        let paragraphs = split_paragraphs(lines);
        let (body_paragraphs, footer_paragraph) = match paragraphs.split_last() {
            Some((last, rest)) if is_footer_block(last) => (rest, Some(last)),
            _ => (paragraphs.as_slice(), None),
        };

        if !body_paragraphs.is_empty() {
            let body = body_paragraphs
                .iter()
                .map(|p| p.join("\n"))
                .collect::<Vec<_>>()
                .join("\n\n");
            commit.body = Some(body);
        }

        if let Some(paragraph) = footer_paragraph {
            commit.footers = parse_footers(paragraph)?;
        }

        if let Some(footer) = commit.footers.iter().find(|f| f.is_breaking_change()) {
            commit.is_breaking_change = true;
            commit.breaking_change_description = Some(footer.value.clone());
        }
        commit.issue = commit
            .footers
            .iter()
            .find(|f| self.issue.is_issue_key(&f.token))
            .map(|f| f.value.clone());

        Ok(commit)
    }

    fn parse_header(&self, line: &str) -> Result<ParsedCommit> {
        let header = match &self.header_selector {
            Some(selector) => selector
                .captures(line)
                .and_then(|c| c.name("header"))
                .map(|m| m.as_str())
                .ok_or_else(|| {
                    GitSemverError::grammar(format!(
                        "header '{}' does not match the configured header selector",
                        line
                    ))
                })?,
            None => line,
        };

        let captures = HEADER_REGEX.captures(header).ok_or_else(|| {
            GitSemverError::grammar(format!(
                "header '{}' should match 'type(scope)!: subject'",
                header
            ))
        })?;

        let commit_type = &captures["type"];
        if !self.types.iter().any(|t| t == commit_type) {
            return Err(GitSemverError::grammar(format!(
                "type '{}' is not allowed, expected one of: {}",
                commit_type,
                self.types.join(", ")
            )));
        }

        let scope = captures.name("scope").map(|m| m.as_str().to_string());
        if let Some(scope) = &scope {
            self.check_scope(scope)?;
        }

        let subject = captures["subject"].trim();
        if subject.is_empty() {
            return Err(GitSemverError::grammar("subject must not be empty"));
        }

        let mut commit = ParsedCommit::new(commit_type, subject);
        commit.scope = scope;
        commit.is_breaking_change = captures.name("breaking").is_some();
        Ok(commit)
    }

    fn check_scope(&self, scope: &str) -> Result<()> {
        if !self.scope_values.is_empty() && !self.scope_values.iter().any(|v| v == scope) {
            return Err(GitSemverError::grammar(format!(
                "scope '{}' is not allowed, expected one of: {}",
                scope,
                self.scope_values.join(", ")
            )));
        }
        if let Some(pattern) = &self.scope_pattern {
            if !pattern.is_match(scope) {
                return Err(GitSemverError::grammar(format!(
                    "scope '{}' does not match '{}'",
                    scope,
                    pattern.as_str()
                )));
            }
        }
        Ok(())
    }

    /// Parse a repository commit, turning a grammar failure into a skip
    pub fn parse_commit(&self, commit: &RawCommit) -> Outcome<ParsedCommit> {
        match self.parse(&commit.message) {
            Ok(parsed) => Outcome::Applied(parsed),
            Err(e) => {
                debug!(hash = commit.short_hash(), error = %e, "commit skipped");
                Outcome::skipped(format!("{}: {}", commit.short_hash(), e))
            }
        }
    }

    /// Check a commit message file's content; git comment lines are ignored
    pub fn validate(&self, raw: &str) -> Result<()> {
        self.parse(&strip_comments(raw)).map(|_| ())
    }

    /// Render a structured commit as header, body and footer text
    pub fn format(&self, commit: &ParsedCommit) -> FormattedMessage {
        let mut header = commit.commit_type.clone();
        if let Some(scope) = &commit.scope {
            header.push_str(&format!("({})", scope));
        }
        if commit.is_breaking_change {
            header.push('!');
        }
        header.push_str(": ");
        header.push_str(&commit.subject);

        let mut footer_lines = Vec::new();
        if let Some(description) = &commit.breaking_change_description {
            footer_lines.push(Footer::new("BREAKING CHANGE", description.as_str()).to_string());
        }
        if let Some(issue) = &commit.issue {
            footer_lines.push(self.issue_footer(issue));
        }

        let mut breaking_pending = commit.breaking_change_description.is_some();
        let mut issue_pending = commit.issue.is_some();
        for footer in &commit.footers {
            if breaking_pending
                && footer.is_breaking_change()
                && commit.breaking_change_description.as_ref() == Some(&footer.value)
            {
                breaking_pending = false;
                continue;
            }
            if issue_pending
                && self.issue.is_issue_key(&footer.token)
                && commit.issue.as_ref() == Some(&footer.value)
            {
                issue_pending = false;
                continue;
            }
            footer_lines.push(footer.to_string());
        }

        FormattedMessage {
            header,
            body: commit.body.clone().unwrap_or_default(),
            footer: footer_lines.join("\n"),
        }
    }

    fn issue_footer(&self, issue: &str) -> String {
        if self.issue.use_hash {
            Footer::with_hash(self.issue.key.as_str(), issue).to_string()
        } else {
            Footer::new(self.issue.key.as_str(), issue).to_string()
        }
    }

    /// Whether validation should be bypassed on this checkout
    pub fn skip_branch(&self, branch: &str, is_detached: bool) -> bool {
        is_detached
            || self.skip_branches.iter().any(|(name, pattern)| {
                name == branch || pattern.matches(branch)
            })
    }

    /// Extract the issue id from a branch name.
    ///
    /// Returns `Ok(None)` when issue extraction is not configured and
    /// `NotFound` when it is configured but the branch carries no id.
    pub fn issue_id(&self, branch: &str) -> Result<Option<String>> {
        let Some(regex) = &self.branch_issue else {
            return Ok(None);
        };
        regex
            .captures(branch)
            .and_then(|c| c.name("issue"))
            .map(|m| Some(m.as_str().to_string()))
            .ok_or_else(|| {
                GitSemverError::not_found(format!("no issue id in branch name '{}'", branch))
            })
    }

    /// Footer text to append so the message references the branch's issue.
    pub fn enhance(&self, branch: &str, message: &str) -> Outcome<String> {
        if self.issue.key.is_empty() {
            return Outcome::skipped("no issue footer key configured");
        }

        let content = strip_comments(message);
        let footers = footer_block(&content);
        if footers
            .iter()
            .filter_map(|line| FOOTER_REGEX.captures(line))
            .any(|c| self.issue.is_issue_key(&c["token"]))
        {
            return Outcome::skipped("message already references an issue");
        }

        let issue = match self.issue_id(branch) {
            Ok(Some(issue)) => issue,
            Ok(None) => return Outcome::skipped("issue extraction is disabled"),
            Err(e) => return Outcome::skipped(e.to_string()),
        };

        let mut appended = String::new();
        if !message.is_empty() && !message.ends_with('\n') {
            appended.push('\n');
        }
        if footers.is_empty() {
            appended.push('\n');
        }
        appended.push_str(&self.issue_footer(&issue));
        appended.push('\n');
        Outcome::Applied(appended)
    }
}

fn is_footer_line(line: &str) -> bool {
    FOOTER_REGEX.is_match(line)
}

fn is_continuation_line(line: &str) -> bool {
    line.starts_with([' ', '\t'])
}

/// A trailing paragraph is a footer block when it both starts and ends like one;
/// prose such as "Note: ..." wrapped over several lines stays in the body
fn is_footer_block(paragraph: &[&str]) -> bool {
    match (paragraph.first(), paragraph.last()) {
        (Some(first), Some(last)) => {
            is_footer_line(first) && (is_footer_line(last) || is_continuation_line(last))
        }
        _ => false,
    }
}

fn split_paragraphs<'a>(lines: impl Iterator<Item = &'a str>) -> Vec<Vec<&'a str>> {
    let mut paragraphs = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    for line in lines {
        let line = line.trim_end();
        if line.trim().is_empty() {
            if !current.is_empty() {
                paragraphs.push(std::mem::take(&mut current));
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        paragraphs.push(current);
    }
    paragraphs
}

/// Lines of the trailing footer paragraph, empty when the message has none
fn footer_block(message: &str) -> Vec<&str> {
    let mut lines = message.trim_end().lines();
    lines.next();
    split_paragraphs(lines)
        .pop()
        .filter(|p| is_footer_block(p))
        .unwrap_or_default()
}

fn parse_footers(lines: &[&str]) -> Result<Vec<Footer>> {
    let mut footers: Vec<Footer> = Vec::new();
    for line in lines {
        if let Some(captures) = FOOTER_REGEX.captures(line) {
            let token = captures["token"].to_string();
            let value = captures["value"].trim_end().to_string();
            let separator = if captures["sep"].starts_with(':') {
                FooterSeparator::Colon
            } else {
                FooterSeparator::Hash
            };
            footers.push(Footer {
                token,
                value,
                separator,
            });
        } else if is_continuation_line(line) && !footers.is_empty() {
            if let Some(last) = footers.last_mut() {
                last.value.push('\n');
                last.value.push_str(line.trim());
            }
        } else {
            return Err(GitSemverError::grammar(format!(
                "footer line '{}' should be 'Token: value' or 'Token #value'",
                line
            )));
        }
    }
    Ok(footers)
}

/// Drop git comment lines and everything below the scissors line
fn strip_comments(message: &str) -> String {
    message
        .lines()
        .take_while(|line| line.trim_end() != SCISSORS)
        .filter(|line| !line.starts_with('#'))
        .collect::<Vec<_>>()
        .join("\n")
}
