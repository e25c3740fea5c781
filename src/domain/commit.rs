use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;

/// Number of hash characters shown in notes and logs
pub const SHORT_HASH_LEN: usize = 7;

/// A commit as read from the repository, before any parsing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RawCommit {
    pub hash: String,
    pub date: NaiveDate,
    pub message: String,
}

impl RawCommit {
    pub fn new(hash: impl Into<String>, date: NaiveDate, message: impl Into<String>) -> Self {
        RawCommit {
            hash: hash.into(),
            date,
            message: message.into(),
        }
    }

    /// Abbreviated commit hash
    pub fn short_hash(&self) -> &str {
        let end = self
            .hash
            .char_indices()
            .nth(SHORT_HASH_LEN)
            .map(|(i, _)| i)
            .unwrap_or(self.hash.len());
        &self.hash[..end]
    }
}

/// How a footer separates its token from its value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FooterSeparator {
    /// `Token: value`
    Colon,
    /// `Token #value`
    Hash,
}

/// A trailing `Token: value` / `Token #value` line of a commit message
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Footer {
    pub token: String,
    pub value: String,
    pub separator: FooterSeparator,
}

impl Footer {
    pub fn new(token: impl Into<String>, value: impl Into<String>) -> Self {
        Footer {
            token: token.into(),
            value: value.into(),
            separator: FooterSeparator::Colon,
        }
    }

    pub fn with_hash(token: impl Into<String>, value: impl Into<String>) -> Self {
        Footer {
            token: token.into(),
            value: value.into(),
            separator: FooterSeparator::Hash,
        }
    }

    /// `BREAKING CHANGE` and `BREAKING-CHANGE` tokens
    pub fn is_breaking_change(&self) -> bool {
        is_breaking_change_token(&self.token)
    }
}

fn is_breaking_change_token(token: &str) -> bool {
    token == "BREAKING CHANGE" || token == "BREAKING-CHANGE"
}

impl fmt::Display for Footer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // continuation lines are indented so the footer block parses back the same
        let value = self.value.replace('\n', "\n  ");
        match self.separator {
            FooterSeparator::Colon => write!(f, "{}: {}", self.token, value),
            FooterSeparator::Hash => write!(f, "{} #{}", self.token, value),
        }
    }
}

/// Structured representation of a conventional commit message
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedCommit {
    #[serde(rename = "type")]
    pub commit_type: String,
    pub scope: Option<String>,
    pub subject: String,
    /// Body paragraphs joined by blank lines
    pub body: Option<String>,
    /// Footers in their original order, duplicates included
    pub footers: Vec<Footer>,
    pub is_breaking_change: bool,
    pub breaking_change_description: Option<String>,
    pub issue: Option<String>,
}

impl ParsedCommit {
    /// Create a commit message with no body, footers or breaking change
    pub fn new(commit_type: impl Into<String>, subject: impl Into<String>) -> Self {
        ParsedCommit {
            commit_type: commit_type.into(),
            scope: None,
            subject: subject.into(),
            body: None,
            footers: Vec::new(),
            is_breaking_change: false,
            breaking_change_description: None,
            issue: None,
        }
    }

    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = Some(scope.into());
        self
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn with_issue(mut self, issue: impl Into<String>) -> Self {
        self.issue = Some(issue.into());
        self
    }

    pub fn with_footer(mut self, footer: Footer) -> Self {
        self.footers.push(footer);
        self
    }

    /// Mark as breaking; an empty description only sets the flag
    pub fn with_breaking_change(mut self, description: impl Into<String>) -> Self {
        let description = description.into();
        self.is_breaking_change = true;
        if !description.trim().is_empty() {
            self.breaking_change_description = Some(description);
        }
        self
    }

    /// Text shown in the breaking-changes list: the footer description, else the subject
    pub fn breaking_message(&self) -> Option<&str> {
        if !self.is_breaking_change {
            return None;
        }
        Some(
            self.breaking_change_description
                .as_deref()
                .unwrap_or(&self.subject),
        )
    }
}

/// Result of an operation that may legitimately do nothing.
///
/// `Skipped` carries the reason, so callers can report it without treating it as an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    Applied(T),
    Skipped(String),
}

impl<T> Outcome<T> {
    pub fn skipped(reason: impl Into<String>) -> Self {
        Outcome::Skipped(reason.into())
    }

    pub fn is_applied(&self) -> bool {
        matches!(self, Outcome::Applied(_))
    }

    /// The applied value, dropping the skip reason
    pub fn applied(self) -> Option<T> {
        match self {
            Outcome::Applied(value) => Some(value),
            Outcome::Skipped(_) => None,
        }
    }
}
