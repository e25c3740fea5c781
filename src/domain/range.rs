use crate::error::{GitSemverError, Result};
use chrono::NaiveDate;
use std::fmt;
use std::str::FromStr;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Kind of boundary a log range is expressed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RangeKind {
    #[default]
    Tag,
    Date,
    Hash,
}

impl FromStr for RangeKind {
    type Err = GitSemverError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "tag" => Ok(RangeKind::Tag),
            "date" => Ok(RangeKind::Date),
            "hash" => Ok(RangeKind::Hash),
            other => Err(GitSemverError::range(format!(
                "unknown range '{}', expected: tag, date or hash",
                other
            ))),
        }
    }
}

impl fmt::Display for RangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RangeKind::Tag => "tag",
            RangeKind::Date => "date",
            RangeKind::Hash => "hash",
        };
        f.write_str(name)
    }
}

/// A window over commit history.
///
/// Starts are exclusive for tags and hashes, dates are inclusive on both ends.
/// A missing end means "up to HEAD"; a missing start means "from the first commit".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogRange {
    Tag {
        start: Option<String>,
        end: Option<String>,
    },
    Date {
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    },
    Hash {
        start: Option<String>,
        end: Option<String>,
    },
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn parse_date(value: Option<&str>) -> Result<Option<NaiveDate>> {
    non_empty(value)
        .map(|v| {
            NaiveDate::parse_from_str(&v, DATE_FORMAT).map_err(|e| {
                GitSemverError::range(format!("'{}' is not a date (YYYY-MM-DD): {}", v, e))
            })
        })
        .transpose()
}

impl LogRange {
    /// Build a range from operator input.
    ///
    /// For tag ranges an empty start falls back to `last_tag`.
    pub fn resolve(
        kind: RangeKind,
        start: Option<&str>,
        end: Option<&str>,
        last_tag: Option<&str>,
    ) -> Result<Self> {
        match kind {
            RangeKind::Tag => Ok(LogRange::Tag {
                start: non_empty(start).or_else(|| non_empty(last_tag)),
                end: non_empty(end),
            }),
            RangeKind::Date => {
                let start = parse_date(start)?;
                let end = parse_date(end)?;
                if let (Some(s), Some(e)) = (start, end) {
                    if s > e {
                        return Err(GitSemverError::range(format!(
                            "start date {} is after end date {}",
                            s, e
                        )));
                    }
                }
                Ok(LogRange::Date { start, end })
            }
            RangeKind::Hash => Ok(LogRange::Hash {
                start: non_empty(start),
                end: non_empty(end),
            }),
        }
    }

    /// Commits after `tag` (all commits when `None`) up to HEAD
    pub fn since_tag(tag: Option<&str>) -> Self {
        LogRange::Tag {
            start: non_empty(tag),
            end: None,
        }
    }

    /// Commits after `previous` (from the first commit when `None`) up to and including `tag`
    pub fn between_tags(previous: Option<&str>, tag: &str) -> Self {
        LogRange::Tag {
            start: non_empty(previous),
            end: non_empty(Some(tag)),
        }
    }

    pub fn kind(&self) -> RangeKind {
        match self {
            LogRange::Tag { .. } => RangeKind::Tag,
            LogRange::Date { .. } => RangeKind::Date,
            LogRange::Hash { .. } => RangeKind::Hash,
        }
    }
}
