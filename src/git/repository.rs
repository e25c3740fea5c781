use crate::domain::tag::sort_by_date;
use crate::domain::{LogRange, RawCommit, Tag, TagPattern};
use crate::error::{GitSemverError, Result};
use crate::grammar::FormattedMessage;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use git2::{ErrorCode, Oid, Repository as Git2Repo, Sort};
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

/// Wrapper around git2::Repository with our trait interface
pub struct Git2Repository {
    repo: Git2Repo,
}

fn to_utc(time: git2::Time) -> DateTime<Utc> {
    DateTime::from_timestamp(time.seconds(), 0).unwrap_or_default()
}

/// Calendar date in the signer's own timezone, as `git log --date=short` shows it
fn local_date(time: git2::Time) -> NaiveDate {
    (to_utc(time) + Duration::minutes(i64::from(time.offset_minutes()))).date_naive()
}

impl Git2Repository {
    /// Open or discover a git repository
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Git2Repo::discover(path)?;

        Ok(Git2Repository { repo })
    }

    /// Create from existing git2::Repository
    pub fn from_git2(repo: Git2Repo) -> Self {
        Git2Repository { repo }
    }

    /// HEAD commit, or `None` while the current branch has no commits yet
    fn head_oid(&self) -> Result<Option<Oid>> {
        match self.repo.head() {
            Ok(head) => Ok(Some(head.peel_to_commit()?.id())),
            Err(e) if e.code() == ErrorCode::UnbornBranch || e.code() == ErrorCode::NotFound => {
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    fn resolve(&self, revision: &str) -> Result<Oid> {
        let object = self.repo.revparse_single(revision).map_err(|e| {
            if e.code() == ErrorCode::NotFound {
                GitSemverError::not_found(format!("revision '{}'", revision))
            } else {
                e.into()
            }
        })?;
        Ok(object.peel_to_commit()?.id())
    }

    /// Tag names matching `pattern`, grouped by the commit they point to
    fn tags_by_commit(&self, pattern: &TagPattern) -> Result<HashMap<Oid, Vec<String>>> {
        let mut by_commit: HashMap<Oid, Vec<String>> = HashMap::new();
        for name in self.repo.tag_names(None)?.iter().flatten() {
            if !pattern.matches(name) {
                continue;
            }
            let reference = self.repo.find_reference(&format!("refs/tags/{}", name))?;
            let commit = reference.peel_to_commit()?;
            by_commit
                .entry(commit.id())
                .or_default()
                .push(name.to_string());
        }
        Ok(by_commit)
    }

    /// Walk from `end` (HEAD when `None`) hiding everything reachable from `start`
    fn walk(&self, start: Option<Oid>, end: Option<Oid>) -> Result<Vec<RawCommit>> {
        let end = match end {
            Some(oid) => oid,
            None => match self.head_oid()? {
                Some(oid) => oid,
                None => return Ok(Vec::new()),
            },
        };

        let mut revwalk = self.repo.revwalk()?;
        revwalk.set_sorting(Sort::TOPOLOGICAL | Sort::TIME)?;
        revwalk.push(end)?;
        if let Some(start) = start {
            revwalk.hide(start)?;
        }

        let mut commits = Vec::new();
        for oid_result in revwalk {
            let oid = oid_result?;
            let commit = self.repo.find_commit(oid)?;
            commits.push(RawCommit::new(
                oid.to_string(),
                local_date(commit.author().when()),
                commit.message().unwrap_or_default(),
            ));
        }
        Ok(commits)
    }

    fn walk_dates(&self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Result<Vec<RawCommit>> {
        let commits = self.walk(None, None)?;
        Ok(commits
            .into_iter()
            .filter(|c| start.map_or(true, |s| c.date >= s) && end.map_or(true, |e| c.date <= e))
            .collect())
    }
}

impl super::Repository for Git2Repository {
    fn last_tag(&self, pattern: &TagPattern) -> Result<Option<String>> {
        let Some(head) = self.head_oid()? else {
            return Ok(None);
        };
        let by_commit = self.tags_by_commit(pattern)?;
        if by_commit.is_empty() {
            return Ok(None);
        }

        let mut revwalk = self.repo.revwalk()?;
        revwalk.set_sorting(Sort::TOPOLOGICAL | Sort::TIME)?;
        revwalk.push(head)?;
        for oid_result in revwalk {
            if let Some(names) = by_commit.get(&oid_result?) {
                // several tags on one commit: the highest version wins
                let last = names
                    .iter()
                    .filter_map(|n| pattern.parse_version(n).ok().map(|v| (v, n)))
                    .max()
                    .map(|(_, n)| n.clone());
                debug!(tag = ?last, "last tag");
                return Ok(last);
            }
        }
        Ok(None)
    }

    fn tags(&self, pattern: &TagPattern) -> Result<Vec<Tag>> {
        let mut tags = Vec::new();
        for name in self.repo.tag_names(None)?.iter().flatten() {
            if !pattern.matches(name) {
                continue;
            }
            let reference = self.repo.find_reference(&format!("refs/tags/{}", name))?;
            // annotated tags carry their own date, lightweight ones use the commit's
            let date = match reference.peel_to_tag() {
                Ok(tag) => match tag.tagger() {
                    Some(tagger) => to_utc(tagger.when()),
                    None => to_utc(reference.peel_to_commit()?.time()),
                },
                Err(_) => to_utc(reference.peel_to_commit()?.time()),
            };
            tags.push(Tag::new(name, date));
        }
        sort_by_date(&mut tags);
        Ok(tags)
    }

    fn log(&self, range: &LogRange) -> Result<Vec<RawCommit>> {
        debug!(?range, "reading commit log");
        match range {
            LogRange::Tag { start, end } | LogRange::Hash { start, end } => {
                let start = start.as_deref().map(|r| self.resolve(r)).transpose()?;
                let end = end.as_deref().map(|r| self.resolve(r)).transpose()?;
                self.walk(start, end)
            }
            LogRange::Date { start, end } => self.walk_dates(*start, *end),
        }
    }

    fn branch(&self) -> Result<String> {
        match self.repo.head() {
            Ok(head) => Ok(head.shorthand().unwrap_or_default().to_string()),
            Err(e) if e.code() == ErrorCode::UnbornBranch => {
                let head = self.repo.find_reference("HEAD")?;
                Ok(head
                    .symbolic_target()
                    .unwrap_or_default()
                    .trim_start_matches("refs/heads/")
                    .to_string())
            }
            Err(e) => Err(e.into()),
        }
    }

    fn is_detached(&self) -> Result<bool> {
        Ok(self.repo.head_detached()?)
    }

    fn commit(&self, message: &FormattedMessage) -> Result<()> {
        let signature = self.repo.signature()?;
        let tree_oid = self.repo.index()?.write_tree()?;
        let tree = self.repo.find_tree(tree_oid)?;

        let parent = match self.head_oid()? {
            Some(oid) => Some(self.repo.find_commit(oid)?),
            None => None,
        };
        let parents: Vec<&git2::Commit> = parent.iter().collect();

        let oid = self.repo.commit(
            Some("HEAD"),
            &signature,
            &signature,
            &message.to_string(),
            &tree,
            &parents,
        )?;
        debug!(%oid, "commit created");
        Ok(())
    }

    fn create_tag(&self, name: &str, message: &str) -> Result<()> {
        let head = self
            .head_oid()?
            .ok_or_else(|| GitSemverError::not_found("HEAD has no commit to tag"))?;
        let target = self.repo.find_object(head, None)?;
        let signature = self.repo.signature()?;

        self.repo.tag(name, &target, &signature, message, false)?;
        debug!(tag = name, "tag created");
        Ok(())
    }
}
