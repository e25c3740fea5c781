//! Git operations abstraction layer
//!
//! The version-control collaborator is the [Repository] trait. Everything else in
//! the crate works on the plain values it returns ([`RawCommit`], [`Tag`]), so the
//! classification and rendering code never touches git directly.
//!
//! - [repository::Git2Repository]: a real implementation using the `git2` crate
//! - [mock::MockRepository]: an in-memory implementation for testing
//!
//! ```rust
//! # use git_semver::git::Repository;
//! # use git_semver::domain::{LogRange, TagPattern};
//! # fn example<R: Repository>(repo: &R) -> git_semver::error::Result<()> {
//! let pattern = TagPattern::new("v{version}")?;
//! let last = repo.last_tag(&pattern)?;
//! let commits = repo.log(&LogRange::since_tag(last.as_deref()))?;
//! # Ok(())
//! # }
//! ```

pub mod mock;
pub mod repository;

pub use mock::MockRepository;
pub use repository::Git2Repository;

use crate::domain::{LogRange, RawCommit, Tag, TagPattern};
use crate::error::Result;
use crate::grammar::FormattedMessage;

/// Version-control operations the tool consumes
pub trait Repository {
    /// Most recent tag following `pattern` that is reachable from HEAD
    ///
    /// # Returns
    /// * `Ok(None)` - If no such tag exists, including in a repository without commits
    fn last_tag(&self, pattern: &TagPattern) -> Result<Option<String>>;

    /// All tags following `pattern` with their creation dates, oldest first
    fn tags(&self, pattern: &TagPattern) -> Result<Vec<Tag>>;

    /// Commits selected by `range`, newest first
    ///
    /// Tag and hash boundaries exclude the start and include the end; a missing
    /// end means HEAD. Date boundaries are inclusive on both sides.
    fn log(&self, range: &LogRange) -> Result<Vec<RawCommit>>;

    /// Name of the checked-out branch
    fn branch(&self) -> Result<String>;

    /// Whether HEAD points directly at a commit
    fn is_detached(&self) -> Result<bool>;

    /// Record the staged changes as a new commit on HEAD
    fn commit(&self, message: &FormattedMessage) -> Result<()>;

    /// Create an annotated tag on HEAD
    ///
    /// # Returns
    /// * `Err` - If the tag already exists or HEAD has no commit
    fn create_tag(&self, name: &str, message: &str) -> Result<()>;
}
