//! Domain logic - pure data types independent of git operations

pub mod commit;
pub mod range;
pub mod tag;
pub mod version;

pub use commit::{Footer, FooterSeparator, Outcome, ParsedCommit, RawCommit};
pub use range::{LogRange, RangeKind};
pub use tag::{Tag, TagPattern};
pub use version::{ReleaseVersion, Severity};
