pub mod analyzer;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod formatter;
pub mod git;
pub mod grammar;
pub mod release_notes;
pub mod ui;

pub use error::{GitSemverError, Result};
