//! Markdown rendering of release notes and changelogs.
//!
//! Rendering is pure: the same [`ReleaseNote`] always produces the same text.

use crate::config::Config;
use crate::domain::{ReleaseVersion, TagPattern};
use crate::error::Result;
use crate::release_notes::{Entry, ReleaseNote};

const UNRELEASED: &str = "Unreleased";

/// Renders release notes as markdown
pub struct OutputFormatter {
    tag_pattern: TagPattern,
    breaking_change_title: String,
    changelog_title: String,
}

impl OutputFormatter {
    pub fn new(config: &Config) -> Result<Self> {
        Ok(OutputFormatter {
            tag_pattern: TagPattern::new(config.tag.pattern.as_str())?,
            breaking_change_title: config.release_notes.breaking_change_title.clone(),
            changelog_title: config.release_notes.changelog_title.clone(),
        })
    }

    /// Render a single note: version heading, breaking changes, then sections
    pub fn format_release_note(&self, note: &ReleaseNote) -> String {
        let mut out = String::new();
        self.write_note(&mut out, note);
        out
    }

    /// Render notes in exactly the order given, under the changelog title
    pub fn format_changelog(&self, notes: &[ReleaseNote]) -> String {
        let mut out = format!("# {}\n", self.changelog_title);
        for note in notes {
            out.push('\n');
            self.write_note(&mut out, note);
        }
        out
    }

    fn heading(&self, note: &ReleaseNote) -> String {
        let name = match &note.version {
            ReleaseVersion::Released(version) => self.tag_pattern.format(version),
            ReleaseVersion::Unreleased => UNRELEASED.to_string(),
        };
        match note.date {
            Some(date) => format!("## {} ({})", name, date.format("%Y-%m-%d")),
            None => format!("## {}", name),
        }
    }

    fn write_note(&self, out: &mut String, note: &ReleaseNote) {
        out.push_str(&format!("{}\n", self.heading(note)));

        if !note.breaking_changes.is_empty() {
            out.push_str(&format!("\n### {}\n\n", self.breaking_change_title));
            for change in &note.breaking_changes {
                out.push_str(&format!("- {}\n", change));
            }
        }

        for section in &note.sections {
            out.push_str(&format!("\n### {}\n\n", section.title));
            for entry in &section.entries {
                out.push_str(&format_entry(entry));
                out.push('\n');
            }
        }
    }
}

fn format_entry(entry: &Entry) -> String {
    let mut line = String::from("- ");
    if let Some(scope) = &entry.scope {
        line.push_str(&format!("**{}:** ", scope));
    }
    line.push_str(&entry.subject);
    line.push_str(&format!(" ({})", entry.short_hash));
    if let Some(issue) = &entry.issue {
        line.push_str(&format!(" [{}]", issue));
    }
    line
}
