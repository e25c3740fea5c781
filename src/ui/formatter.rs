//! Pure formatting functions for UI output.
//!
//! Status lines go to stderr so stdout carries only command output
//! (versions, notes, JSON lines) and stays pipeable.

use console::style;

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red().bold(), message);
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    eprintln!("{} {}", style("✓").green(), message);
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    eprintln!("{} {}", style("→").yellow(), message);
}

/// Display a soft condition; the command still succeeds.
pub fn display_warning(message: &str) {
    eprintln!("{} {}", style("⚠ WARNING:").yellow(), message);
}

/// Print command output to stdout, with exactly one trailing newline
pub fn display_output(text: &str) {
    println!("{}", text.trim_end_matches('\n'));
}

/// Display the version the next tag would get.
///
/// # Arguments
/// * `current` - Tag the version is computed from (None if the repository has no tag yet)
/// * `next` - The computed tag
pub fn display_proposed_tag(current: Option<&str>, next: &str) {
    match current {
        Some(current) => {
            eprintln!("\n{}", style("Proposed Tag Change:").bold());
            eprintln!("  From: {}", style(current).red());
            eprintln!("  To:   {}", style(next).green());
        }
        None => {
            eprintln!("\n{}", style("Initial Tag:").bold());
            eprintln!("  New tag: {}", style(next).green());
        }
    }
}

/// Show the message that is about to be committed
pub fn display_commit_preview(message: &str) {
    eprintln!("\n{}", style("Commit message:").bold().underlined());
    for line in message.lines() {
        eprintln!("  {}", style(line).cyan());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_error() {
        // Visual verification test - output is printed to stderr
        display_error("test error");
    }

    #[test]
    fn test_display_warning() {
        display_warning("no issue id in branch name");
    }

    #[test]
    fn test_display_proposed_tag() {
        display_proposed_tag(Some("v1.0.0"), "v1.1.0");
        display_proposed_tag(None, "v0.1.0");
    }
}
