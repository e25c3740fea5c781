//! User interface module - interaction (prompts) and formatting.
//!
//! Separates concerns:
//! - `formatter` - Pure formatting functions
//! - This module - Interactive prompts used to compose a commit message

use std::io::{self, BufRead, Write};

use anyhow::{anyhow, Result};
use console::style;

use crate::domain::ParsedCommit;

pub mod formatter;

// Re-export formatter functions for convenience
pub use formatter::{
    display_commit_preview, display_error, display_output, display_proposed_tag, display_status,
    display_success, display_warning,
};

fn read_answer<R: BufRead>(input: &mut R) -> Result<String> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Err(anyhow!("Input closed before the commit message was complete"));
    }
    Ok(line.trim().to_string())
}

fn ask<R: BufRead, W: Write>(input: &mut R, output: &mut W, prompt: &str) -> Result<String> {
    write!(output, "{}: ", prompt)?;
    output.flush()?;
    read_answer(input)
}

/// Prompts user to select a commit type.
///
/// Accepts the 1-based index or the type name itself.
pub fn select_type<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    types: &[String],
) -> Result<String> {
    writeln!(output, "\n{}", style("Commit types:").bold())?;
    for (i, commit_type) in types.iter().enumerate() {
        writeln!(output, "  {}. {}", i + 1, commit_type)?;
    }

    let selection = ask(input, output, &format!("\nSelect a type (1-{})", types.len()))?;
    if let Some(found) = types.iter().find(|t| **t == selection) {
        return Ok(found.clone());
    }
    match selection.parse::<usize>() {
        Ok(index) if index > 0 && index <= types.len() => Ok(types[index - 1].clone()),
        _ => Err(anyhow!("Invalid type selection '{}'", selection)),
    }
}

/// Prompts for the parts of a commit message and assembles them.
///
/// Empty answers leave optional parts out; `default_issue` is offered when
/// the branch name carries an issue id.
pub fn prompt_commit<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    types: &[String],
    default_issue: Option<&str>,
) -> Result<ParsedCommit> {
    let commit_type = select_type(input, output, types)?;

    let scope = ask(input, output, "Scope (optional)")?;

    let subject = ask(input, output, "Subject")?;
    if subject.is_empty() {
        return Err(anyhow!("Subject must not be empty"));
    }

    let body = ask(input, output, "Body (optional)")?;

    let issue_prompt = match default_issue {
        Some(issue) => format!("Issue [{}]", issue),
        None => "Issue (optional)".to_string(),
    };
    let issue = ask(input, output, &issue_prompt)?;
    let issue = if issue.is_empty() {
        default_issue.map(str::to_string)
    } else {
        Some(issue)
    };

    let breaking = ask(input, output, "Breaking change? (y/N)")?.to_lowercase();
    let breaking = breaking == "y" || breaking == "yes";

    let mut commit = ParsedCommit::new(commit_type, subject);
    if !scope.is_empty() {
        commit = commit.with_scope(scope);
    }
    if !body.is_empty() {
        commit = commit.with_body(body);
    }
    if let Some(issue) = issue {
        commit = commit.with_issue(issue);
    }
    if breaking {
        let description = ask(input, output, "Breaking change description (optional)")?;
        commit = commit.with_breaking_change(description);
    }
    Ok(commit)
}

/// [`prompt_commit`] on the terminal
pub fn prompt_commit_interactive(
    types: &[String],
    default_issue: Option<&str>,
) -> Result<ParsedCommit> {
    let stdin = io::stdin();
    prompt_commit(&mut stdin.lock(), &mut io::stdout(), types, default_issue)
}

/// Prompts user to confirm an action with a yes/no prompt.
///
/// Default is "yes" if user presses Enter.
pub fn confirm_action(prompt: &str) -> Result<bool> {
    print!("\n{} (Y/n): ", prompt);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    let response = input.trim().to_lowercase();
    Ok(!(response == "n" || response == "no"))
}
