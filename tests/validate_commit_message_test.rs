// tests/validate_commit_message_test.rs
use git_semver::cli::{ValidateArgs, Workflow};
use git_semver::config::Config;
use git_semver::git::MockRepository;
use std::fs;
use tempfile::TempDir;

fn config() -> Config {
    let mut config = Config::default();
    config.commit_message.issue.regex = "[A-Z]+-[0-9]+".to_string();
    config
}

fn workflow(branch: &str, detached: bool) -> Workflow<MockRepository> {
    let mut repo = MockRepository::new();
    repo.set_branch(branch);
    repo.set_detached(detached);
    Workflow::new(config(), repo).unwrap()
}

fn message_file(content: &str) -> (TempDir, ValidateArgs) {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("COMMIT_EDITMSG"), content).unwrap();
    let args = ValidateArgs {
        path: dir.path().to_string_lossy().into_owned(),
        file: "COMMIT_EDITMSG".to_string(),
        source: None,
    };
    (dir, args)
}

fn read(dir: &TempDir) -> String {
    fs::read_to_string(dir.path().join("COMMIT_EDITMSG")).unwrap()
}

#[test]
fn test_valid_message_gets_issue_footer() {
    let (dir, args) = message_file("feat: add login\n");
    workflow("feature/JIRA-42-login", false)
        .validate_commit_message(&args)
        .unwrap();
    assert_eq!(read(&dir), "feat: add login\n\nrefs: JIRA-42\n");
}

#[test]
fn test_existing_footer_block_is_extended() {
    let (dir, args) = message_file("fix: crash\n\nReviewed-by: Z\n");
    workflow("JIRA-7", false).validate_commit_message(&args).unwrap();
    assert_eq!(read(&dir), "fix: crash\n\nReviewed-by: Z\nrefs: JIRA-7\n");
}

#[test]
fn test_message_with_issue_is_left_alone() {
    let original = "fix: crash\n\nRefs: JIRA-1\n";
    let (dir, args) = message_file(original);
    workflow("bugfix/JIRA-9", false)
        .validate_commit_message(&args)
        .unwrap();
    assert_eq!(read(&dir), original);
}

#[test]
fn test_branch_without_issue_is_a_soft_condition() {
    let original = "docs: readme\n";
    let (dir, args) = message_file(original);
    workflow("feature/readme", false)
        .validate_commit_message(&args)
        .unwrap();
    assert_eq!(read(&dir), original);
}

#[test]
fn test_invalid_type_fails() {
    let (_dir, args) = message_file("feature: add login\n");
    let result = workflow("feature/JIRA-1", false).validate_commit_message(&args);
    assert!(result.is_err());
}

#[test]
fn test_git_comment_lines_are_ignored() {
    let (_dir, args) = message_file(
        "feat: add login\n# Please enter the commit message for your changes.\n# On branch x\n",
    );
    workflow("feature/x", false)
        .validate_commit_message(&args)
        .unwrap();
}

#[test]
fn test_skipped_branches_and_sources() {
    let (dir, args) = message_file("not conventional at all\n");
    workflow("main", false).validate_commit_message(&args).unwrap();
    workflow("feature/JIRA-1", true)
        .validate_commit_message(&args)
        .unwrap();

    let merge = ValidateArgs {
        source: Some("merge".to_string()),
        ..args.clone()
    };
    workflow("feature/JIRA-1", false)
        .validate_commit_message(&merge)
        .unwrap();
    assert_eq!(read(&dir), "not conventional at all\n");

    assert!(workflow("feature/JIRA-1", false)
        .validate_commit_message(&args)
        .is_err());
}

#[test]
fn test_missing_file_fails() {
    let dir = TempDir::new().unwrap();
    let args = ValidateArgs {
        path: dir.path().to_string_lossy().into_owned(),
        file: "MISSING".to_string(),
        source: None,
    };
    assert!(workflow("feature/JIRA-1", false)
        .validate_commit_message(&args)
        .is_err());
}
