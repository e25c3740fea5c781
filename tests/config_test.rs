// tests/config_test.rs
use git_semver::config::{load_config, Config, CONFIG_FILE_NAME};
use git_semver::GitSemverError;
use serial_test::serial;
use std::env;
use std::io::Write;
use tempfile::{NamedTempFile, TempDir};

#[test]
fn test_default_values() {
    let config = Config::default();
    assert_eq!(config.tag.pattern, "v{version}");
    assert!(config.commit_message.types.contains(&"feat".to_string()));
    assert_eq!(config.commit_message.issue.key, "refs");
    assert_eq!(config.versioning.update_patch, vec!["fix", "perf"]);
    assert!(config.versioning.initial_development);
    assert_eq!(config.branches.skip, vec!["master", "main", "developer"]);
    assert_eq!(config.release_notes.sections[0].title, "Features");
}

#[test]
fn test_load_from_file() {
    let mut temp_file = NamedTempFile::new().unwrap();
    let toml_content = r#"
[tag]
pattern = "release-{version}"

[commit_message]
types = ["feat", "fix", "chore"]

[commit_message.issue]
regex = "[A-Z]+-[0-9]+"

[versioning]
update_patch = ["fix"]

[[release_notes.sections]]
type = "fix"
title = "Fixes"
"#;
    temp_file.write_all(toml_content.as_bytes()).unwrap();
    temp_file.flush().unwrap();

    let config = load_config(Some(temp_file.path().to_str().unwrap())).unwrap();
    assert_eq!(config.tag.pattern, "release-{version}");
    assert_eq!(config.commit_message.types, vec!["feat", "fix", "chore"]);
    assert_eq!(config.commit_message.issue.regex, "[A-Z]+-[0-9]+");
    assert_eq!(config.commit_message.issue.key, "refs");
    assert_eq!(config.release_notes.sections.len(), 1);
    assert_eq!(config.release_notes.breaking_change_title, "Breaking Changes");
}

#[test]
fn test_invalid_file_is_rejected() {
    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file
        .write_all(b"[versioning]\nupdate_minor = [\"feature\"]\n")
        .unwrap();
    temp_file.flush().unwrap();

    let result = load_config(Some(temp_file.path().to_str().unwrap()));
    assert!(matches!(result, Err(GitSemverError::Config(_))));
}

#[test]
fn test_missing_explicit_file_is_an_error() {
    let result = load_config(Some("does/not/exist/gitsemver.toml"));
    assert!(matches!(result, Err(GitSemverError::Io(_))));
}

#[test]
fn test_default_config_survives_toml_round_trip() {
    let text = Config::default().to_toml().unwrap();
    let config = Config::from_toml(&text).unwrap();
    assert_eq!(config, Config::default());
}

#[test]
#[serial]
fn test_load_from_current_directory() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join(CONFIG_FILE_NAME),
        "[branches]\nskip = [\"release/*\"]\n",
    )
    .unwrap();

    let original = env::current_dir().unwrap();
    env::set_current_dir(dir.path()).unwrap();
    let result = load_config(None);
    env::set_current_dir(original).unwrap();

    let config = result.unwrap();
    assert_eq!(config.branches.skip, vec!["release/*"]);
}
