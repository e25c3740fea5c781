// tests/git_repository_test.rs
use chrono::NaiveDate;
use git_semver::domain::{LogRange, TagPattern};
use git_semver::git::{Git2Repository, Repository};
use git_semver::grammar::FormattedMessage;
use git_semver::GitSemverError;
use tempfile::TempDir;

fn init_repo() -> (TempDir, Git2Repository) {
    let dir = TempDir::new().unwrap();
    let repo = git2::Repository::init(dir.path()).unwrap();
    {
        let mut config = repo.config().unwrap();
        config.set_str("user.name", "Test Author").unwrap();
        config.set_str("user.email", "test@example.com").unwrap();
    }
    repo.set_head("refs/heads/main").unwrap();
    (dir, Git2Repository::from_git2(repo))
}

fn commit(repo: &Git2Repository, header: &str) {
    repo.commit(&FormattedMessage {
        header: header.to_string(),
        body: String::new(),
        footer: String::new(),
    })
    .unwrap();
}

fn subjects(repo: &Git2Repository, range: &LogRange) -> Vec<String> {
    repo.log(range)
        .unwrap()
        .into_iter()
        .map(|c| c.message.trim_end().to_string())
        .collect()
}

fn pattern() -> TagPattern {
    TagPattern::new("v{version}").unwrap()
}

#[test]
fn test_empty_repository() {
    let (_dir, repo) = init_repo();
    assert_eq!(repo.last_tag(&pattern()).unwrap(), None);
    assert!(repo.tags(&pattern()).unwrap().is_empty());
    assert!(repo.log(&LogRange::since_tag(None)).unwrap().is_empty());
    assert_eq!(repo.branch().unwrap(), "main");
    assert!(!repo.is_detached().unwrap());
}

#[test]
fn test_tags_and_log_ranges() {
    let (_dir, repo) = init_repo();
    commit(&repo, "feat: first");
    repo.create_tag("v1.0.0", "Version 1.0.0").unwrap();
    commit(&repo, "fix: second");
    commit(&repo, "feat: third");
    repo.create_tag("v1.1.0", "Version 1.1.0").unwrap();
    commit(&repo, "docs: fourth");
    repo.create_tag("not-a-version", "ignored").unwrap();

    assert_eq!(repo.last_tag(&pattern()).unwrap().as_deref(), Some("v1.1.0"));

    let names: Vec<String> = repo
        .tags(&pattern())
        .unwrap()
        .into_iter()
        .map(|t| t.name)
        .collect();
    assert_eq!(names, vec!["v1.0.0", "v1.1.0"]);

    assert_eq!(
        subjects(&repo, &LogRange::since_tag(Some("v1.1.0"))),
        vec!["docs: fourth"]
    );
    assert_eq!(
        subjects(&repo, &LogRange::between_tags(Some("v1.0.0"), "v1.1.0")),
        vec!["feat: third", "fix: second"]
    );
    assert_eq!(
        subjects(&repo, &LogRange::between_tags(None, "v1.0.0")),
        vec!["feat: first"]
    );
}

#[test]
fn test_log_with_unknown_tag_is_not_found() {
    let (_dir, repo) = init_repo();
    commit(&repo, "feat: first");
    let result = repo.log(&LogRange::since_tag(Some("v9.9.9")));
    assert!(matches!(result, Err(GitSemverError::NotFound(_))));
}

#[test]
fn test_create_existing_tag_fails() {
    let (_dir, repo) = init_repo();
    commit(&repo, "feat: first");
    repo.create_tag("v0.1.0", "Version 0.1.0").unwrap();
    assert!(matches!(
        repo.create_tag("v0.1.0", "Version 0.1.0"),
        Err(GitSemverError::Git(_))
    ));
}

#[test]
fn test_commit_message_is_recorded() {
    let (_dir, repo) = init_repo();
    repo.commit(&FormattedMessage {
        header: "feat(auth): add login".to_string(),
        body: "Uses the new session store.".to_string(),
        footer: "refs: JIRA-7".to_string(),
    })
    .unwrap();

    let log = repo.log(&LogRange::since_tag(None)).unwrap();
    assert_eq!(log.len(), 1);
    assert_eq!(
        log[0].message,
        "feat(auth): add login\n\nUses the new session store.\n\nrefs: JIRA-7"
    );
    assert_eq!(log[0].hash.len(), 40);
}

#[test]
fn test_log_uses_author_date_in_author_timezone() {
    let dir = TempDir::new().unwrap();
    let raw = git2::Repository::init(dir.path()).unwrap();
    {
        // authored 2024-01-01 23:30 UTC at +02:00, committed 2024-03-01
        let author = git2::Signature::new("A", "a@example.com", &git2::Time::new(1_704_151_800, 120)).unwrap();
        let committer = git2::Signature::new("C", "c@example.com", &git2::Time::new(1_709_251_200, 0)).unwrap();
        let tree_id = raw.index().unwrap().write_tree().unwrap();
        let tree = raw.find_tree(tree_id).unwrap();
        raw.commit(Some("HEAD"), &author, &committer, "feat: old work", &tree, &[])
            .unwrap();
    }
    let repo = Git2Repository::from_git2(raw);

    let log = repo.log(&LogRange::since_tag(None)).unwrap();
    assert_eq!(log.len(), 1);
    assert_eq!(log[0].date, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());

    let january = LogRange::Date {
        start: NaiveDate::from_ymd_opt(2024, 1, 1),
        end: NaiveDate::from_ymd_opt(2024, 1, 31),
    };
    assert_eq!(subjects(&repo, &january), vec!["feat: old work"]);

    let march = LogRange::Date {
        start: NaiveDate::from_ymd_opt(2024, 3, 1),
        end: None,
    };
    assert!(subjects(&repo, &march).is_empty());
}
