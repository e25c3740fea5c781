use thiserror::Error;

/// Unified error type for git-semver operations
#[derive(Error, Debug)]
pub enum GitSemverError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Version parsing error: {0}")]
    VersionParse(String),

    #[error("Invalid commit message: {0}")]
    Grammar(String),

    #[error("Invalid range: {0}")]
    Range(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration file error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience type alias for Results in git-semver
pub type Result<T> = std::result::Result<T, GitSemverError>;

impl GitSemverError {
    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        GitSemverError::Config(msg.into())
    }

    /// Create a version parsing error with context
    pub fn version(msg: impl Into<String>) -> Self {
        GitSemverError::VersionParse(msg.into())
    }

    /// Create a commit message grammar error with context
    pub fn grammar(msg: impl Into<String>) -> Self {
        GitSemverError::Grammar(msg.into())
    }

    /// Create a range selection error with context
    pub fn range(msg: impl Into<String>) -> Self {
        GitSemverError::Range(msg.into())
    }

    /// Create a not-found error with context
    pub fn not_found(msg: impl Into<String>) -> Self {
        GitSemverError::NotFound(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = GitSemverError::config("test config issue");
        assert_eq!(err.to_string(), "Configuration error: test config issue");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: GitSemverError = io_err.into();
        assert!(err.to_string().contains("I/O error"));
    }

    #[test]
    fn test_error_from_git2() {
        let err: GitSemverError = git2::Error::from_str("bad object").into();
        assert!(err.to_string().starts_with("Git operation failed"));
        assert!(err.to_string().contains("bad object"));
    }

    #[test]
    fn test_error_messages_are_descriptive() {
        let error_pairs = vec![
            (GitSemverError::config("x"), "Configuration error"),
            (GitSemverError::version("x"), "Version parsing error"),
            (GitSemverError::grammar("x"), "Invalid commit message"),
            (GitSemverError::range("x"), "Invalid range"),
            (GitSemverError::not_found("x"), "Not found"),
        ];

        for (err, expected_prefix) in error_pairs {
            let msg = err.to_string();
            assert!(
                msg.starts_with(expected_prefix),
                "Error message should start with '{}', but got '{}'",
                expected_prefix,
                msg
            );
        }
    }

    #[test]
    fn test_error_special_characters_in_messages() {
        let special_chars = vec![
            "message with\nnewline",
            "message with 'quotes'",
            "message with unicode: ñ",
        ];

        for msg in special_chars {
            let err = GitSemverError::grammar(msg);
            assert!(err.to_string().contains(msg));
        }
    }
}
