//! Custom error types for clparse.
use thiserror::Error;

/// Main error type for clparse operations.
#[derive(Error, Debug)]
pub enum ClparseError {
    // Cli args errors
    #[error("invalid arguments: {0}")]
    InvalidArgs(String),

    // Changelog format errors
    #[error("invalid date format: {0}")]
    InvalidDate(#[from] chrono::ParseError),

    // Lookup errors on a parsed changelog
    #[error("no changelog entries found")]
    NoEntries,

    #[error("version {0} not found in changelog")]
    VersionNotFound(String),

    // Local repository errors
    #[error("not a git repository: {0}")]
    NotARepository(String),

    #[error("no origin remote configured")]
    NoOriginRemote,

    #[error("failed to get commit {sha}: {source}")]
    CommitLookup {
        sha: String,
        #[source]
        source: git2::Error,
    },

    #[error("git operation failed: {0}")]
    GitError(#[from] git2::Error),

    #[error("git URL parse error: {0}")]
    GitUrlError(#[from] git_url_parse::GitUrlParseError),

    // Issue provider errors
    #[error("unsupported git provider for URL: {0}")]
    UnsupportedProvider(String),

    #[error("failed to get issue details: {0}")]
    ProviderError(String),

    #[error("network request failed: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("invalid header value: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),

    #[error("URL parse error: {0}")]
    UrlError(#[from] url::ParseError),

    // Parsing/serialization errors
    #[error("regular expression error: {0}")]
    RegexError(#[from] regex::Error),

    #[error("JSON serialization failed: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("YAML serialization failed: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("TOML serialization failed: {0}")]
    TomlError(#[from] toml::ser::Error),

    #[error("logger initialization error: {0}")]
    LoggerError(#[from] log::SetLoggerError),

    // Generic wrapper for other errors
    #[error(transparent)]
    Other(#[from] color_eyre::Report),
}

/// Result type alias using ClparseError
pub type Result<T> = std::result::Result<T, ClparseError>;

impl ClparseError {
    /// Create an invalid arguments error
    pub fn invalid_args(msg: impl Into<String>) -> Self {
        Self::InvalidArgs(msg.into())
    }

    /// Create an issue provider error with context
    pub fn provider(msg: impl Into<String>) -> Self {
        Self::ProviderError(msg.into())
    }

    /// Create a commit lookup error for a sha
    pub fn commit_lookup(sha: impl Into<String>, source: git2::Error) -> Self {
        Self::CommitLookup {
            sha: sha.into(),
            source,
        }
    }
}

// Implement From for std::io::Error - wraps in Other variant for generic I/O errors
impl From<std::io::Error> for ClparseError {
    fn from(err: std::io::Error) -> Self {
        Self::Other(color_eyre::Report::from(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_formats() {
        let err = ClparseError::invalid_args("--latest cannot be combined with --release");
        assert_eq!(
            err.to_string(),
            "invalid arguments: --latest cannot be combined with --release"
        );

        let err = ClparseError::VersionNotFound("3.0.0".into());
        assert_eq!(err.to_string(), "version 3.0.0 not found in changelog");

        let err = ClparseError::NoEntries;
        assert_eq!(err.to_string(), "no changelog entries found");
    }

    #[test]
    fn test_error_helpers() {
        let err = ClparseError::provider("bad response");
        assert!(matches!(err, ClparseError::ProviderError(_)));

        let err = ClparseError::invalid_args("conflict");
        assert!(matches!(err, ClparseError::InvalidArgs(_)));
    }

    #[test]
    fn test_from_conversions() {
        let date_err = chrono::NaiveDate::parse_from_str("not-a-date", "%Y-%m-%d");
        assert!(date_err.is_err());
        let err: ClparseError = date_err.unwrap_err().into();
        assert!(matches!(err, ClparseError::InvalidDate(_)));
    }
}
