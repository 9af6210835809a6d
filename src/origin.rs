//! Issue and pull-request resolution against remote git providers.
//!
//! The provider is selected once, by inspecting the host of the
//! repository's origin URL. Lookups that 404 are soft misses and resolve
//! to `None`; any other failure aborts the parse.
use git_url_parse::GitUrl;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use crate::{
    error::{ClparseError, Result},
    origin::{azure::AzureDevOps, github::Github, gitlab::Gitlab},
};

pub mod azure;
pub mod github;
pub mod gitlab;
pub mod traits;

pub use traits::IssueProvider;

#[cfg(test)]
pub use traits::MockIssueProvider;

/// Kind of item referenced from a change: `#123` is an issue, `!45` is a
/// pull/merge request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RefKind {
    Issue,
    PullRequest,
}

/// A bare issue or pull-request reference found in changelog text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemRef {
    pub kind: RefKind,
    pub number: u64,
}

/// Normalized issue or pull-request record returned by any provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    pub number: u64,
    pub title: String,
    pub body: String,
}

/// Select an issue provider for the repository URL's host.
pub fn resolver_for(
    url: &str,
    token: SecretString,
) -> Result<Box<dyn IssueProvider>> {
    let parsed = GitUrl::parse(url)?;
    let host = parsed.host.clone().unwrap_or_default();

    if host.contains("github.com") {
        return Ok(Box::new(Github::new(&parsed, token)?));
    }

    if host.contains("gitlab.com") {
        return Ok(Box::new(Gitlab::new(&parsed, token)?));
    }

    if host.contains("dev.azure.com") {
        return Ok(Box::new(AzureDevOps::new(url, token)?));
    }

    Err(ClparseError::UnsupportedProvider(url.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token() -> SecretString {
        SecretString::from("test-token".to_string())
    }

    #[test]
    fn selects_github_provider() {
        let result = resolver_for("https://github.com/owner/repo", token());
        assert!(result.is_ok());
    }

    #[test]
    fn selects_gitlab_provider() {
        let result =
            resolver_for("https://gitlab.com/group/project.git", token());
        assert!(result.is_ok());
    }

    #[test]
    fn selects_azure_devops_provider() {
        let result = resolver_for(
            "https://dev.azure.com/org/project/_git/repo",
            token(),
        );
        assert!(result.is_ok());
    }

    #[test]
    fn rejects_unknown_host() {
        let result = resolver_for("https://example.com/owner/repo", token());
        assert!(matches!(
            result,
            Err(ClparseError::UnsupportedProvider(_))
        ));
    }
}
