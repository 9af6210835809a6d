//! Implements the IssueProvider trait for GitLab
use async_trait::async_trait;
use git_url_parse::GitUrl;
use log::*;
use reqwest::{
    Client, StatusCode,
    header::{HeaderMap, HeaderValue},
};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use url::form_urlencoded;

use crate::{
    error::{ClparseError, Result},
    origin::{Issue, ItemRef, traits::IssueProvider},
};

#[derive(Debug, Deserialize)]
struct GitlabIssue {
    iid: u64,
    title: String,
    description: Option<String>,
}

/// GitLab provider using the REST issues endpoint, keyed by the
/// URL-escaped namespaced project path.
pub struct Gitlab {
    client: Client,
    project: String,
}

impl Gitlab {
    /// Create a GitLab client with optional PRIVATE-TOKEN authentication.
    pub fn new(parsed: &GitUrl, token: SecretString) -> Result<Self> {
        let mut headers = HeaderMap::new();

        let token = token.expose_secret();
        if !token.is_empty() {
            let mut value = HeaderValue::from_str(token)?;
            value.set_sensitive(true);
            headers.insert("PRIVATE-TOKEN", value);
        }

        let client = Client::builder().default_headers(headers).build()?;

        Ok(Self {
            client,
            project: parsed.fullname.clone(),
        })
    }

    fn issue_url(&self, number: u64) -> String {
        let project: String =
            form_urlencoded::byte_serialize(self.project.as_bytes()).collect();
        format!(
            "https://gitlab.com/api/v4/projects/{}/issues/{}",
            project, number
        )
    }
}

#[async_trait]
impl IssueProvider for Gitlab {
    // GitLab merge requests use a separate iid space, but referenced
    // items resolve through the issues endpoint regardless of kind.
    async fn get_issue(&self, item: ItemRef) -> Result<Option<Issue>> {
        let url = self.issue_url(item.number);
        debug!("fetching issue details: {url}");

        let response = self.client.get(&url).send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        if !response.status().is_success() {
            return Err(ClparseError::provider(format!(
                "{url}: {}",
                response.status()
            )));
        }

        let issue: GitlabIssue = response.json().await?;

        Ok(Some(Issue {
            number: issue.iid,
            title: issue.title,
            body: issue.description.unwrap_or_default(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider_for(url: &str) -> Gitlab {
        let parsed = GitUrl::parse(url).unwrap();
        Gitlab::new(&parsed, SecretString::from("".to_string())).unwrap()
    }

    #[test]
    fn parses_project_from_https_url() {
        let gitlab = provider_for("https://gitlab.com/group/project");
        assert_eq!(gitlab.project, "group/project");
    }

    #[test]
    fn parses_project_from_ssh_url() {
        let gitlab = provider_for("git@gitlab.com:group/project.git");
        assert_eq!(gitlab.project, "group/project");
    }

    #[test]
    fn url_escapes_namespaced_project_path() {
        let gitlab = provider_for("https://gitlab.com/group/project");
        assert_eq!(
            gitlab.issue_url(42),
            "https://gitlab.com/api/v4/projects/group%2Fproject/issues/42"
        );
    }
}
