//! Implements the IssueProvider trait for GitHub
use async_trait::async_trait;
use git_url_parse::GitUrl;
use log::*;
use reqwest::{
    Client, StatusCode,
    header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue, USER_AGENT},
};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::{
    error::{ClparseError, Result},
    origin::{Issue, ItemRef, traits::IssueProvider},
};

#[derive(Debug, Deserialize)]
struct GithubIssue {
    number: u64,
    title: String,
    body: Option<String>,
}

/// GitHub provider using the REST issues endpoint. Pull requests share
/// the issue numbering space on GitHub, so both kinds resolve through
/// the same endpoint.
pub struct Github {
    client: Client,
    owner: String,
    repo: String,
}

impl Github {
    /// Create a GitHub client with default headers and optional bearer
    /// token authentication.
    pub fn new(parsed: &GitUrl, token: SecretString) -> Result<Self> {
        let owner = parsed.owner.clone().ok_or_else(|| {
            ClparseError::provider("unable to parse owner from github repo")
        })?;

        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github.v3+json"),
        );
        headers.insert(USER_AGENT, HeaderValue::from_static("clparse"));

        let token = token.expose_secret();
        if !token.is_empty() {
            let mut value =
                HeaderValue::from_str(format!("Bearer {token}").as_str())?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let client = Client::builder().default_headers(headers).build()?;

        Ok(Self {
            client,
            owner,
            repo: parsed.name.clone(),
        })
    }

    fn issue_url(&self, number: u64) -> String {
        format!(
            "https://api.github.com/repos/{}/{}/issues/{}",
            self.owner, self.repo, number
        )
    }
}

#[async_trait]
impl IssueProvider for Github {
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

        let issue: GithubIssue = response.json().await?;

        Ok(Some(Issue {
            number: issue.number,
            title: issue.title,
            body: issue.body.unwrap_or_default(),
        }))
    }
}
