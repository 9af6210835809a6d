//! Implements the IssueProvider trait for Azure DevOps
use async_trait::async_trait;
use base64::{Engine, prelude::BASE64_STANDARD};
use log::*;
use regex::Regex;
use reqwest::{
    Client, StatusCode,
    header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue},
};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::{
    error::{ClparseError, Result},
    origin::{Issue, ItemRef, RefKind, traits::IssueProvider},
};

#[derive(Debug, Deserialize)]
struct WorkItemFields {
    #[serde(rename = "System.Title", default)]
    title: String,
    #[serde(rename = "System.Description", default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct WorkItem {
    id: u64,
    fields: WorkItemFields,
}

#[derive(Debug, Deserialize)]
struct AzurePullRequest {
    #[serde(rename = "pullRequestId")]
    id: u64,
    title: String,
    #[serde(default)]
    description: String,
}

/// Azure DevOps provider. Issues resolve through the work-items
/// endpoint, pull requests through the git pullrequests endpoint, both
/// keyed by organization.
pub struct AzureDevOps {
    client: Client,
    org: String,
}

impl AzureDevOps {
    /// Create an Azure DevOps client using Basic auth with an
    /// empty-username token.
    pub fn new(url: &str, token: SecretString) -> Result<Self> {
        let org = parse_organization(url).ok_or_else(|| {
            ClparseError::provider(
                "unable to parse organization from azure devops repo",
            )
        })?;

        let mut headers = HeaderMap::new();
        headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );

        let token = token.expose_secret();
        if !token.is_empty() {
            let encoded = BASE64_STANDARD.encode(format!(":{token}"));
            let mut value =
                HeaderValue::from_str(format!("Basic {encoded}").as_str())?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let client = Client::builder().default_headers(headers).build()?;

        Ok(Self { client, org })
    }

    fn item_url(&self, item: ItemRef) -> String {
        match item.kind {
            RefKind::PullRequest => format!(
                "https://dev.azure.com/{}/_apis/git/pullrequests/{}?api-version=7.1",
                self.org, item.number
            ),
            RefKind::Issue => format!(
                "https://dev.azure.com/{}/_apis/wit/workitems/{}?api-version=7.1",
                self.org, item.number
            ),
        }
    }
}

#[async_trait]
impl IssueProvider for AzureDevOps {
    async fn get_issue(&self, item: ItemRef) -> Result<Option<Issue>> {
        let url = self.item_url(item);
        debug!("fetching work item details: {url}");

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

        let issue = match item.kind {
            RefKind::PullRequest => {
                let pr: AzurePullRequest = response.json().await?;
                Issue {
                    number: pr.id,
                    title: pr.title,
                    body: clean_description(&pr.description)?,
                }
            }
            RefKind::Issue => {
                let work_item: WorkItem = response.json().await?;
                Issue {
                    number: work_item.id,
                    title: work_item.fields.title,
                    body: clean_description(&work_item.fields.description)?,
                }
            }
        };

        Ok(Some(issue))
    }
}

/// Strip HTML markup and entities from a work-item description.
fn clean_description(description: &str) -> Result<String> {
    let unescaped = description
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&nbsp;", " ")
        .replace("&amp;", "&");

    let tags = Regex::new(r"<[^>]*>")?;
    Ok(tags.replace_all(&unescaped, "").trim().to_string())
}

/// Extract the organization name from an Azure DevOps remote URL.
fn parse_organization(url: &str) -> Option<String> {
    let url = url.strip_suffix('/').unwrap_or(url);
    let url = url.strip_suffix(".git").unwrap_or(url);

    if let Some(rest) = url.strip_prefix("git@ssh.dev.azure.com:v3/") {
        return rest
            .split('/')
            .next()
            .filter(|org| !org.is_empty())
            .map(str::to_string);
    }

    let mut parts = url.split('/');
    while let Some(part) = parts.next() {
        if part == "dev.azure.com" {
            return parts.next().map(str::to_string);
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_organization_from_https_url() {
        let org =
            parse_organization("https://dev.azure.com/org/project/_git/repo");
        assert_eq!(org.as_deref(), Some("org"));
    }

    #[test]
    fn parses_organization_from_ssh_url() {
        let org =
            parse_organization("git@ssh.dev.azure.com:v3/org/project/repo");
        assert_eq!(org.as_deref(), Some("org"));
    }

    #[test]
    fn returns_none_for_other_hosts() {
        let org = parse_organization("https://github.com/owner/repo");
        assert_eq!(org, None);
    }

    #[test]
    fn builds_work_item_and_pull_request_urls() {
        let azure = AzureDevOps::new(
            "https://dev.azure.com/org/project/_git/repo",
            SecretString::from("".to_string()),
        )
        .unwrap();

        assert_eq!(
            azure.item_url(ItemRef {
                kind: RefKind::Issue,
                number: 7
            }),
            "https://dev.azure.com/org/_apis/wit/workitems/7?api-version=7.1"
        );
        assert_eq!(
            azure.item_url(ItemRef {
                kind: RefKind::PullRequest,
                number: 9
            }),
            "https://dev.azure.com/org/_apis/git/pullrequests/9?api-version=7.1"
        );
    }

    #[test]
    fn cleans_html_from_descriptions() {
        let cleaned = clean_description(
            "&lt;div&gt;Fix the &amp;quot;thing&amp;quot;&lt;/div&gt; ",
        )
        .unwrap();
        assert_eq!(cleaned, "Fix the &quot;thing&quot;");

        let cleaned =
            clean_description("<p>plain <b>bold</b> text</p>").unwrap();
        assert_eq!(cleaned, "plain bold text");
    }
}
