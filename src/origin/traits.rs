//! Traits related to remote issue providers
use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

use crate::{
    error::Result,
    origin::{Issue, ItemRef},
};

#[cfg_attr(test, automock)]
#[async_trait]
pub trait IssueProvider: Send + Sync {
    /// Resolve a referenced item against the provider's API. A 404
    /// response is a soft miss and resolves to `Ok(None)`.
    async fn get_issue(&self, item: ItemRef) -> Result<Option<Issue>>;
}
