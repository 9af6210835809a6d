//! Structured changelog data model.
use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::origin::{Issue, ItemRef, RefKind};

/// One version section of the changelog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReleaseEntry {
    /// Semantic version string without a leading "v", possibly carrying
    /// a prerelease suffix.
    pub version: String,
    pub date: NaiveDate,
    /// Link to the diff against the previous version; empty when the
    /// heading carried no URL.
    pub compare_url: String,
    /// Section name to changes, in first-appearance order.
    pub changes: IndexMap<String, Vec<Change>>,
}

/// One bullet item under a section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Change {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub scope: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub commit: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub commit_body: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub related_items: Vec<RelatedItem>,
}

/// An issue or pull request referenced by a change. Title and body are
/// present only when the reference was resolved against the origin
/// provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelatedItem {
    pub kind: RefKind,
    pub number: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

impl RelatedItem {
    /// A bare, unresolved reference.
    pub fn bare(item: ItemRef) -> Self {
        Self {
            kind: item.kind,
            number: item.number,
            title: None,
            body: None,
        }
    }

    /// A reference resolved into full issue details.
    pub fn resolved(item: ItemRef, issue: Issue) -> Self {
        Self {
            kind: item.kind,
            number: item.number,
            title: Some(issue.title),
            body: Some(issue.body),
        }
    }
}
