//! The changelog parsing engine.
//!
//! A line tokenizer (`line`) feeds a small state machine that tracks the
//! open release entry and the active section. Matched change bullets are
//! optionally enriched with commit bodies from the local repository and
//! issue details from the origin provider, inline and in document order,
//! so output order is exactly input order.
use std::path::{Path, PathBuf};

use regex::Regex;

use crate::{
    error::{ClparseError, Result},
    origin::{IssueProvider, ItemRef},
    vcs,
};

mod line;
mod related;
pub mod types;


use line::{ChangeLine, Line, LineClassifier};
use related::{REF_PATTERN, RefCollector};

pub use types::{Change, RelatedItem, ReleaseEntry};

/// Top-level title line, ignored unconditionally.
const TITLE_LINE: &str = "# Changelog";

/// Changelog parser. Holds only configuration; each call to [`parse`]
/// produces a fresh [`Changelog`], so one parser can be reused across
/// documents.
///
/// [`parse`]: Parser::parse
pub struct Parser {
    repo_path: PathBuf,
    include_body: bool,
    resolver: Option<Box<dyn IssueProvider>>,
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser {
    pub fn new() -> Self {
        Self {
            repo_path: PathBuf::from("."),
            include_body: false,
            resolver: None,
        }
    }

    /// Set the local repository used for commit-body lookups.
    pub fn with_repo_path(mut self, path: impl AsRef<Path>) -> Self {
        self.repo_path = path.as_ref().to_path_buf();
        self
    }

    /// Enable commit-body enrichment for changes carrying a commit sha.
    pub fn with_include_body(mut self, include_body: bool) -> Self {
        self.include_body = include_body;
        self
    }

    /// Resolve related items against the given issue provider.
    pub fn with_resolver(mut self, resolver: Box<dyn IssueProvider>) -> Self {
        self.resolver = Some(resolver);
        self
    }

    /// Parse a changelog document into its release entries, in document
    /// order (newest release first by convention).
    pub async fn parse(&self, content: &str) -> Result<Changelog> {
        let classifier = LineClassifier::new()?;
        let refs = Regex::new(REF_PATTERN)?;

        let mut entries: Vec<ReleaseEntry> = Vec::new();
        let mut current: Option<ReleaseEntry> = None;
        let mut section = String::new();

        for raw in content.lines() {
            let trimmed = raw.trim();

            if trimmed.is_empty() || trimmed == TITLE_LINE {
                continue;
            }

            match classifier.classify(trimmed)? {
                Line::VersionHeading {
                    version,
                    compare_url,
                    date,
                } => {
                    if let Some(entry) = current.take() {
                        entries.push(entry);
                    }

                    current = Some(ReleaseEntry {
                        version,
                        date,
                        compare_url,
                        changes: indexmap::IndexMap::new(),
                    });
                    section.clear();
                }
                Line::SectionHeading(name) => {
                    section = name;
                }
                Line::Change(parsed) => {
                    // bullets outside an entry or section are dropped
                    if let Some(entry) = current.as_mut()
                        && !section.is_empty()
                    {
                        let change = self.build_change(parsed, &refs).await?;
                        entry
                            .changes
                            .entry(section.clone())
                            .or_default()
                            .push(change);
                    }
                }
                Line::Ignored => {}
            }
        }

        if let Some(entry) = current.take() {
            entries.push(entry);
        }

        Ok(Changelog::new(entries))
    }

    async fn build_change(
        &self,
        parsed: ChangeLine,
        refs: &Regex,
    ) -> Result<Change> {
        let mut collector = RefCollector::new();
        collector.scan(refs, &parsed.description);

        if let Some(item) = parsed.bare_ref {
            collector.push(item);
        }

        let mut commit_body = String::new();
        if self.include_body && !parsed.commit.is_empty() {
            commit_body = vcs::commit_body(&self.repo_path, &parsed.commit)?;
            collector.scan(refs, &commit_body);
        }

        let related_items = self.resolve(collector.into_items()).await?;

        Ok(Change {
            scope: parsed.scope,
            description: parsed.description,
            commit: parsed.commit,
            commit_body,
            related_items,
        })
    }

    /// Resolve references against the provider, one lookup at a time. A
    /// reference the provider cannot find degrades to a bare number.
    async fn resolve(&self, refs: Vec<ItemRef>) -> Result<Vec<RelatedItem>> {
        let mut items = Vec::with_capacity(refs.len());

        for item in refs {
            let resolved = match &self.resolver {
                Some(resolver) => resolver.get_issue(item).await?,
                None => None,
            };

            items.push(match resolved {
                Some(issue) => RelatedItem::resolved(item, issue),
                None => RelatedItem::bare(item),
            });
        }

        Ok(items)
    }
}

/// The parsed result: release entries in document order with read-only
/// lookups.
#[derive(Debug, Clone, PartialEq)]
pub struct Changelog {
    entries: Vec<ReleaseEntry>,
}

impl Changelog {
    pub fn new(entries: Vec<ReleaseEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[ReleaseEntry] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<ReleaseEntry> {
        self.entries
    }

    /// The topmost entry in the document, regardless of how version
    /// strings compare numerically.
    pub fn latest(&self) -> Result<&ReleaseEntry> {
        self.entries.first().ok_or(ClparseError::NoEntries)
    }

    /// Look up an entry by exact version string.
    pub fn get(&self, version: &str) -> Result<&ReleaseEntry> {
        self.entries
            .iter()
            .find(|entry| entry.version == version)
            .ok_or_else(|| ClparseError::VersionNotFound(version.to_string()))
    }
}
