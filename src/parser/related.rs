//! Extraction of `#123` / `!45` references from change text.
use std::collections::HashSet;

use regex::Regex;

use crate::origin::{ItemRef, RefKind};

/// Issue (`#`) or pull/merge request (`!`) reference token.
pub const REF_PATTERN: &str = r"(?P<kind>[#!])(?P<number>\d+)";

/// Collects references in first-seen order, de-duplicated by number.
#[derive(Default)]
pub struct RefCollector {
    seen: HashSet<u64>,
    items: Vec<ItemRef>,
}

impl RefCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scan text for reference tokens, in order of appearance.
    pub fn scan(&mut self, pattern: &Regex, text: &str) {
        for caps in pattern.captures_iter(text) {
            let kind = if &caps["kind"] == "!" {
                RefKind::PullRequest
            } else {
                RefKind::Issue
            };

            if let Ok(number) = caps["number"].parse() {
                self.push(ItemRef { kind, number });
            }
        }
    }

    pub fn push(&mut self, item: ItemRef) {
        if self.seen.insert(item.number) {
            self.items.push(item);
        }
    }

    pub fn into_items(self) -> Vec<ItemRef> {
        self.items
    }
}
