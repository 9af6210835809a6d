//! Read-only access to the local git repository used for enrichment.
use std::path::Path;

use crate::error::{ClparseError, Result};

/// Check whether the given path can be opened as a git repository.
pub fn is_repository(path: &Path) -> bool {
    git2::Repository::open(path).is_ok()
}

/// Retrieve the commit message body for a sha, with the summary line
/// removed and leading/trailing blank lines trimmed. Single-line commit
/// messages yield an empty string.
pub fn commit_body(path: &Path, sha: &str) -> Result<String> {
    let repo = git2::Repository::open(path)
        .map_err(|_| ClparseError::NotARepository(path.display().to_string()))?;

    let oid = git2::Oid::from_str(sha)?;
    let commit = repo
        .find_commit(oid)
        .map_err(|source| ClparseError::commit_lookup(sha, source))?;

    let message = commit.message().unwrap_or_default();
    let mut lines: Vec<&str> = message.lines().skip(1).collect();

    while lines.first().is_some_and(|l| l.trim().is_empty()) {
        lines.remove(0);
    }
    while lines.last().is_some_and(|l| l.trim().is_empty()) {
        lines.pop();
    }

    Ok(lines.join("\n"))
}

/// Get the first configured URL of the "origin" remote.
pub fn origin_url(path: &Path) -> Result<String> {
    let repo = git2::Repository::open(path)
        .map_err(|_| ClparseError::NotARepository(path.display().to_string()))?;

    let remote = repo
        .find_remote("origin")
        .map_err(|_| ClparseError::NoOriginRemote)?;

    remote
        .url()
        .map(str::to_string)
        .ok_or(ClparseError::NoOriginRemote)
}

/// Structural check for a full commit sha: exactly 40 lowercase hex digits.
pub fn is_valid_sha(s: &str) -> bool {
    s.len() == 40 && s.chars().all(|c| matches!(c, '0'..='9' | 'a'..='f'))
}
