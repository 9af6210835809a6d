//! Line classification for the changelog grammar.
//!
//! Each trimmed, non-empty input line is classified into exactly one of
//! the `Line` variants. Change bullets are decomposed here into their
//! named parts so the state machine in the parent module never touches
//! positional capture groups.
use chrono::NaiveDate;
use regex::Regex;

use crate::{
    error::Result,
    origin::{ItemRef, RefKind},
    vcs,
};

/// Version heading: `## [v1.2.3](compare-url) (2025-01-01)`. Brackets,
/// the leading "v", the compare URL and the prerelease suffix are all
/// optional.
pub const VERSION_PATTERN: &str = r"^## \[?v?(?P<version>[\d.]+(?:-[a-zA-Z0-9]+(?:\.[0-9]+)?)?)\]?(?:\((?P<url>[^)]*)\))? \((?P<date>\d{4}-\d{2}-\d{2})\)";

/// Trailing `, closes #123` style suffix stripped from change lines.
pub const CLOSES_PATTERN: &str = r",\s*closes\b.*$";

/// One classified input line.
#[derive(Debug, Clone, PartialEq)]
pub enum Line {
    VersionHeading {
        version: String,
        compare_url: String,
        date: NaiveDate,
    },
    SectionHeading(String),
    Change(ChangeLine),
    Ignored,
}

/// The named parts of a matched change bullet.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChangeLine {
    pub scope: String,
    pub description: String,
    /// Full lowercase sha extracted from a trailing commit link; empty
    /// when the annotation's last path segment is not a valid sha.
    pub commit: String,
    /// A bare `(#123)` / `(!45)` trailing annotation.
    pub bare_ref: Option<ItemRef>,
}

/// Compiled patterns for classifying lines.
pub struct LineClassifier {
    version: Regex,
    closes: Regex,
}

impl LineClassifier {
    pub fn new() -> Result<Self> {
        Ok(Self {
            version: Regex::new(VERSION_PATTERN)?,
            closes: Regex::new(CLOSES_PATTERN)?,
        })
    }

    /// Classify one trimmed line. A version heading with a date that
    /// does not parse as a calendar date is a hard error; a bullet that
    /// does not match the change shape classifies as `Ignored`.
    pub fn classify(&self, line: &str) -> Result<Line> {
        if let Some(caps) = self.version.captures(line) {
            let date = NaiveDate::parse_from_str(&caps["date"], "%Y-%m-%d")?;
            let compare_url = caps
                .name("url")
                .map(|m| m.as_str().to_string())
                .unwrap_or_default();

            return Ok(Line::VersionHeading {
                version: caps["version"].to_string(),
                compare_url,
                date,
            });
        }

        if let Some(name) = line.strip_prefix("### ") {
            return Ok(Line::SectionHeading(name.trim().to_string()));
        }

        if let Some(rest) = line.strip_prefix("* ") {
            return Ok(match self.parse_change(rest) {
                Some(change) => Line::Change(change),
                None => Line::Ignored,
            });
        }

        Ok(Line::Ignored)
    }

    fn parse_change(&self, rest: &str) -> Option<ChangeLine> {
        let rest = rest.trim();
        let (scope, rest) = split_scope(rest);
        let rest = self.closes.replace(rest, "");
        let (description, annotation) = split_annotation(rest.trim_end());

        let description = description.trim().to_string();
        if description.is_empty() {
            return None;
        }

        let mut commit = String::new();
        let mut bare_ref = None;

        if let Some(annotation) = annotation {
            if let Some(item) = parse_bare_ref(annotation) {
                bare_ref = Some(item);
            } else {
                // treat the last path segment of a trailing link as a
                // commit sha candidate; anything else is dropped
                let candidate =
                    annotation.rsplit('/').next().unwrap_or(annotation);
                let candidate =
                    candidate.strip_suffix(')').unwrap_or(candidate);

                if vcs::is_valid_sha(candidate) {
                    commit = candidate.to_string();
                }
            }
        }

        Some(ChangeLine {
            scope,
            description,
            commit,
            bare_ref,
        })
    }
}

/// Split a leading `**scope**: ` marker off the bullet text.
fn split_scope(rest: &str) -> (String, &str) {
    if let Some(after) = rest.strip_prefix("**")
        && let Some(idx) = after.find("**: ")
    {
        return (after[..idx].to_string(), &after[idx + 4..]);
    }

    (String::new(), rest)
}

/// Split a trailing parenthetical annotation off the description.
fn split_annotation(rest: &str) -> (&str, Option<&str>) {
    if rest.ends_with(')')
        && let Some(open) = rest.find('(')
        && open > 0
    {
        return (&rest[..open], Some(&rest[open + 1..rest.len() - 1]));
    }

    (rest, None)
}

/// Parse a bare `#123` or `!45` annotation.
fn parse_bare_ref(annotation: &str) -> Option<ItemRef> {
    let (kind, digits) = if let Some(digits) = annotation.strip_prefix('#') {
        (RefKind::Issue, digits)
    } else if let Some(digits) = annotation.strip_prefix('!') {
        (RefKind::PullRequest, digits)
    } else {
        return None;
    };

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    digits.parse().ok().map(|number| ItemRef { kind, number })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> LineClassifier {
        LineClassifier::new().unwrap()
    }

    #[test]
    fn classifies_version_heading_with_url() {
        let line = "## [v1.0.0](https://x/compare/a...b) (2025-01-01)";
        let result = classifier().classify(line).unwrap();

        assert_eq!(
            result,
            Line::VersionHeading {
                version: "1.0.0".into(),
                compare_url: "https://x/compare/a...b".into(),
                date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            }
        );
    }

    #[test]
    fn classifies_version_heading_without_url_or_brackets() {
        let result = classifier().classify("## 1.0.0 (2025-01-01)").unwrap();

        assert_eq!(
            result,
            Line::VersionHeading {
                version: "1.0.0".into(),
                compare_url: "".into(),
                date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            }
        );
    }

    #[test]
    fn classifies_prerelease_version_heading() {
        let line = "## [v1.0.0-alpha.1](https://x/c) (2025-01-01)";
        let result = classifier().classify(line).unwrap();

        assert!(matches!(
            result,
            Line::VersionHeading { version, .. } if version == "1.0.0-alpha.1"
        ));
    }

    #[test]
    fn rejects_invalid_calendar_date() {
        let result = classifier().classify("## 1.0.0 (2025-13-40)");
        assert!(result.is_err());
    }

    #[test]
    fn classifies_section_heading() {
        let result = classifier().classify("### Bug Fixes").unwrap();
        assert_eq!(result, Line::SectionHeading("Bug Fixes".into()));
    }

    #[test]
    fn classifies_scoped_change_with_issue_ref() {
        let result =
            classifier().classify("* **api**: add endpoint (#123)").unwrap();

        assert_eq!(
            result,
            Line::Change(ChangeLine {
                scope: "api".into(),
                description: "add endpoint".into(),
                commit: "".into(),
                bare_ref: Some(ItemRef {
                    kind: RefKind::Issue,
                    number: 123
                }),
            })
        );
    }

    #[test]
    fn classifies_merge_request_ref() {
        let result = classifier().classify("* fix pipeline (!45)").unwrap();

        assert!(matches!(
            result,
            Line::Change(ChangeLine {
                bare_ref: Some(ItemRef {
                    kind: RefKind::PullRequest,
                    number: 45
                }),
                ..
            })
        ));
    }

    #[test]
    fn extracts_sha_from_commit_link() {
        let line = "* basic feature ([commit](https://github.com/user/repo/commit/8f5b75c6ba6c525e29463e2a96fec119e426e283))";
        let result = classifier().classify(line).unwrap();

        assert_eq!(
            result,
            Line::Change(ChangeLine {
                scope: "".into(),
                description: "basic feature".into(),
                commit: "8f5b75c6ba6c525e29463e2a96fec119e426e283".into(),
                bare_ref: None,
            })
        );
    }

    #[test]
    fn extracts_sha_from_bare_parenthetical() {
        let line =
            "* basic feature (1a196c09283903991da080552e3aa980ac64fec9)";
        let result = classifier().classify(line).unwrap();

        assert!(matches!(
            result,
            Line::Change(ChangeLine { commit, .. })
                if commit == "1a196c09283903991da080552e3aa980ac64fec9"
        ));
    }

    #[test]
    fn ignores_non_sha_link_target() {
        let line =
            "* some docs ([docs link text](https://example.com/docs))";
        let result = classifier().classify(line).unwrap();

        assert_eq!(
            result,
            Line::Change(ChangeLine {
                scope: "".into(),
                description: "some docs".into(),
                commit: "".into(),
                bare_ref: None,
            })
        );
    }

    #[test]
    fn strips_closes_suffix() {
        let result =
            classifier().classify("* fix crash (#12), closes #13").unwrap();

        assert_eq!(
            result,
            Line::Change(ChangeLine {
                scope: "".into(),
                description: "fix crash".into(),
                commit: "".into(),
                bare_ref: Some(ItemRef {
                    kind: RefKind::Issue,
                    number: 12
                }),
            })
        );
    }

    #[test]
    fn ignores_empty_bullet() {
        let result = classifier().classify("* ").unwrap();
        assert_eq!(result, Line::Ignored);
    }

    #[test]
    fn ignores_unrelated_prose() {
        let result = classifier().classify("Some free-form note").unwrap();
        assert_eq!(result, Line::Ignored);
    }
}
