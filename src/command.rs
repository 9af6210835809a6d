//! Top-level command execution.
use std::path::Path;

use chrono::{DateTime, Utc};
use log::*;
use secrecy::SecretString;

use crate::{
    cli::Args,
    error::{ClparseError, Result},
    origin, output,
    parser::{Changelog, Parser},
    vcs,
};

/// Run the parse command end to end: read the changelog, parse it with
/// the requested enrichments, filter, and print the rendered result to
/// stdout.
pub async fn execute(args: Args) -> Result<()> {
    args.validate()?;

    debug!("reading changelog from {}", args.path);
    let content = tokio::fs::read_to_string(&args.path).await?;

    let repo_path = Path::new(".");
    if (args.include_body || args.fetch_item_details)
        && !vcs::is_repository(repo_path)
    {
        return Err(ClparseError::NotARepository(
            repo_path.display().to_string(),
        ));
    }

    let mut parser = Parser::new()
        .with_repo_path(repo_path)
        .with_include_body(args.include_body);

    if args.fetch_item_details {
        let url = vcs::origin_url(repo_path)?;
        debug!("resolving issue details against {url}");
        let token = SecretString::from(args.token.clone());
        parser = parser.with_resolver(origin::resolver_for(&url, token)?);
    }

    let changelog = parser.parse(&content).await?;
    let changelog =
        apply_filters(changelog, args.last, args.since_days, Utc::now());

    let rendered = if args.latest {
        output::render_entry(changelog.latest()?, args.format)?
    } else if !args.release.is_empty() {
        output::render_entry(changelog.get(&args.release)?, args.format)?
    } else {
        output::render_entries(changelog.entries(), args.format)?
    };

    println!("{rendered}");

    Ok(())
}

/// Narrow the changelog to the `last` most recent entries or to entries
/// dated within the past `since_days` days. A zero value disables the
/// corresponding filter.
fn apply_filters(
    changelog: Changelog,
    last: usize,
    since_days: u64,
    now: DateTime<Utc>,
) -> Changelog {
    let mut entries = changelog.into_entries();

    if last > 0 && last < entries.len() {
        entries.truncate(last);
    }

    if since_days > 0 {
        let cutoff = now.date_naive() - chrono::Days::new(since_days);
        entries.retain(|entry| entry.date >= cutoff);
    }

    Changelog::new(entries)
}
