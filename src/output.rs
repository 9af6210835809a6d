//! Rendering of parsed entries to the supported serialization formats.
use clap::ValueEnum;
use serde::Serialize;

use crate::{error::Result, parser::ReleaseEntry};

#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Json,
    Yaml,
    Toml,
}

/// Wrapper for list output. TOML cannot represent a top-level array, so
/// every format renders the list under a `releases` key.
#[derive(Serialize)]
struct ReleaseList<'a> {
    releases: &'a [ReleaseEntry],
}

/// Render a single release entry.
pub fn render_entry(entry: &ReleaseEntry, format: OutputFormat) -> Result<String> {
    render(entry, format)
}

/// Render the full list of release entries.
pub fn render_entries(
    entries: &[ReleaseEntry],
    format: OutputFormat,
) -> Result<String> {
    render(&ReleaseList { releases: entries }, format)
}

fn render<T: Serialize>(value: &T, format: OutputFormat) -> Result<String> {
    let rendered = match format {
        OutputFormat::Json => serde_json::to_string_pretty(value)?,
        OutputFormat::Yaml => serde_yaml::to_string(value)?,
        OutputFormat::Toml => toml::to_string_pretty(value)?,
    };

    Ok(rendered)
}
