//! Frontmatter parsing for post sources.

use std::path::Path;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, de::Error as _};

use crate::error::{CoreError, Result};

/// Frontmatter metadata for a post.
///
/// Accepts both the camelCase keys used by JavaScript content collections
/// (`pubDate`, `updatedDate`) and their snake_case forms.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Frontmatter {
    /// Post title.
    #[serde(default)]
    pub title: String,

    /// Explicit slug, overriding the one derived from the file name.
    #[serde(default)]
    pub slug: Option<String>,

    /// Post description.
    #[serde(default)]
    pub description: Option<String>,

    /// Tags for the post.
    #[serde(default)]
    pub tags: Vec<String>,

    /// Publication date.
    #[serde(
        default,
        alias = "pubDate",
        alias = "date",
        deserialize_with = "deserialize_date"
    )]
    pub pub_date: Option<DateTime<Utc>>,

    /// Last updated date.
    #[serde(
        default,
        alias = "updatedDate",
        alias = "updated",
        deserialize_with = "deserialize_date"
    )]
    pub updated_date: Option<DateTime<Utc>>,

    /// Whether this is a draft.
    #[serde(default)]
    pub draft: bool,
}

/// Delimiter types for frontmatter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrontmatterFormat {
    /// YAML frontmatter delimited by `---`.
    Yaml,
    /// TOML frontmatter delimited by `+++`.
    Toml,
}

impl FrontmatterFormat {
    /// Get the delimiter string for this format.
    pub fn delimiter(&self) -> &'static str {
        match self {
            Self::Yaml => "---",
            Self::Toml => "+++",
        }
    }
}

/// Split content into frontmatter and body.
///
/// The closing delimiter must start a line.
pub fn split_frontmatter(content: &str) -> Option<(FrontmatterFormat, &str, &str)> {
    let content = content.trim_start_matches('\u{feff}').trim_start();

    let format = if content.starts_with("---") {
        FrontmatterFormat::Yaml
    } else if content.starts_with("+++") {
        FrontmatterFormat::Toml
    } else {
        return None;
    };

    let delimiter = format.delimiter();
    let after_first = &content[delimiter.len()..];
    let closing = format!("\n{delimiter}");
    let closing_pos = after_first.find(&closing)?;

    let frontmatter = after_first[..closing_pos].trim();
    let body = after_first[closing_pos + closing.len()..].trim_start();

    Some((format, frontmatter, body))
}

/// Parse the frontmatter block of a post source.
///
/// A source without frontmatter is an error: every post needs at least a
/// title and a publication date.
pub fn parse_frontmatter(content: &str, path: &Path) -> Result<Frontmatter> {
    let Some((format, fm_str, _body)) = split_frontmatter(content) else {
        return Err(CoreError::frontmatter(path, "missing frontmatter block"));
    };

    match format {
        FrontmatterFormat::Yaml => {
            serde_yaml::from_str(fm_str).map_err(|e| CoreError::frontmatter(path, e.to_string()))
        }
        FrontmatterFormat::Toml => {
            let mut value: toml::Value =
                toml::from_str(fm_str).map_err(|e| CoreError::frontmatter(path, e.to_string()))?;
            stringify_datetimes(&mut value);
            Frontmatter::deserialize(value).map_err(|e| CoreError::frontmatter(path, e.to_string()))
        }
    }
}

/// Replace native TOML datetimes with their string form so that both
/// frontmatter formats share one date parser.
fn stringify_datetimes(value: &mut toml::Value) {
    match value {
        toml::Value::Datetime(dt) => *value = toml::Value::String(dt.to_string()),
        toml::Value::Table(table) => table.iter_mut().for_each(|(_, v)| stringify_datetimes(v)),
        toml::Value::Array(items) => items.iter_mut().for_each(stringify_datetimes),
        _ => {}
    }
}

/// Parse a frontmatter date.
///
/// Accepts RFC 3339 timestamps, naive timestamps (taken as UTC) and bare
/// `YYYY-MM-DD` dates (UTC midnight).
pub fn parse_date(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

fn deserialize_date<'de, D>(deserializer: D) -> std::result::Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(raw) = Option::<String>::deserialize(deserializer)? else {
        return Ok(None);
    };

    parse_date(&raw)
        .map(Some)
        .ok_or_else(|| D::Error::custom(format!("invalid date `{raw}`")))
}
