//! Front-matter splitting.
//!
//! A file opens with front matter when its first line is a delimiter:
//!
//! - `---` starts a YAML block closed by the next `---` line
//! - `+++` starts a TOML block closed by the next `+++` line
//!
//! The body begins on the line after the closing delimiter.

use serde_json::{Map, Value};

use crate::error::{LoaderError, Result};

/// Result of splitting raw text into metadata and body.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Parsed {
    pub data: Map<String, Value>,
    pub content: String,
    /// True when a delimited block was found, even if it was empty.
    pub has_front_matter: bool,
}

impl Parsed {
    fn plain(text: &str) -> Self {
        Self {
            data: Map::new(),
            content: text.to_string(),
            has_front_matter: false,
        }
    }
}

pub trait FrontMatterParser {
    /// `origin` names the source in error messages.
    fn parse(&self, origin: &str, raw: &str) -> Result<Parsed>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Yaml,
    Toml,
}

impl Format {
    fn delimiter(self) -> &'static str {
        match self {
            Format::Yaml => "---",
            Format::Toml => "+++",
        }
    }
}

/// YAML/TOML front-matter parser.
#[derive(Debug, Clone, Copy, Default)]
pub struct MatterParser;

impl FrontMatterParser for MatterParser {
    fn parse(&self, origin: &str, raw: &str) -> Result<Parsed> {
        let Some((format, block, body)) = split_block(raw) else {
            return Ok(Parsed::plain(raw));
        };

        let data = match format {
            Format::Yaml => parse_yaml(origin, block)?,
            Format::Toml => parse_toml(origin, block)?,
        };

        Ok(Parsed {
            data,
            content: body.to_string(),
            has_front_matter: true,
        })
    }
}

/// Locate a delimited block at the very start of `raw`.
fn split_block(raw: &str) -> Option<(Format, &str, &str)> {
    let first_end = raw.find('\n').unwrap_or(raw.len());
    let first = raw[..first_end].trim_end_matches('\r');
    let format = match first.trim_end() {
        "---" => Format::Yaml,
        "+++" => Format::Toml,
        _ => return None,
    };

    // Offset of the line after the opening delimiter.
    let block_start = (first_end + 1).min(raw.len());
    let mut line_start = block_start;
    while line_start < raw.len() {
        let line_end = raw[line_start..]
            .find('\n')
            .map(|i| line_start + i)
            .unwrap_or(raw.len());
        let line = raw[line_start..line_end].trim_end_matches('\r');
        if line.trim_end() == format.delimiter() {
            let body_start = (line_end + 1).min(raw.len());
            return Some((format, &raw[block_start..line_start], &raw[body_start..]));
        }
        line_start = line_end + 1;
    }

    None
}

fn parse_yaml(origin: &str, block: &str) -> Result<Map<String, Value>> {
    if block.trim().is_empty() {
        return Ok(Map::new());
    }
    let value: Value = serde_yaml::from_str(block).map_err(|e| LoaderError::FrontMatter {
        path: origin.to_string(),
        message: e.to_string(),
    })?;
    into_mapping(origin, value)
}

fn parse_toml(origin: &str, block: &str) -> Result<Map<String, Value>> {
    let table: toml::Table = toml::from_str(block).map_err(|e| LoaderError::FrontMatter {
        path: origin.to_string(),
        message: e.to_string(),
    })?;
    let value = serde_json::to_value(table).map_err(|e| LoaderError::FrontMatter {
        path: origin.to_string(),
        message: e.to_string(),
    })?;
    into_mapping(origin, value)
}

fn into_mapping(origin: &str, value: Value) -> Result<Map<String, Value>> {
    match value {
        Value::Object(map) => Ok(map),
        Value::Null => Ok(Map::new()),
        other => Err(LoaderError::FrontMatter {
            path: origin.to_string(),
            message: format!("expected a mapping, found {}", crate::kind::classify(&other)),
        }),
    }
}
