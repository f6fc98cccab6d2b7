//! Codecs for the tree-shaped formats: JSON, TOML and YAML.

use serde_json::Value;

use super::{Contents, FormatOptions};
use crate::error::{CfgsError, Result};

/// Accept a parsed document only if its top level is a mapping.
///
/// A null document (`null`, `~`) counts as empty.
fn into_contents(format: &'static str, value: Value) -> Result<Contents> {
    match value {
        Value::Object(map) => Ok(map),
        Value::Null => Ok(Contents::new()),
        other => Err(CfgsError::parse(
            format,
            format!("expected a mapping at the top level, found {}", kind(&other)),
        )),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "a mapping",
    }
}

// ── JSON ───────────────────────────────────────────────────────────────────

pub(super) fn parse_json(text: &str) -> Result<Contents> {
    let value: Value = serde_json::from_str(text).map_err(|e| CfgsError::parse("json", e))?;
    into_contents("json", value)
}

pub(super) fn serialize_json(contents: &Contents, options: &FormatOptions) -> Result<String> {
    let text = if options.pretty {
        serde_json::to_string_pretty(contents).map(|mut text| {
            text.push('\n');
            text
        })
    } else {
        serde_json::to_string(contents)
    };
    text.map_err(|e| CfgsError::serialize("json", e))
}

// ── TOML ───────────────────────────────────────────────────────────────────

pub(super) fn parse_toml(text: &str) -> Result<Contents> {
    toml::from_str::<Contents>(text).map_err(|e| CfgsError::parse("toml", e))
}

/// TOML has no null; a `null` anywhere in `contents` fails to serialize.
pub(super) fn serialize_toml(contents: &Contents, options: &FormatOptions) -> Result<String> {
    let text = if options.pretty {
        toml::to_string_pretty(contents)
    } else {
        toml::to_string(contents)
    };
    text.map_err(|e| CfgsError::serialize("toml", e))
}

// ── YAML ───────────────────────────────────────────────────────────────────

pub(super) fn parse_yaml(text: &str) -> Result<Contents> {
    let value: Value = serde_yaml::from_str(text).map_err(|e| CfgsError::parse("yaml", e))?;
    into_contents("yaml", value)
}

pub(super) fn serialize_yaml(contents: &Contents, _options: &FormatOptions) -> Result<String> {
    serde_yaml::to_string(contents).map_err(|e| CfgsError::serialize("yaml", e))
}
