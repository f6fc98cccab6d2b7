//! `configparser`-style ini codec.
//!
//! Contents are always two levels deep: section name → key → string. Keys
//! that appear before the first section header belong to
//! [`INI_DEFAULT_SECTION`], which is present (possibly empty) in every value
//! this module produces.
//!
//! Scalars written into a section are stringified on the way out, so numbers
//! and booleans come back as strings on the next read.

use ::ini::{Ini, ParseOption};
use serde_json::Value;

use super::{Contents, FormatOptions, INI_DEFAULT_SECTION};
use crate::error::{CfgsError, Result};

const NAME: &str = "ini";

pub(super) fn create_empty() -> Contents {
    let mut contents = Contents::new();
    contents.insert(INI_DEFAULT_SECTION.to_string(), Value::Object(Contents::new()));
    contents
}

pub(super) fn parse(text: &str) -> Result<Contents> {
    // Quotes are part of the value; they are never written as delimiters.
    let option = ParseOption {
        enabled_quote: false,
        ..ParseOption::default()
    };
    let ini = Ini::load_from_str_opt(text, option).map_err(|e| CfgsError::parse(NAME, e))?;

    let mut contents = create_empty();
    for (section, properties) in ini.iter() {
        let name = section.unwrap_or(INI_DEFAULT_SECTION);
        let entry = contents
            .entry(name.to_string())
            .or_insert_with(|| Value::Object(Contents::new()));
        if let Value::Object(section) = entry {
            for (key, value) in properties.iter() {
                section.insert(key.to_string(), Value::String(value.to_string()));
            }
        }
    }
    Ok(contents)
}

pub(super) fn serialize(contents: &Contents, _options: &FormatOptions) -> Result<String> {
    let mut ini = Ini::new();
    for (name, section) in contents {
        let Value::Object(section) = section else {
            return Err(CfgsError::serialize(
                NAME,
                format!("section {name:?} must be a mapping of keys to values"),
            ));
        };

        if name == INI_DEFAULT_SECTION {
            let mut setter = ini.with_general_section();
            for (key, value) in section {
                setter.set(key.as_str(), stringify(value));
            }
        } else {
            // Created up front so a section without keys still gets a header.
            let properties = ini
                .entry(Some(name.clone()))
                .or_insert_with(Default::default);
            for (key, value) in section {
                properties.insert(key.as_str(), stringify(value));
            }
        }
    }

    let mut out = Vec::new();
    ini.write_to(&mut out)?;
    String::from_utf8(out).map_err(|e| CfgsError::serialize(NAME, e))
}

/// Render a value the way it will read back from an ini file.
fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
