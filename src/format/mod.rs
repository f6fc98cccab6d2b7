//! Supported file formats and format resolution.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │ FormatRegistry (default format)                            │
//! │                                                            │
//! │  resolve(explicit?, filename)                              │
//! │     explicit name ──▶ Format::from_name ──┐                │
//! │     filename suffix ─▶ format_for_suffix ─┼─▶ &FormatSpec  │
//! │     otherwise ────────▶ default ──────────┘                │
//! │                                                            │
//! │  FormatSpec { parse, serialize, create_empty }             │
//! │     json / toml / yaml ─▶ tree.rs                          │
//! │     ini                ─▶ ini.rs                           │
//! └────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every format reads into and writes from the same in-memory shape,
//! [`Contents`]: an insertion-ordered map of string keys to JSON values.
//! The ini format restricts that shape to section name → key → string.

mod ini;
mod tree;

use serde_json::Value;

use crate::error::{CfgsError, Result};

/// In-memory contents of a formatted file.
pub type Contents = serde_json::Map<String, Value>;

/// Name of the section that holds ini keys written before any header.
pub const INI_DEFAULT_SECTION: &str = "DEFAULT";

// ---------------------------------------------------------------------------
// Format
// ---------------------------------------------------------------------------

/// The closed set of supported formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    Json,
    Toml,
    Yaml,
    /// Two-level, string-valued `configparser`-style files.
    Ini,
}

/// Recognised file suffixes.
const SUFFIX_TO_FORMAT: &[(&str, Format)] = &[
    (".cfg", Format::Ini),
    (".ini", Format::Ini),
    (".json", Format::Json),
    (".toml", Format::Toml),
    (".yaml", Format::Yaml),
    (".yml", Format::Yaml),
];

impl Format {
    pub const ALL: [Format; 4] = [Format::Json, Format::Toml, Format::Yaml, Format::Ini];

    /// Look up a format by name or alias.
    ///
    /// Accepts `json`, `toml`, `yaml`, `yml`, `ini`, `cfg` and `configparser`.
    pub fn from_name(name: &str) -> Result<Self> {
        match name {
            "json" => Ok(Format::Json),
            "toml" => Ok(Format::Toml),
            "yaml" | "yml" => Ok(Format::Yaml),
            "ini" | "cfg" | "configparser" => Ok(Format::Ini),
            other => Err(CfgsError::UnknownFormat(other.to_string())),
        }
    }

    pub fn name(self) -> &'static str {
        self.spec().name
    }

    /// Canonical suffix used when a file name is derived automatically.
    pub fn suffix(self) -> &'static str {
        self.spec().suffix
    }

    pub fn spec(self) -> &'static FormatSpec {
        match self {
            Format::Json => &SPECS[0],
            Format::Toml => &SPECS[1],
            Format::Yaml => &SPECS[2],
            Format::Ini => &SPECS[3],
        }
    }
}

impl std::fmt::Display for Format {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for Format {
    type Err = CfgsError;

    fn from_str(s: &str) -> Result<Self> {
        Format::from_name(s)
    }
}

/// Infer a format from the suffix of `filename`, if it has a known one.
pub fn format_for_suffix(filename: &str) -> Option<Format> {
    let ext = std::path::Path::new(filename).extension()?.to_str()?;
    let ext = ext.to_ascii_lowercase();
    SUFFIX_TO_FORMAT
        .iter()
        .find(|(suffix, _)| suffix[1..] == ext)
        .map(|(_, format)| *format)
}

// ---------------------------------------------------------------------------
// FormatOptions
// ---------------------------------------------------------------------------

/// Knobs that affect how contents are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatOptions {
    /// Indented JSON and multi-line TOML arrays.
    pub pretty: bool,
    /// Write map keys in sorted order, recursively.
    pub sort_keys: bool,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            pretty: true,
            sort_keys: false,
        }
    }
}

// ---------------------------------------------------------------------------
// FormatSpec
// ---------------------------------------------------------------------------

/// A format's name, canonical suffix and codec functions.
pub struct FormatSpec {
    pub format: Format,
    pub name: &'static str,
    pub suffix: &'static str,
    parse: fn(&str) -> Result<Contents>,
    serialize: fn(&Contents, &FormatOptions) -> Result<String>,
    create_empty: fn() -> Contents,
}

static SPECS: [FormatSpec; 4] = [
    FormatSpec {
        format: Format::Json,
        name: "json",
        suffix: ".json",
        parse: tree::parse_json,
        serialize: tree::serialize_json,
        create_empty: Contents::new,
    },
    FormatSpec {
        format: Format::Toml,
        name: "toml",
        suffix: ".toml",
        parse: tree::parse_toml,
        serialize: tree::serialize_toml,
        create_empty: Contents::new,
    },
    FormatSpec {
        format: Format::Yaml,
        name: "yaml",
        suffix: ".yml",
        parse: tree::parse_yaml,
        serialize: tree::serialize_yaml,
        create_empty: Contents::new,
    },
    FormatSpec {
        format: Format::Ini,
        name: "ini",
        suffix: ".ini",
        parse: ini::parse,
        serialize: ini::serialize,
        create_empty: ini::create_empty,
    },
];

impl std::fmt::Debug for FormatSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormatSpec")
            .field("format", &self.format)
            .field("suffix", &self.suffix)
            .finish_non_exhaustive()
    }
}

impl FormatSpec {
    /// Parse file text. Whitespace-only text is the empty value.
    pub fn parse(&self, text: &str) -> Result<Contents> {
        if text.trim().is_empty() {
            return Ok(self.create_empty());
        }
        (self.parse)(text)
    }

    pub fn serialize(&self, contents: &Contents, options: &FormatOptions) -> Result<String> {
        if options.sort_keys {
            (self.serialize)(&sorted_map(contents), options)
        } else {
            (self.serialize)(contents, options)
        }
    }

    /// `{}` for tree formats; `{"DEFAULT": {}}` for ini.
    pub fn create_empty(&self) -> Contents {
        (self.create_empty)()
    }
}

fn sorted_map(map: &Contents) -> Contents {
    let mut entries: Vec<_> = map.iter().collect();
    entries.sort_by(|a, b| a.0.cmp(b.0));
    entries
        .into_iter()
        .map(|(key, value)| (key.clone(), sorted_value(value)))
        .collect()
}

fn sorted_value(value: &Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(sorted_map(map)),
        Value::Array(items) => Value::Array(items.iter().map(sorted_value).collect()),
        other => other.clone(),
    }
}

// ---------------------------------------------------------------------------
// FormatRegistry
// ---------------------------------------------------------------------------

/// Resolves which format applies to a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatRegistry {
    default: Format,
}

impl FormatRegistry {
    pub fn new(default: Format) -> Self {
        Self { default }
    }

    /// Build a registry whose default is given by name.
    pub fn with_default_name(name: &str) -> Result<Self> {
        Ok(Self::new(Format::from_name(name)?))
    }

    pub fn default_format(&self) -> Format {
        self.default
    }

    /// An explicit format name wins; otherwise the suffix of `filename`
    /// decides; otherwise the registry default applies.
    pub fn resolve(&self, explicit: Option<&str>, filename: &str) -> Result<&'static FormatSpec> {
        let format = match explicit {
            Some(name) => Format::from_name(name)?,
            None => format_for_suffix(filename).unwrap_or(self.default),
        };
        Ok(format.spec())
    }
}

impl Default for FormatRegistry {
    fn default() -> Self {
        Self::new(Format::Json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn obj(value: Value) -> Contents {
        match value {
            Value::Object(map) => map,
            other => panic!("not an object: {other}"),
        }
    }

    #[test]
    fn every_suffix_maps_to_its_format() {
        let registry = FormatRegistry::new(Format::Toml);
        for (suffix, format) in SUFFIX_TO_FORMAT {
            let filename = format!("settings{suffix}");
            let spec = registry.resolve(None, &filename).expect("resolve");
            assert_eq!(spec.format, *format, "{filename}");
        }
    }

    #[test]
    fn unmapped_suffix_uses_default() {
        let registry = FormatRegistry::new(Format::Yaml);
        assert_eq!(registry.resolve(None, "special").unwrap().format, Format::Yaml);
        assert_eq!(registry.resolve(None, "notes.txt").unwrap().format, Format::Yaml);
        assert_eq!(registry.resolve(None, "UPPER.JSON").unwrap().format, Format::Json);
    }

    #[test]
    fn explicit_format_wins_over_suffix() {
        let registry = FormatRegistry::default();
        let spec = registry.resolve(Some("configparser"), "x.json").unwrap();
        assert_eq!(spec.format, Format::Ini);
    }

    #[test]
    fn unknown_format_is_rejected() {
        let err = FormatRegistry::with_default_name("wombat").expect_err("unknown");
        assert!(matches!(err, CfgsError::UnknownFormat(ref name) if name == "wombat"));

        let err = FormatRegistry::default()
            .resolve(Some("wombat"), "x.json")
            .expect_err("unknown");
        assert!(matches!(err, CfgsError::UnknownFormat(_)));
    }

    #[test]
    fn canonical_suffix_is_partial_inverse() {
        for format in Format::ALL {
            assert_eq!(format_for_suffix(format.suffix()), None, "bare suffix has no stem");
            let filename = format!("app{}", format.suffix());
            assert_eq!(format_for_suffix(&filename), Some(format));
            assert_eq!(format.spec().format, format);
            assert_eq!(Format::from_name(format.name()).unwrap(), format);
        }
    }

    #[test]
    fn aliases_parse() {
        assert_eq!("yml".parse::<Format>().unwrap(), Format::Yaml);
        assert_eq!("cfg".parse::<Format>().unwrap(), Format::Ini);
        assert_eq!(Format::Ini.to_string(), "ini");
    }

    #[test]
    fn create_empty_shapes() {
        assert!(Format::Json.spec().create_empty().is_empty());
        assert!(Format::Toml.spec().create_empty().is_empty());
        assert!(Format::Yaml.spec().create_empty().is_empty());
        assert_eq!(
            Value::Object(Format::Ini.spec().create_empty()),
            json!({"DEFAULT": {}})
        );
    }

    #[test]
    fn blank_text_parses_to_empty() {
        for format in Format::ALL {
            let spec = format.spec();
            assert_eq!(spec.parse("  \n").unwrap(), spec.create_empty());
        }
    }

    #[test]
    fn sort_keys_is_recursive() {
        let contents = obj(json!({"b": {"z": 1, "a": 2}, "a": [{"y": 1, "x": 2}]}));
        let options = FormatOptions {
            pretty: false,
            sort_keys: true,
        };
        let text = Format::Json.spec().serialize(&contents, &options).unwrap();
        assert_eq!(text, r#"{"a":[{"x":2,"y":1}],"b":{"a":2,"z":1}}"#);
    }
}
