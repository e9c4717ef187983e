//! Fixture loading and management.
//!
//! A fixture file is one [`FixtureSet`]: a family name plus a list of
//! [`FixtureCase`]s. Each case names a format string, a tagged argument list
//! and the expected effect on the sink.
//!
//! ```json
//! {
//!   "name": "hex_alt_width",
//!   "format": "|%#8x|",
//!   "args": [{"type": "uint", "value": 42}],
//!   "expected_output": "|    0x2a|",
//!   "expected_count": 10
//! }
//! ```

use std::path::{Path, PathBuf};
use std::str::FromStr;

use frankenprintf_core::Arg;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FixtureError {
    #[error("io error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid fixture json in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("no fixture JSON files found in {0}")]
    Empty(PathBuf),
}

// ---------------------------------------------------------------------------
// Arguments
// ---------------------------------------------------------------------------

/// Serializable mirror of [`Arg`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum FixtureArg {
    /// Latin-1 only: the formatter takes a single byte.
    Char(#[serde(deserialize_with = "latin1_char")] char),
    Short(i16),
    Int(i32),
    Long(i64),
    Ushort(u16),
    Uint(u32),
    Ulong(u64),
    /// `null` is a null string pointer.
    Str(Option<String>),
    Ptr(usize),
}

impl FixtureArg {
    /// Borrow as a core argument.
    #[must_use]
    pub fn to_arg(&self) -> Arg<'_> {
        match self {
            // Parsing and deserialization reject chars above U+00FF.
            Self::Char(c) => Arg::char(u8::try_from(*c).unwrap_or(b'?')),
            Self::Short(v) => Arg::short(*v),
            Self::Int(v) => Arg::int(*v),
            Self::Long(v) => Arg::long(*v),
            Self::Ushort(v) => Arg::ushort(*v),
            Self::Uint(v) => Arg::uint(*v),
            Self::Ulong(v) => Arg::ulong(*v),
            Self::Str(Some(s)) => Arg::str(s),
            Self::Str(None) => Arg::null_str(),
            Self::Ptr(addr) => Arg::ptr(*addr),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ArgParseError {
    #[error("expected <type>:<value>, got '{0}'")]
    MissingSeparator(String),
    #[error("unknown argument type '{0}'")]
    UnknownType(String),
    #[error("invalid {kind} value '{value}'")]
    InvalidValue { kind: &'static str, value: String },
}

/// Parses the command-line form `type:value`, e.g. `int:-5`, `uint:0x2a`,
/// `str:hello`, `char:A`, `ptr:0xabc`. `null` alone is a null string.
impl FromStr for FixtureArg {
    type Err = ArgParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "null" {
            return Ok(Self::Str(None));
        }
        let (kind, value) = s
            .split_once(':')
            .ok_or_else(|| ArgParseError::MissingSeparator(s.to_string()))?;
        let bad = |kind: &'static str| ArgParseError::InvalidValue {
            kind,
            value: value.to_string(),
        };
        Ok(match kind {
            "char" => {
                let mut chars = value.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) if u8::try_from(c).is_ok() => Self::Char(c),
                    _ => return Err(bad("char")),
                }
            }
            "short" => Self::Short(parse_int(value).ok_or_else(|| bad("short"))?),
            "int" => Self::Int(parse_int(value).ok_or_else(|| bad("int"))?),
            "long" => Self::Long(parse_int(value).ok_or_else(|| bad("long"))?),
            "ushort" => Self::Ushort(parse_int(value).ok_or_else(|| bad("ushort"))?),
            "uint" => Self::Uint(parse_int(value).ok_or_else(|| bad("uint"))?),
            "ulong" => Self::Ulong(parse_int(value).ok_or_else(|| bad("ulong"))?),
            "str" => Self::Str(Some(value.to_string())),
            "ptr" => Self::Ptr(parse_int(value).ok_or_else(|| bad("ptr"))?),
            other => return Err(ArgParseError::UnknownType(other.to_string())),
        })
    }
}

fn latin1_char<'de, D: Deserializer<'de>>(de: D) -> Result<char, D::Error> {
    let c = char::deserialize(de)?;
    if u8::try_from(c).is_ok() {
        Ok(c)
    } else {
        Err(serde::de::Error::custom(format!(
            "char {c:?} does not fit in one byte"
        )))
    }
}

/// Decimal, `0x` hex or leading-`0` octal, with an optional `-`.
fn parse_int<T: TryFrom<i128>>(text: &str) -> Option<T> {
    let (negative, digits) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text),
    };
    let magnitude = if let Some(hex) = digits
        .strip_prefix("0x")
        .or_else(|| digits.strip_prefix("0X"))
    {
        i128::from_str_radix(hex, 16).ok()?
    } else if digits.len() > 1 && digits.starts_with('0') {
        i128::from_str_radix(&digits[1..], 8).ok()?
    } else {
        digits.parse::<i128>().ok()?
    };
    T::try_from(if negative { -magnitude } else { magnitude }).ok()
}

// ---------------------------------------------------------------------------
// Sink behavior
// ---------------------------------------------------------------------------

/// How the recording sink behaves while a case runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum SinkBehavior {
    /// Accept every write.
    #[default]
    Ok,
    /// Accept `writes` calls, then fail every later one.
    FailAfter { writes: usize },
    /// Accept `writes` calls, then deliver only half of each later one.
    ShortAfter { writes: usize },
}

// ---------------------------------------------------------------------------
// Cases and sets
// ---------------------------------------------------------------------------

/// A single fixture test case.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixtureCase {
    /// Case identifier.
    pub name: String,
    /// Format string; `null` exercises the null-format path.
    pub format: Option<String>,
    #[serde(default)]
    pub args: Vec<FixtureArg>,
    /// Bytes the sink must have received, including on failure.
    #[serde(default)]
    pub expected_output: String,
    /// Error kind (`FormatError::kind`) the call must fail with.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_error: Option<String>,
    /// Logical byte count a successful call must return.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_count: Option<usize>,
    /// Output buffer capacity override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub buffer_capacity: Option<usize>,
    #[serde(default)]
    pub sink: SinkBehavior,
}

impl FixtureCase {
    #[must_use]
    pub fn core_args(&self) -> Vec<Arg<'_>> {
        self.args.iter().map(FixtureArg::to_arg).collect()
    }
}

/// A collection of fixture cases for one feature family.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixtureSet {
    /// Schema version.
    pub version: String,
    /// Feature family name (e.g. `printf/width`).
    pub family: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Individual test cases.
    pub cases: Vec<FixtureCase>,
}

impl FixtureSet {
    /// Load fixture set from JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serialize fixture set to JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Load fixture set from a file path.
    pub fn from_file(path: &Path) -> Result<Self, FixtureError> {
        let content = std::fs::read_to_string(path).map_err(|source| FixtureError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content).map_err(|source| FixtureError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load every `*.json` file in `dir`, sorted by file name.
    pub fn load_dir(dir: &Path) -> Result<Vec<Self>, FixtureError> {
        let entries = std::fs::read_dir(dir).map_err(|source| FixtureError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        let mut paths: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok().map(|entry| entry.path()))
            .filter(|path| path.extension().and_then(|s| s.to_str()) == Some("json"))
            .collect();
        paths.sort();
        if paths.is_empty() {
            return Err(FixtureError::Empty(dir.to_path_buf()));
        }
        paths.iter().map(|p| Self::from_file(p)).collect()
    }
}
