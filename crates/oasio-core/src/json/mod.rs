//! Generic JSON facade.
//!
//! Every reader and writer in [`crate::io`] is written against [`JsonIo`], so the
//! same mapping code runs on top of `serde_json` ([`SerdeJsonIo`]) or
//! `serde_yaml_ng` ([`YamlIo`]) trees.

mod serde_json_io;
mod yaml_io;

use std::borrow::Cow;
use std::io::{self, Read};

use serde_json::Number;

use crate::error::JsonError;

pub use serde_json_io::SerdeJsonIo;
pub use yaml_io::YamlIo;

/// Text format of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    Json,
    Yaml,
}

impl Format {
    /// Infer the format from a file name's extension (`.json`, `.yaml`, `.yml`).
    pub fn from_file_name(name: &str) -> Option<Self> {
        let (_, extension) = name.rsplit_once('.')?;
        match extension.to_ascii_lowercase().as_str() {
            "json" => Some(Format::Json),
            "yaml" | "yml" => Some(Format::Yaml),
            _ => None,
        }
    }
}

/// Capability interface over a concrete JSON tree implementation.
///
/// Built values are treated as immutable; objects and arrays are assembled
/// through separate builder types and finished with [`JsonIo::build_object`]
/// and [`JsonIo::build_array`].
pub trait JsonIo {
    type Value: Clone + std::fmt::Debug;
    type Object;
    type Array;
    type ObjectBuilder;
    type ArrayBuilder;

    fn is_array(&self, value: &Self::Value) -> bool;
    fn is_object(&self, value: &Self::Value) -> bool;
    fn is_string(&self, value: &Self::Value) -> bool;
    fn is_boolean(&self, value: &Self::Value) -> bool;

    fn as_object<'v>(&self, value: &'v Self::Value) -> Option<&'v Self::Object>;
    fn as_array<'v>(&self, value: &'v Self::Value) -> Option<&'v Self::Array>;

    /// Array elements in order.
    fn elements<'v>(&self, array: &'v Self::Array) -> Vec<&'v Self::Value>;

    /// Object properties in insertion order. Non-string keys are stringified.
    fn entries<'v>(&self, object: &'v Self::Object) -> Vec<(Cow<'v, str>, &'v Self::Value)>;

    fn get_value<'v>(&self, object: &'v Self::Object, key: &str) -> Option<&'v Self::Value>;

    /// Borrow a string value; `None` for every other kind.
    fn as_str<'v>(&self, value: &'v Self::Value) -> Option<&'v str>;

    /// String form of any scalar (numbers and booleans are rendered).
    fn as_string(&self, value: &Self::Value) -> Option<String>;

    fn as_bool(&self, value: &Self::Value) -> Option<bool>;
    fn as_i64(&self, value: &Self::Value) -> Option<i64>;
    fn as_number(&self, value: &Self::Value) -> Option<Number>;

    /// Convert a node into a native value.
    fn to_native(&self, value: &Self::Value) -> serde_json::Value;

    /// Convert a native value into a node.
    fn to_node(&self, value: &serde_json::Value) -> Self::Value;

    fn create_object(&self) -> Self::ObjectBuilder;
    fn set(&self, builder: &mut Self::ObjectBuilder, key: &str, value: Self::Value);
    fn build_object(&self, builder: Self::ObjectBuilder) -> Self::Value;

    fn create_array(&self) -> Self::ArrayBuilder;
    fn add(&self, builder: &mut Self::ArrayBuilder, value: Self::Value);
    fn build_array(&self, builder: Self::ArrayBuilder) -> Self::Value;

    fn null_value(&self) -> Self::Value;

    /// Maximum accepted document size in code points.
    fn code_point_limit(&self) -> usize;

    /// Parse text without enforcing the size limit.
    fn parse_text(&self, text: &str, format: Format) -> Result<Self::Value, JsonError>;

    /// Render a node as JSON (pretty-printed) or YAML.
    fn to_text(&self, value: &Self::Value, format: Format) -> Result<String, JsonError>;

    fn get_string(&self, object: &Self::Object, key: &str) -> Option<String> {
        self.get_value(object, key).and_then(|v| self.as_string(v))
    }

    fn get_boolean(&self, object: &Self::Object, key: &str) -> Option<bool> {
        self.get_value(object, key).and_then(|v| self.as_bool(v))
    }

    fn get_int(&self, object: &Self::Object, key: &str) -> Option<i64> {
        self.get_value(object, key).and_then(|v| self.as_i64(v))
    }

    fn get_number(&self, object: &Self::Object, key: &str) -> Option<Number> {
        self.get_value(object, key).and_then(|v| self.as_number(v))
    }

    /// Copy every property of `object` into `builder`.
    fn set_all(&self, builder: &mut Self::ObjectBuilder, object: &Self::Object) {
        for (key, value) in self.entries(object) {
            self.set(builder, &key, value.clone());
        }
    }

    /// Parse text, rejecting documents over [`JsonIo::code_point_limit`].
    fn read_str(&self, text: &str, format: Format) -> Result<Self::Value, JsonError> {
        let limit = self.code_point_limit();
        if text.len() > limit && text.chars().count() > limit {
            return Err(JsonError::TooLarge { limit });
        }
        self.parse_text(text, format)
    }

    /// Parse a stream. At most `4 * limit + 1` bytes are buffered.
    fn read_reader(&self, reader: impl Read, format: Format) -> Result<Self::Value, JsonError>
    where
        Self: Sized,
    {
        let limit = self.code_point_limit();
        let cap = (limit as u64).saturating_mul(4).saturating_add(1);
        let mut bytes = Vec::new();
        reader.take(cap).read_to_end(&mut bytes)?;
        // More than `4 * limit` bytes is more than `limit` code points.
        if bytes.len() as u64 >= cap {
            return Err(JsonError::TooLarge { limit });
        }
        let text = String::from_utf8(bytes)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        self.read_str(&text, format)
    }

    /// Heuristic literal parser for values supplied as annotation strings.
    ///
    /// `{...}`/`[...]` parse as JSON, a leading `-` or digit parses as a number,
    /// `true`/`false` as booleans. Anything that fails falls back to the
    /// trimmed string.
    fn parse_value(&self, value: &str) -> Option<serde_json::Value> {
        let trimmed = value.trim();
        let first = trimmed.chars().next()?;
        match first {
            '{' | '[' => match self.parse_text(trimmed, Format::Json) {
                Ok(node) => return Some(self.to_native(&node)),
                Err(e) => log::warn!("failed to parse `{trimmed}` as JSON: {e}"),
            },
            '-' | '0'..='9' => match parse_number(trimmed) {
                Some(number) => return Some(serde_json::Value::Number(number)),
                None => log::debug!("`{trimmed}` is not a number, keeping it as a string"),
            },
            _ => {}
        }
        match trimmed {
            "true" => Some(serde_json::Value::Bool(true)),
            "false" => Some(serde_json::Value::Bool(false)),
            _ => Some(serde_json::Value::String(trimmed.to_string())),
        }
    }
}

/// Parse a decimal literal, preferring an integer representation.
pub fn parse_number(text: &str) -> Option<Number> {
    if let Ok(int) = text.parse::<i64>() {
        return Some(Number::from(int));
    }
    if let Ok(uint) = text.parse::<u64>() {
        return Some(Number::from(uint));
    }
    // Rust accepts `inf`/`nan` spellings; only plain decimals count here.
    if !text
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '-' | '+' | '.' | 'e' | 'E'))
    {
        return None;
    }
    text.parse::<f64>().ok().and_then(Number::from_f64)
}
