use std::borrow::Cow;

use serde_json::Number;
use serde_yaml_ng::{Mapping, Sequence, Value};

use super::{Format, JsonIo};
use crate::config::DEFAULT_MAXIMUM_STATIC_FILE_SIZE;
use crate::error::JsonError;

/// [`JsonIo`] backed by `serde_yaml_ng::Value`.
#[derive(Debug, Clone, Copy)]
pub struct YamlIo {
    limit: usize,
}

impl YamlIo {
    pub fn new() -> Self {
        Self::with_limit(DEFAULT_MAXIMUM_STATIC_FILE_SIZE)
    }

    pub fn with_limit(limit: usize) -> Self {
        Self { limit }
    }
}

impl Default for YamlIo {
    fn default() -> Self {
        Self::new()
    }
}

/// Tags carry no meaning for OpenAPI documents.
fn untagged(value: &Value) -> &Value {
    match value {
        Value::Tagged(tagged) => untagged(&tagged.value),
        other => other,
    }
}

fn key_text(key: &Value) -> Cow<'_, str> {
    match untagged(key) {
        Value::String(s) => Cow::Borrowed(s.as_str()),
        Value::Number(n) => Cow::Owned(n.to_string()),
        Value::Bool(b) => Cow::Owned(b.to_string()),
        Value::Null => Cow::Borrowed("null"),
        other => Cow::Owned(
            serde_yaml_ng::to_string(other)
                .map(|s| s.trim_end().to_string())
                .unwrap_or_default(),
        ),
    }
}

fn yaml_number(number: &serde_yaml_ng::Number) -> serde_json::Value {
    if let Some(i) = number.as_i64() {
        serde_json::Value::Number(i.into())
    } else if let Some(u) = number.as_u64() {
        serde_json::Value::Number(u.into())
    } else {
        number
            .as_f64()
            .and_then(Number::from_f64)
            .map_or(serde_json::Value::Null, serde_json::Value::Number)
    }
}

/// Convert a YAML tree to JSON, stringifying non-string keys.
pub(crate) fn yaml_to_json(value: &Value) -> serde_json::Value {
    match untagged(value) {
        Value::Null => serde_json::Value::Null,
        Value::Bool(b) => serde_json::Value::Bool(*b),
        Value::Number(n) => yaml_number(n),
        Value::String(s) => serde_json::Value::String(s.clone()),
        Value::Sequence(items) => {
            serde_json::Value::Array(items.iter().map(yaml_to_json).collect())
        }
        Value::Mapping(mapping) => serde_json::Value::Object(
            mapping
                .iter()
                .map(|(k, v)| (key_text(k).into_owned(), yaml_to_json(v)))
                .collect(),
        ),
        Value::Tagged(_) => serde_json::Value::Null,
    }
}

pub(crate) fn json_to_yaml(value: &serde_json::Value) -> Value {
    match value {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Bool(*b),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::Number(i.into())
            } else if let Some(u) = n.as_u64() {
                Value::Number(u.into())
            } else {
                Value::Number(n.as_f64().unwrap_or_default().into())
            }
        }
        serde_json::Value::String(s) => Value::String(s.clone()),
        serde_json::Value::Array(items) => {
            Value::Sequence(items.iter().map(json_to_yaml).collect())
        }
        serde_json::Value::Object(object) => {
            let mut mapping = Mapping::with_capacity(object.len());
            for (k, v) in object {
                mapping.insert(Value::String(k.clone()), json_to_yaml(v));
            }
            Value::Mapping(mapping)
        }
    }
}

impl JsonIo for YamlIo {
    type Value = Value;
    type Object = Mapping;
    type Array = Sequence;
    type ObjectBuilder = Mapping;
    type ArrayBuilder = Sequence;

    fn is_array(&self, value: &Value) -> bool {
        untagged(value).is_sequence()
    }

    fn is_object(&self, value: &Value) -> bool {
        untagged(value).is_mapping()
    }

    fn is_string(&self, value: &Value) -> bool {
        untagged(value).is_string()
    }

    fn is_boolean(&self, value: &Value) -> bool {
        untagged(value).is_bool()
    }

    fn as_object<'v>(&self, value: &'v Value) -> Option<&'v Mapping> {
        untagged(value).as_mapping()
    }

    fn as_array<'v>(&self, value: &'v Value) -> Option<&'v Sequence> {
        untagged(value).as_sequence()
    }

    fn elements<'v>(&self, array: &'v Sequence) -> Vec<&'v Value> {
        array.iter().collect()
    }

    fn entries<'v>(&self, object: &'v Mapping) -> Vec<(Cow<'v, str>, &'v Value)> {
        object.iter().map(|(k, v)| (key_text(k), v)).collect()
    }

    fn get_value<'v>(&self, object: &'v Mapping, key: &str) -> Option<&'v Value> {
        object.get(key)
    }

    fn as_str<'v>(&self, value: &'v Value) -> Option<&'v str> {
        untagged(value).as_str()
    }

    fn as_string(&self, value: &Value) -> Option<String> {
        match untagged(value) {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    fn as_bool(&self, value: &Value) -> Option<bool> {
        untagged(value).as_bool()
    }

    fn as_i64(&self, value: &Value) -> Option<i64> {
        untagged(value).as_i64()
    }

    fn as_number(&self, value: &Value) -> Option<Number> {
        match untagged(value) {
            Value::Number(n) => match yaml_number(n) {
                serde_json::Value::Number(number) => Some(number),
                _ => None,
            },
            _ => None,
        }
    }

    fn to_native(&self, value: &Value) -> serde_json::Value {
        yaml_to_json(value)
    }

    fn to_node(&self, value: &serde_json::Value) -> Value {
        json_to_yaml(value)
    }

    fn create_object(&self) -> Mapping {
        Mapping::new()
    }

    fn set(&self, builder: &mut Mapping, key: &str, value: Value) {
        builder.insert(Value::String(key.to_string()), value);
    }

    fn build_object(&self, builder: Mapping) -> Value {
        Value::Mapping(builder)
    }

    fn create_array(&self) -> Sequence {
        Sequence::new()
    }

    fn add(&self, builder: &mut Sequence, value: Value) {
        builder.push(value);
    }

    fn build_array(&self, builder: Sequence) -> Value {
        Value::Sequence(builder)
    }

    fn null_value(&self) -> Value {
        Value::Null
    }

    fn code_point_limit(&self) -> usize {
        self.limit
    }

    fn parse_text(&self, text: &str, format: Format) -> Result<Value, JsonError> {
        match format {
            Format::Json => Ok(serde_json::from_str(text)?),
            Format::Yaml => Ok(serde_yaml_ng::from_str(text)?),
        }
    }

    fn to_text(&self, value: &Value, format: Format) -> Result<String, JsonError> {
        match format {
            Format::Json => Ok(serde_json::to_string_pretty(&yaml_to_json(value))?),
            Format::Yaml => Ok(serde_yaml_ng::to_string(value)?),
        }
    }
}
