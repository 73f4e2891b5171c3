use std::borrow::Cow;

use serde_json::{Map, Number, Value};

use super::{Format, JsonIo};
use crate::config::DEFAULT_MAXIMUM_STATIC_FILE_SIZE;
use crate::error::JsonError;

/// [`JsonIo`] backed by `serde_json::Value`.
#[derive(Debug, Clone, Copy)]
pub struct SerdeJsonIo {
    limit: usize,
}

impl SerdeJsonIo {
    pub fn new() -> Self {
        Self::with_limit(DEFAULT_MAXIMUM_STATIC_FILE_SIZE)
    }

    pub fn with_limit(limit: usize) -> Self {
        Self { limit }
    }
}

impl Default for SerdeJsonIo {
    fn default() -> Self {
        Self::new()
    }
}

impl JsonIo for SerdeJsonIo {
    type Value = Value;
    type Object = Map<String, Value>;
    type Array = Vec<Value>;
    type ObjectBuilder = Map<String, Value>;
    type ArrayBuilder = Vec<Value>;

    fn is_array(&self, value: &Value) -> bool {
        value.is_array()
    }

    fn is_object(&self, value: &Value) -> bool {
        value.is_object()
    }

    fn is_string(&self, value: &Value) -> bool {
        value.is_string()
    }

    fn is_boolean(&self, value: &Value) -> bool {
        value.is_boolean()
    }

    fn as_object<'v>(&self, value: &'v Value) -> Option<&'v Map<String, Value>> {
        value.as_object()
    }

    fn as_array<'v>(&self, value: &'v Value) -> Option<&'v Vec<Value>> {
        value.as_array()
    }

    fn elements<'v>(&self, array: &'v Vec<Value>) -> Vec<&'v Value> {
        array.iter().collect()
    }

    fn entries<'v>(&self, object: &'v Map<String, Value>) -> Vec<(Cow<'v, str>, &'v Value)> {
        object
            .iter()
            .map(|(k, v)| (Cow::Borrowed(k.as_str()), v))
            .collect()
    }

    fn get_value<'v>(&self, object: &'v Map<String, Value>, key: &str) -> Option<&'v Value> {
        object.get(key)
    }

    fn as_str<'v>(&self, value: &'v Value) -> Option<&'v str> {
        value.as_str()
    }

    fn as_string(&self, value: &Value) -> Option<String> {
        match value {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    fn as_bool(&self, value: &Value) -> Option<bool> {
        value.as_bool()
    }

    fn as_i64(&self, value: &Value) -> Option<i64> {
        value.as_i64()
    }

    fn as_number(&self, value: &Value) -> Option<Number> {
        match value {
            Value::Number(n) => Some(n.clone()),
            _ => None,
        }
    }

    fn to_native(&self, value: &Value) -> Value {
        value.clone()
    }

    fn to_node(&self, value: &Value) -> Value {
        value.clone()
    }

    fn create_object(&self) -> Map<String, Value> {
        Map::new()
    }

    fn set(&self, builder: &mut Map<String, Value>, key: &str, value: Value) {
        builder.insert(key.to_string(), value);
    }

    fn build_object(&self, builder: Map<String, Value>) -> Value {
        Value::Object(builder)
    }

    fn create_array(&self) -> Vec<Value> {
        Vec::new()
    }

    fn add(&self, builder: &mut Vec<Value>, value: Value) {
        builder.push(value);
    }

    fn build_array(&self, builder: Vec<Value>) -> Value {
        Value::Array(builder)
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
            Format::Yaml => {
                let yaml: serde_yaml_ng::Value = serde_yaml_ng::from_str(text)?;
                Ok(super::yaml_io::yaml_to_json(&yaml))
            }
        }
    }

    fn to_text(&self, value: &Value, format: Format) -> Result<String, JsonError> {
        match format {
            Format::Json => Ok(serde_json::to_string_pretty(value)?),
            Format::Yaml => Ok(serde_yaml_ng::to_string(value)?),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_coercing_getters() {
        let json = SerdeJsonIo::new();
        let node = json!({"s": "text", "n": 12, "b": true, "f": 1.5, "o": {}});
        let object = node.as_object().unwrap();
        assert_eq!(json.get_string(object, "s").as_deref(), Some("text"));
        assert_eq!(json.get_string(object, "n").as_deref(), Some("12"));
        assert_eq!(json.get_string(object, "b").as_deref(), Some("true"));
        assert_eq!(json.get_string(object, "o"), None);
        assert_eq!(json.get_int(object, "n"), Some(12));
        assert_eq!(json.get_int(object, "s"), None);
        assert_eq!(json.get_boolean(object, "b"), Some(true));
        assert_eq!(json.get_number(object, "f"), Number::from_f64(1.5));
        assert_eq!(json.get_string(object, "missing"), None);
    }

    #[test]
    fn test_builders_preserve_order() {
        let json = SerdeJsonIo::new();
        let mut object = json.create_object();
        json.set(&mut object, "z", json!(1));
        json.set(&mut object, "a", json!(2));
        let mut array = json.create_array();
        json.add(&mut array, json.build_object(object));
        json.add(&mut array, json.null_value());
        let built = json.build_array(array);
        assert_eq!(
            json.to_text(&built, Format::Json).unwrap(),
            "[\n  {\n    \"z\": 1,\n    \"a\": 2\n  },\n  null\n]"
        );
    }

    #[test]
    fn test_yaml_numeric_keys_become_strings() {
        let json = SerdeJsonIo::new();
        let node = json
            .parse_text("200:\n  description: OK\n", Format::Yaml)
            .unwrap();
        assert_eq!(node, json!({"200": {"description": "OK"}}));
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        let json = SerdeJsonIo::new();
        assert!(matches!(
            json.read_str("{", Format::Json),
            Err(JsonError::Json(_))
        ));
    }
}
