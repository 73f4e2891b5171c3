use indexmap::IndexMap;
use serde_json::Value;

use super::{Extensions, Header, SchemaNode, Style};

/// Media type name to media type map.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Content {
    pub media_types: IndexMap<String, MediaType>,
}

impl Content {
    pub fn with(mut self, name: impl Into<String>, media_type: MediaType) -> Self {
        self.media_types.insert(name.into(), media_type);
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MediaType {
    pub schema: Option<SchemaNode>,
    pub example: Option<Value>,
    pub examples: Option<IndexMap<String, Example>>,
    pub encoding: Option<IndexMap<String, Encoding>>,
    pub extensions: Option<Extensions>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Encoding {
    pub content_type: Option<String>,
    pub headers: Option<IndexMap<String, Header>>,
    pub style: Option<Style>,
    pub explode: Option<bool>,
    pub allow_reserved: Option<bool>,
    pub extensions: Option<Extensions>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Example {
    pub reference: Option<String>,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub value: Option<Value>,
    pub external_value: Option<String>,
    pub extensions: Option<Extensions>,
}
