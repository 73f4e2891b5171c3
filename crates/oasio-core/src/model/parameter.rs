use indexmap::IndexMap;
use serde_json::Value;

use super::{Content, Example, Extensions, SchemaNode, model_enum};

model_enum! {
    /// Parameter location, declared in sort order.
    pub enum In {
        Path => "path",
        Query => "query",
        Header => "header",
        Cookie => "cookie",
    }
}

model_enum! {
    /// Parameter serialization style.
    pub enum Style {
        Matrix => "matrix",
        Label => "label",
        Form => "form",
        Simple => "simple",
        SpaceDelimited => "spaceDelimited",
        PipeDelimited => "pipeDelimited",
        DeepObject => "deepObject",
    }
}

impl Style {
    /// Default style for parameters in `location`.
    pub fn default_for(location: In) -> Style {
        match location {
            In::Query | In::Cookie => Style::Form,
            In::Path | In::Header => Style::Simple,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Parameter {
    pub reference: Option<String>,
    pub name: Option<String>,
    pub location: Option<In>,
    pub description: Option<String>,
    pub required: Option<bool>,
    pub deprecated: Option<bool>,
    pub allow_empty_value: Option<bool>,
    pub style: Option<Style>,
    pub explode: Option<bool>,
    pub allow_reserved: Option<bool>,
    pub schema: Option<SchemaNode>,
    pub example: Option<Value>,
    pub examples: Option<IndexMap<String, Example>>,
    pub content: Option<Content>,
    pub extensions: Option<Extensions>,
    /// Set from `@Parameter(hidden = true)`; never serialized.
    pub hidden: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestBody {
    pub reference: Option<String>,
    pub description: Option<String>,
    pub content: Option<Content>,
    pub required: Option<bool>,
    pub extensions: Option<Extensions>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Header {
    pub reference: Option<String>,
    pub description: Option<String>,
    pub required: Option<bool>,
    pub deprecated: Option<bool>,
    pub allow_empty_value: Option<bool>,
    pub style: Option<Style>,
    pub explode: Option<bool>,
    pub schema: Option<SchemaNode>,
    pub example: Option<Value>,
    pub examples: Option<IndexMap<String, Example>>,
    pub content: Option<Content>,
    pub extensions: Option<Extensions>,
}
