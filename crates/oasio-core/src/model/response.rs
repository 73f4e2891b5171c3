use indexmap::IndexMap;
use serde_json::Value;

use super::{Content, Extensions, Header, Server};

/// Status code (or `default`) to response map.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApiResponses {
    pub responses: IndexMap<String, ApiResponse>,
    pub extensions: Option<Extensions>,
}

impl ApiResponses {
    pub const DEFAULT: &'static str = "default";

    pub fn default_response(&self) -> Option<&ApiResponse> {
        self.responses.get(Self::DEFAULT)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApiResponse {
    pub reference: Option<String>,
    pub description: Option<String>,
    pub headers: Option<IndexMap<String, Header>>,
    pub content: Option<Content>,
    pub links: Option<IndexMap<String, Link>>,
    pub extensions: Option<Extensions>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Link {
    pub reference: Option<String>,
    pub operation_ref: Option<String>,
    pub operation_id: Option<String>,
    /// Parameter name to value or runtime expression.
    pub parameters: Option<IndexMap<String, Value>>,
    pub request_body: Option<Value>,
    pub description: Option<String>,
    pub server: Option<Server>,
    pub extensions: Option<Extensions>,
}
