use indexmap::IndexMap;

use super::{
    ApiResponse, Callback, Example, Extensions, Header, Link, Parameter, PathItem, Paths,
    RequestBody, SchemaNode, SecurityRequirement, SecurityScheme,
};

/// Root of an OpenAPI document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OpenApi {
    pub openapi: Option<String>,
    pub info: Option<Info>,
    /// 3.1 only.
    pub json_schema_dialect: Option<String>,
    pub external_docs: Option<ExternalDocumentation>,
    pub servers: Option<Vec<Server>>,
    pub security: Option<Vec<SecurityRequirement>>,
    pub tags: Option<Vec<Tag>>,
    pub paths: Option<Paths>,
    /// 3.1 only.
    pub webhooks: Option<IndexMap<String, PathItem>>,
    pub components: Option<Components>,
    pub extensions: Option<Extensions>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Info {
    pub title: Option<String>,
    /// 3.1 only.
    pub summary: Option<String>,
    pub description: Option<String>,
    pub terms_of_service: Option<String>,
    pub contact: Option<Contact>,
    pub license: Option<License>,
    pub version: Option<String>,
    pub extensions: Option<Extensions>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Contact {
    pub name: Option<String>,
    pub url: Option<String>,
    pub email: Option<String>,
    pub extensions: Option<Extensions>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct License {
    pub name: Option<String>,
    /// SPDX expression, 3.1 only.
    pub identifier: Option<String>,
    pub url: Option<String>,
    pub extensions: Option<Extensions>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tag {
    pub name: Option<String>,
    pub description: Option<String>,
    pub external_docs: Option<ExternalDocumentation>,
    pub extensions: Option<Extensions>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExternalDocumentation {
    pub description: Option<String>,
    pub url: Option<String>,
    pub extensions: Option<Extensions>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Server {
    pub url: Option<String>,
    pub description: Option<String>,
    pub variables: Option<IndexMap<String, ServerVariable>>,
    pub extensions: Option<Extensions>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ServerVariable {
    pub enumeration: Option<Vec<String>>,
    pub default_value: Option<String>,
    pub description: Option<String>,
    pub extensions: Option<Extensions>,
}

/// Registry of reusable components, keyed by name within each section.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Components {
    pub schemas: Option<IndexMap<String, SchemaNode>>,
    pub responses: Option<IndexMap<String, ApiResponse>>,
    pub parameters: Option<IndexMap<String, Parameter>>,
    pub examples: Option<IndexMap<String, Example>>,
    pub request_bodies: Option<IndexMap<String, RequestBody>>,
    pub headers: Option<IndexMap<String, Header>>,
    pub security_schemes: Option<IndexMap<String, SecurityScheme>>,
    pub links: Option<IndexMap<String, Link>>,
    pub callbacks: Option<IndexMap<String, Callback>>,
    /// 3.1 only.
    pub path_items: Option<IndexMap<String, PathItem>>,
    pub extensions: Option<Extensions>,
}
