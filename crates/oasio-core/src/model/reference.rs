use super::{
    ApiResponse, Callback, Components, Example, Header, Link, Parameter, PathItem, RequestBody,
    SchemaNode, SecurityScheme,
};

pub const COMPONENTS_PREFIX: &str = "#/components/";

/// Whether `value` is a bare component key (`^[A-Za-z0-9.\-_]+$`).
pub fn is_simple_component_key(value: &str) -> bool {
    !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'))
}

/// Dereferenceable component sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReferenceType {
    Header,
    Schema,
    SecurityScheme,
    Callback,
    Link,
    Response,
    Parameter,
    Example,
    RequestBody,
    PathItem,
}

impl ReferenceType {
    pub const VALUES: &'static [ReferenceType] = &[
        ReferenceType::Header,
        ReferenceType::Schema,
        ReferenceType::SecurityScheme,
        ReferenceType::Callback,
        ReferenceType::Link,
        ReferenceType::Response,
        ReferenceType::Parameter,
        ReferenceType::Example,
        ReferenceType::RequestBody,
        ReferenceType::PathItem,
    ];

    /// Section name under `#/components/`.
    pub fn path(&self) -> &'static str {
        match self {
            ReferenceType::Header => "headers",
            ReferenceType::Schema => "schemas",
            ReferenceType::SecurityScheme => "securitySchemes",
            ReferenceType::Callback => "callbacks",
            ReferenceType::Link => "links",
            ReferenceType::Response => "responses",
            ReferenceType::Parameter => "parameters",
            ReferenceType::Example => "examples",
            ReferenceType::RequestBody => "requestBodies",
            ReferenceType::PathItem => "pathItems",
        }
    }

    pub fn from_component_path(path: &str) -> Option<ReferenceType> {
        Self::VALUES.iter().copied().find(|t| t.path() == path)
    }

    /// Expand a bare component key to `#/components/<section>/<key>`;
    /// anything else is taken as a complete reference and returned as is.
    pub fn parse_ref_value(&self, value: &str) -> String {
        if is_simple_component_key(value) {
            self.reference_of(value)
        } else {
            value.to_string()
        }
    }

    pub fn reference_of(&self, name: &str) -> String {
        format!("{COMPONENTS_PREFIX}{}/{name}", self.path())
    }

    /// Split a local component reference into its section and name.
    pub fn parse_local(reference: &str) -> Option<(ReferenceType, &str)> {
        let rest = reference.strip_prefix(COMPONENTS_PREFIX)?;
        let (section, name) = rest.split_once('/')?;
        Some((Self::from_component_path(section)?, name))
    }
}

/// Last path segment of a reference, used as a map key.
pub fn ref_name(reference: &str) -> Option<&str> {
    reference
        .rsplit('/')
        .next()
        .filter(|name| !name.is_empty())
}

impl Components {
    pub fn schema(&self, reference: &str) -> Option<&SchemaNode> {
        let name = local_name(reference, ReferenceType::Schema)?;
        self.schemas.as_ref()?.get(name)
    }

    pub fn parameter(&self, reference: &str) -> Option<&Parameter> {
        let name = local_name(reference, ReferenceType::Parameter)?;
        self.parameters.as_ref()?.get(name)
    }

    pub fn response(&self, reference: &str) -> Option<&ApiResponse> {
        let name = local_name(reference, ReferenceType::Response)?;
        self.responses.as_ref()?.get(name)
    }

    pub fn header(&self, reference: &str) -> Option<&Header> {
        let name = local_name(reference, ReferenceType::Header)?;
        self.headers.as_ref()?.get(name)
    }

    pub fn example(&self, reference: &str) -> Option<&Example> {
        let name = local_name(reference, ReferenceType::Example)?;
        self.examples.as_ref()?.get(name)
    }

    pub fn request_body(&self, reference: &str) -> Option<&RequestBody> {
        let name = local_name(reference, ReferenceType::RequestBody)?;
        self.request_bodies.as_ref()?.get(name)
    }

    pub fn link(&self, reference: &str) -> Option<&Link> {
        let name = local_name(reference, ReferenceType::Link)?;
        self.links.as_ref()?.get(name)
    }

    pub fn callback(&self, reference: &str) -> Option<&Callback> {
        let name = local_name(reference, ReferenceType::Callback)?;
        self.callbacks.as_ref()?.get(name)
    }

    pub fn security_scheme(&self, reference: &str) -> Option<&SecurityScheme> {
        let name = local_name(reference, ReferenceType::SecurityScheme)?;
        self.security_schemes.as_ref()?.get(name)
    }

    pub fn path_item(&self, reference: &str) -> Option<&PathItem> {
        let name = local_name(reference, ReferenceType::PathItem)?;
        self.path_items.as_ref()?.get(name)
    }
}

fn local_name(reference: &str, expected: ReferenceType) -> Option<&str> {
    match ReferenceType::parse_local(reference)? {
        (section, name) if section == expected => Some(name),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Schema;
    use indexmap::IndexMap;

    #[test]
    fn test_simple_keys_expand() {
        assert_eq!(
            ReferenceType::Schema.parse_ref_value("Pet"),
            "#/components/schemas/Pet"
        );
        assert_eq!(
            ReferenceType::RequestBody.parse_ref_value("my.Body-1_x"),
            "#/components/requestBodies/my.Body-1_x"
        );
    }

    #[test]
    fn test_full_references_pass_through() {
        let external = "https://example.com/x.json#/Foo";
        assert_eq!(ReferenceType::Schema.parse_ref_value(external), external);
        assert_eq!(
            ReferenceType::Schema.parse_ref_value("#/components/schemas/Pet"),
            "#/components/schemas/Pet"
        );
    }

    #[test]
    fn test_component_lookup() {
        assert_eq!(
            ReferenceType::from_component_path("securitySchemes"),
            Some(ReferenceType::SecurityScheme)
        );
        assert_eq!(ReferenceType::from_component_path("nope"), None);

        let mut schemas = IndexMap::new();
        schemas.insert("Pet".to_string(), SchemaNode::new(Schema::default()));
        let components = Components {
            schemas: Some(schemas),
            ..Components::default()
        };
        assert!(components.schema("#/components/schemas/Pet").is_some());
        assert!(components.schema("#/components/parameters/Pet").is_none());
        assert!(components.schema("https://example.com/Pet").is_none());
        assert_eq!(ref_name("#/components/schemas/Pet"), Some("Pet"));
    }
}
