use std::collections::HashSet;

use indexmap::IndexMap;
use serde_json::{Number, Value};

use super::{
    AdditionalProperties, ApiResponse, ApiResponses, Callback, Components, Contact, Content,
    Discriminator, Encoding, Example, ExternalDocumentation, Header, In, Info,
    License, Link, MediaType, OAuthFlow, OAuthFlows, OpenApi, Operation, Parameter, PathItem,
    Paths, RequestBody, Schema, SchemaNode, SchemaType, SecurityRequirement, SecurityScheme,
    SecuritySchemeIn, SecuritySchemeType, Server, ServerVariable, Style, Tag, Xml,
};

/// Field-by-field merge where values present in the newer side win.
///
/// Maps merge by key, string lists are unioned, other lists are appended
/// skipping entries already present.
pub trait Merge {
    fn merge(&mut self, newer: Self);
}

impl<T: Merge> Merge for Option<T> {
    fn merge(&mut self, newer: Self) {
        let Some(newer) = newer else {
            return;
        };
        match self {
            Some(current) => current.merge(newer),
            None => *self = Some(newer),
        }
    }
}

impl<V: Merge> Merge for IndexMap<String, V> {
    fn merge(&mut self, newer: Self) {
        for (key, value) in newer {
            match self.get_mut(&key) {
                Some(current) => current.merge(value),
                None => {
                    self.insert(key, value);
                }
            }
        }
    }
}

macro_rules! replace_on_merge {
    ($($ty:ty),+ $(,)?) => {
        $(impl Merge for $ty {
            fn merge(&mut self, newer: Self) {
                *self = newer;
            }
        })+
    };
}

replace_on_merge!(
    String,
    bool,
    i64,
    Number,
    Value,
    In,
    Style,
    SchemaType,
    SecuritySchemeType,
    SecuritySchemeIn,
);

macro_rules! merge_fields {
    ($($ty:ident { $($field:ident),+ $(,)? })+) => {
        $(impl Merge for $ty {
            fn merge(&mut self, newer: Self) {
                $(self.$field.merge(newer.$field);)+
            }
        })+
    };
}

merge_fields! {
    OpenApi {
        openapi, info, json_schema_dialect, external_docs, servers, security, tags, paths, webhooks,
        components, extensions,
    }
    Info { title, summary, description, terms_of_service, contact, license, version, extensions }
    Contact { name, url, email, extensions }
    License { name, identifier, url, extensions }
    Tag { name, description, external_docs, extensions }
    ExternalDocumentation { description, url, extensions }
    Server { url, description, variables, extensions }
    ServerVariable { enumeration, default_value, description, extensions }
    Components {
        schemas, responses, parameters, examples, request_bodies, headers, security_schemes, links,
        callbacks, path_items, extensions,
    }
    Paths { path_items, extensions }
    PathItem {
        reference, summary, description, get, put, post, delete, options, head, patch, trace,
        servers, parameters, extensions,
    }
    Operation {
        tags, summary, description, external_docs, operation_id, parameters, request_body,
        responses, callbacks, deprecated, security, servers, extensions,
    }
    Callback { reference, path_items, extensions }
    RequestBody { reference, description, content, required, extensions }
    Header {
        reference, description, required, deprecated, allow_empty_value, style, explode, schema,
        example, examples, content, extensions,
    }
    Content { media_types }
    MediaType { schema, example, examples, encoding, extensions }
    Encoding { content_type, headers, style, explode, allow_reserved, extensions }
    Example { reference, summary, description, value, external_value, extensions }
    ApiResponses { responses, extensions }
    ApiResponse { reference, description, headers, content, links, extensions }
    Link {
        reference, operation_ref, operation_id, parameters, request_body, description, server,
        extensions,
    }
    SecurityScheme {
        reference, scheme_type, description, name, location, scheme, bearer_format, flows,
        open_id_connect_url, extensions,
    }
    OAuthFlows { implicit, password, client_credentials, authorization_code, extensions }
    OAuthFlow { authorization_url, token_url, refresh_url, scopes, extensions }
    SecurityRequirement { schemes }
    Discriminator { property_name, mapping }
    Xml { name, namespace, prefix, attribute, wrapped, extensions }
}

impl Merge for Parameter {
    fn merge(&mut self, newer: Self) {
        self.reference.merge(newer.reference);
        self.name.merge(newer.name);
        self.location.merge(newer.location);
        self.description.merge(newer.description);
        self.required.merge(newer.required);
        self.deprecated.merge(newer.deprecated);
        self.allow_empty_value.merge(newer.allow_empty_value);
        self.style.merge(newer.style);
        self.explode.merge(newer.explode);
        self.allow_reserved.merge(newer.allow_reserved);
        self.schema.merge(newer.schema);
        self.example.merge(newer.example);
        self.examples.merge(newer.examples);
        self.content.merge(newer.content);
        self.extensions.merge(newer.extensions);
        self.hidden |= newer.hidden;
    }
}

impl Merge for Vec<String> {
    fn merge(&mut self, newer: Self) {
        for value in newer {
            if !self.contains(&value) {
                self.push(value);
            }
        }
    }
}

impl Merge for Vec<Value> {
    fn merge(&mut self, newer: Self) {
        for value in newer {
            if !self.contains(&value) {
                self.push(value);
            }
        }
    }
}

impl Merge for Vec<SecurityRequirement> {
    fn merge(&mut self, newer: Self) {
        for requirement in newer {
            if !self.contains(&requirement) {
                self.push(requirement);
            }
        }
    }
}

/// Merge list entries matched by `same`, appending the rest.
fn merge_matching<T: Merge>(current: &mut Vec<T>, newer: Vec<T>, same: impl Fn(&T, &T) -> bool) {
    for item in newer {
        match current.iter_mut().find(|existing| same(existing, &item)) {
            Some(existing) => existing.merge(item),
            None => current.push(item),
        }
    }
}

impl Merge for Vec<Parameter> {
    fn merge(&mut self, newer: Self) {
        merge_matching(self, newer, |a, b| match (&a.reference, &b.reference) {
            (Some(x), Some(y)) => x == y,
            (None, None) => a.name.is_some() && a.name == b.name && a.location == b.location,
            _ => false,
        });
    }
}

impl Merge for Vec<Tag> {
    fn merge(&mut self, newer: Self) {
        merge_matching(self, newer, |a, b| a.name.is_some() && a.name == b.name);
    }
}

impl Merge for Vec<Server> {
    fn merge(&mut self, newer: Self) {
        merge_matching(self, newer, |a, b| a.url.is_some() && a.url == b.url);
    }
}

impl Merge for Vec<SchemaNode> {
    fn merge(&mut self, newer: Self) {
        for node in newer {
            if !self.iter().any(|existing| existing.ptr_eq(&node)) {
                self.push(node);
            }
        }
    }
}

/// Node pairs already merged during one schema merge.
type Merged = HashSet<(usize, usize)>;

impl Merge for Schema {
    fn merge(&mut self, newer: Self) {
        self.merge_with(newer, &mut Merged::new());
    }
}

impl Schema {
    fn merge_with(&mut self, newer: Schema, merged: &mut Merged) {
        macro_rules! plain {
            ($($field:ident),+ $(,)?) => {
                $(self.$field.merge(newer.$field);)+
            };
        }
        plain!(
            reference, format, title, description, default_value, multiple_of, maximum,
            exclusive_maximum, minimum, exclusive_minimum, max_length, min_length, pattern,
            max_items, min_items, unique_items, max_properties, min_properties, required,
            enumeration, schema_type, all_of, read_only, xml, external_docs, example, one_of,
            any_of, discriminator, nullable, write_only, deprecated, extensions,
        );
        merge_node(&mut self.items, newer.items, merged);
        merge_node(&mut self.not, newer.not, merged);
        if let Some(properties) = newer.properties {
            let current = self.properties.get_or_insert_with(IndexMap::new);
            for (name, node) in properties {
                match current.get_mut(&name) {
                    Some(existing) => existing.merge_with(node, merged),
                    None => {
                        current.insert(name, node);
                    }
                }
            }
        }
        match (&mut self.additional_properties, newer.additional_properties) {
            (_, None) => {}
            (
                Some(AdditionalProperties::Schema(current)),
                Some(AdditionalProperties::Schema(node)),
            ) => current.merge_with(node, merged),
            (current, newer) => *current = newer,
        }
    }
}

fn merge_node(current: &mut Option<SchemaNode>, newer: Option<SchemaNode>, merged: &mut Merged) {
    match (current, newer) {
        (_, None) => {}
        (Some(current), Some(newer)) => current.merge_with(newer, merged),
        (current, newer) => *current = newer,
    }
}

impl Merge for SchemaNode {
    /// Merges into the shared schema in place. Cycles and self-merges are no-ops.
    fn merge(&mut self, newer: Self) {
        self.merge_with(newer, &mut Merged::new());
    }
}

impl SchemaNode {
    fn merge_with(&mut self, newer: SchemaNode, merged: &mut Merged) {
        if self.ptr_eq(&newer) || !merged.insert((self.id(), newer.id())) {
            return;
        }
        // Work on copies so recursion never holds a borrow of a node it may revisit.
        let mut target = self.borrow().clone();
        let source = newer.borrow().clone();
        target.merge_with(source, merged);
        *self.borrow_mut() = target;
    }
}
