use std::collections::HashSet;

use indexmap::IndexMap;

use super::{
    AdditionalProperties, ApiResponse, ApiResponses, Callback, Components, Content, Header,
    HttpMethod, Link, OpenApi, Operation, Parameter, PathItem, RequestBody, SchemaNode,
    SecurityScheme, Server, Tag,
};

/// Per-construct hooks applied to a finished model.
///
/// Returning `None` removes the construct from its parent. Children are
/// filtered before their parent's hook runs.
pub trait OasFilter {
    fn filter_path_item(&mut self, path_item: PathItem) -> Option<PathItem> {
        Some(path_item)
    }

    fn filter_operation(&mut self, operation: Operation) -> Option<Operation> {
        Some(operation)
    }

    fn filter_parameter(&mut self, parameter: Parameter) -> Option<Parameter> {
        Some(parameter)
    }

    fn filter_header(&mut self, header: Header) -> Option<Header> {
        Some(header)
    }

    fn filter_request_body(&mut self, request_body: RequestBody) -> Option<RequestBody> {
        Some(request_body)
    }

    fn filter_api_response(&mut self, response: ApiResponse) -> Option<ApiResponse> {
        Some(response)
    }

    /// Called once per distinct schema, even when it is reachable from many places.
    fn filter_schema(&mut self, schema: SchemaNode) -> Option<SchemaNode> {
        Some(schema)
    }

    fn filter_security_scheme(&mut self, scheme: SecurityScheme) -> Option<SecurityScheme> {
        Some(scheme)
    }

    fn filter_server(&mut self, server: Server) -> Option<Server> {
        Some(server)
    }

    fn filter_tag(&mut self, tag: Tag) -> Option<Tag> {
        Some(tag)
    }

    fn filter_link(&mut self, link: Link) -> Option<Link> {
        Some(link)
    }

    fn filter_callback(&mut self, callback: Callback) -> Option<Callback> {
        Some(callback)
    }

    fn filter_openapi(&mut self, _openapi: &mut OpenApi) {}
}

/// Run `filter` over every construct of `openapi`.
pub fn apply_filter<F: OasFilter>(filter: &mut F, openapi: OpenApi) -> OpenApi {
    let mut walker = Walker {
        filter,
        visited: HashSet::new(),
    };
    walker.openapi(openapi)
}

struct Walker<'f, F> {
    filter: &'f mut F,
    visited: HashSet<usize>,
}

fn filter_list<T>(list: Option<Vec<T>>, mut f: impl FnMut(T) -> Option<T>) -> Option<Vec<T>> {
    list.map(|items| items.into_iter().filter_map(&mut f).collect())
}

fn filter_map<T>(
    map: Option<IndexMap<String, T>>,
    mut f: impl FnMut(T) -> Option<T>,
) -> Option<IndexMap<String, T>> {
    map.map(|entries| {
        entries
            .into_iter()
            .filter_map(|(k, v)| f(v).map(|v| (k, v)))
            .collect()
    })
}

impl<F: OasFilter> Walker<'_, F> {
    fn openapi(&mut self, mut openapi: OpenApi) -> OpenApi {
        openapi.servers = filter_list(openapi.servers.take(), |s| self.server(s));
        openapi.tags = filter_list(openapi.tags.take(), |t| self.filter.filter_tag(t));
        if let Some(paths) = &mut openapi.paths {
            let items = std::mem::take(&mut paths.path_items);
            paths.path_items = items
                .into_iter()
                .filter_map(|(k, v)| self.path_item(v).map(|v| (k, v)))
                .collect();
        }
        openapi.webhooks = filter_map(openapi.webhooks.take(), |p| self.path_item(p));
        openapi.components = openapi.components.take().map(|c| self.components(c));
        self.filter.filter_openapi(&mut openapi);
        openapi
    }

    fn components(&mut self, mut components: Components) -> Components {
        components.schemas = filter_map(components.schemas.take(), |s| self.schema(s));
        components.responses = filter_map(components.responses.take(), |r| self.response(r));
        components.parameters = filter_map(components.parameters.take(), |p| self.parameter(p));
        components.request_bodies =
            filter_map(components.request_bodies.take(), |b| self.request_body(b));
        components.headers = filter_map(components.headers.take(), |h| self.header(h));
        components.security_schemes = filter_map(components.security_schemes.take(), |s| {
            self.filter.filter_security_scheme(s)
        });
        components.links = filter_map(components.links.take(), |l| self.link(l));
        components.callbacks = filter_map(components.callbacks.take(), |c| self.callback(c));
        components.path_items = filter_map(components.path_items.take(), |p| self.path_item(p));
        components
    }

    fn path_item(&mut self, mut path_item: PathItem) -> Option<PathItem> {
        for method in HttpMethod::VALUES {
            let slot = path_item.operation_mut(*method);
            if let Some(operation) = slot.take() {
                *slot = self.operation(operation);
            }
        }
        path_item.parameters = filter_list(path_item.parameters.take(), |p| self.parameter(p));
        path_item.servers = filter_list(path_item.servers.take(), |s| self.server(s));
        self.filter.filter_path_item(path_item)
    }

    fn operation(&mut self, mut operation: Operation) -> Option<Operation> {
        operation.parameters = filter_list(operation.parameters.take(), |p| self.parameter(p));
        operation.request_body = operation
            .request_body
            .take()
            .and_then(|b| self.request_body(b));
        operation.responses = operation.responses.take().map(|r| self.responses(r));
        operation.callbacks = filter_map(operation.callbacks.take(), |c| self.callback(c));
        operation.servers = filter_list(operation.servers.take(), |s| self.server(s));
        self.filter.filter_operation(operation)
    }

    fn responses(&mut self, mut responses: ApiResponses) -> ApiResponses {
        let entries = std::mem::take(&mut responses.responses);
        responses.responses = entries
            .into_iter()
            .filter_map(|(k, v)| self.response(v).map(|v| (k, v)))
            .collect();
        responses
    }

    fn response(&mut self, mut response: ApiResponse) -> Option<ApiResponse> {
        response.headers = filter_map(response.headers.take(), |h| self.header(h));
        response.content = response.content.take().map(|c| self.content(c));
        response.links = filter_map(response.links.take(), |l| self.link(l));
        self.filter.filter_api_response(response)
    }

    fn parameter(&mut self, mut parameter: Parameter) -> Option<Parameter> {
        parameter.schema = parameter.schema.take().and_then(|s| self.schema(s));
        parameter.content = parameter.content.take().map(|c| self.content(c));
        self.filter.filter_parameter(parameter)
    }

    fn header(&mut self, mut header: Header) -> Option<Header> {
        header.schema = header.schema.take().and_then(|s| self.schema(s));
        header.content = header.content.take().map(|c| self.content(c));
        self.filter.filter_header(header)
    }

    fn request_body(&mut self, mut body: RequestBody) -> Option<RequestBody> {
        body.content = body.content.take().map(|c| self.content(c));
        self.filter.filter_request_body(body)
    }

    fn content(&mut self, mut content: Content) -> Content {
        for media_type in content.media_types.values_mut() {
            media_type.schema = media_type.schema.take().and_then(|s| self.schema(s));
            if let Some(encoding) = &mut media_type.encoding {
                for value in encoding.values_mut() {
                    value.headers = filter_map(value.headers.take(), |h| self.header(h));
                }
            }
        }
        content
    }

    fn callback(&mut self, mut callback: Callback) -> Option<Callback> {
        let items = std::mem::take(&mut callback.path_items);
        callback.path_items = items
            .into_iter()
            .filter_map(|(k, v)| self.path_item(v).map(|v| (k, v)))
            .collect();
        self.filter.filter_callback(callback)
    }

    fn link(&mut self, mut link: Link) -> Option<Link> {
        link.server = link.server.take().and_then(|s| self.server(s));
        self.filter.filter_link(link)
    }

    fn server(&mut self, server: Server) -> Option<Server> {
        self.filter.filter_server(server)
    }

    fn schema(&mut self, node: SchemaNode) -> Option<SchemaNode> {
        if !self.visited.insert(node.id()) {
            return Some(node);
        }
        let mut schema = node.borrow().clone();
        schema.items = schema.items.take().and_then(|s| self.schema(s));
        schema.not = schema.not.take().and_then(|s| self.schema(s));
        schema.all_of = filter_list(schema.all_of.take(), |s| self.schema(s));
        schema.one_of = filter_list(schema.one_of.take(), |s| self.schema(s));
        schema.any_of = filter_list(schema.any_of.take(), |s| self.schema(s));
        schema.properties = filter_map(schema.properties.take(), |s| self.schema(s));
        schema.additional_properties = match schema.additional_properties.take() {
            Some(AdditionalProperties::Schema(s)) => {
                self.schema(s).map(AdditionalProperties::Schema)
            }
            other => other,
        };
        *node.borrow_mut() = schema;
        self.filter.filter_schema(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{In, Paths, Schema, SchemaType};

    struct DropQueryParams {
        schemas_seen: usize,
    }

    impl OasFilter for DropQueryParams {
        fn filter_parameter(&mut self, parameter: Parameter) -> Option<Parameter> {
            (parameter.location != Some(In::Query)).then_some(parameter)
        }

        fn filter_schema(&mut self, schema: SchemaNode) -> Option<SchemaNode> {
            self.schemas_seen += 1;
            Some(schema)
        }
    }

    #[test]
    fn test_filter_removes_constructs() {
        let operation = Operation {
            parameters: Some(vec![
                Parameter {
                    name: Some("q".into()),
                    location: Some(In::Query),
                    ..Parameter::default()
                },
                Parameter {
                    name: Some("id".into()),
                    location: Some(In::Path),
                    ..Parameter::default()
                },
            ]),
            ..Operation::default()
        };
        let mut paths = Paths::default();
        paths.path_items.insert(
            "/items/{id}".into(),
            PathItem {
                get: Some(operation),
                ..PathItem::default()
            },
        );
        let openapi = OpenApi {
            paths: Some(paths),
            ..OpenApi::default()
        };
        let mut filter = DropQueryParams { schemas_seen: 0 };
        let filtered = apply_filter(&mut filter, openapi);
        let params = filtered.paths.unwrap().path_items["/items/{id}"]
            .get
            .clone()
            .unwrap()
            .parameters
            .unwrap();
        assert_eq!(params.len(), 1);
        assert_eq!(params[0].name.as_deref(), Some("id"));
    }

    #[test]
    fn test_filter_cyclic_schemas_terminates() {
        let node = SchemaNode::new(Schema::of_type(SchemaType::Object));
        node.borrow_mut().not = Some(node.clone());
        node.borrow_mut().add_property("self", node.clone());
        let a = SchemaNode::new(Schema::default());
        let b = SchemaNode::new(Schema::default());
        let c = SchemaNode::new(Schema::default());
        a.borrow_mut().all_of = Some(vec![b.clone()]);
        b.borrow_mut().all_of = Some(vec![c.clone()]);
        c.borrow_mut().all_of = Some(vec![a.clone()]);

        let mut schemas = IndexMap::new();
        schemas.insert("Self".to_string(), node.clone());
        schemas.insert("A".to_string(), a.clone());
        let openapi = OpenApi {
            components: Some(Components {
                schemas: Some(schemas),
                ..Components::default()
            }),
            ..OpenApi::default()
        };
        let mut filter = DropQueryParams { schemas_seen: 0 };
        let filtered = apply_filter(&mut filter, openapi);
        assert_eq!(filter.schemas_seen, 4);
        let schemas = filtered.components.unwrap().schemas.unwrap();
        assert!(schemas["Self"].borrow().not.as_ref().unwrap().ptr_eq(&node));
    }
}
