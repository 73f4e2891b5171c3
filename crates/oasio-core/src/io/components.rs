use indexmap::IndexMap;

use crate::annotation::{AnnotationInstance, names};
use crate::json::JsonIo;
use crate::model::{ApiResponse, Components};

use super::{
    AnnotationReader, ComponentsIo, JsonReader, JsonWriter, ModelIo, ObjectReader, ObjectWriter,
    OpenApiVersion, annotation_key,
};

impl<J: JsonIo> AnnotationReader<J> for ComponentsIo<'_, J> {
    const ANNOTATION: &'static str = names::COMPONENTS;

    fn read_annotation(&self, annotation: &AnnotationInstance) -> Components {
        let ctx = self.context();
        Components {
            schemas: ctx.schemas().read_nested_map(annotation, "schemas"),
            responses: self.read_named_responses(annotation),
            parameters: ctx.parameters().read_nested_map(annotation, "parameters"),
            examples: ctx.examples().read_nested_map(annotation, "examples"),
            request_bodies: ctx
                .request_bodies()
                .read_nested_map(annotation, "requestBodies"),
            headers: ctx.headers().read_nested_map(annotation, "headers"),
            security_schemes: ctx
                .security_schemes()
                .read_nested_map(annotation, "securitySchemes"),
            links: ctx.links().read_nested_map(annotation, "links"),
            callbacks: ctx.callbacks().read_nested_map(annotation, "callbacks"),
            path_items: None,
            extensions: ctx.extensions().read_extensible(annotation),
        }
    }
}

impl<J: JsonIo> ComponentsIo<'_, J> {
    /// Component responses are keyed by `name`, not by response code.
    fn read_named_responses(
        &self,
        annotation: &AnnotationInstance,
    ) -> Option<IndexMap<String, ApiResponse>> {
        let response = self.context().response();
        let mut responses = IndexMap::new();
        for nested in annotation.nested_array("responses").unwrap_or_default() {
            let Some(name) = annotation_key(nested, "name") else {
                log::warn!("@APIResponse in @Components without a name skipped");
                continue;
            };
            if responses.contains_key(&name) {
                log::warn!("duplicate component response {name:?} ignored");
                continue;
            }
            responses.insert(name, response.read_annotation(nested));
        }
        (!responses.is_empty()).then_some(responses)
    }
}

impl<J: JsonIo> JsonReader<J> for ComponentsIo<'_, J> {
    fn read_object(&self, node: &J::Object) -> Components {
        let ctx = self.context();
        Components {
            schemas: ctx.schemas().read_map_property(node, "schemas"),
            responses: ctx.response().read_map_property(node, "responses"),
            parameters: ctx.parameters().read_map_property(node, "parameters"),
            examples: ctx.examples().read_map_property(node, "examples"),
            request_bodies: ctx
                .request_bodies()
                .read_map_property(node, "requestBodies"),
            headers: ctx.headers().read_map_property(node, "headers"),
            security_schemes: ctx
                .security_schemes()
                .read_map_property(node, "securitySchemes"),
            links: ctx.links().read_map_property(node, "links"),
            callbacks: ctx.callbacks().read_map_property(node, "callbacks"),
            path_items: ctx.path_items().read_map_property(node, "pathItems"),
            extensions: ObjectReader::new(self.json(), node).extensions(),
        }
    }
}

impl<J: JsonIo> JsonWriter<J> for ComponentsIo<'_, J> {
    fn write(&self, model: &Components) -> Option<J::Value> {
        let ctx = self.context();
        let mut out = ObjectWriter::new(self.json());
        out.node("schemas", ctx.schemas().write_map(model.schemas.as_ref()));
        out.node("responses", ctx.response().write_map(model.responses.as_ref()));
        out.node("parameters", ctx.parameters().write_map(model.parameters.as_ref()));
        out.node("examples", ctx.examples().write_map(model.examples.as_ref()));
        out.node(
            "requestBodies",
            ctx.request_bodies()
                .write_map(model.request_bodies.as_ref()),
        );
        out.node("headers", ctx.headers().write_map(model.headers.as_ref()));
        out.node(
            "securitySchemes",
            ctx.security_schemes()
                .write_map(model.security_schemes.as_ref()),
        );
        out.node("links", ctx.links().write_map(model.links.as_ref()));
        out.node("callbacks", ctx.callbacks().write_map(model.callbacks.as_ref()));
        if ctx.version() == OpenApiVersion::V3_1 {
            out.node("pathItems", ctx.path_items().write_map(model.path_items.as_ref()));
        } else if model.path_items.is_some() {
            log::debug!("components.pathItems dropped from a 3.0 document");
        }
        out.extensions(model.extensions.as_ref());
        Some(out.build())
    }
}
