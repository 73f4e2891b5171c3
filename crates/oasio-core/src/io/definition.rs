use crate::annotation::{AnnotationInstance, names};
use crate::json::JsonIo;
use crate::model::OpenApi;

use super::{
    AnnotationReader, JsonReader, JsonWriter, ModelIo, ObjectReader, ObjectWriter,
    OpenApiDefinitionIo, OpenApiVersion,
};

impl<J: JsonIo> AnnotationReader<J> for OpenApiDefinitionIo<'_, J> {
    const ANNOTATION: &'static str = names::OPENAPI_DEFINITION;

    /// `@OpenAPIDefinition`; the document version comes from configuration.
    fn read_annotation(&self, annotation: &AnnotationInstance) -> OpenApi {
        let ctx = self.context();
        let requirements = ctx.security_requirements();
        let mut security = requirements
            .read_nested_list(annotation, "security")
            .unwrap_or_default();
        security.extend(
            requirements
                .read_nested_sets(annotation, "securitySets")
                .unwrap_or_default(),
        );
        OpenApi {
            openapi: Some(ctx.config().openapi_version.clone()),
            info: ctx.info().read_nested(annotation, "info"),
            tags: ctx.tags().read_nested_list(annotation, "tags"),
            servers: ctx.servers().read_nested_list(annotation, "servers"),
            security: (!security.is_empty()).then_some(security),
            external_docs: ctx.external_docs().read_nested(annotation, "externalDocs"),
            components: ctx.components().read_nested(annotation, "components"),
            extensions: ctx.extensions().read_extensible(annotation),
            ..OpenApi::default()
        }
    }
}

impl<J: JsonIo> JsonReader<J> for OpenApiDefinitionIo<'_, J> {
    /// Reads the root object. `openapi` is read first and selects the
    /// version every nested reader sees.
    fn read_object(&self, node: &J::Object) -> OpenApi {
        let ctx = self.context();
        let r = ObjectReader::new(self.json(), node);
        let openapi = r.string("openapi");
        ctx.set_version(OpenApiVersion::parse(openapi.as_deref()));
        log::debug!("reading OpenAPI {} document", openapi.as_deref().unwrap_or("(unversioned)"));
        OpenApi {
            openapi,
            info: ctx.info().read_property(node, "info"),
            json_schema_dialect: r.string("jsonSchemaDialect"),
            external_docs: ctx.external_docs().read_property(node, "externalDocs"),
            servers: ctx.servers().read_list(node, "servers"),
            security: ctx.security_requirements().read_list(node, "security"),
            tags: ctx.tags().read_list(node, "tags"),
            paths: ctx.paths().read_property(node, "paths"),
            webhooks: ctx.path_items().read_map_property(node, "webhooks"),
            components: ctx.components().read_property(node, "components"),
            extensions: r.extensions(),
        }
    }
}

impl<J: JsonIo> JsonWriter<J> for OpenApiDefinitionIo<'_, J> {
    /// Writes the root object, or nothing when `openapi` is unset.
    fn write(&self, model: &OpenApi) -> Option<J::Value> {
        let ctx = self.context();
        let openapi = model.openapi.as_deref()?;
        ctx.set_version(OpenApiVersion::parse(Some(openapi)));
        let v3_1 = ctx.version() == OpenApiVersion::V3_1;

        let mut out = ObjectWriter::new(self.json());
        out.string("openapi", Some(openapi));
        out.node("info", ctx.info().write_opt(model.info.as_ref()));
        if v3_1 {
            out.string("jsonSchemaDialect", model.json_schema_dialect.as_deref());
        }
        out.node("externalDocs", ctx.external_docs().write_opt(model.external_docs.as_ref()));
        out.node("servers", ctx.servers().write_list(model.servers.as_deref()));
        out.node(
            "security",
            ctx.security_requirements()
                .write_requirements(model.security.as_deref()),
        );
        out.node("tags", ctx.tags().write_list(model.tags.as_deref()));
        out.node("paths", ctx.paths().write_opt(model.paths.as_ref()));
        if v3_1 {
            out.node("webhooks", ctx.path_items().write_map(model.webhooks.as_ref()));
        }
        out.node("components", ctx.components().write_opt(model.components.as_ref()));
        out.extensions(model.extensions.as_ref());
        Some(out.build())
    }
}
