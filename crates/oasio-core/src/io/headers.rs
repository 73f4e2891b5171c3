use crate::annotation::{AnnotationInstance, names};
use crate::json::JsonIo;
use crate::model::{Header, Reference, ReferenceType, Style};

use super::{
    AnnotationReader, HeaderIo, JsonReader, JsonWriter, ModelIo, ObjectReader, ObjectWriter,
    annotation_ref, string_member, write_reference,
};

impl<J: JsonIo> AnnotationReader<J> for HeaderIo<'_, J> {
    const ANNOTATION: &'static str = names::HEADER;

    /// The `name` member is the map key, not part of the header.
    fn read_annotation(&self, annotation: &AnnotationInstance) -> Header {
        let ctx = self.context();
        Header {
            reference: annotation_ref(annotation, ReferenceType::Header),
            description: string_member(annotation, "description"),
            schema: annotation
                .nested("schema")
                .and_then(|a| ctx.schemas().read_visible(a)),
            required: annotation.bool_value("required"),
            deprecated: annotation.bool_value("deprecated"),
            allow_empty_value: annotation.bool_value("allowEmptyValue"),
            extensions: ctx.extensions().read_extensible(annotation),
            ..Header::default()
        }
    }
}

impl<J: JsonIo> JsonReader<J> for HeaderIo<'_, J> {
    fn read_object(&self, node: &J::Object) -> Header {
        let ctx = self.context();
        let r = ObjectReader::new(self.json(), node);
        Header {
            reference: r.reference(),
            description: r.string("description"),
            required: r.boolean("required"),
            deprecated: r.boolean("deprecated"),
            allow_empty_value: r.boolean("allowEmptyValue"),
            style: r.string("style").and_then(|s| Style::from_wire(&s)),
            explode: r.boolean("explode"),
            schema: ctx.schemas().read_property(node, "schema"),
            example: r.native("example"),
            examples: ctx.examples().read_map_property(node, "examples"),
            content: ctx.content().read_property(node, "content"),
            extensions: r.extensions(),
        }
    }
}

impl<J: JsonIo> JsonWriter<J> for HeaderIo<'_, J> {
    fn write(&self, model: &Header) -> Option<J::Value> {
        let ctx = self.context();
        if let Some(reference) = model.reference() {
            return Some(write_reference(ctx, reference, None, model.description.as_deref()));
        }
        let mut out = ObjectWriter::new(self.json());
        out.string("description", model.description.as_deref());
        out.boolean("required", model.required);
        out.boolean("deprecated", model.deprecated);
        out.boolean("allowEmptyValue", model.allow_empty_value);
        out.string("style", model.style.map(|s| s.as_str()));
        out.boolean("explode", model.explode);
        out.node("schema", ctx.schemas().write_opt(model.schema.as_ref()));
        out.native("example", model.example.as_ref());
        out.node("examples", ctx.examples().write_map(model.examples.as_ref()));
        out.node("content", ctx.content().write_opt(model.content.as_ref()));
        out.extensions(model.extensions.as_ref());
        Some(out.build())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::IoContext;
    use crate::json::SerdeJsonIo;
    use serde_json::json;

    #[test]
    fn test_headers_keyed_by_name() {
        let ctx = IoContext::for_json(SerdeJsonIo::new());
        let response = AnnotationInstance::new(names::API_RESPONSE).with(
            "headers",
            vec![
                AnnotationInstance::new(names::HEADER)
                    .with("name", "X-Rate-Limit")
                    .with("required", true),
                AnnotationInstance::new(names::HEADER).with("ref", "Trace"),
            ],
        );
        let headers = ctx.headers().read_nested_map(&response, "headers").unwrap();
        assert_eq!(headers.keys().collect::<Vec<_>>(), vec!["X-Rate-Limit", "Trace"]);
        assert_eq!(headers["X-Rate-Limit"].required, Some(true));
        assert_eq!(
            headers["Trace"].reference.as_deref(),
            Some("#/components/headers/Trace")
        );
    }

    #[test]
    fn test_reference_writes_description_in_3_1() {
        let ctx = IoContext::for_json(SerdeJsonIo::new());
        let header = Header {
            reference: Some("#/components/headers/Trace".into()),
            description: Some("trace id".into()),
            required: Some(true),
            ..Header::default()
        };
        assert_eq!(
            ctx.headers().write(&header),
            Some(json!({"$ref": "#/components/headers/Trace", "description": "trace id"}))
        );
    }
}
