use indexmap::IndexMap;
use serde_json::Value;

use crate::annotation::{AnnotationInstance, names};
use crate::json::JsonIo;
use crate::model::{Link, Reference, ReferenceType};

use super::{
    AnnotationReader, JsonReader, JsonWriter, LinkIo, ModelIo, ObjectReader, ObjectWriter,
    annotation_ref, string_member, write_reference,
};

/// `@LinkParameter` entries as name to expression; `None` when empty.
fn read_link_parameters(annotation: &AnnotationInstance) -> Option<IndexMap<String, Value>> {
    let parameters: IndexMap<String, Value> = annotation
        .nested_array("parameters")?
        .into_iter()
        .filter_map(|p| {
            let name = string_member(p, "name")?;
            let expression = p.string_value("expression").unwrap_or_default();
            Some((name, Value::String(expression.to_string())))
        })
        .collect();
    (!parameters.is_empty()).then_some(parameters)
}

impl<J: JsonIo> AnnotationReader<J> for LinkIo<'_, J> {
    const ANNOTATION: &'static str = names::LINK;

    fn read_annotation(&self, annotation: &AnnotationInstance) -> Link {
        let ctx = self.context();
        Link {
            reference: annotation_ref(annotation, ReferenceType::Link),
            operation_ref: string_member(annotation, "operationRef"),
            operation_id: string_member(annotation, "operationId"),
            parameters: read_link_parameters(annotation),
            request_body: string_member(annotation, "requestBody").map(Value::String),
            description: string_member(annotation, "description"),
            server: ctx.servers().read_nested(annotation, "server"),
            extensions: ctx.extensions().read_extensible(annotation),
        }
    }
}

impl<J: JsonIo> JsonReader<J> for LinkIo<'_, J> {
    fn read_object(&self, node: &J::Object) -> Link {
        let r = ObjectReader::new(self.json(), node);
        Link {
            reference: r.reference(),
            operation_ref: r.string("operationRef"),
            operation_id: r.string("operationId"),
            parameters: r.native_map("parameters"),
            request_body: r.native("requestBody"),
            description: r.string("description"),
            server: self.context().servers().read_property(node, "server"),
            extensions: r.extensions(),
        }
    }
}

impl<J: JsonIo> JsonWriter<J> for LinkIo<'_, J> {
    fn write(&self, model: &Link) -> Option<J::Value> {
        let ctx = self.context();
        if let Some(reference) = model.reference() {
            return Some(write_reference(ctx, reference, None, model.description.as_deref()));
        }
        let json = self.json();
        let mut out = ObjectWriter::new(json);
        out.string("operationRef", model.operation_ref.as_deref());
        out.string("operationId", model.operation_id.as_deref());
        if let Some(parameters) = model.parameters.as_ref().filter(|p| !p.is_empty()) {
            let object: serde_json::Map<String, Value> = parameters
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect();
            out.native("parameters", Some(&Value::Object(object)));
        }
        out.native("requestBody", model.request_body.as_ref());
        out.string("description", model.description.as_deref());
        out.node("server", ctx.servers().write_opt(model.server.as_ref()));
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
    fn test_link_from_annotation() {
        let ctx = IoContext::for_json(SerdeJsonIo::new());
        let annotation = AnnotationInstance::new(names::LINK)
            .with("name", "owner")
            .with("operationId", "getUser")
            .with(
                "parameters",
                vec![
                    AnnotationInstance::new(names::LINK_PARAMETER)
                        .with("name", "userId")
                        .with("expression", "$response.body#/ownerId"),
                ],
            );
        let link = ctx.links().read_annotation(&annotation);
        assert_eq!(
            ctx.links().write(&link),
            Some(json!({
                "operationId": "getUser",
                "parameters": {"userId": "$response.body#/ownerId"}
            }))
        );
    }

    #[test]
    fn test_link_json_keeps_parameter_order() {
        let ctx = IoContext::for_json(SerdeJsonIo::new());
        let node = json!({
            "operationRef": "#/paths/~1users/get",
            "parameters": {"z": "$request.path.z", "a": 1},
            "requestBody": {"id": "$response.body#/id"},
            "server": {"url": "https://example.com"}
        });
        let link = ctx.links().read_value(&node).unwrap();
        let keys: Vec<_> = link.parameters.as_ref().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["z", "a"]);
        assert_eq!(ctx.links().write(&link), Some(node));
    }
}
