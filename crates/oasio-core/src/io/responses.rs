use crate::annotation::{AnnotationInstance, AnnotationTarget, names};
use crate::json::JsonIo;
use crate::model::{ApiResponse, ApiResponses, Reference, ReferenceType, is_extension};

use super::{
    AnnotationReader, ApiResponseIo, ApiResponsesIo, ContentDirection, JsonReader, JsonWriter,
    ModelIo, ObjectReader, ObjectWriter, annotation_ref, string_member, write_reference,
};

impl<J: JsonIo> AnnotationReader<J> for ApiResponsesIo<'_, J> {
    const ANNOTATION: &'static str = names::API_RESPONSES;

    /// An `@APIResponses` container. Nested responses inherit its target so
    /// extensions declared on the method still apply to them.
    fn read_annotation(&self, annotation: &AnnotationInstance) -> ApiResponses {
        let nested: Vec<AnnotationInstance> = annotation
            .nested_array("value")
            .unwrap_or_default()
            .into_iter()
            .map(|a| a.retargeted(annotation.target.as_ref()))
            .collect();
        let mut responses = self.read_annotation_list(&nested);
        responses.extensions = self.context().extensions().read_extensible(annotation);
        responses
    }
}

impl<J: JsonIo> ApiResponsesIo<'_, J> {
    /// Responses keyed by response code, in annotation order.
    pub fn read_annotation_list<'x>(
        &self,
        annotations: impl IntoIterator<Item = &'x AnnotationInstance>,
    ) -> ApiResponses {
        ApiResponses {
            responses: self.context().response().read_annotation_map(annotations),
            extensions: None,
        }
    }

    /// `@APIResponse` annotations on `target`, bare or inside `@APIResponses`.
    pub fn read_all(&self, target: &AnnotationTarget) -> Option<ApiResponses> {
        let response = self.context().response();
        let annotations = response.repeatable_annotations(target);
        if annotations.is_empty() {
            return None;
        }
        Some(self.read_annotation_list(&annotations))
    }
}

impl<J: JsonIo> JsonReader<J> for ApiResponsesIo<'_, J> {
    fn read_object(&self, node: &J::Object) -> ApiResponses {
        let json = self.json();
        let response = self.context().response();
        let mut responses = ApiResponses {
            extensions: ObjectReader::new(json, node).extensions(),
            ..ApiResponses::default()
        };
        for (code, value) in json.entries(node) {
            if is_extension(&code) {
                continue;
            }
            if let Some(object) = json.as_object(value) {
                responses
                    .responses
                    .insert(code.into_owned(), response.read_object(object));
            }
        }
        responses
    }
}

impl<J: JsonIo> JsonWriter<J> for ApiResponsesIo<'_, J> {
    fn write(&self, model: &ApiResponses) -> Option<J::Value> {
        let response = self.context().response();
        let mut out = ObjectWriter::new(self.json());
        for (code, value) in &model.responses {
            out.node(code, response.write(value));
        }
        out.extensions(model.extensions.as_ref());
        Some(out.build())
    }
}

impl<J: JsonIo> AnnotationReader<J> for ApiResponseIo<'_, J> {
    const ANNOTATION: &'static str = names::API_RESPONSE;

    fn read_annotation(&self, annotation: &AnnotationInstance) -> ApiResponse {
        let ctx = self.context();
        ApiResponse {
            reference: annotation_ref(annotation, ReferenceType::Response),
            description: string_member(annotation, "description"),
            headers: ctx.headers().read_nested_map(annotation, "headers"),
            content: ctx
                .content()
                .read_member(annotation, "content", ContentDirection::Output),
            links: ctx.links().read_nested_map(annotation, "links"),
            extensions: ctx.extensions().read_extensible(annotation),
        }
    }

    /// Keyed by `responseCode`; unset means the default response.
    fn annotation_name(&self, annotation: &AnnotationInstance) -> Option<String> {
        Some(
            string_member(annotation, "responseCode")
                .unwrap_or_else(|| ApiResponses::DEFAULT.to_string()),
        )
    }
}

impl<J: JsonIo> JsonReader<J> for ApiResponseIo<'_, J> {
    fn read_object(&self, node: &J::Object) -> ApiResponse {
        let ctx = self.context();
        let r = ObjectReader::new(self.json(), node);
        ApiResponse {
            reference: r.reference(),
            description: r.string("description"),
            headers: ctx.headers().read_map_property(node, "headers"),
            content: ctx.content().read_property(node, "content"),
            links: ctx.links().read_map_property(node, "links"),
            extensions: r.extensions(),
        }
    }
}

impl<J: JsonIo> JsonWriter<J> for ApiResponseIo<'_, J> {
    fn write(&self, model: &ApiResponse) -> Option<J::Value> {
        let ctx = self.context();
        if let Some(reference) = model.reference() {
            return Some(write_reference(ctx, reference, None, model.description.as_deref()));
        }
        let mut out = ObjectWriter::new(self.json());
        out.string("description", model.description.as_deref());
        out.node("headers", ctx.headers().write_map(model.headers.as_ref()));
        out.node("content", ctx.content().write_opt(model.content.as_ref()));
        out.node("links", ctx.links().write_map(model.links.as_ref()));
        out.extensions(model.extensions.as_ref());
        Some(out.build())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::{ClassIndex, ClassInfo, MethodInfo, MethodRef, TypeRef};
    use crate::config::OasioConfig;
    use crate::io::IoContext;
    use crate::json::SerdeJsonIo;
    use serde_json::json;

    fn response(code: &str, description: &str) -> AnnotationInstance {
        AnnotationInstance::new(names::API_RESPONSE)
            .with("responseCode", code)
            .with("description", description)
    }

    #[test]
    fn test_responses_json_separates_extensions() {
        let ctx = IoContext::for_json(SerdeJsonIo::new());
        let node = json!({
            "200": {"description": "ok"},
            "default": {"$ref": "#/components/responses/Error"},
            "x-trace": true
        });
        let responses = ctx.responses().read_value(&node).unwrap();
        assert_eq!(responses.responses.len(), 2);
        assert!(responses.default_response().unwrap().is_reference());
        assert_eq!(responses.extensions.as_ref().unwrap()["x-trace"], json!(true));
        assert_eq!(ctx.responses().write(&responses), Some(node));
    }

    #[test]
    fn test_container_keys_by_response_code() {
        let ctx = IoContext::for_json(SerdeJsonIo::new());
        let container = AnnotationInstance::new(names::API_RESPONSES).with(
            "value",
            vec![
                response("404", "missing"),
                response("200", "found"),
                AnnotationInstance::new(names::API_RESPONSE).with("description", "other"),
                response("200", "duplicate"),
            ],
        );
        let responses = ctx.responses().read_annotation(&container);
        assert_eq!(
            responses.responses.keys().collect::<Vec<_>>(),
            vec!["404", "200", "default"]
        );
        assert_eq!(responses.responses["200"].description.as_deref(), Some("found"));
    }

    #[test]
    fn test_read_all_from_method() {
        let index = ClassIndex::new().with(
            ClassInfo::new("api.Pets").method(
                MethodInfo::new("list", TypeRef::class("java.util.List"))
                    .annotation(response("200", "pets"))
                    .annotation(
                        AnnotationInstance::new(names::API_RESPONSES)
                            .with("value", vec![response("500", "boom")]),
                    ),
            ),
        );
        let ctx = IoContext::for_scanning(SerdeJsonIo::new(), &index, OasioConfig::default());
        let target = AnnotationTarget::Method(MethodRef::new("api.Pets", "list"));
        let responses = ctx.responses().read_all(&target).unwrap();
        assert_eq!(responses.responses.keys().collect::<Vec<_>>(), vec!["200", "500"]);
    }
}
