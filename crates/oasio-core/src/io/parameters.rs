use crate::annotation::{AnnotationInstance, TargetKind, names};
use crate::json::JsonIo;
use crate::model::{In, Parameter, Reference, ReferenceType, RequestBody, Style};

use super::{
    AnnotationReader, ContentDirection, JsonReader, JsonWriter, ModelIo, ObjectReader,
    ObjectWriter, ParameterIo, RequestBodyIo, annotation_ref, string_member, write_reference,
};

/// `Explode.TRUE`/`FALSE`; `DEFAULT` leaves it unset.
fn read_explode(annotation: &AnnotationInstance) -> Option<bool> {
    match annotation.enum_value("explode")? {
        "TRUE" => Some(true),
        "FALSE" => Some(false),
        _ => None,
    }
}

fn read_in(annotation: &AnnotationInstance) -> Option<In> {
    annotation.enum_value("in").and_then(In::from_constant)
}

impl<J: JsonIo> AnnotationReader<J> for ParameterIo<'_, J> {
    const ANNOTATION: &'static str = names::PARAMETER;

    fn read_annotation(&self, annotation: &AnnotationInstance) -> Parameter {
        let ctx = self.context();
        let mut parameter = Parameter {
            name: string_member(annotation, "name"),
            location: read_in(annotation),
            ..Parameter::default()
        };

        if annotation.bool_value("hidden").unwrap_or(false) {
            parameter.hidden = true;
            return parameter;
        }

        parameter.description = string_member(annotation, "description");
        parameter.required = annotation.bool_value("required");
        parameter.deprecated = annotation.bool_value("deprecated");
        parameter.allow_empty_value = annotation.bool_value("allowEmptyValue");
        parameter.style = annotation
            .enum_value("style")
            .and_then(Style::from_constant);
        parameter.explode = read_explode(annotation);
        parameter.allow_reserved = annotation.bool_value("allowReserved");
        parameter.schema = annotation
            .nested("schema")
            .and_then(|a| ctx.schemas().read_visible(a));
        parameter.content = ctx
            .content()
            .read_member(annotation, "content", ContentDirection::Parameter);
        parameter.examples = ctx.examples().read_nested_map(annotation, "examples");
        parameter.example = annotation
            .string_value("example")
            .and_then(|v| self.json().parse_value(v));
        parameter.reference = annotation_ref(annotation, ReferenceType::Parameter);

        // Method-level extensions belong to the operation.
        if let Some(TargetKind::Field | TargetKind::MethodParameter) =
            annotation.target.as_ref().map(|t| t.kind())
        {
            parameter.extensions = ctx.extensions().read_extensible(annotation);
        }
        parameter
    }
}

impl<J: JsonIo> ParameterIo<'_, J> {
    /// Read a list of `@Parameter` annotations, skipping references.
    pub fn read_annotation_list<'x>(
        &self,
        annotations: impl IntoIterator<Item = &'x AnnotationInstance>,
    ) -> Vec<Parameter> {
        annotations
            .into_iter()
            .filter(|a| string_member(a, "ref").is_none())
            .map(|a| self.read_annotation(a))
            .collect()
    }
}

impl<J: JsonIo> JsonReader<J> for ParameterIo<'_, J> {
    fn read_object(&self, node: &J::Object) -> Parameter {
        let ctx = self.context();
        let r = ObjectReader::new(self.json(), node);
        Parameter {
            reference: r.reference(),
            name: r.string("name"),
            location: r.string("in").and_then(|s| In::from_wire(&s)),
            description: r.string("description"),
            required: r.boolean("required"),
            deprecated: r.boolean("deprecated"),
            allow_empty_value: r.boolean("allowEmptyValue"),
            style: r.string("style").and_then(|s| Style::from_wire(&s)),
            explode: r.boolean("explode"),
            allow_reserved: r.boolean("allowReserved"),
            schema: ctx.schemas().read_property(node, "schema"),
            example: r.native("example"),
            examples: ctx.examples().read_map_property(node, "examples"),
            content: ctx.content().read_property(node, "content"),
            extensions: r.extensions(),
            hidden: false,
        }
    }
}

impl<J: JsonIo> JsonWriter<J> for ParameterIo<'_, J> {
    fn write(&self, model: &Parameter) -> Option<J::Value> {
        let ctx = self.context();
        if let Some(reference) = model.reference() {
            return Some(write_reference(ctx, reference, None, model.description.as_deref()));
        }
        let mut out = ObjectWriter::new(self.json());
        out.string("name", model.name.as_deref());
        out.string("in", model.location.map(|l| l.as_str()));
        out.string("description", model.description.as_deref());
        out.boolean("required", model.required);
        out.node("schema", ctx.schemas().write_opt(model.schema.as_ref()));
        out.boolean("allowEmptyValue", model.allow_empty_value);
        out.boolean("deprecated", model.deprecated);
        out.string("style", model.style.map(|s| s.as_str()));
        out.boolean("explode", model.explode);
        out.boolean("allowReserved", model.allow_reserved);
        out.native("example", model.example.as_ref());
        out.node("examples", ctx.examples().write_map(model.examples.as_ref()));
        out.node("content", ctx.content().write_opt(model.content.as_ref()));
        out.extensions(model.extensions.as_ref());
        Some(out.build())
    }
}

impl<J: JsonIo> AnnotationReader<J> for RequestBodyIo<'_, J> {
    const ANNOTATION: &'static str = names::REQUEST_BODY;

    fn read_annotation(&self, annotation: &AnnotationInstance) -> RequestBody {
        let ctx = self.context();
        RequestBody {
            reference: annotation_ref(annotation, ReferenceType::RequestBody),
            description: string_member(annotation, "description"),
            content: ctx
                .content()
                .read_member(annotation, "content", ContentDirection::Input),
            required: annotation.bool_value("required"),
            extensions: ctx.extensions().read_extensible(annotation),
        }
    }
}

impl<J: JsonIo> JsonReader<J> for RequestBodyIo<'_, J> {
    fn read_object(&self, node: &J::Object) -> RequestBody {
        let r = ObjectReader::new(self.json(), node);
        RequestBody {
            reference: r.reference(),
            description: r.string("description"),
            content: self.context().content().read_property(node, "content"),
            required: r.boolean("required"),
            extensions: r.extensions(),
        }
    }
}

impl<J: JsonIo> JsonWriter<J> for RequestBodyIo<'_, J> {
    fn write(&self, model: &RequestBody) -> Option<J::Value> {
        let ctx = self.context();
        if let Some(reference) = model.reference() {
            return Some(write_reference(ctx, reference, None, model.description.as_deref()));
        }
        let mut out = ObjectWriter::new(self.json());
        out.string("description", model.description.as_deref());
        out.node("content", ctx.content().write_opt(model.content.as_ref()));
        out.boolean("required", model.required);
        out.extensions(model.extensions.as_ref());
        Some(out.build())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::{AnnotationTarget, MethodRef};
    use crate::io::IoContext;
    use crate::json::SerdeJsonIo;
    use serde_json::json;

    #[test]
    fn test_hidden_parameter_keeps_name_and_location() {
        let ctx = IoContext::for_json(SerdeJsonIo::new());
        let annotation = AnnotationInstance::new(names::PARAMETER)
            .with("name", "secret")
            .with_enum("in", "HEADER")
            .with("hidden", true)
            .with("description", "never read");
        let parameter = ctx.parameters().read_annotation(&annotation);
        assert!(parameter.hidden);
        assert_eq!(parameter.name.as_deref(), Some("secret"));
        assert_eq!(parameter.location, Some(In::Header));
        assert_eq!(parameter.description, None);
    }

    #[test]
    fn test_explode_and_default_location() {
        let ctx = IoContext::for_json(SerdeJsonIo::new());
        let read = |explode: &str| {
            let annotation = AnnotationInstance::new(names::PARAMETER)
                .with("name", "q")
                .with_enum("in", "DEFAULT")
                .with_enum("explode", explode);
            ctx.parameters().read_annotation(&annotation)
        };
        assert_eq!(read("TRUE").explode, Some(true));
        assert_eq!(read("FALSE").explode, Some(false));
        assert_eq!(read("DEFAULT").explode, None);
        assert_eq!(read("DEFAULT").location, None);
    }

    #[test]
    fn test_extensions_only_for_parameter_targets() {
        let ctx = IoContext::for_json(SerdeJsonIo::new());
        let extension = AnnotationInstance::new(names::EXTENSION)
            .with("name", "x-p")
            .with("value", "1");
        let method = MethodRef::new("api.Resource", "get");
        let base = AnnotationInstance::new(names::PARAMETER)
            .with("name", "id")
            .with("extensions", vec![extension]);

        let on_param = base.clone().on(method.parameter(0));
        assert!(
            ctx.parameters()
                .read_annotation(&on_param)
                .extensions
                .is_some()
        );

        let on_method = base.on(AnnotationTarget::Method(method));
        assert!(
            ctx.parameters()
                .read_annotation(&on_method)
                .extensions
                .is_none()
        );
    }

    #[test]
    fn test_annotation_list_skips_references() {
        let ctx = IoContext::for_json(SerdeJsonIo::new());
        let annotations = [
            AnnotationInstance::new(names::PARAMETER).with("ref", "Shared"),
            AnnotationInstance::new(names::PARAMETER).with("name", "limit"),
        ];
        let parameters = ctx.parameters().read_annotation_list(&annotations);
        assert_eq!(parameters.len(), 1);
        assert_eq!(parameters[0].name.as_deref(), Some("limit"));
    }

    #[test]
    fn test_json_round_trip() {
        let ctx = IoContext::for_json(SerdeJsonIo::new());
        let node = json!({
            "name": "id",
            "in": "path",
            "required": true,
            "schema": {"type": "integer"},
            "style": "simple",
            "x-order": 1
        });
        let parameter = ctx.parameters().read_value(&node).unwrap();
        assert_eq!(parameter.location, Some(In::Path));
        assert_eq!(parameter.style, Some(Style::Simple));
        assert_eq!(ctx.parameters().write(&parameter), Some(node));
    }

    #[test]
    fn test_request_body_reference_omits_required() {
        let ctx = IoContext::for_json(SerdeJsonIo::new());
        let body = RequestBody {
            reference: Some("#/components/requestBodies/Pet".into()),
            required: Some(true),
            ..RequestBody::default()
        };
        assert_eq!(
            ctx.request_bodies().write(&body),
            Some(json!({"$ref": "#/components/requestBodies/Pet"}))
        );
    }
}
