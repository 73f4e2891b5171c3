use crate::annotation::{AnnotationInstance, names};
use crate::json::JsonIo;
use crate::model::{Content, Encoding, Example, MediaType, ReferenceType, Style};

use super::{
    AnnotationReader, ContentIo, EncodingIo, ExampleIo, JsonReader, JsonWriter, MediaTypeIo,
    ModelIo, ObjectReader, ObjectWriter, annotation_ref, string_member, write_reference,
};

/// Wildcard media type used when `@Content` names none.
pub const DEFAULT_MEDIA_TYPE: &str = "*/*";

/// Which side of an exchange a `@Content` describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentDirection {
    /// Request bodies; defaults to the configured consumed media types.
    Input,
    /// Responses; defaults to the configured produced media types.
    Output,
    /// Parameter content; always `*/*` when unnamed.
    Parameter,
}

impl<J: JsonIo> ContentIo<'_, J> {
    /// Read a `@Content` array. Entries without `mediaType` are registered
    /// under each default media type for `direction`.
    pub fn read_annotations(
        &self,
        annotations: &[&AnnotationInstance],
        direction: ContentDirection,
    ) -> Option<Content> {
        if annotations.is_empty() {
            return None;
        }
        let ctx = self.context();
        let defaults = match direction {
            ContentDirection::Input => ctx.config().default_consumes.clone(),
            ContentDirection::Output => ctx.config().default_produces.clone(),
            ContentDirection::Parameter => None,
        }
        .unwrap_or_else(|| vec![DEFAULT_MEDIA_TYPE.to_string()]);

        let mut content = Content::default();
        for annotation in annotations {
            let media_type = ctx.media_types().read_annotation(annotation);
            match string_member(annotation, "mediaType") {
                Some(name) => {
                    content.media_types.insert(name, media_type);
                }
                None => {
                    for name in &defaults {
                        content.media_types.insert(name.clone(), media_type.clone());
                    }
                }
            }
        }
        Some(content)
    }

    pub fn read_member(
        &self,
        parent: &AnnotationInstance,
        member: &str,
        direction: ContentDirection,
    ) -> Option<Content> {
        let annotations = parent.nested_array(member)?;
        self.read_annotations(&annotations, direction)
    }
}

impl<J: JsonIo> JsonReader<J> for ContentIo<'_, J> {
    fn read_object(&self, node: &J::Object) -> Content {
        let json = self.json();
        let media_types = self.context().media_types();
        let mut content = Content::default();
        for (name, value) in json.entries(node) {
            if let Some(object) = json.as_object(value) {
                content
                    .media_types
                    .insert(name.into_owned(), media_types.read_object(object));
            }
        }
        content
    }
}

impl<J: JsonIo> JsonWriter<J> for ContentIo<'_, J> {
    fn write(&self, model: &Content) -> Option<J::Value> {
        self.context()
            .media_types()
            .write_map(Some(&model.media_types))
    }
}

impl<J: JsonIo> AnnotationReader<J> for MediaTypeIo<'_, J> {
    const ANNOTATION: &'static str = names::CONTENT;

    fn read_annotation(&self, annotation: &AnnotationInstance) -> MediaType {
        let ctx = self.context();
        MediaType {
            schema: annotation
                .nested("schema")
                .and_then(|a| ctx.schemas().read_visible(a)),
            example: annotation
                .string_value("example")
                .and_then(|v| self.json().parse_value(v)),
            examples: ctx.examples().read_nested_map(annotation, "examples"),
            encoding: ctx.encodings().read_nested_map(annotation, "encoding"),
            extensions: ctx.extensions().read_extensible(annotation),
        }
    }
}

impl<J: JsonIo> JsonReader<J> for MediaTypeIo<'_, J> {
    fn read_object(&self, node: &J::Object) -> MediaType {
        let ctx = self.context();
        let r = ObjectReader::new(self.json(), node);
        MediaType {
            schema: ctx.schemas().read_property(node, "schema"),
            example: r.native("example"),
            examples: ctx.examples().read_map_property(node, "examples"),
            encoding: ctx.encodings().read_map_property(node, "encoding"),
            extensions: r.extensions(),
        }
    }
}

impl<J: JsonIo> JsonWriter<J> for MediaTypeIo<'_, J> {
    fn write(&self, model: &MediaType) -> Option<J::Value> {
        let ctx = self.context();
        let mut out = ObjectWriter::new(self.json());
        out.node("schema", ctx.schemas().write_opt(model.schema.as_ref()));
        out.native("example", model.example.as_ref());
        out.node("examples", ctx.examples().write_map(model.examples.as_ref()));
        out.node("encoding", ctx.encodings().write_map(model.encoding.as_ref()));
        out.extensions(model.extensions.as_ref());
        Some(out.build())
    }
}

impl<J: JsonIo> AnnotationReader<J> for EncodingIo<'_, J> {
    const ANNOTATION: &'static str = names::ENCODING;

    fn read_annotation(&self, annotation: &AnnotationInstance) -> Encoding {
        let ctx = self.context();
        Encoding {
            content_type: string_member(annotation, "contentType"),
            headers: ctx.headers().read_nested_map(annotation, "headers"),
            style: annotation
                .string_value("style")
                .or_else(|| annotation.enum_value("style"))
                .and_then(|s| Style::from_wire(s).or_else(|| Style::from_constant(s))),
            explode: annotation.bool_value("explode"),
            allow_reserved: annotation.bool_value("allowReserved"),
            extensions: ctx.extensions().read_extensible(annotation),
        }
    }
}

impl<J: JsonIo> JsonReader<J> for EncodingIo<'_, J> {
    fn read_object(&self, node: &J::Object) -> Encoding {
        let r = ObjectReader::new(self.json(), node);
        Encoding {
            content_type: r.string("contentType"),
            headers: self.context().headers().read_map_property(node, "headers"),
            style: r.string("style").and_then(|s| Style::from_wire(&s)),
            explode: r.boolean("explode"),
            allow_reserved: r.boolean("allowReserved"),
            extensions: r.extensions(),
        }
    }
}

impl<J: JsonIo> JsonWriter<J> for EncodingIo<'_, J> {
    fn write(&self, model: &Encoding) -> Option<J::Value> {
        let mut out = ObjectWriter::new(self.json());
        out.string("contentType", model.content_type.as_deref());
        out.node("headers", self.context().headers().write_map(model.headers.as_ref()));
        out.string("style", model.style.map(|s| s.as_str()));
        out.boolean("explode", model.explode);
        out.boolean("allowReserved", model.allow_reserved);
        out.extensions(model.extensions.as_ref());
        Some(out.build())
    }
}

impl<J: JsonIo> AnnotationReader<J> for ExampleIo<'_, J> {
    const ANNOTATION: &'static str = names::EXAMPLE_OBJECT;

    fn read_annotation(&self, annotation: &AnnotationInstance) -> Example {
        Example {
            reference: annotation_ref(annotation, ReferenceType::Example),
            summary: string_member(annotation, "summary"),
            description: string_member(annotation, "description"),
            value: annotation
                .string_value("value")
                .and_then(|v| self.json().parse_value(v)),
            external_value: string_member(annotation, "externalValue"),
            extensions: self.context().extensions().read_extensible(annotation),
        }
    }
}

impl<J: JsonIo> JsonReader<J> for ExampleIo<'_, J> {
    fn read_object(&self, node: &J::Object) -> Example {
        let r = ObjectReader::new(self.json(), node);
        Example {
            reference: r.reference(),
            summary: r.string("summary"),
            description: r.string("description"),
            value: r.native("value"),
            external_value: r.string("externalValue"),
            extensions: r.extensions(),
        }
    }
}

impl<J: JsonIo> JsonWriter<J> for ExampleIo<'_, J> {
    fn write(&self, model: &Example) -> Option<J::Value> {
        if let Some(reference) = &model.reference {
            return Some(write_reference(
                self.context(),
                reference,
                model.summary.as_deref(),
                model.description.as_deref(),
            ));
        }
        let mut out = ObjectWriter::new(self.json());
        out.string("summary", model.summary.as_deref());
        out.string("description", model.description.as_deref());
        out.native("value", model.value.as_ref());
        out.string("externalValue", model.external_value.as_deref());
        out.extensions(model.extensions.as_ref());
        Some(out.build())
    }
}
