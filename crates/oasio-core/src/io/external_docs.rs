use crate::annotation::{AnnotationInstance, names};
use crate::json::JsonIo;
use crate::model::ExternalDocumentation;

use super::{
    AnnotationReader, ExternalDocumentationIo, JsonReader, JsonWriter, ModelIo, ObjectReader,
    ObjectWriter, string_member,
};

impl<J: JsonIo> AnnotationReader<J> for ExternalDocumentationIo<'_, J> {
    const ANNOTATION: &'static str = names::EXTERNAL_DOCUMENTATION;

    fn read_annotation(&self, annotation: &AnnotationInstance) -> ExternalDocumentation {
        ExternalDocumentation {
            description: string_member(annotation, "description"),
            url: string_member(annotation, "url"),
            extensions: self.context().extensions().read_extensible(annotation),
        }
    }
}

impl<J: JsonIo> JsonReader<J> for ExternalDocumentationIo<'_, J> {
    fn read_object(&self, node: &J::Object) -> ExternalDocumentation {
        let r = ObjectReader::new(self.json(), node);
        ExternalDocumentation {
            description: r.string("description"),
            url: r.string("url"),
            extensions: r.extensions(),
        }
    }
}

impl<J: JsonIo> JsonWriter<J> for ExternalDocumentationIo<'_, J> {
    fn write(&self, model: &ExternalDocumentation) -> Option<J::Value> {
        let mut out = ObjectWriter::new(self.json());
        out.string("description", model.description.as_deref());
        out.string("url", model.url.as_deref());
        out.extensions(model.extensions.as_ref());
        Some(out.build())
    }
}
