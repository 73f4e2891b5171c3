use crate::annotation::{AnnotationInstance, names};
use crate::json::JsonIo;
use crate::model::{Server, ServerVariable};

use super::{
    AnnotationReader, JsonReader, JsonWriter, ModelIo, ObjectReader, ObjectWriter, ServerIo,
    ServerVariableIo, string_member, strings_member,
};

impl<J: JsonIo> AnnotationReader<J> for ServerIo<'_, J> {
    const ANNOTATION: &'static str = names::SERVER;

    fn read_annotation(&self, annotation: &AnnotationInstance) -> Server {
        let ctx = self.context();
        Server {
            url: string_member(annotation, "url"),
            description: string_member(annotation, "description"),
            variables: ctx
                .server_variables()
                .read_nested_map(annotation, "variables"),
            extensions: ctx.extensions().read_extensible(annotation),
        }
    }
}

impl<J: JsonIo> JsonReader<J> for ServerIo<'_, J> {
    fn read_object(&self, node: &J::Object) -> Server {
        let r = ObjectReader::new(self.json(), node);
        Server {
            url: r.string("url"),
            description: r.string("description"),
            variables: self
                .context()
                .server_variables()
                .read_map_property(node, "variables"),
            extensions: r.extensions(),
        }
    }
}

impl<J: JsonIo> JsonWriter<J> for ServerIo<'_, J> {
    fn write(&self, model: &Server) -> Option<J::Value> {
        let mut out = ObjectWriter::new(self.json());
        out.string("url", model.url.as_deref());
        out.string("description", model.description.as_deref());
        out.node(
            "variables",
            self.context()
                .server_variables()
                .write_map(model.variables.as_ref()),
        );
        out.extensions(model.extensions.as_ref());
        Some(out.build())
    }
}

impl<J: JsonIo> AnnotationReader<J> for ServerVariableIo<'_, J> {
    const ANNOTATION: &'static str = names::SERVER_VARIABLE;

    fn read_annotation(&self, annotation: &AnnotationInstance) -> ServerVariable {
        ServerVariable {
            enumeration: strings_member(annotation, "enumeration"),
            default_value: string_member(annotation, "defaultValue"),
            description: string_member(annotation, "description"),
            extensions: self.context().extensions().read_extensible(annotation),
        }
    }
}

impl<J: JsonIo> JsonReader<J> for ServerVariableIo<'_, J> {
    fn read_object(&self, node: &J::Object) -> ServerVariable {
        let r = ObjectReader::new(self.json(), node);
        ServerVariable {
            enumeration: r.strings("enum"),
            default_value: r.string("default"),
            description: r.string("description"),
            extensions: r.extensions(),
        }
    }
}

impl<J: JsonIo> JsonWriter<J> for ServerVariableIo<'_, J> {
    fn write(&self, model: &ServerVariable) -> Option<J::Value> {
        let mut out = ObjectWriter::new(self.json());
        out.strings("enum", model.enumeration.as_deref());
        out.string("default", model.default_value.as_deref());
        out.string("description", model.description.as_deref());
        out.extensions(model.extensions.as_ref());
        Some(out.build())
    }
}
