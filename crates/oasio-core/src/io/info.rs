use crate::annotation::{AnnotationInstance, names};
use crate::json::JsonIo;
use crate::model::{Contact, Info, License};

use super::{
    AnnotationReader, ContactIo, InfoIo, JsonReader, JsonWriter, LicenseIo, ModelIo,
    ObjectReader, ObjectWriter, OpenApiVersion, string_member,
};

impl<J: JsonIo> AnnotationReader<J> for InfoIo<'_, J> {
    const ANNOTATION: &'static str = names::INFO;

    fn read_annotation(&self, annotation: &AnnotationInstance) -> Info {
        let ctx = self.context();
        Info {
            title: string_member(annotation, "title"),
            summary: string_member(annotation, "summary"),
            description: string_member(annotation, "description"),
            terms_of_service: string_member(annotation, "termsOfService"),
            contact: ctx.contact().read_nested(annotation, "contact"),
            license: ctx.license().read_nested(annotation, "license"),
            version: string_member(annotation, "version"),
            extensions: ctx.extensions().read_extensible(annotation),
        }
    }
}

impl<J: JsonIo> JsonReader<J> for InfoIo<'_, J> {
    fn read_object(&self, node: &J::Object) -> Info {
        let ctx = self.context();
        let r = ObjectReader::new(self.json(), node);
        Info {
            title: r.string("title"),
            summary: r.string("summary"),
            description: r.string("description"),
            terms_of_service: r.string("termsOfService"),
            contact: ctx.contact().read_property(node, "contact"),
            license: ctx.license().read_property(node, "license"),
            version: r.string("version"),
            extensions: r.extensions(),
        }
    }
}

impl<J: JsonIo> JsonWriter<J> for InfoIo<'_, J> {
    fn write(&self, model: &Info) -> Option<J::Value> {
        let ctx = self.context();
        let mut out = ObjectWriter::new(self.json());
        out.string("title", model.title.as_deref());
        if ctx.version() == OpenApiVersion::V3_1 {
            out.string("summary", model.summary.as_deref());
        }
        out.string("description", model.description.as_deref());
        out.string("termsOfService", model.terms_of_service.as_deref());
        out.node("contact", ctx.contact().write_opt(model.contact.as_ref()));
        out.node("license", ctx.license().write_opt(model.license.as_ref()));
        out.string("version", model.version.as_deref());
        out.extensions(model.extensions.as_ref());
        Some(out.build())
    }
}

impl<J: JsonIo> AnnotationReader<J> for ContactIo<'_, J> {
    const ANNOTATION: &'static str = names::CONTACT;

    fn read_annotation(&self, annotation: &AnnotationInstance) -> Contact {
        Contact {
            name: string_member(annotation, "name"),
            url: string_member(annotation, "url"),
            email: string_member(annotation, "email"),
            extensions: self.context().extensions().read_extensible(annotation),
        }
    }
}

impl<J: JsonIo> JsonReader<J> for ContactIo<'_, J> {
    fn read_object(&self, node: &J::Object) -> Contact {
        let r = ObjectReader::new(self.json(), node);
        Contact {
            name: r.string("name"),
            url: r.string("url"),
            email: r.string("email"),
            extensions: r.extensions(),
        }
    }
}

impl<J: JsonIo> JsonWriter<J> for ContactIo<'_, J> {
    fn write(&self, model: &Contact) -> Option<J::Value> {
        let mut out = ObjectWriter::new(self.json());
        out.string("name", model.name.as_deref());
        out.string("url", model.url.as_deref());
        out.string("email", model.email.as_deref());
        out.extensions(model.extensions.as_ref());
        Some(out.build())
    }
}

impl<J: JsonIo> AnnotationReader<J> for LicenseIo<'_, J> {
    const ANNOTATION: &'static str = names::LICENSE;

    fn read_annotation(&self, annotation: &AnnotationInstance) -> License {
        License {
            name: string_member(annotation, "name"),
            identifier: string_member(annotation, "identifier"),
            url: string_member(annotation, "url"),
            extensions: self.context().extensions().read_extensible(annotation),
        }
    }
}

impl<J: JsonIo> JsonReader<J> for LicenseIo<'_, J> {
    fn read_object(&self, node: &J::Object) -> License {
        let r = ObjectReader::new(self.json(), node);
        License {
            name: r.string("name"),
            identifier: r.string("identifier"),
            url: r.string("url"),
            extensions: r.extensions(),
        }
    }
}

impl<J: JsonIo> JsonWriter<J> for LicenseIo<'_, J> {
    fn write(&self, model: &License) -> Option<J::Value> {
        let mut out = ObjectWriter::new(self.json());
        out.string("name", model.name.as_deref());
        if self.context().version() == OpenApiVersion::V3_1 {
            out.string("identifier", model.identifier.as_deref());
        }
        out.string("url", model.url.as_deref());
        out.extensions(model.extensions.as_ref());
        Some(out.build())
    }
}
