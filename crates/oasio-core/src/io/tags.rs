use crate::annotation::{AnnotationInstance, AnnotationTarget, names};
use crate::json::JsonIo;
use crate::model::Tag;

use super::{
    AnnotationReader, JsonReader, JsonWriter, ModelIo, ObjectReader, ObjectWriter, TagIo,
    string_member,
};

impl<J: JsonIo> AnnotationReader<J> for TagIo<'_, J> {
    const ANNOTATION: &'static str = names::TAG;

    fn read_annotation(&self, annotation: &AnnotationInstance) -> Tag {
        let ctx = self.context();
        Tag {
            name: string_member(annotation, "name"),
            description: string_member(annotation, "description"),
            external_docs: ctx.external_docs().read_nested(annotation, "externalDocs"),
            extensions: ctx.extensions().read_extensible(annotation),
        }
    }
}

impl<J: JsonIo> TagIo<'_, J> {
    /// Tags defined on `target`; `@Tag(ref = ...)` entries are references, not definitions.
    pub fn read_definitions(&self, target: &AnnotationTarget) -> Option<Vec<Tag>> {
        let tags: Vec<Tag> = self
            .repeatable_annotations(target)
            .iter()
            .filter(|a| string_member(a, "ref").is_none())
            .map(|a| self.read_annotation(a))
            .filter(|t| t.name.is_some())
            .collect();
        (!tags.is_empty()).then_some(tags)
    }

    /// Names referenced by `@Tag(ref = ...)` and `@Tags(refs = ...)` on `target`.
    pub fn read_references(&self, target: &AnnotationTarget) -> Vec<String> {
        let mut refs: Vec<String> = Vec::new();
        let Some(lookup) = self.context().annotations() else {
            return refs;
        };
        if let Some(container) = lookup.get_annotation(target, names::TAGS) {
            refs.extend(
                container
                    .string_array("refs")
                    .unwrap_or_default()
                    .into_iter()
                    .filter(|r| !r.is_empty())
                    .map(str::to_string),
            );
        }
        for tag in self.repeatable_annotations(target) {
            if let Some(reference) = string_member(&tag, "ref") {
                refs.push(reference);
            }
        }
        refs.dedup();
        refs
    }
}

impl<J: JsonIo> JsonReader<J> for TagIo<'_, J> {
    fn read_object(&self, node: &J::Object) -> Tag {
        let r = ObjectReader::new(self.json(), node);
        Tag {
            name: r.string("name"),
            description: r.string("description"),
            external_docs: self
                .context()
                .external_docs()
                .read_property(node, "externalDocs"),
            extensions: r.extensions(),
        }
    }
}

impl<J: JsonIo> JsonWriter<J> for TagIo<'_, J> {
    fn write(&self, model: &Tag) -> Option<J::Value> {
        let mut out = ObjectWriter::new(self.json());
        out.string("name", model.name.as_deref());
        out.string("description", model.description.as_deref());
        out.node(
            "externalDocs",
            self.context()
                .external_docs()
                .write_opt(model.external_docs.as_ref()),
        );
        out.extensions(model.extensions.as_ref());
        Some(out.build())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::{ClassIndex, ClassInfo};
    use crate::config::OasioConfig;
    use crate::io::IoContext;
    use crate::json::SerdeJsonIo;
    use serde_json::json;

    fn tag(name: &str) -> AnnotationInstance {
        AnnotationInstance::new(names::TAG).with("name", name)
    }

    #[test]
    fn test_tag_order_is_preserved() {
        let ctx = IoContext::for_json(SerdeJsonIo::new());
        let tags: Vec<Tag> = [tag("A"), tag("B"), tag("C")]
            .iter()
            .map(|a| ctx.tags().read_annotation(a))
            .collect();
        assert_eq!(
            ctx.tags().write_list(Some(&tags)),
            Some(json!([{"name": "A"}, {"name": "B"}, {"name": "C"}]))
        );
    }

    #[test]
    fn test_references_and_definitions() {
        let index = ClassIndex::new().with(
            ClassInfo::new("api.Resource")
                .annotation(AnnotationInstance::new(names::TAG).with("ref", "shared"))
                .annotation(
                    AnnotationInstance::new(names::TAGS)
                        .with("value", vec![tag("local")])
                        .with("refs", vec!["common"]),
                ),
        );
        let ctx = IoContext::for_scanning(SerdeJsonIo::new(), &index, OasioConfig::default());
        let target = AnnotationTarget::Class("api.Resource".into());
        assert_eq!(ctx.tags().read_references(&target), vec!["common", "shared"]);
        let defined = ctx.tags().read_definitions(&target).unwrap();
        assert_eq!(defined.len(), 1);
        assert_eq!(defined[0].name.as_deref(), Some("local"));
    }
}
