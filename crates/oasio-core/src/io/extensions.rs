use crate::annotation::{AnnotationInstance, AnnotationTarget, names};
use crate::json::JsonIo;
use crate::model::Extensions;

use super::{AnnotationReader, ExtensionIo, ModelIo};

impl<J: JsonIo> AnnotationReader<J> for ExtensionIo<'_, J> {
    const ANNOTATION: &'static str = names::EXTENSION;

    /// A single `@Extension` as a one-entry map; empty when unnamed.
    fn read_annotation(&self, annotation: &AnnotationInstance) -> Extensions {
        let mut extensions = Extensions::new();
        let Some(name) = annotation.string_value("name").filter(|n| !n.is_empty()) else {
            return extensions;
        };
        let raw = annotation.string_value("value").unwrap_or_default();
        let value = if annotation.bool_value("parseValue").unwrap_or(false) {
            self.json()
                .parse_value(raw)
                .unwrap_or(serde_json::Value::Null)
        } else {
            serde_json::Value::String(raw.to_string())
        };
        extensions.insert(name.to_string(), value);
        extensions
    }
}

impl<J: JsonIo> ExtensionIo<'_, J> {
    /// Combine `@Extension` annotations; `None` when none are named.
    pub fn read_annotations<'x>(
        &self,
        annotations: impl IntoIterator<Item = &'x AnnotationInstance>,
    ) -> Option<Extensions> {
        let mut extensions = Extensions::new();
        for annotation in annotations {
            for (name, value) in self.read_annotation(annotation) {
                extensions.entry(name).or_insert(value);
            }
        }
        (!extensions.is_empty()).then_some(extensions)
    }

    /// The annotation's `extensions` member, else the `@Extension`
    /// annotations declared beside it on its target.
    pub fn read_extensible(&self, annotation: &AnnotationInstance) -> Option<Extensions> {
        if let Some(nested) = annotation
            .nested_array("extensions")
            .filter(|n| !n.is_empty())
        {
            return self.read_annotations(nested);
        }
        annotation
            .target
            .as_ref()
            .and_then(|target| self.read_target_extensions(target))
    }

    pub fn read_target_extensions(&self, target: &AnnotationTarget) -> Option<Extensions> {
        let annotations = self.repeatable_annotations(target);
        self.read_annotations(&annotations)
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

    fn extension(name: &str, value: &str, parse: bool) -> AnnotationInstance {
        AnnotationInstance::new(names::EXTENSION)
            .with("name", name)
            .with("value", value)
            .with("parseValue", parse)
    }

    #[test]
    fn test_parse_value_flag() {
        let ctx = IoContext::for_json(SerdeJsonIo::new());
        let extensions = ctx
            .extensions()
            .read_annotations(&[
                extension("x-raw", "42", false),
                extension("x-parsed", "42", true),
                extension("x-object", r#"{"a": true}"#, true),
                extension("", "ignored", false),
            ])
            .unwrap();
        assert_eq!(extensions.len(), 3);
        assert_eq!(extensions["x-raw"], json!("42"));
        assert_eq!(extensions["x-parsed"], json!(42));
        assert_eq!(extensions["x-object"], json!({"a": true}));
    }

    #[test]
    fn test_extensions_from_target() {
        let index = ClassIndex::new().with(
            ClassInfo::new("api.Resource")
                .annotation(extension("x-one", "1", true))
                .annotation(AnnotationInstance::new(names::EXTENSIONS).with(
                    "value",
                    vec![extension("x-two", "2", true)],
                )),
        );
        let ctx = IoContext::for_scanning(SerdeJsonIo::new(), &index, OasioConfig::default());
        let target = AnnotationTarget::Class("api.Resource".into());
        let operation = AnnotationInstance::new(names::OPERATION).on(target);
        let extensions = ctx.extensions().read_extensible(&operation).unwrap();
        assert_eq!(extensions.keys().collect::<Vec<_>>(), vec!["x-one", "x-two"]);
    }
}
