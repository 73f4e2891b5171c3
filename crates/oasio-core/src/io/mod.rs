//! Readers and writers between annotations, JSON/YAML nodes and the model.
//!
//! One IO per construct, obtained from an [`IoContext`]. Every IO reads JSON
//! and writes JSON; constructs with an annotation form also implement
//! [`AnnotationReader`]. [`PathItemIo`] and [`PathsIo`] have no annotation
//! form, so asking for one does not compile.

mod components;
mod context;
mod definition;
mod extensions;
mod external_docs;
mod headers;
mod info;
mod links;
mod media;
mod parameters;
mod paths;
mod responses;
mod schema;
mod security;
mod servers;
mod tags;

use indexmap::IndexMap;
use serde_json::Number;

use crate::annotation::{AnnotationInstance, AnnotationTarget, TypeRef, names};
use crate::json::JsonIo;
use crate::model::{Extensions, Parameter, ReferenceType, SchemaNode, is_extension, ref_name};

pub use context::{
    ApiResponseIo, ApiResponsesIo, CallbackIo, CallbackOperationIo, ComponentsIo, ContactIo,
    ContentIo, DiscriminatorIo, EncodingIo, ExampleIo, ExtensionIo, ExternalDocumentationIo,
    HeaderIo, InfoIo, IoContext, LicenseIo, LinkIo, MediaTypeIo, OAuthFlowIo, OAuthFlowsIo,
    OpenApiDefinitionIo, OpenApiVersion, OperationIo, ParameterIo, PathItemIo, PathsIo,
    RequestBodyIo, SchemaIo, SecurityRequirementIo, SecuritySchemeIo, ServerIo, ServerVariableIo,
    TagIo, XmlIo,
};
pub use media::ContentDirection;

pub const REF: &str = "$ref";

/// Properties a 3.1 reference object may carry beside `$ref`.
pub const REF_PROPERTIES: &[&str] = &[REF, "summary", "description"];

/// Access to the session for one construct.
pub trait ModelIo<J: JsonIo> {
    type Model;

    fn context(&self) -> &IoContext<'_, J>;

    fn json(&self) -> &J {
        self.context().json()
    }
}

pub trait JsonReader<J: JsonIo>: ModelIo<J> {
    fn read_object(&self, node: &J::Object) -> Self::Model;

    /// Read a node; `None` unless it is an object.
    fn read_value(&self, node: &J::Value) -> Option<Self::Model> {
        let object = self.json().as_object(node)?;
        Some(self.read_object(object))
    }

    fn read_property(&self, parent: &J::Object, key: &str) -> Option<Self::Model> {
        let node = self.json().get_value(parent, key)?;
        self.read_value(node)
    }

    /// Read an array property, skipping non-object elements.
    fn read_list(&self, parent: &J::Object, key: &str) -> Option<Vec<Self::Model>> {
        let json = self.json();
        let array = json.as_array(json.get_value(parent, key)?)?;
        Some(
            json.elements(array)
                .into_iter()
                .filter_map(|element| self.read_value(element))
                .collect(),
        )
    }

    /// Read an object of named entries, skipping non-object values.
    fn read_map(&self, node: &J::Value) -> Option<IndexMap<String, Self::Model>> {
        let json = self.json();
        let object = json.as_object(node)?;
        let mut map = IndexMap::new();
        for (key, value) in json.entries(object) {
            if let Some(entry) = json.as_object(value) {
                map.insert(key.into_owned(), self.read_object(entry));
            }
        }
        Some(map)
    }

    fn read_map_property(
        &self,
        parent: &J::Object,
        key: &str,
    ) -> Option<IndexMap<String, Self::Model>> {
        let node = self.json().get_value(parent, key)?;
        self.read_map(node)
    }
}

pub trait JsonWriter<J: JsonIo>: ModelIo<J> {
    fn write(&self, model: &Self::Model) -> Option<J::Value>;

    fn write_opt(&self, model: Option<&Self::Model>) -> Option<J::Value> {
        model.and_then(|m| self.write(m))
    }

    /// `None` for an absent or empty list.
    fn write_list(&self, models: Option<&[Self::Model]>) -> Option<J::Value> {
        let models = models.filter(|m| !m.is_empty())?;
        let json = self.json();
        let mut array = json.create_array();
        for model in models {
            if let Some(node) = self.write(model) {
                json.add(&mut array, node);
            }
        }
        Some(json.build_array(array))
    }

    /// `None` for an absent or empty map. Entries that write nothing are
    /// emitted as explicit nulls.
    fn write_map(&self, models: Option<&IndexMap<String, Self::Model>>) -> Option<J::Value> {
        let models = models.filter(|m| !m.is_empty())?;
        let json = self.json();
        let mut object = json.create_object();
        for (name, model) in models {
            let node = self.write(model).unwrap_or_else(|| json.null_value());
            json.set(&mut object, name, node);
        }
        Some(json.build_object(object))
    }
}

pub trait AnnotationReader<J: JsonIo>: ModelIo<J> {
    /// Fully-qualified annotation name.
    const ANNOTATION: &'static str;

    fn read_annotation(&self, annotation: &AnnotationInstance) -> Self::Model;

    fn read_nested(&self, parent: &AnnotationInstance, member: &str) -> Option<Self::Model> {
        parent.nested(member).map(|a| self.read_annotation(a))
    }

    /// `None` when the member is absent or empty.
    fn read_nested_list(
        &self,
        parent: &AnnotationInstance,
        member: &str,
    ) -> Option<Vec<Self::Model>> {
        let nested = parent.nested_array(member).filter(|n| !n.is_empty())?;
        Some(
            nested
                .into_iter()
                .map(|a| self.read_annotation(a))
                .collect(),
        )
    }

    /// Read the annotation declared on `target`, if any.
    fn read_target(&self, target: &AnnotationTarget) -> Option<Self::Model> {
        let lookup = self.context().annotations()?;
        lookup
            .get_annotation(target, Self::ANNOTATION)
            .map(|a| self.read_annotation(a))
    }

    /// The bare annotation and its container's contents on `target`.
    fn repeatable_annotations(&self, target: &AnnotationTarget) -> Vec<AnnotationInstance> {
        let Some(lookup) = self.context().annotations() else {
            return Vec::new();
        };
        match names::container_of(Self::ANNOTATION) {
            Some(container) => {
                lookup.get_repeatable_annotation(target, Self::ANNOTATION, container)
            }
            None => lookup
                .get_annotation(target, Self::ANNOTATION)
                .into_iter()
                .cloned()
                .collect(),
        }
    }

    /// Map key for an annotation: `name`, else the last segment of `ref`.
    fn annotation_name(&self, annotation: &AnnotationInstance) -> Option<String> {
        annotation_key(annotation, "name")
    }

    /// Read named annotations into a map in source order. Unnamed entries
    /// are dropped; for duplicate names the first wins.
    fn read_annotation_map<'x>(
        &self,
        annotations: impl IntoIterator<Item = &'x AnnotationInstance>,
    ) -> IndexMap<String, Self::Model> {
        let mut map = IndexMap::new();
        for annotation in annotations {
            let Some(name) = self.annotation_name(annotation) else {
                continue;
            };
            if map.contains_key(&name) {
                log::warn!(
                    "duplicate `{name}` in {}, keeping the first",
                    Self::ANNOTATION
                );
                continue;
            }
            map.insert(name, self.read_annotation(annotation));
        }
        map
    }

    /// Read a nested array member into a map; `None` when absent or empty.
    fn read_nested_map(
        &self,
        parent: &AnnotationInstance,
        member: &str,
    ) -> Option<IndexMap<String, Self::Model>> {
        let nested = parent.nested_array(member)?;
        let map = self.read_annotation_map(nested);
        (!map.is_empty()).then_some(map)
    }
}

/// Non-empty `member`, else the name at the end of `ref`.
pub(crate) fn annotation_key(annotation: &AnnotationInstance, member: &str) -> Option<String> {
    if let Some(name) = annotation.string_value(member).filter(|n| !n.is_empty()) {
        return Some(name.to_string());
    }
    annotation
        .string_value("ref")
        .and_then(ref_name)
        .map(str::to_string)
}

/// Expanded `ref` member of an annotation.
pub(crate) fn annotation_ref(
    annotation: &AnnotationInstance,
    kind: ReferenceType,
) -> Option<String> {
    annotation
        .string_value("ref")
        .filter(|r| !r.is_empty())
        .map(|r| kind.parse_ref_value(r))
}

/// Non-empty string member.
pub(crate) fn string_member(annotation: &AnnotationInstance, member: &str) -> Option<String> {
    annotation
        .string_value(member)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Non-empty string array member.
pub(crate) fn strings_member(annotation: &AnnotationInstance, member: &str) -> Option<Vec<String>> {
    annotation
        .string_array(member)
        .filter(|values| !values.is_empty())
        .map(|values| values.into_iter().map(str::to_string).collect())
}

/// Models the parameter engine reads from annotations, independent of the
/// JSON backing.
pub trait AnnotationModels {
    fn read_parameter(&self, annotation: &AnnotationInstance) -> Parameter;

    /// `None` for `@Schema(hidden = true)`.
    fn read_schema(&self, annotation: &AnnotationInstance) -> Option<SchemaNode>;

    /// Extensions declared on `target`.
    fn read_extensions(&self, target: &AnnotationTarget) -> Option<Extensions>;

    fn type_to_schema(&self, ty: &TypeRef) -> Option<SchemaNode>;

    fn parse_value(&self, value: &str) -> Option<serde_json::Value>;
}

impl<J: JsonIo> AnnotationModels for IoContext<'_, J> {
    fn read_parameter(&self, annotation: &AnnotationInstance) -> Parameter {
        self.parameters().read_annotation(annotation)
    }

    fn read_schema(&self, annotation: &AnnotationInstance) -> Option<SchemaNode> {
        self.schemas().read_visible(annotation)
    }

    fn read_extensions(&self, target: &AnnotationTarget) -> Option<Extensions> {
        self.extensions().read_target_extensions(target)
    }

    fn type_to_schema(&self, ty: &TypeRef) -> Option<SchemaNode> {
        self.schemas().type_to_schema(ty)
    }

    fn parse_value(&self, value: &str) -> Option<serde_json::Value> {
        self.json().parse_value(value)
    }
}

/// Accumulates the properties of one JSON object.
pub(crate) struct ObjectWriter<'j, J: JsonIo> {
    json: &'j J,
    builder: J::ObjectBuilder,
}

impl<'j, J: JsonIo> ObjectWriter<'j, J> {
    pub fn new(json: &'j J) -> Self {
        Self {
            json,
            builder: json.create_object(),
        }
    }

    pub fn node(&mut self, key: &str, value: Option<J::Value>) {
        if let Some(value) = value {
            self.json.set(&mut self.builder, key, value);
        }
    }

    pub fn native(&mut self, key: &str, value: Option<&serde_json::Value>) {
        let node = value.map(|v| self.json.to_node(v));
        self.node(key, node);
    }

    pub fn string(&mut self, key: &str, value: Option<&str>) {
        let value = value.map(|v| serde_json::Value::String(v.to_string()));
        self.native(key, value.as_ref());
    }

    pub fn boolean(&mut self, key: &str, value: Option<bool>) {
        self.native(key, value.map(serde_json::Value::Bool).as_ref());
    }

    pub fn integer(&mut self, key: &str, value: Option<i64>) {
        self.native(key, value.map(serde_json::Value::from).as_ref());
    }

    pub fn number(&mut self, key: &str, value: Option<&Number>) {
        self.native(key, value.cloned().map(serde_json::Value::Number).as_ref());
    }

    pub fn strings(&mut self, key: &str, values: Option<&[String]>) {
        let Some(values) = values else {
            return;
        };
        let mut array = self.json.create_array();
        for value in values {
            self.json
                .add(&mut array, self.json.to_node(&serde_json::Value::String(value.clone())));
        }
        let array = self.json.build_array(array);
        self.json.set(&mut self.builder, key, array);
    }

    /// String-valued object, e.g. OAuth scopes or discriminator mappings.
    pub fn string_map(&mut self, key: &str, values: Option<&IndexMap<String, String>>) {
        let Some(values) = values else {
            return;
        };
        let mut object = self.json.create_object();
        for (name, value) in values {
            let node = self.json.to_node(&serde_json::Value::String(value.clone()));
            self.json.set(&mut object, name, node);
        }
        let object = self.json.build_object(object);
        self.json.set(&mut self.builder, key, object);
    }

    /// Extension properties, adding the `x-` prefix when missing.
    pub fn extensions(&mut self, extensions: Option<&Extensions>) {
        for (name, value) in extensions.into_iter().flatten() {
            let key = if is_extension(name) {
                name.clone()
            } else {
                format!("x-{name}")
            };
            self.native(&key, Some(value));
        }
    }

    pub fn build(self) -> J::Value {
        self.json.build_object(self.builder)
    }
}

/// Typed property access on one JSON object.
pub(crate) struct ObjectReader<'j, 'n, J: JsonIo> {
    json: &'j J,
    node: &'n J::Object,
}

impl<'j, 'n, J: JsonIo> ObjectReader<'j, 'n, J> {
    pub fn new(json: &'j J, node: &'n J::Object) -> Self {
        Self { json, node }
    }

    pub fn value(&self, key: &str) -> Option<&'n J::Value> {
        self.json.get_value(self.node, key)
    }

    pub fn string(&self, key: &str) -> Option<String> {
        self.json.get_string(self.node, key)
    }

    pub fn boolean(&self, key: &str) -> Option<bool> {
        self.json.get_boolean(self.node, key)
    }

    pub fn integer(&self, key: &str) -> Option<i64> {
        self.json.get_int(self.node, key)
    }

    pub fn number(&self, key: &str) -> Option<Number> {
        self.json.get_number(self.node, key)
    }

    /// Arbitrary JSON; an explicit `null` reads as absent.
    pub fn native(&self, key: &str) -> Option<serde_json::Value> {
        self.value(key)
            .map(|v| self.json.to_native(v))
            .filter(|v| !v.is_null())
    }

    pub fn strings(&self, key: &str) -> Option<Vec<String>> {
        let array = self.json.as_array(self.value(key)?)?;
        Some(
            self.json
                .elements(array)
                .into_iter()
                .filter_map(|v| self.json.as_string(v))
                .collect(),
        )
    }

    /// String-valued object property, e.g. OAuth scopes.
    pub fn string_map(&self, key: &str) -> Option<IndexMap<String, String>> {
        let object = self.json.as_object(self.value(key)?)?;
        Some(
            self.json
                .entries(object)
                .into_iter()
                .filter_map(|(k, v)| self.json.as_string(v).map(|v| (k.into_owned(), v)))
                .collect(),
        )
    }

    /// Arbitrary-valued object property, e.g. link parameters.
    pub fn native_map(&self, key: &str) -> Option<IndexMap<String, serde_json::Value>> {
        let object = self.json.as_object(self.value(key)?)?;
        Some(
            self.json
                .entries(object)
                .into_iter()
                .map(|(k, v)| (k.into_owned(), self.json.to_native(v)))
                .collect(),
        )
    }

    pub fn reference(&self) -> Option<String> {
        self.string(REF)
    }

    /// `x-*` properties; `None` when there are none.
    pub fn extensions(&self) -> Option<Extensions> {
        let extensions: Extensions = self
            .json
            .entries(self.node)
            .into_iter()
            .filter(|(k, _)| is_extension(k))
            .map(|(k, v)| (k.into_owned(), self.json.to_native(v)))
            .collect();
        (!extensions.is_empty()).then_some(extensions)
    }
}

/// Write a reference object: `$ref` alone in 3.0, with `summary` and
/// `description` overrides in 3.1.
pub(crate) fn write_reference<J: JsonIo>(
    ctx: &IoContext<'_, J>,
    reference: &str,
    summary: Option<&str>,
    description: Option<&str>,
) -> J::Value {
    let mut out = ObjectWriter::new(ctx.json());
    out.string(REF, Some(reference));
    if ctx.version() == OpenApiVersion::V3_1 {
        out.string("summary", summary);
        out.string("description", description);
    }
    out.build()
}
