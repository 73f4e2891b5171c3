use indexmap::IndexMap;
use serde_json::{Number, Value};

use crate::annotation::{AnnotationInstance, Primitive, TypeRef, names};
use crate::json::{JsonIo, parse_number};
use crate::model::{
    AdditionalProperties, Discriminator, Merge, ReferenceType, Schema, SchemaNode, SchemaType, Xml,
};

use super::{
    AnnotationReader, DiscriminatorIo, JsonReader, JsonWriter, ModelIo, ObjectReader,
    ObjectWriter, OpenApiVersion, REF, SchemaIo, XmlIo, annotation_ref, string_member,
    strings_member,
};

const TRUE_SCHEMA: &str = "org.eclipse.microprofile.openapi.annotations.media.Schema$True";
const FALSE_SCHEMA: &str = "org.eclipse.microprofile.openapi.annotations.media.Schema$False";

impl<J: JsonIo> AnnotationReader<J> for SchemaIo<'_, J> {
    const ANNOTATION: &'static str = names::SCHEMA;

    /// A hidden schema reads as empty; see [`SchemaIo::read_visible`].
    fn read_annotation(&self, annotation: &AnnotationInstance) -> SchemaNode {
        self.read_visible(annotation).unwrap_or_default()
    }
}

impl<J: JsonIo> SchemaIo<'_, J> {
    /// Read a `@Schema`, or `None` when it is hidden.
    pub fn read_visible(&self, annotation: &AnnotationInstance) -> Option<SchemaNode> {
        if annotation.bool_value("hidden").unwrap_or(false) {
            return None;
        }
        let ctx = self.context();
        let mut schema = Schema {
            not: annotation
                .class_value("not")
                .and_then(|ty| self.type_to_schema(ty)),
            one_of: self.class_schemas(annotation, "oneOf"),
            any_of: self.class_schemas(annotation, "anyOf"),
            all_of: self.class_schemas(annotation, "allOf"),
            title: string_member(annotation, "title"),
            multiple_of: annotation
                .f64_value("multipleOf")
                .and_then(Number::from_f64),
            maximum: bound(annotation, "maximum"),
            minimum: bound(annotation, "minimum"),
            max_length: annotation.i64_value("maxLength"),
            min_length: annotation.i64_value("minLength"),
            pattern: string_member(annotation, "pattern"),
            max_properties: annotation.i64_value("maxProperties"),
            min_properties: annotation.i64_value("minProperties"),
            required: strings_member(annotation, "requiredProperties"),
            description: string_member(annotation, "description"),
            format: string_member(annotation, "format"),
            reference: annotation_ref(annotation, ReferenceType::Schema),
            nullable: annotation.bool_value("nullable"),
            read_only: annotation.bool_value("readOnly"),
            write_only: annotation.bool_value("writeOnly"),
            external_docs: ctx.external_docs().read_nested(annotation, "externalDocs"),
            deprecated: annotation.bool_value("deprecated"),
            schema_type: annotation
                .enum_value("type")
                .and_then(SchemaType::from_constant),
            discriminator: ctx.discriminators().read_schema_annotation(annotation),
            max_items: annotation.i64_value("maxItems"),
            min_items: annotation.i64_value("minItems"),
            unique_items: annotation.bool_value("uniqueItems"),
            extensions: ctx.extensions().read_extensible(annotation),
            ..Schema::default()
        };

        // Annotations carry the 3.0 boolean form.
        if annotation.bool_value("exclusiveMaximum") == Some(true) {
            schema.exclusive_maximum = schema.maximum.take();
        }
        if annotation.bool_value("exclusiveMinimum") == Some(true) {
            schema.exclusive_minimum = schema.minimum.take();
        }

        schema.example = self.typed_value(annotation, "example", schema.schema_type);
        schema.default_value = self.typed_value(annotation, "defaultValue", schema.schema_type);
        schema.enumeration = annotation
            .string_array("enumeration")
            .filter(|values| !values.is_empty())
            .map(|values| {
                values
                    .into_iter()
                    .filter_map(|v| self.typed_literal(v, schema.schema_type))
                    .collect()
            });

        if let Some(properties) = annotation.nested_array("properties") {
            for property in properties {
                let Some(name) = string_member(property, "name") else {
                    continue;
                };
                if property.bool_value("required").unwrap_or(false) {
                    schema.add_required(&name);
                }
                if let Some(node) = self.read_visible(property) {
                    schema.add_property(name, node);
                }
            }
        }

        schema.additional_properties = annotation
            .class_value("additionalProperties")
            .and_then(|ty| match ty.class_name() {
                Some(TRUE_SCHEMA) => Some(AdditionalProperties::Bool(true)),
                Some(FALSE_SCHEMA) => Some(AdditionalProperties::Bool(false)),
                _ => self.type_to_schema(ty).map(AdditionalProperties::Schema),
            });

        let Some(implementation) = annotation
            .class_value("implementation")
            .and_then(|ty| self.type_to_schema(ty))
        else {
            return Some(SchemaNode::new(schema));
        };
        if schema.schema_type == Some(SchemaType::Array) {
            schema.items = Some(implementation);
            return Some(SchemaNode::new(schema));
        }
        // Annotation members refine the implementation's schema.
        let mut merged = implementation;
        merged.merge(SchemaNode::new(schema));
        Some(merged)
    }

    fn class_schemas(
        &self,
        annotation: &AnnotationInstance,
        member: &str,
    ) -> Option<Vec<SchemaNode>> {
        let schemas: Vec<SchemaNode> = annotation
            .class_array(member)?
            .into_iter()
            .filter_map(|ty| self.type_to_schema(ty))
            .collect();
        (!schemas.is_empty()).then_some(schemas)
    }

    fn typed_value(
        &self,
        annotation: &AnnotationInstance,
        member: &str,
        schema_type: Option<SchemaType>,
    ) -> Option<Value> {
        let raw = annotation.string_value(member).filter(|v| !v.is_empty())?;
        self.typed_literal(raw, schema_type)
    }

    /// String schemas keep literals verbatim; anything else is parsed.
    fn typed_literal(&self, raw: &str, schema_type: Option<SchemaType>) -> Option<Value> {
        if schema_type == Some(SchemaType::String) {
            return Some(Value::String(raw.to_string()));
        }
        self.json().parse_value(raw)
    }

    /// Schema for a Java type; `None` for `void`.
    pub fn type_to_schema(&self, ty: &TypeRef) -> Option<SchemaNode> {
        let schema = match ty {
            TypeRef::Void => return None,
            TypeRef::Primitive(primitive) => primitive_schema(*primitive),
            TypeRef::Array(component) => {
                let mut schema = Schema::of_type(SchemaType::Array);
                schema.items = self.type_to_schema(component);
                schema
            }
            TypeRef::Class(_) | TypeRef::Parameterized { .. } => {
                if ty.is_optional() {
                    return self.type_to_schema(&ty.unwrap_optional());
                }
                let name = ty.class_name().unwrap_or_default();
                match class_schema(name) {
                    Some(schema) => schema,
                    None if is_collection(name) => {
                        let mut schema = Schema::of_type(SchemaType::Array);
                        schema.items = ty.arguments().first().and_then(|a| self.type_to_schema(a));
                        if is_set(name) {
                            schema.unique_items = Some(true);
                        }
                        schema
                    }
                    None if is_map(name) => {
                        let mut schema = Schema::of_type(SchemaType::Object);
                        schema.additional_properties = Some(
                            ty.arguments()
                                .get(1)
                                .and_then(|a| self.type_to_schema(a))
                                .map(AdditionalProperties::Schema)
                                .unwrap_or(AdditionalProperties::Bool(true)),
                        );
                        schema
                    }
                    None => {
                        let simple = ty.simple_name().unwrap_or(name);
                        Schema::reference_to(ReferenceType::Schema.reference_of(simple))
                    }
                }
            }
        };
        Some(SchemaNode::new(schema))
    }
}

/// `maximum`/`minimum` are decimal strings on the annotation.
fn bound(annotation: &AnnotationInstance, member: &str) -> Option<Number> {
    let raw = annotation.string_value(member).filter(|v| !v.is_empty())?;
    let number = parse_number(raw.trim());
    if number.is_none() {
        log::warn!("ignoring @Schema({member} = \"{raw}\"): not a number");
    }
    number
}

fn formatted(schema_type: SchemaType, format: &str) -> Schema {
    Schema {
        format: Some(format.to_string()),
        ..Schema::of_type(schema_type)
    }
}

fn primitive_schema(primitive: Primitive) -> Schema {
    match primitive {
        Primitive::Boolean => Schema::of_type(SchemaType::Boolean),
        Primitive::Byte | Primitive::Short | Primitive::Int => {
            formatted(SchemaType::Integer, "int32")
        }
        Primitive::Long => formatted(SchemaType::Integer, "int64"),
        Primitive::Float => formatted(SchemaType::Number, "float"),
        Primitive::Double => formatted(SchemaType::Number, "double"),
        Primitive::Char => Schema::of_type(SchemaType::String),
    }
}

/// Schemas for well-known scalar classes.
fn class_schema(name: &str) -> Option<Schema> {
    let schema = match name {
        "java.lang.Boolean" => primitive_schema(Primitive::Boolean),
        "java.lang.Byte" => primitive_schema(Primitive::Byte),
        "java.lang.Short" => primitive_schema(Primitive::Short),
        "java.lang.Integer" => primitive_schema(Primitive::Int),
        "java.lang.Long" => primitive_schema(Primitive::Long),
        "java.lang.Float" => primitive_schema(Primitive::Float),
        "java.lang.Double" => primitive_schema(Primitive::Double),
        "java.lang.Character" | "java.lang.String" | "java.lang.CharSequence" => {
            Schema::of_type(SchemaType::String)
        }
        "java.math.BigDecimal" => Schema::of_type(SchemaType::Number),
        "java.math.BigInteger" => Schema::of_type(SchemaType::Integer),
        "java.util.UUID" => formatted(SchemaType::String, "uuid"),
        "java.net.URI" | "java.net.URL" => formatted(SchemaType::String, "uri"),
        "java.time.LocalDate" => formatted(SchemaType::String, "date"),
        "java.time.LocalDateTime"
        | "java.time.OffsetDateTime"
        | "java.time.ZonedDateTime"
        | "java.time.Instant"
        | "java.util.Date" => formatted(SchemaType::String, "date-time"),
        "java.lang.Object" => Schema::default(),
        _ => return None,
    };
    Some(schema)
}

fn is_set(name: &str) -> bool {
    matches!(
        name,
        "java.util.Set"
            | "java.util.HashSet"
            | "java.util.LinkedHashSet"
            | "java.util.SortedSet"
            | "java.util.TreeSet"
    )
}

fn is_collection(name: &str) -> bool {
    is_set(name)
        || matches!(
            name,
            "java.util.List"
                | "java.util.ArrayList"
                | "java.util.LinkedList"
                | "java.util.Collection"
                | "java.lang.Iterable"
        )
}

fn is_map(name: &str) -> bool {
    matches!(
        name,
        "java.util.Map"
            | "java.util.HashMap"
            | "java.util.LinkedHashMap"
            | "java.util.SortedMap"
            | "java.util.TreeMap"
    )
}

impl<J: JsonIo> JsonReader<J> for SchemaIo<'_, J> {
    fn read_object(&self, node: &J::Object) -> SchemaNode {
        let ctx = self.context();
        let json = self.json();
        let r = ObjectReader::new(json, node);
        let mut schema = Schema {
            reference: r.reference(),
            format: r.string("format"),
            title: r.string("title"),
            description: r.string("description"),
            default_value: r.native("default"),
            multiple_of: r.number("multipleOf"),
            maximum: r.number("maximum"),
            minimum: r.number("minimum"),
            max_length: r.integer("maxLength"),
            min_length: r.integer("minLength"),
            pattern: r.string("pattern"),
            max_items: r.integer("maxItems"),
            min_items: r.integer("minItems"),
            unique_items: r.boolean("uniqueItems"),
            max_properties: r.integer("maxProperties"),
            min_properties: r.integer("minProperties"),
            required: r.strings("required"),
            enumeration: r.native("enum").and_then(|v| match v {
                Value::Array(values) => Some(values),
                _ => None,
            }),
            items: self.read_property(node, "items"),
            all_of: self.read_list(node, "allOf"),
            properties: self.read_map_property(node, "properties"),
            read_only: r.boolean("readOnly"),
            xml: ctx.xml().read_property(node, "xml"),
            external_docs: ctx.external_docs().read_property(node, "externalDocs"),
            example: r.native("example"),
            one_of: self.read_list(node, "oneOf"),
            any_of: self.read_list(node, "anyOf"),
            not: self.read_property(node, "not"),
            discriminator: ctx.discriminators().read_property(node, "discriminator"),
            nullable: r.boolean("nullable"),
            write_only: r.boolean("writeOnly"),
            deprecated: r.boolean("deprecated"),
            extensions: r.extensions(),
            ..Schema::default()
        };

        read_type(&mut schema, &r);
        read_exclusive(
            &r,
            "exclusiveMaximum",
            &mut schema.maximum,
            &mut schema.exclusive_maximum,
        );
        read_exclusive(
            &r,
            "exclusiveMinimum",
            &mut schema.minimum,
            &mut schema.exclusive_minimum,
        );

        if let Some(value) = r.value("additionalProperties") {
            schema.additional_properties = match json.as_bool(value) {
                Some(flag) => Some(AdditionalProperties::Bool(flag)),
                None => self.read_value(value).map(AdditionalProperties::Schema),
            };
        }
        SchemaNode::new(schema)
    }
}

/// `type` as a name or, in 3.1, an array that may include `"null"`.
fn read_type<J: JsonIo>(schema: &mut Schema, r: &ObjectReader<'_, '_, J>) {
    let Some(value) = r.native("type") else {
        return;
    };
    match value {
        Value::String(name) => schema.schema_type = SchemaType::from_wire(&name),
        Value::Array(names) => {
            let names: Vec<&str> = names.iter().filter_map(Value::as_str).collect();
            if names.contains(&SchemaType::Null.as_str()) {
                schema.nullable = Some(true);
            }
            let mut types = names
                .iter()
                .filter_map(|n| SchemaType::from_wire(n))
                .filter(|t| *t != SchemaType::Null);
            schema.schema_type = types.next();
            if types.next().is_some() {
                log::debug!("schema type list {names:?} collapsed to its first entry");
            }
        }
        _ => {}
    }
}

/// Numeric (3.1) or boolean beside the bound (3.0).
fn read_exclusive<J: JsonIo>(
    r: &ObjectReader<'_, '_, J>,
    key: &str,
    bound: &mut Option<Number>,
    exclusive: &mut Option<Number>,
) {
    if let Some(number) = r.number(key) {
        *exclusive = Some(number);
    } else if r.boolean(key) == Some(true) && bound.is_some() {
        *exclusive = bound.take();
    }
}

impl<J: JsonIo> JsonWriter<J> for SchemaIo<'_, J> {
    fn write(&self, model: &SchemaNode) -> Option<J::Value> {
        let ctx = self.context();
        let id = model.id();
        if !ctx.enter_schema(id) {
            log::warn!("cyclic schema graph, writing an empty schema at the repeat");
            return Some(self.json().build_object(self.json().create_object()));
        }
        let node = self.write_schema(&model.borrow());
        ctx.leave_schema(id);
        Some(node)
    }
}

impl<J: JsonIo> SchemaIo<'_, J> {
    fn write_schema(&self, model: &Schema) -> J::Value {
        let ctx = self.context();
        let v3_1 = ctx.version() == OpenApiVersion::V3_1;
        let mut out = ObjectWriter::new(self.json());
        if let Some(reference) = &model.reference {
            out.string(REF, Some(reference));
            // 3.0 ignores everything beside `$ref`.
            if !v3_1 {
                return out.build();
            }
        }
        out.string("format", model.format.as_deref());
        out.string("title", model.title.as_deref());
        out.string("description", model.description.as_deref());
        out.native("default", model.default_value.as_ref());
        out.number("multipleOf", model.multiple_of.as_ref());
        if v3_1 {
            out.number("maximum", model.maximum.as_ref());
            out.number("exclusiveMaximum", model.exclusive_maximum.as_ref());
            out.number("minimum", model.minimum.as_ref());
            out.number("exclusiveMinimum", model.exclusive_minimum.as_ref());
        } else {
            write_bound_3_0(
                &mut out,
                "maximum",
                "exclusiveMaximum",
                &model.maximum,
                &model.exclusive_maximum,
            );
            write_bound_3_0(
                &mut out,
                "minimum",
                "exclusiveMinimum",
                &model.minimum,
                &model.exclusive_minimum,
            );
        }
        out.integer("maxLength", model.max_length);
        out.integer("minLength", model.min_length);
        out.string("pattern", model.pattern.as_deref());
        out.integer("maxItems", model.max_items);
        out.integer("minItems", model.min_items);
        out.boolean("uniqueItems", model.unique_items);
        out.integer("maxProperties", model.max_properties);
        out.integer("minProperties", model.min_properties);
        out.strings("required", model.required.as_deref());
        out.native("enum", model.enumeration.clone().map(Value::Array).as_ref());
        self.write_type(&mut out, model, v3_1);
        out.node("items", self.write_opt(model.items.as_ref()));
        out.node("allOf", self.write_list(model.all_of.as_deref()));
        out.node("properties", self.write_map(model.properties.as_ref()));
        match &model.additional_properties {
            Some(AdditionalProperties::Bool(flag)) => {
                out.boolean("additionalProperties", Some(*flag))
            }
            Some(AdditionalProperties::Schema(schema)) => {
                out.node("additionalProperties", self.write(schema))
            }
            None => {}
        }
        out.boolean("readOnly", model.read_only);
        out.node("xml", ctx.xml().write_opt(model.xml.as_ref()));
        out.node("externalDocs", ctx.external_docs().write_opt(model.external_docs.as_ref()));
        out.native("example", model.example.as_ref());
        out.node("oneOf", self.write_list(model.one_of.as_deref()));
        out.node("anyOf", self.write_list(model.any_of.as_deref()));
        out.node("not", self.write_opt(model.not.as_ref()));
        out.node("discriminator", ctx.discriminators().write_opt(model.discriminator.as_ref()));
        if !v3_1 {
            out.boolean("nullable", model.nullable);
        }
        out.boolean("writeOnly", model.write_only);
        out.boolean("deprecated", model.deprecated);
        out.extensions(model.extensions.as_ref());
        out.build()
    }

    /// 3.1 folds `nullable: true` into the type list.
    fn write_type(&self, out: &mut ObjectWriter<'_, J>, model: &Schema, v3_1: bool) {
        let type_name = model.schema_type.map(|t| t.as_str());
        if !(v3_1 && model.nullable == Some(true)) {
            out.string("type", type_name);
            return;
        }
        let names: Vec<String> = type_name
            .into_iter()
            .chain([SchemaType::Null.as_str()])
            .map(str::to_string)
            .collect();
        out.strings("type", Some(&names));
    }
}

fn write_bound_3_0<J: JsonIo>(
    out: &mut ObjectWriter<'_, J>,
    key: &str,
    exclusive_key: &str,
    bound: &Option<Number>,
    exclusive: &Option<Number>,
) {
    match exclusive {
        Some(limit) => {
            if bound.is_some() {
                log::debug!("`{key}` and `{exclusive_key}` both set, keeping the latter");
            }
            out.number(key, Some(limit));
            out.boolean(exclusive_key, Some(true));
        }
        None => out.number(key, bound.as_ref()),
    }
}

impl<J: JsonIo> DiscriminatorIo<'_, J> {
    /// `discriminatorProperty` and `discriminatorMapping` of a `@Schema`.
    pub fn read_schema_annotation(&self, annotation: &AnnotationInstance) -> Option<Discriminator> {
        let property_name = string_member(annotation, "discriminatorProperty");
        let mapping = annotation.nested_array("discriminatorMapping");
        if property_name.is_none() && mapping.is_none() {
            return None;
        }
        let mapping: IndexMap<String, String> = mapping
            .unwrap_or_default()
            .into_iter()
            .filter_map(|m| {
                let target = m.class_value("schema")?;
                let simple = target.simple_name()?;
                let key = string_member(m, "value").unwrap_or_else(|| simple.to_string());
                Some((key, ReferenceType::Schema.reference_of(simple)))
            })
            .collect();
        Some(Discriminator {
            property_name,
            mapping: (!mapping.is_empty()).then_some(mapping),
        })
    }
}

impl<J: JsonIo> JsonReader<J> for DiscriminatorIo<'_, J> {
    fn read_object(&self, node: &J::Object) -> Discriminator {
        let r = ObjectReader::new(self.json(), node);
        Discriminator {
            property_name: r.string("propertyName"),
            mapping: r.string_map("mapping"),
        }
    }
}

impl<J: JsonIo> JsonWriter<J> for DiscriminatorIo<'_, J> {
    fn write(&self, model: &Discriminator) -> Option<J::Value> {
        let mut out = ObjectWriter::new(self.json());
        out.string("propertyName", model.property_name.as_deref());
        out.string_map("mapping", model.mapping.as_ref());
        Some(out.build())
    }
}

impl<J: JsonIo> JsonReader<J> for XmlIo<'_, J> {
    fn read_object(&self, node: &J::Object) -> Xml {
        let r = ObjectReader::new(self.json(), node);
        Xml {
            name: r.string("name"),
            namespace: r.string("namespace"),
            prefix: r.string("prefix"),
            attribute: r.boolean("attribute"),
            wrapped: r.boolean("wrapped"),
            extensions: r.extensions(),
        }
    }
}

impl<J: JsonIo> JsonWriter<J> for XmlIo<'_, J> {
    fn write(&self, model: &Xml) -> Option<J::Value> {
        let mut out = ObjectWriter::new(self.json());
        out.string("name", model.name.as_deref());
        out.string("namespace", model.namespace.as_deref());
        out.string("prefix", model.prefix.as_deref());
        out.boolean("attribute", model.attribute);
        out.boolean("wrapped", model.wrapped);
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
    fn test_reference_expansion() {
        let ctx = IoContext::for_json(SerdeJsonIo::new());
        let local = AnnotationInstance::new(names::SCHEMA).with("ref", "Pet");
        let external =
            AnnotationInstance::new(names::SCHEMA).with("ref", "https://example.com/x.json#/Foo");
        assert_eq!(
            ctx.schemas()
                .read_annotation(&local)
                .borrow()
                .reference
                .as_deref(),
            Some("#/components/schemas/Pet")
        );
        assert_eq!(
            ctx.schemas()
                .read_annotation(&external)
                .borrow()
                .reference
                .as_deref(),
            Some("https://example.com/x.json#/Foo")
        );
    }

    #[test]
    fn test_hidden_schema_is_not_visible() {
        let ctx = IoContext::for_json(SerdeJsonIo::new());
        let hidden = AnnotationInstance::new(names::SCHEMA).with("hidden", true);
        assert!(ctx.schemas().read_visible(&hidden).is_none());
    }

    #[test]
    fn test_annotation_members() {
        let ctx = IoContext::for_json(SerdeJsonIo::new());
        let annotation = AnnotationInstance::new(names::SCHEMA)
            .with_enum("type", "INTEGER")
            .with("maximum", "10")
            .with("exclusiveMaximum", true)
            .with("defaultValue", "5")
            .with("enumeration", vec!["1", "5"])
            .with(
                "properties",
                vec![
                    AnnotationInstance::new(names::SCHEMA_PROPERTY)
                        .with("name", "id")
                        .with("required", true)
                        .with_enum("type", "STRING")
                        .with("example", "007"),
                ],
            );
        let node = ctx.schemas().read_annotation(&annotation);
        let schema = node.borrow();
        assert_eq!(schema.exclusive_maximum, Some(Number::from(10)));
        assert_eq!(schema.maximum, None);
        assert_eq!(schema.default_value, Some(json!(5)));
        assert_eq!(schema.enumeration, Some(vec![json!(1), json!(5)]));
        assert_eq!(schema.required, Some(vec!["id".to_string()]));
        let id = schema.properties.as_ref().unwrap()["id"]
            .borrow()
            .example
            .clone();
        assert_eq!(id, Some(json!("007")));
    }

    #[test]
    fn test_implementation_array_and_merge() {
        let ctx = IoContext::for_json(SerdeJsonIo::new());
        let array = AnnotationInstance::new(names::SCHEMA)
            .with_enum("type", "ARRAY")
            .with("implementation", TypeRef::class("com.example.Pet"));
        assert_eq!(
            ctx.schemas().write(&ctx.schemas().read_annotation(&array)),
            Some(json!({"type": "array", "items": {"$ref": "#/components/schemas/Pet"}}))
        );

        let refined = AnnotationInstance::new(names::SCHEMA)
            .with("implementation", TypeRef::class("java.util.UUID"))
            .with("description", "identifier");
        assert_eq!(
            ctx.schemas()
                .write(&ctx.schemas().read_annotation(&refined)),
            Some(json!({"format": "uuid", "description": "identifier", "type": "string"}))
        );
    }

    #[test]
    fn test_type_to_schema() {
        let ctx = IoContext::for_json(SerdeJsonIo::new());
        let schemas = ctx.schemas();
        let write = |ty: TypeRef| schemas.type_to_schema(&ty).and_then(|s| schemas.write(&s));
        assert_eq!(write(TypeRef::Void), None);
        assert_eq!(
            write(TypeRef::Primitive(Primitive::Long)),
            Some(json!({"format": "int64", "type": "integer"}))
        );
        assert_eq!(
            write(TypeRef::parameterized(
                "java.util.Optional",
                vec![TypeRef::class("java.lang.String")]
            )),
            Some(json!({"type": "string"}))
        );
        assert_eq!(
            write(TypeRef::parameterized(
                "java.util.Set",
                vec![TypeRef::class("java.lang.Integer")]
            )),
            Some(json!({
                "uniqueItems": true,
                "type": "array",
                "items": {"format": "int32", "type": "integer"}
            }))
        );
        assert_eq!(
            write(TypeRef::parameterized(
                "java.util.Map",
                vec![TypeRef::class("java.lang.String"), TypeRef::class("a.b.Widget")]
            )),
            Some(json!({
                "type": "object",
                "additionalProperties": {"$ref": "#/components/schemas/Widget"}
            }))
        );
    }

    #[test]
    fn test_nullable_by_version() {
        let ctx = IoContext::for_json(SerdeJsonIo::new());
        let node = SchemaNode::new(Schema {
            nullable: Some(true),
            ..Schema::of_type(SchemaType::String)
        });
        assert_eq!(ctx.schemas().write(&node), Some(json!({"type": ["string", "null"]})));
        ctx.set_version(OpenApiVersion::V3_0);
        assert_eq!(
            ctx.schemas().write(&node),
            Some(json!({"type": "string", "nullable": true}))
        );
    }

    #[test]
    fn test_read_both_shapes() {
        let ctx = IoContext::for_json(SerdeJsonIo::new());
        let v3_0 = json!({
            "type": "integer",
            "nullable": true,
            "minimum": 1,
            "exclusiveMinimum": true
        });
        let v3_1 = json!({"type": ["integer", "null"], "exclusiveMinimum": 1});
        let a = ctx.schemas().read_value(&v3_0).unwrap();
        let b = ctx.schemas().read_value(&v3_1).unwrap();
        assert_eq!(a, b);
        assert_eq!(ctx.schemas().write(&a), Some(v3_1));
        ctx.set_version(OpenApiVersion::V3_0);
        assert_eq!(ctx.schemas().write(&b), Some(v3_0));
    }

    #[test]
    fn test_null_only_type() {
        let ctx = IoContext::for_json(SerdeJsonIo::new());
        let node = ctx
            .schemas()
            .read_value(&json!({"type": ["null"]}))
            .unwrap();
        assert_eq!(node.borrow().schema_type, None);
        assert_eq!(node.borrow().nullable, Some(true));
        assert_eq!(ctx.schemas().write(&node), Some(json!({"type": ["null"]})));
    }

    #[test]
    fn test_reference_siblings_by_version() {
        let ctx = IoContext::for_json(SerdeJsonIo::new());
        let node = json!({"$ref": "#/components/schemas/Pet", "description": "a pet"});
        let schema = ctx.schemas().read_value(&node).unwrap();
        assert_eq!(ctx.schemas().write(&schema), Some(node));
        ctx.set_version(OpenApiVersion::V3_0);
        assert_eq!(
            ctx.schemas().write(&schema),
            Some(json!({"$ref": "#/components/schemas/Pet"}))
        );
    }

    #[test]
    fn test_cyclic_write_terminates() {
        let ctx = IoContext::for_json(SerdeJsonIo::new());
        let node = SchemaNode::new(Schema::of_type(SchemaType::Object));
        node.borrow_mut().add_property("self", node.clone());
        node.borrow_mut().not = Some(node.clone());
        assert_eq!(
            ctx.schemas().write(&node),
            Some(json!({"type": "object", "properties": {"self": {}}, "not": {}}))
        );
    }

    #[test]
    fn test_shared_node_written_in_each_branch() {
        let ctx = IoContext::for_json(SerdeJsonIo::new());
        let shared = SchemaNode::new(Schema::of_type(SchemaType::String));
        let mut parent = Schema::of_type(SchemaType::Object);
        parent.add_property("a", shared.clone());
        parent.add_property("b", shared.clone());
        let parent = SchemaNode::new(parent);
        let expected = json!({
            "type": "object",
            "properties": {"a": {"type": "string"}, "b": {"type": "string"}}
        });
        assert_eq!(ctx.schemas().write(&parent), Some(expected.clone()));
        // The guard is released once a write completes.
        assert!(ctx.enter_schema(shared.id()));
        ctx.leave_schema(shared.id());
        assert_eq!(ctx.schemas().write(&parent), Some(expected));
    }

    #[test]
    fn test_discriminator_mapping() {
        let ctx = IoContext::for_json(SerdeJsonIo::new());
        let annotation = AnnotationInstance::new(names::SCHEMA)
            .with("discriminatorProperty", "kind")
            .with(
                "discriminatorMapping",
                vec![
                    AnnotationInstance::new(names::DISCRIMINATOR_MAPPING)
                        .with("value", "dog")
                        .with("schema", TypeRef::class("zoo.Dog")),
                ],
            );
        let discriminator = ctx
            .discriminators()
            .read_schema_annotation(&annotation)
            .unwrap();
        assert_eq!(
            ctx.discriminators().write(&discriminator),
            Some(json!({"propertyName": "kind", "mapping": {"dog": "#/components/schemas/Dog"}}))
        );
    }
}
