use indexmap::IndexMap;
use oasio_core::annotation::{
    AnnotationInstance, ClassIndex, ClassInfo, FieldInfo, MethodInfo, MethodParameterInfo,
    MethodRef, Primitive, TypeRef, names,
};
use oasio_core::io::JsonWriter;
use oasio_core::json::{JsonIo, SerdeJsonIo, YamlIo};
use oasio_core::model::{Components, In, Parameter, Schema, SchemaNode, SchemaType, Style};
use oasio_core::{Format, IoContext, OasioConfig};
use oasio_scan::{ParameterProcessor, ResourceParameters, ScanContext};
use serde_json::json;

fn jaxrs(simple: &str) -> AnnotationInstance {
    AnnotationInstance::new(format!("jakarta.ws.rs.{simple}"))
}

fn path(value: &str) -> AnnotationInstance {
    jaxrs("Path").with("value", value)
}

fn param(kind: &str, name: &str) -> AnnotationInstance {
    jaxrs(kind).with("value", name)
}

fn multipart(simple: &str) -> AnnotationInstance {
    AnnotationInstance::new(format!(
        "org.jboss.resteasy.annotations.providers.multipart.{simple}"
    ))
}

fn constraint(simple: &str) -> AnnotationInstance {
    AnnotationInstance::new(format!("jakarta.validation.constraints.{simple}"))
}

fn string() -> TypeRef {
    TypeRef::class("java.lang.String")
}

#[derive(Default)]
struct Setup<'a> {
    config: OasioConfig,
    components: Option<&'a Components>,
    consumes: Option<Vec<String>>,
}

fn scan_with(
    index: &ClassIndex,
    setup: Setup<'_>,
    class: &str,
    method: &str,
) -> ResourceParameters {
    let _ = env_logger::builder().is_test(true).try_init();
    let models = IoContext::for_scanning(SerdeJsonIo::new(), index, setup.config.clone());
    let mut scan = ScanContext::new(index, &models, &setup.config);
    if let Some(components) = setup.components {
        scan = scan.with_components(components);
    }
    if let Some(consumes) = setup.consumes {
        scan = scan.with_consumes(consumes);
    }
    ParameterProcessor::process(&scan, class, &MethodRef::new(class, method))
}

fn scan(index: &ClassIndex, class: &str, method: &str) -> ResourceParameters {
    scan_with(index, Setup::default(), class, method)
}

fn names_of(parameters: &[Parameter]) -> Vec<&str> {
    parameters
        .iter()
        .filter_map(|p| p.name.as_deref())
        .collect()
}

fn schema_of(parameter: &Parameter) -> Schema {
    parameter
        .schema
        .as_ref()
        .expect("should have a schema")
        .borrow()
        .clone()
}

fn property(schema: &Schema, name: &str) -> Schema {
    schema
        .properties
        .as_ref()
        .and_then(|properties| properties.get(name))
        .expect("should have the property")
        .borrow()
        .clone()
}

#[test]
fn test_path_parameter_merges_with_openapi_parameter() {
    let index = ClassIndex::new().with(
        ClassInfo::new("api.Items").annotation(path("/items")).method(
            MethodInfo::new("get", TypeRef::class("api.Item"))
                .annotation(jaxrs("GET"))
                .annotation(path("{id}"))
                .parameter(
                    MethodParameterInfo::new("id", TypeRef::class("java.lang.Long"))
                        .annotation(param("PathParam", "id"))
                        .annotation(
                            AnnotationInstance::new(names::PARAMETER)
                                .with("name", "id")
                                .with("description", "Item id"),
                        ),
                ),
        ),
    );

    let result = scan(&index, "api.Items", "get");
    assert!(result.path_item_parameters.is_empty());
    assert_eq!(result.path_item_path, "/items");
    assert_eq!(result.operation_path, "/{id}");
    assert_eq!(result.full_path(), "/items/{id}");

    let [id] = result.operation_parameters.as_slice() else {
        panic!(
            "expected one parameter, got {:?}",
            result.operation_parameters
        );
    };
    assert_eq!(id.name.as_deref(), Some("id"));
    assert_eq!(id.location, Some(In::Path));
    assert_eq!(id.required, Some(true));
    assert_eq!(id.description.as_deref(), Some("Item id"));
    let schema = schema_of(id);
    assert_eq!(schema.schema_type, Some(SchemaType::Integer));
    assert_eq!(schema.format.as_deref(), Some("int64"));
}

fn to_yaml(parameters: &[Parameter]) -> String {
    let ctx = IoContext::for_json(YamlIo::new());
    let node = ctx
        .parameters()
        .write_list(Some(parameters))
        .expect("should write parameters");
    ctx.json()
        .to_text(&node, Format::Yaml)
        .expect("should render YAML")
}

fn widgets() -> ClassIndex {
    ClassIndex::new().with(
        ClassInfo::new("api.Widgets").annotation(path("widgets")).method(
            MethodInfo::new("get", TypeRef::Void)
                .annotation(jaxrs("GET"))
                .annotation(path("{id}"))
                .parameter(
                    MethodParameterInfo::new("id", string()).annotation(param("PathParam", "id")),
                )
                .parameter(
                    MethodParameterInfo::new("color", string())
                        .annotation(param("MatrixParam", "color")),
                )
                .parameter(
                    MethodParameterInfo::new("size", TypeRef::Primitive(Primitive::Int))
                        .annotation(param("MatrixParam", "size")),
                ),
        ),
    )
}

#[test]
fn test_matrix_parameters_become_one_object_parameter() {
    let result = scan(&widgets(), "api.Widgets", "get");
    assert_eq!(result.full_path(), "/widgets/{id}{idMatrix}");
    assert_eq!(names_of(&result.operation_parameters), vec!["id", "idMatrix"]);
    assert_eq!(result.path_parameter_template_names(), vec!["id", "idMatrix"]);

    let matrix = &result.operation_parameters[1];
    assert_eq!(matrix.location, Some(In::Path));
    assert_eq!(matrix.style, Some(Style::Matrix));
    assert_eq!(matrix.explode, Some(true));
    assert_eq!(matrix.required, Some(true));
    let schema = schema_of(matrix);
    assert_eq!(schema.schema_type, Some(SchemaType::Object));
    let properties: Vec<_> = schema
        .properties
        .as_ref()
        .expect("should have properties")
        .keys()
        .cloned()
        .collect();
    assert_eq!(properties, vec!["color", "size"]);
    assert_eq!(property(&schema, "color").schema_type, Some(SchemaType::String));
    assert_eq!(property(&schema, "size").format.as_deref(), Some("int32"));
}

#[test]
fn test_matrix_parameters_write_as_document_parameters() {
    let result = scan(&widgets(), "api.Widgets", "get");
    insta::assert_snapshot!(to_yaml(&result.operation_parameters), @r"
    - name: id
      in: path
      required: true
      schema:
        type: string
    - name: idMatrix
      in: path
      required: true
      schema:
        type: object
        properties:
          color:
            type: string
          size:
            format: int32
            type: integer
      style: matrix
      explode: true
    ");
}

#[test]
fn test_ignored_headers_and_hidden_parameters_are_dropped() {
    let index = ClassIndex::new().with(
        ClassInfo::new("api.Orders").annotation(path("orders")).method(
            MethodInfo::new("list", TypeRef::Void)
                .annotation(jaxrs("GET"))
                .parameter(
                    MethodParameterInfo::new("auth", string())
                        .annotation(param("HeaderParam", "Authorization")),
                )
                .parameter(
                    MethodParameterInfo::new("requestId", string())
                        .annotation(param("HeaderParam", "X-Request-Id")),
                )
                .parameter(
                    MethodParameterInfo::new("secret", string())
                        .annotation(param("QueryParam", "secret"))
                        .annotation(AnnotationInstance::new(names::PARAMETER).with("hidden", true)),
                ),
        ),
    );

    let result = scan(&index, "api.Orders", "list");
    assert_eq!(names_of(&result.operation_parameters), vec!["X-Request-Id"]);
    assert_eq!(result.operation_parameters[0].location, Some(In::Header));
    assert!(result.form_body_content.is_none());
}

fn profiles() -> ClassIndex {
    ClassIndex::new().with(
        ClassInfo::new("api.Profiles").annotation(path("profiles")).method(
            MethodInfo::new("update", TypeRef::Void)
                .annotation(jaxrs("POST"))
                .parameter(
                    MethodParameterInfo::new("name", string())
                        .annotation(param("FormParam", "name")),
                )
                .parameter(
                    MethodParameterInfo::new("age", TypeRef::Primitive(Primitive::Int))
                        .annotation(param("FormParam", "age"))
                        .annotation(param("DefaultValue", "18")),
                )
                .parameter(
                    MethodParameterInfo::new(
                        "photo",
                        TypeRef::array(TypeRef::Primitive(Primitive::Byte)),
                    )
                    .annotation(param("FormParam", "photo"))
                    .annotation(multipart("PartType").with("value", "image/png")),
                ),
        ),
    )
}

#[test]
fn test_form_parameters_become_request_body() {
    let index = profiles();
    let result = scan(&index, "api.Profiles", "update");
    assert!(result.operation_parameters.is_empty());

    let content = result
        .form_body_content
        .as_ref()
        .expect("should have a form body");
    let media_types: Vec<_> = content.media_types.keys().cloned().collect();
    assert_eq!(media_types, vec!["application/x-www-form-urlencoded"]);

    let schema = result
        .form_body_schema()
        .expect("should have a form schema");
    let schema = schema.borrow();
    assert_eq!(schema.schema_type, Some(SchemaType::Object));
    let properties: Vec<_> = schema
        .properties
        .as_ref()
        .expect("should have properties")
        .keys()
        .cloned()
        .collect();
    assert_eq!(properties, vec!["name", "age", "photo"]);
    assert_eq!(property(&schema, "age").default_value, Some(json!(18)));
    assert_eq!(property(&schema, "photo").schema_type, Some(SchemaType::Array));

    let encoding = content.media_types["application/x-www-form-urlencoded"]
        .encoding
        .as_ref()
        .expect("should have encodings");
    assert_eq!(encoding["photo"].content_type.as_deref(), Some("image/png"));
    assert!(!encoding.contains_key("name"));
}

#[test]
fn test_form_body_uses_consumed_media_types() {
    let index = profiles();
    let setup = Setup {
        consumes: Some(vec!["multipart/form-data".to_string()]),
        ..Setup::default()
    };
    let result = scan_with(&index, setup, "api.Profiles", "update");
    let content = result.form_body_content.expect("should have a form body");
    assert!(content.media_types.contains_key("multipart/form-data"));
    assert_eq!(content.media_types.len(), 1);
}

#[test]
fn test_bean_parameters_are_expanded() {
    let index = ClassIndex::new()
        .with(
            ClassInfo::new("api.Search")
                .annotation(path("search"))
                .method(
                    MethodInfo::new("find", TypeRef::Void)
                        .annotation(jaxrs("GET"))
                        .parameter(
                            MethodParameterInfo::new("filter", TypeRef::class("api.SearchFilter"))
                                .annotation(jaxrs("BeanParam")),
                        ),
                )
                .method(
                    MethodInfo::new("upload", TypeRef::Void)
                        .annotation(jaxrs("POST"))
                        .annotation(path("upload"))
                        .parameter(
                            MethodParameterInfo::new("form", TypeRef::class("api.UploadForm"))
                                .annotation(multipart("MultipartForm")),
                        ),
                ),
        )
        .with(
            ClassInfo::new("api.SearchFilter")
                .field(
                    FieldInfo::new("trace", string())
                        .annotation(param("HeaderParam", "X-Trace")),
                )
                .field(FieldInfo::new("q", string()).annotation(param("QueryParam", "q"))),
        )
        .with(
            ClassInfo::new("api.UploadForm").field(
                FieldInfo::new("file", TypeRef::array(TypeRef::Primitive(Primitive::Byte)))
                    .annotation(param("FormParam", "file")),
            ),
        );

    let found = scan(&index, "api.Search", "find");
    assert_eq!(names_of(&found.operation_parameters), vec!["q", "X-Trace"]);
    assert_eq!(found.operation_parameters[0].location, Some(In::Query));
    assert_eq!(schema_of(&found.operation_parameters[0]).schema_type, Some(SchemaType::String));

    let uploaded = scan(&index, "api.Search", "upload");
    assert!(uploaded.operation_parameters.is_empty());
    assert_eq!(uploaded.full_path(), "/search/upload");
    let content = uploaded.form_body_content.expect("should have a form body");
    assert!(content.media_types.contains_key("multipart/form-data"));
}

#[test]
fn test_path_template_regex_moves_to_schema_pattern() {
    let index = ClassIndex::new().with(
        ClassInfo::new("api.Files").annotation(path("files")).method(
            MethodInfo::new("get", TypeRef::Void)
                .annotation(jaxrs("GET"))
                .annotation(path("{id: [0-9]+}"))
                .parameter(
                    MethodParameterInfo::new("id", string())
                        .annotation(param("PathParam", "id")),
                ),
        ),
    );

    let result = scan(&index, "api.Files", "get");
    assert_eq!(result.operation_path, "/{id}");
    assert_eq!(result.full_path(), "/files/{id}");
    let schema = schema_of(&result.operation_parameters[0]);
    assert_eq!(schema.pattern.as_deref(), Some("[0-9]+"));
}

#[test]
fn test_unannotated_path_parameter_bound_by_name() {
    let index = ClassIndex::new().with(
        ClassInfo::new("api.Things").annotation(path("things/{thingId}")).method(
            MethodInfo::new("get", TypeRef::Void)
                .annotation(jaxrs("GET"))
                .parameter(MethodParameterInfo::new("thingId", string())),
        ),
    );

    let result = scan(&index, "api.Things", "get");
    assert_eq!(result.full_path(), "/things/{thingId}");
    assert_eq!(names_of(&result.operation_parameters), vec!["thingId"]);
    let thing = &result.operation_parameters[0];
    assert_eq!(thing.location, Some(In::Path));
    assert_eq!(thing.required, Some(true));
    assert_eq!(schema_of(thing).schema_type, Some(SchemaType::String));
}

#[test]
fn test_parameters_annotation_sets_preferred_order() {
    let declared = |name: &str| {
        AnnotationInstance::new(names::PARAMETER)
            .with("name", name)
            .with_enum("in", "QUERY")
    };
    let index = ClassIndex::new().with(
        ClassInfo::new("api.Reports").annotation(path("reports")).method(
            MethodInfo::new("get", TypeRef::Void)
                .annotation(jaxrs("GET"))
                .annotation(
                    AnnotationInstance::new(names::PARAMETERS).with(
                        "value",
                        vec![declared("b"), declared("a").with("description", "First")],
                    ),
                )
                .parameter(
                    MethodParameterInfo::new("a", string())
                        .annotation(param("QueryParam", "a")),
                )
                .parameter(
                    MethodParameterInfo::new("b", string())
                        .annotation(param("QueryParam", "b")),
                ),
        ),
    );

    let result = scan(&index, "api.Reports", "get");
    assert_eq!(names_of(&result.operation_parameters), vec!["b", "a"]);
    assert_eq!(result.operation_parameters[1].description.as_deref(), Some("First"));
}

#[test]
fn test_default_on_reference_composes_all_of() {
    let index = ClassIndex::new().with(
        ClassInfo::new("api.Paints").annotation(path("paints")).method(
            MethodInfo::new("list", TypeRef::Void)
                .annotation(jaxrs("GET"))
                .parameter(
                    MethodParameterInfo::new("color", TypeRef::class("api.Color"))
                        .annotation(param("QueryParam", "color"))
                        .annotation(param("DefaultValue", "RED")),
                ),
        ),
    );
    let mut schemas = IndexMap::new();
    schemas.insert("Color".to_string(), SchemaNode::new(Schema::of_type(SchemaType::String)));
    let components = Components {
        schemas: Some(schemas),
        ..Components::default()
    };

    let setup = Setup {
        components: Some(&components),
        ..Setup::default()
    };
    let result = scan_with(&index, setup, "api.Paints", "list");
    let schema = schema_of(&result.operation_parameters[0]);
    assert_eq!(schema.schema_type, None);
    let all_of = schema.all_of.expect("should compose the reference");
    assert_eq!(all_of.len(), 2);
    assert_eq!(
        all_of[0].borrow().reference.as_deref(),
        Some("#/components/schemas/Color")
    );
    let local = all_of[1].borrow();
    assert_eq!(local.default_value, Some(json!("RED")));
    assert_eq!(local.schema_type, None);
}

fn pages() -> ClassIndex {
    ClassIndex::new().with(
        ClassInfo::new("api.Pages").annotation(path("pages")).method(
            MethodInfo::new("list", TypeRef::Void)
                .annotation(jaxrs("GET"))
                .parameter(
                    MethodParameterInfo::new("limit", TypeRef::class("java.lang.Integer"))
                        .annotation(param("QueryParam", "limit"))
                        .annotation(constraint("Min").with("value", 1_i64))
                        .annotation(constraint("Max").with("value", 100_i64))
                        .annotation(constraint("NotNull")),
                ),
        ),
    )
}

#[test]
fn test_validation_constraints_apply_to_parameter_schema() {
    let index = pages();
    let result = scan(&index, "api.Pages", "list");
    let limit = &result.operation_parameters[0];
    assert_eq!(limit.required, Some(true));
    let schema = schema_of(limit);
    assert_eq!(schema.minimum, Some(serde_json::Number::from(1)));
    assert_eq!(schema.maximum, Some(serde_json::Number::from(100)));
}

#[test]
fn test_validation_constraints_can_be_disabled() {
    let index = pages();
    let setup = Setup {
        config: OasioConfig {
            bean_validation: false,
            ..OasioConfig::default()
        },
        ..Setup::default()
    };
    let result = scan_with(&index, setup, "api.Pages", "list");
    let limit = &result.operation_parameters[0];
    assert_eq!(limit.required, None);
    let schema = schema_of(limit);
    assert_eq!(schema.minimum, None);
    assert_eq!(schema.maximum, None);
}

#[test]
fn test_inherited_parameters_and_refining_override() {
    let index = ClassIndex::new()
        .with(
            ClassInfo::new("api.PetApi").method(
                MethodInfo::new("get", TypeRef::Void)
                    .annotation(jaxrs("GET"))
                    .annotation(path("{id}"))
                    .parameter(
                        MethodParameterInfo::new("id", string())
                            .annotation(param("PathParam", "id"))
                            .annotation(
                                AnnotationInstance::new(names::PARAMETER)
                                    .with("name", "id")
                                    .with("description", "Pet id"),
                            ),
                    ),
            ),
        )
        .with(
            ClassInfo::new("api.BaseResource")
                .field(
                    FieldInfo::new("tenant", string())
                        .annotation(param("HeaderParam", "X-Tenant")),
                ),
        )
        .with(
            ClassInfo::new("api.PetResource")
                .extends("api.BaseResource")
                .implements("api.PetApi")
                .annotation(path("pets"))
                .method(
                    MethodInfo::new("get", TypeRef::Void).parameter(
                        MethodParameterInfo::new("id", string()).annotation(
                            AnnotationInstance::new(names::PARAMETER)
                                .with("name", "id")
                                .with_enum("in", "PATH")
                                .with("description", "Identifier of the pet"),
                        ),
                    ),
                ),
        );

    let result = scan(&index, "api.PetResource", "get");
    assert_eq!(result.full_path(), "/pets/{id}");
    assert_eq!(names_of(&result.path_item_parameters), vec!["X-Tenant"]);
    assert_eq!(result.path_item_parameters[0].location, Some(In::Header));

    let [id] = result.operation_parameters.as_slice() else {
        panic!(
            "expected one parameter, got {:?}",
            result.operation_parameters
        );
    };
    assert_eq!(id.location, Some(In::Path));
    assert_eq!(id.required, Some(true));
    assert_eq!(id.description.as_deref(), Some("Identifier of the pet"));
    assert_eq!(
        result.all_parameters().len(),
        2,
        "class parameters and operation parameters are both reported"
    );
}
