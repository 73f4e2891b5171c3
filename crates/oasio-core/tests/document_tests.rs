use std::io::Write;

use oasio_core::json::{SerdeJsonIo, YamlIo};
use oasio_core::model::{AdditionalProperties, In, OpenApi, SchemaType, Style};
use oasio_core::{Format, OasioConfig, parser, serializer};

const PETSTORE: &str = include_str!("fixtures/petstore-3.0.yaml");
const WEBHOOKS: &str = include_str!("fixtures/webhooks-3.1.json");
const CATALOG: &str = include_str!("fixtures/catalog-3.1.yaml");

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn test_petstore_model() {
    init_logger();
    let model = oasio_core::parse_str(PETSTORE, Format::Yaml, &OasioConfig::default())
        .expect("should parse petstore");

    let paths = model.paths.as_ref().expect("should have paths");
    let list = paths.path_items["/pets"]
        .get
        .as_ref()
        .expect("should have GET /pets");
    assert_eq!(list.operation_id.as_deref(), Some("listPets"));
    let parameters = list.parameters.as_ref().expect("should have parameters");
    assert_eq!(parameters[0].location, Some(In::Query));
    assert_eq!(parameters[1].reference.as_deref(), Some("#/components/parameters/Trace"));

    let limit = parameters[0]
        .schema
        .as_ref()
        .expect("should have limit schema")
        .borrow();
    assert_eq!(limit.minimum, None);
    assert_eq!(limit.exclusive_minimum, Some(0.into()));
    assert_eq!(limit.maximum, Some(100.into()));

    let create = paths.path_items["/pets"]
        .post
        .as_ref()
        .expect("should have POST /pets");
    assert_eq!(create.security.as_deref(), Some(&[][..]));
    assert!(
        create
            .callbacks
            .as_ref()
            .expect("should have callbacks")
            .contains_key("adopted")
    );

    let components = model.components.as_ref().expect("should have components");
    let schemas = components.schemas.as_ref().expect("should have schemas");
    assert_eq!(
        schemas.keys().collect::<Vec<_>>(),
        vec!["Pet", "Owner", "NewPet", "Error"]
    );
    let pet = schemas["Pet"].borrow();
    let tag = pet
        .properties
        .as_ref()
        .expect("should have properties")["tag"]
        .borrow();
    assert_eq!(tag.nullable, Some(true));
    assert!(matches!(
        schemas["Error"].borrow().additional_properties,
        Some(AdditionalProperties::Bool(false))
    ));
    assert_eq!(
        model
            .extensions
            .as_ref()
            .expect("should have extensions")["x-audience"],
        serde_json::json!("public")
    );
}

#[test]
fn test_round_trip_both_formats() {
    init_logger();
    let config = OasioConfig::default();
    for (text, format) in [(PETSTORE, Format::Yaml), (WEBHOOKS, Format::Json)] {
        let model = oasio_core::parse_str(text, format, &config).expect("should parse fixture");
        for out in [Format::Json, Format::Yaml] {
            let written = serializer::serialize(&model, out).expect("should serialize");
            let reread = oasio_core::parse_str(&written, out, &config).expect("should reparse");
            assert_eq!(reread, model, "round trip through {out:?}");
        }
    }
}

/// Serialize through both backings in both formats, reparsing each text
/// through the backing that wrote it.
fn round_trips(model: &OpenApi, config: &OasioConfig) -> Vec<OpenApi> {
    let mut reread = Vec::new();
    for format in [Format::Json, Format::Yaml] {
        let text = serializer::serialize_with(SerdeJsonIo::new(), model, format, config)
            .expect("should serialize through serde_json");
        reread.push(
            parser::parse_with(SerdeJsonIo::new(), text.as_bytes(), format, config)
                .expect("should reparse through serde_json"),
        );
        let text = serializer::serialize_with(YamlIo::new(), model, format, config)
            .expect("should serialize through YAML");
        reread.push(
            parser::parse_with(YamlIo::new(), text.as_bytes(), format, config)
                .expect("should reparse through YAML"),
        );
    }
    reread
}

#[test]
fn test_catalog_constructs_round_trip_on_both_backings() {
    init_logger();
    let config = OasioConfig::default();
    let model = parser::parse_with(YamlIo::new(), CATALOG.as_bytes(), Format::Yaml, &config)
        .expect("should parse catalog through YAML");
    assert_eq!(
        oasio_core::parse_str(CATALOG, Format::Yaml, &config).expect("should parse catalog"),
        model
    );

    let info = model.info.as_ref().expect("should have info");
    let contact = info.contact.as_ref().expect("should have contact");
    assert_eq!(contact.email.as_deref(), Some("catalog@example.com"));
    assert_eq!(
        contact
            .extensions
            .as_ref()
            .expect("should have extensions")["x-slack"],
        serde_json::json!("#catalog")
    );

    let paths = model.paths.as_ref().expect("should have paths");
    let upload = paths.path_items["/items/{id}/image"]
        .put
        .as_ref()
        .expect("should have PUT");
    let body = upload.request_body.as_ref().expect("should have a body");
    let multipart = &body
        .content
        .as_ref()
        .expect("should have content")
        .media_types["multipart/form-data"];
    let encoding = multipart.encoding.as_ref().expect("should have encodings");
    let headers = encoding["image"]
        .headers
        .as_ref()
        .expect("should have headers");
    assert_eq!(headers["X-Image-Checksum"].required, Some(true));
    assert_eq!(encoding["meta"].style, Some(Style::Form));
    assert_eq!(encoding["meta"].allow_reserved, Some(false));

    let components = model.components.as_ref().expect("should have components");
    let item = components
        .schemas
        .as_ref()
        .expect("should have schemas")["Item"]
        .borrow();
    let xml = item.xml.as_ref().expect("should have xml");
    assert_eq!(xml.prefix.as_deref(), Some("cat"));
    let labels = item
        .properties
        .as_ref()
        .expect("should have properties")["labels"]
        .borrow();
    assert_eq!(labels.xml.as_ref().and_then(|x| x.wrapped), Some(true));
    let examples = components.examples.as_ref().expect("should have examples");
    assert_eq!(examples.keys().collect::<Vec<_>>(), vec!["Lamp", "Brochure"]);
    assert_eq!(
        examples["Brochure"].external_value.as_deref(),
        Some("https://example.com/examples/brochure.xml")
    );

    for reread in round_trips(&model, &config) {
        assert_eq!(reread, model);
    }

    // Nothing is dropped or invented on the way out.
    let written = serializer::serialize_with(YamlIo::new(), &model, Format::Json, &config)
        .expect("should serialize");
    let written: serde_json::Value = serde_json::from_str(&written).expect("should be JSON");
    let source: serde_json::Value =
        serde_yaml_ng::from_str(CATALOG).expect("fixture should be YAML");
    assert_eq!(written, source);
}

#[test]
fn test_reserialization_is_idempotent() {
    let config = OasioConfig::default();
    for (text, format) in [(PETSTORE, Format::Yaml), (WEBHOOKS, Format::Json)] {
        let first = serializer::serialize(
            &oasio_core::parse_str(text, format, &config).expect("should parse fixture"),
            format,
        )
        .expect("should serialize");
        let second = serializer::serialize(
            &oasio_core::parse_str(&first, format, &config).expect("should reparse"),
            format,
        )
        .expect("should serialize again");
        assert_eq!(first, second);
    }
}

#[test]
fn test_3_0_shapes_written_for_3_0() {
    let model = oasio_core::parse_str(PETSTORE, Format::Yaml, &OasioConfig::default())
        .expect("should parse petstore");
    let json = serializer::serialize(&model, Format::Json).expect("should serialize");
    let value: serde_json::Value = serde_json::from_str(&json).expect("should be JSON");

    let limit = &value["paths"]["/pets"]["get"]["parameters"][0]["schema"];
    assert_eq!(limit["minimum"], serde_json::json!(0));
    assert_eq!(limit["exclusiveMinimum"], serde_json::json!(true));
    let tag = &value["components"]["schemas"]["Pet"]["properties"]["tag"];
    assert_eq!(tag["type"], serde_json::json!("string"));
    assert_eq!(tag["nullable"], serde_json::json!(true));
    assert_eq!(value["paths"]["/pets"]["post"]["security"], serde_json::json!([]));
}

#[test]
fn test_3_1_shapes_survive() {
    let model = oasio_core::parse_str(WEBHOOKS, Format::Json, &OasioConfig::default())
        .expect("should parse webhooks");
    let schemas = model
        .components
        .as_ref()
        .and_then(|c| c.schemas.as_ref())
        .expect("should have schemas");
    let event = schemas["PetEvent"].borrow();
    let properties = event.properties.as_ref().expect("should have properties");
    let nickname = properties["nickname"].borrow();
    assert_eq!(nickname.schema_type, Some(SchemaType::String));
    assert_eq!(nickname.nullable, Some(true));

    let json = serializer::serialize(&model, Format::Json).expect("should serialize");
    let value: serde_json::Value = serde_json::from_str(&json).expect("should be JSON");
    let written = &value["components"]["schemas"]["PetEvent"]["properties"];
    assert_eq!(written["nickname"]["type"], serde_json::json!(["string", "null"]));
    assert_eq!(written["weight"]["exclusiveMinimum"], serde_json::json!(0));
    assert_eq!(
        written["previous"]["description"],
        serde_json::json!("State before the change")
    );
    assert_eq!(
        value["webhooks"]["petChanged"]["post"]["requestBody"]["description"],
        serde_json::json!("The changed pet")
    );
    assert_eq!(value["info"]["summary"], serde_json::json!("Webhooks for pet changes"));
    assert!(value["components"]["pathItems"]["health"].is_object());
}

#[test]
fn test_downgrade_to_3_0_drops_3_1_fields() {
    let mut model = oasio_core::parse_str(WEBHOOKS, Format::Json, &OasioConfig::default())
        .expect("should parse webhooks");
    model.openapi = Some("3.0.3".into());
    let json = serializer::serialize(&model, Format::Json).expect("should serialize");
    let value: serde_json::Value = serde_json::from_str(&json).expect("should be JSON");
    assert!(value.get("webhooks").is_none());
    assert!(value.get("jsonSchemaDialect").is_none());
    assert!(value["info"].get("summary").is_none());
    assert!(value["components"].get("pathItems").is_none());
    let nickname = &value["components"]["schemas"]["PetEvent"]["properties"]["nickname"];
    assert_eq!(nickname["type"], serde_json::json!("string"));
    assert_eq!(nickname["nullable"], serde_json::json!(true));
    assert_eq!(
        value["components"]["schemas"]["PetEvent"]["properties"]["previous"],
        serde_json::json!({"$ref": "#/components/schemas/PetEvent"})
    );
}

#[test]
fn test_yaml_backing_matches_json_backing() {
    let config = OasioConfig::default();
    let from_json = oasio_core::parse_str(PETSTORE, Format::Yaml, &config).expect("should parse");
    let from_yaml = parser::parse_with(YamlIo::new(), PETSTORE.as_bytes(), Format::Yaml, &config)
        .expect("should parse through YAML backing");
    assert_eq!(from_json, from_yaml);
}

#[test]
fn test_yaml_output_quotes_numeric_keys() {
    let model = oasio_core::parse_str(PETSTORE, Format::Yaml, &OasioConfig::default())
        .expect("should parse petstore");
    let yaml = serializer::serialize(&model, Format::Yaml).expect("should serialize");
    assert!(yaml.contains("'200':"));
    assert!(!yaml.contains("\n          200:"));
}

#[test]
fn test_parse_path_from_file() {
    let dir = tempfile::tempdir().expect("should create temp dir");
    let path = dir.path().join("petstore.yml");
    let mut file = std::fs::File::create(&path).expect("should create file");
    file.write_all(PETSTORE.as_bytes())
        .expect("should write fixture");

    let model = oasio_core::parse_path(&path, &OasioConfig::default()).expect("should parse file");
    assert_eq!(model.openapi.as_deref(), Some("3.0.3"));

    let url = format!("file://{}", path.display());
    let from_url = oasio_core::parse_url(&url, &OasioConfig::default()).expect("should parse URL");
    assert_eq!(from_url, model);
}

#[test]
fn test_unknown_extension_is_fatal() {
    let dir = tempfile::tempdir().expect("should create temp dir");
    let path = dir.path().join("petstore.txt");
    std::fs::write(&path, PETSTORE).expect("should write fixture");
    let err = oasio_core::parse_path(&path, &OasioConfig::default()).unwrap_err();
    assert!(matches!(err, oasio_core::error::ParseError::UnknownExtension(_)));
}
