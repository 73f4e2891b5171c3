//! Whole-document serialization.

use crate::config::OasioConfig;
use crate::error::SerializeError;
use crate::io::{IoContext, JsonWriter};
use crate::json::{Format, JsonIo, SerdeJsonIo};
use crate::model::OpenApi;

/// Render a model as pretty JSON or YAML.
pub fn serialize(model: &OpenApi, format: Format) -> Result<String, SerializeError> {
    serialize_with(SerdeJsonIo::new(), model, format, &OasioConfig::default())
}

/// Render a model through a specific JSON backing.
///
/// The document version is taken from `model.openapi`, not from `config`.
pub fn serialize_with<J: JsonIo>(
    json: J,
    model: &OpenApi,
    format: Format,
    config: &OasioConfig,
) -> Result<String, SerializeError> {
    let ctx = IoContext::for_json_with_config(json, config.clone());
    let root = ctx
        .definition()
        .write(model)
        .ok_or(SerializeError::NoRootNode)?;
    Ok(ctx.json().to_text(&root, format)?)
}
