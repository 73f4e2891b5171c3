//! Whole-document parsing.
//!
//! Text is parsed into a [`SerdeJsonIo`] tree and then read through
//! [`OpenApiDefinitionIo`](crate::io::OpenApiDefinitionIo). [`parse_with`]
//! accepts any other [`JsonIo`] backing.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use ureq::Agent;

use crate::config::OasioConfig;
use crate::error::ParseError;
use crate::io::{IoContext, JsonReader};
use crate::json::{Format, JsonIo, SerdeJsonIo};
use crate::model::{OpenApi, SchemaNode};

/// Parse a document file, choosing the format from its extension.
pub fn parse_path(path: &Path, config: &OasioConfig) -> Result<OpenApi, ParseError> {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| ParseError::MissingFileName(path.display().to_string()))?;
    let format = Format::from_file_name(name)
        .ok_or_else(|| ParseError::UnknownExtension(name.to_string()))?;
    log::debug!("parsing {} as {format:?}", path.display());
    let file = File::open(path).map_err(crate::error::JsonError::from)?;
    parse_reader(BufReader::new(file), format, config)
}

/// Parse a document from a URL or a plain file path.
///
/// `http` and `https` URLs are fetched; the format comes from the last path
/// segment's extension, as it does for files.
pub fn parse_url(url: &str, config: &OasioConfig) -> Result<OpenApi, ParseError> {
    let path = match url.split_once("://") {
        Some(("file", rest)) => rest,
        Some(("http" | "https", _)) => {
            return parse_remote(&Agent::new_with_defaults(), url, config);
        }
        Some(_) => return Err(ParseError::UnsupportedUrl(url.to_string())),
        None => url.strip_prefix("file:").unwrap_or(url),
    };
    let path = strip_query(path);
    if path.is_empty() || path.ends_with('/') {
        return Err(ParseError::MissingFileName(url.to_string()));
    }
    parse_path(Path::new(path), config)
}

fn parse_remote(agent: &Agent, url: &str, config: &OasioConfig) -> Result<OpenApi, ParseError> {
    let name = url
        .split_once("://")
        .map(|(_, rest)| strip_query(rest))
        .and_then(|rest| rest.split_once('/'))
        .and_then(|(_, path)| path.rsplit('/').next())
        .filter(|name| !name.is_empty())
        .ok_or_else(|| ParseError::MissingFileName(url.to_string()))?;
    let format = Format::from_file_name(name)
        .ok_or_else(|| ParseError::UnknownExtension(name.to_string()))?;
    log::debug!("fetching {url} as {format:?}");
    let response = agent.get(url).call().map_err(|source| ParseError::Fetch {
        url: url.to_string(),
        source: Box::new(source),
    })?;
    parse_reader(response.into_body().into_reader(), format, config)
}

fn strip_query(path: &str) -> &str {
    path.split(['?', '#']).next().unwrap_or_default()
}

/// Parse a document stream in the given format.
pub fn parse_reader(
    reader: impl Read,
    format: Format,
    config: &OasioConfig,
) -> Result<OpenApi, ParseError> {
    let json = SerdeJsonIo::with_limit(config.maximum_static_file_size);
    parse_with(json, reader, format, config)
}

/// Parse document text in the given format.
pub fn parse_str(text: &str, format: Format, config: &OasioConfig) -> Result<OpenApi, ParseError> {
    let json = SerdeJsonIo::with_limit(config.maximum_static_file_size);
    let node = json.read_str(text, format)?;
    Ok(read_document(json, &node, config))
}

/// Parse a document stream through a specific JSON backing.
pub fn parse_with<J: JsonIo>(
    json: J,
    reader: impl Read,
    format: Format,
    config: &OasioConfig,
) -> Result<OpenApi, ParseError> {
    let node = json.read_reader(reader, format)?;
    Ok(read_document(json, &node, config))
}

fn read_document<J: JsonIo>(json: J, node: &J::Value, config: &OasioConfig) -> OpenApi {
    let ctx = IoContext::for_json_with_config(json, config.clone());
    ctx.definition().read_value(node).unwrap_or_else(|| {
        log::warn!("document root is not an object");
        OpenApi::default()
    })
}

/// Parse a standalone JSON schema, as supplied through configuration.
pub fn parse_schema(text: &str) -> Result<SchemaNode, ParseError> {
    let json = SerdeJsonIo::new();
    let node = json.read_str(text, Format::Json)?;
    let ctx = IoContext::for_json(json);
    Ok(ctx.schemas().read_value(&node).unwrap_or_default())
}
