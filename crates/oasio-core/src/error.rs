use thiserror::Error;

#[derive(Debug, Error)]
pub enum JsonError {
    #[error("failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    #[error("failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to read document: {0}")]
    Io(#[from] std::io::Error),

    #[error("document exceeds the maximum size of {limit} code points")]
    TooLarge { limit: usize },
}

#[derive(Debug, Error)]
pub enum ParseError {
    #[error(transparent)]
    Json(#[from] JsonError),

    #[error("unable to determine format from extension: {0}")]
    UnknownExtension(String),

    #[error("unable to determine file name from: {0}")]
    MissingFileName(String),

    #[error("only file and http(s) URLs can be parsed: {0}")]
    UnsupportedUrl(String),

    #[error("failed to fetch {url}: {source}")]
    Fetch {
        url: String,
        source: Box<ureq::Error>,
    },
}

#[derive(Debug, Error)]
pub enum SerializeError {
    #[error(transparent)]
    Json(#[from] JsonError),

    #[error("OpenAPI model did not produce a root node; is `openapi` set?")]
    NoRootNode,
}
