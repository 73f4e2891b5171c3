use std::fs;
use std::path::Path;

use serde::Deserialize;

/// Session configuration loaded from `.oasio.yaml`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OasioConfig {
    /// OpenAPI version written for annotation-read definitions; `3.0.x` selects 3.0 shapes.
    pub openapi_version: String,
    /// Upper bound on parsed document size, in code points.
    pub maximum_static_file_size: usize,
    pub duplicate_operation_id_behavior: DuplicateOperationIdBehavior,
    /// Apply bean-validation constraints to parameter schemas.
    pub bean_validation: bool,
    /// Media types for request `@Content` that names none (default `*/*`).
    pub default_consumes: Option<Vec<String>>,
    /// Media types for response `@Content` that names none (default `*/*`).
    pub default_produces: Option<Vec<String>>,
}

impl Default for OasioConfig {
    fn default() -> Self {
        Self {
            openapi_version: "3.1.0".to_string(),
            maximum_static_file_size: DEFAULT_MAXIMUM_STATIC_FILE_SIZE,
            duplicate_operation_id_behavior: DuplicateOperationIdBehavior::Warn,
            bean_validation: true,
            default_consumes: None,
            default_produces: None,
        }
    }
}

/// Default document size limit (3 Mi code points).
pub const DEFAULT_MAXIMUM_STATIC_FILE_SIZE: usize = 3 * 1024 * 1024;

/// What happens when two operations share an `operationId`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicateOperationIdBehavior {
    #[default]
    Warn,
    Fail,
}

/// Default config file name.
pub const CONFIG_FILE_NAME: &str = ".oasio.yaml";

/// Load config from a YAML file. Returns `None` if the file doesn't exist.
pub fn load_config(path: &Path) -> Result<Option<OasioConfig>, String> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)
        .map_err(|e| format!("failed to read config {}: {}", path.display(), e))?;
    let config: OasioConfig = serde_yaml_ng::from_str(&content)
        .map_err(|e| format!("failed to parse config {}: {}", path.display(), e))?;
    Ok(Some(config))
}

/// Generate the default config file content.
pub fn default_config_content() -> &'static str {
    r#"# oasio configuration
openapi_version: "3.1.0"                 # 3.0.x writes nullable and boolean exclusive bounds
maximum_static_file_size: 3145728        # code points
duplicate_operation_id_behavior: warn    # warn | fail
bean_validation: true
# default_consumes: [application/json]  # media types for unnamed request @Content
# default_produces: [application/json]  # media types for unnamed response @Content
"#
}
