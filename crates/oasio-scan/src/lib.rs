pub mod constraints;
pub mod context;
pub mod error;
pub mod jaxrs;
pub mod operation_ids;
pub mod params;

use oasio_core::annotation::names;

pub use context::ScanContext;
pub use error::ScanError;
pub use operation_ids::OperationIdRegistry;
pub use params::{ParameterProcessor, ResourceParameters};

/// Framework parameter annotations and OpenAPI `@Parameter`/`@Parameters`.
pub fn is_parameter(annotation_name: &str) -> bool {
    jaxrs::is_framework_parameter(annotation_name)
        || annotation_name == names::PARAMETER
        || annotation_name == names::PARAMETERS
}
