use oasio_core::OasioConfig;
use oasio_core::annotation::ClassIndex;
use oasio_core::io::AnnotationModels;
use oasio_core::model::Components;

use crate::constraints::{BeanValidationScanner, ConstraintScanner};

/// Everything one scan pass reads: the class index, the annotation model
/// readers, configuration and the media types of the current request.
pub struct ScanContext<'a> {
    pub index: &'a ClassIndex,
    pub models: &'a dyn AnnotationModels,
    pub config: &'a OasioConfig,
    /// Components known so far, used to type `$ref` parameter schemas.
    pub components: Option<&'a Components>,
    /// `@Consumes` media types of the resource method being scanned.
    pub consumes: Option<Vec<String>>,
    pub constraints: Box<dyn ConstraintScanner + 'a>,
}

impl<'a> ScanContext<'a> {
    pub fn new(
        index: &'a ClassIndex,
        models: &'a dyn AnnotationModels,
        config: &'a OasioConfig,
    ) -> Self {
        Self {
            index,
            models,
            config,
            components: None,
            consumes: None,
            constraints: Box::new(BeanValidationScanner),
        }
    }

    pub fn with_components(mut self, components: &'a Components) -> Self {
        self.components = Some(components);
        self
    }

    pub fn with_consumes(mut self, consumes: Vec<String>) -> Self {
        self.consumes = Some(consumes);
        self
    }

    pub fn with_constraints(mut self, constraints: impl ConstraintScanner + 'a) -> Self {
        self.constraints = Box::new(constraints);
        self
    }
}
