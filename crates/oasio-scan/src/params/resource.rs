use oasio_core::model::{Content, In, Parameter, SchemaNode};

use super::path;

/// Parameters and paths found for one resource method.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResourceParameters {
    /// Parameters declared on the resource class.
    pub path_item_parameters: Vec<Parameter>,
    pub operation_parameters: Vec<Parameter>,
    pub path_item_path: String,
    /// Path of the method relative to the path item.
    pub operation_path: String,
    /// Request body assembled from form parameters.
    pub form_body_content: Option<Content>,
}

impl ResourceParameters {
    /// Path item path followed by the operation path.
    pub fn full_path(&self) -> String {
        format!("{}{}", self.path_item_path, self.operation_path)
    }

    pub fn all_parameters(&self) -> Vec<&Parameter> {
        self.path_item_parameters
            .iter()
            .chain(&self.operation_parameters)
            .collect()
    }

    pub(crate) fn all_parameters_mut(&mut self) -> Vec<&mut Parameter> {
        self.path_item_parameters
            .iter_mut()
            .chain(&mut self.operation_parameters)
            .collect()
    }

    /// Schema of the first form body media type.
    pub fn form_body_schema(&self) -> Option<SchemaNode> {
        self.form_body_content
            .as_ref()?
            .media_types
            .values()
            .next()?
            .schema
            .clone()
    }

    pub fn path_parameter_template_names(&self) -> Vec<String> {
        path::template_names(&self.full_path())
    }

    /// Order both lists by position in `preferred`, then by location and name.
    pub(crate) fn sort(&mut self, preferred: &[(Option<String>, Option<In>)]) {
        let rank = |param: &Parameter| {
            preferred
                .iter()
                .position(|(name, location)| *name == param.name && *location == param.location)
                .unwrap_or(usize::MAX)
        };
        for list in [&mut self.path_item_parameters, &mut self.operation_parameters] {
            list.sort_by(|a, b| {
                rank(a)
                    .cmp(&rank(b))
                    .then_with(|| a.location.cmp(&b.location))
                    .then_with(|| a.name.cmp(&b.name))
            });
        }
    }
}
