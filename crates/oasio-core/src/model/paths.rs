use indexmap::IndexMap;

use super::{
    ApiResponses, Extensions, ExternalDocumentation, Parameter, RequestBody, SecurityRequirement,
    Server, model_enum,
};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Paths {
    pub path_items: IndexMap<String, PathItem>,
    pub extensions: Option<Extensions>,
}

model_enum! {
    /// HTTP methods in the order operations are written.
    pub enum HttpMethod {
        Get => "get",
        Put => "put",
        Post => "post",
        Delete => "delete",
        Options => "options",
        Head => "head",
        Patch => "patch",
        Trace => "trace",
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PathItem {
    pub reference: Option<String>,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub get: Option<Operation>,
    pub put: Option<Operation>,
    pub post: Option<Operation>,
    pub delete: Option<Operation>,
    pub options: Option<Operation>,
    pub head: Option<Operation>,
    pub patch: Option<Operation>,
    pub trace: Option<Operation>,
    pub servers: Option<Vec<Server>>,
    pub parameters: Option<Vec<Parameter>>,
    pub extensions: Option<Extensions>,
}

impl PathItem {
    pub fn operation(&self, method: HttpMethod) -> Option<&Operation> {
        match method {
            HttpMethod::Get => self.get.as_ref(),
            HttpMethod::Put => self.put.as_ref(),
            HttpMethod::Post => self.post.as_ref(),
            HttpMethod::Delete => self.delete.as_ref(),
            HttpMethod::Options => self.options.as_ref(),
            HttpMethod::Head => self.head.as_ref(),
            HttpMethod::Patch => self.patch.as_ref(),
            HttpMethod::Trace => self.trace.as_ref(),
        }
    }

    pub fn operation_mut(&mut self, method: HttpMethod) -> &mut Option<Operation> {
        match method {
            HttpMethod::Get => &mut self.get,
            HttpMethod::Put => &mut self.put,
            HttpMethod::Post => &mut self.post,
            HttpMethod::Delete => &mut self.delete,
            HttpMethod::Options => &mut self.options,
            HttpMethod::Head => &mut self.head,
            HttpMethod::Patch => &mut self.patch,
            HttpMethod::Trace => &mut self.trace,
        }
    }

    /// Present operations in write order.
    pub fn operations(&self) -> impl Iterator<Item = (HttpMethod, &Operation)> {
        HttpMethod::VALUES
            .iter()
            .filter_map(|m| self.operation(*m).map(|op| (*m, op)))
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Operation {
    pub tags: Option<Vec<String>>,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub external_docs: Option<ExternalDocumentation>,
    pub operation_id: Option<String>,
    pub parameters: Option<Vec<Parameter>>,
    pub request_body: Option<RequestBody>,
    pub responses: Option<ApiResponses>,
    pub callbacks: Option<IndexMap<String, Callback>>,
    pub deprecated: Option<bool>,
    pub security: Option<Vec<SecurityRequirement>>,
    pub servers: Option<Vec<Server>>,
    pub extensions: Option<Extensions>,
}

/// Runtime expression to path item map.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Callback {
    pub reference: Option<String>,
    pub path_items: IndexMap<String, PathItem>,
    pub extensions: Option<Extensions>,
}
