use std::cell::{Cell, RefCell};
use std::collections::HashSet;

use crate::annotation::AnnotationLookup;
use crate::config::OasioConfig;
use crate::json::JsonIo;
use crate::model;

use super::ModelIo;

/// Document shape selected for a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpenApiVersion {
    V3_0,
    V3_1,
}

impl OpenApiVersion {
    /// `3.0.x` selects 3.0; anything else, or nothing, selects 3.1.
    pub fn parse(version: Option<&str>) -> Self {
        match version {
            Some(v) if v.starts_with("3.0") => OpenApiVersion::V3_0,
            _ => OpenApiVersion::V3_1,
        }
    }
}

/// State shared by every reader and writer of one parse, serialize or scan
/// session.
///
/// Readers are obtained from accessor methods (`ctx.operations()`,
/// `ctx.schemas()`, ...); each is a borrowed view of the context, so nested
/// readers are wired through the context rather than through global state.
pub struct IoContext<'a, J> {
    json: J,
    version: Cell<OpenApiVersion>,
    annotations: Option<&'a dyn AnnotationLookup>,
    config: OasioConfig,
    /// Schema nodes on the current write path.
    writing: RefCell<HashSet<usize>>,
}

impl<'a, J: JsonIo> IoContext<'a, J> {
    /// Context for parsing and serializing documents only.
    pub fn for_json(json: J) -> Self {
        Self::for_json_with_config(json, OasioConfig::default())
    }

    pub fn for_json_with_config(json: J, config: OasioConfig) -> Self {
        Self {
            json,
            version: Cell::new(OpenApiVersion::parse(Some(&config.openapi_version))),
            annotations: None,
            config,
            writing: RefCell::new(HashSet::new()),
        }
    }

    /// Context for reading annotations found by a scanner.
    pub fn for_scanning(
        json: J,
        annotations: &'a dyn AnnotationLookup,
        config: OasioConfig,
    ) -> Self {
        Self {
            json,
            version: Cell::new(OpenApiVersion::parse(Some(&config.openapi_version))),
            annotations: Some(annotations),
            config,
            writing: RefCell::new(HashSet::new()),
        }
    }

    pub fn json(&self) -> &J {
        &self.json
    }

    pub fn version(&self) -> OpenApiVersion {
        self.version.get()
    }

    pub fn set_version(&self, version: OpenApiVersion) {
        self.version.set(version);
    }

    pub fn annotations(&self) -> Option<&'a dyn AnnotationLookup> {
        self.annotations
    }

    pub fn config(&self) -> &OasioConfig {
        &self.config
    }

    /// Mark a schema node as being written. `false` when it already is,
    /// which means the graph loops back to it.
    pub(crate) fn enter_schema(&self, id: usize) -> bool {
        self.writing.borrow_mut().insert(id)
    }

    pub(crate) fn leave_schema(&self, id: usize) {
        self.writing.borrow_mut().remove(&id);
    }
}

macro_rules! model_ios {
    ($($(#[$meta:meta])* $io:ident => $model:ty, $accessor:ident;)+) => {
        $(
            $(#[$meta])*
            pub struct $io<'c, J> {
                ctx: &'c IoContext<'c, J>,
            }

            impl<J: JsonIo> ModelIo<J> for $io<'_, J> {
                type Model = $model;

                fn context(&self) -> &IoContext<'_, J> {
                    self.ctx
                }
            }
        )+

        impl<J: JsonIo> IoContext<'_, J> {
            $(
                pub fn $accessor(&self) -> $io<'_, J> {
                    $io { ctx: self }
                }
            )+
        }
    };
}

model_ios! {
    /// Root document.
    OpenApiDefinitionIo => model::OpenApi, definition;
    InfoIo => model::Info, info;
    ContactIo => model::Contact, contact;
    LicenseIo => model::License, license;
    TagIo => model::Tag, tags;
    ServerIo => model::Server, servers;
    ServerVariableIo => model::ServerVariable, server_variables;
    ExternalDocumentationIo => model::ExternalDocumentation, external_docs;
    ComponentsIo => model::Components, components;
    PathsIo => model::Paths, paths;
    PathItemIo => model::PathItem, path_items;
    OperationIo => model::Operation, operations;
    /// `@CallbackOperation`, an operation bound to an HTTP method.
    CallbackOperationIo => (Option<model::HttpMethod>, model::Operation), callback_operations;
    CallbackIo => model::Callback, callbacks;
    ParameterIo => model::Parameter, parameters;
    RequestBodyIo => model::RequestBody, request_bodies;
    ApiResponsesIo => model::ApiResponses, responses;
    ApiResponseIo => model::ApiResponse, response;
    HeaderIo => model::Header, headers;
    LinkIo => model::Link, links;
    ContentIo => model::Content, content;
    MediaTypeIo => model::MediaType, media_types;
    EncodingIo => model::Encoding, encodings;
    ExampleIo => model::Example, examples;
    SchemaIo => model::SchemaNode, schemas;
    DiscriminatorIo => model::Discriminator, discriminators;
    XmlIo => model::Xml, xml;
    SecuritySchemeIo => model::SecurityScheme, security_schemes;
    OAuthFlowsIo => model::OAuthFlows, oauth_flows;
    OAuthFlowIo => model::OAuthFlow, oauth_flow;
    SecurityRequirementIo => model::SecurityRequirement, security_requirements;
    /// `x-*` properties and `@Extension` annotations.
    ExtensionIo => model::Extensions, extensions;
}
