//! Fully-qualified names of the OpenAPI annotations the readers understand.

macro_rules! openapi_annotations {
    ($($name:ident => $path:literal),+ $(,)?) => {
        $(pub const $name: &str = concat!("org.eclipse.microprofile.openapi.annotations.", $path);)+
    };
}

openapi_annotations! {
    OPENAPI_DEFINITION => "OpenAPIDefinition",
    OPERATION => "Operation",
    COMPONENTS => "Components",
    EXTERNAL_DOCUMENTATION => "ExternalDocumentation",
    CALLBACK => "callbacks.Callback",
    CALLBACKS => "callbacks.Callbacks",
    CALLBACK_OPERATION => "callbacks.CallbackOperation",
    EXTENSION => "extensions.Extension",
    EXTENSIONS => "extensions.Extensions",
    HEADER => "headers.Header",
    INFO => "info.Info",
    CONTACT => "info.Contact",
    LICENSE => "info.License",
    LINK => "links.Link",
    LINK_PARAMETER => "links.LinkParameter",
    CONTENT => "media.Content",
    DISCRIMINATOR_MAPPING => "media.DiscriminatorMapping",
    ENCODING => "media.Encoding",
    EXAMPLE_OBJECT => "media.ExampleObject",
    SCHEMA => "media.Schema",
    SCHEMA_PROPERTY => "media.SchemaProperty",
    PARAMETER => "parameters.Parameter",
    PARAMETERS => "parameters.Parameters",
    REQUEST_BODY => "parameters.RequestBody",
    API_RESPONSE => "responses.APIResponse",
    API_RESPONSES => "responses.APIResponses",
    OAUTH_FLOW => "security.OAuthFlow",
    OAUTH_FLOWS => "security.OAuthFlows",
    OAUTH_SCOPE => "security.OAuthScope",
    SECURITY_REQUIREMENT => "security.SecurityRequirement",
    SECURITY_REQUIREMENTS => "security.SecurityRequirements",
    SECURITY_REQUIREMENTS_SET => "security.SecurityRequirementsSet",
    SECURITY_REQUIREMENTS_SETS => "security.SecurityRequirementsSets",
    SECURITY_SCHEME => "security.SecurityScheme",
    SECURITY_SCHEMES => "security.SecuritySchemes",
    SERVER => "servers.Server",
    SERVERS => "servers.Servers",
    SERVER_VARIABLE => "servers.ServerVariable",
    TAG => "tags.Tag",
    TAGS => "tags.Tags",
}

pub const DEPRECATED: &str = "java.lang.Deprecated";

/// Container annotation for a repeatable annotation, if it has one.
pub fn container_of(name: &str) -> Option<&'static str> {
    let container = match name {
        API_RESPONSE => API_RESPONSES,
        CALLBACK => CALLBACKS,
        EXTENSION => EXTENSIONS,
        PARAMETER => PARAMETERS,
        SECURITY_REQUIREMENT => SECURITY_REQUIREMENTS,
        SECURITY_REQUIREMENTS_SET => SECURITY_REQUIREMENTS_SETS,
        SECURITY_SCHEME => SECURITY_SCHEMES,
        SERVER => SERVERS,
        TAG => TAGS,
        _ => return None,
    };
    Some(container)
}
