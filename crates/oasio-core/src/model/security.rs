use indexmap::IndexMap;

use super::{Extensions, model_enum};

model_enum! {
    pub enum SecuritySchemeType {
        ApiKey => "apiKey",
        Http => "http",
        OAuth2 => "oauth2",
        OpenIdConnect => "openIdConnect",
        MutualTls => "mutualTLS",
    }
}

model_enum! {
    /// Location of an API key.
    pub enum SecuritySchemeIn {
        Query => "query",
        Header => "header",
        Cookie => "cookie",
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SecurityScheme {
    pub reference: Option<String>,
    pub scheme_type: Option<SecuritySchemeType>,
    pub description: Option<String>,
    /// API key name.
    pub name: Option<String>,
    pub location: Option<SecuritySchemeIn>,
    pub scheme: Option<String>,
    pub bearer_format: Option<String>,
    pub flows: Option<OAuthFlows>,
    pub open_id_connect_url: Option<String>,
    pub extensions: Option<Extensions>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct OAuthFlows {
    pub implicit: Option<OAuthFlow>,
    pub password: Option<OAuthFlow>,
    pub client_credentials: Option<OAuthFlow>,
    pub authorization_code: Option<OAuthFlow>,
    pub extensions: Option<Extensions>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct OAuthFlow {
    pub authorization_url: Option<String>,
    pub token_url: Option<String>,
    pub refresh_url: Option<String>,
    /// Scope name to description.
    pub scopes: Option<IndexMap<String, String>>,
    pub extensions: Option<Extensions>,
}

/// Scheme name to required scopes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SecurityRequirement {
    pub schemes: IndexMap<String, Vec<String>>,
}

impl SecurityRequirement {
    pub fn with(mut self, scheme: impl Into<String>, scopes: Vec<String>) -> Self {
        self.schemes.insert(scheme.into(), scopes);
        self
    }
}
