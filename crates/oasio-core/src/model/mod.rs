//! In-memory OpenAPI model.
//!
//! Every construct is a plain struct with optional fields; absence is `None`.
//! Schemas are shared through [`SchemaNode`] so the graph may contain cycles.

mod filter;
mod media;
mod merge;
mod openapi;
mod parameter;
mod paths;
mod reference;
mod response;
mod schema;
mod security;

use indexmap::IndexMap;

pub use filter::{OasFilter, apply_filter};
pub use media::{Content, Encoding, Example, MediaType};
pub use merge::Merge;
pub use openapi::{
    Components, Contact, ExternalDocumentation, Info, License, OpenApi, Server, ServerVariable, Tag,
};
pub use parameter::{Header, In, Parameter, RequestBody, Style};
pub use paths::{Callback, HttpMethod, Operation, PathItem, Paths};
pub use reference::{COMPONENTS_PREFIX, ReferenceType, is_simple_component_key, ref_name};
pub use response::{ApiResponse, ApiResponses, Link};
pub use schema::{AdditionalProperties, Discriminator, Schema, SchemaNode, SchemaType, Xml};
pub use security::{
    OAuthFlow, OAuthFlows, SecurityRequirement, SecurityScheme, SecuritySchemeIn,
    SecuritySchemeType,
};

/// Specification extensions (`x-*` properties) with arbitrary JSON values.
pub type Extensions = IndexMap<String, serde_json::Value>;

/// Whether a property name is a specification extension.
pub fn is_extension(name: &str) -> bool {
    name.get(..2)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("x-"))
}

/// Constructs that may be a `$ref` to a component.
pub trait Reference {
    fn reference(&self) -> Option<&str>;
    fn set_reference(&mut self, reference: Option<String>);

    fn is_reference(&self) -> bool {
        self.reference().is_some()
    }
}

macro_rules! impl_reference {
    ($($ty:ty),+ $(,)?) => {
        $(impl Reference for $ty {
            fn reference(&self) -> Option<&str> {
                self.reference.as_deref()
            }

            fn set_reference(&mut self, reference: Option<String>) {
                self.reference = reference;
            }
        })+
    };
}

impl_reference!(
    Parameter,
    RequestBody,
    Header,
    Example,
    ApiResponse,
    Link,
    Callback,
    SecurityScheme,
    PathItem,
    Schema,
);

/// Closed set of string constants with a wire spelling.
macro_rules! model_enum {
    ($(#[$meta:meta])* pub enum $name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const VALUES: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }

            /// Parse the document spelling, e.g. `spaceDelimited`.
            pub fn from_wire(text: &str) -> Option<Self> {
                Self::VALUES.iter().copied().find(|v| v.as_str() == text)
            }

            /// Parse an annotation enum constant, e.g. `SPACE_DELIMITED`.
            pub fn from_constant(constant: &str) -> Option<Self> {
                let folded: String = constant
                    .chars()
                    .filter(|c| *c != '_')
                    .collect::<String>()
                    .to_ascii_lowercase();
                Self::VALUES
                    .iter()
                    .copied()
                    .find(|v| v.as_str().to_ascii_lowercase() == folded)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

pub(crate) use model_enum;
