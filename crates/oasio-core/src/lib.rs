pub mod annotation;
pub mod config;
pub mod error;
pub mod io;
pub mod json;
pub mod model;
pub mod parser;
pub mod serializer;

pub use config::OasioConfig;
pub use io::{IoContext, OpenApiVersion};
pub use json::Format;
pub use parser::{parse_path, parse_reader, parse_schema, parse_str, parse_url};
pub use serializer::serialize;
