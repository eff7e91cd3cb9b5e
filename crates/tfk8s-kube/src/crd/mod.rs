//! CRD (CustomResourceDefinition) handling
//!
//! - **Schema representation** (`schema`): structured types for CRD schemas
//! - **Parsing** (`parser`): parse CRD YAML into schema structures

pub mod parser;
pub mod schema;

pub use parser::CrdParser;
pub use schema::{
    AdditionalProperties, CrdNames, CrdSchema, CrdScope, CrdVersionSchema, OpenApiSchema,
    PropertyType, SchemaProperty,
};
