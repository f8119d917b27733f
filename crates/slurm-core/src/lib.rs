pub mod errors;
pub mod openapi;
pub mod validation;
pub mod version;

pub use crate::errors::{SpecError, ValidationError};
pub use crate::openapi::{AdditionalProperties, SchemaDocument, SchemaNode, TypeDecl};
