//! Schema module for response shape assertions
//!
//! Infers JSON schemas from example responses, pins literal values onto
//! schemas, and validates real responses against them.

pub mod envelope;
pub mod inference;
pub mod overrides;
pub mod validation;

pub use envelope::{fail_schema, ok_object_schema, ok_schema};
pub use inference::{
    infer, EnumMode, InferenceOptions, SchemaInferencer, SchemaNode, SchemaType,
    DEBUG_DEPTH_LIMIT, DEFAULT_DEPTH_LIMIT,
};
pub use overrides::{apply_enum_overrides, apply_enum_overrides_to_schema};
pub use validation::{SchemaValidator, SchemaViolation};
