//! Error types for nf-params

use thiserror::Error;

use crate::descriptor::ParamType;

/// Errors raised while building a schema or resolving a request against it
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParamsError {
    /// Name is not registered in the schema
    #[error("unknown parameter: {0}")]
    UnknownParameter(String),

    /// Name registered twice while building a schema
    #[error("duplicate parameter: {0}")]
    DuplicateParameter(String),

    /// Required parameter has no value and no default
    #[error("missing required parameter: {0}")]
    MissingRequired(String),

    /// Supplied value (or declared default) does not match the declared type
    #[error("parameter {name} expects {expected}, got {found}")]
    TypeMismatch {
        name: String,
        expected: ParamType,
        found: String,
    },

    /// Parameter payload could not be read
    #[error("failed to read parameters from {path}: {reason}")]
    Payload { path: String, reason: String },
}
