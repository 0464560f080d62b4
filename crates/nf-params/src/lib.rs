//! nf-params: typed parameter schema for wrapped Nextflow pipelines
//!
//! Declares the parameters a pipeline accepts, resolves a caller's payload
//! into an [`ExecutionRequest`], and translates it into command-line flags.
//!
//! ## Key Components
//!
//! - `ParameterSchema`: ordered, immutable registry of `ParameterDescriptor`s
//! - `ExecutionRequest`: resolved values for one run
//! - `flag_tokens` / `build_flags`: value-to-flag translation
//! - `metatdenovo`: the nf-core/metatdenovo parameter table

pub mod descriptor;
mod error;
pub mod flags;
pub mod metatdenovo;
pub mod request;
pub mod schema;

pub use descriptor::{ParamType, ParamValue, ParameterDescriptor};
pub use error::ParamsError;
pub use flags::{build_flags, flag_tokens};
pub use request::ExecutionRequest;
pub use schema::{ParameterSchema, SchemaBuilder, Section};

/// Result type for nf-params operations
pub type Result<T> = std::result::Result<T, ParamsError>;
