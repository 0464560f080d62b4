//! Translation of typed parameter values into Nextflow command-line flags.

use crate::descriptor::ParamValue;
use crate::request::ExecutionRequest;
use crate::schema::ParameterSchema;

/// Tokens for a single parameter.
///
/// Unset values and `false` booleans produce nothing; `true` produces a bare
/// `--name`; every other value produces `--name <value>`.
pub fn flag_tokens(name: &str, value: Option<&ParamValue>) -> Vec<String> {
    match value {
        None | Some(ParamValue::Bool(false)) => Vec::new(),
        Some(ParamValue::Bool(true)) => vec![format!("--{}", name)],
        Some(ParamValue::File(path)) | Some(ParamValue::Directory(path)) => {
            vec![format!("--{}", name), path.clone()]
        }
        Some(other) => vec![format!("--{}", name), other.to_string()],
    }
}

/// Tokens for a whole request, in the schema's declared order.
pub fn build_flags(schema: &ParameterSchema, request: &ExecutionRequest) -> Vec<String> {
    schema
        .all()
        .flat_map(|(name, _)| flag_tokens(name, request.get(name)))
        .collect()
}
