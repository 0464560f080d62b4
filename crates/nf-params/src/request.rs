//! Resolved parameter values for one pipeline invocation.

use std::path::Path;

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::descriptor::ParamValue;
use crate::error::ParamsError;
use crate::schema::ParameterSchema;
use crate::Result;

/// Every schema parameter mapped to its resolved value (or `None`).
///
/// Built once per run and never mutated.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ExecutionRequest {
    values: IndexMap<String, Option<ParamValue>>,
}

impl ExecutionRequest {
    /// Resolve a JSON payload against `schema`.
    ///
    /// Unsupplied parameters take their declared default. `null` means unset.
    pub fn resolve(schema: &ParameterSchema, supplied: &Map<String, Value>) -> Result<Self> {
        if let Some(unknown) = supplied.keys().find(|k| !schema.contains(k)) {
            return Err(ParamsError::UnknownParameter(unknown.clone()));
        }

        let mut values = IndexMap::with_capacity(schema.len());
        for (name, descriptor) in schema.all() {
            let value = match supplied.get(name) {
                Some(raw) => ParamValue::from_json(descriptor.param_type, raw).map_err(|found| {
                    ParamsError::TypeMismatch {
                        name: name.to_string(),
                        expected: descriptor.param_type,
                        found: found.to_string(),
                    }
                })?,
                None => descriptor.default.clone(),
            };

            if value.is_none() && !descriptor.optional {
                return Err(ParamsError::MissingRequired(name.to_string()));
            }

            values.insert(name.to_string(), value);
        }

        Ok(Self { values })
    }

    /// Resolve a JSON object read from `path`.
    pub fn from_json_file(schema: &ParameterSchema, path: &Path) -> Result<Self> {
        let payload_error = |reason: String| ParamsError::Payload {
            path: path.display().to_string(),
            reason,
        };

        let content = std::fs::read_to_string(path).map_err(|e| payload_error(e.to_string()))?;
        let value: Value =
            serde_json::from_str(&content).map_err(|e| payload_error(e.to_string()))?;

        match value {
            Value::Object(map) => Self::resolve(schema, &map),
            _ => Err(payload_error("expected a JSON object".to_string())),
        }
    }

    /// Resolved value for `name`; `None` if unset or unknown.
    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.values.get(name).and_then(Option::as_ref)
    }

    /// All entries in schema order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&ParamValue>)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_ref()))
    }
}
