//! Parameter descriptors and typed values.

use serde::{Deserialize, Serialize};

/// Semantic type of a pipeline parameter.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ParamType {
    /// Reference to a single file (local path or remote URI).
    File,

    /// Reference to a directory (local path or remote URI).
    Directory,

    /// Bare switch; only `true` produces a flag.
    Bool,

    /// Free-form string.
    Str,

    /// Signed integer.
    Int,
}

impl ParamType {
    /// Human-readable type name.
    pub fn name(&self) -> &'static str {
        match self {
            ParamType::File => "file",
            ParamType::Directory => "directory",
            ParamType::Bool => "boolean",
            ParamType::Str => "string",
            ParamType::Int => "integer",
        }
    }
}

impl std::fmt::Display for ParamType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A concrete parameter value.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum ParamValue {
    File(String),
    Directory(String),
    Bool(bool),
    Str(String),
    Int(i64),
}

impl ParamValue {
    /// The semantic type this value belongs to.
    pub fn param_type(&self) -> ParamType {
        match self {
            ParamValue::File(_) => ParamType::File,
            ParamValue::Directory(_) => ParamType::Directory,
            ParamValue::Bool(_) => ParamType::Bool,
            ParamValue::Str(_) => ParamType::Str,
            ParamValue::Int(_) => ParamType::Int,
        }
    }

    /// Convert a JSON value according to `param_type`.
    ///
    /// Returns `Ok(None)` for JSON `null` and `Err(found)` with the JSON kind
    /// when the value cannot represent the type.
    pub fn from_json(
        param_type: ParamType,
        value: &serde_json::Value,
    ) -> Result<Option<Self>, &'static str> {
        use serde_json::Value;

        let converted = match (param_type, value) {
            (_, Value::Null) => return Ok(None),
            (ParamType::File, Value::String(s)) => ParamValue::File(s.clone()),
            (ParamType::Directory, Value::String(s)) => ParamValue::Directory(s.clone()),
            (ParamType::Str, Value::String(s)) => ParamValue::Str(s.clone()),
            (ParamType::Bool, Value::Bool(b)) => ParamValue::Bool(*b),
            (ParamType::Int, Value::Number(n)) => match n.as_i64() {
                Some(i) => ParamValue::Int(i),
                None => return Err("non-integer number"),
            },
            (_, other) => return Err(json_kind(other)),
        };
        Ok(Some(converted))
    }
}

impl std::fmt::Display for ParamValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParamValue::File(p) | ParamValue::Directory(p) | ParamValue::Str(p) => f.write_str(p),
            ParamValue::Bool(b) => write!(f, "{}", b),
            ParamValue::Int(i) => write!(f, "{}", i),
        }
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    use serde_json::Value;
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Descriptor for one named pipeline parameter.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ParameterDescriptor {
    /// Unique key, also the Nextflow flag name.
    pub name: String,

    /// Semantic type.
    pub param_type: ParamType,

    /// Whether the parameter may be left unset.
    pub optional: bool,

    /// Default value; `None` means no default.
    pub default: Option<ParamValue>,

    /// Explicit section heading; unset parameters inherit the previous one.
    pub section_title: Option<String>,

    /// Presentation-only description.
    pub description: String,

    /// Write target rather than an input (the output directory).
    pub is_output: bool,
}

impl ParameterDescriptor {
    /// Create a required parameter with no default.
    pub fn required(name: &str, param_type: ParamType, description: &str) -> Self {
        Self {
            name: name.to_string(),
            param_type,
            optional: false,
            default: None,
            section_title: None,
            description: description.to_string(),
            is_output: false,
        }
    }

    /// Create an optional parameter with no default.
    pub fn optional(name: &str, param_type: ParamType, description: &str) -> Self {
        Self {
            optional: true,
            ..Self::required(name, param_type, description)
        }
    }

    /// Set the default value.
    pub fn with_default(mut self, value: ParamValue) -> Self {
        self.default = Some(value);
        self
    }

    /// Start a new presentation section at this parameter.
    pub fn in_section(mut self, title: &str) -> Self {
        self.section_title = Some(title.to_string());
        self
    }

    /// Mark as the output directory.
    pub fn output(mut self) -> Self {
        self.is_output = true;
        self
    }

    /// Required parameters must be supplied by the caller.
    pub fn is_required(&self) -> bool {
        !self.optional && self.default.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_json_matches_declared_type() {
        assert_eq!(
            ParamValue::from_json(ParamType::Int, &json!(100)),
            Ok(Some(ParamValue::Int(100)))
        );
        assert_eq!(
            ParamValue::from_json(ParamType::File, &json!("s3://x/samples.csv")),
            Ok(Some(ParamValue::File("s3://x/samples.csv".to_string())))
        );
        assert_eq!(ParamValue::from_json(ParamType::Bool, &json!(null)), Ok(None));
    }

    #[test]
    fn test_from_json_rejects_wrong_kind() {
        assert_eq!(
            ParamValue::from_json(ParamType::Bool, &json!("yes")),
            Err("string")
        );
        assert_eq!(
            ParamValue::from_json(ParamType::Int, &json!(1.5)),
            Err("non-integer number")
        );
    }

    #[test]
    fn test_required_vs_optional() {
        let input = ParameterDescriptor::required("input", ParamType::File, "samplesheet");
        assert!(input.is_required());

        let flag = ParameterDescriptor::optional("skip_qc", ParamType::Bool, "skip");
        assert!(!flag.is_required());
    }

    #[test]
    fn test_display_stringifies_value() {
        assert_eq!(ParamValue::Int(5).to_string(), "5");
        assert_eq!(ParamValue::Str("megahit".to_string()).to_string(), "megahit");
    }
}
