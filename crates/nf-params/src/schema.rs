//! Ordered, immutable parameter registry.
//!
//! Insertion order is significant: it is the order flags are emitted on the
//! command line and the order sections are presented in.

use indexmap::IndexMap;
use serde::Serialize;

use crate::descriptor::ParameterDescriptor;
use crate::error::ParamsError;
use crate::Result;

/// Immutable registry of parameter descriptors.
#[derive(Debug, Clone, Default)]
pub struct ParameterSchema {
    params: IndexMap<String, ParameterDescriptor>,
}

/// A presentation group of parameters.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Section<'a> {
    /// Heading; `None` for parameters declared before any explicit title.
    pub title: Option<&'a str>,
    /// Parameters in declared order.
    pub params: Vec<&'a ParameterDescriptor>,
}

impl ParameterSchema {
    /// Start building a schema.
    pub fn builder() -> SchemaBuilder {
        SchemaBuilder::default()
    }

    /// Look up a descriptor by name.
    pub fn get(&self, name: &str) -> Result<&ParameterDescriptor> {
        self.params
            .get(name)
            .ok_or_else(|| ParamsError::UnknownParameter(name.to_string()))
    }

    /// Whether `name` is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.params.contains_key(name)
    }

    /// All descriptors in insertion order.
    pub fn all(&self) -> impl Iterator<Item = (&str, &ParameterDescriptor)> {
        self.params.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Names of parameters the caller must supply.
    pub fn required(&self) -> Vec<&str> {
        self.params
            .values()
            .filter(|d| d.is_required())
            .map(|d| d.name.as_str())
            .collect()
    }

    /// Group parameters by section.
    ///
    /// A parameter without a `section_title` belongs to the most recently
    /// opened section.
    pub fn sections(&self) -> Vec<Section<'_>> {
        let mut sections: Vec<Section<'_>> = Vec::new();

        for descriptor in self.params.values() {
            if descriptor.section_title.is_none() {
                if let Some(current) = sections.last_mut() {
                    current.params.push(descriptor);
                    continue;
                }
            }
            sections.push(Section {
                title: descriptor.section_title.as_deref(),
                params: vec![descriptor],
            });
        }

        sections
    }

    /// Effective section title for a parameter, following inheritance.
    pub fn section_of(&self, name: &str) -> Result<Option<&str>> {
        let index = self
            .params
            .get_index_of(name)
            .ok_or_else(|| ParamsError::UnknownParameter(name.to_string()))?;

        Ok(self
            .params
            .values()
            .take(index + 1)
            .rev()
            .find_map(|d| d.section_title.as_deref()))
    }
}

/// Builder enforcing unique names and type-consistent defaults.
#[derive(Debug, Default)]
pub struct SchemaBuilder {
    params: IndexMap<String, ParameterDescriptor>,
    error: Option<ParamsError>,
}

impl SchemaBuilder {
    /// Append a descriptor. The first error is kept and reported by `build`.
    pub fn param(mut self, descriptor: ParameterDescriptor) -> Self {
        if self.error.is_some() {
            return self;
        }

        if let Some(default) = &descriptor.default {
            if default.param_type() != descriptor.param_type {
                self.error = Some(ParamsError::TypeMismatch {
                    name: descriptor.name.clone(),
                    expected: descriptor.param_type,
                    found: default.param_type().name().to_string(),
                });
                return self;
            }
        }

        if self.params.contains_key(&descriptor.name) {
            self.error = Some(ParamsError::DuplicateParameter(descriptor.name));
            return self;
        }

        self.params.insert(descriptor.name.clone(), descriptor);
        self
    }

    pub fn build(self) -> Result<ParameterSchema> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(ParameterSchema {
                params: self.params,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{ParamType, ParamValue};

    fn sample() -> ParameterSchema {
        ParameterSchema::builder()
            .param(
                ParameterDescriptor::required("input", ParamType::File, "samplesheet")
                    .in_section("Input/output options"),
            )
            .param(ParameterDescriptor::optional("se_reads", ParamType::Bool, "single end"))
            .param(
                ParameterDescriptor::optional("skip_qc", ParamType::Bool, "skip qc")
                    .in_section("Quality control options"),
            )
            .param(ParameterDescriptor::optional("skip_fastqc", ParamType::Bool, "skip fastqc"))
            .build()
            .expect("valid schema")
    }

    #[test]
    fn test_get_unknown_parameter() {
        let schema = sample();
        assert_eq!(
            schema.get("nope").unwrap_err(),
            ParamsError::UnknownParameter("nope".to_string())
        );
        assert!(schema.get("input").is_ok());
    }

    #[test]
    fn test_all_preserves_insertion_order() {
        let schema = sample();
        let names: Vec<&str> = schema.all().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["input", "se_reads", "skip_qc", "skip_fastqc"]);
    }

    #[test]
    fn test_sections_inherit_previous_title() {
        let schema = sample();
        let sections = schema.sections();
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].title, Some("Input/output options"));
        assert_eq!(sections[0].params.len(), 2);
        assert_eq!(sections[1].title, Some("Quality control options"));
        assert_eq!(sections[1].params[1].name, "skip_fastqc");

        assert_eq!(
            schema.section_of("skip_fastqc").unwrap(),
            Some("Quality control options")
        );
    }

    #[test]
    fn test_untitled_leading_section() {
        let schema = ParameterSchema::builder()
            .param(ParameterDescriptor::optional("a", ParamType::Str, ""))
            .param(ParameterDescriptor::optional("b", ParamType::Str, "").in_section("B"))
            .build()
            .unwrap();
        let sections = schema.sections();
        assert_eq!(sections[0].title, None);
        assert_eq!(sections[1].title, Some("B"));
        assert_eq!(schema.section_of("a").unwrap(), None);
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let err = ParameterSchema::builder()
            .param(ParameterDescriptor::optional("gff", ParamType::Str, ""))
            .param(ParameterDescriptor::optional("gff", ParamType::Str, ""))
            .build()
            .unwrap_err();
        assert_eq!(err, ParamsError::DuplicateParameter("gff".to_string()));
    }

    #[test]
    fn test_default_type_checked() {
        let err = ParameterSchema::builder()
            .param(
                ParameterDescriptor::optional("bbnorm_min", ParamType::Int, "")
                    .with_default(ParamValue::Str("5".to_string())),
            )
            .build()
            .unwrap_err();
        assert!(matches!(err, ParamsError::TypeMismatch { .. }));
    }

    #[test]
    fn test_required_names() {
        assert_eq!(sample().required(), vec!["input"]);
    }
}
