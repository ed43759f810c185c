//! Pipeline configuration.
//!
//! A configuration is plain data: an ordered list of
//! `{column, validator, params}` entries. Validator names and parameter
//! values are checked when a pipeline is built from it, not here.

pub mod loader;

pub use loader::{load_config, parse_config, ConfigFormat};

use crate::core::param::Parameters;
use serde::{Deserialize, Serialize};

/// One rule to run: a validator applied to a column.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationSpec {
    /// Column to check
    pub column: String,
    /// Registered validator name
    pub validator: String,
    /// Validator parameters
    #[serde(default)]
    pub params: Parameters,
}

impl ValidationSpec {
    pub fn new(column: impl Into<String>, validator: impl Into<String>, params: Parameters) -> Self {
        Self {
            column: column.into(),
            validator: validator.into(),
            params,
        }
    }
}

/// Ordered validation specifications.
///
/// Entry order is execution order and report order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub validations: Vec<ValidationSpec>,
}

impl PipelineConfig {
    pub fn new(validations: Vec<ValidationSpec>) -> Self {
        Self { validations }
    }

    /// Start building a configuration in code.
    ///
    /// This is the only way to attach predicates for `custom_function`.
    pub fn builder() -> PipelineConfigBuilder {
        PipelineConfigBuilder::default()
    }

    pub fn len(&self) -> usize {
        self.validations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.validations.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ValidationSpec> {
        self.validations.iter()
    }

    /// Serialize to JSON string.
    ///
    /// Predicates are written as `"<function name>"` and cannot be read back.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Builder for PipelineConfig.
#[derive(Default)]
pub struct PipelineConfigBuilder {
    validations: Vec<ValidationSpec>,
}

impl PipelineConfigBuilder {
    /// Append a validation.
    pub fn add(
        mut self,
        column: impl Into<String>,
        validator: impl Into<String>,
        params: Parameters,
    ) -> Self {
        self.validations
            .push(ValidationSpec::new(column, validator, params));
        self
    }

    /// Append a prepared specification.
    pub fn spec(mut self, spec: ValidationSpec) -> Self {
        self.validations.push(spec);
        self
    }

    pub fn build(self) -> PipelineConfig {
        PipelineConfig::new(self.validations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_preserves_order() {
        let config = PipelineConfig::builder()
            .add("age", "range", Parameters::new().with("min_value", 0))
            .add("email", "regex", Parameters::new().with("pattern", "@"))
            .spec(ValidationSpec::new("id", "null_check", Parameters::new()))
            .build();

        let columns: Vec<&str> = config.iter().map(|s| s.column.as_str()).collect();
        assert_eq!(columns, vec!["age", "email", "id"]);
        assert_eq!(config.len(), 3);
    }

    #[test]
    fn test_json_round_trip_of_scalars() {
        let config = PipelineConfig::builder()
            .add("age", "range", Parameters::new().with("max_value", 120))
            .build();
        let json = config.to_json().unwrap();
        assert!(json.contains("\"max_value\": 120"));

        let back: PipelineConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.validations[0].validator, "range");
    }
}
