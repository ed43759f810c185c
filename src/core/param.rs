//! Parameter definitions and constraints for validator configuration.
//!
//! Every validator declares a parameter schema. The schema is checked once,
//! when the validator is constructed: defaults are filled in, types and
//! constraints are checked, and unknown names are rejected.

use crate::core::error::ParameterError;
use crate::core::types::Value;
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::sync::Arc;

/// Types a parameter can declare.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ParamType {
    Integer,
    Float,
    String,
    Boolean,
    /// A caller-supplied predicate; cannot come from a text configuration
    Function,
    /// Accepts any scalar
    Any,
}

/// Signature of a caller-supplied predicate.
pub type PredicateFn = dyn Fn(&Value) -> bool + Send + Sync;

/// A named predicate over a single cell value.
#[derive(Clone)]
pub struct Predicate {
    name: String,
    func: Arc<PredicateFn>,
}

/// A parameter value: either a scalar or a predicate.
///
/// Only the scalar form can be deserialized; predicates are attached with
/// [`Parameters::with_predicate`].
#[derive(Debug, Clone)]
pub enum ParamValue {
    Value(Value),
    Function(Predicate),
}

/// Ordered parameter mapping for one validation specification.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Parameters(IndexMap<String, ParamValue>);

/// Constraints that can be applied to parameter values.
#[derive(Debug, Clone, PartialEq)]
pub enum Constraint {
    /// Numeric value must be within range [min, max]
    Range { min: f64, max: f64 },
    /// String must not be empty
    NotEmpty,
    /// String must compile as a regular expression
    ValidRegex,
    /// String must be one of the options (case-insensitive)
    OneOf(Vec<String>),
}

/// Definition of a validator parameter.
#[derive(Debug, Clone)]
pub struct ParameterDefinition {
    /// Unique name within the validator
    pub name: String,
    /// Type of the parameter
    pub param_type: ParamType,
    /// Whether the caller must supply a value
    pub required: bool,
    /// Value used when the caller omits the parameter
    pub default_value: Option<Value>,
    /// Description for documentation
    pub description: String,
    /// Constraints for validation
    pub constraints: Vec<Constraint>,
}

/// Parameters after schema resolution.
#[derive(Debug, Clone, Default)]
pub struct ResolvedParams {
    values: IndexMap<String, ParamValue>,
}

// ============================================================================
// ParamType Implementation
// ============================================================================

impl ParamType {
    /// Check if a parameter value matches this type.
    pub fn matches(&self, value: &ParamValue) -> bool {
        match (self, value) {
            (ParamType::Function, ParamValue::Function(_)) => true,
            (_, ParamValue::Function(_)) => false,
            (ParamType::Any, ParamValue::Value(_)) => true,
            (ParamType::Integer, ParamValue::Value(Value::Integer(_))) => true,
            // Integer can be used where float is expected
            (ParamType::Float, ParamValue::Value(Value::Integer(_) | Value::Float(_))) => true,
            (ParamType::String, ParamValue::Value(Value::String(_))) => true,
            (ParamType::Boolean, ParamValue::Value(Value::Boolean(_))) => true,
            _ => false,
        }
    }

    /// Get a human-readable name for this type.
    pub fn display_name(&self) -> &'static str {
        match self {
            ParamType::Integer => "int",
            ParamType::Float => "float",
            ParamType::String => "string",
            ParamType::Boolean => "bool",
            ParamType::Function => "function",
            ParamType::Any => "any",
        }
    }
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

// ============================================================================
// Predicate / ParamValue
// ============================================================================

impl Predicate {
    /// Wrap a closure as a named predicate.
    pub fn new<F>(name: impl Into<String>, func: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            func: Arc::new(func),
        }
    }

    /// Name used in reports.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Evaluate the predicate.
    pub fn call(&self, value: &Value) -> bool {
        (self.func)(value)
    }
}

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Predicate")
            .field("name", &self.name)
            .field("func", &"<closure>")
            .finish()
    }
}

impl ParamValue {
    /// Short type name used in error messages.
    pub fn type_name(&self) -> String {
        match self {
            ParamValue::Value(v) => v.kind().to_string(),
            ParamValue::Function(_) => "function".to_string(),
        }
    }

    /// Get the scalar, if this is one.
    pub fn as_value(&self) -> Option<&Value> {
        match self {
            ParamValue::Value(v) => Some(v),
            ParamValue::Function(_) => None,
        }
    }

    fn is_null(&self) -> bool {
        matches!(self, ParamValue::Value(Value::Null))
    }
}

impl Serialize for ParamValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ParamValue::Value(v) => v.serialize(serializer),
            ParamValue::Function(p) => serializer.serialize_str(&format!("<function {}>", p.name)),
        }
    }
}

impl<'de> Deserialize<'de> for ParamValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(ParamValue::Value)
    }
}

impl From<Value> for ParamValue {
    fn from(value: Value) -> Self {
        ParamValue::Value(value)
    }
}

impl From<Predicate> for ParamValue {
    fn from(predicate: Predicate) -> Self {
        ParamValue::Function(predicate)
    }
}

// ============================================================================
// Parameters
// ============================================================================

impl Parameters {
    /// Create an empty parameter mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a scalar parameter.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(name.into(), ParamValue::Value(value.into()));
        self
    }

    /// Add a predicate parameter.
    pub fn with_predicate(mut self, name: impl Into<String>, predicate: Predicate) -> Self {
        self.0.insert(name.into(), ParamValue::Function(predicate));
        self
    }

    /// Insert a parameter value.
    pub fn insert(&mut self, name: impl Into<String>, value: ParamValue) {
        self.0.insert(name.into(), value);
    }

    /// Get a parameter by name.
    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.0.get(name)
    }

    /// Check if a parameter is set.
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// Iterate parameters in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of parameters.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if no parameters are set.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, ParamValue)> for Parameters {
    fn from_iter<I: IntoIterator<Item = (String, ParamValue)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

// ============================================================================
// ParameterDefinition Builder Pattern
// ============================================================================

impl ParameterDefinition {
    /// Create a required parameter definition.
    pub fn required(name: impl Into<String>, param_type: ParamType) -> Self {
        Self {
            name: name.into(),
            param_type,
            required: true,
            default_value: None,
            description: String::new(),
            constraints: Vec::new(),
        }
    }

    /// Create an optional parameter definition.
    pub fn optional(name: impl Into<String>, param_type: ParamType) -> Self {
        Self {
            required: false,
            ..Self::required(name, param_type)
        }
    }

    /// Set the default value.
    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Add a range constraint.
    pub fn with_range(mut self, min: f64, max: f64) -> Self {
        self.constraints.push(Constraint::Range { min, max });
        self
    }

    /// Add a constraint.
    pub fn with_constraint(mut self, constraint: Constraint) -> Self {
        self.constraints.push(constraint);
        self
    }

    /// Validate a value against this parameter's type and constraints.
    pub fn validate(&self, value: &ParamValue) -> Result<(), ParameterError> {
        if self.param_type == ParamType::Function && !matches!(value, ParamValue::Function(_)) {
            return Err(ParameterError::FunctionNotConfigurable {
                parameter: self.name.clone(),
            });
        }

        if !self.param_type.matches(value) {
            return Err(ParameterError::TypeMismatch {
                parameter: self.name.clone(),
                expected: self.param_type,
                got: value.type_name(),
            });
        }

        if let ParamValue::Value(Value::Float(f)) = value {
            if !f.is_finite() {
                return Err(ParameterError::ConstraintViolation {
                    parameter: self.name.clone(),
                    error: format!("Value {} must be a finite number", f),
                });
            }
        }

        if let ParamValue::Value(scalar) = value {
            for constraint in &self.constraints {
                constraint
                    .validate(scalar)
                    .map_err(|error| ParameterError::ConstraintViolation {
                        parameter: self.name.clone(),
                        error,
                    })?;
            }
        }

        Ok(())
    }
}

// ============================================================================
// Constraint Validation
// ============================================================================

impl Constraint {
    /// Validate a value against this constraint.
    pub fn validate(&self, value: &Value) -> Result<(), String> {
        match self {
            Constraint::Range { min, max } => {
                if let Some(num) = value.as_float() {
                    if !(*min..=*max).contains(&num) {
                        return Err(format!("Value {} is out of range [{}, {}]", num, min, max));
                    }
                }
            }

            Constraint::NotEmpty => {
                if let Value::String(s) = value {
                    if s.is_empty() {
                        return Err("Value cannot be empty".to_string());
                    }
                }
            }

            Constraint::ValidRegex => {
                if let Value::String(s) = value {
                    regex::Regex::new(s)
                        .map_err(|e| format!("Invalid regular expression pattern: {}", e))?;
                }
            }

            Constraint::OneOf(options) => {
                if let Value::String(s) = value {
                    let wanted = s.to_lowercase();
                    if !options.iter().any(|opt| opt.to_lowercase() == wanted) {
                        return Err(format!(
                            "'{}' is not one of: {}",
                            s,
                            options.join(", ")
                        ));
                    }
                }
            }
        }

        Ok(())
    }

    /// Get a human-readable description of this constraint.
    pub fn description(&self) -> String {
        match self {
            Constraint::Range { min, max } => format!("Must be between {} and {}", min, max),
            Constraint::NotEmpty => "Cannot be empty".to_string(),
            Constraint::ValidRegex => "Must be a valid regular expression".to_string(),
            Constraint::OneOf(options) => format!("One of: {}", options.join(", ")),
        }
    }
}

// ============================================================================
// Schema Resolution
// ============================================================================

impl ResolvedParams {
    /// Check `params` against `schema`, filling defaults.
    ///
    /// Explicit nulls count as omitted. Names not in the schema are rejected
    /// after every declared parameter has been checked.
    pub fn resolve(
        schema: &[ParameterDefinition],
        params: &Parameters,
    ) -> Result<Self, ParameterError> {
        let mut values = IndexMap::new();

        for def in schema {
            match params.get(&def.name).filter(|v| !v.is_null()) {
                Some(value) => {
                    def.validate(value)?;
                    values.insert(def.name.clone(), value.clone());
                }
                None if def.required => {
                    return Err(ParameterError::MissingParameter {
                        parameter: def.name.clone(),
                    });
                }
                None => {
                    if let Some(default) = &def.default_value {
                        values.insert(def.name.clone(), ParamValue::Value(default.clone()));
                    }
                }
            }
        }

        if let Some((unknown, _)) = params
            .iter()
            .find(|(name, _)| !schema.iter().any(|d| d.name == *name))
        {
            return Err(ParameterError::UnknownParameter {
                parameter: unknown.to_string(),
            });
        }

        Ok(Self { values })
    }

    /// Get a resolved value by name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name).and_then(|v| v.as_value())
    }

    /// Get a parameter as a float.
    pub fn float(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(|v| v.as_float())
    }

    /// Get a parameter as a boolean.
    pub fn bool(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(|v| v.as_bool())
    }

    /// Get a parameter as a string.
    pub fn string(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(|v| v.as_str())
    }

    /// Get a predicate parameter.
    pub fn predicate(&self, name: &str) -> Option<&Predicate> {
        match self.values.get(name) {
            Some(ParamValue::Function(p)) => Some(p),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema() -> Vec<ParameterDefinition> {
        vec![
            ParameterDefinition::optional("min_value", ParamType::Float),
            ParameterDefinition::optional("inclusive", ParamType::Boolean).with_default(true),
            ParameterDefinition::required("pattern", ParamType::String)
                .with_constraint(Constraint::ValidRegex),
        ]
    }

    #[test]
    fn test_defaults_are_filled() {
        let params = Parameters::new().with("pattern", "^a");
        let resolved = ResolvedParams::resolve(&schema(), &params).unwrap();

        assert_eq!(resolved.bool("inclusive"), Some(true));
        assert_eq!(resolved.float("min_value"), None);
        assert_eq!(resolved.string("pattern"), Some("^a"));
    }

    #[test]
    fn test_integer_accepted_for_float() {
        let params = Parameters::new().with("pattern", "x").with("min_value", 3);
        let resolved = ResolvedParams::resolve(&schema(), &params).unwrap();
        assert_eq!(resolved.float("min_value"), Some(3.0));
    }

    #[test]
    fn test_type_mismatch() {
        let params = Parameters::new().with("pattern", "x").with("min_value", "abc");
        let err = ResolvedParams::resolve(&schema(), &params).unwrap_err();
        assert!(matches!(
            err,
            ParameterError::TypeMismatch { ref parameter, expected: ParamType::Float, .. } if parameter == "min_value"
        ));
    }

    #[test]
    fn test_missing_required() {
        let err = ResolvedParams::resolve(&schema(), &Parameters::new()).unwrap_err();
        assert_eq!(
            err,
            ParameterError::MissingParameter {
                parameter: "pattern".to_string()
            }
        );
    }

    #[test]
    fn test_explicit_null_counts_as_missing() {
        let params = Parameters::new().with("pattern", Value::Null);
        let err = ResolvedParams::resolve(&schema(), &params).unwrap_err();
        assert!(matches!(err, ParameterError::MissingParameter { .. }));
    }

    #[test]
    fn test_unknown_parameter() {
        let params = Parameters::new().with("pattern", "x").with("colour", "red");
        let err = ResolvedParams::resolve(&schema(), &params).unwrap_err();
        assert_eq!(
            err,
            ParameterError::UnknownParameter {
                parameter: "colour".to_string()
            }
        );
    }

    #[test]
    fn test_invalid_regex_constraint() {
        let params = Parameters::new().with("pattern", "([a-z");
        let err = ResolvedParams::resolve(&schema(), &params).unwrap_err();
        assert!(matches!(err, ParameterError::ConstraintViolation { .. }));
    }

    #[test]
    fn test_function_parameter_from_text() {
        let def = ParameterDefinition::required("validation_func", ParamType::Function);
        let err = def.validate(&ParamValue::from(Value::from("lambda x: x"))).unwrap_err();
        assert!(matches!(err, ParameterError::FunctionNotConfigurable { .. }));

        let predicate = ParamValue::Function(Predicate::new("positive", |v| {
            v.as_float().map_or(false, |f| f > 0.0)
        }));
        assert!(def.validate(&predicate).is_ok());
    }

    #[test]
    fn test_constraint_range_validation() {
        let constraint = Constraint::Range { min: 0.0, max: 100.0 };

        assert!(constraint.validate(&Value::Float(50.0)).is_ok());
        assert!(constraint.validate(&Value::Integer(100)).is_ok());
        assert!(constraint.validate(&Value::Float(-1.0)).is_err());
        assert!(constraint.validate(&Value::Float(100.5)).is_err());
        assert!(constraint.validate(&Value::Float(f64::NAN)).is_err());
    }

    #[test]
    fn test_non_finite_float_rejected() {
        let def = ParameterDefinition::optional("limit", ParamType::Float);

        for bad in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let err = def.validate(&ParamValue::Value(Value::Float(bad))).unwrap_err();
            assert!(matches!(
                err,
                ParameterError::ConstraintViolation { ref parameter, .. } if parameter == "limit"
            ));
        }
        assert!(def.validate(&ParamValue::Value(Value::Float(1.5))).is_ok());
    }

    #[test]
    fn test_one_of_is_case_insensitive() {
        let constraint = Constraint::OneOf(vec!["int".to_string(), "float".to_string()]);
        assert!(constraint.validate(&Value::from("INT")).is_ok());
        assert!(constraint.validate(&Value::from("complex")).is_err());
    }

    #[test]
    fn test_parameters_deserialize_scalars() {
        let params: Parameters =
            serde_json::from_str(r#"{"min_value": 0, "max_value": 1.5, "inclusive": false}"#)
                .unwrap();
        assert_eq!(params.len(), 3);
        assert_eq!(
            params.get("max_value").and_then(|v| v.as_value()),
            Some(&Value::Float(1.5))
        );
        assert_eq!(params.iter().next().map(|(k, _)| k), Some("min_value"));
    }
}
