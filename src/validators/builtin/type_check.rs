//! Runtime type validator.

use crate::core::dataset::Dataset;
use crate::core::error::{ParameterError, RegistryResult, ValidationError};
use crate::core::param::{Constraint, ParamType, ParameterDefinition, ResolvedParams};
use crate::core::types::{Value, ValueKind};
use crate::core::validator::{
    collect_violations, column_values, ConfigurableValidator, ValidationOutcome, Validator,
    ValidatorDescriptor,
};
use crate::validators::registry::ValidatorRegistry;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use std::fmt;
use std::str::FromStr;

/// Register the type validator.
pub fn register(registry: &mut ValidatorRegistry) -> RegistryResult<()> {
    registry.register_type::<TypeValidator>()
}

const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// Type names accepted by `expected_type`.
const TYPE_NAMES: &[&str] = &["int", "integer", "float", "string", "bool", "boolean", "datetime"];

/// The type a column is expected to hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpectedType {
    Int,
    Float,
    String,
    Bool,
    DateTime,
}

impl ExpectedType {
    fn kind(&self) -> ValueKind {
        match self {
            ExpectedType::Int => ValueKind::Integer,
            ExpectedType::Float => ValueKind::Float,
            ExpectedType::String => ValueKind::String,
            ExpectedType::Bool => ValueKind::Boolean,
            ExpectedType::DateTime => ValueKind::DateTime,
        }
    }
}

impl FromStr for ExpectedType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "int" | "integer" => Ok(ExpectedType::Int),
            "float" => Ok(ExpectedType::Float),
            "string" => Ok(ExpectedType::String),
            "bool" | "boolean" => Ok(ExpectedType::Bool),
            "datetime" => Ok(ExpectedType::DateTime),
            other => Err(format!(
                "Unsupported expected_type '{}'. Supported types: {}",
                other,
                TYPE_NAMES.join(", ")
            )),
        }
    }
}

impl fmt::Display for ExpectedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.kind().display_name())
    }
}

/// Checks that values have, or can be read as, an expected type.
///
/// Strict mode requires the exact cell type. Lenient mode accepts values
/// that convert without loss, e.g. `"42"` or `42.0` for `int`.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeValidator {
    expected: ExpectedType,
    strict: bool,
}

impl TypeValidator {
    pub fn new(expected: ExpectedType, strict: bool) -> Self {
        Self { expected, strict }
    }

    fn check(&self, value: &Value) -> Result<(), String> {
        if value.is_null() {
            return Err("Null value".to_string());
        }
        if self.strict {
            return if value.kind() == self.expected.kind() {
                Ok(())
            } else {
                Err(format!("Expected {} but got {}", self.expected, value.kind()))
            };
        }

        let accepted = match self.expected {
            ExpectedType::Int => {
                return match value {
                    Value::Integer(_) => Ok(()),
                    Value::Float(_) | Value::String(_) => match value.as_number() {
                        Some(n) if n.is_finite() && n.fract() == 0.0 => Ok(()),
                        Some(_) => Err("Non-integer value cannot be coerced to int".to_string()),
                        None => Err(format!("Cannot coerce {} to int", value)),
                    },
                    _ => Err(format!("Expected int but got {}", value.kind())),
                };
            }
            ExpectedType::Float => {
                matches!(value, Value::Integer(_) | Value::Float(_) | Value::String(_))
                    && value.as_number().is_some()
            }
            ExpectedType::String => true,
            ExpectedType::Bool => match value {
                Value::Boolean(_) => true,
                Value::Integer(i) => *i == 0 || *i == 1,
                Value::Float(f) => *f == 0.0 || *f == 1.0,
                Value::String(s) => {
                    matches!(s.trim().to_lowercase().as_str(), "true" | "false" | "1" | "0")
                }
                _ => false,
            },
            ExpectedType::DateTime => match value {
                Value::DateTime(_) => true,
                Value::String(s) => parse_datetime(s).is_some(),
                _ => false,
            },
        };

        if accepted {
            Ok(())
        } else {
            Err(format!("Cannot coerce {} to {}", value, self.expected))
        }
    }
}

/// Parse a timestamp string in one of the accepted formats.
pub fn parse_datetime(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

impl Validator for TypeValidator {
    fn name(&self) -> &str {
        "type"
    }

    fn validate(&self, dataset: &Dataset, column: &str) -> Result<ValidationOutcome, ValidationError> {
        let values = column_values(dataset, column)?;
        let violations = collect_violations(values, |v| self.check(v));
        Ok(ValidationOutcome::new(values.len(), violations, "type validation"))
    }
}

impl ConfigurableValidator for TypeValidator {
    fn descriptor() -> ValidatorDescriptor {
        ValidatorDescriptor::builder("type")
            .description("Validate that values are of a specified type")
            .parameter(
                ParameterDefinition::required("expected_type", ParamType::String)
                    .with_constraint(Constraint::OneOf(
                        TYPE_NAMES.iter().map(|s| s.to_string()).collect(),
                    ))
                    .with_description("Expected type ('int', 'float', 'string', 'datetime', 'bool')"),
            )
            .parameter(
                ParameterDefinition::optional("strict", ParamType::Boolean)
                    .with_default(false)
                    .with_description("Whether to require exact type without conversion"),
            )
            .tags(["type", "schema"])
            .build()
    }

    fn from_params(params: &ResolvedParams) -> Result<Self, ParameterError> {
        let name = params.string("expected_type").unwrap_or_default();
        let expected = name
            .parse::<ExpectedType>()
            .map_err(|error| ParameterError::ConstraintViolation {
                parameter: "expected_type".to_string(),
                error,
            })?;

        Ok(Self::new(expected, params.bool("strict").unwrap_or(false)))
    }
}
