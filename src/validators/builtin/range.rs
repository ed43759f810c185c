//! Numeric range validator.

use crate::core::dataset::Dataset;
use crate::core::error::{ParameterError, RegistryResult, ValidationError};
use crate::core::param::{ParamType, ParameterDefinition, ResolvedParams};
use crate::core::types::Value;
use crate::core::validator::{
    collect_violations, column_values, ConfigurableValidator, ValidationOutcome, Validator,
    ValidatorDescriptor,
};
use crate::validators::registry::ValidatorRegistry;

/// Register the range validator.
pub fn register(registry: &mut ValidatorRegistry) -> RegistryResult<()> {
    registry.register_type::<RangeValidator>()
}

/// Checks that numeric values fall within `[min_value, max_value]`,
/// or `(min_value, max_value)` when `inclusive` is false.
///
/// Either bound may be omitted. Numeric strings are evaluated as numbers;
/// booleans, datetimes, other strings and nulls fail.
#[derive(Debug, Clone, PartialEq)]
pub struct RangeValidator {
    min_value: Option<f64>,
    max_value: Option<f64>,
    inclusive: bool,
}

impl RangeValidator {
    pub fn new(min_value: Option<f64>, max_value: Option<f64>, inclusive: bool) -> Self {
        Self {
            min_value,
            max_value,
            inclusive,
        }
    }

    fn check(&self, value: &Value) -> Result<(), String> {
        if value.is_null() {
            return Err("Null value".to_string());
        }
        let number = value
            .as_number()
            .ok_or_else(|| "Value is not numeric".to_string())?;

        if let Some(min) = self.min_value {
            if self.inclusive && number < min {
                return Err(format!("Value below minimum {}", min));
            }
            if !self.inclusive && number <= min {
                return Err(format!("Value not greater than minimum {}", min));
            }
        }

        if let Some(max) = self.max_value {
            if self.inclusive && number > max {
                return Err(format!("Value above maximum {}", max));
            }
            if !self.inclusive && number >= max {
                return Err(format!("Value not less than maximum {}", max));
            }
        }

        Ok(())
    }
}

impl Validator for RangeValidator {
    fn name(&self) -> &str {
        "range"
    }

    fn validate(&self, dataset: &Dataset, column: &str) -> Result<ValidationOutcome, ValidationError> {
        let values = column_values(dataset, column)?;
        let violations = collect_violations(values, |v| self.check(v));
        Ok(ValidationOutcome::new(values.len(), violations, "range validation"))
    }
}

impl ConfigurableValidator for RangeValidator {
    fn descriptor() -> ValidatorDescriptor {
        ValidatorDescriptor::builder("range")
            .description("Validate that numeric values fall within a specified range")
            .parameter(
                ParameterDefinition::optional("min_value", ParamType::Float)
                    .with_description("Minimum allowed value (optional)"),
            )
            .parameter(
                ParameterDefinition::optional("max_value", ParamType::Float)
                    .with_description("Maximum allowed value (optional)"),
            )
            .parameter(
                ParameterDefinition::optional("inclusive", ParamType::Boolean)
                    .with_default(true)
                    .with_description("Whether range bounds are inclusive"),
            )
            .tags(["numeric", "bounds"])
            .build()
    }

    fn from_params(params: &ResolvedParams) -> Result<Self, ParameterError> {
        let min_value = params.float("min_value");
        let max_value = params.float("max_value");

        if let (Some(min), Some(max)) = (min_value, max_value) {
            if min > max {
                return Err(ParameterError::ConstraintViolation {
                    parameter: "min_value".to_string(),
                    error: format!("min_value ({}) is greater than max_value ({})", min, max),
                });
            }
        }

        Ok(Self::new(
            min_value,
            max_value,
            params.bool("inclusive").unwrap_or(true),
        ))
    }
}
