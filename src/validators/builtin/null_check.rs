//! Null presence validator.

use crate::core::dataset::Dataset;
use crate::core::error::{ParameterError, RegistryResult, ValidationError};
use crate::core::param::{ParamType, ParameterDefinition, ResolvedParams};
use crate::core::validator::{
    collect_violations, column_values, ConfigurableValidator, ValidationOutcome, Validator,
    ValidatorDescriptor,
};
use crate::validators::registry::ValidatorRegistry;

/// Register the null check validator.
pub fn register(registry: &mut ValidatorRegistry) -> RegistryResult<()> {
    registry.register_type::<NullCheckValidator>()
}

/// Checks that nulls are absent, or below a percentage threshold.
///
/// This is the only built-in rule that can pass on null cells.
#[derive(Debug, Clone, PartialEq)]
pub struct NullCheckValidator {
    allow_null: bool,
    max_null_percent: Option<f64>,
}

impl NullCheckValidator {
    /// Reject every null.
    pub fn deny_nulls() -> Self {
        Self {
            allow_null: false,
            max_null_percent: None,
        }
    }

    /// Allow nulls, optionally up to `max_null_percent` percent of rows.
    pub fn allow_nulls(max_null_percent: Option<f64>) -> Self {
        Self {
            allow_null: true,
            max_null_percent,
        }
    }
}

impl Validator for NullCheckValidator {
    fn name(&self) -> &str {
        "null_check"
    }

    fn validate(&self, dataset: &Dataset, column: &str) -> Result<ValidationOutcome, ValidationError> {
        let values = column_values(dataset, column)?;
        let total = values.len();

        let violations = if !self.allow_null {
            collect_violations(values, |v| {
                if v.is_null() {
                    Err("Null value not allowed".to_string())
                } else {
                    Ok(())
                }
            })
        } else {
            match self.max_null_percent {
                Some(limit) => {
                    let nulls = values.iter().filter(|v| v.is_null()).count();
                    let percent = if total == 0 {
                        0.0
                    } else {
                        nulls as f64 / total as f64 * 100.0
                    };

                    if percent > limit {
                        let reason =
                            format!("Null percentage {:.2}% exceeds limit {}%", percent, limit);
                        collect_violations(values, |v| {
                            if v.is_null() {
                                Err(reason.clone())
                            } else {
                                Ok(())
                            }
                        })
                    } else {
                        Vec::new()
                    }
                }
                None => Vec::new(),
            }
        };

        Ok(ValidationOutcome::new(total, violations, "null check"))
    }
}

impl ConfigurableValidator for NullCheckValidator {
    fn descriptor() -> ValidatorDescriptor {
        ValidatorDescriptor::builder("null_check")
            .description("Validate that null values are absent or within a threshold")
            .parameter(
                ParameterDefinition::optional("allow_null", ParamType::Boolean)
                    .with_default(false)
                    .with_description("Whether null values are allowed"),
            )
            .parameter(
                ParameterDefinition::optional("max_null_percent", ParamType::Float)
                    .with_range(0.0, 100.0)
                    .with_description("Maximum percentage (0-100) of nulls allowed"),
            )
            .tags(["null", "completeness"])
            .build()
    }

    fn from_params(params: &ResolvedParams) -> Result<Self, ParameterError> {
        Ok(Self {
            allow_null: params.bool("allow_null").unwrap_or(false),
            max_null_percent: params.float("max_null_percent"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::param::Parameters;
    use crate::core::types::Value;

    fn column(values: Vec<Value>) -> Dataset {
        Dataset::new().with_column("c", values).unwrap()
    }

    #[test]
    fn test_deny_nulls() {
        let dataset = column(vec![Value::Integer(1), Value::Null, Value::Float(f64::NAN)]);
        let outcome = NullCheckValidator::deny_nulls().validate(&dataset, "c").unwrap();

        let rows: Vec<usize> = outcome.violations.iter().map(|v| v.row).collect();
        assert_eq!(rows, vec![1, 2]);
        assert_eq!(outcome.violations[0].reason, "Null value not allowed");
        assert_eq!(outcome.message, "2/3 records failed null check");
    }

    #[test]
    fn test_allow_nulls_without_limit_passes() {
        let dataset = column(vec![Value::Null, Value::Null]);
        let outcome = NullCheckValidator::allow_nulls(None).validate(&dataset, "c").unwrap();
        assert!(outcome.passed());
        assert_eq!(outcome.message, "All 2 records passed");
    }

    #[test]
    fn test_within_limit_passes() {
        let dataset = column(vec![Value::Null, Value::Integer(1), Value::Integer(2), Value::Integer(3)]);
        let outcome = NullCheckValidator::allow_nulls(Some(25.0))
            .validate(&dataset, "c")
            .unwrap();
        assert!(outcome.passed());
    }

    #[test]
    fn test_exceeding_limit_flags_every_null() {
        let dataset = column(vec![Value::Null, Value::Integer(1), Value::Null, Value::Integer(3)]);
        let outcome = NullCheckValidator::allow_nulls(Some(10.0))
            .validate(&dataset, "c")
            .unwrap();

        let rows: Vec<usize> = outcome.violations.iter().map(|v| v.row).collect();
        assert_eq!(rows, vec![0, 2]);
        assert_eq!(
            outcome.violations[0].reason,
            "Null percentage 50.00% exceeds limit 10%"
        );
    }

    #[test]
    fn test_empty_column_passes() {
        let dataset = column(Vec::new());
        let outcome = NullCheckValidator::allow_nulls(Some(0.0))
            .validate(&dataset, "c")
            .unwrap();
        assert!(outcome.passed());
    }

    #[test]
    fn test_percent_out_of_range_rejected() {
        let params = Parameters::new()
            .with("allow_null", true)
            .with("max_null_percent", 150.0);
        let err = ResolvedParams::resolve(&NullCheckValidator::descriptor().parameters, &params)
            .unwrap_err();
        assert!(matches!(err, ParameterError::ConstraintViolation { .. }));
    }

    #[test]
    fn test_nan_percent_rejected() {
        let params = Parameters::new()
            .with("allow_null", true)
            .with("max_null_percent", f64::NAN);
        let err = ResolvedParams::resolve(&NullCheckValidator::descriptor().parameters, &params)
            .unwrap_err();
        assert!(matches!(err, ParameterError::ConstraintViolation { .. }));
    }

    #[test]
    fn test_defaults_deny_nulls() {
        let resolved =
            ResolvedParams::resolve(&NullCheckValidator::descriptor().parameters, &Parameters::new())
                .unwrap();
        assert_eq!(
            NullCheckValidator::from_params(&resolved).unwrap(),
            NullCheckValidator::deny_nulls()
        );
    }
}
