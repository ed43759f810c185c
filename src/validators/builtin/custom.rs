//! Caller-supplied predicate validator.
//!
//! A predicate cannot be written in a JSON/YAML/TOML file, so this
//! validator is only constructible from `Parameters::with_predicate`.
//! Loading it from text fails with `FunctionNotConfigurable`.

use crate::core::dataset::Dataset;
use crate::core::error::{ParameterError, RegistryResult, ValidationError};
use crate::core::param::{ParamType, ParameterDefinition, Predicate, ResolvedParams};
use crate::core::types::Value;
use crate::core::validator::{
    collect_violations, column_values, panic_message, ConfigurableValidator, ValidationOutcome,
    Validator, ValidatorDescriptor,
};
use crate::validators::registry::ValidatorRegistry;
use std::panic::{catch_unwind, AssertUnwindSafe};

/// Register the custom function validator.
pub fn register(registry: &mut ValidatorRegistry) -> RegistryResult<()> {
    registry.register_type::<CustomFunctionValidator>()
}

#[derive(Debug, Clone)]
pub struct CustomFunctionValidator {
    predicate: Predicate,
    error_message: Option<String>,
    include_nulls: bool,
}

impl CustomFunctionValidator {
    pub fn new(predicate: Predicate) -> Self {
        Self {
            predicate,
            error_message: None,
            include_nulls: false,
        }
    }

    /// Reason recorded for rows the predicate rejects.
    pub fn with_error_message(mut self, message: impl Into<String>) -> Self {
        self.error_message = Some(message.into());
        self
    }

    /// Hand null cells to the predicate instead of failing them.
    pub fn with_include_nulls(mut self, include: bool) -> Self {
        self.include_nulls = include;
        self
    }

    fn check(&self, value: &Value) -> Result<(), String> {
        if value.is_null() && !self.include_nulls {
            return Err("Null value".to_string());
        }

        match catch_unwind(AssertUnwindSafe(|| self.predicate.call(value))) {
            Ok(true) => Ok(()),
            Ok(false) => Err(self
                .error_message
                .clone()
                .unwrap_or_else(|| "Custom validation failed".to_string())),
            Err(payload) => Err(format!(
                "Exception in validation function: {}",
                panic_message(payload.as_ref())
            )),
        }
    }
}

impl Validator for CustomFunctionValidator {
    fn name(&self) -> &str {
        "custom_function"
    }

    fn validate(&self, dataset: &Dataset, column: &str) -> Result<ValidationOutcome, ValidationError> {
        let values = column_values(dataset, column)?;
        let violations = collect_violations(values, |v| self.check(v));
        Ok(ValidationOutcome::new(
            values.len(),
            violations,
            "custom validation",
        ))
    }
}

impl ConfigurableValidator for CustomFunctionValidator {
    fn descriptor() -> ValidatorDescriptor {
        ValidatorDescriptor::builder("custom_function")
            .description("Validate values using a user-provided function")
            .parameter(
                ParameterDefinition::required("validation_func", ParamType::Function)
                    .with_description("Predicate that takes a single value and returns bool"),
            )
            .parameter(
                ParameterDefinition::optional("error_message", ParamType::String)
                    .with_description("Custom error message for failures"),
            )
            .parameter(
                ParameterDefinition::optional("include_nulls", ParamType::Boolean)
                    .with_default(false)
                    .with_description("Pass null values to the function instead of failing them"),
            )
            .tags(["custom", "function"])
            .build()
    }

    fn from_params(params: &ResolvedParams) -> Result<Self, ParameterError> {
        let predicate = params
            .predicate("validation_func")
            .cloned()
            .ok_or_else(|| ParameterError::MissingParameter {
                parameter: "validation_func".to_string(),
            })?;

        let mut validator = Self::new(predicate)
            .with_include_nulls(params.bool("include_nulls").unwrap_or(false));
        if let Some(message) = params.string("error_message") {
            validator = validator.with_error_message(message);
        }
        Ok(validator)
    }
}
