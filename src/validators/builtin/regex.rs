//! Regular-expression validator.

use crate::core::dataset::Dataset;
use crate::core::error::{ParameterError, RegistryResult, ValidationError};
use crate::core::param::{Constraint, ParamType, ParameterDefinition, ResolvedParams};
use crate::core::types::Value;
use crate::core::validator::{
    collect_violations, column_values, ConfigurableValidator, ValidationOutcome, Validator,
    ValidatorDescriptor,
};
use crate::validators::registry::ValidatorRegistry;
use ::regex::{Regex, RegexBuilder};

/// Register the regex validator.
pub fn register(registry: &mut ValidatorRegistry) -> RegistryResult<()> {
    registry.register_type::<RegexValidator>()
}

/// Checks values against a regular expression.
///
/// Matching is partial by default: the pattern may match anywhere in the
/// value, so anchor it with `^...$` to constrain the whole value, or set
/// `full_match`. Non-string values are matched against their display text.
/// Nulls fail.
#[derive(Debug, Clone)]
pub struct RegexValidator {
    regex: Regex,
}

impl RegexValidator {
    /// Compile a validator for `pattern`.
    pub fn new(pattern: &str, case_sensitive: bool, full_match: bool) -> Result<Self, ParameterError> {
        let source = if full_match {
            format!("^(?:{})$", pattern)
        } else {
            pattern.to_string()
        };

        let regex = RegexBuilder::new(&source)
            .case_insensitive(!case_sensitive)
            .build()
            .map_err(|e| ParameterError::ConstraintViolation {
                parameter: "pattern".to_string(),
                error: format!("Invalid regular expression pattern: {}", e),
            })?;

        Ok(Self { regex })
    }

    /// The compiled pattern, including any full-match anchoring.
    pub fn pattern(&self) -> &str {
        self.regex.as_str()
    }

    fn check(&self, value: &Value) -> Result<(), String> {
        if value.is_null() {
            return Err("Null value cannot match pattern".to_string());
        }
        if self.regex.is_match(&value.to_text()) {
            Ok(())
        } else {
            Err("Does not match pattern".to_string())
        }
    }
}

impl Validator for RegexValidator {
    fn name(&self) -> &str {
        "regex"
    }

    fn validate(&self, dataset: &Dataset, column: &str) -> Result<ValidationOutcome, ValidationError> {
        let values = column_values(dataset, column)?;
        let violations = collect_violations(values, |v| self.check(v));
        Ok(ValidationOutcome::new(values.len(), violations, "regex validation"))
    }
}

impl ConfigurableValidator for RegexValidator {
    fn descriptor() -> ValidatorDescriptor {
        ValidatorDescriptor::builder("regex")
            .description("Validate that string values match a regular expression pattern")
            .parameter(
                ParameterDefinition::required("pattern", ParamType::String)
                    .with_constraint(Constraint::NotEmpty)
                    .with_constraint(Constraint::ValidRegex)
                    .with_description("Regular expression pattern to match"),
            )
            .parameter(
                ParameterDefinition::optional("case_sensitive", ParamType::Boolean)
                    .with_default(true)
                    .with_description("Whether the pattern is case sensitive"),
            )
            .parameter(
                ParameterDefinition::optional("full_match", ParamType::Boolean)
                    .with_default(false)
                    .with_description("Require the pattern to match the whole value"),
            )
            .tags(["text", "pattern", "format"])
            .build()
    }

    fn from_params(params: &ResolvedParams) -> Result<Self, ParameterError> {
        let pattern = params
            .string("pattern")
            .ok_or_else(|| ParameterError::MissingParameter {
                parameter: "pattern".to_string(),
            })?;

        Self::new(
            pattern,
            params.bool("case_sensitive").unwrap_or(true),
            params.bool("full_match").unwrap_or(false),
        )
    }
}
