//! Validator trait and validator descriptors.
//!
//! The Validator trait is the capability contract for every column rule.
//! It uses a two-phase design:
//!
//! 1. **Construction** (`ConfigurableValidator::from_params`): called once
//!    with parameters that have already passed the descriptor's schema.
//!    Anything still wrong with them is a `ParameterError` here, never later.
//!
//! 2. **Validation** (`Validator::validate`): called once per pipeline run
//!    against a read-only dataset.

use crate::core::dataset::Dataset;
use crate::core::error::{ParameterError, ValidationError};
use crate::core::param::{ParamType, ParameterDefinition, ResolvedParams};
use crate::core::types::Value;
use serde::{Deserialize, Serialize};
use std::any::Any;

/// Metadata describing a validator type.
///
/// Held by the registry; never mutated after registration.
#[derive(Debug, Clone)]
pub struct ValidatorDescriptor {
    /// Unique name used in configurations (e.g., "range")
    pub name: String,
    /// Detailed description
    pub description: String,
    /// Parameter schema
    pub parameters: Vec<ParameterDefinition>,
    /// Searchable tags
    pub tags: Vec<String>,
}

impl ValidatorDescriptor {
    /// Create a new descriptor builder.
    pub fn builder(name: impl Into<String>) -> ValidatorDescriptorBuilder {
        ValidatorDescriptorBuilder::new(name)
    }

    /// Get all parameter names.
    pub fn parameter_names(&self) -> Vec<&str> {
        self.parameters.iter().map(|p| p.name.as_str()).collect()
    }

    /// Whether a text configuration can construct this validator.
    ///
    /// False when a required parameter takes a function.
    pub fn config_constructible(&self) -> bool {
        !self
            .parameters
            .iter()
            .any(|p| p.required && p.param_type == ParamType::Function)
    }
}

/// Builder for ValidatorDescriptor.
pub struct ValidatorDescriptorBuilder {
    name: String,
    description: String,
    parameters: Vec<ParameterDefinition>,
    tags: Vec<String>,
}

impl ValidatorDescriptorBuilder {
    /// Create a new builder with the required name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            parameters: Vec::new(),
            tags: Vec::new(),
        }
    }

    /// Set the description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Add a parameter.
    pub fn parameter(mut self, param: ParameterDefinition) -> Self {
        self.parameters.push(param);
        self
    }

    /// Add multiple tags.
    pub fn tags(mut self, tags: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.tags.extend(tags.into_iter().map(|t| t.into()));
        self
    }

    /// Build the descriptor.
    pub fn build(self) -> ValidatorDescriptor {
        ValidatorDescriptor {
            name: self.name,
            description: self.description,
            parameters: self.parameters,
            tags: self.tags,
        }
    }
}

/// A single row that failed a validator's predicate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Violation {
    /// Zero-based row index
    pub row: usize,
    /// The offending cell value
    pub value: Value,
    /// Why the value failed
    pub reason: String,
}

/// What a validator reports for one column.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationOutcome {
    /// Rows examined
    pub total_records: usize,
    /// Failing rows in ascending row order
    pub violations: Vec<Violation>,
    /// Human-readable summary
    pub message: String,
}

impl ValidationOutcome {
    /// Build an outcome from the collected violations.
    ///
    /// `rule` names the check in the failure message (e.g., "range validation").
    pub fn new(total_records: usize, violations: Vec<Violation>, rule: &str) -> Self {
        let message = if violations.is_empty() {
            format!("All {} records passed", total_records)
        } else {
            format!("{}/{} records failed {}", violations.len(), total_records, rule)
        };
        Self {
            total_records,
            violations,
            message,
        }
    }

    /// True when no row failed.
    pub fn passed(&self) -> bool {
        self.violations.is_empty()
    }
}

/// The core trait for column validators.
///
/// # Thread Safety
///
/// `Send + Sync` bounds let independent pipeline runs share nothing but
/// still move validators across worker threads.
///
/// Implementations must not mutate the dataset and must keep no state
/// between calls.
pub trait Validator: Send + Sync {
    /// Registered name of this validator.
    fn name(&self) -> &str;

    /// Validate one column of `dataset`.
    ///
    /// Returns `ValidationError::MissingColumn` when `column` is absent.
    fn validate(&self, dataset: &Dataset, column: &str) -> Result<ValidationOutcome, ValidationError>;
}

/// A validator that can be built from a parameter mapping.
///
/// The registry resolves the descriptor's schema before calling
/// `from_params`, so implementations only check cross-parameter rules
/// (e.g. `min_value <= max_value`) and compile what needs compiling.
pub trait ConfigurableValidator: Validator + Sized + 'static {
    /// Describe this validator type.
    fn descriptor() -> ValidatorDescriptor;

    /// Construct a configured instance.
    fn from_params(params: &ResolvedParams) -> Result<Self, ParameterError>;
}

/// Look up a column or fail with `MissingColumn`.
pub fn column_values<'a>(dataset: &'a Dataset, column: &str) -> Result<&'a [Value], ValidationError> {
    dataset
        .column(column)
        .ok_or_else(|| ValidationError::MissingColumn {
            column: column.to_string(),
        })
}

/// Run `check` on every cell, collecting a violation per failing row.
pub fn collect_violations<F>(values: &[Value], mut check: F) -> Vec<Violation>
where
    F: FnMut(&Value) -> Result<(), String>,
{
    values
        .iter()
        .enumerate()
        .filter_map(|(row, value)| {
            check(value).err().map(|reason| Violation {
                row,
                value: value.clone(),
                reason,
            })
        })
        .collect()
}

/// Text of a caught panic payload.
pub fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
