//! # Colguard - Column-level Dataset Validation
//!
//! Colguard checks tabular datasets against a declarative list of
//! column rules and produces a structured pass/fail report.
//!
//! ## Features
//!
//! - **Declarative Pipelines**: Rules are `{column, validator, params}` entries loaded from JSON, YAML or TOML, or built in code
//! - **Eager Configuration Checks**: Unknown validators and bad parameters fail before any rule runs
//! - **Fault Isolation**: A missing column or a panicking rule becomes a failed result, never an aborted run
//! - **Extensible**: Add rules by implementing the `Validator` trait and registering them
//! - **Parallel Batches**: Validate many datasets at once with independent pipelines
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use colguard::prelude::*;
//!
//! let dataset = Dataset::new()
//!     .with_column("age", [30, 121])?
//!     .with_column("email", ["a@b.com", "not-an-email"])?;
//!
//! let config = PipelineConfig::builder()
//!     .add("age", "range", Parameters::new().with("min_value", 0).with("max_value", 120))
//!     .add("email", "regex", Parameters::new().with("pattern", r"^[^@]+@[^@]+\.[a-z]{2,}$"))
//!     .build();
//!
//! let mut pipeline = ValidationPipeline::new(&config)?;
//! let summary = pipeline.run(&dataset)?;
//! println!("{}", summary.render_text());
//! ```
//!
//! ## Architecture
//!
//! - [`core`]: Values, datasets, parameter schemas, the validator trait, results and errors
//! - [`validators`]: Validator registry and built-in validators
//! - [`config`]: Pipeline configuration and file loading
//! - [`pipeline`]: Pipeline execution, progress events and batch runs
//! - [`io`]: CSV input and JSON report output
//!
//! ## Creating Custom Validators
//!
//! Implement [`Validator`] and [`ConfigurableValidator`], then register the
//! type before building pipelines:
//!
//! ```rust,ignore
//! use colguard::prelude::*;
//!
//! struct NonEmpty;
//!
//! impl Validator for NonEmpty {
//!     fn name(&self) -> &str {
//!         "non_empty"
//!     }
//!
//!     fn validate(&self, dataset: &Dataset, column: &str) -> Result<ValidationOutcome, ValidationError> {
//!         let values = column_values(dataset, column)?;
//!         let violations = collect_violations(values, |v| match v.as_str() {
//!             Some("") => Err("Empty string".to_string()),
//!             _ => Ok(()),
//!         });
//!         Ok(ValidationOutcome::new(values.len(), violations, "non-empty check"))
//!     }
//! }
//!
//! impl ConfigurableValidator for NonEmpty {
//!     fn descriptor() -> ValidatorDescriptor {
//!         ValidatorDescriptor::builder("non_empty").build()
//!     }
//!
//!     fn from_params(_: &ResolvedParams) -> Result<Self, ParameterError> {
//!         Ok(NonEmpty)
//!     }
//! }
//!
//! let registry = RegistryBuilder::new().register_type::<NonEmpty>().build()?;
//! install_global(registry)?;
//! ```
//!
//! [`Validator`]: crate::core::validator::Validator
//! [`ConfigurableValidator`]: crate::core::validator::ConfigurableValidator

#![warn(clippy::all)]

pub mod config;
pub mod core;
pub mod io;
pub mod pipeline;
pub mod validators;

/// Prelude module for convenient imports.
///
/// Import everything commonly needed with:
/// ```rust,ignore
/// use colguard::prelude::*;
/// ```
pub mod prelude {
    // Values and data
    pub use crate::core::dataset::Dataset;
    pub use crate::core::types::{Value, ValueKind};

    // Parameters
    pub use crate::core::param::{
        Constraint, ParamType, ParamValue, ParameterDefinition, Parameters, Predicate,
        ResolvedParams,
    };

    // Validator trait and helpers
    pub use crate::core::validator::{
        collect_violations, column_values, ConfigurableValidator, ValidationOutcome, Validator,
        ValidatorDescriptor, Violation,
    };

    // Results
    pub use crate::core::report::{PipelineSummary, Status, ValidationResult};

    // Errors
    pub use crate::core::error::{
        ColguardError, ColguardResult, ConfigError, DatasetError, ParameterError, PipelineError,
        RegistryError, ValidationError,
    };

    // Registry
    pub use crate::validators::registry::{
        global, install_global, RegistryBuilder, ValidatorFactory,
        ValidatorRegistry,
    };

    // Built-in validators
    pub use crate::validators::builtin::{
        CustomFunctionValidator, ExpectedType, NullCheckValidator, RangeValidator,
        RegexValidator, TypeValidator,
    };

    // Configuration
    pub use crate::config::{
        load_config, parse_config, ConfigFormat, PipelineConfig, PipelineConfigBuilder,
        ValidationSpec,
    };

    // Execution
    pub use crate::pipeline::{
        validate_many, validate_many_with_options, PipelineState, ProgressCallback,
        ProgressUpdate, RunOptions, ValidationPipeline,
    };

    // I/O
    pub use crate::io::{read_csv, read_csv_from, write_report, write_reports};
}

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");

#[cfg(test)]
mod tests {
    use super::prelude::*;

    #[test]
    fn test_version() {
        assert!(!super::VERSION.is_empty());
        assert_eq!(super::NAME, "colguard");
    }

    #[test]
    fn test_registry_with_builtins() {
        let registry = ValidatorRegistry::with_builtins();

        assert!(registry.contains("range"));
        assert!(registry.contains("regex"));
        assert!(registry.contains("null_check"));
        assert!(registry.contains("type"));
        assert!(registry.contains("custom_function"));
    }

    #[test]
    fn test_end_to_end_from_text() {
        let config = parse_config(
            r#"
validations:
  - column: age
    validator: range
    params: {min_value: 0, max_value: 120, inclusive: true}
  - column: email
    validator: regex
    params:
      pattern: '^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$'
  - column: joined
    validator: type
    params: {expected_type: datetime}
"#,
            ConfigFormat::Yaml,
        )
        .unwrap();

        let dataset = read_csv_from(
            "age,email,joined\n120,a@b.com,2024-01-15\n121,not-an-email,2024-02-30\n".as_bytes(),
        )
        .unwrap();

        let mut pipeline = ValidationPipeline::new(&config).unwrap();
        let summary = pipeline.run(&dataset).unwrap();

        assert_eq!(summary.total_validations, 3);
        assert!(summary.results.iter().all(|r| !r.passed));
        for result in &summary.results {
            assert_eq!(result.failed_records, 1);
            assert_eq!(result.violations[0].row, 1);
        }
        assert!(summary.render_text().contains("Overall Result: FAILED"));
    }
}
