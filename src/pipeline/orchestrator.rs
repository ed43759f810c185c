//! Validation pipeline implementation.
//!
//! A pipeline resolves every specification against the registry when it is
//! built, then runs the configured validators in specification order. Faults
//! inside a validator become failed results; they never abort the run.

use crate::config::PipelineConfig;
use crate::core::dataset::Dataset;
use crate::core::error::{ConfigError, ConfigResult, PipelineError, ValidationError};
use crate::core::report::{PipelineSummary, ValidationResult};
use crate::core::validator::{panic_message, Validator};
use crate::pipeline::options::RunOptions;
use crate::pipeline::progress::ProgressTracker;
use crate::validators::registry::{self, ValidatorRegistry};
use log::{debug, info, warn};
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::time::Instant;

/// Lifecycle of a pipeline instance.
///
/// `Configured` → `Running` → `Completed`; a pipeline runs at most once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Configured,
    Running,
    Completed,
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PipelineState::Configured => "configured",
            PipelineState::Running => "running",
            PipelineState::Completed => "completed",
        })
    }
}

/// A validator bound to the column it checks.
struct ConfiguredValidator {
    column: String,
    validator_name: String,
    validator: Box<dyn Validator>,
}

/// Runs an ordered list of validators against one dataset.
pub struct ValidationPipeline {
    validators: Vec<ConfiguredValidator>,
    state: PipelineState,
    summary: Option<PipelineSummary>,
}

impl ValidationPipeline {
    /// Build a pipeline using the process-wide registry.
    pub fn new(config: &PipelineConfig) -> ConfigResult<Self> {
        Self::with_registry(config, registry::global())
    }

    /// Build a pipeline using an explicit registry.
    ///
    /// Fails on the first specification whose validator is unknown or whose
    /// parameters are invalid. Nothing runs in that case.
    pub fn with_registry(config: &PipelineConfig, registry: &ValidatorRegistry) -> ConfigResult<Self> {
        let validators = config
            .iter()
            .enumerate()
            .map(|(index, spec)| {
                registry
                    .create(&spec.validator, &spec.params)
                    .map(|validator| ConfiguredValidator {
                        column: spec.column.clone(),
                        validator_name: spec.validator.clone(),
                        validator,
                    })
                    .map_err(|source| ConfigError::InvalidSpecification {
                        index,
                        column: spec.column.clone(),
                        validator: spec.validator.clone(),
                        source,
                    })
            })
            .collect::<ConfigResult<Vec<_>>>()?;

        info!("Pipeline configured with {} validations", validators.len());
        Ok(Self {
            validators,
            state: PipelineState::Configured,
            summary: None,
        })
    }

    /// Run every validator with default options.
    pub fn run(&mut self, dataset: &Dataset) -> Result<&PipelineSummary, PipelineError> {
        self.run_with_options(dataset, &RunOptions::default())
    }

    /// Run every validator against `dataset`.
    ///
    /// Fails only when the pipeline has already run.
    pub fn run_with_options(
        &mut self,
        dataset: &Dataset,
        options: &RunOptions,
    ) -> Result<&PipelineSummary, PipelineError> {
        if self.state != PipelineState::Configured {
            return Err(PipelineError::IllegalState {
                operation: "run",
                state: self.state,
            });
        }
        self.state = PipelineState::Running;

        let total = self.validators.len();
        let mut tracker =
            ProgressTracker::new(total).with_callback(options.progress_callback.as_deref());
        tracker.start();

        let mut results = Vec::with_capacity(total);
        for (index, entry) in self.validators.iter().enumerate() {
            debug!(
                "Running validator '{}' on column '{}' ({}/{})",
                entry.validator_name,
                entry.column,
                index + 1,
                total
            );
            tracker.validator_started(&entry.column, &entry.validator_name);

            let mut result = execute(entry, dataset);
            if let Some(max) = options.max_violation_details {
                result.truncate_violations(max);
            }

            tracker.validator_completed(
                &entry.column,
                &entry.validator_name,
                result.passed,
                (result.duration_seconds * 1000.0) as u64,
            );
            results.push(result);
        }

        let summary = PipelineSummary::from_results(results);
        info!(
            "Validation {}: {}/{} validations passed in {:.3}s",
            if summary.passed() { "passed" } else { "failed" },
            summary.passed_validations,
            summary.total_validations,
            summary.total_duration_seconds
        );
        tracker.complete();

        self.state = PipelineState::Completed;
        Ok(&*self.summary.insert(summary))
    }

    /// The summary of the completed run.
    pub fn summary(&self) -> Result<&PipelineSummary, PipelineError> {
        self.summary.as_ref().ok_or(PipelineError::IllegalState {
            operation: "read the summary",
            state: self.state,
        })
    }

    /// Consume the pipeline, returning the summary of the completed run.
    pub fn into_summary(self) -> Result<PipelineSummary, PipelineError> {
        let state = self.state;
        self.summary.ok_or(PipelineError::IllegalState {
            operation: "read the summary",
            state,
        })
    }

    pub fn state(&self) -> PipelineState {
        self.state
    }

    /// Number of configured validations.
    pub fn len(&self) -> usize {
        self.validators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }
}

/// Run one validator, containing every fault it raises.
fn execute(entry: &ConfiguredValidator, dataset: &Dataset) -> ValidationResult {
    let start = Instant::now();
    let outcome = catch_unwind(AssertUnwindSafe(|| {
        entry.validator.validate(dataset, &entry.column)
    }));
    let elapsed = start.elapsed();

    let error = match outcome {
        Ok(Ok(outcome)) => {
            return ValidationResult::from_outcome(
                &entry.column,
                &entry.validator_name,
                outcome,
                elapsed,
            )
        }
        Ok(Err(error)) => error,
        Err(payload) => ValidationError::Panicked {
            message: panic_message(payload.as_ref()),
        },
    };

    warn!(
        "Validator '{}' on column '{}' failed: {}",
        entry.validator_name, entry.column, error
    );
    ValidationResult::from_error(&entry.column, &entry.validator_name, &error, elapsed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::{ParameterError, RegistryError};
    use crate::core::param::{Parameters, Predicate, ResolvedParams};
    use crate::core::report::Status;
    use crate::core::types::Value;
    use crate::core::validator::{ValidationOutcome, ValidatorDescriptor};
    use crate::pipeline::progress::ProgressUpdate;
    use proptest::prelude::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    const EMAIL: &str = r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$";

    fn people() -> Dataset {
        Dataset::new()
            .with_column("age", [Value::Integer(30), Value::Integer(121), Value::Null])
            .unwrap()
            .with_column(
                "email",
                [Value::from("a@b.com"), Value::from("not-an-email"), Value::from("c@d.org")],
            )
            .unwrap()
            .with_column("name", ["Ann", "Bob", "Cy"])
            .unwrap()
    }

    fn people_config() -> PipelineConfig {
        PipelineConfig::builder()
            .add(
                "age",
                "range",
                Parameters::new().with("min_value", 0).with("max_value", 120),
            )
            .add("email", "regex", Parameters::new().with("pattern", EMAIL))
            .add("name", "null_check", Parameters::new())
            .build()
    }

    /// Counts validate calls; panics on a column named "boom".
    struct Counting {
        calls: Arc<AtomicUsize>,
    }

    impl Validator for Counting {
        fn name(&self) -> &str {
            "counting"
        }

        fn validate(
            &self,
            dataset: &Dataset,
            column: &str,
        ) -> Result<ValidationOutcome, ValidationError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if column == "boom" {
                panic!("counting validator exploded");
            }
            if column == "fault" {
                return Err(ValidationError::Fault {
                    message: "backend unavailable".to_string(),
                });
            }
            Ok(ValidationOutcome::new(dataset.row_count(), Vec::new(), "counting"))
        }
    }

    fn counting_registry(calls: &Arc<AtomicUsize>) -> ValidatorRegistry {
        let mut registry = ValidatorRegistry::with_builtins();
        let calls = Arc::clone(calls);
        registry
            .register(ValidatorDescriptor::builder("counting").build(), move |_: &ResolvedParams| {
                Ok(Box::new(Counting {
                    calls: Arc::clone(&calls),
                }) as Box<dyn Validator>)
            })
            .unwrap();
        registry
    }

    fn build(config: &PipelineConfig) -> ConfigResult<ValidationPipeline> {
        ValidationPipeline::with_registry(config, &ValidatorRegistry::with_builtins())
    }

    #[test]
    fn test_run_produces_ordered_results() {
        let mut pipeline = build(&people_config()).unwrap();
        assert_eq!(pipeline.state(), PipelineState::Configured);

        let summary = pipeline.run(&people()).unwrap().clone();
        assert_eq!(pipeline.state(), PipelineState::Completed);

        let order: Vec<(&str, &str)> = summary
            .results
            .iter()
            .map(|r| (r.column.as_str(), r.validator.as_str()))
            .collect();
        assert_eq!(
            order,
            vec![("age", "range"), ("email", "regex"), ("name", "null_check")]
        );

        assert_eq!(summary.overall_status, Status::Failed);
        assert_eq!(summary.passed_validations, 1);
        assert_eq!(summary.failed_validations, 2);

        let age = &summary.results[0];
        let rows: Vec<usize> = age.violations.iter().map(|v| v.row).collect();
        assert_eq!(rows, vec![1, 2]);
        assert_eq!(summary.results[1].violations[0].row, 1);
        assert!(summary.results[2].passed);
    }

    #[test]
    fn test_unknown_validator_fails_construction_before_anything_runs() {
        let calls = Arc::new(AtomicUsize::new(0));
        let registry = counting_registry(&calls);
        let config = PipelineConfig::builder()
            .add("age", "counting", Parameters::new())
            .add("age", "no_such_validator", Parameters::new())
            .build();

        let err = match ValidationPipeline::with_registry(&config, &registry) {
            Err(err) => err,
            Ok(_) => panic!("pipeline built with an unknown validator"),
        };
        assert!(err.is_unknown_validator());
        assert_eq!(err.spec_index(), Some(1));
        assert!(err.to_string().contains("no_such_validator"));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_invalid_parameter_fails_construction() {
        let config = PipelineConfig::builder()
            .add("age", "range", Parameters::new().with("min_value", "abc"))
            .build();

        let err = match build(&config) {
            Err(err) => err,
            Ok(_) => panic!("pipeline built with an invalid parameter"),
        };
        assert_eq!(err.spec_index(), Some(0));
        assert!(matches!(
            err.registry_error().and_then(|e| e.parameter_error()),
            Some(ParameterError::TypeMismatch { parameter, .. }) if parameter == "min_value"
        ));
    }

    #[test]
    fn test_nan_bounds_fail_construction() {
        let config = PipelineConfig::builder()
            .add(
                "age",
                "range",
                Parameters::new().with("min_value", f64::NAN).with("max_value", 120),
            )
            .add(
                "age",
                "null_check",
                Parameters::new()
                    .with("allow_null", true)
                    .with("max_null_percent", f64::NAN),
            )
            .build();

        let err = match build(&config) {
            Err(err) => err,
            Ok(_) => panic!("pipeline built with a NaN bound"),
        };
        assert_eq!(err.spec_index(), Some(0));
        assert!(matches!(
            err.registry_error().and_then(|e| e.parameter_error()),
            Some(ParameterError::ConstraintViolation { parameter, .. }) if parameter == "min_value"
        ));
    }

    #[test]
    fn test_custom_function_from_text_is_rejected() {
        let config = crate::config::parse_config(
            r#"{"validations": [{"column": "age", "validator": "custom_function",
                "params": {"validation_func": "lambda x: x > 0"}}]}"#,
            crate::config::ConfigFormat::Json,
        )
        .unwrap();

        let err = match build(&config) {
            Err(err) => err,
            Ok(_) => panic!("custom_function built from text"),
        };
        assert!(matches!(
            err.registry_error(),
            Some(RegistryError::InvalidParameters {
                source: ParameterError::FunctionNotConfigurable { .. },
                ..
            })
        ));
    }

    #[test]
    fn test_custom_function_from_code() {
        let config = PipelineConfig::builder()
            .add(
                "name",
                "custom_function",
                Parameters::new().with_predicate(
                    "validation_func",
                    Predicate::new("capitalised", |v| {
                        v.as_str()
                            .and_then(|s| s.chars().next())
                            .map_or(false, char::is_uppercase)
                    }),
                ),
            )
            .build();

        let mut pipeline = build(&config).unwrap();
        assert!(pipeline.run(&people()).unwrap().passed());
    }

    #[test]
    fn test_missing_column_is_contained() {
        let config = PipelineConfig::builder()
            .add("phone", "regex", Parameters::new().with("pattern", "^[0-9]+$"))
            .add("name", "null_check", Parameters::new())
            .build();

        let mut pipeline = build(&config).unwrap();
        let summary = pipeline.run(&people()).unwrap();

        assert_eq!(summary.results.len(), 2);
        assert!(!summary.results[0].passed);
        assert_eq!(
            summary.results[0].error.as_deref(),
            Some("Column 'phone' not found in input data")
        );
        assert!(summary.results[1].passed);
        assert_eq!(summary.overall_status, Status::Failed);
    }

    #[test]
    fn test_faults_and_panics_are_contained() {
        let calls = Arc::new(AtomicUsize::new(0));
        let registry = counting_registry(&calls);
        let dataset = Dataset::new()
            .with_column("boom", [1])
            .unwrap()
            .with_column("fault", [1])
            .unwrap()
            .with_column("ok", [1])
            .unwrap();
        let config = PipelineConfig::builder()
            .add("boom", "counting", Parameters::new())
            .add("fault", "counting", Parameters::new())
            .add("ok", "counting", Parameters::new())
            .build();

        let mut pipeline = ValidationPipeline::with_registry(&config, &registry).unwrap();
        let summary = pipeline.run(&dataset).unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(
            summary.results[0].error.as_deref(),
            Some("Validator panicked: counting validator exploded")
        );
        assert_eq!(
            summary.results[1].error.as_deref(),
            Some("Validator fault: backend unavailable")
        );
        assert!(summary.results[2].passed);
        assert_eq!(summary.failed_validations, 2);
    }

    #[test]
    fn test_second_run_is_rejected() {
        let mut pipeline = build(&people_config()).unwrap();
        pipeline.run(&people()).unwrap();

        assert_eq!(
            pipeline.run(&people()).unwrap_err(),
            PipelineError::IllegalState {
                operation: "run",
                state: PipelineState::Completed,
            }
        );
        assert!(pipeline.summary().is_ok());
    }

    #[test]
    fn test_summary_before_run() {
        let pipeline = build(&people_config()).unwrap();
        assert!(matches!(
            pipeline.summary(),
            Err(PipelineError::IllegalState {
                state: PipelineState::Configured,
                ..
            })
        ));
    }

    #[test]
    fn test_summary_returns_last_run() {
        let mut pipeline = build(&people_config()).unwrap();
        let from_run = pipeline.run(&people()).unwrap().clone();
        assert_eq!(pipeline.summary().unwrap(), &from_run);
        assert_eq!(pipeline.into_summary().unwrap(), from_run);
    }

    fn without_durations(summary: &PipelineSummary) -> String {
        let mut summary = summary.clone();
        summary.total_duration_seconds = 0.0;
        for result in &mut summary.results {
            result.duration_seconds = 0.0;
        }
        serde_json::to_string(&summary).unwrap()
    }

    #[test]
    fn test_identical_runs_match_except_durations() {
        let mut first = build(&people_config()).unwrap();
        let mut second = build(&people_config()).unwrap();

        let a = without_durations(first.run(&people()).unwrap());
        let b = without_durations(second.run(&people()).unwrap());
        assert_eq!(a, b);
    }

    #[test]
    fn test_total_duration_is_sum_of_results() {
        let mut pipeline = build(&people_config()).unwrap();
        let summary = pipeline.run(&people()).unwrap();
        let sum: f64 = summary.results.iter().map(|r| r.duration_seconds).sum();
        assert_eq!(summary.total_duration_seconds, sum);
    }

    #[test]
    fn test_max_violation_details() {
        let dataset = Dataset::new()
            .with_column("n", [Value::Null, Value::Null, Value::Null])
            .unwrap();
        let config = PipelineConfig::builder()
            .add("n", "null_check", Parameters::new())
            .build();

        let mut pipeline = build(&config).unwrap();
        let summary = pipeline
            .run_with_options(&dataset, &RunOptions::new().with_max_violation_details(1))
            .unwrap();
        assert_eq!(summary.results[0].failed_records, 3);
        assert_eq!(summary.results[0].violations.len(), 1);
    }

    #[test]
    fn test_progress_events() {
        let events = Arc::new(Mutex::new(Vec::<ProgressUpdate>::new()));
        let sink = Arc::clone(&events);
        let options = RunOptions::new().with_progress(move |u| sink.lock().unwrap().push(u));

        let mut pipeline = build(&people_config()).unwrap();
        pipeline.run_with_options(&people(), &options).unwrap();

        let events = events.lock().unwrap();
        assert_eq!(events.len(), 2 + 2 * 3);
        assert_eq!(events[0], ProgressUpdate::Started { total_validations: 3 });
        assert!(matches!(
            events.last(),
            Some(ProgressUpdate::Completed { passed: 1, failed: 2, .. })
        ));
    }

    #[test]
    fn test_panicking_progress_callback_does_not_escape_run() {
        let options = RunOptions::new().with_progress(|u| {
            if matches!(u, ProgressUpdate::ValidatorCompleted { .. }) {
                panic!("progress sink failed");
            }
        });

        let mut pipeline = build(&people_config()).unwrap();
        let summary = pipeline.run_with_options(&people(), &options).unwrap();
        assert_eq!(summary.total_validations, 3);

        assert_eq!(pipeline.state(), PipelineState::Completed);
        assert_eq!(pipeline.summary().unwrap().results.len(), 3);
    }

    #[test]
    fn test_empty_config_passes() {
        let mut pipeline = build(&PipelineConfig::default()).unwrap();
        assert!(pipeline.is_empty());
        assert!(pipeline.run(&people()).unwrap().passed());
    }

    proptest! {
        #[test]
        fn prop_results_follow_config_order(picks in proptest::collection::vec(0usize..4, 0..12)) {
            let catalogue = [
                ("age", "null_check"),
                ("email", "regex"),
                ("name", "type"),
                ("missing", "null_check"),
            ];
            let mut builder = PipelineConfig::builder();
            for &pick in &picks {
                let (column, validator) = catalogue[pick];
                let params = match validator {
                    "regex" => Parameters::new().with("pattern", "@"),
                    "type" => Parameters::new().with("expected_type", "string"),
                    _ => Parameters::new(),
                };
                builder = builder.add(column, validator, params);
            }
            let config = builder.build();

            let mut pipeline = build(&config).unwrap();
            let summary = pipeline.run(&people()).unwrap();

            prop_assert_eq!(summary.results.len(), picks.len());
            for (result, &pick) in summary.results.iter().zip(&picks) {
                prop_assert_eq!(result.column.as_str(), catalogue[pick].0);
                prop_assert_eq!(result.validator.as_str(), catalogue[pick].1);
            }
        }
    }
}
