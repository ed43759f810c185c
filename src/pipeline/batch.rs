//! Parallel validation of many datasets.
//!
//! Each dataset gets its own pipeline, so runs share nothing mutable and
//! can be spread over the rayon thread pool.

use crate::config::PipelineConfig;
use crate::core::dataset::Dataset;
use crate::core::error::ColguardResult;
use crate::core::report::PipelineSummary;
use crate::pipeline::options::RunOptions;
use crate::pipeline::orchestrator::ValidationPipeline;
use crate::validators::registry::ValidatorRegistry;
use log::info;
use rayon::prelude::*;

/// Validate every dataset against the same configuration.
///
/// Summaries are returned in input order.
pub fn validate_many(
    config: &PipelineConfig,
    registry: &ValidatorRegistry,
    datasets: &[Dataset],
) -> ColguardResult<Vec<PipelineSummary>> {
    validate_many_with_options(config, registry, datasets, &RunOptions::default())
}

/// Like [`validate_many`], with run options applied to every run.
///
/// The configuration is checked once before any dataset is touched.
pub fn validate_many_with_options(
    config: &PipelineConfig,
    registry: &ValidatorRegistry,
    datasets: &[Dataset],
    options: &RunOptions,
) -> ColguardResult<Vec<PipelineSummary>> {
    ValidationPipeline::with_registry(config, registry)?;
    info!("Validating {} datasets in parallel", datasets.len());

    datasets
        .par_iter()
        .map(|dataset| -> ColguardResult<PipelineSummary> {
            let mut pipeline = ValidationPipeline::with_registry(config, registry)?;
            pipeline.run_with_options(dataset, options)?;
            Ok(pipeline.into_summary()?)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::ColguardError;
    use crate::core::param::Parameters;
    use crate::core::types::Value;

    fn config() -> PipelineConfig {
        PipelineConfig::builder()
            .add("n", "range", Parameters::new().with("min_value", 0))
            .build()
    }

    #[test]
    fn test_summaries_follow_input_order() {
        let datasets: Vec<Dataset> = (0..16)
            .map(|i| {
                let value = if i % 2 == 0 { i } else { -i };
                Dataset::new().with_column("n", [Value::Integer(value)]).unwrap()
            })
            .collect();

        let registry = ValidatorRegistry::with_builtins();
        let summaries = validate_many(&config(), &registry, &datasets).unwrap();

        assert_eq!(summaries.len(), 16);
        for (i, summary) in summaries.iter().enumerate() {
            assert_eq!(summary.passed(), i % 2 == 0, "dataset {}", i);
        }
    }

    #[test]
    fn test_invalid_config_fails_once() {
        let config = PipelineConfig::builder()
            .add("n", "unknown", Parameters::new())
            .build();
        let registry = ValidatorRegistry::with_builtins();

        let result = validate_many(&config, &registry, &[Dataset::new()]);
        assert!(matches!(result, Err(ColguardError::Config(_))));
    }

    #[test]
    fn test_no_datasets() {
        let registry = ValidatorRegistry::with_builtins();
        assert!(validate_many(&config(), &registry, &[]).unwrap().is_empty());
    }
}
