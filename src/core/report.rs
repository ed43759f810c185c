//! Per-specification results and the aggregated run summary.

use crate::core::error::ValidationError;
use crate::core::validator::{ValidationOutcome, Violation};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::time::Duration;

/// Overall outcome of a pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Passed,
    Failed,
}

impl Status {
    pub fn is_passed(&self) -> bool {
        matches!(self, Status::Passed)
    }
}

/// Outcome of one validation specification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub column: String,
    pub validator: String,
    pub passed: bool,
    pub total_records: usize,
    /// Exact count, even when `violations` is truncated.
    pub failed_records: usize,
    pub violations: Vec<Violation>,
    pub message: String,
    pub duration_seconds: f64,
    /// Set when the validator itself faulted.
    pub error: Option<String>,
}

impl ValidationResult {
    /// Build a result from a completed validator call.
    pub fn from_outcome(
        column: impl Into<String>,
        validator: impl Into<String>,
        outcome: ValidationOutcome,
        duration: Duration,
    ) -> Self {
        Self {
            column: column.into(),
            validator: validator.into(),
            passed: outcome.passed(),
            total_records: outcome.total_records,
            failed_records: outcome.violations.len(),
            violations: outcome.violations,
            message: outcome.message,
            duration_seconds: duration.as_secs_f64(),
            error: None,
        }
    }

    /// Build a failed result for a contained run-time fault.
    pub fn from_error(
        column: impl Into<String>,
        validator: impl Into<String>,
        error: &ValidationError,
        duration: Duration,
    ) -> Self {
        let description = error.to_string();
        Self {
            column: column.into(),
            validator: validator.into(),
            passed: false,
            total_records: 0,
            failed_records: 0,
            violations: Vec::new(),
            message: description.clone(),
            duration_seconds: duration.as_secs_f64(),
            error: Some(description),
        }
    }

    /// Keep at most `max` violation details.
    pub fn truncate_violations(&mut self, max: usize) {
        self.violations.truncate(max);
    }
}

/// Aggregate over all results of one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineSummary {
    pub overall_status: Status,
    /// Sum of the per-result durations.
    pub total_duration_seconds: f64,
    pub total_validations: usize,
    pub passed_validations: usize,
    pub failed_validations: usize,
    pub results: Vec<ValidationResult>,
}

impl PipelineSummary {
    /// Aggregate results, preserving their order.
    pub fn from_results(results: Vec<ValidationResult>) -> Self {
        let passed_validations = results.iter().filter(|r| r.passed).count();
        let failed_validations = results.len() - passed_validations;
        let total_duration_seconds = results.iter().map(|r| r.duration_seconds).sum();

        Self {
            overall_status: if failed_validations == 0 {
                Status::Passed
            } else {
                Status::Failed
            },
            total_duration_seconds,
            total_validations: results.len(),
            passed_validations,
            failed_validations,
            results,
        }
    }

    pub fn passed(&self) -> bool {
        self.overall_status.is_passed()
    }

    /// Results that did not pass.
    pub fn failures(&self) -> impl Iterator<Item = &ValidationResult> {
        self.results.iter().filter(|r| !r.passed)
    }

    /// Human-readable report. Row numbers are shown 1-based.
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        out.push_str("Validation Results:\n");
        out.push_str("==================\n");

        for (index, result) in self.results.iter().enumerate() {
            let status = if result.passed { "✓ PASSED" } else { "✗ FAILED" };
            let _ = writeln!(
                out,
                "\n{}. Validator: {} (column: {})",
                index + 1,
                result.validator,
                result.column
            );
            let _ = writeln!(out, "   Status: {}", status);
            let _ = writeln!(out, "   Message: {}", result.message);

            if !result.passed && !result.violations.is_empty() {
                out.push_str("   Failed Records:\n");
                for violation in &result.violations {
                    let _ = writeln!(
                        out,
                        "     - Row {}: value={}, reason={}",
                        violation.row + 1,
                        violation.value,
                        violation.reason
                    );
                }
                let hidden = result.failed_records.saturating_sub(result.violations.len());
                if hidden > 0 {
                    let _ = writeln!(out, "     ... and {} more", hidden);
                }
            }
        }

        out.push_str("\n==================\n");
        let overall = if self.passed() { "PASSED" } else { "FAILED" };
        let _ = writeln!(out, "Overall Result: {}", overall);
        let _ = writeln!(
            out,
            "Passed: {}/{} validations",
            self.passed_validations, self.total_validations
        );
        let _ = writeln!(
            out,
            "Failed: {}/{} validations",
            self.failed_validations, self.total_validations
        );
        let _ = write!(
            out,
            "Total validation time: {:.3} seconds.",
            self.total_duration_seconds
        );
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Value;

    fn failing_outcome() -> ValidationOutcome {
        ValidationOutcome::new(
            2,
            vec![Violation {
                row: 0,
                value: Value::Integer(130),
                reason: "Value above maximum 120".to_string(),
            }],
            "range validation",
        )
    }

    #[test]
    fn test_summary_counts_and_duration_sum() {
        let passed = ValidationResult::from_outcome(
            "name",
            "regex",
            ValidationOutcome::new(2, Vec::new(), "regex validation"),
            Duration::from_millis(250),
        );
        let failed =
            ValidationResult::from_outcome("age", "range", failing_outcome(), Duration::from_millis(500));

        let summary = PipelineSummary::from_results(vec![passed, failed]);
        assert_eq!(summary.overall_status, Status::Failed);
        assert_eq!(summary.total_validations, 2);
        assert_eq!(summary.passed_validations, 1);
        assert_eq!(summary.failed_validations, 1);
        assert!((summary.total_duration_seconds - 0.75).abs() < 1e-9);
        assert_eq!(summary.results[0].column, "name");

        let failures: Vec<&str> = summary.failures().map(|r| r.column.as_str()).collect();
        assert_eq!(failures, vec!["age"]);
    }

    #[test]
    fn test_empty_summary_passes() {
        let summary = PipelineSummary::from_results(Vec::new());
        assert!(summary.passed());
        assert_eq!(summary.total_duration_seconds, 0.0);
    }

    #[test]
    fn test_error_result() {
        let error = ValidationError::MissingColumn {
            column: "email".to_string(),
        };
        let result = ValidationResult::from_error("email", "regex", &error, Duration::ZERO);
        assert!(!result.passed);
        assert_eq!(
            result.error.as_deref(),
            Some("Column 'email' not found in input data")
        );
    }

    #[test]
    fn test_serialized_field_names() {
        let result =
            ValidationResult::from_outcome("age", "range", failing_outcome(), Duration::ZERO);
        let summary = PipelineSummary::from_results(vec![result]);
        let json = serde_json::to_value(&summary).unwrap();

        assert_eq!(json["overall_status"], "failed");
        assert!(json["total_duration_seconds"].is_number());
        let first = &json["results"][0];
        for key in [
            "column",
            "validator",
            "passed",
            "violations",
            "duration_seconds",
            "error",
        ] {
            assert!(first.get(key).is_some(), "missing key {}", key);
        }
        assert_eq!(first["violations"][0]["row"], 0);
        assert_eq!(first["violations"][0]["value"], 130);
        assert!(first["error"].is_null());
    }

    #[test]
    fn test_render_text_uses_one_based_rows() {
        let result =
            ValidationResult::from_outcome("age", "range", failing_outcome(), Duration::ZERO);
        let text = PipelineSummary::from_results(vec![result]).render_text();

        assert!(text.contains("1. Validator: range (column: age)"));
        assert!(text.contains("✗ FAILED"));
        assert!(text.contains("- Row 1: value=130, reason=Value above maximum 120"));
        assert!(text.contains("Overall Result: FAILED"));
        assert!(text.contains("Failed: 1/1 validations"));
    }

    #[test]
    fn test_truncated_details_note_hidden_rows() {
        let mut outcome = failing_outcome();
        outcome.violations.push(Violation {
            row: 1,
            value: Value::Integer(140),
            reason: "Value above maximum 120".to_string(),
        });
        let mut result = ValidationResult::from_outcome("age", "range", outcome, Duration::ZERO);
        result.truncate_violations(1);

        assert_eq!(result.failed_records, 2);
        let text = PipelineSummary::from_results(vec![result]).render_text();
        assert!(text.contains("... and 1 more"));
    }
}
