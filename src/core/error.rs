//! Error types for Colguard.
//!
//! Uses thiserror for structured errors with context. Errors are split by
//! when they are detected:
//! - Construction-time errors (`ParameterError`, `RegistryError`,
//!   `ConfigError`) are fatal and reach the caller before any rule runs
//! - Run-time errors (`ValidationError`) are contained by the pipeline and
//!   recorded on the failing result

use crate::core::param::ParamType;
use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for Colguard.
///
/// This enum encompasses all error categories and enables automatic
/// conversion between specific error types.
#[derive(Error, Debug)]
pub enum ColguardError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),

    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    #[error("Dataset error: {0}")]
    Dataset(#[from] DatasetError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// A validator parameter failed its schema check.
///
/// Raised eagerly when a validator is constructed, never on first use.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParameterError {
    #[error("Missing required parameter '{parameter}'")]
    MissingParameter { parameter: String },

    #[error("Parameter '{parameter}' must be of type {expected}, got {got}")]
    TypeMismatch {
        parameter: String,
        expected: ParamType,
        got: String,
    },

    #[error("Parameter '{parameter}' is invalid: {error}")]
    ConstraintViolation { parameter: String, error: String },

    #[error("Unknown parameter '{parameter}'")]
    UnknownParameter { parameter: String },

    #[error("Parameter '{parameter}' takes a function and can only be set programmatically")]
    FunctionNotConfigurable { parameter: String },
}

/// Errors from the validator registry.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RegistryError {
    #[error("Validator '{name}' is already registered")]
    DuplicateRegistration { name: String },

    #[error("Unknown validator '{name}'")]
    UnknownValidator { name: String, available: Vec<String> },

    #[error("Invalid parameters for validator '{validator}': {source}")]
    InvalidParameters {
        validator: String,
        #[source]
        source: ParameterError,
    },

    #[error("The global validator registry is already initialized")]
    AlreadyInitialized,
}

/// Errors raised while loading or constructing a pipeline configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Validation entry {index} (column '{column}', validator '{validator}'): {source}")]
    InvalidSpecification {
        index: usize,
        column: String,
        validator: String,
        #[source]
        source: RegistryError,
    },

    #[error("Malformed configuration: {reason}")]
    Malformed { reason: String },

    #[error("Configuration file not found: {0}")]
    NotFound(PathBuf),

    #[error("Unsupported configuration file extension '{extension}'. Use .json, .yaml/.yml or .toml")]
    UnsupportedFormat { extension: String },

    #[error("Failed to parse {format} configuration: {message}")]
    Parse { format: String, message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Faults raised while a validator runs.
///
/// The pipeline never lets these escape `run`; each one becomes a failed
/// result carrying the error description.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Column '{column}' not found in input data")]
    MissingColumn { column: String },

    #[error("Validator fault: {message}")]
    Fault { message: String },

    #[error("Validator panicked: {message}")]
    Panicked { message: String },
}

/// Errors from the pipeline state machine.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PipelineError {
    #[error("Cannot {operation} while pipeline is {state}")]
    IllegalState {
        operation: &'static str,
        state: crate::pipeline::PipelineState,
    },
}

/// Errors building or loading a dataset.
#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("Duplicate column '{0}'")]
    DuplicateColumn(String),

    #[error("Column '{column}' has {got} values, expected {expected}")]
    LengthMismatch {
        column: String,
        expected: usize,
        got: usize,
    },

    #[error("Row {row} has {got} cells, expected at most {expected}")]
    RowTooLong {
        row: usize,
        expected: usize,
        got: usize,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

// ============================================================================
// Error Utilities
// ============================================================================

impl RegistryError {
    /// Get suggestion for fixing this error.
    pub fn suggested_fix(&self) -> Option<String> {
        match self {
            RegistryError::UnknownValidator { available, .. } if !available.is_empty() => {
                Some(format!("Use one of: {}", available.join(", ")))
            }
            RegistryError::InvalidParameters {
                source: ParameterError::FunctionNotConfigurable { .. },
                ..
            } => Some("Build this validation with PipelineConfig::builder()".to_string()),
            RegistryError::DuplicateRegistration { name } => {
                Some(format!("Register '{}' under a different name", name))
            }
            _ => None,
        }
    }

    /// Get the parameter error, if this is one.
    pub fn parameter_error(&self) -> Option<&ParameterError> {
        match self {
            RegistryError::InvalidParameters { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl ConfigError {
    /// Index of the offending validation entry, when known.
    pub fn spec_index(&self) -> Option<usize> {
        match self {
            ConfigError::InvalidSpecification { index, .. } => Some(*index),
            _ => None,
        }
    }

    /// The registry error behind an invalid specification.
    pub fn registry_error(&self) -> Option<&RegistryError> {
        match self {
            ConfigError::InvalidSpecification { source, .. } => Some(source),
            _ => None,
        }
    }

    /// Check whether this error names a validator missing from the registry.
    pub fn is_unknown_validator(&self) -> bool {
        matches!(
            self.registry_error(),
            Some(RegistryError::UnknownValidator { .. })
        )
    }
}

/// Result type alias for Colguard operations.
pub type ColguardResult<T> = Result<T, ColguardError>;

/// Result type alias for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Result type alias for registry operations.
pub type RegistryResult<T> = Result<T, RegistryError>;
