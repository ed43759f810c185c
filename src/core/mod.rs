//! Core types and traits for Colguard.
//!
//! This module contains the foundational pieces every validator and
//! pipeline builds on:
//! - Cell values and the tabular dataset
//! - Parameter schemas and constraints
//! - The validator trait and descriptors
//! - Results, summaries and error types

pub mod types;
pub mod dataset;
pub mod param;
pub mod error;
pub mod validator;
pub mod report;

// Re-export commonly used types
pub use types::{Value, ValueKind};
pub use dataset::Dataset;
pub use param::{
    Constraint, ParamType, ParamValue, ParameterDefinition, Parameters, Predicate, ResolvedParams,
};
pub use error::{
    ColguardError, ConfigError, DatasetError, ParameterError, PipelineError, RegistryError,
    ValidationError,
};
pub use validator::{
    ConfigurableValidator, ValidationOutcome, Validator, ValidatorDescriptor, Violation,
};
pub use report::{PipelineSummary, Status, ValidationResult};
