//! Pipeline execution.
//!
//! Builds validators from a configuration, runs them in order against a
//! dataset and aggregates the results.

pub mod batch;
pub mod options;
pub mod orchestrator;
pub mod progress;

pub use batch::{validate_many, validate_many_with_options};
pub use options::RunOptions;
pub use orchestrator::{PipelineState, ValidationPipeline};
pub use progress::{ProgressCallback, ProgressTracker, ProgressUpdate};
