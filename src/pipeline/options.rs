//! Options for a pipeline run.

use crate::pipeline::progress::{ProgressCallback, ProgressUpdate};
use std::sync::Arc;

/// Run options.
#[derive(Clone, Default)]
pub struct RunOptions {
    /// Keep at most this many violation details per result.
    /// `failed_records` stays exact. `None` keeps every detail.
    pub max_violation_details: Option<usize>,
    /// Progress callback.
    pub progress_callback: Option<Arc<ProgressCallback>>,
}

impl std::fmt::Debug for RunOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunOptions")
            .field("max_violation_details", &self.max_violation_details)
            .field("progress_callback", &self.progress_callback.as_ref().map(|_| "<callback>"))
            .finish()
    }
}

impl RunOptions {
    /// Create a new options builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Limit the violation details kept per result.
    pub fn with_max_violation_details(mut self, max: usize) -> Self {
        self.max_violation_details = Some(max);
        self
    }

    /// Set progress callback.
    ///
    /// A panic inside the callback is logged and does not affect the run.
    pub fn with_progress<F>(mut self, callback: F) -> Self
    where
        F: Fn(ProgressUpdate) + Send + Sync + 'static,
    {
        self.progress_callback = Some(Arc::new(Box::new(callback)));
        self
    }
}
