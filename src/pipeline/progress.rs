//! Progress tracking for pipeline runs.

use crate::core::validator::panic_message;
use log::warn;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::time::Instant;

/// A progress update event.
#[derive(Debug, Clone, PartialEq)]
pub enum ProgressUpdate {
    /// A run has started.
    Started { total_validations: usize },
    /// A validator is about to run.
    ValidatorStarted {
        index: usize,
        total: usize,
        column: String,
        validator: String,
    },
    /// A validator has finished, successfully or not.
    ValidatorCompleted {
        index: usize,
        total: usize,
        column: String,
        validator: String,
        passed: bool,
        duration_ms: u64,
    },
    /// The run has finished.
    Completed {
        passed: usize,
        failed: usize,
        total_duration_ms: u64,
    },
}

/// Callback type for progress updates.
pub type ProgressCallback = Box<dyn Fn(ProgressUpdate) + Send + Sync>;

/// Tracks the progress of one run and forwards events to a callback.
pub struct ProgressTracker<'a> {
    total: usize,
    completed: usize,
    failed: usize,
    start_time: Option<Instant>,
    callback: Option<&'a ProgressCallback>,
}

impl<'a> ProgressTracker<'a> {
    /// Create a new progress tracker.
    pub fn new(total: usize) -> Self {
        Self {
            total,
            completed: 0,
            failed: 0,
            start_time: None,
            callback: None,
        }
    }

    /// Set a callback for progress updates.
    pub fn with_callback(mut self, callback: Option<&'a ProgressCallback>) -> Self {
        self.callback = callback;
        self
    }

    /// Start tracking.
    pub fn start(&mut self) {
        self.start_time = Some(Instant::now());
        self.send_update(ProgressUpdate::Started {
            total_validations: self.total,
        });
    }

    /// Report that a validator has started.
    pub fn validator_started(&self, column: &str, validator: &str) {
        self.send_update(ProgressUpdate::ValidatorStarted {
            index: self.completed,
            total: self.total,
            column: column.to_string(),
            validator: validator.to_string(),
        });
    }

    /// Report that a validator has completed.
    pub fn validator_completed(&mut self, column: &str, validator: &str, passed: bool, duration_ms: u64) {
        let index = self.completed;
        self.completed += 1;
        if !passed {
            self.failed += 1;
        }

        self.send_update(ProgressUpdate::ValidatorCompleted {
            index,
            total: self.total,
            column: column.to_string(),
            validator: validator.to_string(),
            passed,
            duration_ms,
        });
    }

    /// Complete tracking.
    pub fn complete(&self) {
        let total_duration_ms = self
            .start_time
            .map(|t| t.elapsed().as_millis() as u64)
            .unwrap_or(0);

        self.send_update(ProgressUpdate::Completed {
            passed: self.completed - self.failed,
            failed: self.failed,
            total_duration_ms,
        });
    }

    /// Get current progress percentage.
    pub fn progress_percent(&self) -> f32 {
        if self.total == 0 {
            return 100.0;
        }
        (self.completed as f32 / self.total as f32) * 100.0
    }

    /// Deliver an event. A panicking callback is logged and otherwise ignored.
    fn send_update(&self, update: ProgressUpdate) {
        if let Some(callback) = self.callback {
            if let Err(payload) = catch_unwind(AssertUnwindSafe(|| callback(update))) {
                warn!("Progress callback panicked: {}", panic_message(payload.as_ref()));
            }
        }
    }
}
