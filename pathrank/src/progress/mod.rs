//! Progress reporting.
//!
//! The scheduler notifies a reporter before dispatching each stage. The call
//! is synchronous and must never block or stall the run; a reporter that
//! panics is contained at the call site and logged.

mod hub;

pub use hub::{ProgressHub, ScopedProgressReporter};

use serde::{Deserialize, Serialize};

/// One progress notification.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProgressUpdate {
    /// The stage about to run (or the terminal `complete` marker).
    pub stage: String,
    /// Percentage of stages completed so far, 0..=100.
    pub percent: f64,
    /// Human-readable description.
    pub message: String,
}

impl ProgressUpdate {
    /// Creates a new update.
    #[must_use]
    pub fn new(stage: impl Into<String>, percent: f64, message: impl Into<String>) -> Self {
        Self {
            stage: stage.into(),
            percent,
            message: message.into(),
        }
    }
}

/// Receives ordered progress notifications from a run.
///
/// Implementations must be safe to call from an async context without
/// blocking; slow or failing consumers belong behind a channel.
pub trait ProgressReporter: Send + Sync {
    /// Called before each stage dispatch and once after the final stage.
    fn notify(&self, stage: &str, percent: f64, message: &str);
}

/// Discards all notifications.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpProgressReporter;

impl ProgressReporter for NoOpProgressReporter {
    fn notify(&self, _stage: &str, _percent: f64, _message: &str) {}
}

/// Logs notifications through `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingProgressReporter;

impl ProgressReporter for LoggingProgressReporter {
    fn notify(&self, stage: &str, percent: f64, message: &str) {
        tracing::info!(stage = %stage, percent = percent, "{message}");
    }
}

/// Collects notifications for inspection in tests.
#[derive(Debug, Default)]
pub struct CollectingProgressReporter {
    updates: parking_lot::RwLock<Vec<ProgressUpdate>>,
}

impl CollectingProgressReporter {
    /// Creates an empty collector.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all collected updates in notification order.
    #[must_use]
    pub fn updates(&self) -> Vec<ProgressUpdate> {
        self.updates.read().clone()
    }

    /// Number of collected updates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.updates.read().len()
    }

    /// True if nothing has been collected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.updates.read().is_empty()
    }
}

impl ProgressReporter for CollectingProgressReporter {
    fn notify(&self, stage: &str, percent: f64, message: &str) {
        self.updates
            .write()
            .push(ProgressUpdate::new(stage, percent, message));
    }
}
