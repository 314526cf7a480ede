//! Stage output type with factory methods.

use super::{StageArtifact, StageStatus};
use std::collections::HashMap;

/// What a stage execution returns to the scheduler.
///
/// The payload is a small serializable summary that ends up in the stage
/// result; the artifact is the typed product later stages consume. A failed
/// output carries only a string description so that a stored run stays
/// serializable.
#[derive(Debug, Clone)]
pub struct StageOutput {
    /// The status of the execution.
    pub status: StageStatus,
    /// Serializable summary data.
    pub payload: HashMap<String, serde_json::Value>,
    /// Additional metadata.
    pub metadata: HashMap<String, serde_json::Value>,
    /// Error description (for failed executions).
    pub error: Option<String>,
    /// Skip reason (for skipped executions).
    pub skip_reason: Option<String>,
    /// The typed product of a completed execution.
    pub artifact: Option<StageArtifact>,
}

impl StageOutput {
    /// Creates a completed output with summary data and no artifact.
    #[must_use]
    pub fn completed(payload: HashMap<String, serde_json::Value>) -> Self {
        Self {
            status: StageStatus::Completed,
            payload,
            metadata: HashMap::new(),
            error: None,
            skip_reason: None,
            artifact: None,
        }
    }

    /// Creates a completed output carrying a typed artifact.
    #[must_use]
    pub fn completed_with(
        artifact: StageArtifact,
        payload: HashMap<String, serde_json::Value>,
    ) -> Self {
        Self {
            status: StageStatus::Completed,
            payload,
            metadata: HashMap::new(),
            error: None,
            skip_reason: None,
            artifact: Some(artifact),
        }
    }

    /// Creates a failed output with an error description.
    #[must_use]
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            status: StageStatus::Failed,
            payload: HashMap::new(),
            metadata: HashMap::new(),
            error: Some(error.into()),
            skip_reason: None,
            artifact: None,
        }
    }

    /// Creates a skipped output with a reason. Every stage in this pipeline
    /// is mandatory, so the scheduler treats a skip as a run abort.
    #[must_use]
    pub fn skipped(reason: impl Into<String>) -> Self {
        Self {
            status: StageStatus::Skipped,
            payload: HashMap::new(),
            metadata: HashMap::new(),
            error: None,
            skip_reason: Some(reason.into()),
            artifact: None,
        }
    }

    /// Adds a single metadata entry.
    #[must_use]
    pub fn add_metadata(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    /// Returns true if the output indicates successful completion.
    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.status.is_completed()
    }

    /// Returns true if the output indicates failure.
    #[must_use]
    pub fn is_failure(&self) -> bool {
        self.status.is_failure()
    }

    /// Gets a value from the payload.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.payload.get(key)
    }
}

/// Builds a one-entry payload map.
#[must_use]
pub fn payload_entry(key: impl Into<String>, value: serde_json::Value) -> HashMap<String, serde_json::Value> {
    let mut payload = HashMap::new();
    payload.insert(key.into(), value);
    payload
}
