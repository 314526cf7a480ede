//! Context-owned stage results.

use super::{StageOutput, StageStatus};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The record the analysis context keeps for each executed stage.
///
/// Never mutated once stored; a later stage that recomputes a value (the
/// rescoring pass) records a result under its own stage name instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageResult {
    /// The stage name.
    pub stage: String,
    /// Terminal status of the execution.
    pub status: StageStatus,
    /// Serializable summary payload.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub payload: HashMap<String, serde_json::Value>,
    /// Additional metadata (durations, timestamps).
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub metadata: HashMap<String, serde_json::Value>,
    /// Error description (for failed executions).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl StageResult {
    /// Builds a result from a stage output, consuming its serializable parts.
    /// The typed artifact is stored separately by the context.
    #[must_use]
    pub fn from_output(stage: impl Into<String>, output: &StageOutput) -> Self {
        Self {
            stage: stage.into(),
            status: output.status,
            payload: output.payload.clone(),
            metadata: output.metadata.clone(),
            error: output.error.clone(),
        }
    }

    /// Returns true if the stage completed.
    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.status.is_completed()
    }

    /// Returns true if the stage failed.
    #[must_use]
    pub fn is_failure(&self) -> bool {
        self.status.is_failure()
    }

    /// Gets a value from the payload.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.payload.get(key)
    }

    /// Adds a metadata entry.
    pub fn insert_metadata(&mut self, key: impl Into<String>, value: serde_json::Value) {
        self.metadata.insert(key.into(), value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::payload_entry;

    #[test]
    fn test_from_output_copies_serializable_parts() {
        let output = StageOutput::completed(payload_entry("count", serde_json::json!(7)))
            .add_metadata("attempt", serde_json::json!(1));
        let result = StageResult::from_output("validate_genes", &output);

        assert_eq!(result.stage, "validate_genes");
        assert!(result.is_completed());
        assert_eq!(result.get("count"), Some(&serde_json::json!(7)));
        assert_eq!(result.metadata.get("attempt"), Some(&serde_json::json!(1)));
        assert!(result.error.is_none());
    }

    #[test]
    fn test_failed_result_carries_description() {
        let output = StageOutput::failed("timeout");
        let result = StageResult::from_output("enrich_seed", &output);

        assert!(result.is_failure());
        assert_eq!(result.error.as_deref(), Some("timeout"));
    }

    #[test]
    fn test_round_trips_through_json() {
        let output = StageOutput::completed(payload_entry("genes", serde_json::json!(["TP53"])));
        let result = StageResult::from_output("validate_genes", &output);

        let json = serde_json::to_string(&result).unwrap();
        let back: StageResult = serde_json::from_str(&json).unwrap();

        assert_eq!(back.stage, result.stage);
        assert_eq!(back.status, result.status);
        assert_eq!(back.get("genes"), result.get("genes"));
    }
}
