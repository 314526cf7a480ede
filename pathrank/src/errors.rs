//! Error types for the pathrank pipeline engine.
//!
//! The taxonomy separates static precondition violations (missing
//! dependencies, unsatisfiable graphs) from runtime stage failures. Stage
//! failures are carried as string descriptions so a stored run stays
//! serializable.

use thiserror::Error;

/// Error raised when a stage is dispatched while one of its declared
/// dependencies has no completed entry in the analysis context.
///
/// This is a static precondition violation, not a retry case: it indicates a
/// programming or configuration error and always aborts the run.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("stage '{stage}' requires dependency '{dependency}' which has no completed entry in the context")]
pub struct MissingDependencyError {
    /// The stage that was about to run.
    pub stage: String,
    /// The absent dependency.
    pub dependency: String,
}

impl MissingDependencyError {
    /// Creates a new missing dependency error.
    #[must_use]
    pub fn new(stage: impl Into<String>, dependency: impl Into<String>) -> Self {
        Self {
            stage: stage.into(),
            dependency: dependency.into(),
        }
    }
}

/// Error raised when a second result is written for a stage name that the
/// context already holds.
///
/// Stage results are write-once; a later pass that recomputes a value writes
/// under its own stage name instead of overwriting.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("context already holds a result for stage '{stage}'")]
pub struct ContextConflictError {
    /// The conflicting stage name.
    pub stage: String,
}

impl ContextConflictError {
    /// Creates a new context conflict error.
    #[must_use]
    pub fn new(stage: impl Into<String>) -> Self {
        Self {
            stage: stage.into(),
        }
    }
}

/// Errors detected while building or ordering the stage graph, before any
/// stage runs.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SchedulingError {
    /// A stage declares a dependency on a name not present in the graph.
    #[error("stage '{stage}' depends on unknown stage '{dependency}'")]
    UnknownDependency {
        /// The declaring stage.
        stage: String,
        /// The unknown dependency name.
        dependency: String,
    },

    /// A stage declares itself as a dependency.
    #[error("stage '{0}' cannot depend on itself")]
    SelfDependency(String),

    /// Two stages share the same name.
    #[error("duplicate stage name '{0}'")]
    DuplicateStage(String),

    /// The dependency graph contains a cycle.
    #[error("dependency cycle: {}", cycle_path.join(" -> "))]
    CycleDetected {
        /// The path of stages forming the cycle, first node repeated last.
        cycle_path: Vec<String>,
    },

    /// The graph has no stages.
    #[error("pipeline has no stages")]
    EmptyPipeline,

    /// No stage is runnable but the run is incomplete. Unreachable for a
    /// validated graph; kept as a guard against scheduler bugs.
    #[error("stage graph stalled; remaining stages: {remaining:?}")]
    Stalled {
        /// Stages that never became ready.
        remaining: Vec<String>,
    },
}

/// The top-level error returned by a pipeline run.
///
/// A caller of `run` receives either a complete report (every stage
/// completed) or exactly one of these; there is no partial-success return.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PipelineError {
    /// The stage graph is unsatisfiable.
    #[error("{0}")]
    Scheduling(#[from] SchedulingError),

    /// A declared dependency was not completed at dispatch time.
    #[error("{0}")]
    MissingDependency(#[from] MissingDependencyError),

    /// A stage reported failure; the run aborted at that stage.
    #[error("stage '{stage}' failed: {description}")]
    StageExecution {
        /// The first failing stage.
        stage: String,
        /// The failure description recorded in its stage result.
        description: String,
    },

    /// A duplicate write into the analysis context.
    #[error("{0}")]
    ContextConflict(#[from] ContextConflictError),

    /// The run was cancelled by the caller.
    #[error("analysis cancelled: {0}")]
    Cancelled(String),
}

impl PipelineError {
    /// Creates a stage execution error.
    #[must_use]
    pub fn stage_execution(stage: impl Into<String>, description: impl Into<String>) -> Self {
        Self::StageExecution {
            stage: stage.into(),
            description: description.into(),
        }
    }

    /// Returns the name of the failing stage, when the error identifies one.
    #[must_use]
    pub fn failing_stage(&self) -> Option<&str> {
        match self {
            Self::StageExecution { stage, .. } => Some(stage),
            Self::MissingDependency(err) => Some(&err.stage),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_dependency_message() {
        let err = MissingDependencyError::new("score_hypotheses", "aggregate_pathways");
        assert!(err.to_string().contains("score_hypotheses"));
        assert!(err.to_string().contains("aggregate_pathways"));
    }

    #[test]
    fn test_cycle_message_joins_path() {
        let err = SchedulingError::CycleDetected {
            cycle_path: vec!["a".to_string(), "b".to_string(), "a".to_string()],
        };
        assert_eq!(err.to_string(), "dependency cycle: a -> b -> a");
    }

    #[test]
    fn test_pipeline_error_failing_stage() {
        let err = PipelineError::stage_execution("enrich_seed", "upstream unavailable");
        assert_eq!(err.failing_stage(), Some("enrich_seed"));

        let err: PipelineError = SchedulingError::EmptyPipeline.into();
        assert_eq!(err.failing_stage(), None);
    }

    #[test]
    fn test_conversions_into_pipeline_error() {
        let err: PipelineError = MissingDependencyError::new("a", "b").into();
        assert!(matches!(err, PipelineError::MissingDependency(_)));

        let err: PipelineError = ContextConflictError::new("a").into();
        assert!(matches!(err, PipelineError::ContextConflict(_)));
    }
}
