//! The shared analysis context and per-stage view.

use super::RunIdentity;
use crate::config::AnalysisConfig;
use crate::core::{StageArtifact, StageResult, StageStatus};
use crate::errors::ContextConflictError;
use crate::model::{
    AggregatedPathway, GeneNeighborhood, PathwayHit, ScoredHypothesis, TopologyEvidence,
    ValidatedGenes,
};
use crate::stages::names;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use uuid::Uuid;

/// The shared state of one pipeline run.
///
/// Owned by exactly one scheduler for the run's duration; never shared
/// across analyses. Grows monotonically: each completed stage adds one result
/// entry and at most one artifact entry, both write-once. Siblings in a
/// parallel group write disjoint stage names, so a conflict here indicates a
/// scheduler bug rather than a race to be retried.
pub struct AnalysisContext {
    run: RunIdentity,
    seed_genes: Vec<String>,
    config: AnalysisConfig,
    results: RwLock<HashMap<String, StageResult>>,
    artifacts: RwLock<HashMap<String, Arc<StageArtifact>>>,
    warnings: RwLock<Vec<String>>,
    cancelled: AtomicBool,
}

impl AnalysisContext {
    /// Creates a context for a fresh run.
    #[must_use]
    pub fn new(seed_genes: Vec<String>, config: AnalysisConfig) -> Self {
        Self {
            run: RunIdentity::new(),
            seed_genes,
            config,
            results: RwLock::new(HashMap::new()),
            artifacts: RwLock::new(HashMap::new()),
            warnings: RwLock::new(Vec::new()),
            cancelled: AtomicBool::new(false),
        }
    }

    /// Returns the run identity.
    #[must_use]
    pub fn run(&self) -> &RunIdentity {
        &self.run
    }

    /// Returns the analysis identifier.
    #[must_use]
    pub fn analysis_id(&self) -> Uuid {
        self.run.analysis_id
    }

    /// Returns the caller-supplied seed genes.
    #[must_use]
    pub fn seed_genes(&self) -> &[String] {
        &self.seed_genes
    }

    /// Returns the run-scoped configuration.
    #[must_use]
    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Records a stage's terminal result and optional typed artifact.
    ///
    /// # Errors
    ///
    /// Returns `ContextConflictError` if the stage already has an entry.
    pub fn record(
        &self,
        result: StageResult,
        artifact: Option<StageArtifact>,
    ) -> Result<(), ContextConflictError> {
        let stage = result.stage.clone();
        {
            let mut results = self.results.write();
            if results.contains_key(&stage) {
                return Err(ContextConflictError::new(&stage));
            }
            results.insert(stage.clone(), result);
        }
        if let Some(artifact) = artifact {
            self.artifacts.write().insert(stage, Arc::new(artifact));
        }
        Ok(())
    }

    /// Returns the recorded result for a stage.
    #[must_use]
    pub fn result_of(&self, stage: &str) -> Option<StageResult> {
        self.results.read().get(stage).cloned()
    }

    /// Returns the recorded status for a stage.
    #[must_use]
    pub fn status_of(&self, stage: &str) -> Option<StageStatus> {
        self.results.read().get(stage).map(|r| r.status)
    }

    /// True if the stage has a completed entry.
    #[must_use]
    pub fn is_completed(&self, stage: &str) -> bool {
        self.status_of(stage).is_some_and(|s| s.is_completed())
    }

    /// Snapshot of all recorded results, keyed by stage name. This map is the
    /// serialization boundary for persisting a run.
    #[must_use]
    pub fn results(&self) -> HashMap<String, StageResult> {
        self.results.read().clone()
    }

    /// Number of recorded results.
    #[must_use]
    pub fn result_count(&self) -> usize {
        self.results.read().len()
    }

    /// Returns the typed artifact recorded by a stage.
    #[must_use]
    pub fn artifact(&self, stage: &str) -> Option<Arc<StageArtifact>> {
        self.artifacts.read().get(stage).cloned()
    }

    /// Appends a run warning.
    pub fn push_warning(&self, warning: impl Into<String>) {
        self.warnings.write().push(warning.into());
    }

    /// Snapshot of accumulated warnings.
    #[must_use]
    pub fn warnings(&self) -> Vec<String> {
        self.warnings.read().clone()
    }

    /// Marks the run as cancelled. The scheduler aborts at the next
    /// completion boundary; no partial result is considered valid.
    pub fn mark_cancelled(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// True if the run has been cancelled.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Validated seed genes, once the validation stage has completed.
    #[must_use]
    pub fn validated_genes(&self) -> Option<Arc<ValidatedGenes>> {
        self.artifact(names::VALIDATE_GENES)?.as_validated_genes()
    }

    /// Expanded interaction neighborhood, once available.
    #[must_use]
    pub fn neighborhood(&self) -> Option<Arc<GeneNeighborhood>> {
        self.artifact(names::EXPAND_NEIGHBORHOOD)?.as_neighborhood()
    }

    /// Enrichment hits recorded by the named enrichment stage.
    #[must_use]
    pub fn enrichment_hits(&self, stage: &str) -> Option<Arc<Vec<PathwayHit>>> {
        self.artifact(stage)?.as_enrichment_hits()
    }

    /// Aggregated pathways, once available.
    #[must_use]
    pub fn aggregated_pathways(&self) -> Option<Arc<Vec<AggregatedPathway>>> {
        self.artifact(names::AGGREGATE_PATHWAYS)?.as_aggregated_pathways()
    }

    /// First-pass ranked hypotheses, once available.
    #[must_use]
    pub fn hypotheses(&self) -> Option<Arc<Vec<ScoredHypothesis>>> {
        self.artifact(names::SCORE_HYPOTHESES)?.as_ranked_hypotheses()
    }

    /// Final (rescored) ranked hypotheses, once available.
    #[must_use]
    pub fn rescored_hypotheses(&self) -> Option<Arc<Vec<ScoredHypothesis>>> {
        self.artifact(names::RESCORE_HYPOTHESES)?.as_ranked_hypotheses()
    }

    /// Per-gene network importance, once the topology stage has completed.
    #[must_use]
    pub fn topology(&self) -> Option<Arc<TopologyEvidence>> {
        self.artifact(names::ANALYZE_TOPOLOGY)?.as_topology()
    }
}

impl std::fmt::Debug for AnalysisContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnalysisContext")
            .field("analysis_id", &self.run.analysis_id)
            .field("seed_genes", &self.seed_genes.len())
            .field("results", &self.result_count())
            .finish_non_exhaustive()
    }
}

/// The view a single stage execution receives.
#[derive(Debug, Clone)]
pub struct StageContext {
    analysis: Arc<AnalysisContext>,
    stage_name: String,
    dependencies: Vec<String>,
}

impl StageContext {
    /// Creates a stage context.
    #[must_use]
    pub fn new(
        analysis: Arc<AnalysisContext>,
        stage_name: impl Into<String>,
        dependencies: Vec<String>,
    ) -> Self {
        Self {
            analysis,
            stage_name: stage_name.into(),
            dependencies,
        }
    }

    /// Returns the shared analysis context.
    #[must_use]
    pub fn analysis(&self) -> &AnalysisContext {
        &self.analysis
    }

    /// Returns the executing stage's name.
    #[must_use]
    pub fn stage_name(&self) -> &str {
        &self.stage_name
    }

    /// Returns the stage's declared dependencies.
    #[must_use]
    pub fn dependencies(&self) -> &[String] {
        &self.dependencies
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{payload_entry, StageOutput};

    fn completed_result(stage: &str) -> StageResult {
        StageResult::from_output(stage, &StageOutput::completed(payload_entry(
            "ok",
            serde_json::json!(true),
        )))
    }

    #[test]
    fn test_record_is_write_once() {
        let ctx = AnalysisContext::new(vec!["TP53".to_string()], AnalysisConfig::default());

        ctx.record(completed_result("validate_genes"), None).unwrap();
        let err = ctx.record(completed_result("validate_genes"), None);

        assert_eq!(err, Err(ContextConflictError::new("validate_genes")));
        assert_eq!(ctx.result_count(), 1);
    }

    #[test]
    fn test_status_and_completion_queries() {
        let ctx = AnalysisContext::new(vec![], AnalysisConfig::default());
        assert!(ctx.status_of("validate_genes").is_none());
        assert!(!ctx.is_completed("validate_genes"));

        ctx.record(completed_result("validate_genes"), None).unwrap();

        assert_eq!(ctx.status_of("validate_genes"), Some(StageStatus::Completed));
        assert!(ctx.is_completed("validate_genes"));
    }

    #[test]
    fn test_failed_entry_does_not_count_as_completed() {
        let ctx = AnalysisContext::new(vec![], AnalysisConfig::default());
        let failed = StageResult::from_output("enrich_seed", &StageOutput::failed("boom"));

        ctx.record(failed, None).unwrap();

        assert!(!ctx.is_completed("enrich_seed"));
        assert_eq!(ctx.status_of("enrich_seed"), Some(StageStatus::Failed));
    }

    #[test]
    fn test_typed_accessor_returns_artifact() {
        let ctx = AnalysisContext::new(vec![], AnalysisConfig::default());
        let genes = ValidatedGenes::accepted_only(vec!["TP53".to_string()]);

        ctx.record(
            completed_result(names::VALIDATE_GENES),
            Some(StageArtifact::ValidatedGenes(Arc::new(genes))),
        )
        .unwrap();

        let read = ctx.validated_genes().unwrap();
        assert_eq!(read.accepted, vec!["TP53"]);
        assert!(ctx.neighborhood().is_none());
    }

    #[test]
    fn test_warnings_accumulate() {
        let ctx = AnalysisContext::new(vec![], AnalysisConfig::default());
        ctx.push_warning("symbol 'XYZ' rejected");
        ctx.push_warning("no citations for reactome:R-HSA-1");

        assert_eq!(ctx.warnings().len(), 2);
    }

    #[test]
    fn test_cancellation_flag() {
        let ctx = AnalysisContext::new(vec![], AnalysisConfig::default());
        assert!(!ctx.is_cancelled());
        ctx.mark_cancelled();
        assert!(ctx.is_cancelled());
    }
}
