//! Pipeline assembly and the run entry point.

use crate::clients::{
    DiseaseCatalog, EnrichmentClient, ExpressionClient, GeneCatalogClient,
    InteractionNetworkClient, LiteratureClient,
};
use crate::config::AnalysisConfig;
use crate::context::AnalysisContext;
use crate::core::StageResult;
use crate::errors::{PipelineError, SchedulingError};
use crate::pipeline::{StageGraph, StageGraphBuilder, StageSpec};
use crate::progress::ProgressReporter;
use crate::scoring::CompositeScorer;
use crate::stages::{
    names, AggregatePathwaysStage, AnalyzeTopologyStage, EnrichNeighborhoodStage, EnrichSeedStage,
    ExpandNeighborhoodStage, FetchExpressionStage, FetchLiteratureStage, MapDiseasesStage,
    RescoreHypothesesStage, ScoreHypothesesStage, ValidateGenesStage,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use uuid::Uuid;

/// The injected external collaborator bundle.
#[derive(Clone)]
pub struct Collaborators {
    /// Gene symbol validation.
    pub gene_catalog: Arc<dyn GeneCatalogClient>,
    /// Protein-interaction network lookups.
    pub network: Arc<dyn InteractionNetworkClient>,
    /// Pathway-enrichment lookups.
    pub enrichment: Arc<dyn EnrichmentClient>,
    /// Literature-citation lookups.
    pub literature: Arc<dyn LiteratureClient>,
    /// Tissue-expression lookups.
    pub expression: Arc<dyn ExpressionClient>,
    /// The curated gene-to-disease table.
    pub diseases: Arc<dyn DiseaseCatalog>,
}

impl std::fmt::Debug for Collaborators {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collaborators").finish_non_exhaustive()
    }
}

/// The aggregated outcome of a completed run.
///
/// Returned only when every stage completed; a failed run surfaces as a
/// [`PipelineError`] instead, with no partial-success value. The per-stage
/// map keyed by stage name is the serialization boundary for persisting a
/// run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    /// The analysis identifier.
    pub analysis_id: Uuid,
    /// When the run was created.
    pub started_at: DateTime<Utc>,
    /// Every stage's result, keyed by stage name.
    pub stages: HashMap<String, StageResult>,
    /// Warnings accumulated during the run.
    pub warnings: Vec<String>,
    /// Wall-clock duration of the run.
    pub elapsed_seconds: f64,
}

impl RunReport {
    /// Returns one stage's result.
    #[must_use]
    pub fn stage(&self, name: &str) -> Option<&StageResult> {
        self.stages.get(name)
    }

    /// True if every recorded stage completed.
    #[must_use]
    pub fn all_completed(&self) -> bool {
        self.stages.values().all(StageResult::is_completed)
    }
}

/// The fixed pathway-hypothesis analysis pipeline.
///
/// Construction wires every stage with its collaborators, builds the
/// dependency graph, and asserts acyclicity; an unsatisfiable graph never
/// produces a runnable pipeline.
#[derive(Debug)]
pub struct AnalysisPipeline {
    graph: StageGraph,
    config: AnalysisConfig,
}

impl AnalysisPipeline {
    /// Wires the analysis stages into a validated graph.
    ///
    /// # Errors
    ///
    /// Returns a [`SchedulingError`] if the stage graph fails validation.
    pub fn new(
        collaborators: Collaborators,
        config: AnalysisConfig,
    ) -> Result<Self, SchedulingError> {
        let scorer = CompositeScorer::new(config.scoring.database_weights.clone());

        let graph = StageGraphBuilder::new("pathway-hypothesis-analysis")
            .stage(StageSpec::new(Arc::new(ValidateGenesStage::new(
                collaborators.gene_catalog.clone(),
            ))))?
            .stage(
                StageSpec::new(Arc::new(ExpandNeighborhoodStage::new(
                    collaborators.network.clone(),
                )))
                .with_dependency(names::VALIDATE_GENES),
            )?
            .stage(
                StageSpec::new(Arc::new(MapDiseasesStage::new(collaborators.diseases.clone())))
                    .with_dependency(names::VALIDATE_GENES),
            )?
            .stage(
                StageSpec::new(Arc::new(FetchExpressionStage::new(
                    collaborators.expression.clone(),
                )))
                .with_dependency(names::VALIDATE_GENES),
            )?
            .stage(
                StageSpec::new(Arc::new(EnrichSeedStage::new(collaborators.enrichment.clone())))
                    .with_dependency(names::VALIDATE_GENES),
            )?
            .stage(
                StageSpec::new(Arc::new(EnrichNeighborhoodStage::new(
                    collaborators.enrichment.clone(),
                )))
                .with_dependency(names::EXPAND_NEIGHBORHOOD),
            )?
            .stage(
                StageSpec::new(Arc::new(AggregatePathwaysStage::new()))
                    .with_dependencies([names::ENRICH_SEED, names::ENRICH_NEIGHBORHOOD]),
            )?
            .stage(
                StageSpec::new(Arc::new(ScoreHypothesesStage::new(scorer.clone())))
                    .with_dependencies([names::AGGREGATE_PATHWAYS, names::EXPAND_NEIGHBORHOOD]),
            )?
            .stage(
                StageSpec::new(Arc::new(AnalyzeTopologyStage::new(collaborators.network.clone())))
                    .with_dependency(names::EXPAND_NEIGHBORHOOD),
            )?
            .stage(
                StageSpec::new(Arc::new(RescoreHypothesesStage::new(scorer)))
                    .with_dependencies([names::SCORE_HYPOTHESES, names::ANALYZE_TOPOLOGY]),
            )?
            .stage(
                StageSpec::new(Arc::new(FetchLiteratureStage::new(
                    collaborators.literature.clone(),
                )))
                .with_dependency(names::RESCORE_HYPOTHESES),
            )?
            .build()?;

        Ok(Self { graph, config })
    }

    /// Returns the deterministic execution order of the pipeline.
    #[must_use]
    pub fn execution_order(&self) -> &[String] {
        self.graph.execution_order()
    }

    /// Returns the run-scoped configuration.
    #[must_use]
    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Runs the full analysis for a set of seed genes.
    ///
    /// # Errors
    ///
    /// Returns a [`PipelineError`] identifying the first failing stage; on
    /// error no partial report is produced.
    pub async fn run(
        &self,
        seed_genes: Vec<String>,
        reporter: Arc<dyn ProgressReporter>,
    ) -> Result<RunReport, PipelineError> {
        let ctx = Arc::new(AnalysisContext::new(seed_genes, self.config.clone()));
        self.run_with_context(ctx, reporter).await
    }

    /// Runs against a caller-created context, allowing the caller to retain a
    /// cancellation handle.
    ///
    /// # Errors
    ///
    /// Returns a [`PipelineError`] identifying the first failing stage.
    pub async fn run_with_context(
        &self,
        ctx: Arc<AnalysisContext>,
        reporter: Arc<dyn ProgressReporter>,
    ) -> Result<RunReport, PipelineError> {
        let started = Instant::now();
        tracing::info!(
            analysis_id = %ctx.analysis_id(),
            seed_genes = ctx.seed_genes().len(),
            "starting analysis run"
        );

        self.graph.execute(ctx.clone(), reporter).await?;

        let report = RunReport {
            analysis_id: ctx.analysis_id(),
            started_at: ctx.run().started_at,
            stages: ctx.results(),
            warnings: ctx.warnings(),
            elapsed_seconds: started.elapsed().as_secs_f64(),
        };
        tracing::info!(
            analysis_id = %report.analysis_id,
            elapsed_seconds = report.elapsed_seconds,
            warnings = report.warnings.len(),
            "analysis run completed"
        );
        Ok(report)
    }
}
