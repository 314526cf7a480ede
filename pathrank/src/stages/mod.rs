//! Stage trait and the concrete analysis stages.
//!
//! Stages are the atomic scheduling elements of the pipeline. Each one holds
//! constructor-injected references to the collaborators it talks to, declares
//! its dependencies by name, and writes exactly one typed artifact into the
//! analysis context.

mod aggregate;
mod disease;
mod enrichment;
mod expression;
mod literature;
mod neighborhood;
mod scoring;
mod topology;
mod validate;

pub use aggregate::AggregatePathwaysStage;
pub use disease::MapDiseasesStage;
pub use enrichment::{EnrichNeighborhoodStage, EnrichSeedStage};
pub use expression::FetchExpressionStage;
pub use literature::FetchLiteratureStage;
pub use neighborhood::ExpandNeighborhoodStage;
pub use scoring::{RescoreHypothesesStage, ScoreHypothesesStage};
pub use topology::AnalyzeTopologyStage;
pub use validate::ValidateGenesStage;

use crate::context::StageContext;
use crate::core::StageOutput;
use async_trait::async_trait;
use std::fmt::Debug;

/// Canonical stage names; also the keys of the per-stage result map.
pub mod names {
    /// Seed gene validation.
    pub const VALIDATE_GENES: &str = "validate_genes";
    /// Interaction neighborhood expansion.
    pub const EXPAND_NEIGHBORHOOD: &str = "expand_neighborhood";
    /// Curated disease association lookup.
    pub const MAP_DISEASES: &str = "map_diseases";
    /// Tissue-expression lookup.
    pub const FETCH_EXPRESSION: &str = "fetch_expression";
    /// Enrichment of the seed gene set.
    pub const ENRICH_SEED: &str = "enrich_seed";
    /// Enrichment of the expanded neighborhood.
    pub const ENRICH_NEIGHBORHOOD: &str = "enrich_neighborhood";
    /// Cross-route pathway aggregation.
    pub const AGGREGATE_PATHWAYS: &str = "aggregate_pathways";
    /// First scoring pass.
    pub const SCORE_HYPOTHESES: &str = "score_hypotheses";
    /// Network-importance computation.
    pub const ANALYZE_TOPOLOGY: &str = "analyze_topology";
    /// Second scoring pass with topology evidence.
    pub const RESCORE_HYPOTHESES: &str = "rescore_hypotheses";
    /// Literature retrieval for top hypotheses.
    pub const FETCH_LITERATURE: &str = "fetch_literature";
}

/// A named, self-contained unit of asynchronous work.
///
/// A stage body may suspend at collaborator I/O without blocking independent
/// stages. Internal failures are converted into a failed [`StageOutput`] at
/// this boundary; the scheduler never observes a raw error from inside a
/// stage.
#[async_trait]
pub trait Stage: Send + Sync + Debug {
    /// Returns the unique name of the stage.
    fn name(&self) -> &str;

    /// Human-readable message for progress notifications.
    fn progress_message(&self) -> String {
        format!("Running {}", self.name())
    }

    /// Executes the stage against the shared context.
    async fn execute(&self, ctx: &StageContext) -> StageOutput;
}

/// A stage that completes immediately without output. Useful for exercising
/// the scheduler in tests.
#[derive(Debug, Clone)]
pub struct NoOpStage {
    name: String,
}

impl NoOpStage {
    /// Creates a new no-op stage.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

#[async_trait]
impl Stage for NoOpStage {
    fn name(&self) -> &str {
        &self.name
    }

    async fn execute(&self, _ctx: &StageContext) -> StageOutput {
        StageOutput::completed(std::collections::HashMap::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AnalysisConfig;
    use crate::context::AnalysisContext;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_noop_stage_completes() {
        let stage = NoOpStage::new("noop");
        assert_eq!(stage.name(), "noop");
        assert_eq!(stage.progress_message(), "Running noop");

        let ctx = Arc::new(AnalysisContext::new(vec![], AnalysisConfig::default()));
        let stage_ctx = StageContext::new(ctx, "noop", vec![]);
        let output = stage.execute(&stage_ctx).await;
        assert!(output.is_completed());
    }
}
