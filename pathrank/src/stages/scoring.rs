//! The two scoring passes.

use super::{names, Stage};
use crate::context::StageContext;
use crate::core::{StageArtifact, StageOutput};
use crate::model::ScoredHypothesis;
use crate::scoring::CompositeScorer;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

fn ranking_payload(hypotheses: &[ScoredHypothesis]) -> HashMap<String, serde_json::Value> {
    let mut payload = HashMap::new();
    payload.insert("hypothesis_count".to_string(), serde_json::json!(hypotheses.len()));
    if let Some(top) = hypotheses.first() {
        payload.insert("top_pathway".to_string(), serde_json::json!(top.key().to_string()));
        payload.insert("top_score".to_string(), serde_json::json!(top.score));
    }
    payload
}

/// First scoring pass: ranks aggregated pathways with the evidence available
/// before topology analysis (neighborhood only, centrality weight 1.0).
#[derive(Debug)]
pub struct ScoreHypothesesStage {
    scorer: CompositeScorer,
}

impl ScoreHypothesesStage {
    /// Creates the stage with its scorer.
    #[must_use]
    pub fn new(scorer: CompositeScorer) -> Self {
        Self { scorer }
    }
}

#[async_trait]
impl Stage for ScoreHypothesesStage {
    fn name(&self) -> &str {
        names::SCORE_HYPOTHESES
    }

    fn progress_message(&self) -> String {
        "Scoring pathway hypotheses".to_string()
    }

    async fn execute(&self, ctx: &StageContext) -> StageOutput {
        let Some(pathways) = ctx.analysis().aggregated_pathways() else {
            return StageOutput::failed("aggregated pathways missing from context");
        };
        let Some(hood) = ctx.analysis().neighborhood() else {
            return StageOutput::failed("gene neighborhood missing from context");
        };

        let ranked = self.scorer.score(&pathways, Some(&hood), None);
        let payload = ranking_payload(&ranked);

        StageOutput::completed_with(StageArtifact::RankedHypotheses(Arc::new(ranked)), payload)
    }
}

/// Second scoring pass, run once topology evidence exists.
///
/// Recomputes every component for the first pass's hypotheses and produces a
/// freshly ranked collection under its own stage name; the first pass's
/// entry is superseded, never mutated.
#[derive(Debug)]
pub struct RescoreHypothesesStage {
    scorer: CompositeScorer,
}

impl RescoreHypothesesStage {
    /// Creates the stage with its scorer. Must be configured identically to
    /// the first pass so the two passes stay numerically consistent.
    #[must_use]
    pub fn new(scorer: CompositeScorer) -> Self {
        Self { scorer }
    }
}

#[async_trait]
impl Stage for RescoreHypothesesStage {
    fn name(&self) -> &str {
        names::RESCORE_HYPOTHESES
    }

    fn progress_message(&self) -> String {
        "Rescoring hypotheses with topology evidence".to_string()
    }

    async fn execute(&self, ctx: &StageContext) -> StageOutput {
        let Some(hypotheses) = ctx.analysis().hypotheses() else {
            return StageOutput::failed("first-pass hypotheses missing from context");
        };
        let Some(topology) = ctx.analysis().topology() else {
            return StageOutput::failed("topology evidence missing from context");
        };
        let hood = ctx.analysis().neighborhood();

        let ranked = self
            .scorer
            .rescore(&hypotheses, hood.as_deref(), Some(&topology));
        let payload = ranking_payload(&ranked);

        StageOutput::completed_with(StageArtifact::RankedHypotheses(Arc::new(ranked)), payload)
    }
}
