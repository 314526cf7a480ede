//! Literature retrieval for top-ranked hypotheses.

use super::{names, Stage};
use crate::clients::{ClientError, LiteratureClient};
use crate::context::StageContext;
use crate::core::{StageArtifact, StageOutput};
use crate::model::PathwayCitations;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

/// Fetches citations for the top-N hypotheses of the final ranking.
///
/// A pathway with no literature coverage (`NotFound`) is recorded with an
/// empty citation list and a run warning; any other collaborator failure
/// fails the stage.
pub struct FetchLiteratureStage {
    literature: Arc<dyn LiteratureClient>,
}

impl FetchLiteratureStage {
    /// Creates the stage with its literature collaborator.
    #[must_use]
    pub fn new(literature: Arc<dyn LiteratureClient>) -> Self {
        Self { literature }
    }

    async fn run(&self, ctx: &StageContext) -> Result<StageOutput, ClientError> {
        let Some(ranked) = ctx.analysis().rescored_hypotheses() else {
            return Ok(StageOutput::failed("final ranking missing from context"));
        };

        let top_n = ctx.analysis().config().literature_top_n;
        let mut collected = Vec::new();
        let mut citation_total = 0usize;

        for hypothesis in ranked.iter().take(top_n) {
            let key = hypothesis.key();
            let citations = match self
                .literature
                .citations_for_pathway(&key, &hypothesis.pathway.evidence_genes)
                .await
            {
                Ok(citations) => citations,
                Err(err) if err.is_not_found() => {
                    ctx.analysis()
                        .push_warning(format!("no literature coverage for {key}"));
                    Vec::new()
                }
                Err(err) => return Err(err),
            };
            citation_total += citations.len();
            collected.push(PathwayCitations {
                pathway: key,
                citations,
            });
        }

        let mut payload = HashMap::new();
        payload.insert("pathways_queried".to_string(), serde_json::json!(collected.len()));
        payload.insert("citation_count".to_string(), serde_json::json!(citation_total));

        Ok(StageOutput::completed_with(
            StageArtifact::Citations(Arc::new(collected)),
            payload,
        ))
    }
}

impl std::fmt::Debug for FetchLiteratureStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FetchLiteratureStage").finish_non_exhaustive()
    }
}

#[async_trait]
impl Stage for FetchLiteratureStage {
    fn name(&self) -> &str {
        names::FETCH_LITERATURE
    }

    fn progress_message(&self) -> String {
        "Fetching supporting literature".to_string()
    }

    async fn execute(&self, ctx: &StageContext) -> StageOutput {
        match self.run(ctx).await {
            Ok(output) => output,
            Err(err) => StageOutput::failed(err.to_string()),
        }
    }
}
