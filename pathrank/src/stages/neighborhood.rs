//! Interaction neighborhood expansion.

use super::{names, Stage};
use crate::clients::{ClientError, InteractionNetworkClient};
use crate::context::StageContext;
use crate::core::{StageArtifact, StageOutput};
use crate::model::GeneNeighborhood;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

/// Expands the validated seed set to its direct (1-hop) interaction
/// neighborhood.
///
/// Hub genes can drag in very large neighbor sets; the expansion is capped at
/// the configured maximum, keeping the lexicographically first neighbors so
/// the cut is deterministic.
pub struct ExpandNeighborhoodStage {
    network: Arc<dyn InteractionNetworkClient>,
}

impl ExpandNeighborhoodStage {
    /// Creates the stage with its network collaborator.
    #[must_use]
    pub fn new(network: Arc<dyn InteractionNetworkClient>) -> Self {
        Self { network }
    }

    async fn run(&self, ctx: &StageContext) -> Result<StageOutput, ClientError> {
        let Some(validated) = ctx.analysis().validated_genes() else {
            return Ok(StageOutput::failed("validated gene list missing from context"));
        };

        let hood = self.network.neighborhood(&validated.accepted).await?;

        let cap = ctx.analysis().config().max_neighborhood_genes;
        let seeds: Vec<String> = hood.seeds().iter().cloned().collect();
        let mut neighbors: Vec<String> = hood.neighbors().iter().cloned().collect();
        let truncated = neighbors.len() > cap;
        if truncated {
            ctx.analysis().push_warning(format!(
                "neighborhood truncated from {} to {cap} genes",
                neighbors.len()
            ));
            neighbors.truncate(cap);
        }
        let hood = GeneNeighborhood::new(seeds, neighbors);

        let mut payload = HashMap::new();
        payload.insert("seed_count".to_string(), serde_json::json!(hood.seeds().len()));
        payload.insert("neighbor_count".to_string(), serde_json::json!(hood.neighbors().len()));
        payload.insert("truncated".to_string(), serde_json::json!(truncated));

        Ok(StageOutput::completed_with(
            StageArtifact::Neighborhood(Arc::new(hood)),
            payload,
        ))
    }
}

impl std::fmt::Debug for ExpandNeighborhoodStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExpandNeighborhoodStage").finish_non_exhaustive()
    }
}

#[async_trait]
impl Stage for ExpandNeighborhoodStage {
    fn name(&self) -> &str {
        names::EXPAND_NEIGHBORHOOD
    }

    fn progress_message(&self) -> String {
        "Expanding interaction neighborhood".to_string()
    }

    async fn execute(&self, ctx: &StageContext) -> StageOutput {
        match self.run(ctx).await {
            Ok(output) => output,
            Err(err) => StageOutput::failed(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::MockInteractionNetworkClient;
    use crate::config::AnalysisConfig;
    use crate::context::AnalysisContext;
    use crate::core::StageResult;
    use crate::model::ValidatedGenes;

    fn ctx_with_validated(config: AnalysisConfig) -> StageContext {
        let ctx = Arc::new(AnalysisContext::new(vec![], config));
        let output = StageOutput::completed_with(
            StageArtifact::ValidatedGenes(Arc::new(ValidatedGenes::accepted_only(vec![
                "TP53".to_string(),
            ]))),
            HashMap::new(),
        );
        let artifact = output.artifact.clone();
        ctx.record(StageResult::from_output(names::VALIDATE_GENES, &output), artifact)
            .unwrap();
        StageContext::new(ctx, names::EXPAND_NEIGHBORHOOD, vec![names::VALIDATE_GENES.to_string()])
    }

    #[tokio::test]
    async fn test_expands_neighborhood() {
        let mut mock = MockInteractionNetworkClient::new();
        mock.expect_neighborhood().returning(|genes| {
            Ok(GeneNeighborhood::new(
                genes.to_vec(),
                vec!["MDM2".to_string(), "CDKN1A".to_string()],
            ))
        });
        let stage = ExpandNeighborhoodStage::new(Arc::new(mock));
        let ctx = ctx_with_validated(AnalysisConfig::default());

        let output = stage.execute(&ctx).await;

        assert!(output.is_completed());
        let hood = output.artifact.unwrap().as_neighborhood().unwrap();
        assert!(hood.contains("TP53"));
        assert!(hood.contains("MDM2"));
        assert_eq!(hood.neighbors().len(), 2);
    }

    #[tokio::test]
    async fn test_caps_oversized_neighborhood() {
        let mut mock = MockInteractionNetworkClient::new();
        mock.expect_neighborhood().returning(|genes| {
            let neighbors = (0..40).map(|i| format!("G{i:03}"));
            Ok(GeneNeighborhood::new(genes.to_vec(), neighbors.collect::<Vec<_>>()))
        });
        let stage = ExpandNeighborhoodStage::new(Arc::new(mock));

        let config = AnalysisConfig {
            max_neighborhood_genes: 10,
            ..AnalysisConfig::default()
        };
        let ctx = ctx_with_validated(config);

        let output = stage.execute(&ctx).await;

        let hood = output.artifact.unwrap().as_neighborhood().unwrap();
        assert_eq!(hood.neighbors().len(), 10);
        assert!(!ctx.analysis().warnings().is_empty());
    }

    #[tokio::test]
    async fn test_missing_validated_genes_fails() {
        let mock = MockInteractionNetworkClient::new();
        let stage = ExpandNeighborhoodStage::new(Arc::new(mock));
        let ctx = StageContext::new(
            Arc::new(AnalysisContext::new(vec![], AnalysisConfig::default())),
            names::EXPAND_NEIGHBORHOOD,
            vec![],
        );

        let output = stage.execute(&ctx).await;
        assert!(output.is_failure());
    }
}
