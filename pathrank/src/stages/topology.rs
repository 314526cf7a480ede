//! Network-importance computation over the expanded neighborhood.

use super::{names, Stage};
use crate::clients::{ClientError, InteractionNetworkClient};
use crate::context::StageContext;
use crate::core::{StageArtifact, StageOutput};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

/// Fetches per-gene network-importance values for every gene in the expanded
/// neighborhood. The rescoring pass consumes this evidence.
pub struct AnalyzeTopologyStage {
    network: Arc<dyn InteractionNetworkClient>,
}

impl AnalyzeTopologyStage {
    /// Creates the stage with its network collaborator.
    #[must_use]
    pub fn new(network: Arc<dyn InteractionNetworkClient>) -> Self {
        Self { network }
    }

    async fn run(&self, ctx: &StageContext) -> Result<StageOutput, ClientError> {
        let Some(hood) = ctx.analysis().neighborhood() else {
            return Ok(StageOutput::failed("gene neighborhood missing from context"));
        };

        let topology = self.network.network_importance(&hood.all_genes()).await?;

        let mut payload = HashMap::new();
        payload.insert("gene_count".to_string(), serde_json::json!(topology.len()));

        Ok(StageOutput::completed_with(
            StageArtifact::Topology(Arc::new(topology)),
            payload,
        ))
    }
}

impl std::fmt::Debug for AnalyzeTopologyStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnalyzeTopologyStage").finish_non_exhaustive()
    }
}

#[async_trait]
impl Stage for AnalyzeTopologyStage {
    fn name(&self) -> &str {
        names::ANALYZE_TOPOLOGY
    }

    fn progress_message(&self) -> String {
        "Computing network importance".to_string()
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
    use crate::model::{GeneNeighborhood, TopologyEvidence};
    use std::collections::BTreeMap;

    fn ctx_with_neighborhood() -> StageContext {
        let ctx = Arc::new(AnalysisContext::new(vec![], AnalysisConfig::default()));
        let hood = GeneNeighborhood::new(vec!["TP53".to_string()], vec!["MDM2".to_string()]);
        let output = StageOutput::completed_with(
            StageArtifact::Neighborhood(Arc::new(hood)),
            HashMap::new(),
        );
        let artifact = output.artifact.clone();
        ctx.record(
            StageResult::from_output(names::EXPAND_NEIGHBORHOOD, &output),
            artifact,
        )
        .unwrap();
        StageContext::new(
            ctx,
            names::ANALYZE_TOPOLOGY,
            vec![names::EXPAND_NEIGHBORHOOD.to_string()],
        )
    }

    #[tokio::test]
    async fn test_fetches_importance_for_neighborhood() {
        let mut mock = MockInteractionNetworkClient::new();
        mock.expect_network_importance().returning(|genes| {
            let values: BTreeMap<String, f64> = genes
                .iter()
                .enumerate()
                .map(|(i, g)| (g.clone(), (i + 1) as f64 / 10.0))
                .collect();
            Ok(TopologyEvidence::new(values))
        });
        let stage = AnalyzeTopologyStage::new(Arc::new(mock));
        let ctx = ctx_with_neighborhood();

        let output = stage.execute(&ctx).await;

        assert!(output.is_completed());
        let topology = output.artifact.unwrap().as_topology().unwrap();
        assert_eq!(topology.len(), 2);
        assert!(topology.importance_of("TP53").is_some());
    }

    #[tokio::test]
    async fn test_client_failure_fails_stage() {
        let mut mock = MockInteractionNetworkClient::new();
        mock.expect_network_importance()
            .returning(|_| Err(ClientError::Unavailable("graph service down".to_string())));
        let stage = AnalyzeTopologyStage::new(Arc::new(mock));
        let ctx = ctx_with_neighborhood();

        let output = stage.execute(&ctx).await;
        assert!(output.is_failure());
    }
}
