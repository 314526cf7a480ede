//! Pathway enrichment of the seed set and the expanded neighborhood.

use super::{names, Stage};
use crate::clients::{ClientError, EnrichmentClient};
use crate::context::StageContext;
use crate::core::{StageArtifact, StageOutput};
use crate::model::DiscoveryRoute;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

async fn enrich_genes(
    client: &dyn EnrichmentClient,
    genes: &[String],
    route: DiscoveryRoute,
) -> Result<StageOutput, ClientError> {
    let mut hits = client.enrich(genes).await?;
    for hit in &mut hits {
        hit.route = route;
    }

    let mut payload = HashMap::new();
    payload.insert("query_gene_count".to_string(), serde_json::json!(genes.len()));
    payload.insert("hit_count".to_string(), serde_json::json!(hits.len()));
    payload.insert("route".to_string(), serde_json::json!(route.to_string()));

    Ok(StageOutput::completed_with(
        StageArtifact::EnrichmentHits(Arc::new(hits)),
        payload,
    ))
}

/// Enriches the validated seed genes; the primary discovery route.
pub struct EnrichSeedStage {
    enrichment: Arc<dyn EnrichmentClient>,
}

impl EnrichSeedStage {
    /// Creates the stage with its enrichment collaborator.
    #[must_use]
    pub fn new(enrichment: Arc<dyn EnrichmentClient>) -> Self {
        Self { enrichment }
    }
}

impl std::fmt::Debug for EnrichSeedStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnrichSeedStage").finish_non_exhaustive()
    }
}

#[async_trait]
impl Stage for EnrichSeedStage {
    fn name(&self) -> &str {
        names::ENRICH_SEED
    }

    fn progress_message(&self) -> String {
        "Enriching seed genes".to_string()
    }

    async fn execute(&self, ctx: &StageContext) -> StageOutput {
        let Some(validated) = ctx.analysis().validated_genes() else {
            return StageOutput::failed("validated gene list missing from context");
        };
        match enrich_genes(
            self.enrichment.as_ref(),
            &validated.accepted,
            DiscoveryRoute::SeedEnrichment,
        )
        .await
        {
            Ok(output) => output,
            Err(err) => StageOutput::failed(err.to_string()),
        }
    }
}

/// Enriches the expanded neighborhood; the secondary discovery route.
pub struct EnrichNeighborhoodStage {
    enrichment: Arc<dyn EnrichmentClient>,
}

impl EnrichNeighborhoodStage {
    /// Creates the stage with its enrichment collaborator.
    #[must_use]
    pub fn new(enrichment: Arc<dyn EnrichmentClient>) -> Self {
        Self { enrichment }
    }
}

impl std::fmt::Debug for EnrichNeighborhoodStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnrichNeighborhoodStage").finish_non_exhaustive()
    }
}

#[async_trait]
impl Stage for EnrichNeighborhoodStage {
    fn name(&self) -> &str {
        names::ENRICH_NEIGHBORHOOD
    }

    fn progress_message(&self) -> String {
        "Enriching neighborhood genes".to_string()
    }

    async fn execute(&self, ctx: &StageContext) -> StageOutput {
        let Some(hood) = ctx.analysis().neighborhood() else {
            return StageOutput::failed("gene neighborhood missing from context");
        };
        match enrich_genes(
            self.enrichment.as_ref(),
            &hood.all_genes(),
            DiscoveryRoute::NeighborhoodEnrichment,
        )
        .await
        {
            Ok(output) => output,
            Err(err) => StageOutput::failed(err.to_string()),
        }
    }
}
