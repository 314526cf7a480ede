//! Cross-route pathway aggregation.

use super::{names, Stage};
use crate::context::StageContext;
use crate::core::{StageArtifact, StageOutput};
use crate::model::{AggregatedPathway, PathwayHit, PathwayKey};
use async_trait::async_trait;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::Arc;

/// Consolidates enrichment hits from all discovery routes into aggregated
/// pathways.
///
/// Hits sharing a pathway identity merge into one entry: evidence genes are
/// unioned (sorted, deduplicated), the best p_adj wins, and the support count
/// is the number of distinct routes that found the pathway. First-seen order
/// of identities is preserved so downstream tie-breaks stay deterministic.
#[derive(Debug, Clone, Default)]
pub struct AggregatePathwaysStage;

impl AggregatePathwaysStage {
    /// Creates the stage.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

/// Merges hits by pathway identity.
#[must_use]
pub fn aggregate_hits(hits: &[PathwayHit]) -> Vec<AggregatedPathway> {
    struct Entry {
        name: String,
        p_adj: f64,
        genes: BTreeSet<String>,
        routes: HashSet<String>,
    }

    let mut order: Vec<PathwayKey> = Vec::new();
    let mut entries: HashMap<PathwayKey, Entry> = HashMap::new();

    for hit in hits {
        let key = hit.key();
        let entry = entries.entry(key.clone()).or_insert_with(|| {
            order.push(key);
            Entry {
                name: hit.name.clone(),
                p_adj: hit.p_adj,
                genes: BTreeSet::new(),
                routes: HashSet::new(),
            }
        });
        entry.p_adj = entry.p_adj.min(hit.p_adj);
        entry.genes.extend(hit.genes.iter().cloned());
        entry.routes.insert(hit.route.to_string());
    }

    order
        .into_iter()
        .filter_map(|key| {
            entries.remove(&key).map(|entry| {
                AggregatedPathway::new(
                    key.id,
                    key.source,
                    entry.name,
                    entry.p_adj,
                    entry.genes.into_iter().collect(),
                    entry.routes.len() as u32,
                )
            })
        })
        .collect()
}

#[async_trait]
impl Stage for AggregatePathwaysStage {
    fn name(&self) -> &str {
        names::AGGREGATE_PATHWAYS
    }

    fn progress_message(&self) -> String {
        "Aggregating pathways across discovery routes".to_string()
    }

    async fn execute(&self, ctx: &StageContext) -> StageOutput {
        let Some(seed_hits) = ctx.analysis().enrichment_hits(names::ENRICH_SEED) else {
            return StageOutput::failed("seed enrichment hits missing from context");
        };
        let Some(hood_hits) = ctx.analysis().enrichment_hits(names::ENRICH_NEIGHBORHOOD) else {
            return StageOutput::failed("neighborhood enrichment hits missing from context");
        };

        let mut combined: Vec<PathwayHit> = Vec::with_capacity(seed_hits.len() + hood_hits.len());
        combined.extend(seed_hits.iter().cloned());
        combined.extend(hood_hits.iter().cloned());

        let aggregated = aggregate_hits(&combined);
        let multi_route = aggregated.iter().filter(|p| p.support_count > 1).count();

        let mut payload = HashMap::new();
        payload.insert("pathway_count".to_string(), serde_json::json!(aggregated.len()));
        payload.insert("multi_route_count".to_string(), serde_json::json!(multi_route));

        StageOutput::completed_with(
            StageArtifact::AggregatedPathways(Arc::new(aggregated)),
            payload,
        )
    }
}
