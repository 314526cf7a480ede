//! Deterministic fixture builders.

use crate::model::{AggregatedPathway, DiscoveryRoute, PathwayHit, ScoredHypothesis};
use std::collections::BTreeMap;

/// A seed gene list matching the fixture collaborators' known genes.
#[must_use]
pub fn seed_genes() -> Vec<String> {
    vec!["TP53".to_string(), "BRCA1".to_string(), "EGFR".to_string()]
}

/// Builds an aggregated pathway with derived evidence count.
#[must_use]
pub fn pathway(
    id: &str,
    source: &str,
    p_adj: f64,
    genes: &[&str],
    support_count: u32,
) -> AggregatedPathway {
    AggregatedPathway::new(
        id,
        source,
        format!("pathway {id}"),
        p_adj,
        genes.iter().map(|g| (*g).to_string()).collect(),
        support_count,
    )
}

/// Builds an enrichment hit.
#[must_use]
pub fn hit(id: &str, source: &str, p_adj: f64, genes: &[&str], route: DiscoveryRoute) -> PathwayHit {
    PathwayHit {
        pathway_id: id.to_string(),
        source: source.to_string(),
        name: format!("pathway {id}"),
        p_adj,
        genes: genes.iter().map(|g| (*g).to_string()).collect(),
        route,
    }
}

/// Builds an unranked hypothesis with an empty breakdown.
#[must_use]
pub fn hypothesis(id: &str, source: &str, score: f64) -> ScoredHypothesis {
    ScoredHypothesis::unranked(pathway(id, source, 0.01, &["TP53"], 1), score, BTreeMap::new())
}

/// A batch of `count` distinct pathways with spread significance values, for
/// scorer tests and benchmarks.
#[must_use]
pub fn pathway_batch(count: usize) -> Vec<AggregatedPathway> {
    (0..count)
        .map(|i| {
            let source = match i % 3 {
                0 => "reactome",
                1 => "kegg",
                _ => "wikipathways",
            };
            pathway(
                &format!("P{i:04}"),
                source,
                0.05 / (i + 1) as f64,
                &["TP53", "MDM2", "BRCA1"][..=(i % 3)],
                (i % 7) as u32 + 1,
            )
        })
        .collect()
}
