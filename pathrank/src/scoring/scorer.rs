//! Composite hypothesis scoring and the rescoring pass.

use super::DatabaseWeights;
use crate::model::{AggregatedPathway, GeneNeighborhood, ScoredHypothesis, TopologyEvidence};
use std::collections::BTreeMap;

/// Names of the score components recorded in each hypothesis breakdown.
pub mod components {
    /// `-log10(p_adj)`, clamped.
    pub const SIGNIFICANCE: &str = "significance";
    /// Evidence gene count.
    pub const EVIDENCE: &str = "evidence";
    /// Per-source database quality multiplier.
    pub const DB_WEIGHT: &str = "db_weight";
    /// Multi-route discovery bonus.
    pub const AGGREGATION_WEIGHT: &str = "aggregation_weight";
    /// Network-topology multiplier.
    pub const CENTRALITY_WEIGHT: &str = "centrality_weight";
    /// Fraction of evidence genes that are seeds or 1-hop neighbors.
    pub const PROXIMITY: &str = "proximity";
    /// Percentile of the pathway's mean importance among all gene values.
    pub const PAGERANK_PERCENTILE: &str = "pagerank_percentile";
}

/// Maximum significance component; absorbs numerical-precision zeros.
pub const SIGNIFICANCE_CAP: f64 = 50.0;

/// A reported `p_adj` of exactly 0 is treated as this value.
const P_ADJ_FLOOR: f64 = 1e-50;

/// Upper bound of the multi-route discovery bonus.
pub const AGGREGATION_WEIGHT_CAP: f64 = 1.5;

/// Support count at which the aggregation bonus saturates.
const AGGREGATION_SATURATION: f64 = 5.0;

/// Computes composite rank scores for aggregated pathways.
///
/// All five components are deterministic pure functions of the inputs, so
/// scoring the same pathways with the same evidence always yields identical
/// scores, ranks, and breakdowns.
#[derive(Debug, Clone, Default)]
pub struct CompositeScorer {
    weights: DatabaseWeights,
}

impl CompositeScorer {
    /// Creates a scorer with the given database weights.
    #[must_use]
    pub fn new(weights: DatabaseWeights) -> Self {
        Self { weights }
    }

    /// Scores and ranks a set of aggregated pathways.
    ///
    /// Without topology evidence the centrality weight is exactly 1.0 for
    /// every pathway. An empty input yields an empty ranked list.
    #[must_use]
    pub fn score(
        &self,
        pathways: &[AggregatedPathway],
        neighborhood: Option<&GeneNeighborhood>,
        topology: Option<&TopologyEvidence>,
    ) -> Vec<ScoredHypothesis> {
        let hypotheses = pathways
            .iter()
            .map(|pathway| {
                let breakdown = self.components_for(pathway, neighborhood, topology);
                let score = final_score(&breakdown);
                ScoredHypothesis::unranked(pathway.clone(), score, breakdown)
            })
            .collect();

        assign_ranks(hypotheses)
    }

    /// Recomputes every component for an existing ranked list, producing a
    /// new collection with the same pathway identities in a freshly ranked
    /// order.
    ///
    /// Newly computed component keys replace their previous values; keys this
    /// calculation does not produce (externally attached annotations) are
    /// left untouched. Running the pass twice with unchanged evidence yields
    /// an identical result.
    #[must_use]
    pub fn rescore(
        &self,
        hypotheses: &[ScoredHypothesis],
        neighborhood: Option<&GeneNeighborhood>,
        topology: Option<&TopologyEvidence>,
    ) -> Vec<ScoredHypothesis> {
        let rescored = hypotheses
            .iter()
            .map(|previous| {
                let fresh = self.components_for(&previous.pathway, neighborhood, topology);
                let mut breakdown = previous.components.clone();
                for (key, value) in fresh {
                    breakdown.insert(key, value);
                }
                let score = final_score(&breakdown);
                ScoredHypothesis::unranked(previous.pathway.clone(), score, breakdown)
            })
            .collect();

        assign_ranks(rescored)
    }

    /// Computes the component breakdown for one pathway.
    fn components_for(
        &self,
        pathway: &AggregatedPathway,
        neighborhood: Option<&GeneNeighborhood>,
        topology: Option<&TopologyEvidence>,
    ) -> BTreeMap<String, f64> {
        let (centrality, proximity, percentile) =
            centrality_weight(pathway, neighborhood, topology);

        let mut breakdown = BTreeMap::new();
        breakdown.insert(
            components::SIGNIFICANCE.to_string(),
            significance_component(pathway.p_adj),
        );
        breakdown.insert(components::EVIDENCE.to_string(), pathway.evidence_count as f64);
        breakdown.insert(
            components::DB_WEIGHT.to_string(),
            self.weights.weight_for(&pathway.source),
        );
        breakdown.insert(
            components::AGGREGATION_WEIGHT.to_string(),
            aggregation_weight(pathway.support_count),
        );
        breakdown.insert(components::CENTRALITY_WEIGHT.to_string(), centrality);
        breakdown.insert(components::PROXIMITY.to_string(), proximity);
        breakdown.insert(components::PAGERANK_PERCENTILE.to_string(), percentile);
        breakdown
    }
}

/// `-log10(p_adj)` clamped to [`SIGNIFICANCE_CAP`].
///
/// Any value at or below the 1e-50 floor (including a reported zero) maps to
/// exactly 50.0, so precision artifacts in `log10` near the floor cannot
/// leak into the component.
#[must_use]
pub fn significance_component(p_adj: f64) -> f64 {
    if p_adj <= P_ADJ_FLOOR {
        return SIGNIFICANCE_CAP;
    }
    (-p_adj.log10()).min(SIGNIFICANCE_CAP)
}

/// Logarithmically saturating multi-route bonus: 1.0 for a single route,
/// capped at 1.5 for five or more independent routes.
#[must_use]
pub fn aggregation_weight(support_count: u32) -> f64 {
    if support_count <= 1 {
        return 1.0;
    }
    let bonus = 0.5 * f64::from(support_count).ln() / AGGREGATION_SATURATION.ln();
    (1.0 + bonus).min(AGGREGATION_WEIGHT_CAP)
}

/// Centrality weight plus its proximity and percentile inputs.
///
/// Exactly 1.0 when topology evidence is absent. The percentile compares the
/// pathway's *mean* importance against the population of *individual* gene
/// values; that mixing of scales is the established behavior and is kept
/// verbatim.
fn centrality_weight(
    pathway: &AggregatedPathway,
    neighborhood: Option<&GeneNeighborhood>,
    topology: Option<&TopologyEvidence>,
) -> (f64, f64, f64) {
    let Some(topology) = topology else {
        return (1.0, 0.0, 0.0);
    };

    let proximity = neighborhood.map_or(0.0, |hood| proximity_score(pathway, hood));
    let mean = topology.mean_importance(pathway.evidence_genes.iter().map(String::as_str));
    let percentile = topology.fraction_below(mean);

    (1.0 + 0.5 * proximity + 0.3 * percentile, proximity, percentile)
}

/// Fraction of the pathway's evidence genes that are seed genes or their
/// direct neighbors. Zero for a pathway with no evidence genes.
fn proximity_score(pathway: &AggregatedPathway, neighborhood: &GeneNeighborhood) -> f64 {
    if pathway.evidence_genes.is_empty() {
        return 0.0;
    }
    let near = pathway
        .evidence_genes
        .iter()
        .filter(|gene| neighborhood.contains(gene))
        .count();
    near as f64 / pathway.evidence_genes.len() as f64
}

/// Product of the five components compressed through
/// `sign(raw) * log10(|raw| + 1)`.
///
/// The transform is monotone in the raw product, so it preserves ordering
/// while keeping the unbounded significance and evidence factors from
/// dwarfing the bounded weights in downstream comparisons.
fn final_score(breakdown: &BTreeMap<String, f64>) -> f64 {
    let raw = breakdown.get(components::SIGNIFICANCE).copied().unwrap_or(0.0)
        * breakdown.get(components::EVIDENCE).copied().unwrap_or(0.0)
        * breakdown.get(components::DB_WEIGHT).copied().unwrap_or(1.0)
        * breakdown.get(components::AGGREGATION_WEIGHT).copied().unwrap_or(1.0)
        * breakdown.get(components::CENTRALITY_WEIGHT).copied().unwrap_or(1.0);
    compress(raw)
}

fn compress(raw: f64) -> f64 {
    if raw == 0.0 {
        return 0.0;
    }
    raw.signum() * (raw.abs() + 1.0).log10()
}

/// Sorts by score descending and assigns ranks 1..=N.
///
/// The sort is stable, so score ties keep their input order; that insertion
/// order tie-break is deliberate, not incidental.
fn assign_ranks(mut hypotheses: Vec<ScoredHypothesis>) -> Vec<ScoredHypothesis> {
    hypotheses.sort_by(|a, b| b.score.total_cmp(&a.score));
    for (index, hypothesis) in hypotheses.iter_mut().enumerate() {
        hypothesis.rank = index as u32 + 1;
    }
    hypotheses
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PathwayKey;
    use pretty_assertions::assert_eq;
    use std::collections::BTreeMap as Map;

    fn pathway(id: &str, p_adj: f64, genes: &[&str], support: u32) -> AggregatedPathway {
        AggregatedPathway::new(
            id,
            "test_db",
            format!("pathway {id}"),
            p_adj,
            genes.iter().map(|g| (*g).to_string()).collect(),
            support,
        )
    }

    fn scorer() -> CompositeScorer {
        CompositeScorer::new(DatabaseWeights::empty())
    }

    #[test]
    fn test_empty_input_yields_empty_ranking() {
        let ranked = scorer().score(&[], None, None);
        assert!(ranked.is_empty());
    }

    #[test]
    fn test_significance_clamp_treats_zero_as_1e50() {
        let at_floor = significance_component(1e-50);
        let at_zero = significance_component(0.0);

        assert_eq!(at_floor, 50.0);
        assert_eq!(at_zero, at_floor);

        let tiny = significance_component(1e-300);
        assert_eq!(tiny, 50.0);
    }

    #[test]
    fn test_rank_order_follows_ascending_p_adj() {
        let pathways = vec![
            pathway("p1", 0.01, &["A", "B", "C", "D", "E"], 1),
            pathway("p2", 0.001, &["A", "B", "C", "D", "E"], 1),
            pathway("p3", 0.0001, &["A", "B", "C", "D", "E"], 1),
        ];

        let ranked = scorer().score(&pathways, None, None);

        let order: Vec<&str> = ranked.iter().map(|h| h.pathway.id.as_str()).collect();
        assert_eq!(order, vec!["p3", "p2", "p1"]);
        let ranks: Vec<u32> = ranked.iter().map(|h| h.rank).collect();
        assert_eq!(ranks, vec![1, 2, 3]);
    }

    #[test]
    fn test_aggregation_weight_saturates_at_five_routes() {
        let weights: Vec<f64> = [1, 2, 5, 10].iter().map(|s| aggregation_weight(*s)).collect();

        assert!((weights[0] - 1.0).abs() < 1e-12);
        assert!((weights[1] - 1.2153).abs() < 1e-3);
        assert!((weights[2] - 1.5).abs() < 1e-12);
        assert!((weights[3] - 1.5).abs() < 1e-12);
    }

    #[test]
    fn test_aggregation_weight_bounds() {
        for support in 1..=100 {
            let weight = aggregation_weight(support);
            assert!((1.0..=AGGREGATION_WEIGHT_CAP).contains(&weight), "support {support}");
        }
    }

    #[test]
    fn test_centrality_weight_is_exactly_one_without_topology() {
        let hood = GeneNeighborhood::new(vec!["A".to_string()], vec!["B".to_string()]);
        let pathways = vec![pathway("p1", 0.01, &["A", "B"], 1)];

        let ranked = scorer().score(&pathways, Some(&hood), None);

        assert_eq!(ranked[0].component(components::CENTRALITY_WEIGHT), Some(1.0));
    }

    #[test]
    fn test_centrality_weight_bounds() {
        let hood = GeneNeighborhood::new(vec!["A".to_string()], vec!["B".to_string()]);
        let mut values = Map::new();
        values.insert("A".to_string(), 0.1);
        values.insert("B".to_string(), 0.9);
        values.insert("C".to_string(), 0.5);
        let topology = TopologyEvidence::new(values);

        // All evidence genes near the seeds; mean above most values.
        let near = pathway("near", 0.01, &["A", "B"], 1);
        // No evidence gene in the neighborhood, mean below every value.
        let far = pathway("far", 0.01, &["X", "Y"], 1);

        let ranked = scorer().score(&[near, far], Some(&hood), Some(&topology));

        for hypothesis in &ranked {
            let weight = hypothesis
                .component(components::CENTRALITY_WEIGHT)
                .unwrap();
            assert!((1.0..=1.8).contains(&weight), "weight {weight}");
        }

        let far = ranked.iter().find(|h| h.pathway.id == "far").unwrap();
        assert_eq!(far.component(components::CENTRALITY_WEIGHT), Some(1.0));
    }

    // The percentile deliberately compares the pathway's mean importance
    // against the population of individual gene values. A pathway averaging
    // 0.5 over {0.1, 0.2, 0.9} therefore sits at the 2/3 percentile even
    // though no pathway-level distribution was ever formed.
    #[test]
    fn test_pagerank_percentile_mixes_mean_with_individual_values() {
        let mut values = Map::new();
        values.insert("A".to_string(), 0.1);
        values.insert("B".to_string(), 0.2);
        values.insert("C".to_string(), 0.9);
        let topology = TopologyEvidence::new(values);

        let pathways = vec![pathway("p1", 0.01, &["A", "C"], 1)];
        let ranked = scorer().score(&pathways, None, Some(&topology));

        let percentile = ranked[0].component(components::PAGERANK_PERCENTILE).unwrap();
        assert!((percentile - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_score_is_compressed_product() {
        // significance 2.0 (p=0.01) * evidence 5 * neutral weights = 10.
        let pathways = vec![pathway("p1", 0.01, &["A", "B", "C", "D", "E"], 1)];
        let ranked = scorer().score(&pathways, None, None);

        assert!((ranked[0].score - 11.0_f64.log10()).abs() < 1e-12);
    }

    #[test]
    fn test_db_weight_applies_per_source() {
        let scorer = CompositeScorer::new(DatabaseWeights::empty().with_weight("test_db", 2.0));
        let pathways = vec![pathway("p1", 0.01, &["A"], 1)];

        let ranked = scorer.score(&pathways, None, None);

        assert_eq!(ranked[0].component(components::DB_WEIGHT), Some(2.0));
        // raw = 2.0 * 1 * 2.0 = 4.0
        assert!((ranked[0].score - 5.0_f64.log10()).abs() < 1e-12);
    }

    #[test]
    fn test_ranks_are_contiguous_permutation() {
        let pathways: Vec<AggregatedPathway> = (0..25)
            .map(|i| pathway(&format!("p{i}"), 0.05 / (i + 1) as f64, &["A"], 1))
            .collect();

        let ranked = scorer().score(&pathways, None, None);

        let mut ranks: Vec<u32> = ranked.iter().map(|h| h.rank).collect();
        ranks.sort_unstable();
        assert_eq!(ranks, (1..=25).collect::<Vec<u32>>());
    }

    #[test]
    fn test_score_ties_keep_input_order() {
        let pathways = vec![
            pathway("first", 0.01, &["A"], 1),
            pathway("second", 0.01, &["A"], 1),
        ];

        let ranked = scorer().score(&pathways, None, None);

        assert_eq!(ranked[0].pathway.id, "first");
        assert_eq!(ranked[0].rank, 1);
        assert_eq!(ranked[1].pathway.id, "second");
        assert_eq!(ranked[1].rank, 2);
    }

    #[test]
    fn test_rescore_is_idempotent() {
        let hood = GeneNeighborhood::new(
            vec!["A".to_string()],
            vec!["B".to_string(), "C".to_string()],
        );
        let mut values = Map::new();
        values.insert("A".to_string(), 0.7);
        values.insert("B".to_string(), 0.2);
        values.insert("C".to_string(), 0.4);
        let topology = TopologyEvidence::new(values);

        let pathways = vec![
            pathway("p1", 0.001, &["A", "B"], 2),
            pathway("p2", 0.02, &["C"], 1),
            pathway("p3", 0.0005, &["A", "X"], 5),
        ];

        let scorer = scorer();
        let first = scorer.score(&pathways, Some(&hood), None);
        let once = scorer.rescore(&first, Some(&hood), Some(&topology));
        let twice = scorer.rescore(&once, Some(&hood), Some(&topology));

        assert_eq!(once, twice);
    }

    #[test]
    fn test_rescore_preserves_identity_and_external_annotations() {
        let pathways = vec![pathway("p1", 0.01, &["A"], 1), pathway("p2", 0.001, &["B"], 1)];
        let scorer = scorer();

        let first = scorer.score(&pathways, None, None);
        let annotated: Vec<ScoredHypothesis> = first
            .into_iter()
            .map(|h| h.with_component("literature_support", 7.0))
            .collect();

        let rescored = scorer.rescore(&annotated, None, None);

        let mut keys: Vec<PathwayKey> = rescored.iter().map(ScoredHypothesis::key).collect();
        keys.sort();
        let mut expected: Vec<PathwayKey> = annotated.iter().map(ScoredHypothesis::key).collect();
        expected.sort();
        assert_eq!(keys, expected);

        for hypothesis in &rescored {
            assert_eq!(hypothesis.component("literature_support"), Some(7.0));
        }
    }

    #[test]
    fn test_rescore_updates_centrality_components() {
        let mut values = Map::new();
        values.insert("A".to_string(), 0.9);
        values.insert("B".to_string(), 0.1);
        let topology = TopologyEvidence::new(values);
        let hood = GeneNeighborhood::new(vec!["A".to_string()], vec![]);

        let pathways = vec![pathway("p1", 0.01, &["A"], 1)];
        let scorer = scorer();

        let first = scorer.score(&pathways, Some(&hood), None);
        assert_eq!(first[0].component(components::CENTRALITY_WEIGHT), Some(1.0));

        let rescored = scorer.rescore(&first, Some(&hood), Some(&topology));
        let weight = rescored[0].component(components::CENTRALITY_WEIGHT).unwrap();
        // proximity 1.0, mean 0.9 -> percentile 1/2.
        assert!((weight - (1.0 + 0.5 + 0.3 * 0.5)).abs() < 1e-12);
    }
}
