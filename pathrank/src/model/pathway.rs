//! Pathway identity, enrichment hits, and aggregation model.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of a pathway: its id within a source database plus the database
/// itself. Two hits with the same key describe the same pathway regardless of
/// which discovery route found them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PathwayKey {
    /// The pathway identifier within its source database.
    pub id: String,
    /// The source database name.
    pub source: String,
}

impl PathwayKey {
    /// Creates a new pathway key.
    #[must_use]
    pub fn new(id: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
        }
    }
}

impl fmt::Display for PathwayKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.source, self.id)
    }
}

/// The discovery route that produced an enrichment hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscoveryRoute {
    /// Enrichment of the validated seed gene set.
    SeedEnrichment,
    /// Enrichment of the expanded interaction neighborhood.
    NeighborhoodEnrichment,
}

impl fmt::Display for DiscoveryRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SeedEnrichment => write!(f, "seed_enrichment"),
            Self::NeighborhoodEnrichment => write!(f, "neighborhood_enrichment"),
        }
    }
}

/// A single enrichment finding from one discovery route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathwayHit {
    /// The pathway identifier within its source database.
    pub pathway_id: String,
    /// The source database name.
    pub source: String,
    /// Human-readable pathway name.
    pub name: String,
    /// Adjusted significance value, 0 < p <= 1 as reported by the source.
    pub p_adj: f64,
    /// Genes from the queried set that intersect the pathway.
    pub genes: Vec<String>,
    /// The route that produced this hit.
    pub route: DiscoveryRoute,
}

impl PathwayHit {
    /// Returns the pathway identity of this hit.
    #[must_use]
    pub fn key(&self) -> PathwayKey {
        PathwayKey::new(&self.pathway_id, &self.source)
    }
}

/// A pathway consolidated from one or more independent discovery routes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatedPathway {
    /// The pathway identifier within its source database.
    pub id: String,
    /// The source database name.
    pub source: String,
    /// Human-readable pathway name.
    pub name: String,
    /// Best (smallest) adjusted significance value across routes.
    pub p_adj: f64,
    /// Union of intersecting genes across routes, sorted and deduplicated.
    pub evidence_genes: Vec<String>,
    /// Number of evidence genes; always equal to `evidence_genes.len()`.
    pub evidence_count: usize,
    /// Number of independent discovery routes that converged on this pathway.
    pub support_count: u32,
}

impl AggregatedPathway {
    /// Creates a new aggregated pathway.
    ///
    /// The evidence count is derived from the gene list and the support count
    /// is floored at 1, so a freshly constructed entry is always well formed.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        source: impl Into<String>,
        name: impl Into<String>,
        p_adj: f64,
        evidence_genes: Vec<String>,
        support_count: u32,
    ) -> Self {
        let evidence_count = evidence_genes.len();
        Self {
            id: id.into(),
            source: source.into(),
            name: name.into(),
            p_adj,
            evidence_genes,
            evidence_count,
            support_count: support_count.max(1),
        }
    }

    /// Returns the pathway identity.
    #[must_use]
    pub fn key(&self) -> PathwayKey {
        PathwayKey::new(&self.id, &self.source)
    }

    /// Checks the structural invariants of the entry.
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        self.evidence_count == self.evidence_genes.len() && self.support_count >= 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pathway_key_display() {
        let key = PathwayKey::new("R-HSA-109581", "reactome");
        assert_eq!(key.to_string(), "reactome:R-HSA-109581");
    }

    #[test]
    fn test_aggregated_pathway_derives_evidence_count() {
        let pathway = AggregatedPathway::new(
            "hsa04115",
            "kegg",
            "p53 signaling pathway",
            0.001,
            vec!["TP53".to_string(), "MDM2".to_string()],
            2,
        );

        assert_eq!(pathway.evidence_count, 2);
        assert!(pathway.is_well_formed());
    }

    #[test]
    fn test_support_count_floored_at_one() {
        let pathway = AggregatedPathway::new("p1", "kegg", "x", 0.01, vec![], 0);
        assert_eq!(pathway.support_count, 1);
    }

    #[test]
    fn test_hit_key_matches_aggregate_key() {
        let hit = PathwayHit {
            pathway_id: "p1".to_string(),
            source: "reactome".to_string(),
            name: "x".to_string(),
            p_adj: 0.05,
            genes: vec!["TP53".to_string()],
            route: DiscoveryRoute::SeedEnrichment,
        };
        let pathway = AggregatedPathway::new("p1", "reactome", "x", 0.05, vec![], 1);

        assert_eq!(hit.key(), pathway.key());
    }

    #[test]
    fn test_discovery_route_serde() {
        let json = serde_json::to_string(&DiscoveryRoute::NeighborhoodEnrichment).unwrap();
        assert_eq!(json, r#""neighborhood_enrichment""#);
    }
}
