//! Typed stage artifacts.

use crate::model::{
    AggregatedPathway, DiseaseAssociation, ExpressionProfile, GeneNeighborhood, PathwayCitations,
    PathwayHit, ScoredHypothesis, TopologyEvidence, ValidatedGenes,
};
use std::sync::Arc;

/// The typed product of a completed stage.
///
/// Each stage stores exactly one variant in the analysis context; later
/// stages read it back through typed accessors, so a consumer can never
/// observe a value of the wrong shape. Variants hold `Arc`s because the same
/// artifact may be read by several downstream stages concurrently.
#[derive(Debug, Clone)]
pub enum StageArtifact {
    /// Accepted and rejected seed genes.
    ValidatedGenes(Arc<ValidatedGenes>),
    /// Seeds plus 1-hop interaction neighbors.
    Neighborhood(Arc<GeneNeighborhood>),
    /// Enrichment hits from one discovery route.
    EnrichmentHits(Arc<Vec<PathwayHit>>),
    /// Pathways consolidated across discovery routes.
    AggregatedPathways(Arc<Vec<AggregatedPathway>>),
    /// A ranked list of scored hypotheses.
    RankedHypotheses(Arc<Vec<ScoredHypothesis>>),
    /// Per-gene network-importance values.
    Topology(Arc<TopologyEvidence>),
    /// Literature citations for ranked hypotheses.
    Citations(Arc<Vec<PathwayCitations>>),
    /// Tissue-expression profiles for seed genes.
    ExpressionProfiles(Arc<Vec<ExpressionProfile>>),
    /// Curated disease associations for seed genes.
    DiseaseAssociations(Arc<Vec<DiseaseAssociation>>),
}

impl StageArtifact {
    /// Short label for logs.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ValidatedGenes(_) => "validated_genes",
            Self::Neighborhood(_) => "neighborhood",
            Self::EnrichmentHits(_) => "enrichment_hits",
            Self::AggregatedPathways(_) => "aggregated_pathways",
            Self::RankedHypotheses(_) => "ranked_hypotheses",
            Self::Topology(_) => "topology",
            Self::Citations(_) => "citations",
            Self::ExpressionProfiles(_) => "expression_profiles",
            Self::DiseaseAssociations(_) => "disease_associations",
        }
    }

    /// Returns the validated genes, if that is what this artifact holds.
    #[must_use]
    pub fn as_validated_genes(&self) -> Option<Arc<ValidatedGenes>> {
        match self {
            Self::ValidatedGenes(v) => Some(v.clone()),
            _ => None,
        }
    }

    /// Returns the gene neighborhood, if that is what this artifact holds.
    #[must_use]
    pub fn as_neighborhood(&self) -> Option<Arc<GeneNeighborhood>> {
        match self {
            Self::Neighborhood(v) => Some(v.clone()),
            _ => None,
        }
    }

    /// Returns the enrichment hits, if that is what this artifact holds.
    #[must_use]
    pub fn as_enrichment_hits(&self) -> Option<Arc<Vec<PathwayHit>>> {
        match self {
            Self::EnrichmentHits(v) => Some(v.clone()),
            _ => None,
        }
    }

    /// Returns the aggregated pathways, if that is what this artifact holds.
    #[must_use]
    pub fn as_aggregated_pathways(&self) -> Option<Arc<Vec<AggregatedPathway>>> {
        match self {
            Self::AggregatedPathways(v) => Some(v.clone()),
            _ => None,
        }
    }

    /// Returns the ranked hypotheses, if that is what this artifact holds.
    #[must_use]
    pub fn as_ranked_hypotheses(&self) -> Option<Arc<Vec<ScoredHypothesis>>> {
        match self {
            Self::RankedHypotheses(v) => Some(v.clone()),
            _ => None,
        }
    }

    /// Returns the topology evidence, if that is what this artifact holds.
    #[must_use]
    pub fn as_topology(&self) -> Option<Arc<TopologyEvidence>> {
        match self {
            Self::Topology(v) => Some(v.clone()),
            _ => None,
        }
    }

    /// Returns the citations, if that is what this artifact holds.
    #[must_use]
    pub fn as_citations(&self) -> Option<Arc<Vec<PathwayCitations>>> {
        match self {
            Self::Citations(v) => Some(v.clone()),
            _ => None,
        }
    }

    /// Returns the expression profiles, if that is what this artifact holds.
    #[must_use]
    pub fn as_expression_profiles(&self) -> Option<Arc<Vec<ExpressionProfile>>> {
        match self {
            Self::ExpressionProfiles(v) => Some(v.clone()),
            _ => None,
        }
    }

    /// Returns the disease associations, if that is what this artifact holds.
    #[must_use]
    pub fn as_disease_associations(&self) -> Option<Arc<Vec<DiseaseAssociation>>> {
        match self {
            Self::DiseaseAssociations(v) => Some(v.clone()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typed_accessor_matches_variant() {
        let artifact = StageArtifact::ValidatedGenes(Arc::new(ValidatedGenes::accepted_only(
            vec!["TP53".to_string()],
        )));

        assert!(artifact.as_validated_genes().is_some());
        assert!(artifact.as_neighborhood().is_none());
        assert_eq!(artifact.kind(), "validated_genes");
    }

    #[test]
    fn test_accessor_shares_allocation() {
        let inner = Arc::new(TopologyEvidence::default());
        let artifact = StageArtifact::Topology(inner.clone());

        let read = artifact.as_topology().unwrap();
        assert!(Arc::ptr_eq(&inner, &read));
    }
}
