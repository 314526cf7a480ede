//! Domain model: pathways, evidence, and scored hypotheses.

mod evidence;
mod hypothesis;
mod pathway;

pub use evidence::{
    CitationRecord, DiseaseAssociation, ExpressionProfile, GeneNeighborhood, PathwayCitations,
    RejectedGene, TopologyEvidence, ValidatedGenes,
};
pub use hypothesis::ScoredHypothesis;
pub use pathway::{AggregatedPathway, DiscoveryRoute, PathwayHit, PathwayKey};
