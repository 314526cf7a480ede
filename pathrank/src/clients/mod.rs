//! Interfaces of the external collaborators.
//!
//! The engine never performs network calls or parses transport payloads;
//! every external lookup goes through one of these traits and either returns
//! a typed result or a [`ClientError`]. Implementations own their timeouts
//! and retries; the pipeline maps any surfaced failure through the normal
//! failed-stage path.

use crate::model::{
    CitationRecord, DiseaseAssociation, ExpressionProfile, GeneNeighborhood, PathwayHit,
    PathwayKey, TopologyEvidence, ValidatedGenes,
};
use async_trait::async_trait;
use thiserror::Error;

/// Failure surfaced by an external collaborator.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The collaborator could not be reached.
    #[error("collaborator unavailable: {0}")]
    Unavailable(String),

    /// The collaborator gave up after its own deadline.
    #[error("collaborator timed out after {seconds}s")]
    Timeout {
        /// The deadline that elapsed.
        seconds: f64,
    },

    /// The collaborator answered with something it could not interpret.
    #[error("invalid collaborator response: {0}")]
    InvalidResponse(String),

    /// The requested entity does not exist upstream.
    #[error("not found: {0}")]
    NotFound(String),

    /// Any other failure.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ClientError {
    /// True for a missing-entity answer, which some stages downgrade to a
    /// run warning instead of a failure.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// Validates caller-supplied gene symbols against the reference catalog.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GeneCatalogClient: Send + Sync {
    /// Confirms which of the given symbols the catalog recognizes.
    async fn validate_symbols(&self, symbols: &[String]) -> Result<ValidatedGenes, ClientError>;
}

/// Protein-interaction network lookups.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait InteractionNetworkClient: Send + Sync {
    /// Returns the genes plus their direct (1-hop) interaction neighbors.
    async fn neighborhood(&self, genes: &[String]) -> Result<GeneNeighborhood, ClientError>;

    /// Returns per-gene network-importance values over the given gene set.
    async fn network_importance(&self, genes: &[String]) -> Result<TopologyEvidence, ClientError>;
}

/// Pathway-enrichment lookups.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EnrichmentClient: Send + Sync {
    /// Returns enriched pathways for a gene set. The caller stamps each hit
    /// with its discovery route.
    async fn enrich(&self, genes: &[String]) -> Result<Vec<PathwayHit>, ClientError>;
}

/// Literature-citation lookups.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LiteratureClient: Send + Sync {
    /// Returns citations supporting a pathway, given its evidence genes.
    async fn citations_for_pathway(
        &self,
        pathway: &PathwayKey,
        genes: &[String],
    ) -> Result<Vec<CitationRecord>, ClientError>;
}

/// Tissue-expression lookups.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ExpressionClient: Send + Sync {
    /// Returns expression profiles for the given genes.
    async fn expression_profiles(
        &self,
        genes: &[String],
    ) -> Result<Vec<ExpressionProfile>, ClientError>;
}

/// The curated gene-to-disease lookup table. Synchronous: the table is an
/// in-memory curated resource, not a remote service.
#[cfg_attr(test, mockall::automock)]
pub trait DiseaseCatalog: Send + Sync {
    /// Returns curated associations for one gene; empty when none are known.
    fn associations_for(&self, gene: &str) -> Vec<DiseaseAssociation>;
}
