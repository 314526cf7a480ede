//! Canned collaborator implementations.
//!
//! Every answer is a pure function of the query, so two runs against the
//! same fixtures produce identical pipeline results.

use crate::analysis::Collaborators;
use crate::clients::{
    ClientError, DiseaseCatalog, EnrichmentClient, ExpressionClient, GeneCatalogClient,
    InteractionNetworkClient, LiteratureClient,
};
use crate::model::{
    CitationRecord, DiscoveryRoute, DiseaseAssociation, ExpressionProfile, GeneNeighborhood,
    PathwayHit, PathwayKey, RejectedGene, TopologyEvidence, ValidatedGenes,
};
use async_trait::async_trait;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

/// One pathway in the fixture enrichment catalog.
#[derive(Debug, Clone)]
struct CatalogPathway {
    id: &'static str,
    source: &'static str,
    name: &'static str,
    p_adj: f64,
    genes: &'static [&'static str],
}

const PATHWAY_CATALOG: &[CatalogPathway] = &[
    CatalogPathway {
        id: "R-HSA-69541",
        source: "reactome",
        name: "Stabilization of p53",
        p_adj: 0.0004,
        genes: &["TP53", "MDM2", "CDKN1A"],
    },
    CatalogPathway {
        id: "hsa04115",
        source: "kegg",
        name: "p53 signaling pathway",
        p_adj: 0.002,
        genes: &["TP53", "MDM2", "CDKN1A", "ATM"],
    },
    CatalogPathway {
        id: "R-HSA-5693532",
        source: "reactome",
        name: "DNA Double-Strand Break Repair",
        p_adj: 0.01,
        genes: &["BRCA1", "ATM"],
    },
    CatalogPathway {
        id: "WP179",
        source: "wikipathways",
        name: "Cell cycle",
        p_adj: 0.03,
        genes: &["TP53", "EGFR", "CDKN1A"],
    },
];

/// A deterministic implementation of every collaborator interface.
#[derive(Debug, Clone)]
pub struct FixtureCollaborators {
    known_genes: BTreeSet<String>,
    neighbors: BTreeMap<String, Vec<String>>,
}

impl Default for FixtureCollaborators {
    fn default() -> Self {
        let known_genes = ["TP53", "BRCA1", "EGFR", "MDM2", "CDKN1A", "ATM"]
            .into_iter()
            .map(String::from)
            .collect();

        let mut neighbors = BTreeMap::new();
        neighbors.insert(
            "TP53".to_string(),
            vec!["MDM2".to_string(), "CDKN1A".to_string()],
        );
        neighbors.insert("BRCA1".to_string(), vec!["ATM".to_string()]);

        Self {
            known_genes,
            neighbors,
        }
    }
}

impl FixtureCollaborators {
    /// Wraps this fixture in a [`Collaborators`] bundle, sharing a single
    /// instance behind every interface.
    #[must_use]
    pub fn into_collaborators(self) -> Collaborators {
        let shared = Arc::new(self);
        Collaborators {
            gene_catalog: shared.clone(),
            network: shared.clone(),
            enrichment: shared.clone(),
            literature: shared.clone(),
            expression: shared.clone(),
            diseases: shared,
        }
    }
}

#[async_trait]
impl GeneCatalogClient for FixtureCollaborators {
    async fn validate_symbols(&self, symbols: &[String]) -> Result<ValidatedGenes, ClientError> {
        let mut accepted = Vec::new();
        let mut rejected = Vec::new();
        for symbol in symbols {
            if self.known_genes.contains(symbol) {
                accepted.push(symbol.clone());
            } else {
                rejected.push(RejectedGene::new(symbol.clone(), "unknown symbol"));
            }
        }
        Ok(ValidatedGenes { accepted, rejected })
    }
}

#[async_trait]
impl InteractionNetworkClient for FixtureCollaborators {
    async fn neighborhood(&self, genes: &[String]) -> Result<GeneNeighborhood, ClientError> {
        let neighbors: Vec<String> = genes
            .iter()
            .filter_map(|gene| self.neighbors.get(gene))
            .flatten()
            .cloned()
            .collect();
        Ok(GeneNeighborhood::new(genes.to_vec(), neighbors))
    }

    async fn network_importance(&self, genes: &[String]) -> Result<TopologyEvidence, ClientError> {
        let mut sorted: Vec<String> = genes.to_vec();
        sorted.sort();
        sorted.dedup();
        let total = sorted.len();
        let values: BTreeMap<String, f64> = sorted
            .into_iter()
            .enumerate()
            .map(|(index, gene)| (gene, (index + 1) as f64 / (total + 1) as f64))
            .collect();
        Ok(TopologyEvidence::new(values))
    }
}

#[async_trait]
impl EnrichmentClient for FixtureCollaborators {
    async fn enrich(&self, genes: &[String]) -> Result<Vec<PathwayHit>, ClientError> {
        let query: BTreeSet<&str> = genes.iter().map(String::as_str).collect();
        let hits = PATHWAY_CATALOG
            .iter()
            .filter_map(|entry| {
                let intersection: Vec<String> = entry
                    .genes
                    .iter()
                    .filter(|gene| query.contains(**gene))
                    .map(|gene| (*gene).to_string())
                    .collect();
                if intersection.is_empty() {
                    return None;
                }
                Some(PathwayHit {
                    pathway_id: entry.id.to_string(),
                    source: entry.source.to_string(),
                    name: entry.name.to_string(),
                    p_adj: entry.p_adj,
                    genes: intersection,
                    route: DiscoveryRoute::SeedEnrichment,
                })
            })
            .collect();
        Ok(hits)
    }
}

#[async_trait]
impl LiteratureClient for FixtureCollaborators {
    async fn citations_for_pathway(
        &self,
        pathway: &PathwayKey,
        _genes: &[String],
    ) -> Result<Vec<CitationRecord>, ClientError> {
        Ok(vec![
            CitationRecord {
                pmid: format!("{}-a", pathway.id),
                title: format!("Functional characterization of {}", pathway.id),
                year: Some(2019),
            },
            CitationRecord {
                pmid: format!("{}-b", pathway.id),
                title: format!("A systems view of {}", pathway.id),
                year: Some(2022),
            },
        ])
    }
}

#[async_trait]
impl ExpressionClient for FixtureCollaborators {
    async fn expression_profiles(
        &self,
        genes: &[String],
    ) -> Result<Vec<ExpressionProfile>, ClientError> {
        Ok(genes
            .iter()
            .map(|gene| ExpressionProfile {
                gene: gene.clone(),
                tissues: BTreeMap::from([
                    ("liver".to_string(), gene.len() as f64),
                    ("brain".to_string(), gene.len() as f64 / 2.0),
                ]),
            })
            .collect())
    }
}

impl DiseaseCatalog for FixtureCollaborators {
    fn associations_for(&self, gene: &str) -> Vec<DiseaseAssociation> {
        match gene {
            "TP53" => vec![DiseaseAssociation {
                gene: gene.to_string(),
                disease: "Li-Fraumeni syndrome".to_string(),
                evidence: "curated".to_string(),
            }],
            "BRCA1" => vec![DiseaseAssociation {
                gene: gene.to_string(),
                disease: "Hereditary breast-ovarian cancer".to_string(),
                evidence: "curated".to_string(),
            }],
            _ => Vec::new(),
        }
    }
}

/// An enrichment client that always fails, for failure-path tests.
#[derive(Debug, Clone)]
pub struct FailingEnrichmentClient {
    message: String,
}

impl FailingEnrichmentClient {
    /// Creates a failing client with the given error message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[async_trait]
impl EnrichmentClient for FailingEnrichmentClient {
    async fn enrich(&self, _genes: &[String]) -> Result<Vec<PathwayHit>, ClientError> {
        Err(ClientError::Unavailable(self.message.clone()))
    }
}
