//! Evidence types produced by stages and external collaborators.

use super::PathwayKey;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Result of validating caller-supplied gene symbols against the catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatedGenes {
    /// Accepted, normalized gene symbols in input order.
    pub accepted: Vec<String>,
    /// Inputs that were rejected, with reasons.
    pub rejected: Vec<RejectedGene>,
}

impl ValidatedGenes {
    /// Creates a validated set with no rejections.
    #[must_use]
    pub fn accepted_only(accepted: Vec<String>) -> Self {
        Self {
            accepted,
            rejected: Vec::new(),
        }
    }

    /// Returns true if no symbol was accepted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.accepted.is_empty()
    }
}

/// A rejected input symbol and the reason it was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RejectedGene {
    /// The symbol as supplied by the caller.
    pub symbol: String,
    /// Why it was rejected.
    pub reason: String,
}

impl RejectedGene {
    /// Creates a new rejection record.
    #[must_use]
    pub fn new(symbol: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            reason: reason.into(),
        }
    }
}

/// Seed genes plus their direct (1-hop) interaction neighbors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneNeighborhood {
    seeds: BTreeSet<String>,
    neighbors: BTreeSet<String>,
}

impl GeneNeighborhood {
    /// Creates a neighborhood. Genes listed both as seed and neighbor are
    /// kept only as seeds.
    #[must_use]
    pub fn new(
        seeds: impl IntoIterator<Item = String>,
        neighbors: impl IntoIterator<Item = String>,
    ) -> Self {
        let seeds: BTreeSet<String> = seeds.into_iter().collect();
        let neighbors = neighbors
            .into_iter()
            .filter(|g| !seeds.contains(g))
            .collect();
        Self { seeds, neighbors }
    }

    /// Returns the seed genes.
    #[must_use]
    pub fn seeds(&self) -> &BTreeSet<String> {
        &self.seeds
    }

    /// Returns the 1-hop neighbors (excluding seeds).
    #[must_use]
    pub fn neighbors(&self) -> &BTreeSet<String> {
        &self.neighbors
    }

    /// True if the gene is a seed or a direct neighbor.
    #[must_use]
    pub fn contains(&self, gene: &str) -> bool {
        self.seeds.contains(gene) || self.neighbors.contains(gene)
    }

    /// All genes in the neighborhood, seeds first, each group sorted.
    #[must_use]
    pub fn all_genes(&self) -> Vec<String> {
        self.seeds.iter().chain(self.neighbors.iter()).cloned().collect()
    }

    /// Total number of genes in the neighborhood.
    #[must_use]
    pub fn len(&self) -> usize {
        self.seeds.len() + self.neighbors.len()
    }

    /// True if the neighborhood holds no genes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.seeds.is_empty() && self.neighbors.is_empty()
    }
}

/// Per-gene network-importance values from the topology collaborator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TopologyEvidence {
    importance: BTreeMap<String, f64>,
}

impl TopologyEvidence {
    /// Creates topology evidence from per-gene importance values.
    #[must_use]
    pub fn new(importance: BTreeMap<String, f64>) -> Self {
        Self { importance }
    }

    /// Returns the importance value recorded for a gene.
    #[must_use]
    pub fn importance_of(&self, gene: &str) -> Option<f64> {
        self.importance.get(gene).copied()
    }

    /// Returns all recorded values.
    #[must_use]
    pub fn importance(&self) -> &BTreeMap<String, f64> {
        &self.importance
    }

    /// Number of genes with a recorded value.
    #[must_use]
    pub fn len(&self) -> usize {
        self.importance.len()
    }

    /// True if no values are recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.importance.is_empty()
    }

    /// Mean importance over the given genes. Genes without a recorded value
    /// contribute 0.0; an empty gene list yields 0.0.
    #[must_use]
    pub fn mean_importance<'a>(&self, genes: impl IntoIterator<Item = &'a str>) -> f64 {
        let mut sum = 0.0;
        let mut count = 0usize;
        for gene in genes {
            sum += self.importance.get(gene).copied().unwrap_or(0.0);
            count += 1;
        }
        if count == 0 {
            0.0
        } else {
            sum / count as f64
        }
    }

    /// Fraction of all recorded values strictly below `value`. An empty
    /// evidence set yields 0.0.
    #[must_use]
    pub fn fraction_below(&self, value: f64) -> f64 {
        if self.importance.is_empty() {
            return 0.0;
        }
        let below = self.importance.values().filter(|v| **v < value).count();
        below as f64 / self.importance.len() as f64
    }
}

/// A single literature citation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CitationRecord {
    /// PubMed identifier.
    pub pmid: String,
    /// Article title.
    pub title: String,
    /// Publication year, when known.
    pub year: Option<i32>,
}

/// Citations retrieved for one ranked pathway hypothesis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathwayCitations {
    /// The pathway the citations support.
    pub pathway: PathwayKey,
    /// The retrieved citations.
    pub citations: Vec<CitationRecord>,
}

/// Tissue-expression summary for one gene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpressionProfile {
    /// The gene symbol.
    pub gene: String,
    /// Expression level per tissue.
    pub tissues: BTreeMap<String, f64>,
}

/// A curated gene-to-disease association.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiseaseAssociation {
    /// The gene symbol.
    pub gene: String,
    /// The associated disease name.
    pub disease: String,
    /// Evidence label from the curated table.
    pub evidence: String,
}
