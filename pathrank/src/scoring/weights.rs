//! Per-source database quality weights.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Multiplier applied per source database when scoring a pathway.
///
/// More curated, primary sources carry a weight above 1.0; less curated ones
/// below. Any source not listed falls back to 1.0, so an unrecognized
/// database neither boosts nor penalizes a hypothesis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatabaseWeights {
    weights: BTreeMap<String, f64>,
}

impl Default for DatabaseWeights {
    fn default() -> Self {
        let mut weights = BTreeMap::new();
        weights.insert("reactome".to_string(), 1.2);
        weights.insert("kegg".to_string(), 1.15);
        weights.insert("go:bp".to_string(), 1.0);
        weights.insert("go:mf".to_string(), 0.95);
        weights.insert("go:cc".to_string(), 0.85);
        weights.insert("wikipathways".to_string(), 0.9);
        Self { weights }
    }
}

impl DatabaseWeights {
    /// Creates an empty weight table; every source resolves to 1.0.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            weights: BTreeMap::new(),
        }
    }

    /// Returns the weight for a source database. Lookup is case-insensitive;
    /// unknown sources resolve to 1.0.
    #[must_use]
    pub fn weight_for(&self, source: &str) -> f64 {
        self.weights
            .get(&source.to_ascii_lowercase())
            .copied()
            .unwrap_or(1.0)
    }

    /// Sets the weight for a source database.
    #[must_use]
    pub fn with_weight(mut self, source: impl Into<String>, weight: f64) -> Self {
        self.weights.insert(source.into().to_ascii_lowercase(), weight);
        self
    }

    /// Number of configured sources.
    #[must_use]
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    /// True if no source is configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }
}
