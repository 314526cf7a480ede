//! Run-scoped analysis configuration.

use crate::scoring::DatabaseWeights;
use serde::{Deserialize, Serialize};

/// Configuration injected into every run of the analysis pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Scoring parameters.
    pub scoring: ScoringConfig,
    /// Number of top-ranked hypotheses to fetch literature for.
    pub literature_top_n: usize,
    /// Upper bound on expanded neighborhood size; collaborators can return
    /// arbitrarily large neighbor sets for hub genes.
    pub max_neighborhood_genes: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            scoring: ScoringConfig::default(),
            literature_top_n: 10,
            max_neighborhood_genes: 500,
        }
    }
}

/// Parameters of the composite scorer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Per-source database quality multipliers.
    pub database_weights: DatabaseWeights,
}
