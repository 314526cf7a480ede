//! Scored pathway hypotheses.

use super::{AggregatedPathway, PathwayKey};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// An aggregated pathway wrapped with its composite score, rank, and
/// component breakdown.
///
/// Identity is the pathway key; a rescoring pass produces a new collection of
/// hypotheses with the same identities rather than mutating this one in
/// place, so callers holding a pre-rescoring list never observe it change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredHypothesis {
    /// The underlying aggregated pathway.
    pub pathway: AggregatedPathway,
    /// The composite score after compression.
    pub score: f64,
    /// 1-based rank; unique and contiguous within a ranked list. Zero means
    /// not yet ranked.
    pub rank: u32,
    /// Named score components. Ordered deterministically so two identical
    /// scoring passes serialize identically.
    pub components: BTreeMap<String, f64>,
}

impl ScoredHypothesis {
    /// Creates an unranked hypothesis; the scorer assigns ranks after sorting.
    #[must_use]
    pub fn unranked(
        pathway: AggregatedPathway,
        score: f64,
        components: BTreeMap<String, f64>,
    ) -> Self {
        Self {
            pathway,
            score,
            rank: 0,
            components,
        }
    }

    /// Returns the pathway identity.
    #[must_use]
    pub fn key(&self) -> PathwayKey {
        self.pathway.key()
    }

    /// Returns a named score component.
    #[must_use]
    pub fn component(&self, name: &str) -> Option<f64> {
        self.components.get(name).copied()
    }

    /// Attaches an externally computed value to the component breakdown.
    /// Rescoring leaves keys it does not compute untouched.
    #[must_use]
    pub fn with_component(mut self, name: impl Into<String>, value: f64) -> Self {
        self.components.insert(name.into(), value);
        self
    }
}
