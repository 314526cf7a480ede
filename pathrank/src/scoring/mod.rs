//! Composite scoring: five evidence components, a compressive transform, and
//! a rescoring pass that stays numerically consistent with the first pass.

mod scorer;
mod weights;

pub use scorer::{
    aggregation_weight, components, significance_component, CompositeScorer,
    AGGREGATION_WEIGHT_CAP, SIGNIFICANCE_CAP,
};
pub use weights::DatabaseWeights;
