//! Analysis context: per-run shared state and the per-stage view of it.

mod analysis;
mod identity;

pub use analysis::{AnalysisContext, StageContext};
pub use identity::RunIdentity;
