//! # Pathrank
//!
//! A stage-based analysis pipeline for discovering and ranking biological
//! pathway hypotheses from a set of seed genes.
//!
//! Pathrank chains enrichment, literature, and network-analysis steps behind
//! a dependency-aware scheduler:
//!
//! - **Stage-based execution**: discrete asynchronous stages with declared
//!   dependencies, run concurrently when independent
//! - **Typed analysis context**: write-once, per-run shared state with typed
//!   artifact accessors
//! - **Composite scoring**: a five-component score over each pathway
//!   hypothesis, recomputed in a second pass once network topology evidence
//!   is available
//! - **Progress reporting**: non-blocking notifications, safe to share
//!   across concurrent analyses
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use pathrank::prelude::*;
//!
//! let pipeline = AnalysisPipeline::new(collaborators, AnalysisConfig::default())?;
//! let report = pipeline
//!     .run(vec!["TP53".into(), "BRCA1".into()], Arc::new(LoggingProgressReporter))
//!     .await?;
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation
)]

pub mod analysis;
pub mod clients;
pub mod config;
pub mod context;
pub mod core;
pub mod errors;
pub mod model;
pub mod observability;
pub mod pipeline;
pub mod progress;
pub mod scoring;
pub mod stages;
pub mod testing;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::analysis::{AnalysisPipeline, Collaborators, RunReport};
    pub use crate::clients::{
        ClientError, DiseaseCatalog, EnrichmentClient, ExpressionClient, GeneCatalogClient,
        InteractionNetworkClient, LiteratureClient,
    };
    pub use crate::config::{AnalysisConfig, ScoringConfig};
    pub use crate::context::{AnalysisContext, RunIdentity, StageContext};
    pub use crate::core::{StageArtifact, StageOutput, StageResult, StageStatus};
    pub use crate::errors::{
        ContextConflictError, MissingDependencyError, PipelineError, SchedulingError,
    };
    pub use crate::model::{
        AggregatedPathway, DiscoveryRoute, GeneNeighborhood, PathwayHit, PathwayKey,
        ScoredHypothesis, TopologyEvidence, ValidatedGenes,
    };
    pub use crate::pipeline::{StageGraph, StageGraphBuilder, StageSpec};
    pub use crate::progress::{
        LoggingProgressReporter, NoOpProgressReporter, ProgressHub, ProgressReporter,
        ProgressUpdate,
    };
    pub use crate::scoring::{CompositeScorer, DatabaseWeights};
    pub use crate::stages::Stage;
}
