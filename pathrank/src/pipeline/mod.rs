//! Pipeline construction and execution.
//!
//! This module provides:
//! - Stage specifications
//! - Dependency graph building with cycle detection and topological ordering
//! - The dependency-aware execution scheduler

mod graph;
mod scheduler;
mod spec;

#[cfg(test)]
mod integration_tests;

pub use graph::{StageGraph, StageGraphBuilder};
pub use spec::StageSpec;
