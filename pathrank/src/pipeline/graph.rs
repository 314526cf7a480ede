//! Dependency graph construction, validation, and topological ordering.
//!
//! The graph is built and validated once, at pipeline construction time. An
//! unsatisfiable graph (unknown dependency, cycle, no stages) surfaces as a
//! [`SchedulingError`] before any stage runs.

use super::StageSpec;
use crate::errors::SchedulingError;
use std::collections::{HashMap, HashSet};

/// Builder accumulating stage specifications for a [`StageGraph`].
#[derive(Debug, Clone, Default)]
pub struct StageGraphBuilder {
    name: String,
    stages: HashMap<String, StageSpec>,
    insertion_order: Vec<String>,
}

impl StageGraphBuilder {
    /// Creates a builder for a named pipeline.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            stages: HashMap::new(),
            insertion_order: Vec::new(),
        }
    }

    /// Adds a stage specification.
    ///
    /// # Errors
    ///
    /// Returns an error on a duplicate name or a self-dependency. Forward
    /// references to stages added later are allowed; they are resolved at
    /// [`build`](Self::build) time.
    pub fn stage(mut self, spec: StageSpec) -> Result<Self, SchedulingError> {
        spec.validate()?;
        if self.stages.contains_key(&spec.name) {
            return Err(SchedulingError::DuplicateStage(spec.name));
        }
        self.insertion_order.push(spec.name.clone());
        self.stages.insert(spec.name.clone(), spec);
        Ok(self)
    }

    /// Validates the accumulated graph and computes its execution order.
    ///
    /// # Errors
    ///
    /// Returns an error if the graph is empty, references an unknown
    /// dependency, or contains a cycle.
    pub fn build(self) -> Result<StageGraph, SchedulingError> {
        if self.stages.is_empty() {
            return Err(SchedulingError::EmptyPipeline);
        }

        for spec in self.stages.values() {
            for dependency in &spec.dependencies {
                if !self.stages.contains_key(dependency) {
                    return Err(SchedulingError::UnknownDependency {
                        stage: spec.name.clone(),
                        dependency: dependency.clone(),
                    });
                }
            }
        }

        detect_cycles(&self.stages)?;
        let execution_order = topological_order(&self.stages, &self.insertion_order);

        Ok(StageGraph {
            name: self.name,
            stages: self.stages,
            execution_order,
        })
    }
}

/// A validated, acyclic graph of stages with a deterministic execution order.
#[derive(Debug, Clone)]
pub struct StageGraph {
    pub(super) name: String,
    pub(super) stages: HashMap<String, StageSpec>,
    pub(super) execution_order: Vec<String>,
}

impl StageGraph {
    /// Returns the pipeline name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the number of stages.
    #[must_use]
    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }

    /// Returns the topologically sorted execution order. Seeded by insertion
    /// order, so it is identical across runs of the same pipeline.
    #[must_use]
    pub fn execution_order(&self) -> &[String] {
        &self.execution_order
    }

    /// Returns the specification for a stage.
    #[must_use]
    pub fn spec(&self, stage: &str) -> Option<&StageSpec> {
        self.stages.get(stage)
    }

    /// Names of stages that depend on `stage`, directly or transitively.
    #[must_use]
    pub fn transitive_dependents(&self, stage: &str) -> HashSet<String> {
        let mut dependents = HashSet::new();
        let mut frontier = vec![stage.to_string()];

        while let Some(current) = frontier.pop() {
            for spec in self.stages.values() {
                if spec.dependencies.contains(&current) && dependents.insert(spec.name.clone()) {
                    frontier.push(spec.name.clone());
                }
            }
        }

        dependents
    }
}

/// Depth-first cycle detection, reporting the offending path.
fn detect_cycles(stages: &HashMap<String, StageSpec>) -> Result<(), SchedulingError> {
    let mut visited = HashSet::new();
    let mut on_stack = HashSet::new();
    let mut path = Vec::new();

    // Sorted for a deterministic starting point, so the reported cycle path
    // is stable across runs.
    let mut names: Vec<&String> = stages.keys().collect();
    names.sort();

    for name in names {
        if !visited.contains(name.as_str()) {
            if let Some(cycle) = visit(name, stages, &mut visited, &mut on_stack, &mut path) {
                return Err(SchedulingError::CycleDetected { cycle_path: cycle });
            }
        }
    }

    Ok(())
}

fn visit(
    node: &str,
    stages: &HashMap<String, StageSpec>,
    visited: &mut HashSet<String>,
    on_stack: &mut HashSet<String>,
    path: &mut Vec<String>,
) -> Option<Vec<String>> {
    visited.insert(node.to_string());
    on_stack.insert(node.to_string());
    path.push(node.to_string());

    if let Some(spec) = stages.get(node) {
        for dependency in &spec.dependencies {
            if !visited.contains(dependency) {
                if let Some(cycle) = visit(dependency, stages, visited, on_stack, path) {
                    return Some(cycle);
                }
            } else if on_stack.contains(dependency) {
                let start = path.iter().position(|n| n == dependency).unwrap_or(0);
                let mut cycle: Vec<String> = path[start..].to_vec();
                cycle.push(dependency.clone());
                return Some(cycle);
            }
        }
    }

    path.pop();
    on_stack.remove(node);
    None
}

/// Topological sort by depth-first visit, seeded by insertion order for
/// determinism. Assumes the graph has already been checked for cycles.
fn topological_order(
    stages: &HashMap<String, StageSpec>,
    insertion_order: &[String],
) -> Vec<String> {
    let mut order = Vec::with_capacity(stages.len());
    let mut visited = HashSet::new();

    fn visit(
        node: &str,
        stages: &HashMap<String, StageSpec>,
        visited: &mut HashSet<String>,
        order: &mut Vec<String>,
    ) {
        if !visited.insert(node.to_string()) {
            return;
        }
        if let Some(spec) = stages.get(node) {
            for dependency in &spec.dependencies {
                visit(dependency, stages, visited, order);
            }
        }
        order.push(node.to_string());
    }

    for name in insertion_order {
        visit(name, stages, &mut visited, &mut order);
    }

    order
}
