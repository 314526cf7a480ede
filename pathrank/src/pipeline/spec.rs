//! Stage specifications.

use crate::errors::SchedulingError;
use crate::stages::Stage;
use std::sync::Arc;

/// Specification for a single stage: the runner plus its declared
/// dependencies, in declaration order.
#[derive(Debug, Clone)]
pub struct StageSpec {
    /// The unique stage name, taken from the runner.
    pub name: String,
    /// The stage implementation.
    pub runner: Arc<dyn Stage>,
    /// Names of stages this stage depends on; ordered, no duplicates.
    pub dependencies: Vec<String>,
}

impl StageSpec {
    /// Creates a specification for a runner with no dependencies.
    #[must_use]
    pub fn new(runner: Arc<dyn Stage>) -> Self {
        Self {
            name: runner.name().to_string(),
            runner,
            dependencies: Vec::new(),
        }
    }

    /// Adds a dependency; duplicates are ignored.
    #[must_use]
    pub fn with_dependency(mut self, dependency: impl Into<String>) -> Self {
        let dependency = dependency.into();
        if !self.dependencies.contains(&dependency) {
            self.dependencies.push(dependency);
        }
        self
    }

    /// Adds several dependencies in order.
    #[must_use]
    pub fn with_dependencies(
        mut self,
        dependencies: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        for dependency in dependencies {
            self = self.with_dependency(dependency);
        }
        self
    }

    /// Validates the specification in isolation.
    ///
    /// # Errors
    ///
    /// Returns an error if the stage depends on itself.
    pub fn validate(&self) -> Result<(), SchedulingError> {
        if self.dependencies.contains(&self.name) {
            return Err(SchedulingError::SelfDependency(self.name.clone()));
        }
        Ok(())
    }
}
