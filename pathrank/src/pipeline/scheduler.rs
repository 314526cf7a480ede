//! Dependency-aware stage execution.
//!
//! Stages run as soon as their dependencies are completed; independent stages
//! in the same ready set run concurrently on the cooperative executor, all
//! sharing the one analysis context and writing disjoint stage names.

use super::{StageGraph, StageSpec};
use crate::context::{AnalysisContext, StageContext};
use crate::core::{StageOutput, StageResult, StageStatus};
use crate::errors::{MissingDependencyError, PipelineError, SchedulingError};
use crate::progress::ProgressReporter;
use chrono::Utc;
use futures::future::BoxFuture;
use futures::stream::{FuturesUnordered, StreamExt};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Instant;

type StageFuture = BoxFuture<'static, (String, StageOutput)>;

impl StageGraph {
    /// Executes every stage of the graph against the given context.
    ///
    /// Returns `Ok(())` only when every stage completed. Any failed stage
    /// aborts the run after its result is recorded; stages that depend on it,
    /// directly or transitively, are never dispatched.
    ///
    /// # Errors
    ///
    /// - [`PipelineError::StageExecution`] for the first failing stage
    /// - [`PipelineError::MissingDependency`] if a dependency has no
    ///   completed entry at dispatch time
    /// - [`PipelineError::Cancelled`] if the context was cancelled
    pub async fn execute(
        &self,
        ctx: Arc<AnalysisContext>,
        reporter: Arc<dyn ProgressReporter>,
    ) -> Result<(), PipelineError> {
        let total = self.stage_count();
        let mut completed = 0usize;
        let mut dispatched: HashSet<String> = HashSet::new();
        let mut active: FuturesUnordered<StageFuture> = FuturesUnordered::new();

        let mut in_degree: HashMap<String, usize> = self
            .stages
            .iter()
            .map(|(name, spec)| (name.clone(), spec.dependencies.len()))
            .collect();

        // Dispatch the initial ready set in execution order.
        for name in &self.execution_order {
            if in_degree.get(name).copied() == Some(0) {
                let Some(spec) = self.stages.get(name) else {
                    continue;
                };
                self.dispatch(spec, &ctx, reporter.as_ref(), completed, total, &mut active)?;
                dispatched.insert(name.clone());
            }
        }

        while completed < total {
            if ctx.is_cancelled() {
                tracing::warn!(analysis_id = %ctx.analysis_id(), "run cancelled");
                return Err(PipelineError::Cancelled(
                    "analysis context was cancelled".to_string(),
                ));
            }

            let Some((stage_name, output)) = active.next().await else {
                let remaining: Vec<String> = self
                    .execution_order
                    .iter()
                    .filter(|name| !dispatched.contains(*name))
                    .cloned()
                    .collect();
                return Err(SchedulingError::Stalled { remaining }.into());
            };

            if output.status == StageStatus::Completed {
                let mut result = StageResult::from_output(&stage_name, &output);
                result.insert_metadata("completed_at", serde_json::json!(Utc::now().to_rfc3339()));
                ctx.record(result, output.artifact)?;
                completed += 1;
                tracing::info!(stage = %stage_name, "stage completed");

                // Unlock stages whose last unmet dependency just completed.
                for child in &self.execution_order {
                    if dispatched.contains(child) {
                        continue;
                    }
                    let Some(child_spec) = self.stages.get(child) else {
                        continue;
                    };
                    if !child_spec.dependencies.iter().any(|dep| dep == &stage_name) {
                        continue;
                    }
                    if let Some(count) = in_degree.get_mut(child) {
                        *count = count.saturating_sub(1);
                        if *count == 0 {
                            self.dispatch(
                                child_spec,
                                &ctx,
                                reporter.as_ref(),
                                completed,
                                total,
                                &mut active,
                            )?;
                            dispatched.insert(child.clone());
                        }
                    }
                }
            } else {
                let description = failure_description(&output);
                let result = StageResult::from_output(&stage_name, &output);
                ctx.record(result, None)?;
                tracing::warn!(stage = %stage_name, error = %description, "stage failed; aborting run");
                return Err(PipelineError::stage_execution(stage_name, description));
            }
        }

        notify_safely(reporter.as_ref(), "complete", 100.0, "Analysis complete");
        Ok(())
    }

    /// Validates preconditions, reports progress, and queues one stage.
    fn dispatch(
        &self,
        spec: &StageSpec,
        ctx: &Arc<AnalysisContext>,
        reporter: &dyn ProgressReporter,
        completed: usize,
        total: usize,
        active: &mut FuturesUnordered<StageFuture>,
    ) -> Result<(), PipelineError> {
        ensure_dependencies_completed(spec, ctx)?;

        let percent = completed as f64 / total as f64 * 100.0;
        notify_safely(reporter, &spec.name, percent, &spec.runner.progress_message());
        tracing::debug!(stage = %spec.name, percent, "dispatching stage");

        let runner = spec.runner.clone();
        let name = spec.name.clone();
        let stage_ctx = StageContext::new(ctx.clone(), &spec.name, spec.dependencies.clone());

        active.push(Box::pin(async move {
            let started = Instant::now();
            let output = runner.execute(&stage_ctx).await;
            let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;
            let output = output.add_metadata("duration_ms", serde_json::json!(elapsed_ms));
            (name, output)
        }));

        Ok(())
    }
}

/// Checks that every declared dependency has a completed entry. Unreachable
/// for a correct scheduler over a validated graph; a violation is a static
/// precondition failure, never a retry case.
pub(crate) fn ensure_dependencies_completed(
    spec: &StageSpec,
    ctx: &AnalysisContext,
) -> Result<(), MissingDependencyError> {
    for dependency in &spec.dependencies {
        if !ctx.is_completed(dependency) {
            return Err(MissingDependencyError::new(&spec.name, dependency));
        }
    }
    Ok(())
}

fn failure_description(output: &StageOutput) -> String {
    if let Some(error) = &output.error {
        return error.clone();
    }
    if let Some(reason) = &output.skip_reason {
        return format!("mandatory stage reported skipped: {reason}");
    }
    "stage did not complete".to_string()
}

/// Invokes the reporter, containing any panic so that a faulty observer can
/// never stall or abort the run.
fn notify_safely(reporter: &dyn ProgressReporter, stage: &str, percent: f64, message: &str) {
    let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        reporter.notify(stage, percent, message);
    }));
    if outcome.is_err() {
        tracing::warn!(stage = %stage, "progress reporter panicked; continuing run");
    }
}
