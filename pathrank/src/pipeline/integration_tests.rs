//! End-to-end tests of the full analysis pipeline against fixture
//! collaborators.

use crate::analysis::{AnalysisPipeline, RunReport};
use crate::config::AnalysisConfig;
use crate::context::AnalysisContext;
use crate::errors::PipelineError;
use crate::progress::{CollectingProgressReporter, NoOpProgressReporter};
use crate::scoring::{components, CompositeScorer};
use crate::stages::names;
use crate::testing::{FailingEnrichmentClient, FixtureCollaborators};
use pretty_assertions::assert_eq;
use std::sync::Arc;

fn pipeline() -> AnalysisPipeline {
    AnalysisPipeline::new(
        FixtureCollaborators::default().into_collaborators(),
        AnalysisConfig::default(),
    )
    .unwrap()
}

fn seed_genes() -> Vec<String> {
    crate::testing::fixtures::seed_genes()
}

async fn run_to_context(pipeline: &AnalysisPipeline) -> (Arc<AnalysisContext>, RunReport) {
    let ctx = Arc::new(AnalysisContext::new(seed_genes(), pipeline.config().clone()));
    let report = pipeline
        .run_with_context(ctx.clone(), Arc::new(NoOpProgressReporter))
        .await
        .unwrap();
    (ctx, report)
}

#[tokio::test]
async fn test_full_run_completes_every_stage() {
    let pipeline = pipeline();
    let (_, report) = run_to_context(&pipeline).await;

    assert_eq!(report.stages.len(), 11);
    assert!(report.all_completed());
    assert!(report.elapsed_seconds >= 0.0);

    for name in pipeline.execution_order() {
        let result = report.stage(name).unwrap();
        assert!(result.is_completed(), "stage {name} not completed");
    }
}

#[tokio::test]
async fn test_final_ranking_is_contiguous_and_bounded() {
    let pipeline = pipeline();
    let (ctx, _) = run_to_context(&pipeline).await;

    let ranked = ctx.rescored_hypotheses().unwrap();
    assert!(!ranked.is_empty());

    let mut ranks: Vec<u32> = ranked.iter().map(|h| h.rank).collect();
    ranks.sort_unstable();
    assert_eq!(ranks, (1..=ranked.len() as u32).collect::<Vec<u32>>());

    for hypothesis in ranked.iter() {
        let aggregation = hypothesis.component(components::AGGREGATION_WEIGHT).unwrap();
        assert!((1.0..=1.5).contains(&aggregation));
        let centrality = hypothesis.component(components::CENTRALITY_WEIGHT).unwrap();
        assert!((1.0..=1.8).contains(&centrality));
    }
}

#[tokio::test]
async fn test_identical_runs_produce_identical_rankings() {
    let pipeline = pipeline();

    let (ctx_a, _) = run_to_context(&pipeline).await;
    let (ctx_b, _) = run_to_context(&pipeline).await;

    let ranked_a = ctx_a.rescored_hypotheses().unwrap();
    let ranked_b = ctx_b.rescored_hypotheses().unwrap();

    assert_eq!(ranked_a.as_ref(), ranked_b.as_ref());
}

#[tokio::test]
async fn test_rescoring_pass_is_idempotent_on_run_output() {
    let pipeline = pipeline();
    let (ctx, _) = run_to_context(&pipeline).await;

    let ranked = ctx.rescored_hypotheses().unwrap();
    let hood = ctx.neighborhood().unwrap();
    let topology = ctx.topology().unwrap();

    let scorer = CompositeScorer::new(pipeline.config().scoring.database_weights.clone());
    let again = scorer.rescore(&ranked, Some(&hood), Some(&topology));

    assert_eq!(ranked.as_ref(), &again);
}

#[tokio::test]
async fn test_failed_enrichment_aborts_without_completing_dependents() {
    let mut collaborators = FixtureCollaborators::default().into_collaborators();
    collaborators.enrichment = Arc::new(FailingEnrichmentClient::new("enrichment service down"));
    let pipeline = AnalysisPipeline::new(collaborators, AnalysisConfig::default()).unwrap();

    let ctx = Arc::new(AnalysisContext::new(seed_genes(), AnalysisConfig::default()));
    let err = pipeline
        .run_with_context(ctx.clone(), Arc::new(NoOpProgressReporter))
        .await
        .unwrap_err();

    let failing = err.failing_stage().unwrap().to_string();
    assert!(failing.starts_with("enrich"), "unexpected failing stage {failing}");

    // Nothing downstream of an enrichment stage may report completed.
    for name in [
        names::AGGREGATE_PATHWAYS,
        names::SCORE_HYPOTHESES,
        names::RESCORE_HYPOTHESES,
        names::FETCH_LITERATURE,
    ] {
        assert!(!ctx.is_completed(name), "dependent stage {name} completed");
    }
}

#[tokio::test]
async fn test_cancelled_run_returns_cancelled_error() {
    let pipeline = pipeline();
    let ctx = Arc::new(AnalysisContext::new(seed_genes(), AnalysisConfig::default()));
    ctx.mark_cancelled();

    let err = pipeline
        .run_with_context(ctx, Arc::new(NoOpProgressReporter))
        .await
        .unwrap_err();

    assert!(matches!(err, PipelineError::Cancelled(_)));
}

#[tokio::test]
async fn test_rejected_seed_symbols_become_warnings_not_failures() {
    let pipeline = pipeline();
    let seeds = vec![
        "TP53".to_string(),
        "BRCA1".to_string(),
        "DEFINITELY_NOT_A_GENE_SYMBOL_123456".to_string(),
    ];

    let report = pipeline
        .run(seeds, Arc::new(NoOpProgressReporter))
        .await
        .unwrap();

    assert!(report.all_completed());
    assert!(report.warnings.iter().any(|w| w.contains("rejected")));
}

#[tokio::test]
async fn test_progress_reaches_one_hundred_percent() {
    let pipeline = pipeline();
    let reporter = Arc::new(CollectingProgressReporter::new());

    pipeline
        .run(seed_genes(), reporter.clone())
        .await
        .unwrap();

    let updates = reporter.updates();
    // One notification per stage plus the terminal marker.
    assert_eq!(updates.len(), 12);
    for pair in updates.windows(2) {
        assert!(pair[1].percent >= pair[0].percent);
    }
    let last = updates.last().unwrap();
    assert_eq!(last.stage, "complete");
    assert!((last.percent - 100.0).abs() < f64::EPSILON);
}

#[tokio::test]
async fn test_run_report_round_trips_through_json() {
    let pipeline = pipeline();
    let (_, report) = run_to_context(&pipeline).await;

    let json = serde_json::to_string_pretty(&report).unwrap();
    let back: RunReport = serde_json::from_str(&json).unwrap();

    assert_eq!(back.analysis_id, report.analysis_id);
    assert_eq!(back.stages.len(), report.stages.len());
    assert!(back.all_completed());
}

#[tokio::test]
async fn test_multi_route_pathways_carry_support_bonus() {
    let pipeline = pipeline();
    let (ctx, _) = run_to_context(&pipeline).await;

    let aggregated = ctx.aggregated_pathways().unwrap();
    // Seed and neighborhood enrichment both find the p53 pathways.
    let multi = aggregated.iter().find(|p| p.support_count > 1);
    assert!(multi.is_some(), "expected at least one multi-route pathway");

    let ranked = ctx.rescored_hypotheses().unwrap();
    let hypothesis = ranked
        .iter()
        .find(|h| h.pathway.support_count > 1)
        .unwrap();
    assert!(hypothesis.component(components::AGGREGATION_WEIGHT).unwrap() > 1.0);
}
