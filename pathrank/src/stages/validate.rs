//! Seed gene validation.

use super::{names, Stage};
use crate::clients::{ClientError, GeneCatalogClient};
use crate::context::StageContext;
use crate::core::{StageArtifact, StageOutput};
use crate::model::{RejectedGene, ValidatedGenes};
use async_trait::async_trait;
use regex::Regex;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

/// Accepts HGNC-style symbols: leading letter, then letters, digits, or
/// dashes, at most 20 characters.
fn symbol_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[A-Z][A-Z0-9-]{0,19}$").expect("literal pattern is valid")
    })
}

/// Normalizes and validates the caller-supplied seed genes.
///
/// Symbols are trimmed, uppercased, and deduplicated in input order, then
/// shape-checked locally before the surviving set is confirmed against the
/// gene catalog. Rejections become run warnings; an empty accepted set fails
/// the stage.
pub struct ValidateGenesStage {
    catalog: Arc<dyn GeneCatalogClient>,
}

impl ValidateGenesStage {
    /// Creates the stage with its catalog collaborator.
    #[must_use]
    pub fn new(catalog: Arc<dyn GeneCatalogClient>) -> Self {
        Self { catalog }
    }

    async fn run(&self, ctx: &StageContext) -> Result<StageOutput, ClientError> {
        let mut shaped = Vec::new();
        let mut rejected = Vec::new();
        let mut seen = std::collections::HashSet::new();

        for raw in ctx.analysis().seed_genes() {
            let symbol = raw.trim().to_ascii_uppercase();
            if symbol.is_empty() || !seen.insert(symbol.clone()) {
                continue;
            }
            if symbol_pattern().is_match(&symbol) {
                shaped.push(symbol);
            } else {
                rejected.push(RejectedGene::new(raw.clone(), "not a recognizable gene symbol"));
            }
        }

        let confirmed = self.catalog.validate_symbols(&shaped).await?;

        let mut all_rejected = rejected;
        all_rejected.extend(confirmed.rejected);
        let validated = ValidatedGenes {
            accepted: confirmed.accepted,
            rejected: all_rejected,
        };

        for rejection in &validated.rejected {
            ctx.analysis().push_warning(format!(
                "seed gene '{}' rejected: {}",
                rejection.symbol, rejection.reason
            ));
        }

        if validated.is_empty() {
            return Ok(StageOutput::failed("no valid seed genes after validation"));
        }

        let mut payload = HashMap::new();
        payload.insert("accepted_count".to_string(), serde_json::json!(validated.accepted.len()));
        payload.insert("rejected_count".to_string(), serde_json::json!(validated.rejected.len()));
        payload.insert("accepted".to_string(), serde_json::json!(validated.accepted));

        Ok(StageOutput::completed_with(
            StageArtifact::ValidatedGenes(Arc::new(validated)),
            payload,
        ))
    }
}

impl std::fmt::Debug for ValidateGenesStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValidateGenesStage").finish_non_exhaustive()
    }
}

#[async_trait]
impl Stage for ValidateGenesStage {
    fn name(&self) -> &str {
        names::VALIDATE_GENES
    }

    fn progress_message(&self) -> String {
        "Validating seed genes".to_string()
    }

    async fn execute(&self, ctx: &StageContext) -> StageOutput {
        match self.run(ctx).await {
            Ok(output) => output,
            Err(err) => StageOutput::failed(err.to_string()),
        }
    }
}
