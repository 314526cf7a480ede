//! Tissue-expression lookup.

use super::{names, Stage};
use crate::clients::{ClientError, ExpressionClient};
use crate::context::StageContext;
use crate::core::{StageArtifact, StageOutput};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

/// Fetches tissue-expression profiles for the accepted seed genes; the
/// profiles travel with the report, they do not influence scoring.
pub struct FetchExpressionStage {
    expression: Arc<dyn ExpressionClient>,
}

impl FetchExpressionStage {
    /// Creates the stage with its expression collaborator.
    #[must_use]
    pub fn new(expression: Arc<dyn ExpressionClient>) -> Self {
        Self { expression }
    }

    async fn run(&self, ctx: &StageContext) -> Result<StageOutput, ClientError> {
        let Some(validated) = ctx.analysis().validated_genes() else {
            return Ok(StageOutput::failed("validated gene list missing from context"));
        };

        let profiles = self.expression.expression_profiles(&validated.accepted).await?;

        let mut payload = HashMap::new();
        payload.insert("profile_count".to_string(), serde_json::json!(profiles.len()));

        Ok(StageOutput::completed_with(
            StageArtifact::ExpressionProfiles(Arc::new(profiles)),
            payload,
        ))
    }
}

impl std::fmt::Debug for FetchExpressionStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FetchExpressionStage").finish_non_exhaustive()
    }
}

#[async_trait]
impl Stage for FetchExpressionStage {
    fn name(&self) -> &str {
        names::FETCH_EXPRESSION
    }

    fn progress_message(&self) -> String {
        "Fetching tissue expression profiles".to_string()
    }

    async fn execute(&self, ctx: &StageContext) -> StageOutput {
        match self.run(ctx).await {
            Ok(output) => output,
            Err(err) => StageOutput::failed(err.to_string()),
        }
    }
}
