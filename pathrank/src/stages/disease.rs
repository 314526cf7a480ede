//! Curated disease association lookup.

use super::{names, Stage};
use crate::clients::DiseaseCatalog;
use crate::context::StageContext;
use crate::core::{StageArtifact, StageOutput};
use crate::model::DiseaseAssociation;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

/// Looks up curated disease associations for each accepted seed gene. The
/// catalog is an in-memory curated table, so this stage never suspends.
pub struct MapDiseasesStage {
    catalog: Arc<dyn DiseaseCatalog>,
}

impl MapDiseasesStage {
    /// Creates the stage with its curated catalog.
    #[must_use]
    pub fn new(catalog: Arc<dyn DiseaseCatalog>) -> Self {
        Self { catalog }
    }
}

impl std::fmt::Debug for MapDiseasesStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MapDiseasesStage").finish_non_exhaustive()
    }
}

#[async_trait]
impl Stage for MapDiseasesStage {
    fn name(&self) -> &str {
        names::MAP_DISEASES
    }

    fn progress_message(&self) -> String {
        "Mapping curated disease associations".to_string()
    }

    async fn execute(&self, ctx: &StageContext) -> StageOutput {
        let Some(validated) = ctx.analysis().validated_genes() else {
            return StageOutput::failed("validated gene list missing from context");
        };

        let mut associations: Vec<DiseaseAssociation> = Vec::new();
        for gene in &validated.accepted {
            associations.extend(self.catalog.associations_for(gene));
        }

        let genes_with_hits = associations
            .iter()
            .map(|a| a.gene.as_str())
            .collect::<std::collections::HashSet<_>>()
            .len();

        let mut payload = HashMap::new();
        payload.insert("association_count".to_string(), serde_json::json!(associations.len()));
        payload.insert("genes_with_associations".to_string(), serde_json::json!(genes_with_hits));

        StageOutput::completed_with(
            StageArtifact::DiseaseAssociations(Arc::new(associations)),
            payload,
        )
    }
}
