#![deny(unsafe_code)]

use std::collections::BTreeMap;
use std::sync::Arc;

use survey_model::{CodeScheme, CodingPlan, LocationHierarchy};
use tracing::info;

use crate::config::PipelineConfig;
use crate::error::StandardsError;
use crate::hierarchy::load_location_hierarchy;
use crate::plans::{demog_coding_plans, follow_up_coding_plans, rqa_coding_plans, scheme_keys};
use crate::registry::SchemeRegistry;

/// Everything a pipeline run needs, loaded and validated once up front.
#[derive(Debug, Clone)]
pub struct PipelineConfiguration {
    pipeline_name: String,
    schemes: SchemeRegistry,
    location_hierarchy: Arc<LocationHierarchy>,
    rqa_coding_plans: Vec<CodingPlan>,
    demog_coding_plans: Vec<CodingPlan>,
    follow_up_coding_plans: Vec<CodingPlan>,
}

impl PipelineConfiguration {
    /// Load every scheme and the location hierarchy named by `config`, then
    /// build the plan groups.
    pub fn initialize(config: &PipelineConfig) -> Result<Self, StandardsError> {
        let schemes = SchemeRegistry::load(config)?;
        let hierarchy_path = config
            .location_hierarchy_path()
            .ok_or(StandardsError::MissingHierarchy)?;
        let location_hierarchy = Arc::new(load_location_hierarchy(&hierarchy_path)?);
        Self::from_parts(&config.pipeline_name, schemes, location_hierarchy)
    }

    /// Build plan groups from already-loaded schemes.
    pub fn from_parts(
        pipeline_name: &str,
        schemes: SchemeRegistry,
        location_hierarchy: Arc<LocationHierarchy>,
    ) -> Result<Self, StandardsError> {
        let rqa_coding_plans = rqa_coding_plans(pipeline_name, &schemes)?;
        let demog_coding_plans = demog_coding_plans(&schemes, &location_hierarchy)?;
        let follow_up_coding_plans = follow_up_coding_plans();

        let pipeline = Self {
            pipeline_name: pipeline_name.to_string(),
            schemes,
            location_hierarchy,
            rqa_coding_plans,
            demog_coding_plans,
            follow_up_coding_plans,
        };
        pipeline.check_field_collisions()?;

        info!(
            pipeline = %pipeline.pipeline_name,
            schemes = pipeline.schemes.len(),
            rqa_plans = pipeline.rqa_coding_plans.len(),
            demog_plans = pipeline.demog_coding_plans.len(),
            follow_up_plans = pipeline.follow_up_coding_plans.len(),
            "pipeline configuration initialized"
        );
        Ok(pipeline)
    }

    /// Raw and coded field names must be unique across every plan, since
    /// they share one output row per subject.
    fn check_field_collisions(&self) -> Result<(), StandardsError> {
        let mut owners: BTreeMap<&str, &str> = BTreeMap::new();
        for plan in self.all_plans() {
            let fields = std::iter::once(plan.raw_field()).chain(plan.coded_fields());
            for field in fields {
                if let Some(other) = owners.insert(field, plan.dataset_name()) {
                    return Err(StandardsError::InvalidConfig {
                        message: format!(
                            "field '{field}' is used by both '{other}' and '{}'",
                            plan.dataset_name()
                        ),
                    });
                }
            }
        }
        Ok(())
    }

    pub fn pipeline_name(&self) -> &str {
        &self.pipeline_name
    }

    pub fn schemes(&self) -> &SchemeRegistry {
        &self.schemes
    }

    pub fn location_hierarchy(&self) -> &Arc<LocationHierarchy> {
        &self.location_hierarchy
    }

    pub fn rqa_coding_plans(&self) -> &[CodingPlan] {
        &self.rqa_coding_plans
    }

    pub fn demog_coding_plans(&self) -> &[CodingPlan] {
        &self.demog_coding_plans
    }

    pub fn follow_up_coding_plans(&self) -> &[CodingPlan] {
        &self.follow_up_coding_plans
    }

    /// RQA, then demographic, then follow-up plans.
    pub fn all_plans(&self) -> impl Iterator<Item = &CodingPlan> {
        self.rqa_coding_plans
            .iter()
            .chain(&self.demog_coding_plans)
            .chain(&self.follow_up_coding_plans)
    }

    pub fn plan(&self, dataset_name: &str) -> Option<&CodingPlan> {
        self.all_plans()
            .find(|plan| plan.dataset_name() == dataset_name)
    }

    /// The scheme holding one weak-sourcing (WS) correction code per dataset.
    pub fn ws_correct_dataset_scheme(&self) -> Result<&Arc<CodeScheme>, StandardsError> {
        self.schemes.require(scheme_keys::WS_CORRECT_DATASET)
    }
}
