#![deny(unsafe_code)]

//! Coding plans for the constitution-review pipeline.
//!
//! Plans fall into three groups: the open-ended research questions (RQA),
//! the demographic questions shared across projects, and follow-up
//! questions (none yet).

use std::sync::Arc;

use survey_model::{
    Cleaner, CodingConfiguration, CodingPlan, ImputationRule, LocationHierarchy, RawFoldStrategy,
};

use crate::error::StandardsError;
use crate::registry::SchemeRegistry;

pub mod scheme_keys {
    pub const APPOINTMENT_VIEWS: &str = "appointment_views";
    pub const APPOINTMENT_BENEFIT: &str = "appointment_benefit";
    pub const APPOINTMENT_CHALLENGES: &str = "appointment_challenges";
    pub const OTHER_MESSAGES: &str = "other_messages";

    pub const GENDER: &str = "gender";
    pub const AGE: &str = "age";
    pub const AGE_CATEGORY: &str = "age_category";
    pub const KENYA_COUNTY: &str = "kenya_county";
    pub const KENYA_CONSTITUENCY: &str = "kenya_constituency";
    pub const DISABLED: &str = "disabled";

    pub const WS_CORRECT_DATASET: &str = "ws_correct_dataset";
}

const RQA_DATASETS: &[&str] = &[
    scheme_keys::APPOINTMENT_VIEWS,
    scheme_keys::APPOINTMENT_BENEFIT,
    scheme_keys::APPOINTMENT_CHALLENGES,
    scheme_keys::OTHER_MESSAGES,
];

const DEMOG_CODA_PREFIX: &str = "Kenya_Pool";

/// One multi-coded plan per open-ended question. Repeated answers are
/// concatenated.
pub fn rqa_coding_plans(
    pipeline_name: &str,
    schemes: &SchemeRegistry,
) -> Result<Vec<CodingPlan>, StandardsError> {
    RQA_DATASETS
        .iter()
        .map(|&dataset| -> Result<CodingPlan, StandardsError> {
            let scheme = schemes.require(dataset)?;
            let plan = CodingPlan::builder(
                dataset,
                format!("{dataset}_raw"),
                "sent_on",
                RawFoldStrategy::Concatenate,
            )
            .run_id_field(format!("{dataset}_run_id"))
            .coda_filename(format!("{pipeline_name}_{dataset}.json"))
            .icr_filename(format!("{dataset}.csv"))
            .configuration(CodingConfiguration::multiple(
                scheme,
                format!("{dataset}_coded"),
                dataset,
            ))
            .build()?;
            Ok(plan)
        })
        .collect()
}

/// Demographic plans. Answers are expected not to change between asks, so
/// both raw text and codes must agree.
pub fn demog_coding_plans(
    schemes: &SchemeRegistry,
    location_hierarchy: &Arc<LocationHierarchy>,
) -> Result<Vec<CodingPlan>, StandardsError> {
    let ws = schemes.require(scheme_keys::WS_CORRECT_DATASET)?;
    let demog = |dataset: &str, raw_field: &str, time_field: &str| {
        CodingPlan::builder(dataset, raw_field, time_field, RawFoldStrategy::AssertEqual)
            .coda_filename(format!("{DEMOG_CODA_PREFIX}_{dataset}.json"))
            .ws_scheme(ws)
    };

    let gender = demog("gender", "gender_raw", "gender_time")
        .configuration(
            CodingConfiguration::single(
                schemes.require(scheme_keys::GENDER)?,
                "gender_coded",
                "gender",
            )
            .with_cleaner(Cleaner::Gender),
        )
        .build()?;

    let age = demog("age", "age_raw", "age_time")
        .configuration(
            CodingConfiguration::single(schemes.require(scheme_keys::AGE)?, "age_coded", "age")
                .with_cleaner(Cleaner::AgeWithRangeFilter)
                .with_theme_distribution(false),
        )
        .configuration(CodingConfiguration::single(
            schemes.require(scheme_keys::AGE_CATEGORY)?,
            "age_category_coded",
            "age_category",
        ))
        .code_imputation(ImputationRule::AgeCategory {
            age_field: "age_coded".to_string(),
            age_category_field: "age_category_coded".to_string(),
        })
        .build()?;

    let location = demog("location", "location_raw", "location_time")
        .configuration(CodingConfiguration::single(
            schemes.require(scheme_keys::KENYA_COUNTY)?,
            "county_coded",
            "county",
        ))
        .configuration(CodingConfiguration::single(
            schemes.require(scheme_keys::KENYA_CONSTITUENCY)?,
            "constituency_coded",
            "constituency",
        ))
        .code_imputation(ImputationRule::LocationHierarchy {
            fine_field: "constituency_coded".to_string(),
            coarse_field: "county_coded".to_string(),
            hierarchy: Arc::clone(location_hierarchy),
        })
        .build()?;

    let disabled = demog("disabled", "disabled_raw", "disabled_time")
        .configuration(CodingConfiguration::single(
            schemes.require(scheme_keys::DISABLED)?,
            "disabled_coded",
            "disabled",
        ))
        .build()?;

    Ok(vec![gender, age, location, disabled])
}

/// Reserved for follow-up questions.
pub fn follow_up_coding_plans() -> Vec<CodingPlan> {
    Vec::new()
}
