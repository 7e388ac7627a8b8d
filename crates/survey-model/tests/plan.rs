//! Tests for coding plan construction invariants.

use std::sync::Arc;

use survey_model::{
    Cleaner, Code, CodeScheme, CodingConfiguration, CodingMode, CodingPlan, ControlCode,
    ErrorKind, ImputationRule, LabelFoldStrategy, RawFoldStrategy,
};

fn scheme(id: &str, values: &[&str]) -> Arc<CodeScheme> {
    let mut codes: Vec<Code> = values
        .iter()
        .map(|value| Code::normal(format!("code-{value}"), *value).with_match_value(*value))
        .collect();
    codes.push(Code::control(format!("{id}-NC"), ControlCode::NotCoded));
    Arc::new(CodeScheme::new(id, id, None, codes).unwrap())
}

fn ws_scheme() -> Arc<CodeScheme> {
    scheme("Scheme-ws", &["gender", "age"])
}

#[test]
fn plan_resolves_ws_code_by_dataset_name() {
    let gender = scheme("Scheme-gender", &["male", "female"]);
    let plan = CodingPlan::builder("gender", "gender_raw", "gender_time", RawFoldStrategy::AssertEqual)
        .coda_filename("Kenya_Pool_gender.json")
        .configuration(
            CodingConfiguration::single(&gender, "gender_coded", "gender")
                .with_cleaner(Cleaner::Gender),
        )
        .ws_scheme(&ws_scheme())
        .build()
        .unwrap();

    assert_eq!(plan.ws_code().unwrap().code_id, "code-gender");
    assert_eq!(plan.coded_fields().collect::<Vec<_>>(), vec!["gender_coded"]);
    assert_eq!(plan.coda_filename(), Some("Kenya_Pool_gender.json"));
    assert_eq!(
        plan.configuration_for("gender_coded").unwrap().cleaner(),
        Some(Cleaner::Gender)
    );
}

#[test]
fn missing_ws_match_is_a_lookup_error() {
    let disabled = scheme("Scheme-disabled", &["yes", "no"]);
    let err = CodingPlan::builder("disabled", "disabled_raw", "disabled_time", RawFoldStrategy::AssertEqual)
        .configuration(CodingConfiguration::single(&disabled, "disabled_coded", "disabled"))
        .ws_scheme(&ws_scheme())
        .build()
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Lookup);
}

#[test]
fn duplicate_coded_fields_are_rejected() {
    let age = scheme("Scheme-age", &["20"]);
    let err = CodingPlan::builder("age", "age_raw", "age_time", RawFoldStrategy::AssertEqual)
        .configuration(CodingConfiguration::single(&age, "age_coded", "age"))
        .configuration(CodingConfiguration::single(&age, "age_coded", "age_again"))
        .build()
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Configuration);
    assert!(err.to_string().contains("declared twice"));
}

#[test]
fn empty_plan_is_rejected() {
    let err = CodingPlan::builder("empty", "empty_raw", "sent_on", RawFoldStrategy::Concatenate)
        .build()
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Configuration);
}

#[test]
fn single_mode_requires_assert_strategy() {
    let views = scheme("Scheme-views", &["support"]);
    let config = CodingConfiguration::new(
        CodingMode::Single,
        &views,
        "views_coded",
        "views",
        LabelFoldStrategy::list_of_labels(&views),
    );
    let err = CodingPlan::builder("views", "views_raw", "sent_on", RawFoldStrategy::Concatenate)
        .configuration(config)
        .build()
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Configuration);
}

#[test]
fn multiple_mode_must_union_its_own_scheme() {
    let views = scheme("Scheme-views", &["support"]);
    let other = scheme("Scheme-other", &["support"]);
    let config = CodingConfiguration::new(
        CodingMode::Multiple,
        &views,
        "views_coded",
        "views",
        LabelFoldStrategy::list_of_labels(&other),
    );
    let err = CodingPlan::builder("views", "views_raw", "sent_on", RawFoldStrategy::Concatenate)
        .configuration(config)
        .build()
        .unwrap_err();
    assert!(err.to_string().contains("Scheme-other"));
}

#[test]
fn imputation_fields_must_belong_to_plan() {
    let age = scheme("Scheme-age", &["20"]);
    let err = CodingPlan::builder("age", "age_raw", "age_time", RawFoldStrategy::AssertEqual)
        .configuration(CodingConfiguration::single(&age, "age_coded", "age"))
        .code_imputation(ImputationRule::AgeCategory {
            age_field: "age_coded".to_string(),
            age_category_field: "age_category_coded".to_string(),
        })
        .build()
        .unwrap_err();
    assert!(err.to_string().contains("age_category_coded"));
}

#[test]
fn theme_distribution_flag_defaults_to_true() {
    let age = scheme("Scheme-age", &["20"]);
    let included = CodingConfiguration::single(&age, "age_coded", "age");
    let excluded = included.clone().with_theme_distribution(false);
    assert!(included.include_in_theme_distribution());
    assert!(!excluded.include_in_theme_distribution());
}
