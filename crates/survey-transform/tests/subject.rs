//! Tests for per-subject reconciliation and automatic coding.

use std::io;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, Utc};
use survey_model::{
    Cleaner, Code, CodeScheme, CodedValue, CodingConfiguration, CodingPlan, ControlCode,
    ImputationRule, Observation, Origin, RawFoldStrategy,
};
use survey_transform::{SubjectObservations, TransformError, auto_code, reconcile_subject};

fn at(minutes: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(1_600_000_000, 0).unwrap() + Duration::minutes(minutes)
}

fn cleaner_origin() -> Origin {
    Origin::new("survey_transform.auto_code", "cleaner", "Automatic")
}

fn gender_scheme() -> Arc<CodeScheme> {
    Arc::new(
        CodeScheme::new(
            "Scheme-gender",
            "gender",
            None,
            vec![
                Code::normal("code-male", "male").with_match_value("male"),
                Code::normal("code-female", "female").with_match_value("female"),
                Code::control("code-gender-NC", ControlCode::NotCoded),
                Code::control("code-gender-NR", ControlCode::NotReviewed),
            ],
        )
        .unwrap(),
    )
}

fn age_scheme() -> Arc<CodeScheme> {
    let mut codes: Vec<Code> = (10..100)
        .map(|age| {
            Code::normal(format!("code-age-{age}"), age.to_string())
                .with_match_value(age.to_string())
                .with_numeric_value(age)
        })
        .collect();
    codes.push(Code::control("code-age-NC", ControlCode::NotCoded));
    Arc::new(CodeScheme::new("Scheme-age", "age", None, codes).unwrap())
}

fn age_category_scheme() -> Arc<CodeScheme> {
    Arc::new(
        CodeScheme::new(
            "Scheme-age-category",
            "age_category",
            None,
            vec![
                Code::normal("code-young", "young").with_match_value("10 to 35"),
                Code::normal("code-old", "old").with_match_value("36 to 99"),
                Code::control("code-cat-NC", ControlCode::NotCoded),
            ],
        )
        .unwrap(),
    )
}

fn plans() -> Vec<CodingPlan> {
    let gender = gender_scheme();
    let age = age_scheme();
    let age_category = age_category_scheme();
    vec![
        CodingPlan::builder("gender", "gender_raw", "gender_time", RawFoldStrategy::AssertEqual)
            .configuration(
                CodingConfiguration::single(&gender, "gender_coded", "gender")
                    .with_cleaner(Cleaner::Gender),
            )
            .build()
            .unwrap(),
        CodingPlan::builder("age", "age_raw", "age_time", RawFoldStrategy::AssertEqual)
            .configuration(
                CodingConfiguration::single(&age, "age_coded", "age")
                    .with_cleaner(Cleaner::AgeWithRangeFilter)
                    .with_theme_distribution(false),
            )
            .configuration(CodingConfiguration::single(
                &age_category,
                "age_category_coded",
                "age_category",
            ))
            .code_imputation(ImputationRule::AgeCategory {
                age_field: "age_coded".to_string(),
                age_category_field: "age_category_coded".to_string(),
            })
            .build()
            .unwrap(),
    ]
}

fn coded(plan: &CodingPlan, field: &str, raw: &str, minutes: i64) -> Observation<CodedValue> {
    let config = plan.configuration_for(field).unwrap();
    Observation::new(
        at(minutes),
        auto_code(config, raw, &cleaner_origin(), at(minutes)).unwrap(),
    )
}

#[test]
fn auto_code_resolves_cleaned_values_by_match_value() {
    let plans = plans();
    let gender = plans[0].configuration_for("gender_coded").unwrap();
    let value = auto_code(gender, "mwanamke", &cleaner_origin(), at(0)).unwrap();
    assert_eq!(value.code_ids(), vec!["code-female"]);

    let value = auto_code(gender, "sijui", &cleaner_origin(), at(0)).unwrap();
    assert_eq!(value.code_ids(), vec!["code-gender-NC"]);

    let age = plans[1].configuration_for("age_coded").unwrap();
    let value = auto_code(age, "nina miaka 9", &cleaner_origin(), at(0)).unwrap();
    assert_eq!(value.code_ids(), vec!["code-age-NC"]);
}

#[test]
fn configurations_without_cleaner_are_not_reviewed() {
    let gender = gender_scheme();
    let config = CodingConfiguration::single(&gender, "gender_coded", "gender");
    let value = auto_code(&config, "male", &cleaner_origin(), at(0)).unwrap();
    assert_eq!(value.code_ids(), vec!["code-gender-NR"]);
}

#[test]
fn reconciles_and_imputes_a_consistent_subject() {
    let plans = plans();
    let mut subject = SubjectObservations {
        subject_id: "avf-phone-uuid-1".to_string(),
        ..SubjectObservations::default()
    };
    subject.raw.insert(
        "age_raw".to_string(),
        vec![
            Observation::new(at(0), "22".to_string()),
            Observation::new(at(60), "22".to_string()),
        ],
    );
    subject.coded.insert(
        "age_coded".to_string(),
        vec![
            coded(&plans[1], "age_coded", "22", 0),
            coded(&plans[1], "age_coded", "22", 60),
        ],
    );

    let outcome = reconcile_subject(&plans, &subject);
    assert!(outcome.is_ok(), "{:?}", outcome.errors);
    assert_eq!(outcome.folded.raw["age_raw"], "22");
    assert_eq!(outcome.folded.coded["age_coded"].code_ids(), vec!["code-age-22"]);
    assert_eq!(
        outcome.folded.coded["age_category_coded"].code_ids(),
        vec!["code-young"]
    );
    assert!(!outcome.folded.raw.contains_key("gender_raw"));
}

#[test]
fn not_coded_age_propagates_to_category() {
    let plans = plans();
    let mut subject = SubjectObservations {
        subject_id: "avf-phone-uuid-2".to_string(),
        ..SubjectObservations::default()
    };
    subject.coded.insert(
        "age_coded".to_string(),
        vec![coded(&plans[1], "age_coded", "150", 0)],
    );
    let outcome = reconcile_subject(&plans, &subject);
    assert_eq!(
        outcome.folded.coded["age_category_coded"].code_ids(),
        vec!["code-cat-NC"]
    );
}

#[test]
fn failures_are_attributed_per_field() {
    let plans = plans();
    let mut subject = SubjectObservations {
        subject_id: "avf-phone-uuid-3".to_string(),
        ..SubjectObservations::default()
    };
    subject.raw.insert(
        "gender_raw".to_string(),
        vec![
            Observation::new(at(0), "male".to_string()),
            Observation::new(at(5), "female".to_string()),
        ],
    );
    subject.coded.insert(
        "gender_coded".to_string(),
        vec![
            coded(&plans[0], "gender_coded", "male", 0),
            coded(&plans[0], "gender_coded", "female", 5),
        ],
    );
    subject.raw.insert(
        "age_raw".to_string(),
        vec![Observation::new(at(0), "30".to_string())],
    );

    let outcome = reconcile_subject(&plans, &subject);
    let fields: Vec<&str> = outcome.errors.iter().map(|e| e.field.as_str()).collect();
    assert_eq!(fields, vec!["gender_raw", "gender_coded"]);
    assert!(
        outcome
            .errors
            .iter()
            .all(|e| e.subject_id == "avf-phone-uuid-3")
    );
    assert!(matches!(
        outcome.errors[0].source,
        TransformError::Fold(ref fold) if fold.is_inconsistency()
    ));
    // Other fields of the same subject still fold.
    assert_eq!(outcome.folded.raw["age_raw"], "30");
}

#[test]
fn observations_deserialize_from_json() {
    let json = r#"{
        "subject_id": "avf-phone-uuid-4",
        "raw": {
            "gender_raw": [
                {"time": "2020-09-13T12:26:40Z", "run_id": "run-1", "value": "male"}
            ]
        }
    }"#;
    let subject: SubjectObservations = serde_json::from_str(json).unwrap();
    assert_eq!(subject.raw["gender_raw"][0].run_id.as_deref(), Some("run-1"));
    assert!(subject.coded.is_empty());
}

#[derive(Clone, Default)]
struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    fn contents(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn subject_id_is_not_logged() {
    let plans = plans();
    let subject_id = "avf-phone-SECRET-0712345678";
    let mut subject = SubjectObservations {
        subject_id: subject_id.to_string(),
        ..SubjectObservations::default()
    };
    subject.raw.insert(
        "gender_raw".to_string(),
        vec![
            Observation::new(at(0), "male".to_string()),
            Observation::new(at(5), "female".to_string()),
        ],
    );

    let logs = CapturedLogs::default();
    let writer = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();
    let outcome = tracing::subscriber::with_default(subscriber, || {
        reconcile_subject(&plans, &subject)
    });

    assert_eq!(outcome.errors[0].subject_id, subject_id);
    let output = logs.contents();
    assert!(output.contains("raw field fold failed"), "{output}");
    assert!(!output.contains(subject_id), "{output}");
    assert!(!output.contains("0712345678"), "{output}");
}
