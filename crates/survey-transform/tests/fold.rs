//! Tests for the fold strategies.

use chrono::{DateTime, Duration, Utc};
use proptest::prelude::*;
use survey_model::{
    Code, CodeScheme, CodedValue, ControlCode, Label, LabelFoldStrategy, Observation, Origin,
    RawFoldStrategy,
};
use survey_transform::FoldError;
use survey_transform::fold::{
    assert_equal, assert_label_ids_equal, concatenate, fold_labels, fold_raw, list_of_labels,
};

fn at(minutes: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(1_600_000_000, 0).unwrap() + Duration::minutes(minutes)
}

fn text(minutes: i64, value: &str) -> Observation<String> {
    Observation::new(at(minutes), value.to_string())
}

fn views_scheme() -> CodeScheme {
    CodeScheme::new(
        "Scheme-views",
        "appointment_views",
        None,
        vec![
            Code::normal("code-support", "support").with_match_value("support"),
            Code::normal("code-oppose", "oppose").with_match_value("oppose"),
            Code::normal("code-unsure", "unsure").with_match_value("unsure"),
            Code::meta("code-question", "question"),
            Code::control("code-NA", ControlCode::TrueMissing),
            Code::control("code-NC", ControlCode::NotCoded),
            Code::control("code-NR", ControlCode::NotReviewed),
        ],
    )
    .unwrap()
}

fn label(code_id: &str, minutes: i64) -> Label {
    Label {
        scheme_id: "Scheme-views".to_string(),
        code_id: code_id.to_string(),
        date_time_utc: at(minutes),
        origin: Origin::new("coder-1", "Coder One", "Manual"),
        checked: true,
    }
}

fn labels(minutes: i64, code_ids: &[&str]) -> Observation<CodedValue> {
    Observation::new(
        at(minutes),
        CodedValue::Multiple(code_ids.iter().map(|id| label(id, minutes)).collect()),
    )
}

fn single(minutes: i64, code_id: &str) -> Observation<CodedValue> {
    Observation::new(at(minutes), CodedValue::Single(label(code_id, minutes)))
}

fn ids(labels: &[Label]) -> Vec<&str> {
    labels.iter().map(|label| label.code_id.as_str()).collect()
}

#[test]
fn assert_equal_accepts_identical_answers() {
    let folded = assert_equal("gender_raw", &[text(0, "X"), text(5, "X")]).unwrap();
    assert_eq!(folded, "X");
}

#[test]
fn assert_equal_rejects_divergent_answers() {
    let err = assert_equal("gender_raw", &[text(0, "X"), text(5, "Y")]).unwrap_err();
    assert!(err.is_inconsistency());
    assert_eq!(
        err,
        FoldError::Inconsistent {
            field: "gender_raw".to_string(),
            values: vec!["X".to_string(), "Y".to_string()],
        }
    );
    assert!(!err.to_string().contains('Y'));
}

#[test]
fn concatenate_orders_by_time() {
    let folded = concatenate("views_raw", &[text(10, "b"), text(0, "a")]).unwrap();
    assert_eq!(folded, "a b");
}

#[test]
fn concatenate_breaks_time_ties_by_run_id() {
    let observations = vec![
        text(0, "second").with_run_id("run-2"),
        text(0, "first").with_run_id("run-1"),
    ];
    assert_eq!(concatenate("views_raw", &observations).unwrap(), "first second");
}

#[test]
fn boolean_or_is_true_if_any_is_true() {
    let observations = [text(0, "false"), text(1, "TRUE")];
    assert_eq!(
        fold_raw(RawFoldStrategy::BooleanOr, "consent_withdrawn", &observations).unwrap(),
        "true"
    );
    assert_eq!(
        fold_raw(RawFoldStrategy::BooleanOr, "consent_withdrawn", &[text(0, "false")]).unwrap(),
        "false"
    );
}

#[test]
fn empty_input_is_an_error() {
    let err = fold_raw(RawFoldStrategy::Concatenate, "views_raw", &[]).unwrap_err();
    assert_eq!(
        err,
        FoldError::Empty {
            field: "views_raw".to_string()
        }
    );
}

#[test]
fn assert_label_ids_equal_returns_latest_label() {
    let folded = assert_label_ids_equal(
        "gender_coded",
        &[single(10, "code-support"), single(0, "code-support")],
    )
    .unwrap();
    assert_eq!(folded.date_time_utc, at(10));
}

#[test]
fn assert_label_ids_equal_rejects_divergent_codes() {
    let err = assert_label_ids_equal(
        "gender_coded",
        &[single(0, "code-support"), single(5, "code-oppose")],
    )
    .unwrap_err();
    assert!(err.is_inconsistency());
    assert_eq!(err.field(), "gender_coded");
}

#[test]
fn assert_label_ids_equal_rejects_label_sets() {
    let err = assert_label_ids_equal(
        "gender_coded",
        &[labels(0, &["code-support", "code-oppose"])],
    )
    .unwrap_err();
    assert!(matches!(err, FoldError::ModeMismatch { found: 2, .. }));
}

#[test]
fn list_of_labels_unions() {
    let scheme = views_scheme();
    let folded = list_of_labels(
        &scheme,
        "views_coded",
        &[labels(0, &["code-support"]), labels(5, &["code-oppose"])],
    )
    .unwrap();
    assert_eq!(ids(&folded), vec!["code-support", "code-oppose"]);
}

#[test]
fn list_of_labels_drops_control_codes_next_to_answers() {
    let scheme = views_scheme();
    let folded = list_of_labels(
        &scheme,
        "views_coded",
        &[
            labels(0, &["code-NC"]),
            labels(5, &["code-question", "code-support"]),
        ],
    )
    .unwrap();
    assert_eq!(ids(&folded), vec!["code-question", "code-support"]);
}

#[test]
fn list_of_labels_keeps_strongest_control_code() {
    let scheme = views_scheme();
    let folded = list_of_labels(
        &scheme,
        "views_coded",
        &[labels(0, &["code-NA"]), labels(5, &["code-NR", "code-NC"])],
    )
    .unwrap();
    assert_eq!(ids(&folded), vec!["code-NR"]);
}

#[test]
fn list_of_labels_rejects_unknown_code() {
    let scheme = views_scheme();
    let err = list_of_labels(&scheme, "views_coded", &[labels(0, &["code-invented"])]).unwrap_err();
    assert_eq!(
        err,
        FoldError::UnknownCode {
            field: "views_coded".to_string(),
            code_id: "code-invented".to_string(),
            scheme_id: "Scheme-views".to_string(),
        }
    );
}

#[test]
fn fold_labels_dispatches_on_strategy() {
    let scheme = std::sync::Arc::new(views_scheme());
    let strategy = LabelFoldStrategy::list_of_labels(&scheme);
    let folded = fold_labels(&strategy, "views_coded", &[single(0, "code-unsure")]).unwrap();
    assert_eq!(folded.code_ids(), vec!["code-unsure"]);

    let folded = fold_labels(
        &LabelFoldStrategy::AssertLabelIdsEqual,
        "views_coded",
        &[single(0, "code-unsure")],
    )
    .unwrap();
    assert!(matches!(folded, CodedValue::Single(_)));
}

const CODE_IDS: [&str; 7] = [
    "code-support",
    "code-oppose",
    "code-unsure",
    "code-question",
    "code-NA",
    "code-NC",
    "code-NR",
];

/// Distinct minutes in arbitrary order.
fn shuffled_minutes() -> impl Strategy<Value = Vec<i64>> {
    prop::sample::subsequence((0..240).collect::<Vec<i64>>(), 1..8).prop_shuffle()
}

fn code_id_sets() -> impl Strategy<Value = Vec<Vec<&'static str>>> {
    prop::collection::vec(
        prop::collection::vec(prop::sample::select(CODE_IDS.to_vec()), 0..4),
        1..5,
    )
}

proptest! {
    #[test]
    fn list_of_labels_is_idempotent(sets in code_id_sets()) {
        let scheme = views_scheme();
        let observations: Vec<_> = sets
            .iter()
            .enumerate()
            .map(|(idx, set)| labels(idx as i64, set))
            .collect();
        let folded = list_of_labels(&scheme, "views_coded", &observations).unwrap();
        let again = list_of_labels(
            &scheme,
            "views_coded",
            &[
                Observation::new(at(0), CodedValue::Multiple(folded.clone())),
                Observation::new(at(1), CodedValue::Multiple(folded.clone())),
            ],
        )
        .unwrap();
        prop_assert_eq!(again, folded);
    }

    #[test]
    fn assert_equal_ignores_input_order(value in "[a-z ]{0,12}", count in 1usize..6) {
        let mut observations: Vec<_> = (0..count as i64).map(|idx| text(idx, &value)).collect();
        observations.reverse();
        prop_assert_eq!(assert_equal("raw", &observations).unwrap(), value);
    }

    #[test]
    fn assert_label_ids_equal_keeps_latest_in_any_order(
        code_id in prop::sample::select(CODE_IDS.to_vec()),
        minutes in shuffled_minutes(),
    ) {
        let observations: Vec<_> = minutes.iter().map(|&m| single(m, code_id)).collect();
        let latest = *minutes.iter().max().unwrap();
        let folded = assert_label_ids_equal("views_coded", &observations).unwrap();
        prop_assert_eq!(folded.date_time_utc, at(latest));
        prop_assert_eq!(folded, label(code_id, latest));
    }

    #[test]
    fn concatenate_is_chronological(values in prop::collection::vec("[a-z]{1,5}", 1..6)) {
        let mut observations: Vec<_> = values
            .iter()
            .enumerate()
            .map(|(idx, value)| text(idx as i64, value))
            .collect();
        observations.reverse();
        prop_assert_eq!(concatenate("raw", &observations).unwrap(), values.join(" "));
    }
}
