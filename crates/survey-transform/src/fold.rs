//! Fold strategies: reduce repeated observations of one field to one value.
//!
//! Observations are always considered in chronological order (time, then run
//! id), whatever order they are passed in.
//!
//! | Strategy | Observations | Result |
//! |---|---|---|
//! | `assert_equal` | raw text | the shared text, or [`FoldError::Inconsistent`] |
//! | `concatenate` | raw text | texts joined with a space |
//! | `boolean_or` | raw text | `"true"` if any text is `"true"` |
//! | `assert_label_ids_equal` | single labels | the latest label, or [`FoldError::Inconsistent`] |
//! | `list_of_labels` | label sets | the union, validated against the scheme |

use std::collections::BTreeSet;

use survey_model::{
    CodeScheme, CodedValue, CodingMode, Label, LabelFoldStrategy, Observation, RawFoldStrategy,
};

use crate::error::FoldError;

fn chronological<T>(observations: &[Observation<T>]) -> Vec<&Observation<T>> {
    let mut ordered: Vec<&Observation<T>> = observations.iter().collect();
    ordered.sort_by(|left, right| left.chronological_cmp(right));
    ordered
}

fn ensure_not_empty<T>(field: &str, observations: &[Observation<T>]) -> Result<(), FoldError> {
    if observations.is_empty() {
        return Err(FoldError::Empty {
            field: field.to_string(),
        });
    }
    Ok(())
}

/// Fold raw text observations with `strategy`.
pub fn fold_raw(
    strategy: RawFoldStrategy,
    field: &str,
    observations: &[Observation<String>],
) -> Result<String, FoldError> {
    match strategy {
        RawFoldStrategy::AssertEqual => assert_equal(field, observations),
        RawFoldStrategy::Concatenate => concatenate(field, observations),
        RawFoldStrategy::BooleanOr => boolean_or(field, observations),
    }
}

pub fn assert_equal(field: &str, observations: &[Observation<String>]) -> Result<String, FoldError> {
    ensure_not_empty(field, observations)?;
    let ordered = chronological(observations);
    let first = &ordered[0].value;
    if ordered.iter().all(|obs| &obs.value == first) {
        Ok(first.clone())
    } else {
        Err(FoldError::Inconsistent {
            field: field.to_string(),
            values: ordered.iter().map(|obs| obs.value.clone()).collect(),
        })
    }
}

pub fn concatenate(field: &str, observations: &[Observation<String>]) -> Result<String, FoldError> {
    ensure_not_empty(field, observations)?;
    let parts: Vec<&str> = chronological(observations)
        .into_iter()
        .map(|obs| obs.value.as_str())
        .collect();
    Ok(parts.join(" "))
}

pub fn boolean_or(field: &str, observations: &[Observation<String>]) -> Result<String, FoldError> {
    ensure_not_empty(field, observations)?;
    let any_true = observations
        .iter()
        .any(|obs| obs.value.trim().eq_ignore_ascii_case("true"));
    Ok(if any_true { "true" } else { "false" }.to_string())
}

/// Fold coded observations with `strategy`.
pub fn fold_labels(
    strategy: &LabelFoldStrategy,
    field: &str,
    observations: &[Observation<CodedValue>],
) -> Result<CodedValue, FoldError> {
    match strategy {
        LabelFoldStrategy::AssertLabelIdsEqual => {
            assert_label_ids_equal(field, observations).map(CodedValue::Single)
        }
        LabelFoldStrategy::ListOfLabels { scheme } => {
            list_of_labels(scheme, field, observations).map(CodedValue::Multiple)
        }
    }
}

/// Every observation must be one label, and all must share a code id.
/// Returns the most recent label.
pub fn assert_label_ids_equal(
    field: &str,
    observations: &[Observation<CodedValue>],
) -> Result<Label, FoldError> {
    ensure_not_empty(field, observations)?;
    let ordered = chronological(observations);

    let mut labels = Vec::with_capacity(ordered.len());
    for obs in &ordered {
        match obs.value.labels() {
            [label] => labels.push(label),
            other => {
                return Err(FoldError::ModeMismatch {
                    field: field.to_string(),
                    expected: CodingMode::Single,
                    found: other.len(),
                });
            }
        }
    }

    let first_id = &labels[0].code_id;
    if labels.iter().any(|label| &label.code_id != first_id) {
        return Err(FoldError::Inconsistent {
            field: field.to_string(),
            values: labels.iter().map(|label| label.code_id.clone()).collect(),
        });
    }
    Ok(labels[labels.len() - 1].clone())
}

/// Union the label sets of every observation.
///
/// Labels are de-duplicated by code id, keeping the first seen. When any
/// normal or meta code is present, control codes are dropped; when only
/// control codes are present, the one with the highest precedence is kept.
/// Folding a result with itself returns it unchanged.
pub fn list_of_labels(
    scheme: &CodeScheme,
    field: &str,
    observations: &[Observation<CodedValue>],
) -> Result<Vec<Label>, FoldError> {
    ensure_not_empty(field, observations)?;

    let mut seen = BTreeSet::new();
    let mut union: Vec<(&Label, bool)> = Vec::new();
    for obs in chronological(observations) {
        for label in obs.value.labels() {
            let code = scheme
                .get_code(&label.code_id)
                .map_err(|_| FoldError::UnknownCode {
                    field: field.to_string(),
                    code_id: label.code_id.clone(),
                    scheme_id: scheme.scheme_id().to_string(),
                })?;
            if seen.insert(label.code_id.as_str()) {
                union.push((label, code.is_control()));
            }
        }
    }

    if union.iter().any(|(_, is_control)| !is_control) {
        return Ok(union
            .into_iter()
            .filter(|(_, is_control)| !is_control)
            .map(|(label, _)| label.clone())
            .collect());
    }

    // Only control codes: keep the strongest one.
    let strongest = union
        .into_iter()
        .map(|(label, _)| label)
        .max_by_key(|label| {
            scheme
                .get_code(&label.code_id)
                .ok()
                .and_then(|code| code.control_code)
                .map_or(0, |control| control.precedence())
        });
    Ok(strongest.into_iter().cloned().collect())
}
