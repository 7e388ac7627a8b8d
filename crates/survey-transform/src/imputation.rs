//! Code imputation: derive or correct one coded field from another.
//!
//! Imputation runs once per subject after folding. It reads the subject's
//! coded fields and returns an updated copy; fields the rule does not touch
//! are returned unchanged. Derived labels reuse the timestamp of the label
//! they were derived from so that imputation stays deterministic.

use std::collections::BTreeMap;

use survey_model::{
    Code, CodeScheme, CodeType, CodedValue, CodingPlan, ControlCode, ImputationRule, Label,
    LocationHierarchy, ModelError, Origin,
};
use tracing::debug;

/// Origin stamped on labels written by imputation.
pub fn imputation_origin(rule: &ImputationRule) -> Origin {
    Origin::new(
        format!("survey_transform.imputation.{}", rule.as_str()),
        format!("{} imputation", rule.as_str().replace('_', " ")),
        "Automatic",
    )
}

/// Apply the plan's imputation rule, if any, to `coded`.
pub fn apply_imputation(
    plan: &CodingPlan,
    coded: &BTreeMap<String, CodedValue>,
) -> Result<BTreeMap<String, CodedValue>, ModelError> {
    let Some(rule) = plan.code_imputation() else {
        return Ok(coded.clone());
    };
    let scheme_for = |field: &str| {
        plan.configuration_for(field)
            .map(|config| config.code_scheme().as_ref())
            .ok_or_else(|| ModelError::InvalidPlan {
                dataset: plan.dataset_name().to_string(),
                message: format!("no coding configuration for '{field}'"),
            })
    };

    let mut updated = coded.clone();
    match rule {
        ImputationRule::AgeCategory {
            age_field,
            age_category_field,
        } => {
            let Some(age) = single_label(coded, age_field) else {
                return Ok(updated);
            };
            let label = impute_age_category(
                scheme_for(age_field)?,
                scheme_for(age_category_field)?,
                age,
                &imputation_origin(rule),
            )?;
            updated.insert(age_category_field.clone(), CodedValue::Single(label));
        }
        ImputationRule::LocationHierarchy {
            fine_field,
            coarse_field,
            hierarchy,
        } => {
            let Some(fine) = single_label(coded, fine_field) else {
                return Ok(updated);
            };
            let imputed = impute_coarse_location(
                scheme_for(fine_field)?,
                scheme_for(coarse_field)?,
                hierarchy,
                fine,
                single_label(coded, coarse_field),
                &imputation_origin(rule),
            )?;
            if let Some(label) = imputed {
                updated.insert(coarse_field.clone(), CodedValue::Single(label));
            }
        }
    }
    Ok(updated)
}

fn single_label<'a>(coded: &'a BTreeMap<String, CodedValue>, field: &str) -> Option<&'a Label> {
    match coded.get(field)?.labels() {
        [label] => Some(label),
        _ => None,
    }
}

/// Parse an age bucket match value such as `"18 to 35"` (inclusive bounds).
pub fn parse_age_bucket(match_value: &str) -> Option<(i64, i64)> {
    let (low, high) = match_value.split_once(" to ")?;
    let low = low.trim().parse().ok()?;
    let high = high.trim().parse().ok()?;
    (low <= high).then_some((low, high))
}

fn numeric_age(code: &Code) -> Option<i64> {
    code.numeric_value.or_else(|| {
        code.match_value()
            .unwrap_or(code.string_value.as_str())
            .trim()
            .parse()
            .ok()
    })
}

/// Collapse an age label into the matching age-category label.
///
/// The bucket boundaries come from the category scheme's match values. An
/// age that is not coded, or that falls in no bucket, yields the category
/// scheme's not coded code; other control and meta codes carry over by name.
pub fn impute_age_category(
    age_scheme: &CodeScheme,
    category_scheme: &CodeScheme,
    age: &Label,
    origin: &Origin,
) -> Result<Label, ModelError> {
    let age_code = age_scheme.get_code(&age.code_id)?;
    let category_code = match age_code.code_type {
        CodeType::Normal => match numeric_age(age_code) {
            Some(years) => category_scheme
                .codes()
                .iter()
                .filter(|code| code.is_normal())
                .find(|code| {
                    code.match_values
                        .iter()
                        .filter_map(|value| parse_age_bucket(value))
                        .any(|(low, high)| (low..=high).contains(&years))
                }),
            None => None,
        },
        CodeType::Control => age_code
            .control_code
            .and_then(|control| category_scheme.get_code_with_control_code(control).ok()),
        CodeType::Meta => age_code
            .meta_code
            .as_deref()
            .and_then(|meta| category_scheme.get_code_with_meta_code(meta).ok()),
    };
    let category_code = match category_code {
        Some(code) => code,
        None => category_scheme.get_code_with_control_code(ControlCode::NotCoded)?,
    };
    Ok(category_scheme.make_label(category_code, origin, age.date_time_utc))
}

/// Derive the coarse location implied by a fine location label.
///
/// Returns `None` when the coarse field should be left as it is: the fine
/// label is not a normal code, or the current coarse label already agrees.
/// Exactly one candidate in the hierarchy sets the coarse field to it. With
/// zero or several candidates a current coarse value among the candidates is
/// kept; anything else becomes not coded.
pub fn impute_coarse_location(
    fine_scheme: &CodeScheme,
    coarse_scheme: &CodeScheme,
    hierarchy: &LocationHierarchy,
    fine: &Label,
    coarse: Option<&Label>,
    origin: &Origin,
) -> Result<Option<Label>, ModelError> {
    let fine_code = fine_scheme.get_code(&fine.code_id)?;
    if !fine_code.is_normal() {
        return Ok(None);
    }
    let fine_value = fine_code.match_value().unwrap_or(fine_code.string_value.as_str());
    let candidates = hierarchy.candidates(fine_value);

    let current = match coarse {
        Some(label) => Some(coarse_scheme.get_code(&label.code_id)?),
        None => None,
    };

    let target = if let [only] = candidates.as_slice() {
        coarse_scheme.get_code_with_match_value(only)?
    } else {
        let current_is_candidate = current.is_some_and(|code| {
            code.is_normal()
                && code
                    .match_values
                    .iter()
                    .any(|value| candidates.contains(&value.as_str()))
        });
        if current_is_candidate {
            return Ok(None);
        }
        debug!(
            fine = %fine_code.code_id,
            candidates = candidates.len(),
            "no unique coarse location; marking not coded"
        );
        coarse_scheme.get_code_with_control_code(ControlCode::NotCoded)?
    };

    if current.is_some_and(|code| code.code_id == target.code_id) {
        return Ok(None);
    }
    debug!(
        fine = %fine_code.code_id,
        from = current.map(|code| code.code_id.as_str()),
        to = %target.code_id,
        "imputed coarse location"
    );
    Ok(Some(coarse_scheme.make_label(target, origin, fine.date_time_utc)))
}
