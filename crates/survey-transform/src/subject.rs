//! Per-subject reconciliation: fold every field of every plan, then impute.
//!
//! Each subject is independent of every other, so callers may process
//! subjects in any order or in parallel. Failures are collected per field
//! rather than aborting the subject.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use survey_model::{CodedValue, CodingPlan, Observation};
use tracing::{debug, warn};

use crate::error::SubjectError;
use crate::fold::{fold_labels, fold_raw};
use crate::imputation::apply_imputation;

/// Every observation recorded for one subject, keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectObservations {
    pub subject_id: String,
    #[serde(default)]
    pub raw: BTreeMap<String, Vec<Observation<String>>>,
    #[serde(default)]
    pub coded: BTreeMap<String, Vec<Observation<CodedValue>>>,
}

/// One reconciled value per field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FoldedSubject {
    pub subject_id: String,
    pub raw: BTreeMap<String, String>,
    pub coded: BTreeMap<String, CodedValue>,
}

#[derive(Debug, Clone)]
pub struct SubjectOutcome {
    pub folded: FoldedSubject,
    pub errors: Vec<SubjectError>,
}

impl SubjectOutcome {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Fold and impute every field `plans` declare for one subject.
///
/// Fields without observations are skipped. A field that fails to fold is
/// left out of the result and reported in `errors`. Subject ids are never
/// logged here; callers that want one in their spans must redact it.
pub fn reconcile_subject(plans: &[CodingPlan], observations: &SubjectObservations) -> SubjectOutcome {
    let subject_id = observations.subject_id.as_str();
    let _span = tracing::debug_span!("reconcile_subject").entered();

    let mut folded = FoldedSubject {
        subject_id: subject_id.to_string(),
        ..FoldedSubject::default()
    };
    let mut errors = Vec::new();

    for plan in plans {
        if let Some(raw) = observations.raw.get(plan.raw_field()) {
            match fold_raw(plan.raw_field_fold_strategy(), plan.raw_field(), raw) {
                Ok(value) => {
                    folded.raw.insert(plan.raw_field().to_string(), value);
                }
                Err(error) => {
                    warn!(field = plan.raw_field(), %error, "raw field fold failed");
                    errors.push(SubjectError::new(subject_id, plan.raw_field(), error));
                }
            }
        }

        let mut plan_coded = BTreeMap::new();
        for config in plan.coding_configurations() {
            let field = config.coded_field();
            let Some(coded) = observations.coded.get(field) else {
                continue;
            };
            match fold_labels(config.fold_strategy(), field, coded) {
                Ok(value) => {
                    plan_coded.insert(field.to_string(), value);
                }
                Err(error) => {
                    warn!(field, %error, "coded field fold failed");
                    errors.push(SubjectError::new(subject_id, field, error));
                }
            }
        }

        let plan_coded = match apply_imputation(plan, &plan_coded) {
            Ok(imputed) => {
                if imputed != plan_coded {
                    debug!(dataset = plan.dataset_name(), "imputation updated coded fields");
                }
                imputed
            }
            Err(error) => {
                warn!(dataset = plan.dataset_name(), %error, "imputation failed");
                let field = plan
                    .code_imputation()
                    .map_or(plan.dataset_name(), |rule| rule.fields()[1]);
                errors.push(SubjectError::new(subject_id, field, error));
                plan_coded
            }
        };
        folded.coded.extend(plan_coded);
    }

    SubjectOutcome { folded, errors }
}
