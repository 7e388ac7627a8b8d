//! Batch folding of subject observation files.

use std::path::Path;

use anyhow::{Context, Result};
use survey_model::CodingPlan;
use survey_transform::{FoldedSubject, SubjectObservations, SubjectOutcome, reconcile_subject};
use tracing::{debug, debug_span, info};

use crate::logging::redact_value;

/// Outcome of folding every subject in one file.
#[derive(Debug, Clone, Default)]
pub struct BatchResult {
    pub outcomes: Vec<SubjectOutcome>,
}

impl BatchResult {
    pub fn failed_subjects(&self) -> usize {
        self.outcomes.iter().filter(|outcome| !outcome.is_ok()).count()
    }

    pub fn error_count(&self) -> usize {
        self.outcomes.iter().map(|outcome| outcome.errors.len()).sum()
    }

    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }

    pub fn folded(&self) -> Vec<&FoldedSubject> {
        self.outcomes.iter().map(|outcome| &outcome.folded).collect()
    }
}

/// Read a JSON array of subject observations.
pub fn read_observations(path: &Path) -> Result<Vec<SubjectObservations>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read observations {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parse observations {}", path.display()))
}

/// Reconcile each subject independently against `plans`.
pub fn fold_subjects(plans: &[CodingPlan], subjects: &[SubjectObservations]) -> BatchResult {
    let outcomes: Vec<SubjectOutcome> = subjects
        .iter()
        .map(|subject| {
            let _span =
                debug_span!("subject", subject = redact_value(&subject.subject_id)).entered();
            debug!("folding subject");
            reconcile_subject(plans, subject)
        })
        .collect();
    let result = BatchResult { outcomes };
    info!(
        subjects = result.outcomes.len(),
        failed_subjects = result.failed_subjects(),
        errors = result.error_count(),
        "folded subjects"
    );
    result
}
