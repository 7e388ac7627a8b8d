use survey_model::{CodingMode, ModelError};
use thiserror::Error;

/// Failure to reconcile repeated observations of one field.
///
/// Messages never include observed values; `values` keeps them for callers
/// that are allowed to see participant data.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FoldError {
    #[error("field '{field}' has no observations to fold")]
    Empty { field: String },

    #[error("field '{field}' has {} inconsistent observations", .values.len())]
    Inconsistent { field: String, values: Vec<String> },

    #[error("field '{field}' contains code id '{code_id}' which is not in scheme {scheme_id}")]
    UnknownCode {
        field: String,
        code_id: String,
        scheme_id: String,
    },

    #[error("field '{field}' expected a {expected}-coded value but an observation has {found} labels")]
    ModeMismatch {
        field: String,
        expected: CodingMode,
        found: usize,
    },
}

impl FoldError {
    /// True when the observations disagree (as opposed to being malformed).
    pub fn is_inconsistency(&self) -> bool {
        matches!(self, FoldError::Inconsistent { .. })
    }

    pub fn field(&self) -> &str {
        match self {
            FoldError::Empty { field }
            | FoldError::Inconsistent { field, .. }
            | FoldError::UnknownCode { field, .. }
            | FoldError::ModeMismatch { field, .. } => field,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransformError {
    #[error(transparent)]
    Fold(#[from] FoldError),
    #[error(transparent)]
    Model(#[from] ModelError),
}

/// A failure attributed to exactly one subject and one field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("subject {subject_id}, field '{field}': {source}")]
pub struct SubjectError {
    pub subject_id: String,
    pub field: String,
    #[source]
    pub source: TransformError,
}

impl SubjectError {
    pub fn new(
        subject_id: impl Into<String>,
        field: impl Into<String>,
        source: impl Into<TransformError>,
    ) -> Self {
        Self {
            subject_id: subject_id.into(),
            field: field.into(),
            source: source.into(),
        }
    }
}
