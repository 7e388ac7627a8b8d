use thiserror::Error;

/// Broad classification of a [`ModelError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A code was requested that the scheme does not contain.
    Lookup,
    /// A scheme or code failed integrity validation.
    Validation,
    /// A coding configuration or plan is inconsistent.
    Configuration,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("scheme {scheme_id} has no code with id '{code_id}'")]
    CodeNotFound { scheme_id: String, code_id: String },

    #[error("scheme {scheme_id} has no code with match value '{match_value}'")]
    MatchValueNotFound {
        scheme_id: String,
        match_value: String,
    },

    #[error("scheme {scheme_id} has no control code {control_code}")]
    ControlCodeNotFound {
        scheme_id: String,
        control_code: String,
    },

    #[error("scheme {scheme_id} has no meta code '{meta_code}'")]
    MetaCodeNotFound { scheme_id: String, meta_code: String },

    #[error("invalid code scheme {scheme_id}: {message}")]
    InvalidScheme { scheme_id: String, message: String },

    #[error("invalid coding plan '{dataset}': {message}")]
    InvalidPlan { dataset: String, message: String },
}

impl ModelError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ModelError::CodeNotFound { .. }
            | ModelError::MatchValueNotFound { .. }
            | ModelError::ControlCodeNotFound { .. }
            | ModelError::MetaCodeNotFound { .. } => ErrorKind::Lookup,
            ModelError::InvalidScheme { .. } => ErrorKind::Validation,
            ModelError::InvalidPlan { .. } => ErrorKind::Configuration,
        }
    }

    pub(crate) fn invalid_scheme(scheme_id: &str, message: impl Into<String>) -> Self {
        Self::InvalidScheme {
            scheme_id: scheme_id.to_string(),
            message: message.into(),
        }
    }

    pub(crate) fn invalid_plan(dataset: &str, message: impl Into<String>) -> Self {
        Self::InvalidPlan {
            dataset: dataset.to_string(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ModelError>;
