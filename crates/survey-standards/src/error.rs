#![deny(unsafe_code)]

use std::path::PathBuf;

use survey_model::ModelError;

#[derive(Debug, thiserror::Error)]
pub enum StandardsError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse TOML config {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to parse scheme document {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to parse CSV {path}: {message}")]
    Csv { path: PathBuf, message: String },

    #[error("invalid scheme document {path}: {source}")]
    Scheme {
        path: PathBuf,
        #[source]
        source: ModelError,
    },

    #[error("sha256 mismatch for {path} (expected {expected}, got {actual})")]
    Sha256Mismatch {
        path: PathBuf,
        expected: String,
        actual: String,
    },

    #[error("scheme '{key}' is required but not listed in the pipeline config")]
    MissingScheme { key: String },

    #[error("pipeline config requires a location hierarchy file")]
    MissingHierarchy,

    #[error("invalid coding plans: {0}")]
    Plan(#[from] ModelError),

    #[error("invalid pipeline config: {message}")]
    InvalidConfig { message: String },
}

impl StandardsError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
