#![deny(unsafe_code)]

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use serde::Serialize;
use survey_model::CodeScheme;

use crate::config::PipelineConfig;
use crate::error::StandardsError;
use crate::scheme_loader::load_scheme;

/// Provenance of one loaded scheme, for verification reports.
#[derive(Debug, Clone, Serialize)]
pub struct SchemeSummary {
    pub key: String,
    pub scheme_id: String,
    pub name: String,
    pub version: Option<String>,
    pub code_count: usize,
    pub path: PathBuf,
    pub sha256: String,
}

/// Every scheme named by a pipeline config, keyed by config key.
#[derive(Debug, Clone, Default)]
pub struct SchemeRegistry {
    schemes: BTreeMap<String, Arc<CodeScheme>>,
    summaries: Vec<SchemeSummary>,
}

impl SchemeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load and validate every scheme listed in `config`. Fails on the first
    /// unreadable, malformed or tampered document.
    pub fn load(config: &PipelineConfig) -> Result<Self, StandardsError> {
        let mut registry = Self::new();
        for (key, entry) in &config.schemes {
            let path = config.scheme_path(entry);
            let loaded = load_scheme(&path, entry.sha256())?;
            registry.summaries.push(SchemeSummary {
                key: key.clone(),
                scheme_id: loaded.scheme.scheme_id().to_string(),
                name: loaded.scheme.name().to_string(),
                version: loaded.scheme.version().map(String::from),
                code_count: loaded.scheme.len(),
                path: loaded.path,
                sha256: loaded.sha256,
            });
            registry.schemes.insert(key.clone(), Arc::new(loaded.scheme));
        }
        Ok(registry)
    }

    /// Register an already-built scheme under `key`.
    pub fn insert(&mut self, key: impl Into<String>, scheme: CodeScheme) -> Arc<CodeScheme> {
        let scheme = Arc::new(scheme);
        self.schemes.insert(key.into(), Arc::clone(&scheme));
        scheme
    }

    pub fn get(&self, key: &str) -> Option<&Arc<CodeScheme>> {
        self.schemes.get(key)
    }

    pub fn require(&self, key: &str) -> Result<&Arc<CodeScheme>, StandardsError> {
        self.get(key).ok_or_else(|| StandardsError::MissingScheme {
            key: key.to_string(),
        })
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.schemes.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.schemes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemes.is_empty()
    }

    pub fn summaries(&self) -> &[SchemeSummary] {
        &self.summaries
    }
}
