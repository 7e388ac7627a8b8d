#![deny(unsafe_code)]

//! Pipeline configuration (`pipeline.toml`).
//!
//! ```toml
//! pipeline_name = "kenya-constitution-review"
//! scheme_dir = "code_schemes"
//! location_hierarchy = "kenya_constituency_county.csv"
//!
//! [schemes]
//! gender = "gender.json"
//! age = { path = "age.json", sha256 = "3f2a..." }
//! ```
//!
//! Relative paths resolve against the directory containing the config file.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::StandardsError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SchemeEntry {
    Path(String),
    Pinned { path: String, sha256: String },
}

impl SchemeEntry {
    pub fn path(&self) -> &str {
        match self {
            SchemeEntry::Path(path) | SchemeEntry::Pinned { path, .. } => path,
        }
    }

    pub fn sha256(&self) -> Option<&str> {
        match self {
            SchemeEntry::Path(_) => None,
            SchemeEntry::Pinned { sha256, .. } => Some(sha256),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PipelineConfig {
    pub pipeline_name: String,
    #[serde(default = "default_scheme_dir")]
    pub scheme_dir: PathBuf,
    #[serde(default)]
    pub location_hierarchy: Option<PathBuf>,
    pub schemes: BTreeMap<String, SchemeEntry>,
    /// Directory the config was loaded from; relative paths resolve here.
    #[serde(skip)]
    pub base_dir: PathBuf,
}

fn default_scheme_dir() -> PathBuf {
    PathBuf::from("code_schemes")
}

impl PipelineConfig {
    pub fn load(path: &Path) -> Result<Self, StandardsError> {
        let text = std::fs::read_to_string(path).map_err(|e| StandardsError::io(path, e))?;
        let mut config = Self::from_toml_str(path, &text)?;
        config.base_dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        Ok(config)
    }

    pub fn from_toml_str(path: &Path, text: &str) -> Result<Self, StandardsError> {
        let config: Self = toml::from_str(text).map_err(|source| StandardsError::Toml {
            path: path.to_path_buf(),
            source,
        })?;
        if config.pipeline_name.trim().is_empty() {
            return Err(StandardsError::InvalidConfig {
                message: "pipeline_name is empty".to_string(),
            });
        }
        Ok(config)
    }

    pub fn scheme_path(&self, entry: &SchemeEntry) -> PathBuf {
        self.base_dir.join(&self.scheme_dir).join(entry.path())
    }

    pub fn location_hierarchy_path(&self) -> Option<PathBuf> {
        self.location_hierarchy
            .as_ref()
            .map(|path| self.base_dir.join(&self.scheme_dir).join(path))
    }
}
