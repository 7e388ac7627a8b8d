//! Labels: individual coding decisions, and the coded values built from them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::coding::CodingMode;

/// Who or what assigned a label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Origin {
    pub origin_id: String,
    pub name: String,
    /// E.g. `"Automatic"`, `"Manual"`, `"External"`.
    pub origin_type: String,
}

impl Origin {
    pub fn new(
        origin_id: impl Into<String>,
        name: impl Into<String>,
        origin_type: impl Into<String>,
    ) -> Self {
        Self {
            origin_id: origin_id.into(),
            name: name.into(),
            origin_type: origin_type.into(),
        }
    }
}

/// A single code assigned to a response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    pub scheme_id: String,
    pub code_id: String,
    pub date_time_utc: DateTime<Utc>,
    pub origin: Origin,
    /// Whether a human has confirmed this label.
    #[serde(default)]
    pub checked: bool,
}

/// The coded value of one field for one subject.
///
/// Serialized untagged: a single label is a JSON object, a label set is a
/// JSON array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CodedValue {
    Single(Label),
    Multiple(Vec<Label>),
}

impl CodedValue {
    pub fn labels(&self) -> &[Label] {
        match self {
            CodedValue::Single(label) => std::slice::from_ref(label),
            CodedValue::Multiple(labels) => labels,
        }
    }

    pub fn mode(&self) -> CodingMode {
        match self {
            CodedValue::Single(_) => CodingMode::Single,
            CodedValue::Multiple(_) => CodingMode::Multiple,
        }
    }

    /// Code ids in label order.
    pub fn code_ids(&self) -> Vec<&str> {
        self.labels()
            .iter()
            .map(|label| label.code_id.as_str())
            .collect()
    }
}
