//! Named strategy variants selected per coding configuration and plan.
//!
//! Strategies are plain values so that plans can be compared, printed and
//! exhaustively tested. Their behaviour lives in `survey-transform`.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::scheme::CodeScheme;

/// Pre-coding text normalization applied to a raw response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cleaner {
    /// Parse an age; anything outside `10 <= age < 100` is not coded.
    AgeWithRangeFilter,
    /// Recognise English and Swahili gender words.
    Gender,
}

impl Cleaner {
    pub fn as_str(&self) -> &'static str {
        match self {
            Cleaner::AgeWithRangeFilter => "age_with_range_filter",
            Cleaner::Gender => "gender",
        }
    }
}

impl fmt::Display for Cleaner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How repeated raw-text answers to one question are merged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RawFoldStrategy {
    /// Every answer must be identical.
    AssertEqual,
    /// Answers are joined with a space in chronological order.
    Concatenate,
    /// `"true"` if any answer is `"true"`.
    BooleanOr,
}

impl RawFoldStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            RawFoldStrategy::AssertEqual => "assert_equal",
            RawFoldStrategy::Concatenate => "concatenate",
            RawFoldStrategy::BooleanOr => "boolean_or",
        }
    }
}

impl fmt::Display for RawFoldStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How repeated codings of one field are merged.
#[derive(Debug, Clone, PartialEq)]
pub enum LabelFoldStrategy {
    /// Every coding must carry the same code id. Resolves to one label.
    AssertLabelIdsEqual,
    /// Label sets are unioned; every code id must exist in `scheme`.
    ListOfLabels { scheme: Arc<CodeScheme> },
}

impl LabelFoldStrategy {
    pub fn list_of_labels(scheme: &Arc<CodeScheme>) -> Self {
        LabelFoldStrategy::ListOfLabels {
            scheme: Arc::clone(scheme),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LabelFoldStrategy::AssertLabelIdsEqual => "assert_label_ids_equal",
            LabelFoldStrategy::ListOfLabels { .. } => "list_of_labels",
        }
    }
}

impl fmt::Display for LabelFoldStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Mapping from a fine-grained location to the coarser locations containing it,
/// keyed by match value (e.g. constituency -> county).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocationHierarchy {
    parents: BTreeMap<String, BTreeSet<String>>,
}

impl LocationHierarchy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<I, F, C>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (F, C)>,
        F: Into<String>,
        C: Into<String>,
    {
        let mut hierarchy = Self::new();
        for (fine, coarse) in pairs {
            hierarchy.insert(fine, coarse);
        }
        hierarchy
    }

    pub fn insert(&mut self, fine: impl Into<String>, coarse: impl Into<String>) {
        self.parents
            .entry(fine.into())
            .or_default()
            .insert(coarse.into());
    }

    /// Coarse match values containing `fine`; empty when unknown.
    pub fn candidates(&self, fine: &str) -> Vec<&str> {
        self.parents
            .get(fine)
            .map(|set| set.iter().map(String::as_str).collect())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.parents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parents.is_empty()
    }
}

/// Post-coding derivation of one coded field from another.
#[derive(Debug, Clone, PartialEq)]
pub enum ImputationRule {
    /// Bucket a numeric age code into an age-category code.
    AgeCategory {
        age_field: String,
        age_category_field: String,
    },
    /// Derive or correct a coarse location from a fine one.
    LocationHierarchy {
        fine_field: String,
        coarse_field: String,
        hierarchy: Arc<LocationHierarchy>,
    },
}

impl ImputationRule {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImputationRule::AgeCategory { .. } => "age_category",
            ImputationRule::LocationHierarchy { .. } => "location_hierarchy",
        }
    }

    /// The coded fields this rule reads from and writes to.
    pub fn fields(&self) -> [&str; 2] {
        match self {
            ImputationRule::AgeCategory {
                age_field,
                age_category_field,
            } => [age_field.as_str(), age_category_field.as_str()],
            ImputationRule::LocationHierarchy {
                fine_field,
                coarse_field,
                ..
            } => [fine_field.as_str(), coarse_field.as_str()],
        }
    }
}
