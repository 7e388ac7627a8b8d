//! Coding configurations and coding plans.
//!
//! A [`CodingPlan`] binds one raw response field to the configurations used
//! to code it. Plans are built once through [`CodingPlanBuilder`], which
//! checks every construction-time invariant, and are read-only afterwards.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::code::Code;
use crate::error::{ModelError, Result};
use crate::scheme::CodeScheme;
use crate::strategy::{Cleaner, ImputationRule, LabelFoldStrategy, RawFoldStrategy};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CodingMode {
    /// Exactly one code per subject.
    Single,
    /// A set of codes per subject.
    Multiple,
}

impl CodingMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            CodingMode::Single => "single",
            CodingMode::Multiple => "multiple",
        }
    }
}

impl fmt::Display for CodingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Binding of one code scheme to one coded output field.
#[derive(Debug, Clone, PartialEq)]
pub struct CodingConfiguration {
    coding_mode: CodingMode,
    code_scheme: Arc<CodeScheme>,
    coded_field: String,
    cleaner: Option<Cleaner>,
    analysis_file_key: String,
    include_in_theme_distribution: bool,
    fold_strategy: LabelFoldStrategy,
}

impl CodingConfiguration {
    pub fn new(
        coding_mode: CodingMode,
        code_scheme: &Arc<CodeScheme>,
        coded_field: impl Into<String>,
        analysis_file_key: impl Into<String>,
        fold_strategy: LabelFoldStrategy,
    ) -> Self {
        Self {
            coding_mode,
            code_scheme: Arc::clone(code_scheme),
            coded_field: coded_field.into(),
            cleaner: None,
            analysis_file_key: analysis_file_key.into(),
            include_in_theme_distribution: true,
            fold_strategy,
        }
    }

    /// Single-label configuration folded with `assert_label_ids_equal`.
    pub fn single(
        code_scheme: &Arc<CodeScheme>,
        coded_field: impl Into<String>,
        analysis_file_key: impl Into<String>,
    ) -> Self {
        Self::new(
            CodingMode::Single,
            code_scheme,
            coded_field,
            analysis_file_key,
            LabelFoldStrategy::AssertLabelIdsEqual,
        )
    }

    /// Multi-label configuration folded with `list_of_labels` over its own scheme.
    pub fn multiple(
        code_scheme: &Arc<CodeScheme>,
        coded_field: impl Into<String>,
        analysis_file_key: impl Into<String>,
    ) -> Self {
        Self::new(
            CodingMode::Multiple,
            code_scheme,
            coded_field,
            analysis_file_key,
            LabelFoldStrategy::list_of_labels(code_scheme),
        )
    }

    #[must_use]
    pub fn with_cleaner(mut self, cleaner: Cleaner) -> Self {
        self.cleaner = Some(cleaner);
        self
    }

    #[must_use]
    pub fn with_theme_distribution(mut self, include: bool) -> Self {
        self.include_in_theme_distribution = include;
        self
    }

    pub fn coding_mode(&self) -> CodingMode {
        self.coding_mode
    }

    pub fn code_scheme(&self) -> &Arc<CodeScheme> {
        &self.code_scheme
    }

    pub fn coded_field(&self) -> &str {
        &self.coded_field
    }

    pub fn cleaner(&self) -> Option<Cleaner> {
        self.cleaner
    }

    pub fn analysis_file_key(&self) -> &str {
        &self.analysis_file_key
    }

    pub fn include_in_theme_distribution(&self) -> bool {
        self.include_in_theme_distribution
    }

    pub fn fold_strategy(&self) -> &LabelFoldStrategy {
        &self.fold_strategy
    }

    /// Single mode must fold to one code; multiple mode must union labels
    /// drawn from this configuration's own scheme.
    fn validate(&self, dataset: &str) -> Result<()> {
        if self.coded_field.trim().is_empty() {
            return Err(ModelError::invalid_plan(dataset, "coded field name is empty"));
        }
        match (self.coding_mode, &self.fold_strategy) {
            (CodingMode::Single, LabelFoldStrategy::AssertLabelIdsEqual) => Ok(()),
            (CodingMode::Multiple, LabelFoldStrategy::ListOfLabels { scheme }) => {
                if scheme.scheme_id() == self.code_scheme.scheme_id() {
                    Ok(())
                } else {
                    Err(ModelError::invalid_plan(
                        dataset,
                        format!(
                            "field '{}' folds labels with scheme {} but codes with {}",
                            self.coded_field,
                            scheme.scheme_id(),
                            self.code_scheme.scheme_id()
                        ),
                    ))
                }
            }
            (mode, strategy) => Err(ModelError::invalid_plan(
                dataset,
                format!(
                    "field '{}' is {mode}-coded but folds with {strategy}",
                    self.coded_field
                ),
            )),
        }
    }
}

/// Binding of one raw input field to its coding configurations.
#[derive(Debug, Clone, PartialEq)]
pub struct CodingPlan {
    raw_field: String,
    dataset_name: String,
    time_field: String,
    run_id_field: Option<String>,
    coda_filename: Option<String>,
    icr_filename: Option<String>,
    coding_configurations: Vec<CodingConfiguration>,
    raw_field_fold_strategy: RawFoldStrategy,
    code_imputation: Option<ImputationRule>,
    ws_code: Option<Code>,
}

impl CodingPlan {
    pub fn builder(
        dataset_name: impl Into<String>,
        raw_field: impl Into<String>,
        time_field: impl Into<String>,
        raw_field_fold_strategy: RawFoldStrategy,
    ) -> CodingPlanBuilder {
        CodingPlanBuilder {
            raw_field: raw_field.into(),
            dataset_name: dataset_name.into(),
            time_field: time_field.into(),
            run_id_field: None,
            coda_filename: None,
            icr_filename: None,
            coding_configurations: Vec::new(),
            raw_field_fold_strategy,
            code_imputation: None,
            ws_scheme: None,
        }
    }

    pub fn raw_field(&self) -> &str {
        &self.raw_field
    }

    pub fn dataset_name(&self) -> &str {
        &self.dataset_name
    }

    pub fn time_field(&self) -> &str {
        &self.time_field
    }

    pub fn run_id_field(&self) -> Option<&str> {
        self.run_id_field.as_deref()
    }

    pub fn coda_filename(&self) -> Option<&str> {
        self.coda_filename.as_deref()
    }

    pub fn icr_filename(&self) -> Option<&str> {
        self.icr_filename.as_deref()
    }

    pub fn coding_configurations(&self) -> &[CodingConfiguration] {
        &self.coding_configurations
    }

    pub fn raw_field_fold_strategy(&self) -> RawFoldStrategy {
        self.raw_field_fold_strategy
    }

    pub fn code_imputation(&self) -> Option<&ImputationRule> {
        self.code_imputation.as_ref()
    }

    /// The weak-sourcing correction code for this plan's dataset.
    pub fn ws_code(&self) -> Option<&Code> {
        self.ws_code.as_ref()
    }

    pub fn configuration_for(&self, coded_field: &str) -> Option<&CodingConfiguration> {
        self.coding_configurations
            .iter()
            .find(|config| config.coded_field == coded_field)
    }

    pub fn coded_fields(&self) -> impl Iterator<Item = &str> {
        self.coding_configurations
            .iter()
            .map(CodingConfiguration::coded_field)
    }
}

pub struct CodingPlanBuilder {
    raw_field: String,
    dataset_name: String,
    time_field: String,
    run_id_field: Option<String>,
    coda_filename: Option<String>,
    icr_filename: Option<String>,
    coding_configurations: Vec<CodingConfiguration>,
    raw_field_fold_strategy: RawFoldStrategy,
    code_imputation: Option<ImputationRule>,
    ws_scheme: Option<Arc<CodeScheme>>,
}

impl CodingPlanBuilder {
    #[must_use]
    pub fn run_id_field(mut self, field: impl Into<String>) -> Self {
        self.run_id_field = Some(field.into());
        self
    }

    #[must_use]
    pub fn coda_filename(mut self, filename: impl Into<String>) -> Self {
        self.coda_filename = Some(filename.into());
        self
    }

    #[must_use]
    pub fn icr_filename(mut self, filename: impl Into<String>) -> Self {
        self.icr_filename = Some(filename.into());
        self
    }

    #[must_use]
    pub fn configuration(mut self, configuration: CodingConfiguration) -> Self {
        self.coding_configurations.push(configuration);
        self
    }

    #[must_use]
    pub fn code_imputation(mut self, rule: ImputationRule) -> Self {
        self.code_imputation = Some(rule);
        self
    }

    /// Resolve the plan's `ws_code` from `scheme` by the dataset name at build time.
    #[must_use]
    pub fn ws_scheme(mut self, scheme: &Arc<CodeScheme>) -> Self {
        self.ws_scheme = Some(Arc::clone(scheme));
        self
    }

    pub fn build(self) -> Result<CodingPlan> {
        let dataset = self.dataset_name.as_str();
        if dataset.trim().is_empty() {
            return Err(ModelError::invalid_plan("<unnamed>", "dataset name is empty"));
        }
        if self.raw_field.trim().is_empty() {
            return Err(ModelError::invalid_plan(dataset, "raw field name is empty"));
        }
        if self.coding_configurations.is_empty() {
            return Err(ModelError::invalid_plan(
                dataset,
                "plan has no coding configurations",
            ));
        }

        let mut seen = BTreeSet::new();
        for config in &self.coding_configurations {
            config.validate(dataset)?;
            if !seen.insert(config.coded_field.as_str()) {
                return Err(ModelError::invalid_plan(
                    dataset,
                    format!("coded field '{}' is declared twice", config.coded_field),
                ));
            }
        }

        if let Some(rule) = &self.code_imputation {
            for field in rule.fields() {
                let config = self
                    .coding_configurations
                    .iter()
                    .find(|config| config.coded_field == field)
                    .ok_or_else(|| {
                        ModelError::invalid_plan(
                            dataset,
                            format!("{} imputation refers to unknown field '{field}'", rule.as_str()),
                        )
                    })?;
                if config.coding_mode != CodingMode::Single {
                    return Err(ModelError::invalid_plan(
                        dataset,
                        format!("{} imputation requires '{field}' to be single-coded", rule.as_str()),
                    ));
                }
            }
        }

        let ws_code = match &self.ws_scheme {
            Some(scheme) => Some(scheme.get_code_with_match_value(dataset)?.clone()),
            None => None,
        };

        Ok(CodingPlan {
            raw_field: self.raw_field,
            dataset_name: self.dataset_name,
            time_field: self.time_field,
            run_id_field: self.run_id_field,
            coda_filename: self.coda_filename,
            icr_filename: self.icr_filename,
            coding_configurations: self.coding_configurations,
            raw_field_fold_strategy: self.raw_field_fold_strategy,
            code_imputation: self.code_imputation,
            ws_code,
        })
    }
}
