//! Code schemes: immutable, validated catalogs of codes for one question.
//!
//! A scheme is validated once, when it is constructed, and never changes
//! afterwards. Schemes are shared between coding configurations behind an
//! `Arc`.
//!
//! ## Lookups
//!
//! - by `code_id`, the stable identifier stored in labels
//! - by match value, a business key such as `"gender"` or `"10 to 14"`
//! - by control code (`NC`, `NR`, ...) or meta code

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::code::{Code, ControlCode};
use crate::error::{ModelError, Result};
use crate::label::{Label, Origin};

#[derive(Debug, Clone, PartialEq)]
pub struct CodeScheme {
    scheme_id: String,
    name: String,
    version: Option<String>,
    codes: Vec<Code>,
    by_id: BTreeMap<String, usize>,
    by_match_value: BTreeMap<String, usize>,
}

impl CodeScheme {
    /// Build a scheme from an ordered list of codes.
    ///
    /// Fails if the scheme is empty, if any code is malformed, or if two codes
    /// share an id or a match value.
    pub fn new(
        scheme_id: impl Into<String>,
        name: impl Into<String>,
        version: Option<String>,
        codes: Vec<Code>,
    ) -> Result<Self> {
        let scheme_id = scheme_id.into();
        if scheme_id.trim().is_empty() {
            return Err(ModelError::invalid_scheme("<unnamed>", "scheme id is empty"));
        }
        if codes.is_empty() {
            return Err(ModelError::invalid_scheme(&scheme_id, "scheme has no codes"));
        }

        let mut by_id = BTreeMap::new();
        let mut by_match_value = BTreeMap::new();
        for (idx, code) in codes.iter().enumerate() {
            code.validate(&scheme_id)?;
            if by_id.insert(code.code_id.clone(), idx).is_some() {
                return Err(ModelError::invalid_scheme(
                    &scheme_id,
                    format!("duplicate code id '{}'", code.code_id),
                ));
            }
            for value in &code.match_values {
                if let Some(previous) = by_match_value.insert(value.clone(), idx) {
                    return Err(ModelError::invalid_scheme(
                        &scheme_id,
                        format!(
                            "match value '{value}' is used by both '{}' and '{}'",
                            codes[previous].code_id, code.code_id
                        ),
                    ));
                }
            }
        }

        Ok(Self {
            scheme_id,
            name: name.into(),
            version,
            codes,
            by_id,
            by_match_value,
        })
    }

    pub fn scheme_id(&self) -> &str {
        &self.scheme_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    /// Codes in document order.
    pub fn codes(&self) -> &[Code] {
        &self.codes
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    pub fn contains(&self, code_id: &str) -> bool {
        self.by_id.contains_key(code_id)
    }

    pub fn get_code(&self, code_id: &str) -> Result<&Code> {
        self.by_id
            .get(code_id)
            .map(|&idx| &self.codes[idx])
            .ok_or_else(|| ModelError::CodeNotFound {
                scheme_id: self.scheme_id.clone(),
                code_id: code_id.to_string(),
            })
    }

    pub fn find_code_with_match_value(&self, value: &str) -> Option<&Code> {
        self.by_match_value.get(value).map(|&idx| &self.codes[idx])
    }

    pub fn get_code_with_match_value(&self, value: &str) -> Result<&Code> {
        self.find_code_with_match_value(value)
            .ok_or_else(|| ModelError::MatchValueNotFound {
                scheme_id: self.scheme_id.clone(),
                match_value: value.to_string(),
            })
    }

    pub fn get_code_with_control_code(&self, control_code: ControlCode) -> Result<&Code> {
        self.codes
            .iter()
            .find(|code| code.control_code == Some(control_code))
            .ok_or_else(|| ModelError::ControlCodeNotFound {
                scheme_id: self.scheme_id.clone(),
                control_code: control_code.to_string(),
            })
    }

    pub fn get_code_with_meta_code(&self, meta_code: &str) -> Result<&Code> {
        self.codes
            .iter()
            .find(|code| code.meta_code.as_deref() == Some(meta_code))
            .ok_or_else(|| ModelError::MetaCodeNotFound {
                scheme_id: self.scheme_id.clone(),
                meta_code: meta_code.to_string(),
            })
    }

    /// Build a label assigning `code` from this scheme.
    pub fn make_label(&self, code: &Code, origin: &Origin, at: DateTime<Utc>) -> Label {
        Label {
            scheme_id: self.scheme_id.clone(),
            code_id: code.code_id.clone(),
            date_time_utc: at,
            origin: origin.clone(),
            checked: false,
        }
    }
}
