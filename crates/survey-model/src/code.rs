//! Codes: the individual classification labels within a scheme.
//!
//! A code is one of three kinds:
//!
//! - **Normal** codes carry the actual answer (e.g. `male`, `25`, `nairobi`).
//! - **Control** codes are the reserved markers shared by every scheme
//!   (`NC` not coded, `NR` not reviewed, `NA` true missing, ...).
//! - **Meta** codes are scheme-specific markers outside the answer space
//!   (e.g. `push_back`, `showtime_question`).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};

/// The kind of a [`Code`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CodeType {
    Normal,
    Control,
    Meta,
}

impl CodeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CodeType::Normal => "Normal",
            CodeType::Control => "Control",
            CodeType::Meta => "Meta",
        }
    }
}

impl fmt::Display for CodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CodeType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim() {
            "Normal" => Ok(CodeType::Normal),
            "Control" => Ok(CodeType::Control),
            "Meta" => Ok(CodeType::Meta),
            other => Err(format!("unknown code type: {other}")),
        }
    }
}

/// Reserved control codes shared by every scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ControlCode {
    /// `NA`: the participant never answered.
    TrueMissing,
    /// `SKIPPED`: the participant explicitly skipped the question.
    Skipped,
    /// `NC`: an answer exists but no valid classification could be determined.
    NotCoded,
    /// `NR`: an answer exists but has not been reviewed yet.
    NotReviewed,
    /// `WS`: the answer belongs to a different question.
    WrongScheme,
    /// `NIC`: the answer contradicts itself.
    NotInternallyConsistent,
    /// `CE`: the coder made a mistake that needs correcting.
    CodingError,
    /// `STOP`: the participant asked to opt out.
    Stop,
}

impl ControlCode {
    pub const ALL: [ControlCode; 8] = [
        ControlCode::TrueMissing,
        ControlCode::Skipped,
        ControlCode::NotCoded,
        ControlCode::NotReviewed,
        ControlCode::WrongScheme,
        ControlCode::NotInternallyConsistent,
        ControlCode::CodingError,
        ControlCode::Stop,
    ];

    /// Returns the code as written in scheme documents.
    pub fn as_str(&self) -> &'static str {
        match self {
            ControlCode::TrueMissing => "NA",
            ControlCode::Skipped => "SKIPPED",
            ControlCode::NotCoded => "NC",
            ControlCode::NotReviewed => "NR",
            ControlCode::WrongScheme => "WS",
            ControlCode::NotInternallyConsistent => "NIC",
            ControlCode::CodingError => "CE",
            ControlCode::Stop => "STOP",
        }
    }

    /// Precedence used when several control codes compete for one field.
    /// Higher wins: an unreviewed answer outranks everything, a true missing
    /// value ranks lowest.
    pub fn precedence(&self) -> u8 {
        match self {
            ControlCode::NotReviewed => 7,
            ControlCode::CodingError => 6,
            ControlCode::NotInternallyConsistent => 5,
            ControlCode::WrongScheme => 4,
            ControlCode::NotCoded => 3,
            ControlCode::Stop => 2,
            ControlCode::Skipped => 1,
            ControlCode::TrueMissing => 0,
        }
    }
}

impl fmt::Display for ControlCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ControlCode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let trimmed = s.trim();
        ControlCode::ALL
            .into_iter()
            .find(|code| code.as_str() == trimmed)
            .ok_or_else(|| format!("unknown control code: {trimmed}"))
    }
}

/// One classification label within a [`CodeScheme`](crate::CodeScheme).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Code {
    /// Stable identifier, unique within the scheme.
    pub code_id: String,

    pub code_type: CodeType,

    /// Set for (and only for) control codes.
    pub control_code: Option<ControlCode>,

    /// Set for (and only for) meta codes.
    pub meta_code: Option<String>,

    /// Label shown to coders.
    pub display_text: String,

    /// Value written to analysis files.
    pub string_value: String,

    /// Numeric value, used by numeric schemes such as age.
    pub numeric_value: Option<i64>,

    /// Business keys that resolve to this code (e.g. `"gender"`, `"10 to 14"`).
    /// Each match value is unique within the scheme.
    pub match_values: Vec<String>,

    pub visible_in_coda: bool,

    pub shortcut: Option<String>,
}

impl Code {
    /// Create a normal code whose string value and display text are `value`.
    pub fn normal(code_id: impl Into<String>, value: impl Into<String>) -> Self {
        let value = value.into();
        Self {
            code_id: code_id.into(),
            code_type: CodeType::Normal,
            control_code: None,
            meta_code: None,
            display_text: value.clone(),
            string_value: value,
            numeric_value: None,
            match_values: Vec::new(),
            visible_in_coda: true,
            shortcut: None,
        }
    }

    /// Create a control code.
    pub fn control(code_id: impl Into<String>, control_code: ControlCode) -> Self {
        Self {
            code_id: code_id.into(),
            code_type: CodeType::Control,
            control_code: Some(control_code),
            meta_code: None,
            display_text: control_code.as_str().to_string(),
            string_value: control_code.as_str().to_string(),
            numeric_value: None,
            match_values: Vec::new(),
            visible_in_coda: true,
            shortcut: None,
        }
    }

    /// Create a meta code.
    pub fn meta(code_id: impl Into<String>, meta_code: impl Into<String>) -> Self {
        let meta_code = meta_code.into();
        Self {
            code_id: code_id.into(),
            code_type: CodeType::Meta,
            display_text: meta_code.clone(),
            string_value: meta_code.clone(),
            control_code: None,
            meta_code: Some(meta_code),
            numeric_value: None,
            match_values: Vec::new(),
            visible_in_coda: true,
            shortcut: None,
        }
    }

    #[must_use]
    pub fn with_match_value(mut self, value: impl Into<String>) -> Self {
        self.match_values.push(value.into());
        self
    }

    #[must_use]
    pub fn with_numeric_value(mut self, value: i64) -> Self {
        self.numeric_value = Some(value);
        self
    }

    /// The primary match value, if the code has any.
    pub fn match_value(&self) -> Option<&str> {
        self.match_values.first().map(String::as_str)
    }

    pub fn is_control(&self) -> bool {
        self.code_type == CodeType::Control
    }

    pub fn is_normal(&self) -> bool {
        self.code_type == CodeType::Normal
    }

    /// Check that the code is well formed. Called by scheme construction.
    pub(crate) fn validate(&self, scheme_id: &str) -> Result<()> {
        if self.code_id.trim().is_empty() {
            return Err(ModelError::invalid_scheme(scheme_id, "code with empty id"));
        }
        let malformed = |message: &str| {
            ModelError::invalid_scheme(scheme_id, format!("code '{}' {message}", self.code_id))
        };
        match self.code_type {
            CodeType::Normal => {
                if self.control_code.is_some() || self.meta_code.is_some() {
                    return Err(malformed("is Normal but carries a control or meta code"));
                }
            }
            CodeType::Control => {
                if self.control_code.is_none() {
                    return Err(malformed("is Control but has no control code"));
                }
                if self.meta_code.is_some() {
                    return Err(malformed("is Control but carries a meta code"));
                }
            }
            CodeType::Meta => {
                match self.meta_code.as_deref() {
                    Some(meta) if !meta.trim().is_empty() => {}
                    _ => return Err(malformed("is Meta but has no meta code")),
                }
                if self.control_code.is_some() {
                    return Err(malformed("is Meta but carries a control code"));
                }
            }
        }
        if self.match_values.iter().any(|value| value.is_empty()) {
            return Err(malformed("has an empty match value"));
        }
        Ok(())
    }
}
