//! Code scheme documents, as exported by the coding tool.
//!
//! ```json
//! {
//!   "SchemeID": "Scheme-gender",
//!   "Name": "gender",
//!   "Version": "0.0.0.1",
//!   "Codes": [
//!     {"CodeID": "code-male", "CodeType": "Normal", "DisplayText": "male",
//!      "StringValue": "male", "NumericValue": 1, "MatchValues": ["male"]},
//!     {"CodeID": "code-NC", "CodeType": "Control", "ControlCode": "NC",
//!      "DisplayText": "NC", "StringValue": "NC", "NumericValue": -10}
//!   ]
//! }
//! ```
//!
//! Documents are parsed, then validated by [`CodeScheme::new`]; a scheme is
//! only usable once it has passed validation.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use survey_model::{Code, CodeScheme, CodeType, ControlCode, ModelError};
use tracing::info;

use crate::error::StandardsError;
use crate::hash::sha256_hex;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SchemeDocument {
    #[serde(rename = "SchemeID")]
    pub scheme_id: String,
    pub name: String,
    #[serde(default)]
    pub version: Option<String>,
    pub codes: Vec<CodeDocument>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CodeDocument {
    #[serde(rename = "CodeID")]
    pub code_id: String,
    pub code_type: String,
    #[serde(default)]
    pub control_code: Option<String>,
    #[serde(default)]
    pub meta_code: Option<String>,
    pub display_text: String,
    #[serde(default)]
    pub string_value: Option<String>,
    #[serde(default)]
    pub numeric_value: Option<i64>,
    #[serde(default)]
    pub match_values: Vec<String>,
    #[serde(default = "default_visible")]
    pub visible_in_coda: bool,
    #[serde(default)]
    pub shortcut: Option<String>,
}

fn default_visible() -> bool {
    true
}

impl CodeDocument {
    fn into_code(self, scheme_id: &str) -> Result<Code, ModelError> {
        let malformed = |message: String| ModelError::InvalidScheme {
            scheme_id: scheme_id.to_string(),
            message,
        };
        let code_type: CodeType = self
            .code_type
            .parse()
            .map_err(|err| malformed(format!("code '{}': {err}", self.code_id)))?;
        let control_code = self
            .control_code
            .as_deref()
            .map(str::parse::<ControlCode>)
            .transpose()
            .map_err(|err| malformed(format!("code '{}': {err}", self.code_id)))?;

        Ok(Code {
            string_value: self
                .string_value
                .unwrap_or_else(|| self.display_text.clone()),
            code_id: self.code_id,
            code_type,
            control_code,
            meta_code: self.meta_code,
            display_text: self.display_text,
            numeric_value: self.numeric_value,
            match_values: self.match_values,
            visible_in_coda: self.visible_in_coda,
            shortcut: self.shortcut,
        })
    }
}

impl SchemeDocument {
    /// Convert into a validated [`CodeScheme`].
    pub fn into_scheme(self) -> Result<CodeScheme, ModelError> {
        let scheme_id = self.scheme_id;
        let codes = self
            .codes
            .into_iter()
            .map(|code| code.into_code(&scheme_id))
            .collect::<Result<Vec<_>, _>>()?;
        CodeScheme::new(scheme_id, self.name, self.version, codes)
    }
}

/// A scheme together with where it came from.
#[derive(Debug, Clone)]
pub struct LoadedScheme {
    pub scheme: CodeScheme,
    pub path: PathBuf,
    pub sha256: String,
}

/// Parse and validate a scheme from JSON bytes.
pub fn parse_scheme(path: &Path, bytes: &[u8]) -> Result<CodeScheme, StandardsError> {
    let document: SchemeDocument =
        serde_json::from_slice(bytes).map_err(|source| StandardsError::Json {
            path: path.to_path_buf(),
            source,
        })?;
    document
        .into_scheme()
        .map_err(|source| StandardsError::Scheme {
            path: path.to_path_buf(),
            source,
        })
}

/// Load a scheme file, optionally checking its SHA-256.
pub fn load_scheme(path: &Path, expected_sha256: Option<&str>) -> Result<LoadedScheme, StandardsError> {
    let bytes = std::fs::read(path).map_err(|e| StandardsError::io(path, e))?;
    let sha256 = sha256_hex(&bytes);
    if let Some(expected) = expected_sha256
        && !expected.eq_ignore_ascii_case(&sha256)
    {
        return Err(StandardsError::Sha256Mismatch {
            path: path.to_path_buf(),
            expected: expected.to_string(),
            actual: sha256,
        });
    }
    let scheme = parse_scheme(path, &bytes)?;
    info!(
        scheme_id = scheme.scheme_id(),
        name = scheme.name(),
        codes = scheme.len(),
        sha256 = %sha256,
        "loaded code scheme"
    );
    Ok(LoadedScheme {
        scheme,
        path: path.to_path_buf(),
        sha256,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn control_code_type_is_parsed() {
        let json = br#"{
            "SchemeID": "Scheme-x",
            "Name": "x",
            "Codes": [
                {"CodeID": "code-NC", "CodeType": "Control", "ControlCode": "NC", "DisplayText": "NC"}
            ]
        }"#;
        let scheme = parse_scheme(Path::new("x.json"), json).unwrap();
        let code = scheme.get_code("code-NC").unwrap();
        assert_eq!(code.control_code, Some(ControlCode::NotCoded));
        assert_eq!(code.string_value, "NC");
        assert!(code.visible_in_coda);
    }

    #[test]
    fn unknown_control_code_is_malformed() {
        let json = br#"{
            "SchemeID": "Scheme-x",
            "Name": "x",
            "Codes": [
                {"CodeID": "code-XX", "CodeType": "Control", "ControlCode": "XX", "DisplayText": "XX"}
            ]
        }"#;
        let err = parse_scheme(Path::new("x.json"), json).unwrap_err();
        assert!(matches!(err, StandardsError::Scheme { .. }));
    }
}
