//! Automatic coding of raw responses with a configuration's cleaner.

use chrono::{DateTime, Utc};
use survey_model::{CodedValue, CodingConfiguration, CodingMode, ControlCode, ModelError, Origin};

use crate::cleaning::{CleanedValue, clean};

/// Code `raw` with the configuration's cleaner.
///
/// The cleaned value is resolved by match value in the configuration's
/// scheme; an uncleanable or unmatched value becomes the scheme's not coded
/// code. Configurations without a cleaner yield the not reviewed code, for a
/// human coder to replace.
///
/// # Errors
///
/// Fails only if the scheme lacks the required control code.
pub fn auto_code(
    configuration: &CodingConfiguration,
    raw: &str,
    origin: &Origin,
    at: DateTime<Utc>,
) -> Result<CodedValue, ModelError> {
    let scheme = configuration.code_scheme();
    let code = match configuration.cleaner() {
        None => scheme.get_code_with_control_code(ControlCode::NotReviewed)?,
        Some(cleaner) => match clean(cleaner, raw) {
            CleanedValue::Value(value) => match scheme.find_code_with_match_value(&value) {
                Some(code) => code,
                None => scheme.get_code_with_control_code(ControlCode::NotCoded)?,
            },
            CleanedValue::NotCoded => scheme.get_code_with_control_code(ControlCode::NotCoded)?,
        },
    };
    let label = scheme.make_label(code, origin, at);
    Ok(match configuration.coding_mode() {
        CodingMode::Single => CodedValue::Single(label),
        CodingMode::Multiple => CodedValue::Multiple(vec![label]),
    })
}
