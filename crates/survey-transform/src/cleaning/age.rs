use super::numbers::parse_number_words;
use super::{CleanedValue, tokens};

/// Youngest age accepted, inclusive.
pub const MIN_AGE: i64 = 10;
/// Oldest age accepted, exclusive.
pub const MAX_AGE: i64 = 100;

/// Extract an age from free text.
///
/// The first run of digits wins ("I am 25 years" is 25); a lone leading minus
/// makes it negative. Without digits, the first run of number words is summed.
pub fn clean_age(text: &str) -> Option<i64> {
    if let Some(start) = text.find(|ch: char| ch.is_ascii_digit()) {
        let rest = &text[start..];
        let end = rest
            .find(|ch: char| !ch.is_ascii_digit())
            .unwrap_or(rest.len());
        let age = rest[..end].parse::<i64>().ok()?;
        let negative = text[..start].trim_start() == "-";
        return Some(if negative { -age } else { age });
    }
    parse_number_words(tokens(text))
}

/// Clean an age, returning not coded if it cannot be parsed or is outside
/// `10 <= age < 100`.
///
/// Parse failures and out-of-range ages are deliberately indistinguishable.
pub fn clean_age_with_range_filter(text: &str) -> CleanedValue {
    match clean_age(text) {
        Some(age) if (MIN_AGE..MAX_AGE).contains(&age) => CleanedValue::Value(age.to_string()),
        _ => CleanedValue::NotCoded,
    }
}
