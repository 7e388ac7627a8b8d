use super::{CleanedValue, tokens};

const MALE_WORDS: &[&str] = &["m", "male", "man", "boy", "mwanaume", "mume", "kiume"];
const FEMALE_WORDS: &[&str] = &["f", "female", "woman", "girl", "mwanamke", "msichana", "mke", "kike"];

/// Recognise a gender from English or Swahili text.
///
/// Text naming both genders, or neither, is not coded.
pub fn clean_gender(text: &str) -> CleanedValue {
    let mut male = false;
    let mut female = false;
    for token in tokens(text) {
        male |= MALE_WORDS.contains(&token.as_str());
        female |= FEMALE_WORDS.contains(&token.as_str());
    }
    match (male, female) {
        (true, false) => CleanedValue::Value("male".to_string()),
        (false, true) => CleanedValue::Value("female".to_string()),
        _ => CleanedValue::NotCoded,
    }
}
