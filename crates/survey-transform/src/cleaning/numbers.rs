//! Number words in English and Swahili, for answers such as
//! "twenty five" or "ishirini na tano".

fn word_value(word: &str) -> Option<i64> {
    let value = match word {
        "one" | "moja" => 1,
        "two" | "mbili" | "pili" => 2,
        "three" | "tatu" => 3,
        "four" | "nne" => 4,
        "five" | "tano" => 5,
        "six" | "sita" => 6,
        "seven" | "saba" => 7,
        "eight" | "nane" => 8,
        "nine" | "tisa" => 9,
        "ten" | "kumi" => 10,
        "eleven" => 11,
        "twelve" => 12,
        "thirteen" => 13,
        "fourteen" => 14,
        "fifteen" => 15,
        "sixteen" => 16,
        "seventeen" => 17,
        "eighteen" => 18,
        "nineteen" => 19,
        "twenty" | "ishirini" => 20,
        "thirty" | "thelathini" => 30,
        "forty" | "arobaini" => 40,
        "fifty" | "hamsini" => 50,
        "sixty" | "sitini" => 60,
        "seventy" | "sabini" => 70,
        "eighty" | "themanini" => 80,
        "ninety" | "tisini" => 90,
        _ => return None,
    };
    Some(value)
}

fn is_joining_word(word: &str) -> bool {
    matches!(word, "and" | "na")
}

/// Sum of the first run of number words in `tokens`, or `None` if there is
/// none.
///
/// Joining words ("and", "na") may sit inside a run, so "kumi na tano" is 15.
/// Any other word ends the run: "two kids, I am twenty" is 2.
pub(super) fn parse_number_words<I, S>(tokens: I) -> Option<i64>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut total: Option<i64> = None;
    for token in tokens {
        let token = token.as_ref();
        match (word_value(token), total) {
            (Some(value), _) => total = Some(total.unwrap_or(0) + value),
            (None, Some(_)) if is_joining_word(token) => {}
            (None, Some(_)) => break,
            (None, None) => {}
        }
    }
    total
}
