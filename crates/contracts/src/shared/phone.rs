//! Phone numbers are stored as two parts: the international calling code
//! (`+593`) and the subscriber number as typed by the user (`0991234567`).

use serde::{Deserialize, Serialize};

/// Calling codes recognised when splitting an international number.
/// Longer codes are tried first, so the table does not need to be ordered.
const CALLING_CODES: &[&str] = &[
    "1", "7", "20", "27", "30", "31", "32", "33", "34", "36", "39", "40", "41", "43", "44",
    "45", "46", "47", "48", "49", "51", "52", "53", "54", "55", "56", "57", "58", "60", "61",
    "62", "63", "64", "65", "66", "81", "82", "84", "86", "90", "91", "92", "93", "94", "95",
    "98", "212", "213", "216", "218", "220", "221", "233", "234", "237", "244", "251", "254",
    "255", "256", "260", "263", "351", "352", "353", "354", "355", "356", "357", "358", "359",
    "370", "371", "372", "373", "374", "375", "376", "380", "381", "382", "385", "386", "387",
    "389", "420", "421", "501", "502", "503", "504", "505", "506", "507", "509", "591", "592",
    "593", "595", "597", "598", "852", "853", "855", "856", "880", "886", "960", "961", "962",
    "963", "964", "965", "966", "967", "968", "971", "972", "973", "974", "975", "976", "977",
    "992", "993", "994", "995", "996", "998",
];

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhoneParts {
    /// `+` followed by the calling code, or empty when unknown
    pub phone_country: String,
    pub phone_number: String,
}

fn digits_only(value: &str) -> String {
    value.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Ensures the calling code carries a leading `+`. Blank input stays blank.
pub fn normalize_country_code(value: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return String::new();
    }
    if trimmed.starts_with('+') {
        trimmed.to_string()
    } else {
        format!("+{}", trimmed)
    }
}

/// Strips the formatting people put into phone numbers (spaces, dashes, dots,
/// parentheses). A leading `+` is preserved.
pub fn clean_phone_number(value: &str) -> String {
    let trimmed = value.trim();
    let digits = digits_only(trimmed);
    if trimmed.starts_with('+') && !digits.is_empty() {
        format!("+{}", digits)
    } else {
        digits
    }
}

/// Joins a calling code and a subscriber number into one international string.
///
/// `join_phone_number("593", "0991234567") == "+5930991234567"`
pub fn join_phone_number(country: &str, number: &str) -> String {
    let number = digits_only(number);
    if number.is_empty() {
        return String::new();
    }
    let country = digits_only(country);
    if country.is_empty() {
        return number;
    }
    format!("+{}{}", country, number)
}

/// Splits an international number into calling code and subscriber number.
///
/// Numbers without a leading `+` are treated as local: the whole value becomes
/// the subscriber number and the country stays empty. An unknown calling code
/// is handled the same way, keeping the digits intact.
pub fn parse_phone_number(value: &str) -> PhoneParts {
    let trimmed = value.trim();
    let digits = digits_only(trimmed);

    if !trimmed.starts_with('+') {
        return PhoneParts {
            phone_country: String::new(),
            phone_number: digits,
        };
    }

    for len in (1..=3).rev() {
        if digits.len() <= len {
            continue;
        }
        let (code, rest) = digits.split_at(len);
        if CALLING_CODES.contains(&code) {
            return PhoneParts {
                phone_country: format!("+{}", code),
                phone_number: rest.to_string(),
            };
        }
    }

    PhoneParts {
        phone_country: String::new(),
        phone_number: digits,
    }
}
