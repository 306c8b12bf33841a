// Utility helpers for text comparison and basic statistics.
//
// Free-text equality (reviewer locations, branch names, menu answers) always
// goes through `normalize` so the rule lives in exactly one place.
use num_format::{Locale, ToFormattedString};

/// Comparison form of a free-text field.
///
/// - Lower-cases the whole string.
/// - Strips every whitespace character, not only the ends.
/// - Removes underscores, so `United_States` and `united states` agree.
///
/// Only used for equality checks; never shown to the user.
pub fn normalize(s: &str) -> String {
    s.chars()
        .filter(|c| !c.is_whitespace() && *c != '_')
        .flat_map(char::to_lowercase)
        .collect()
}

pub fn same_text(a: &str, b: &str) -> bool {
    normalize(a) == normalize(b)
}

/// Display form of an underscore-separated identifier.
pub fn display_name(s: &str) -> String {
    s.replace('_', " ")
}

/// Round to one decimal place, halves away from zero.
pub fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

pub fn mean_rating(sum: i64, count: usize) -> f64 {
    // Zero reviews is a valid state and averages to 0 rather than NaN.
    if count == 0 {
        return 0.0;
    }
    round1(sum as f64 / count as f64)
}

pub fn format_int<T>(n: T) -> String
where
    T: ToFormattedString,
{
    n.to_formatted_string(&Locale::en)
}
