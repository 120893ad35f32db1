use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::models::Topic;
use crate::rules::RULES;

/// Collapses runs of whitespace and trims.
pub fn normalize_text(input: &str) -> String {
    input.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Case-folds and strips diacritics so `"Époque"` and `"epoque"` compare equal.
/// Keywords and utterances both go through this before matching.
pub fn normalize_for_matching(input: &str) -> String {
    input
        .to_lowercase()
        .nfd()
        .filter(|ch| !is_combining_mark(*ch))
        .collect()
}

pub fn classify_topic(text: &str) -> Topic {
    let normalized = normalize_for_matching(text);
    RULES
        .iter()
        .find(|rule| rule.matches(&normalized))
        .map(|rule| rule.topic)
        .unwrap_or(Topic::Unknown)
}

pub(crate) fn contains_any(input: &str, needles: &[&str]) -> bool {
    needles
        .iter()
        .any(|needle| input.contains(normalize_for_matching(needle).as_str()))
}
