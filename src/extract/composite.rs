//! Splitting of lines that combine two fields.

use std::sync::LazyLock;

use regex::Regex;

use crate::text::normalize_digits;

/// Punctuation that joins the halves of a composite value.
const SEPARATORS: &[char] = &['／', '/', ',', '，', '、', '|', '｜'];

/// Tokens that mark a segment as a count.
const COUNT_TOKENS: &[&str] = &["ドア", "枚", "door", "Door", "DOOR"];

static RE_COUNT_WITH_UNIT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([0-9]+)\s*(?:ドア|枚|[Dd]oors?|DOORS?)").expect("regex is compile-time constant")
});
static RE_TRAILING_COUNT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([0-9]+)\s*$").expect("regex is compile-time constant"));
static RE_ANY_COUNT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([0-9]+)").expect("regex is compile-time constant"));

fn trim_separators(value: &str) -> &str {
    value.trim_end_matches(|c: char| SEPARATORS.contains(&c) || c.is_whitespace()).trim()
}

fn segments(value: &str) -> Vec<&str> {
    value
        .split(SEPARATORS)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Split `ホワイトパール／5ドア` into `("ホワイトパール", "5")`.
///
/// The last digit run followed by a unit wins, then a digit run at the end
/// of the value, then the first digit run anywhere. Without digits the value
/// is split on separators: the first segment is the color and the count is
/// the first later segment holding a count token, or else the second segment.
pub fn split_color_count(raw: &str) -> (String, String) {
    let value = normalize_digits(raw.trim());

    let count_match = RE_COUNT_WITH_UNIT
        .captures_iter(&value)
        .last()
        .or_else(|| RE_TRAILING_COUNT.captures(&value))
        .or_else(|| RE_ANY_COUNT.captures(&value));
    if let Some(caps) = count_match {
        if let (Some(whole), Some(digits)) = (caps.get(0), caps.get(1)) {
            let color = trim_separators(&value[..whole.start()]);
            return (color.to_string(), digits.as_str().to_string());
        }
    }

    let parts = segments(raw);
    let Some((first, rest)) = parts.split_first() else {
        return (String::new(), String::new());
    };
    let count = rest
        .iter()
        .find(|s| COUNT_TOKENS.iter().any(|t| s.contains(t)))
        .or_else(|| rest.first())
        .map(|s| s.to_string())
        .unwrap_or_default();
    (first.to_string(), count)
}

/// Split `DAA-ZVW50, ナビ/ETC` into `("DAA-ZVW50", "ナビ/ETC")`.
pub fn split_model_equipment(raw: &str) -> (String, String) {
    let parts = segments(raw);
    match parts.split_first() {
        Some((code, equipment)) => (code.to_string(), equipment.join("/")),
        None => (String::new(), String::new()),
    }
}
