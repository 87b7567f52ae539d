/*!
 * Helpers for the lightly normalized source markup.
 *
 * Content fields keep their inline tags (`<i>`, `<semantique>`, `<a>`,
 * `<exemple>`, `<nature>`). Classification rules look either at the raw
 * markup or at the stripped text, so both views are exposed here.
 */

use once_cell::sync::Lazy;
use regex::Regex;

static TAG_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"<[^>]+>").expect("Invalid tag regex")
});

static EXEMPLE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"<exemple>(.*?)</exemple>").expect("Invalid exemple regex")
});

/// Remove every tag and trim the result.
pub fn strip_tags(markup: &str) -> String {
    TAG_REGEX.replace_all(markup, "").trim().to_string()
}

/// Length in characters, not bytes.
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Keep at most `max_chars` characters.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => text[..byte_index].to_string(),
        None => text.to_string(),
    }
}

/// Inner text of the first `<exemple>` span, if any.
pub fn first_exemple(markup: &str) -> Option<&str> {
    EXEMPLE_REGEX
        .captures(markup)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}
