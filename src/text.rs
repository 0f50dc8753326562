//! Small text helpers shared by display and export paths.

use regex::Regex;
use std::sync::OnceLock;

/// Truncate text to `max_length` chars, marking the cut with an ellipsis.
///
/// Text at or under the limit is returned unchanged; otherwise the output is
/// exactly `max_length` chars and ends with `"..."`.
pub fn truncate_text(text: &str, max_length: usize) -> String {
    if text.chars().count() <= max_length {
        return text.to_string();
    }

    let kept: String = text.chars().take(max_length.saturating_sub(3)).collect();
    format!("{kept}...")
}

/// Extract http/https URLs from free text.
pub fn extract_urls_from_text(text: &str) -> Vec<String> {
    static URL_RE: OnceLock<Regex> = OnceLock::new();
    let re = URL_RE.get_or_init(|| {
        Regex::new(
            r"https?://(?:[-\w.])+(?:[:\d]+)?(?:/(?:[\w/_.])*(?:\?(?:[\w&=%.])*)?(?:#(?:[\w.])*)?)?",
        )
        .expect("static url pattern")
    });

    re.find_iter(text).map(|m| m.as_str().to_string()).collect()
}

/// Collapse whitespace and scrub control characters for terminal display.
pub fn clean_text_for_display(text: &str) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed.replace('\0', "").trim().to_string()
}
