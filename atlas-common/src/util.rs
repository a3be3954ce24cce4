//! Utility functions shared across Atlas crates.

use regex::Regex;
use std::sync::LazyLock;

static CONTROL_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\x00-\x1F\x7F]+").unwrap());

/// Keep at most `max_chars` characters of `s`.
///
/// Cuts on character boundaries, so multi-byte text (accented names, CJK)
/// never panics.
pub fn truncate_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// Truncate a string to at most `max_chars` characters, appending "..." if truncated.
pub fn truncate_with_ellipsis(s: &str, max_chars: usize) -> String {
    let truncated = truncate_chars(s, max_chars);
    if truncated.len() == s.len() {
        s.to_string()
    } else {
        format!("{}...", truncated.trim_end())
    }
}

/// Sanitize a string for safe logging (strip control characters, bound length).
pub fn sanitize_for_log(s: &str) -> String {
    let cleaned = CONTROL_CHARS.replace_all(s, " ");
    truncate_with_ellipsis(&cleaned, 120)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_chars() {
        assert_eq!(truncate_chars("hello", 10), "hello");
        assert_eq!(truncate_chars("hello world", 5), "hello");
        assert_eq!(truncate_chars("Türkiye", 2), "Tü");
        assert_eq!(truncate_chars("", 3), "");
    }

    #[test]
    fn test_truncate_with_ellipsis() {
        assert_eq!(truncate_with_ellipsis("hello", 10), "hello");
        assert_eq!(truncate_with_ellipsis("hello world", 6), "hello...");
        assert_eq!(truncate_with_ellipsis("😀😀😀😀", 2), "😀😀...");
    }

    #[test]
    fn test_sanitize_for_log() {
        assert_eq!(sanitize_for_log("Korea,\nRepublic of"), "Korea, Republic of");
        let long = "x".repeat(500);
        assert!(sanitize_for_log(&long).ends_with("..."));
    }
}
