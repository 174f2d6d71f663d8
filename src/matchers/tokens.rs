//! Keyword token helpers for theme matching and trend text.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

/// Separators inside a theme label: whitespace, comma, slash, pipe, middle dots.
#[allow(clippy::expect_used)]
static THEME_SEPARATOR_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\s,/|·•]+").expect("theme separator regex is valid"));

/// Separators inside a free-text trend list: bullets, semicolons, newlines, commas.
#[allow(clippy::expect_used)]
static LIST_SEPARATOR_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[•·;\n]|,\s*").expect("list separator regex is valid"));

/// Builds the case-folded, de-duplicated token list for a theme.
///
/// The theme label is split on separators; product hints are kept whole.
/// Order is preserved: label tokens first, then hints.
#[must_use]
pub fn theme_tokens(label: &str, hints: &[String]) -> Vec<String> {
    let label = label.to_lowercase();
    let label_tokens = if label.is_empty() {
        Vec::new()
    } else {
        THEME_SEPARATOR_PATTERN
            .split(&label)
            .map(str::to_string)
            .collect()
    };

    let hint_tokens = hints
        .iter()
        .filter(|hint| !hint.trim().is_empty())
        .map(|hint| hint.to_lowercase());

    let mut seen = HashSet::new();
    label_tokens
        .into_iter()
        .chain(hint_tokens)
        .map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty())
        .filter(|token| seen.insert(token.clone()))
        .collect()
}

/// Splits a free-text list ("a • b; c, d") into trimmed, non-empty items.
#[must_use]
pub fn split_list_text(text: &str) -> Vec<String> {
    LIST_SEPARATOR_PATTERN
        .split(text)
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_tokens_splits_label_and_appends_hints() {
        let tokens = theme_tokens(
            "Winter Skincare / Gift",
            &["Cream".to_string(), "lipstick".to_string()],
        );
        assert_eq!(tokens, vec!["winter", "skincare", "gift", "cream", "lipstick"]);
    }

    #[test]
    fn test_theme_tokens_deduplicates_preserving_order() {
        let tokens = theme_tokens("gift·gift | set", &["GIFT".to_string(), "set".to_string()]);
        assert_eq!(tokens, vec!["gift", "set"]);
    }

    #[test]
    fn test_theme_tokens_keeps_multiword_hints_whole() {
        let tokens = theme_tokens("", &["  Hand Cream ".to_string(), " ".to_string()]);
        assert_eq!(tokens, vec!["hand cream"]);
    }

    #[test]
    fn test_theme_tokens_empty_inputs() {
        assert!(theme_tokens("", &[]).is_empty());
        assert!(theme_tokens(" , / ", &[]).is_empty());
    }

    #[test]
    fn test_split_list_text_handles_mixed_separators() {
        let items = split_list_text("snow festival • ski trips; duty-free, year-end\nsales");
        assert_eq!(
            items,
            vec!["snow festival", "ski trips", "duty-free", "year-end", "sales"]
        );
    }

    #[test]
    fn test_split_list_text_blank() {
        assert!(split_list_text("  ").is_empty());
    }
}
