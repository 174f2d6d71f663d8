//! Active theme selection.

use std::collections::HashSet;

use crate::schema::Theme;

/// Maximum number of themes shown for one region-month.
pub const MAX_THEMES: usize = 4;

/// Keeps the first [`MAX_THEMES`] themes with a distinct, non-empty label.
///
/// Labels are compared after trimming; themes without a label are dropped.
/// Input order is preserved.
#[must_use]
pub fn active_themes(themes: &[Theme]) -> Vec<Theme> {
    let mut seen = HashSet::new();
    themes
        .iter()
        .filter(|theme| !theme.key().is_empty())
        .filter(|theme| seen.insert(theme.key().to_string()))
        .take(MAX_THEMES)
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labelled(labels: &[&str]) -> Vec<Theme> {
        labels.iter().map(|label| Theme::new(*label, Vec::new())).collect()
    }

    fn labels(themes: &[Theme]) -> Vec<&str> {
        themes.iter().map(Theme::key).collect()
    }

    #[test]
    fn test_active_themes_dedupes_and_caps() {
        let themes = labelled(&["A", "A", "B", "C", "D", "E"]);
        assert_eq!(labels(&active_themes(&themes)), vec!["A", "B", "C", "D"]);
    }

    #[test]
    fn test_active_themes_skips_blank_labels() {
        let themes = labelled(&["", "  ", "Gift", " Gift ", "Travel"]);
        assert_eq!(labels(&active_themes(&themes)), vec!["Gift", "Travel"]);
    }

    #[test]
    fn test_active_themes_empty() {
        assert!(active_themes(&[]).is_empty());
    }
}
