//! Year-month and month-number extraction from free text.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;
use tracing::trace;

/// Four-digit year followed by an optional separator and a two-digit month.
#[allow(clippy::expect_used)]
static YEAR_MONTH_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(20\d{2})[-/.]?(0[1-9]|1[0-2])").expect("year-month regex is valid")
});

/// Korean month suffix: "12월", "3 월".
#[allow(clippy::expect_used)]
static KOREAN_MONTH_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(0?[1-9]|1[0-2])\s*월").expect("korean month regex is valid")
});

/// Bare year in the 2000s.
#[allow(clippy::expect_used)]
static YEAR_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(20\d{2})").expect("year regex is valid"));

/// Year-prefixed month with a one or two digit month, used for record months.
#[allow(clippy::expect_used)]
static RECORD_YEAR_MONTH_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"20\d{2}[-/.]?(\d{1,2})").expect("record year-month regex is valid")
});

/// Bare one or two digit month, whole string.
#[allow(clippy::expect_used)]
static BARE_MONTH_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{1,2})$").expect("bare month regex is valid"));

/// Any one or two digit number followed by "월".
#[allow(clippy::expect_used)]
static RECORD_KOREAN_MONTH_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d{1,2})\s*월").expect("record korean month regex is valid")
});

/// Extracts a `YYYY-MM` token from free text, layering matches over a default.
///
/// Layers, in order:
/// 1. A combined year+month (`2025-12`, `2025/12`, `202512`) sets both parts.
/// 2. Otherwise a Korean month (`12월`) sets only the month.
/// 3. The first bare `20xx` year in the text then sets the year, even when
///    layer 1 already set it.
///
/// Blank text returns `default_ym` unchanged. A default without a `-` is
/// treated as a year with an empty month.
///
/// # Example
///
/// ```
/// use promo_planner::matchers::extract_year_month;
///
/// assert_eq!(extract_year_month("2025-12 프로모션", "2024-01"), "2025-12");
/// assert_eq!(extract_year_month("12월 기획", "2024-01"), "2024-12");
/// assert_eq!(extract_year_month("2025년 기획", "2024-03"), "2025-03");
/// ```
#[must_use]
pub fn extract_year_month(text: &str, default_ym: &str) -> String {
    if text.trim().is_empty() {
        return default_ym.to_string();
    }

    let (default_year, default_month) = default_ym.split_once('-').unwrap_or((default_ym, ""));
    let mut year = default_year.to_string();
    let mut month = default_month.to_string();

    if let Some(caps) = YEAR_MONTH_PATTERN.captures(text) {
        year = caps[1].to_string();
        month = caps[2].to_string();
    } else if let Some(caps) = KOREAN_MONTH_PATTERN.captures(text) {
        if let Ok(parsed) = caps[1].parse::<u32>() {
            month = format!("{parsed:02}");
        }
    }

    if let Some(caps) = YEAR_PATTERN.captures(text) {
        year = caps[1].to_string();
    }

    trace!(text, %year, %month, "extracted year-month");
    format!("{year}-{month}")
}

/// Returns the month number of a `YYYY-MM` key, if it has one.
///
/// Used to turn a target year-month into a filter value; `None` means no
/// month filter applies.
#[must_use]
pub fn month_of_year_month(year_month: &str) -> Option<u32> {
    year_month
        .split('-')
        .nth(1)
        .and_then(|month| month.trim().parse::<u32>().ok())
}

/// Extracts a month number (1..=12) from a heterogeneous record value.
///
/// Accepts numbers (truncated), `20YY-MM`-style text, bare `M`/`MM` text and
/// `M월` text. Anything else, including out-of-range months, is `None`.
#[must_use]
pub fn month_of(value: &Value) -> Option<u32> {
    match value {
        Value::Number(number) => {
            let raw = number.as_f64()?;
            if !raw.is_finite() {
                return None;
            }
            #[allow(clippy::cast_possible_truncation)]
            let month = raw.trunc() as i64;
            in_month_range(month)
        }
        Value::String(text) => month_of_text(text),
        Value::Null | Value::Bool(_) | Value::Array(_) | Value::Object(_) => None,
    }
}

fn month_of_text(text: &str) -> Option<u32> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    // The first pattern that matches decides; an out-of-range month does not
    // fall through to the next pattern.
    let captured = RECORD_YEAR_MONTH_PATTERN
        .captures(text)
        .or_else(|| BARE_MONTH_PATTERN.captures(text))
        .or_else(|| RECORD_KOREAN_MONTH_PATTERN.captures(text))?;

    captured[1].parse::<i64>().ok().and_then(in_month_range)
}

fn in_month_range(month: i64) -> Option<u32> {
    if (1..=12).contains(&month) {
        u32::try_from(month).ok()
    } else {
        None
    }
}
