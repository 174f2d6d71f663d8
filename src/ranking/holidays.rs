//! Holiday lookup for a region and target month.

use std::collections::HashSet;

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use serde_json::Value;
use tracing::{debug, instrument, trace};

use crate::matchers::month_of_year_month;
use crate::schema::{CanonicalPayload, text_of};

/// Date-only layouts tried in order.
const DATE_FORMATS: [&str; 8] = [
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%Y.%m.%d",
    "%Y%m%d",
    "%m/%d/%Y",
    "%B %d, %Y",
    "%b %d, %Y",
    "%d %B %Y",
];

/// Date-time layouts tried in order (after RFC 3339).
const DATE_TIME_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f"];

/// Returns the holiday names for `region_code` in the month of `target_ym`.
///
/// An entry's month is its numeric `date` when that is a number, otherwise
/// the month of its `date` text parsed as a date. Names are unique and keep
/// first-seen order. An empty result is normal; without a month in
/// `target_ym` nothing matches.
#[instrument(skip(canonical), fields(entries = canonical.calendar.len()))]
#[must_use]
pub fn holidays_for(canonical: &CanonicalPayload, target_ym: &str, region_code: &str) -> Vec<String> {
    let Some(target_month) = month_of_year_month(target_ym) else {
        debug!("target has no month, no holidays selected");
        return Vec::new();
    };

    let mut seen = HashSet::new();
    let names: Vec<String> = canonical
        .calendar
        .iter()
        .filter_map(Value::as_object)
        .filter(|entry| entry.get("date").and_then(entry_month) == Some(target_month))
        .filter(|entry| entry.get("country").and_then(Value::as_str) == Some(region_code))
        .filter_map(|entry| entry.get("name").and_then(text_of))
        .filter(|name| seen.insert(name.clone()))
        .collect();

    debug!(found = names.len(), "holidays selected");
    names
}

fn entry_month(date: &Value) -> Option<u32> {
    match date {
        Value::Number(number) => {
            let month = number.as_f64()?;
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let month = (month.is_finite() && month >= 0.0).then(|| month.trunc() as u32);
            month
        }
        Value::String(text) => parse_date(text).map(|date| date.month()),
        Value::Null | Value::Bool(_) | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Parses common date layouts; a bare `YYYY-MM` means the first of that month.
#[must_use]
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    if let Ok(date_time) = DateTime::parse_from_rfc3339(text) {
        return Some(date_time.date_naive());
    }
    if let Some(date_time) = DATE_TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
    {
        return Some(date_time.date());
    }
    if let Some(date) = DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(text, format).ok())
    {
        return Some(date);
    }

    let month_start = format!("{text}-01");
    let parsed = NaiveDate::parse_from_str(&month_start, "%Y-%m-%d").ok();
    if parsed.is_none() {
        trace!(text, "unparseable calendar date");
    }
    parsed
}
