//! Top-N search keyword ranking for a target month.

use std::cmp::Ordering;

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, instrument};

use crate::matchers::{month_of, month_of_year_month};
use crate::schema::{CanonicalPayload, number_of, text_of};

/// Default number of keywords returned.
pub const DEFAULT_KEYWORD_LIMIT: usize = 10;

/// Rank assigned to records without a usable rank; sorts last.
pub const UNRANKED: i64 = 999;

/// One row of the keyword ranking.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeywordRank {
    pub keyword: String,
    /// Producer rank, or [`UNRANKED`].
    pub rank: i64,
    /// Search volume, 0 when missing or non-numeric.
    pub search_value: f64,
}

impl KeywordRank {
    /// Whether the producer supplied a real rank for this keyword.
    #[must_use]
    pub fn is_ranked(&self) -> bool {
        self.rank < UNRANKED
    }
}

/// Returns the top `limit` search keywords for the month of `target_ym`.
///
/// Column names are matched case-insensitively. The keyword comes from a
/// `keyword` column, else the first column whose name contains `key`; the
/// volume from `search_volume`, else `volume`. Rows whose `month` does not
/// resolve to the target month are dropped; when `target_ym` has no month
/// part no month filter applies.
///
/// Ordering: if any row carries a real rank, ascending rank with descending
/// volume as tiebreak; otherwise descending volume. Ties keep input order.
#[instrument(skip(canonical), fields(rows = canonical.search_data.len()))]
#[must_use]
pub fn top_search_keywords(
    canonical: &CanonicalPayload,
    target_ym: &str,
    limit: usize,
) -> Vec<KeywordRank> {
    let rows: Vec<Map<String, Value>> = canonical
        .search_data
        .iter()
        .filter_map(Value::as_object)
        .map(fold_column_names)
        .collect();
    if rows.is_empty() {
        return Vec::new();
    }

    let columns = ColumnChoice::for_rows(&rows);
    let target_month = month_of_year_month(target_ym);

    let mut ranked: Vec<KeywordRank> = rows
        .iter()
        .filter(|row| match target_month {
            Some(month) => row.get("month").and_then(month_of) == Some(month),
            None => true,
        })
        .map(|row| columns.read(row))
        .collect();

    if ranked.iter().any(KeywordRank::is_ranked) {
        ranked.sort_by(|a, b| {
            a.rank
                .cmp(&b.rank)
                .then_with(|| descending(a.search_value, b.search_value))
        });
    } else {
        ranked.sort_by(|a, b| descending(a.search_value, b.search_value));
    }
    ranked.truncate(limit);

    debug!(month = ?target_month, returned = ranked.len(), "search keywords ranked");
    ranked
}

fn descending(a: f64, b: f64) -> Ordering {
    b.total_cmp(&a)
}

fn fold_column_names(row: &Map<String, Value>) -> Map<String, Value> {
    row.iter()
        .map(|(key, value)| (key.trim().to_lowercase(), value.clone()))
        .collect()
}

/// Which folded column names hold the keyword and the volume.
struct ColumnChoice {
    keyword: Option<String>,
    volume: &'static str,
}

impl ColumnChoice {
    fn for_rows(rows: &[Map<String, Value>]) -> Self {
        let has_column = |name: &str| rows.iter().any(|row| row.contains_key(name));

        let keyword = if has_column("keyword") {
            Some("keyword".to_string())
        } else {
            rows.iter()
                .flat_map(Map::keys)
                .find(|name| name.contains("key"))
                .cloned()
        };
        let volume = if has_column("search_volume") {
            "search_volume"
        } else {
            "volume"
        };

        Self { keyword, volume }
    }

    fn read(&self, row: &Map<String, Value>) -> KeywordRank {
        let keyword = self
            .keyword
            .as_deref()
            .and_then(|column| row.get(column))
            .and_then(text_of)
            .unwrap_or_default();
        let search_value = row.get(self.volume).and_then(number_of).unwrap_or(0.0);
        #[allow(clippy::cast_possible_truncation)]
        let rank = row
            .get("rank")
            .and_then(number_of)
            .map_or(UNRANKED, |rank| rank.trunc() as i64);

        KeywordRank {
            keyword,
            rank,
            search_value,
        }
    }
}
