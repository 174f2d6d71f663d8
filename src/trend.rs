//! NOW TREND panel for one region.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::matchers::split_list_text;
use crate::schema::{CanonicalPayload, text_of};

/// Trend sections in display order, with their titles.
pub const TREND_SECTIONS: [(&str, &str); 6] = [
    ("macro_issue", "🌤️ 주요 이슈"),
    ("shopping_trend", "🛍️ 쇼핑 트렌드"),
    ("consumer_behavior", "👥 소비자 행동"),
    ("travel_leisure", "✈️ 여행·레저"),
    ("brand_highlight", "🏷️ 카테고리/브랜드"),
    ("promotion_implication", "🎯 프로모션 시사점"),
];

/// One titled section of the trend panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrendSection {
    pub key: &'static str,
    pub title: &'static str,
    pub bullets: Vec<String>,
    /// Tags, each starting with `#`.
    pub hashtags: Vec<String>,
}

impl TrendSection {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bullets.is_empty() && self.hashtags.is_empty()
    }
}

/// Trend sections read from a region's analytics record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegionTrend {
    pub region: String,
    pub sections: Vec<TrendSection>,
}

impl RegionTrend {
    /// Builds the panel for `region_code`. A region without analytics gets
    /// all six sections, each empty.
    #[must_use]
    pub fn from_payload(canonical: &CanonicalPayload, region_code: &str) -> Self {
        Self::from_record(region_code, &canonical.analytics_region(region_code))
    }

    #[must_use]
    pub fn from_record(region_code: &str, record: &Map<String, Value>) -> Self {
        let hashtags = record.get("hashtags").and_then(Value::as_object);
        let sections = TREND_SECTIONS
            .iter()
            .map(|&(key, title)| TrendSection {
                key,
                title,
                bullets: record.get(key).map(bullets_of).unwrap_or_default(),
                hashtags: hashtags
                    .and_then(|tags| tags.get(key))
                    .map(hashtags_of)
                    .unwrap_or_default(),
            })
            .collect();

        Self {
            region: region_code.to_string(),
            sections,
        }
    }

    /// Whether every section is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sections.iter().all(TrendSection::is_empty)
    }
}

fn bullets_of(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => trimmed_items(items),
        Value::Null => Vec::new(),
        other => text_of(other)
            .map(|text| split_list_text(&text))
            .unwrap_or_default(),
    }
}

fn hashtags_of(value: &Value) -> Vec<String> {
    let tags = match value {
        Value::Array(items) => trimmed_items(items),
        Value::Null => Vec::new(),
        other => text_of(other)
            .map(|text| text.split_whitespace().map(str::to_string).collect())
            .unwrap_or_default(),
    };
    tags.into_iter()
        .map(|tag| if tag.starts_with('#') { tag } else { format!("#{tag}") })
        .collect()
}

fn trimmed_items(items: &[Value]) -> Vec<String> {
    items
        .iter()
        .filter_map(text_of)
        .map(|item| item.trim().to_string())
        .filter(|item| !item.is_empty())
        .collect()
}
