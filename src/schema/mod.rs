//! Schema normalization: the single place where absent fields get defaults.
//!
//! [`normalize`] turns a coerced flat mapping into a [`CanonicalPayload`]
//! whose fields are always present and always of the expected type. Records
//! inside the lists stay raw JSON (the producer's field names vary); the
//! [`ScoredProduct`] and [`Theme`] views read them leniently downstream.
//!
//! # Example
//!
//! ```
//! use promo_planner::payload::{RawPayload, coerce};
//! use promo_planner::schema::normalize;
//!
//! let canonical = normalize(coerce(RawPayload::from("not even json")));
//! assert!(canonical.reply.is_empty());
//! assert!(canonical.search_data.is_empty());
//! assert!(canonical.analytics.regions.is_empty());
//! ```

mod records;
mod value;

pub use records::{FALLBACK_THEME_LABEL, ScoredProduct, Theme, region_items};
pub use value::{
    IdentifierKey, identifier_key_of, identifier_of, number_of, text_of, text_or_empty,
};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, instrument};

use crate::payload::{ANALYTICS_KEY, PROMOTIONS_BY_REGION_KEY};

/// Key under which a canonical payload keeps its unnormalized input.
pub const RAW_KEY: &str = "_raw";

/// Normalized monthly promotion payload.
///
/// Serializes with the producer's key names (`ats`, `_raw`) so that feeding a
/// serialized canonical payload back through [`normalize`] is a no-op.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CanonicalPayload {
    /// Narrative reply text; empty when absent.
    pub reply: String,
    /// Search keyword records (keyword, rank, volume, month under varying names).
    pub search_data: Vec<Value>,
    /// Holiday records (date, country, name).
    pub calendar: Vec<Value>,
    /// Product catalog records, passed through.
    pub catalog_raw: Vec<Value>,
    /// `{region, items}` blocks of scored products.
    pub recommended_products_by_region: Vec<Value>,
    /// Restock alerts, passed through.
    pub restock_alerts: Vec<Value>,
    /// Always empty here; themes come from `promotions_by_region`.
    pub promotions: Vec<Value>,
    /// `{region, items: [{theme, products}]}` blocks.
    pub promotions_by_region: Vec<Value>,
    /// Month plus per-region trend metrics.
    #[serde(rename = "ats")]
    pub analytics: Analytics,
    /// Flattened input, for diagnostic display only.
    #[serde(rename = "_raw")]
    pub raw: Map<String, Value>,
}

/// The analytics sub-structure: a month label and per-region metric records.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Analytics {
    pub month: String,
    /// Ordered `{region, ...metrics}` records.
    pub regions: Vec<Value>,
}

impl CanonicalPayload {
    /// Scored products recommended for a region, in delivered order.
    #[must_use]
    pub fn recommended_items(&self, region_code: &str) -> Vec<ScoredProduct> {
        region_items(&self.recommended_products_by_region, region_code)
            .iter()
            .filter(|item| item.is_object())
            .map(ScoredProduct::from_value)
            .collect()
    }

    /// Promotion themes for a region, as delivered (not yet de-duplicated).
    #[must_use]
    pub fn promotion_themes(&self, region_code: &str) -> Vec<Theme> {
        region_items(&self.promotions_by_region, region_code)
            .iter()
            .filter(|item| item.is_object())
            .map(Theme::from_value)
            .collect()
    }

    /// Analytics record for a region; an empty record when there is none.
    #[must_use]
    pub fn analytics_region(&self, region_code: &str) -> Map<String, Value> {
        self.analytics
            .regions
            .iter()
            .filter_map(Value::as_object)
            .find(|record| record.get("region").and_then(Value::as_str) == Some(region_code))
            .cloned()
            .unwrap_or_default()
    }
}

/// Normalizes a coerced flat mapping into a [`CanonicalPayload`].
///
/// Never fails: every missing or mistyped field becomes its empty value.
/// `calendar_raw` / `search_data_raw` take precedence over `calendar` /
/// `search_data` when they are lists. When the input already carries a
/// `_raw` mapping (a serialized canonical payload) it is kept as-is.
#[instrument(skip(flat), fields(keys = flat.len()))]
#[must_use]
pub fn normalize(flat: Map<String, Value>) -> CanonicalPayload {
    let analytics = normalize_analytics(flat.get(ANALYTICS_KEY));

    let calendar = prefer_raw_list(&flat, "calendar_raw", "calendar");
    let search_data = prefer_raw_list(&flat, "search_data_raw", "search_data");
    let reply = text_or_empty(flat.get("reply"));
    let catalog_raw = list_or_empty(&flat, "catalog_raw");
    let recommended_products_by_region = list_or_empty(&flat, "recommended_products_by_region");
    let restock_alerts = list_or_empty(&flat, "restock_alerts");
    let promotions_by_region = list_or_empty(&flat, PROMOTIONS_BY_REGION_KEY);
    let raw = match flat.get(RAW_KEY) {
        Some(Value::Object(raw)) => raw.clone(),
        _ => flat,
    };

    let canonical = CanonicalPayload {
        reply,
        search_data,
        calendar,
        catalog_raw,
        recommended_products_by_region,
        restock_alerts,
        promotions: Vec::new(),
        promotions_by_region,
        analytics,
        raw,
    };

    debug!(
        search = canonical.search_data.len(),
        calendar = canonical.calendar.len(),
        recommended_regions = canonical.recommended_products_by_region.len(),
        promotion_regions = canonical.promotions_by_region.len(),
        analytics_regions = canonical.analytics.regions.len(),
        "payload normalized"
    );
    canonical
}

fn prefer_raw_list(flat: &Map<String, Value>, raw_key: &str, key: &str) -> Vec<Value> {
    match (flat.get(raw_key), flat.get(key)) {
        (Some(Value::Array(items)), _) | (_, Some(Value::Array(items))) => items.clone(),
        _ => Vec::new(),
    }
}

fn list_or_empty(flat: &Map<String, Value>, key: &str) -> Vec<Value> {
    match flat.get(key) {
        Some(Value::Array(items)) => items.clone(),
        Some(other) => {
            debug!(key, kind = value_kind(other), "dropping non-list field");
            Vec::new()
        }
        None => Vec::new(),
    }
}

fn normalize_analytics(value: Option<&Value>) -> Analytics {
    let decoded;
    let record = match value {
        Some(Value::Object(record)) => record,
        Some(Value::String(text)) => match serde_json::from_str::<Value>(text) {
            Ok(Value::Object(record)) => {
                decoded = record;
                &decoded
            }
            Ok(other) => {
                debug!(kind = value_kind(&other), "analytics text is not an object");
                return Analytics::default();
            }
            Err(err) => {
                debug!(error = %err, "analytics text is not JSON");
                return Analytics::default();
            }
        },
        _ => return Analytics::default(),
    };

    let regions = match record.get("regions") {
        Some(Value::Array(regions)) => regions.clone(),
        Some(Value::Object(by_region)) => by_region
            .iter()
            .map(|(code, metrics)| {
                let mut entry = Map::new();
                entry.insert("region".to_string(), Value::String(code.clone()));
                if let Some(metrics) = metrics.as_object() {
                    entry.extend(metrics.iter().map(|(k, v)| (k.clone(), v.clone())));
                }
                Value::Object(entry)
            })
            .collect(),
        _ => Vec::new(),
    };

    Analytics {
        month: text_or_empty(record.get("month")),
        regions,
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn as_map(value: Value) -> Map<String, Value> {
        value.as_object().unwrap().clone()
    }

    #[test]
    fn test_normalize_empty_mapping_has_all_defaults() {
        let canonical = normalize(Map::new());
        assert_eq!(canonical, CanonicalPayload::default());
    }

    #[test]
    fn test_normalize_prefers_raw_variants() {
        let canonical = normalize(as_map(json!({
            "calendar": [{"name": "aggregated"}],
            "calendar_raw": [{"name": "raw"}],
            "search_data": [{"keyword": "agg"}],
            "search_data_raw": "not a list",
        })));
        assert_eq!(canonical.calendar, vec![json!({"name": "raw"})]);
        assert_eq!(canonical.search_data, vec![json!({"keyword": "agg"})]);
    }

    #[test]
    fn test_normalize_wrong_typed_fields_become_empty() {
        let canonical = normalize(as_map(json!({
            "reply": null,
            "catalog_raw": {"oops": true},
            "restock_alerts": "none",
            "recommended_products_by_region": 3,
            "promotions_by_region": null,
            "promotions": [{"theme": "ignored"}],
        })));
        assert_eq!(canonical.reply, "");
        assert!(canonical.catalog_raw.is_empty());
        assert!(canonical.restock_alerts.is_empty());
        assert!(canonical.recommended_products_by_region.is_empty());
        assert!(canonical.promotions_by_region.is_empty());
        assert!(canonical.promotions.is_empty());
    }

    #[test]
    fn test_normalize_analytics_region_mapping_becomes_list() {
        let canonical = normalize(as_map(json!({
            "ats": {
                "month": "2025-12",
                "regions": {
                    "KR": {"macro_issue": "snow"},
                    "JP": {"macro_issue": "new year", "region": "JP-override"},
                    "CN": "not a mapping",
                }
            }
        })));
        assert_eq!(canonical.analytics.month, "2025-12");
        assert_eq!(
            canonical.analytics.regions,
            vec![
                json!({"region": "KR", "macro_issue": "snow"}),
                json!({"region": "JP-override", "macro_issue": "new year"}),
                json!({"region": "CN"}),
            ]
        );
    }

    #[test]
    fn test_normalize_analytics_from_encoded_string() {
        let encoded = json!({"month": "2025-11", "regions": [{"region": "KR"}]}).to_string();
        let canonical = normalize(as_map(json!({ "ats": encoded })));
        assert_eq!(canonical.analytics.month, "2025-11");
        assert_eq!(canonical.analytics.regions, vec![json!({"region": "KR"})]);
    }

    #[test]
    fn test_normalize_analytics_bad_string_is_empty() {
        let canonical = normalize(as_map(json!({ "ats": "{broken" })));
        assert_eq!(canonical.analytics, Analytics::default());
        let canonical = normalize(as_map(json!({ "ats": "[1, 2]" })));
        assert_eq!(canonical.analytics, Analytics::default());
    }

    #[test]
    fn test_normalize_analytics_non_list_regions_default() {
        let canonical = normalize(as_map(json!({ "ats": {"month": 7, "regions": "KR"} })));
        assert_eq!(canonical.analytics.month, "7");
        assert!(canonical.analytics.regions.is_empty());
    }

    #[test]
    fn test_normalize_keeps_flat_input_as_raw() {
        let flat = as_map(json!({"reply": "hi", "unknown": 1}));
        let canonical = normalize(flat.clone());
        assert_eq!(canonical.raw, flat);
    }

    #[test]
    fn test_normalize_serialized_canonical_is_unchanged() {
        let first = normalize(as_map(json!({
            "reply": "hi",
            "search_data_raw": [{"keyword": "a", "month": 7}],
            "ats": {"month": "2025-07", "regions": {"KR": {"macro_issue": "heat"}}},
            "promotions_by_region": [{"region": "KR", "items": [{"theme": "Summer"}]}],
        })));
        let serialized = serde_json::to_value(&first).unwrap();
        let second = normalize(as_map(serialized));
        assert_eq!(second, first);
    }

    #[test]
    fn test_recommended_items_and_themes_by_region() {
        let canonical = normalize(as_map(json!({
            "recommended_products_by_region": [
                {"region": "KR", "items": [{"sku": "1", "name": "Serum"}, "junk"]}
            ],
            "promotions_by_region": [
                {"region": "KR", "items": [{"theme": "Glow", "products": ["serum"]}]}
            ],
        })));
        let items = canonical.recommended_items("KR");
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name, "Serum");
        assert_eq!(canonical.promotion_themes("KR"), vec![Theme::new("Glow", vec!["serum".to_string()])]);
        assert!(canonical.recommended_items("JP").is_empty());
    }

    #[test]
    fn test_analytics_region_missing_is_empty_record() {
        let canonical = normalize(as_map(json!({
            "ats": {"regions": [{"region": "KR", "macro_issue": "x"}]}
        })));
        assert_eq!(canonical.analytics_region("KR")["macro_issue"], "x");
        assert!(canonical.analytics_region("SEA").is_empty());
    }
}
