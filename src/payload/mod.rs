//! Payload coercion: reduce any producer payload shape to one flat mapping.
//!
//! Upstream producers deliver the monthly promotion payload in several shapes:
//! a JSON object, JSON text (sometimes wrapped in a ```json fenced block with
//! prose around it), or a list of wrapper objects, each carrying part of the
//! data under a `json` key. [`coerce`] accepts all of them and never fails;
//! anything it cannot read becomes an empty mapping.
//!
//! # Example
//!
//! ```
//! use promo_planner::payload::{RawPayload, coerce};
//! use serde_json::json;
//!
//! let raw = RawPayload::from(json!([
//!     {"json": {"reply": "first"}},
//!     {"json": {"reply": "second", "calendar": []}},
//! ]));
//! let flat = coerce(raw);
//! assert_eq!(flat["reply"], "first");
//! assert!(flat.contains_key("calendar"));
//! ```

mod error;
mod fence;

pub use error::PayloadError;
pub use fence::{decode_text, extract_fenced_block};

use serde_json::{Map, Value};
use tracing::{debug, instrument};

/// Top-level keys copied out of wrapper sequences; the first occurrence wins.
pub const RECOGNIZED_KEYS: [&str; 9] = [
    "reply",
    "search_data",
    "calendar",
    "promotions",
    "search_data_raw",
    "calendar_raw",
    "catalog_raw",
    "recommended_products_by_region",
    "restock_alerts",
];

/// Key of the analytics sub-structure.
pub const ANALYTICS_KEY: &str = "ats";

/// Key of the per-region promotion theme blocks.
pub const PROMOTIONS_BY_REGION_KEY: &str = "promotions_by_region";

/// Key wrapper objects use to nest the actual data.
const WRAPPER_KEY: &str = "json";

/// A payload as received from the fetch collaborator, before coercion.
#[derive(Debug, Clone, PartialEq)]
pub enum RawPayload {
    /// Already a JSON object.
    Mapping(Map<String, Value>),
    /// JSON text, possibly inside a fenced block, or unreadable text.
    Text(String),
    /// A list of wrapper objects (or anything else).
    Sequence(Vec<Value>),
    /// Nothing usable: absent body, `null`, a bare number or boolean.
    Empty,
}

impl From<Value> for RawPayload {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(map) => Self::Mapping(map),
            Value::String(text) => Self::Text(text),
            Value::Array(items) => Self::Sequence(items),
            Value::Null | Value::Bool(_) | Value::Number(_) => Self::Empty,
        }
    }
}

impl From<Option<Value>> for RawPayload {
    fn from(value: Option<Value>) -> Self {
        value.map_or(Self::Empty, Self::from)
    }
}

impl From<String> for RawPayload {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<&str> for RawPayload {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

/// Coerces a raw payload into a single flat mapping.
///
/// - A mapping is returned unchanged.
/// - Text is decoded as JSON (or from its first fenced block) and the decoded
///   value is coerced again; undecodable text yields an empty mapping.
/// - A sequence is merged element by element: each element's `json` mapping
///   (or the element itself) contributes the first-seen value of every
///   [`RECOGNIZED_KEYS`] entry. An `ats` mapping or a `promotions_by_region`
///   list is taken from the latest element that carries one.
/// - Anything else yields an empty mapping.
#[instrument(skip(raw), fields(shape = raw.shape()))]
#[must_use]
pub fn coerce(raw: RawPayload) -> Map<String, Value> {
    match raw {
        RawPayload::Mapping(map) => map,
        RawPayload::Text(text) => match decode_text(&text) {
            Ok(value) => coerce(RawPayload::from(value)),
            Err(err) => {
                debug!(error = %err, "unreadable text payload, using empty mapping");
                Map::new()
            }
        },
        RawPayload::Sequence(items) => merge_wrappers(&items),
        RawPayload::Empty => Map::new(),
    }
}

impl RawPayload {
    /// Short label of the payload shape for logging.
    #[must_use]
    pub fn shape(&self) -> &'static str {
        match self {
            Self::Mapping(_) => "mapping",
            Self::Text(_) => "text",
            Self::Sequence(_) => "sequence",
            Self::Empty => "empty",
        }
    }
}

fn merge_wrappers(items: &[Value]) -> Map<String, Value> {
    let mut out = Map::new();

    for item in items {
        let Some(element) = item.as_object() else {
            debug!("skipping non-object wrapper element");
            continue;
        };
        let candidate = match element.get(WRAPPER_KEY) {
            Some(Value::Object(inner)) => inner,
            _ => element,
        };

        for key in RECOGNIZED_KEYS {
            if !out.contains_key(key)
                && let Some(value) = candidate.get(key)
            {
                out.insert(key.to_string(), value.clone());
            }
        }

        if let Some(analytics @ Value::Object(_)) = candidate.get(ANALYTICS_KEY) {
            out.insert(ANALYTICS_KEY.to_string(), analytics.clone());
        }
        if let Some(blocks @ Value::Array(_)) = candidate.get(PROMOTIONS_BY_REGION_KEY) {
            out.insert(PROMOTIONS_BY_REGION_KEY.to_string(), blocks.clone());
        }
    }

    debug!(keys = out.len(), elements = items.len(), "merged wrapper sequence");
    out
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
    fn test_coerce_mapping_is_unchanged() {
        let map = as_map(json!({"reply": "hi", "anything": [1, 2]}));
        assert_eq!(coerce(RawPayload::Mapping(map.clone())), map);
    }

    #[test]
    fn test_coerce_json_text() {
        let flat = coerce(RawPayload::from(r#"{"reply": "hello", "calendar": []}"#));
        assert_eq!(flat["reply"], "hello");
        assert_eq!(flat["calendar"], json!([]));
    }

    #[test]
    fn test_coerce_fenced_text_with_prose() {
        let text = "결과입니다\n```json\n{\"reply\": \"fenced\"}\n```";
        let flat = coerce(RawPayload::from(text));
        assert_eq!(flat["reply"], "fenced");
    }

    #[test]
    fn test_coerce_malformed_text_is_empty() {
        assert!(coerce(RawPayload::from("{not json")).is_empty());
        assert!(coerce(RawPayload::from("")).is_empty());
    }

    #[test]
    fn test_coerce_json_text_holding_sequence_is_merged() {
        let text = r#"[{"json": {"reply": "from list"}}]"#;
        assert_eq!(coerce(RawPayload::from(text))["reply"], "from list");
    }

    #[test]
    fn test_coerce_double_encoded_text() {
        let inner = r#"{"reply": "nested"}"#;
        let outer = serde_json::to_string(inner).unwrap();
        assert_eq!(coerce(RawPayload::from(outer))["reply"], "nested");
    }

    #[test]
    fn test_coerce_sequence_first_seen_wins() {
        let raw = RawPayload::from(json!([
            {"json": {"reply": "first", "search_data": [1]}},
            {"json": {"reply": "second", "search_data": [2], "calendar": [3]}},
        ]));
        let flat = coerce(raw);
        assert_eq!(flat["reply"], "first");
        assert_eq!(flat["search_data"], json!([1]));
        assert_eq!(flat["calendar"], json!([3]));
    }

    #[test]
    fn test_coerce_sequence_uses_element_without_json_wrapper() {
        let raw = RawPayload::from(json!([
            {"reply": "direct"},
            {"json": "not a mapping", "catalog_raw": [1]},
        ]));
        let flat = coerce(raw);
        assert_eq!(flat["reply"], "direct");
        assert_eq!(flat["catalog_raw"], json!([1]));
    }

    #[test]
    fn test_coerce_sequence_drops_unrecognized_keys() {
        let raw = RawPayload::from(json!([{"json": {"mystery": 1, "reply": "x"}}]));
        let flat = coerce(raw);
        assert!(!flat.contains_key("mystery"));
        assert_eq!(flat.len(), 1);
    }

    #[test]
    fn test_coerce_sequence_captures_analytics_and_region_blocks() {
        let raw = RawPayload::from(json!([
            {"json": {"ats": "encoded string is not captured"}},
            {"json": {"ats": {"month": "2025-12"}}},
            {"json": {"promotions_by_region": [{"region": "KR"}]}},
            {"json": {"promotions_by_region": [{"region": "JP"}]}},
        ]));
        let flat = coerce(raw);
        assert_eq!(flat["ats"], json!({"month": "2025-12"}));
        assert_eq!(flat["promotions_by_region"], json!([{"region": "JP"}]));
    }

    #[test]
    fn test_coerce_sequence_skips_non_objects() {
        let raw = RawPayload::from(json!([1, "two", null, {"json": {"reply": "ok"}}]));
        assert_eq!(coerce(raw)["reply"], "ok");
    }

    #[test]
    fn test_coerce_empty_shapes() {
        assert!(coerce(RawPayload::Empty).is_empty());
        assert!(coerce(RawPayload::from(json!(42))).is_empty());
        assert!(coerce(RawPayload::from(None)).is_empty());
    }
}
