//! Typed views over passthrough records.
//!
//! The canonical payload keeps producer records as raw JSON so it can be
//! round-tripped; these views read the fields the recommendation stage needs,
//! degrading every missing or mistyped field instead of failing.

use serde::Serialize;
use serde_json::{Map, Value};

use super::value::{
    IdentifierKey, identifier_key_of, identifier_of, number_of, text_of, text_or_empty,
};

/// Label shown for a theme whose text is empty.
pub const FALLBACK_THEME_LABEL: &str = "테마";

/// A recommended product with its derived ranking score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredProduct {
    /// Product identifier as display text.
    pub sku: Option<String>,
    /// Identity used for the no-reuse rule; products without one are never
    /// marked as used.
    #[serde(skip)]
    pub identity: Option<IdentifierKey>,
    pub name: String,
    pub category: String,
    /// Stock as delivered (number or text), for display.
    pub stock: Option<Value>,
    /// `scores.final` if that key is present, else `scores.total`, as a number.
    pub score_total: Option<f64>,
    pub suggested_mechanic: Option<String>,
}

impl ScoredProduct {
    /// Reads a product record. Non-object records yield an empty product.
    #[must_use]
    pub fn from_value(value: &Value) -> Self {
        let empty = Map::new();
        let record = value.as_object().unwrap_or(&empty);

        Self {
            sku: record.get("sku").and_then(identifier_of),
            identity: record.get("sku").and_then(identifier_key_of),
            name: record.get("name").and_then(text_of).unwrap_or_default(),
            category: record.get("category").and_then(text_of).unwrap_or_default(),
            stock: record.get("stock").filter(|stock| !stock.is_null()).cloned(),
            score_total: score_total(record.get("scores")),
            suggested_mechanic: record.get("suggested_mechanic").and_then(text_of),
        }
    }

    /// Score used for the global ranking pool: absent scores rank as -1.
    #[must_use]
    pub fn rank_score(&self) -> f64 {
        self.score_total.unwrap_or(-1.0)
    }

    /// Case-folded "name category" text that theme tokens are matched against.
    #[must_use]
    pub fn match_text(&self) -> String {
        format!("{} {}", self.name, self.category).to_lowercase()
    }
}

fn score_total(scores: Option<&Value>) -> Option<f64> {
    let scores = scores?.as_object()?;
    // A present `final` key decides, even when its value is unusable.
    let raw = scores.get("final").or_else(|| scores.get("total"))?;
    number_of(raw)
}

/// A promotion theme within a region block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Theme {
    /// Theme label as delivered; may be empty.
    pub theme: String,
    /// Product keyword hints associated with the theme.
    pub products: Vec<String>,
}

impl Theme {
    /// Creates a theme from a label and hints.
    #[must_use]
    pub fn new(theme: impl Into<String>, products: Vec<String>) -> Self {
        Self {
            theme: theme.into(),
            products,
        }
    }

    /// Reads a theme record. A text `products` value is a single hint.
    #[must_use]
    pub fn from_value(value: &Value) -> Self {
        let empty = Map::new();
        let record = value.as_object().unwrap_or(&empty);

        let products = match record.get("products") {
            Some(Value::Array(items)) => items.iter().filter_map(text_of).collect(),
            Some(Value::String(hint)) => vec![hint.clone()],
            _ => Vec::new(),
        };

        Self {
            theme: text_or_empty(record.get("theme")),
            products,
        }
    }

    /// Trimmed label used for de-duplication; empty when the theme has none.
    #[must_use]
    pub fn key(&self) -> &str {
        self.theme.trim()
    }

    /// Display label, falling back to [`FALLBACK_THEME_LABEL`].
    #[must_use]
    pub fn label(&self) -> &str {
        let key = self.key();
        if key.is_empty() { FALLBACK_THEME_LABEL } else { key }
    }
}

/// Finds the first `{region, items}` block for a region code and returns its items.
///
/// Missing block, missing `items` or a non-list `items` all yield an empty slice.
#[must_use]
pub fn region_items<'a>(blocks: &'a [Value], region_code: &str) -> &'a [Value] {
    blocks
        .iter()
        .find(|block| block.get("region").and_then(Value::as_str) == Some(region_code))
        .and_then(|block| block.get("items"))
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_scored_product_prefers_final_over_total() {
        let product = ScoredProduct::from_value(&json!({
            "sku": "A1", "name": "Serum", "category": "Skincare",
            "stock": 12, "scores": {"final": "0.9", "total": 0.2},
            "suggested_mechanic": "1+1"
        }));
        assert_eq!(product.sku.as_deref(), Some("A1"));
        assert_eq!(product.score_total, Some(0.9));
        assert_eq!(product.stock, Some(json!(12)));
        assert_eq!(product.suggested_mechanic.as_deref(), Some("1+1"));
    }

    #[test]
    fn test_scored_product_falls_back_to_total() {
        let product = ScoredProduct::from_value(&json!({"scores": {"total": 55}}));
        assert_eq!(product.score_total, Some(55.0));
    }

    #[test]
    fn test_scored_product_present_but_null_final_is_undefined() {
        let product = ScoredProduct::from_value(&json!({"scores": {"final": null, "total": 5}}));
        assert_eq!(product.score_total, None);
        assert!((product.rank_score() - (-1.0)).abs() < f64::EPSILON);
    }

    #[test]
    fn test_scored_product_from_garbage() {
        let product = ScoredProduct::from_value(&json!("not a product"));
        assert_eq!(product.sku, None);
        assert_eq!(product.name, "");
        assert_eq!(product.score_total, None);
    }

    #[test]
    fn test_match_text_is_case_folded() {
        let product = ScoredProduct::from_value(&json!({"name": "Hand CREAM", "category": "Body"}));
        assert_eq!(product.match_text(), "hand cream body");
    }

    #[test]
    fn test_theme_from_value() {
        let theme = Theme::from_value(&json!({"theme": " Winter Gift ", "products": ["Cream", 3, null]}));
        assert_eq!(theme.key(), "Winter Gift");
        assert_eq!(theme.products, vec!["Cream", "3"]);
    }

    #[test]
    fn test_theme_label_fallback() {
        assert_eq!(Theme::default().label(), FALLBACK_THEME_LABEL);
        let theme = Theme::from_value(&json!({"products": "lipstick"}));
        assert_eq!(theme.label(), FALLBACK_THEME_LABEL);
        assert_eq!(theme.products, vec!["lipstick"]);
    }

    #[test]
    fn test_region_items_finds_first_matching_block() {
        let blocks = vec![
            json!({"region": "JP", "items": [1]}),
            json!({"region": "KR", "items": [2, 3]}),
            json!({"region": "KR", "items": [4]}),
        ];
        assert_eq!(region_items(&blocks, "KR"), &[json!(2), json!(3)]);
        assert!(region_items(&blocks, "SEA").is_empty());
    }

    #[test]
    fn test_region_items_non_list_items() {
        let blocks = vec![json!({"region": "KR", "items": "oops"}), json!("junk")];
        assert!(region_items(&blocks, "KR").is_empty());
    }
}
