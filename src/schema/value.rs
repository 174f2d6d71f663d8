//! Lenient scalar coercions for loosely typed producer values.

use serde_json::Value;

/// Renders a value as text: strings as-is, scalars via their JSON form.
///
/// `null` has no text. Arrays and objects render as compact JSON.
#[must_use]
pub fn text_of(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) => Some(text.clone()),
        Value::Bool(_) | Value::Number(_) | Value::Array(_) | Value::Object(_) => {
            Some(value.to_string())
        }
    }
}

/// Text of an optional field, or empty text for missing, `null` and containers.
#[must_use]
pub fn text_or_empty(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(text)) => text.clone(),
        Some(scalar @ (Value::Number(_) | Value::Bool(_))) => scalar.to_string(),
        Some(Value::Null | Value::Array(_) | Value::Object(_)) | None => String::new(),
    }
}

/// Numeric coercion: JSON numbers and numeric text. Non-finite values are `None`.
#[must_use]
pub fn number_of(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(number) => number.as_f64()?,
        Value::String(text) => text.trim().parse::<f64>().ok()?,
        Value::Null | Value::Bool(_) | Value::Array(_) | Value::Object(_) => return None,
    };
    number.is_finite().then_some(number)
}

/// Identifier text of a value: non-empty strings and numbers only.
#[must_use]
pub fn identifier_of(value: &Value) -> Option<String> {
    match value {
        Value::String(text) if !text.is_empty() => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

/// Identity of a record identifier, keeping its JSON kind.
///
/// Text `"1001"` and number `1001` are different products.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IdentifierKey {
    Text(String),
    Number(String),
}

/// Identity of a value under the same rules as [`identifier_of`].
#[must_use]
pub fn identifier_key_of(value: &Value) -> Option<IdentifierKey> {
    match value {
        Value::String(text) if !text.is_empty() => Some(IdentifierKey::Text(text.clone())),
        Value::Number(number) => Some(IdentifierKey::Number(number.to_string())),
        _ => None,
    }
}
