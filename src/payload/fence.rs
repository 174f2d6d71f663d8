//! JSON decoding for textual payloads, including ```json fenced blocks.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;
use tracing::trace;

use super::error::PayloadError;

/// First ``` fenced block, optionally tagged `json` (any case).
#[allow(clippy::expect_used)]
static FENCED_BLOCK_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)```(?:json)?\s*(.*?)\s*```").expect("fenced block regex is valid")
});

/// Decodes payload text as JSON, falling back to the first fenced block.
///
/// # Errors
///
/// Returns [`PayloadError`] when neither the whole text nor a fenced block
/// inside it decodes.
pub fn decode_text(text: &str) -> Result<Value, PayloadError> {
    let trimmed = text.trim();
    match serde_json::from_str::<Value>(trimmed) {
        Ok(value) => Ok(value),
        Err(whole_err) => {
            trace!(error = %whole_err, "payload text is not bare JSON, trying fenced block");
            let inner = extract_fenced_block(trimmed)
                .ok_or_else(|| PayloadError::no_fenced_block(trimmed))?;
            serde_json::from_str::<Value>(inner.trim())
                .map_err(|err| PayloadError::invalid_json(inner, &err))
        }
    }
}

/// Returns the inner text of the first fenced block, if any.
#[must_use]
pub fn extract_fenced_block(text: &str) -> Option<&str> {
    FENCED_BLOCK_PATTERN
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|inner| inner.as_str())
}
