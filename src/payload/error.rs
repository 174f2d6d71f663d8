//! Error types for payload decoding.
//!
//! These never escape [`coerce`](super::coerce); they exist so the decode
//! steps can use `?` and so the reason for a degraded payload can be logged.

use thiserror::Error;

/// Maximum characters of offending text kept in an error for logging.
const PREVIEW_CHARS: usize = 80;

/// Reasons a textual payload could not be decoded.
#[derive(Debug, Clone, Error)]
pub enum PayloadError {
    /// Text is not valid JSON.
    #[error("payload text is not JSON ({reason}): {preview}")]
    InvalidJson {
        /// Truncated payload text for display
        preview: String,
        /// Decoder message
        reason: String,
    },

    /// Text contains no ```-fenced block.
    #[error("payload text has no fenced block: {preview}")]
    NoFencedBlock {
        /// Truncated payload text for display
        preview: String,
    },
}

impl PayloadError {
    /// Creates an `InvalidJson` error from a decoder failure.
    #[must_use]
    pub fn invalid_json(text: &str, source: &serde_json::Error) -> Self {
        Self::InvalidJson {
            preview: preview(text),
            reason: source.to_string(),
        }
    }

    /// Creates a `NoFencedBlock` error.
    #[must_use]
    pub fn no_fenced_block(text: &str) -> Self {
        Self::NoFencedBlock {
            preview: preview(text),
        }
    }
}

fn preview(text: &str) -> String {
    text.chars().take(PREVIEW_CHARS).collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_json_message_includes_reason_and_preview() {
        let source = serde_json::from_str::<serde_json::Value>("{oops").unwrap_err();
        let err = PayloadError::invalid_json("{oops", &source);
        let msg = err.to_string();
        assert!(msg.contains("not JSON"));
        assert!(msg.contains("{oops"));
    }

    #[test]
    fn test_preview_is_truncated() {
        let long = "x".repeat(500);
        let err = PayloadError::no_fenced_block(&long);
        let PayloadError::NoFencedBlock { preview } = err else {
            panic!("expected NoFencedBlock");
        };
        assert_eq!(preview.chars().count(), PREVIEW_CHARS);
    }
}
