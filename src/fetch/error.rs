//! Error types for the webhook fetch.

use thiserror::Error;

/// Transport failures while fetching a raw payload.
///
/// These are the only failures the pipeline reports to the user; data-shape
/// problems in a successful response degrade to empty values instead.
#[derive(Debug, Error)]
pub enum FetchError {
    /// No webhook URL was configured anywhere.
    #[error(
        "webhook URL is not configured\n  Suggestion: pass --webhook, set N8N_WEBHOOK_URL or add webhook_url to the config file"
    )]
    MissingWebhook,

    /// The configured webhook is not an absolute http(s) URL.
    #[error("invalid webhook URL '{url}': {reason}")]
    InvalidWebhook { url: String, reason: String },

    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {source}")]
    ClientBuild {
        #[source]
        source: reqwest::Error,
    },

    /// Network-level error (DNS, connection refused, TLS, broken body).
    #[error("network error calling {url}: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Connect or read timeout.
    #[error("timeout calling {url}")]
    Timeout { url: String },

    /// Non-2xx response.
    #[error("HTTP {status} from {url}")]
    HttpStatus {
        url: String,
        status: u16,
        /// The Retry-After header value, if present.
        retry_after: Option<String>,
    },
}

impl FetchError {
    pub fn invalid_webhook(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidWebhook {
            url: url.into(),
            reason: reason.into(),
        }
    }

    pub fn network(url: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Network {
            url: url.into(),
            source,
        }
    }

    pub fn timeout(url: impl Into<String>) -> Self {
        Self::Timeout { url: url.into() }
    }

    /// Maps a reqwest error to [`FetchError::Timeout`] or [`FetchError::Network`].
    pub fn from_reqwest(url: impl Into<String>, source: reqwest::Error) -> Self {
        if source.is_timeout() {
            Self::timeout(url)
        } else {
            Self::network(url, source)
        }
    }

    pub fn http_status(url: impl Into<String>, status: u16, retry_after: Option<String>) -> Self {
        Self::HttpStatus {
            url: url.into(),
            status,
            retry_after,
        }
    }

    /// HTTP status code, for status errors.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}
