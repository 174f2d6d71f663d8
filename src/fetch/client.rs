//! Webhook client that requests a month's promotion payload.

use std::time::Duration;

use reqwest::Client;
use reqwest::header::RETRY_AFTER;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, instrument, warn};
use url::Url;

use super::FetchError;
use super::constants::{CONNECT_TIMEOUT_SECS, READ_TIMEOUT_SECS, USER_AGENT};
use super::retry::{RetryDecision, RetryPolicy, classify_error, retry_after_delay};
use crate::payload::RawPayload;

/// JSON body posted to the webhook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WebhookRequest {
    pub content: String,
    pub month: String,
    pub year: String,
    pub chat_history: Vec<Value>,
}

impl WebhookRequest {
    /// Request for a `YYYY-MM` target.
    #[must_use]
    pub fn for_month(target_ym: &str) -> Self {
        let year = target_ym.split('-').next().unwrap_or_default();
        Self {
            content: format!("{target_ym} 프로모션 추천"),
            month: target_ym.to_string(),
            year: year.to_string(),
            chat_history: Vec::new(),
        }
    }
}

/// HTTP client for the promotion webhook, with retry on transient failures.
#[derive(Debug, Clone)]
pub struct WebhookClient {
    client: Client,
    webhook: Url,
    retry_policy: RetryPolicy,
}

impl WebhookClient {
    /// Builds a client with default timeouts and retry policy.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::InvalidWebhook`] for anything but an absolute
    /// http(s) URL, or [`FetchError::ClientBuild`].
    pub fn new(webhook: &str) -> Result<Self, FetchError> {
        Self::with_settings(
            webhook,
            Duration::from_secs(CONNECT_TIMEOUT_SECS),
            Duration::from_secs(READ_TIMEOUT_SECS),
            RetryPolicy::default(),
        )
    }

    /// Builds a client with explicit timeouts and retry policy.
    ///
    /// # Errors
    ///
    /// Same as [`WebhookClient::new`].
    pub fn with_settings(
        webhook: &str,
        connect_timeout: Duration,
        read_timeout: Duration,
        retry_policy: RetryPolicy,
    ) -> Result<Self, FetchError> {
        let webhook = parse_webhook(webhook)?;
        let client = Client::builder()
            .connect_timeout(connect_timeout)
            .timeout(read_timeout)
            .gzip(true)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|source| FetchError::ClientBuild { source })?;

        debug!(
            webhook = %webhook,
            connect_timeout_ms = connect_timeout.as_millis(),
            read_timeout_ms = read_timeout.as_millis(),
            max_attempts = retry_policy.max_attempts(),
            "created webhook client"
        );

        Ok(Self {
            client,
            webhook,
            retry_policy,
        })
    }

    #[must_use]
    pub fn webhook(&self) -> &Url {
        &self.webhook
    }

    #[must_use]
    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry_policy
    }

    /// Fetches the raw payload for `target_ym`, retrying transient failures.
    ///
    /// A Retry-After header on a retryable response replaces the computed
    /// backoff delay.
    ///
    /// # Errors
    ///
    /// Returns the last [`FetchError`] once retries are exhausted, or the
    /// first permanent one.
    #[instrument(skip(self), fields(webhook = %self.webhook))]
    pub async fn fetch(&self, target_ym: &str) -> Result<RawPayload, FetchError> {
        let request = WebhookRequest::for_month(target_ym);
        let mut attempt = 0u32;

        loop {
            attempt += 1;
            debug!(attempt, "calling webhook");

            match self.send_once(&request).await {
                Ok(payload) => {
                    info!(attempt, shape = payload.shape(), "webhook answered");
                    return Ok(payload);
                }
                Err(error) => {
                    let failure_type = classify_error(&error);
                    match self.retry_policy.should_retry(failure_type, attempt) {
                        RetryDecision::Retry {
                            delay: backoff_delay,
                            attempt: next_attempt,
                        } => {
                            let retry_after = retry_after_delay(&error);
                            let delay = retry_after.unwrap_or(backoff_delay);
                            warn!(
                                attempt = next_attempt,
                                max_attempts = self.retry_policy.max_attempts(),
                                delay_ms = delay.as_millis(),
                                using_retry_after = retry_after.is_some(),
                                error = %error,
                                "retrying webhook call"
                            );
                            tokio::time::sleep(delay).await;
                        }
                        RetryDecision::DoNotRetry { reason } => {
                            debug!(%reason, "not retrying webhook call");
                            return Err(error);
                        }
                    }
                }
            }
        }
    }

    async fn send_once(&self, request: &WebhookRequest) -> Result<RawPayload, FetchError> {
        let url = self.webhook.as_str();
        let response = self
            .client
            .post(self.webhook.clone())
            .json(request)
            .send()
            .await
            .map_err(|source| FetchError::from_reqwest(url, source))?;

        let status = response.status();
        if !status.is_success() {
            let retry_after = response
                .headers()
                .get(RETRY_AFTER)
                .and_then(|value| value.to_str().ok())
                .map(str::to_string);
            return Err(FetchError::http_status(url, status.as_u16(), retry_after));
        }

        let body = response
            .text()
            .await
            .map_err(|source| FetchError::from_reqwest(url, source))?;
        Ok(decode_body(body))
    }
}

/// Response body as JSON when it parses, otherwise as text.
fn decode_body(body: String) -> RawPayload {
    match serde_json::from_str::<Value>(&body) {
        Ok(value) => RawPayload::from(value),
        Err(_) => RawPayload::Text(body),
    }
}

fn parse_webhook(webhook: &str) -> Result<Url, FetchError> {
    let trimmed = webhook.trim();
    if trimmed.is_empty() {
        return Err(FetchError::MissingWebhook);
    }
    let url =
        Url::parse(trimmed).map_err(|err| FetchError::invalid_webhook(trimmed, err.to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(FetchError::invalid_webhook(
            trimmed,
            format!("scheme must be http or https, got '{other}'"),
        )),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_body_shape() {
        let body = serde_json::to_value(WebhookRequest::for_month("2025-12")).unwrap();
        assert_eq!(
            body,
            json!({
                "content": "2025-12 프로모션 추천",
                "month": "2025-12",
                "year": "2025",
                "chat_history": []
            })
        );
    }

    #[test]
    fn test_parse_webhook_rejects_bad_urls() {
        assert!(matches!(parse_webhook("  "), Err(FetchError::MissingWebhook)));
        assert!(matches!(
            parse_webhook("not a url"),
            Err(FetchError::InvalidWebhook { .. })
        ));
        assert!(matches!(
            parse_webhook("ftp://hooks.example/x"),
            Err(FetchError::InvalidWebhook { .. })
        ));
        assert!(parse_webhook("https://hooks.example/webhook/promo").is_ok());
    }

    #[test]
    fn test_decode_body_json_or_text() {
        assert!(matches!(decode_body(r#"{"reply":"hi"}"#.to_string()), RawPayload::Mapping(_)));
        assert!(matches!(decode_body("[1,2]".to_string()), RawPayload::Sequence(_)));
        match decode_body("```json\n{}\n```".to_string()) {
            RawPayload::Text(text) => assert!(text.starts_with("```")),
            other => panic!("expected text, got {}", other.shape()),
        }
    }

    #[test]
    fn test_client_defaults() {
        let client = WebhookClient::new("http://127.0.0.1:9/hook").unwrap();
        assert_eq!(client.retry_policy().max_attempts(), 3);
        assert_eq!(client.webhook().path(), "/hook");
    }
}
