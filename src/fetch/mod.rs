//! Fetching raw payloads from the promotion webhook.
//!
//! [`WebhookClient`] POSTs a month request to the configured webhook and
//! hands back whatever came back as a [`RawPayload`](crate::payload::RawPayload).
//! Transport failures are the only errors in the pipeline; they are retried
//! according to [`RetryPolicy`] and then surfaced as [`FetchError`].

mod client;
pub mod constants;
mod error;
mod retry;

pub use client::{WebhookClient, WebhookRequest};
pub use constants::{DEFAULT_MAX_RETRIES, WEBHOOK_ENV_VAR};
pub use error::FetchError;
pub use retry::{
    FailureType, RetryDecision, RetryPolicy, classify_error, parse_retry_after, retry_after_delay,
};
