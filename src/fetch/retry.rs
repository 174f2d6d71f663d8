//! Retry classification and exponential backoff for webhook calls.
//!
//! A failed call is classified into a [`FailureType`]; the [`RetryPolicy`]
//! then decides whether another attempt is made and after how long.
//!
//! | Failure | Type |
//! |---------|------|
//! | 429 | `RateLimited` |
//! | 500, 502, 503, 504 | `Transient` |
//! | any other status | `Permanent` |
//! | connect/read timeout | `Transient` |
//! | connection refused, reset | `Transient` |
//! | TLS / certificate | `Permanent` |
//! | invalid or missing webhook, client build | `Permanent` |

use std::time::Duration;

use rand::Rng;
use tracing::{debug, instrument, warn};

use super::FetchError;
use super::constants::{
    BACKOFF_BASE_DELAY, BACKOFF_MAX_DELAY, DEFAULT_MAX_RETRIES, MAX_RETRY_AFTER,
    RETRYABLE_STATUSES,
};

/// Default backoff multiplier (doubles each attempt).
const DEFAULT_BACKOFF_MULTIPLIER: f32 = 2.0;

/// Maximum jitter added to delays.
const MAX_JITTER: Duration = Duration::from_millis(200);

/// Classification of a failed call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureType {
    /// May succeed on retry.
    Transient,
    /// Will not succeed on retry.
    Permanent,
    /// HTTP 429; retried, honoring Retry-After.
    RateLimited,
}

/// Decision on whether to retry a failed call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetryDecision {
    Retry {
        delay: Duration,
        /// Number of the next attempt (1-indexed, so the first retry is attempt 2).
        attempt: u32,
    },
    DoNotRetry {
        reason: String,
    },
}

/// Retry settings with exponential backoff.
///
/// ```text
/// delay = min(base_delay * multiplier^(attempt - 1), max_delay) + jitter
/// ```
///
/// With defaults (3 attempts, 0.8 s base) the delays are about 0.8 s and 1.6 s.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Maximum number of attempts, including the first.
    max_attempts: u32,
    base_delay: Duration,
    max_delay: Duration,
    backoff_multiplier: f32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_RETRIES + 1,
            base_delay: BACKOFF_BASE_DELAY,
            max_delay: BACKOFF_MAX_DELAY,
            backoff_multiplier: DEFAULT_BACKOFF_MULTIPLIER,
        }
    }
}

impl RetryPolicy {
    #[must_use]
    pub fn new(
        max_attempts: u32,
        base_delay: Duration,
        max_delay: Duration,
        backoff_multiplier: f32,
    ) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
            max_delay,
            backoff_multiplier,
        }
    }

    /// Policy allowing `max_retries` retries after the first attempt.
    #[must_use]
    pub fn with_max_retries(max_retries: u32) -> Self {
        Self {
            max_attempts: max_retries.saturating_add(1),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Decides whether to retry after `attempt` (1-indexed) failed.
    #[instrument(skip(self), fields(max_attempts = self.max_attempts))]
    pub fn should_retry(&self, failure_type: FailureType, attempt: u32) -> RetryDecision {
        if failure_type == FailureType::Permanent {
            return RetryDecision::DoNotRetry {
                reason: "permanent failure - retry would not help".to_string(),
            };
        }

        if attempt >= self.max_attempts {
            debug!(attempt, max = self.max_attempts, "max attempts reached");
            return RetryDecision::DoNotRetry {
                reason: format!("max attempts ({}) exhausted", self.max_attempts),
            };
        }

        let delay = self.calculate_delay(attempt);
        debug!(
            attempt,
            next_attempt = attempt + 1,
            delay_ms = delay.as_millis(),
            "will retry"
        );

        RetryDecision::Retry {
            delay,
            attempt: attempt + 1,
        }
    }

    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    fn calculate_delay(&self, attempt: u32) -> Duration {
        let base_ms = self.base_delay.as_millis() as f64;
        let multiplier = f64::from(self.backoff_multiplier);
        let exponent = f64::from(attempt.saturating_sub(1));
        let delay_ms = (base_ms * multiplier.powf(exponent)).min(self.max_delay.as_millis() as f64);

        Duration::from_millis(delay_ms as u64) + jitter()
    }
}

#[allow(clippy::cast_possible_truncation)]
fn jitter() -> Duration {
    let mut rng = rand::thread_rng();
    Duration::from_millis(rng.gen_range(0..=MAX_JITTER.as_millis() as u64))
}

/// Classifies a fetch error for retry decisions.
#[must_use]
pub fn classify_error(error: &FetchError) -> FailureType {
    match error {
        FetchError::HttpStatus { status, .. } => classify_http_status(*status),
        FetchError::Timeout { .. } => FailureType::Transient,
        FetchError::Network { source, .. } => {
            if is_tls_error(source) {
                FailureType::Permanent
            } else {
                FailureType::Transient
            }
        }
        FetchError::MissingWebhook
        | FetchError::InvalidWebhook { .. }
        | FetchError::ClientBuild { .. } => FailureType::Permanent,
    }
}

fn classify_http_status(status: u16) -> FailureType {
    match status {
        429 => FailureType::RateLimited,
        status if RETRYABLE_STATUSES.contains(&status) => FailureType::Transient,
        _ => FailureType::Permanent,
    }
}

fn is_tls_error(error: &reqwest::Error) -> bool {
    let message = error.to_string().to_lowercase();
    message.contains("certificate") || message.contains("tls") || message.contains("ssl")
}

/// Parses a Retry-After header value (delta-seconds or HTTP-date).
///
/// Values above one hour are capped; negative values and dates in the past
/// yield `None`.
#[must_use]
pub fn parse_retry_after(header_value: &str) -> Option<Duration> {
    let header_value = header_value.trim();

    if let Ok(seconds) = header_value.parse::<i64>() {
        if seconds < 0 {
            debug!(seconds, "negative Retry-After value, ignoring");
            return None;
        }
        #[allow(clippy::cast_sign_loss)]
        let duration = Duration::from_secs(seconds as u64);
        return Some(cap_retry_after(duration));
    }

    let when = httpdate::parse_http_date(header_value).ok()?;
    match when.duration_since(std::time::SystemTime::now()) {
        Ok(duration) => Some(cap_retry_after(duration)),
        Err(_) => {
            debug!(header_value, "Retry-After date is in the past, ignoring");
            None
        }
    }
}

fn cap_retry_after(duration: Duration) -> Duration {
    if duration > MAX_RETRY_AFTER {
        warn!(
            delay_secs = duration.as_secs(),
            max_secs = MAX_RETRY_AFTER.as_secs(),
            "Retry-After exceeds maximum, capping at 1 hour"
        );
        MAX_RETRY_AFTER
    } else {
        duration
    }
}

/// Retry-After delay carried by a rate-limited or unavailable response.
#[must_use]
pub fn retry_after_delay(error: &FetchError) -> Option<Duration> {
    match error {
        FetchError::HttpStatus {
            retry_after: Some(value),
            ..
        } => parse_retry_after(value),
        _ => None,
    }
}
