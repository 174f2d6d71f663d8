//! Constants for the webhook fetch (timeouts, retry backoff).

use std::time::Duration;

/// Default HTTP connect timeout (5 seconds).
pub const CONNECT_TIMEOUT_SECS: u64 = 5;

/// Default HTTP read timeout (2 minutes; the workflow behind the webhook is slow).
pub const READ_TIMEOUT_SECS: u64 = 120;

/// Default number of retries after the first attempt.
pub const DEFAULT_MAX_RETRIES: u32 = 2;

/// Base delay before the first retry.
pub const BACKOFF_BASE_DELAY: Duration = Duration::from_millis(800);

/// Upper bound for a computed backoff delay.
pub const BACKOFF_MAX_DELAY: Duration = Duration::from_secs(30);

/// Maximum Retry-After header value (1 hour).
pub const MAX_RETRY_AFTER: Duration = Duration::from_secs(3600);

/// Statuses that are retried.
pub const RETRYABLE_STATUSES: [u16; 5] = [429, 500, 502, 503, 504];

/// User-Agent sent with every webhook request.
pub const USER_AGENT: &str = concat!("promo-planner/", env!("CARGO_PKG_VERSION"));

/// Environment variable consulted for the webhook URL.
pub const WEBHOOK_ENV_VAR: &str = "N8N_WEBHOOK_URL";
