//! Retry policy with exponential backoff for ticket polls.
//!
//! - Max retries: 2 (3 total attempts) by default
//! - Initial delay: 500ms, doubling per retry, capped at 8s
//! - Jitter: down-jitter up to 25% (multiplier in [0.75, 1.0])
//! - Retryable: HTTP 408, 409, 429, 5xx and connect/timeout failures
//! - `Retry-After` / `Retry-After-Ms` win over backoff when in (0, 60s)

use std::time::Duration;

use reqwest::{RequestBuilder, Response, StatusCode, header::HeaderMap};

#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Retries after the first attempt.
    pub max_retries: u32,
    pub initial_delay: Duration,
    pub max_delay: Duration,
    /// Down-jitter fraction (0.25 = up to 25% shorter).
    pub jitter_factor: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 2,
            initial_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(8),
            jitter_factor: 0.25,
        }
    }
}

impl RetryPolicy {
    #[must_use]
    pub fn with_max_retries(max_retries: u32) -> Self {
        Self {
            max_retries,
            ..Self::default()
        }
    }
}

/// Parse `Retry-After-Ms` (float milliseconds) or `Retry-After` (integer seconds).
#[must_use]
pub fn parse_retry_after(headers: &HeaderMap) -> Option<Duration> {
    const MAX_RETRY_AFTER: Duration = Duration::from_secs(60);
    let in_range = |d: Duration| d > Duration::ZERO && d < MAX_RETRY_AFTER;

    // Range-check the raw float first: `from_secs_f64` panics on overflow.
    let from_ms = headers
        .get("retry-after-ms")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.trim().parse::<f64>().ok())
        .filter(|ms| {
            ms.is_finite() && *ms > 0.0 && *ms < MAX_RETRY_AFTER.as_secs_f64() * 1000.0
        })
        .map(|ms| Duration::from_secs_f64(ms / 1000.0))
        .filter(|d| in_range(*d));
    if from_ms.is_some() {
        return from_ms;
    }

    headers
        .get("retry-after")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.trim().parse::<u64>().ok())
        .map(Duration::from_secs)
        .filter(|d| in_range(*d))
}

#[must_use]
pub fn is_retryable_status(status: StatusCode) -> bool {
    matches!(status.as_u16(), 408 | 409 | 429 | 500..=599)
}

fn is_retryable_error(error: &reqwest::Error) -> bool {
    error.is_connect() || error.is_timeout()
}

/// Delay before retry number `backoff_step + 1`.
#[must_use]
pub fn backoff_delay(backoff_step: u32, policy: &RetryPolicy, headers: Option<&HeaderMap>) -> Duration {
    if let Some(delay) = headers.and_then(parse_retry_after) {
        return delay;
    }

    let base = policy.initial_delay.as_secs_f64() * 2.0_f64.powi(backoff_step as i32);
    let capped = base.min(policy.max_delay.as_secs_f64());
    let jitter = 1.0 - rand::random::<f64>() * policy.jitter_factor;
    Duration::from_secs_f64(capped * jitter)
}

/// Send the request built by `build_request`, retrying transient failures.
///
/// Returns the last response even when its status is an error; the caller
/// decides what a non-success status means. Transport errors surface as `Err`
/// once retries are exhausted or the error is not retryable.
pub async fn send_with_retry<F>(build_request: F, policy: &RetryPolicy) -> Result<Response, reqwest::Error>
where
    F: Fn() -> RequestBuilder,
{
    let mut attempt = 0;
    loop {
        let can_retry = attempt < policy.max_retries;
        match build_request().send().await {
            Ok(response) => {
                let status = response.status();
                if status.is_success() || !can_retry || !is_retryable_status(status) {
                    return Ok(response);
                }
                let delay = backoff_delay(attempt, policy, Some(response.headers()));
                tracing::warn!(
                    status = %status,
                    attempt = attempt + 1,
                    delay_ms = delay.as_millis(),
                    "Retrying ticket poll after error status"
                );
                tokio::time::sleep(delay).await;
            }
            Err(e) => {
                if !can_retry || !is_retryable_error(&e) {
                    return Err(e);
                }
                let delay = backoff_delay(attempt, policy, None);
                tracing::warn!(
                    error = %e,
                    attempt = attempt + 1,
                    delay_ms = delay.as_millis(),
                    "Retrying ticket poll after connection error"
                );
                tokio::time::sleep(delay).await;
            }
        }
        attempt += 1;
    }
}
