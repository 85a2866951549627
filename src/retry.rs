//! The bounded exponential backoff policy shared by the transport and the token endpoint.

use std::time::Duration;

use rand::Rng;

use crate::error::Error;

const DEFAULT_MAX_RETRIES: u32 = 3;
const DEFAULT_BASE_DELAY: Duration = Duration::from_millis(500);
const DEFAULT_MAX_DELAY: Duration = Duration::from_secs(8);
const BACKOFF_MULTIPLIER: u32 = 2;

/// Decides whether a failed request is sent again and how long to wait before doing so.
///
/// A request is attempted at most `max_retries + 1` times. Only [retryable](Error::is_retryable) errors are retried:
/// connection failures, rate limiting and server errors. The delay before retry number `attempt` (counting from zero)
/// is `min(base_delay * 2^attempt, max_delay)`, multiplied by a random factor between 0.5 and 1.0 when `jitter` is
/// enabled. A rate limit response's `Retry-After` value replaces the computed delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
    pub jitter: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            base_delay: DEFAULT_BASE_DELAY,
            max_delay: DEFAULT_MAX_DELAY,
            jitter: true,
        }
    }
}

impl RetryPolicy {
    /// A policy that never retries.
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            ..Default::default()
        }
    }

    pub fn max_retries(self, max_retries: u32) -> Self {
        Self { max_retries, ..self }
    }

    pub fn base_delay(self, base_delay: Duration) -> Self {
        Self { base_delay, ..self }
    }

    pub fn max_delay(self, max_delay: Duration) -> Self {
        Self { max_delay, ..self }
    }

    pub fn jitter(self, jitter: bool) -> Self {
        Self { jitter, ..self }
    }

    /// The computed backoff before retry number `attempt`, ignoring any `Retry-After` value.
    pub fn backoff(&self, attempt: u32) -> Duration {
        let multiplier = BACKOFF_MULTIPLIER.saturating_pow(attempt);
        let delay = self.base_delay.saturating_mul(multiplier).min(self.max_delay);

        if self.jitter {
            delay.mul_f64(rand::thread_rng().gen_range(0.5..=1.0))
        } else {
            delay
        }
    }

    /// Returns how long to wait before retrying a request that failed with `err` on attempt number `attempt`
    /// (counting from zero), or `None` if the request shouldn't be retried.
    pub fn next_delay(&self, attempt: u32, err: &Error) -> Option<Duration> {
        if attempt >= self.max_retries || !err.is_retryable() {
            return None;
        }

        match err.retry_after() {
            Some(retry_after) => Some(Duration::from_secs(retry_after)),
            None => Some(self.backoff(attempt)),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use reqwest::StatusCode;

    use super::RetryPolicy;
    use crate::error::{ApiErrorDetail, Error};

    fn error(status: StatusCode, retry_after: Option<u64>) -> Error {
        Error::from_status(status, ApiErrorDetail::new("error"), retry_after)
    }

    #[test]
    fn default_policy() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_retries, 3);
        assert_eq!(policy.base_delay, Duration::from_millis(500));
        assert_eq!(policy.max_delay, Duration::from_secs(8));
        assert!(policy.jitter);
    }

    #[test]
    fn backoff_doubles_until_capped() {
        let policy = RetryPolicy::default().jitter(false);
        assert_eq!(policy.backoff(0), Duration::from_millis(500));
        assert_eq!(policy.backoff(1), Duration::from_secs(1));
        assert_eq!(policy.backoff(2), Duration::from_secs(2));
        assert_eq!(policy.backoff(4), Duration::from_secs(8));
        assert_eq!(policy.backoff(10), Duration::from_secs(8));
        assert_eq!(policy.backoff(u32::MAX), Duration::from_secs(8));
    }

    #[test]
    fn jitter_stays_within_bounds() {
        let policy = RetryPolicy::default();

        for attempt in 0..6 {
            let cap = RetryPolicy::default().jitter(false).backoff(attempt);

            for _ in 0..50 {
                let delay = policy.backoff(attempt);
                assert!(delay <= cap, "{delay:?} > {cap:?}");
                assert!(delay >= cap / 2, "{delay:?} < {:?}", cap / 2);
            }
        }
    }

    #[test]
    fn retry_after_replaces_backoff() {
        let policy = RetryPolicy::default().jitter(false);
        let err = error(StatusCode::TOO_MANY_REQUESTS, Some(2));

        assert_eq!(policy.next_delay(0, &err), Some(Duration::from_secs(2)));
        assert_eq!(policy.next_delay(2, &err), Some(Duration::from_secs(2)));
    }

    #[test]
    fn rate_limit_without_retry_after_uses_backoff() {
        let policy = RetryPolicy::default().jitter(false);
        let err = error(StatusCode::TOO_MANY_REQUESTS, None);

        assert_eq!(policy.next_delay(1, &err), Some(Duration::from_secs(1)));
    }

    #[test]
    fn retries_stop_when_exhausted() {
        let policy = RetryPolicy::default().max_retries(2).jitter(false);
        let err = error(StatusCode::SERVICE_UNAVAILABLE, None);

        assert!(policy.next_delay(0, &err).is_some());
        assert!(policy.next_delay(1, &err).is_some());
        assert_eq!(policy.next_delay(2, &err), None);
        assert_eq!(RetryPolicy::none().next_delay(0, &err), None);
    }

    #[test]
    fn client_errors_are_not_retried() {
        let policy = RetryPolicy::default();

        for status in [
            StatusCode::BAD_REQUEST,
            StatusCode::UNAUTHORIZED,
            StatusCode::FORBIDDEN,
            StatusCode::NOT_FOUND,
        ] {
            assert_eq!(policy.next_delay(0, &error(status, None)), None);
        }
    }
}
