//! Retry decisions for failing fetch operations.

use std::time::Duration;

use webgrit_core::{ErrorKind, FetchRequest};

/// Upper bound on a single backoff delay.
const DEFAULT_MAX_DELAY: Duration = Duration::from_secs(60);

/// What to do after a failed attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Wait for the given delay, then try again.
    Retry(Duration),
    /// Stop and surface the failure.
    GiveUp,
}

/// Pure retry/backoff policy.
///
/// Side-effect free; one value can serve many concurrent fetch
/// operations. Delays follow `base_delay * 2^attempt` with attempt
/// starting at 0, capped at `max_delay` (the cap keeps the sequence
/// monotone).
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Maximum retries; attempts never exceed `max_retries + 1`.
    pub max_retries: u32,
    /// Backoff base delay.
    pub base_delay: Duration,
    /// Cap on any single delay.
    pub max_delay: Duration,
}

impl RetryPolicy {
    /// Creates a policy with the default delay cap.
    pub fn new(max_retries: u32, base_delay: Duration) -> Self {
        Self {
            max_retries,
            base_delay,
            max_delay: DEFAULT_MAX_DELAY,
        }
    }

    /// Creates a policy from a request's retry configuration.
    pub fn from_request(request: &FetchRequest) -> Self {
        Self::new(request.max_retries, request.retry_base_delay)
    }

    /// A policy that never retries.
    pub fn no_retry() -> Self {
        Self::new(0, Duration::ZERO)
    }

    /// Sets the delay cap.
    pub fn with_max_delay(mut self, max_delay: Duration) -> Self {
        self.max_delay = max_delay;
        self
    }

    /// Decides whether to retry after the given failed attempt.
    ///
    /// `attempt` counts from 0 for the first attempt. Only transient
    /// error kinds are retried, and never once `attempt >= max_retries`.
    pub fn decide(&self, attempt: u32, error: &ErrorKind) -> RetryDecision {
        if attempt >= self.max_retries {
            return RetryDecision::GiveUp;
        }
        if !error.is_transient() {
            return RetryDecision::GiveUp;
        }
        RetryDecision::Retry(self.delay_for_attempt(attempt))
    }

    /// Backoff delay after the attempt with the given index.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let factor = 2u32.checked_pow(attempt).unwrap_or(u32::MAX);
        self.base_delay.saturating_mul(factor).min(self.max_delay)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(
            webgrit_core::models::DEFAULT_MAX_RETRIES,
            webgrit_core::models::DEFAULT_RETRY_BASE_DELAY,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backoff_sequence_doubles() {
        let policy = RetryPolicy::new(10, Duration::from_millis(100));

        assert_eq!(policy.delay_for_attempt(0), Duration::from_millis(100));
        assert_eq!(policy.delay_for_attempt(1), Duration::from_millis(200));
        assert_eq!(policy.delay_for_attempt(2), Duration::from_millis(400));
        assert_eq!(policy.delay_for_attempt(3), Duration::from_millis(800));
    }

    #[test]
    fn test_delay_capped() {
        let policy = RetryPolicy::new(20, Duration::from_secs(10));
        assert_eq!(policy.delay_for_attempt(5), Duration::from_secs(60));
    }

    #[test]
    fn test_transient_errors_retried() {
        let policy = RetryPolicy::new(3, Duration::from_secs(1));

        for kind in [
            ErrorKind::Ssl("handshake".into()),
            ErrorKind::Timeout,
            ErrorKind::Network("reset".into()),
            ErrorKind::Http { status: 502 },
            ErrorKind::Http { status: 429 },
        ] {
            assert_eq!(
                policy.decide(0, &kind),
                RetryDecision::Retry(Duration::from_secs(1)),
                "{kind:?} should retry"
            );
        }
    }

    #[test]
    fn test_permanent_errors_give_up_immediately() {
        let policy = RetryPolicy::new(3, Duration::from_secs(1));

        for kind in [
            ErrorKind::Http { status: 404 },
            ErrorKind::Http { status: 401 },
            ErrorKind::Parse("bad body".into()),
            ErrorKind::Cancelled,
            ErrorKind::NotFound("session".into()),
        ] {
            assert_eq!(policy.decide(0, &kind), RetryDecision::GiveUp, "{kind:?}");
        }
    }

    #[test]
    fn test_gives_up_at_budget_regardless_of_kind() {
        let policy = RetryPolicy::new(2, Duration::from_secs(1));
        let kind = ErrorKind::Timeout;

        assert!(matches!(policy.decide(0, &kind), RetryDecision::Retry(_)));
        assert!(matches!(policy.decide(1, &kind), RetryDecision::Retry(_)));
        assert_eq!(policy.decide(2, &kind), RetryDecision::GiveUp);
        assert_eq!(policy.decide(7, &kind), RetryDecision::GiveUp);
    }

    #[test]
    fn test_no_retry_policy() {
        let policy = RetryPolicy::no_retry();
        assert_eq!(policy.decide(0, &ErrorKind::Timeout), RetryDecision::GiveUp);
    }
}
