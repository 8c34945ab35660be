//! Bounded-concurrency batch scheduling.
//!
//! The scheduler drives many independent fetch operations at once,
//! bounded by a concurrency limit, with a retry loop per operation.
//! Output is index-correlated with the input regardless of completion
//! order, and one member's failure never aborts its siblings.

use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use webgrit_core::{ErrorKind, FetchOutcome, FetchRequest, Transport};

use crate::error::ConfigError;
use crate::retry::{RetryDecision, RetryPolicy};

/// Longest HTTP error body excerpt carried into a failure message.
const ERROR_BODY_EXCERPT: usize = 200;

// ============================================================================
// Single-request retry loop
// ============================================================================

/// Runs one fetch operation to completion, retrying per the request's
/// own policy.
///
/// Backoff sleeps and the transport call itself are the suspension
/// points; both race against the cancellation token, so an in-flight
/// operation resolves promptly as a `Cancelled` failure.
pub async fn fetch_with_retry(
    transport: &dyn Transport,
    request: &FetchRequest,
    cancel: &CancellationToken,
) -> FetchOutcome {
    let policy = RetryPolicy::from_request(request);
    let mut attempt: u32 = 0;

    loop {
        if cancel.is_cancelled() {
            return FetchOutcome::cancelled(attempt);
        }

        let result = tokio::select! {
            biased;
            () = cancel.cancelled() => return FetchOutcome::cancelled(attempt),
            result = transport.request(request) => result,
        };

        let (error, message) = match result {
            Ok(response) if response.is_success() => {
                debug!(url = %request.url, status = response.status, attempt, "Fetch succeeded");
                return FetchOutcome::success(response, attempt + 1);
            }
            Ok(response) => {
                let excerpt: String = response.body.chars().take(ERROR_BODY_EXCERPT).collect();
                let status = response.status;
                (
                    ErrorKind::Http { status },
                    format!("HTTP {status}: {excerpt}"),
                )
            }
            Err(kind) => {
                let message = kind.to_string();
                (kind, message)
            }
        };

        match policy.decide(attempt, &error) {
            RetryDecision::GiveUp => {
                warn!(url = %request.url, error = %error, attempts = attempt + 1, "Fetch failed");
                return FetchOutcome::failure_with_message(error, message, attempt + 1);
            }
            RetryDecision::Retry(delay) => {
                debug!(
                    url = %request.url,
                    error = %error,
                    delay_ms = delay.as_millis() as u64,
                    attempt,
                    "Retrying after backoff"
                );
                tokio::select! {
                    biased;
                    () = cancel.cancelled() => return FetchOutcome::cancelled(attempt + 1),
                    () = tokio::time::sleep(delay) => {}
                }
                attempt += 1;
            }
        }
    }
}

// ============================================================================
// Batch Scheduler
// ============================================================================

/// Drives a batch of fetch requests with bounded concurrency.
pub struct BatchScheduler {
    transport: Arc<dyn Transport>,
}

impl BatchScheduler {
    /// Creates a scheduler over the given transport.
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Runs every request to a terminal outcome.
    ///
    /// Returns exactly one outcome per request, at the request's input
    /// index. At most `concurrency` requests are in flight at any
    /// instant; the rest queue in submission order. A zero limit, or a
    /// retrying request with a zero base delay, is a configuration
    /// error surfaced before any request is admitted.
    ///
    /// Cancelling `cancel` stops admitting queued requests and resolves
    /// in-flight ones as `Cancelled` failures; already-finalized
    /// outcomes are untouched.
    #[instrument(skip_all, fields(requests = requests.len(), concurrency))]
    pub async fn run_batch(
        &self,
        requests: Vec<FetchRequest>,
        concurrency: usize,
        cancel: CancellationToken,
    ) -> Result<Vec<FetchOutcome>, ConfigError> {
        if concurrency == 0 {
            return Err(ConfigError::ZeroConcurrency);
        }
        if let Some(request) = requests
            .iter()
            .find(|r| r.max_retries > 0 && r.retry_base_delay.is_zero())
        {
            return Err(ConfigError::ZeroBaseDelay {
                url: request.url.clone(),
            });
        }

        info!(count = requests.len(), "Starting batch");

        // Tokio's semaphore is FIFO, so queued requests are admitted in
        // submission order as slots free up.
        let slots = Arc::new(Semaphore::new(concurrency));
        let mut handles = Vec::with_capacity(requests.len());

        for request in requests {
            let transport = Arc::clone(&self.transport);
            let slots = Arc::clone(&slots);
            let cancel = cancel.clone();

            handles.push(tokio::spawn(async move {
                let permit = tokio::select! {
                    biased;
                    () = cancel.cancelled() => None,
                    permit = slots.acquire_owned() => permit.ok(),
                };
                let Some(_permit) = permit else {
                    // Never admitted: zero attempts were made.
                    return FetchOutcome::cancelled(0);
                };
                fetch_with_retry(transport.as_ref(), &request, &cancel).await
            }));
        }

        // Awaiting the handles in spawn order keeps outcomes aligned to
        // input indices no matter when each task completes.
        let mut outcomes = Vec::with_capacity(handles.len());
        for handle in handles {
            let outcome = match handle.await {
                Ok(outcome) => outcome,
                Err(join_error) => {
                    warn!(error = %join_error, "Batch worker aborted");
                    FetchOutcome::failure_with_message(
                        ErrorKind::Network(join_error.to_string()),
                        format!("batch worker aborted: {join_error}"),
                        0,
                    )
                }
            };
            outcomes.push(outcome);
        }

        let succeeded = outcomes.iter().filter(|o| o.is_success()).count();
        info!(succeeded, total = outcomes.len(), "Batch complete");

        Ok(outcomes)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;
    use webgrit_core::RawResponse;

    fn ok_response(body: &str) -> RawResponse {
        RawResponse {
            status: 200,
            final_url: "https://example.com".into(),
            headers: vec![],
            body: body.into(),
        }
    }

    fn status_response(status: u16) -> RawResponse {
        RawResponse {
            status,
            final_url: "https://example.com".into(),
            headers: vec![],
            body: format!("status {status}"),
        }
    }

    /// Transport that replays a per-URL script of results, falling back
    /// to 200 OK, and tracks how many requests are in flight.
    struct MockTransport {
        scripts: Mutex<HashMap<String, Vec<Result<RawResponse, ErrorKind>>>>,
        delay: Duration,
        in_flight: AtomicUsize,
        max_in_flight: AtomicUsize,
    }

    impl MockTransport {
        fn new() -> Self {
            Self {
                scripts: Mutex::new(HashMap::new()),
                delay: Duration::ZERO,
                in_flight: AtomicUsize::new(0),
                max_in_flight: AtomicUsize::new(0),
            }
        }

        fn with_delay(mut self, delay: Duration) -> Self {
            self.delay = delay;
            self
        }

        fn script(self, url: &str, results: Vec<Result<RawResponse, ErrorKind>>) -> Self {
            // Scripts replay front-to-back, so store reversed for pop().
            let mut reversed = results;
            reversed.reverse();
            self.scripts.lock().unwrap().insert(url.into(), reversed);
            self
        }

        fn max_seen(&self) -> usize {
            self.max_in_flight.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Transport for MockTransport {
        async fn request(&self, request: &FetchRequest) -> Result<RawResponse, ErrorKind> {
            let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(current, Ordering::SeqCst);

            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }

            let result = self
                .scripts
                .lock()
                .unwrap()
                .get_mut(&request.url)
                .and_then(Vec::pop)
                .unwrap_or_else(|| Ok(ok_response("ok")));

            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            result
        }
    }

    fn quick_request(url: &str) -> FetchRequest {
        FetchRequest::get(url).with_retries(3, Duration::from_millis(1))
    }

    #[tokio::test]
    async fn test_outcomes_are_index_aligned() {
        let transport = MockTransport::new()
            .script("https://a.com", vec![Ok(ok_response("body-a"))])
            .script("https://b.com", vec![Ok(status_response(404))])
            .script("https://c.com", vec![Ok(ok_response("body-c"))]);
        let scheduler = BatchScheduler::new(Arc::new(transport));

        let requests = vec![
            quick_request("https://a.com"),
            quick_request("https://b.com"),
            quick_request("https://c.com"),
        ];
        let outcomes = scheduler
            .run_batch(requests, 2, CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(outcomes.len(), 3);
        assert!(matches!(&outcomes[0], FetchOutcome::Success { body, .. } if body == "body-a"));
        assert_eq!(
            outcomes[1].error_kind(),
            Some(&ErrorKind::Http { status: 404 })
        );
        assert!(matches!(&outcomes[2], FetchOutcome::Success { body, .. } if body == "body-c"));
    }

    #[tokio::test]
    async fn test_transient_failures_retried_to_success() {
        let transport = MockTransport::new().script(
            "https://flaky.com",
            vec![
                Err(ErrorKind::Network("reset".into())),
                Err(ErrorKind::Timeout),
                Ok(ok_response("finally")),
            ],
        );
        let scheduler = BatchScheduler::new(Arc::new(transport));

        let outcomes = scheduler
            .run_batch(
                vec![quick_request("https://flaky.com")],
                1,
                CancellationToken::new(),
            )
            .await
            .unwrap();

        match &outcomes[0] {
            FetchOutcome::Success { body, attempts, .. } => {
                assert_eq!(body, "finally");
                assert_eq!(*attempts, 3);
            }
            other => panic!("expected success, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_exhausted_retries_respect_budget() {
        let transport = MockTransport::new().script(
            "https://down.com",
            vec![
                Err(ErrorKind::Network("reset".into())),
                Err(ErrorKind::Network("reset".into())),
                Err(ErrorKind::Network("reset".into())),
                Err(ErrorKind::Network("reset".into())),
            ],
        );
        let scheduler = BatchScheduler::new(Arc::new(transport));

        let request =
            FetchRequest::get("https://down.com").with_retries(2, Duration::from_millis(1));
        let outcomes = scheduler
            .run_batch(vec![request], 1, CancellationToken::new())
            .await
            .unwrap();

        // max_retries + 1 attempts, never more.
        assert_eq!(outcomes[0].attempts(), 3);
        assert!(matches!(
            outcomes[0].error_kind(),
            Some(ErrorKind::Network(_))
        ));
    }

    #[tokio::test]
    async fn test_permanent_failure_does_not_abort_siblings() {
        let transport =
            MockTransport::new().script("https://gone.com", vec![Ok(status_response(404))]);
        let scheduler = BatchScheduler::new(Arc::new(transport));

        let outcomes = scheduler
            .run_batch(
                vec![
                    quick_request("https://ok1.com"),
                    quick_request("https://gone.com"),
                    quick_request("https://ok2.com"),
                ],
                3,
                CancellationToken::new(),
            )
            .await
            .unwrap();

        assert!(outcomes[0].is_success());
        assert_eq!(outcomes[1].attempts(), 1);
        assert!(outcomes[2].is_success());
    }

    #[tokio::test]
    async fn test_concurrency_is_bounded() {
        let transport = Arc::new(MockTransport::new().with_delay(Duration::from_millis(20)));
        let scheduler = BatchScheduler::new(Arc::clone(&transport) as Arc<dyn Transport>);

        let requests: Vec<_> = (0..8)
            .map(|i| quick_request(&format!("https://host{i}.com")))
            .collect();
        let outcomes = scheduler
            .run_batch(requests, 2, CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(outcomes.len(), 8);
        assert!(outcomes.iter().all(FetchOutcome::is_success));
        assert!(
            transport.max_seen() <= 2,
            "saw {} in flight",
            transport.max_seen()
        );
    }

    #[tokio::test]
    async fn test_zero_concurrency_is_config_error() {
        let scheduler = BatchScheduler::new(Arc::new(MockTransport::new()));
        let result = scheduler
            .run_batch(
                vec![quick_request("https://a.com")],
                0,
                CancellationToken::new(),
            )
            .await;
        assert!(matches!(result, Err(ConfigError::ZeroConcurrency)));
    }

    #[tokio::test]
    async fn test_zero_base_delay_is_config_error() {
        let scheduler = BatchScheduler::new(Arc::new(MockTransport::new()));
        let request = FetchRequest::get("https://a.com").with_retries(2, Duration::ZERO);
        let result = scheduler
            .run_batch(vec![request], 1, CancellationToken::new())
            .await;
        assert!(matches!(result, Err(ConfigError::ZeroBaseDelay { .. })));
    }

    #[tokio::test]
    async fn test_cancellation_resolves_everything() {
        let transport = MockTransport::new().with_delay(Duration::from_secs(30));
        let scheduler = BatchScheduler::new(Arc::new(transport));
        let cancel = CancellationToken::new();

        let requests: Vec<_> = (0..3)
            .map(|i| quick_request(&format!("https://slow{i}.com")))
            .collect();

        let cancel_trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            cancel_trigger.cancel();
        });

        let outcomes = scheduler.run_batch(requests, 1, cancel).await.unwrap();

        assert_eq!(outcomes.len(), 3);
        for outcome in &outcomes {
            assert_eq!(outcome.error_kind(), Some(&ErrorKind::Cancelled));
        }
        // Queued members were never admitted.
        assert_eq!(outcomes[1].attempts(), 0);
        assert_eq!(outcomes[2].attempts(), 0);
    }

    #[tokio::test]
    async fn test_completed_outcomes_survive_cancellation() {
        let transport = MockTransport::new()
            .script("https://fast.com", vec![Ok(ok_response("done"))])
            .with_delay(Duration::ZERO)
            .script(
                "https://slow.com",
                vec![Err(ErrorKind::Network("never used".into()))],
            );

        // Make only the slow request actually slow by scripting a long
        // per-request path: the fast one completes before cancellation.
        struct SplitTransport {
            inner: MockTransport,
        }

        #[async_trait]
        impl Transport for SplitTransport {
            async fn request(&self, request: &FetchRequest) -> Result<RawResponse, ErrorKind> {
                if request.url.contains("slow") {
                    tokio::time::sleep(Duration::from_secs(30)).await;
                }
                self.inner.request(request).await
            }
        }

        let scheduler = BatchScheduler::new(Arc::new(SplitTransport { inner: transport }));
        let cancel = CancellationToken::new();
        let cancel_trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(100)).await;
            cancel_trigger.cancel();
        });

        let outcomes = scheduler
            .run_batch(
                vec![
                    quick_request("https://fast.com"),
                    quick_request("https://slow.com"),
                ],
                2,
                cancel,
            )
            .await
            .unwrap();

        assert!(matches!(&outcomes[0], FetchOutcome::Success { body, .. } if body == "done"));
        assert_eq!(outcomes[1].error_kind(), Some(&ErrorKind::Cancelled));
    }
}
