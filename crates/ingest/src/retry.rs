use std::fmt::Display;
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{info, warn};

/// Capped exponential back-off for transient failures.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    max_retries: usize,
    initial_backoff: Duration,
    max_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, 1000, 10_000)
    }
}

impl RetryPolicy {
    pub fn new(max_retries: usize, initial_backoff_ms: u64, max_backoff_ms: u64) -> Self {
        Self {
            max_retries,
            initial_backoff: Duration::from_millis(initial_backoff_ms),
            max_backoff: Duration::from_millis(max_backoff_ms),
        }
    }

    /// Pause before retry number `retry` (1-based).
    fn backoff(&self, retry: usize) -> Duration {
        let factor = 2u32.saturating_pow(retry.saturating_sub(1) as u32);
        self.initial_backoff
            .saturating_mul(factor)
            .min(self.max_backoff)
    }

    /// Run `f` until it succeeds, the error is not retryable, or the retries
    /// are used up. Only errors for which `retryable` returns true are retried.
    pub async fn retry<F, Fut, T, E, R>(&self, operation: &str, retryable: R, mut f: F) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Display,
        R: Fn(&E) -> bool,
    {
        let mut retries = 0;

        loop {
            let err = match f().await {
                Ok(value) => {
                    if retries > 0 {
                        info!(operation, attempts = retries + 1, "Operation succeeded after retries");
                    }
                    return Ok(value);
                }
                Err(e) => e,
            };

            if !retryable(&err) {
                warn!(operation, error = %err, "Operation failed with a permanent error");
                return Err(err);
            }
            if retries == self.max_retries {
                warn!(operation, attempts = retries + 1, error = %err, "Operation failed after max retries");
                return Err(err);
            }

            retries += 1;
            let pause = self.backoff(retries);
            warn!(
                operation,
                retry = retries,
                max_retries = self.max_retries,
                backoff_ms = pause.as_millis() as u64,
                error = %err,
                "Operation failed, retrying"
            );
            sleep(pause).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::time::Instant;

    fn always(_: &String) -> bool {
        true
    }

    #[tokio::test(start_paused = true)]
    async fn test_succeeds_after_transient_failures() {
        let calls = AtomicUsize::new(0);
        let policy = RetryPolicy::new(3, 100, 1000);

        let result: Result<&str, String> = policy
            .retry("flaky", always, || async {
                if calls.fetch_add(1, Ordering::SeqCst) < 2 {
                    Err("boom".to_string())
                } else {
                    Ok("done")
                }
            })
            .await;

        assert_eq!(result, Ok("done"));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_gives_up_after_max_retries_with_capped_backoff() {
        let calls = AtomicUsize::new(0);
        let policy = RetryPolicy::new(3, 100, 250);
        let start = Instant::now();

        let result: Result<(), String> = policy
            .retry("always_fails", always, || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Err("boom".to_string())
            })
            .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 4);
        // 100 + 200 + 250 (capped)
        assert_eq!(start.elapsed(), Duration::from_millis(550));
    }

    #[tokio::test(start_paused = true)]
    async fn test_permanent_error_is_not_retried() {
        let calls = AtomicUsize::new(0);
        let policy = RetryPolicy::default();
        let start = Instant::now();

        let result: Result<(), String> = policy
            .retry("not_found", |e: &String| e != "404", || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Err("404".to_string())
            })
            .await;

        assert_eq!(result, Err("404".to_string()));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(start.elapsed(), Duration::ZERO);
    }
}
