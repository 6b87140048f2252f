//! Bounded retry with exponential backoff for calls to external services.

use std::future::Future;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{Error, Result, TRACING_TARGET_RETRY};

/// Configuration for retry behavior on failed operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of retry attempts (0 means no retries).
    pub max_attempts: u32,
    /// Initial backoff duration.
    pub initial_backoff: Duration,
    /// Maximum backoff duration.
    pub max_backoff: Duration,
    /// Backoff multiplier for exponential backoff.
    pub backoff_multiplier: f64,
    /// Upper bound for a single attempt, if any.
    pub attempt_timeout: Option<Duration>,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff: Duration::from_millis(500),
            max_backoff: Duration::from_secs(8),
            backoff_multiplier: 2.0,
            attempt_timeout: Some(Duration::from_secs(120)),
        }
    }
}

impl RetryConfig {
    /// Create a new retry configuration.
    pub fn new(max_attempts: u32, initial_backoff: Duration) -> Self {
        Self {
            max_attempts,
            initial_backoff,
            ..Self::default()
        }
    }

    /// Create a configuration with no retries and no timeout.
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 0,
            initial_backoff: Duration::ZERO,
            max_backoff: Duration::ZERO,
            backoff_multiplier: 1.0,
            attempt_timeout: None,
        }
    }

    /// Set the maximum backoff duration.
    pub fn with_max_backoff(mut self, max_backoff: Duration) -> Self {
        self.max_backoff = max_backoff;
        self
    }

    /// Set the backoff multiplier.
    pub fn with_multiplier(mut self, multiplier: f64) -> Self {
        self.backoff_multiplier = multiplier;
        self
    }

    /// Set the per-attempt timeout.
    pub fn with_attempt_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.attempt_timeout = timeout;
        self
    }

    /// Calculate the backoff duration for a given attempt number.
    pub fn calculate_backoff(&self, attempt: u32) -> Duration {
        let backoff_millis = (self.initial_backoff.as_millis() as f64)
            * self.backoff_multiplier.powi(attempt as i32);
        let backoff = Duration::from_millis(backoff_millis as u64);
        backoff.min(self.max_backoff)
    }

    /// Retry an async operation according to this configuration.
    ///
    /// Each attempt is bounded by [`attempt_timeout`](Self::attempt_timeout);
    /// an elapsed attempt counts as a [`Timeout`](crate::ErrorKind::Timeout)
    /// failure and is retried like any other transient error. Errors that are
    /// not retryable are returned immediately.
    ///
    /// # Example
    /// ```ignore
    /// let config = RetryConfig::default();
    /// let vectors = config
    ///     .retry("embed_texts", || provider.embed_texts(&batch))
    ///     .await?;
    /// ```
    pub async fn retry<F, Fut, T>(&self, operation: &str, mut f: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut attempt = 0;

        loop {
            let outcome = match self.attempt_timeout {
                Some(limit) => match tokio::time::timeout(limit, f()).await {
                    Ok(outcome) => outcome,
                    Err(_) => Err(Error::timeout().with_message(format!(
                        "{operation} did not complete within {}s",
                        limit.as_secs_f64()
                    ))),
                },
                None => f().await,
            };

            let err = match outcome {
                Ok(value) => return Ok(value),
                Err(err) => err,
            };

            if !err.is_retryable() {
                tracing::debug!(
                    target: TRACING_TARGET_RETRY,
                    operation,
                    error = %err,
                    "Non-retryable error, failing immediately"
                );
                return Err(err);
            }

            if attempt >= self.max_attempts {
                tracing::warn!(
                    target: TRACING_TARGET_RETRY,
                    operation,
                    attempts = attempt + 1,
                    error = %err,
                    "Retry attempts exhausted"
                );
                return Err(err);
            }

            let backoff = self
                .calculate_backoff(attempt)
                .max(err.kind().retry_delay().unwrap_or_default())
                .min(self.max_backoff);

            tracing::debug!(
                target: TRACING_TARGET_RETRY,
                operation,
                attempt = attempt + 1,
                max_attempts = self.max_attempts,
                backoff_ms = backoff.as_millis() as u64,
                error = %err,
                "Retrying operation after backoff"
            );

            tokio::time::sleep(backoff).await;
            attempt += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;
    use crate::ErrorKind;

    #[test]
    fn backoff_grows_and_is_capped() {
        let config = RetryConfig::new(5, Duration::from_millis(100))
            .with_multiplier(2.0)
            .with_max_backoff(Duration::from_millis(350));

        assert_eq!(config.calculate_backoff(0), Duration::from_millis(100));
        assert_eq!(config.calculate_backoff(1), Duration::from_millis(200));
        assert_eq!(config.calculate_backoff(2), Duration::from_millis(350));
        assert_eq!(config.calculate_backoff(6), Duration::from_millis(350));
    }

    #[tokio::test(start_paused = true)]
    async fn retries_transient_errors_until_success() {
        let calls = Arc::new(AtomicU32::new(0));
        let config = RetryConfig::new(3, Duration::from_millis(10));

        let counter = calls.clone();
        let value = config
            .retry("flaky", || {
                let counter = counter.clone();
                async move {
                    if counter.fetch_add(1, Ordering::SeqCst) < 2 {
                        Err(Error::rate_limited())
                    } else {
                        Ok(42)
                    }
                }
            })
            .await
            .unwrap();

        assert_eq!(value, 42);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn stops_on_non_retryable_error() {
        let calls = Arc::new(AtomicU32::new(0));
        let config = RetryConfig::default();

        let counter = calls.clone();
        let err = config
            .retry("auth", || {
                let counter = counter.clone();
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Err::<(), _>(Error::authentication().with_message("invalid api key"))
                }
            })
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Authentication);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn gives_up_after_max_attempts() {
        let calls = Arc::new(AtomicU32::new(0));
        let config = RetryConfig::new(2, Duration::from_millis(10));

        let counter = calls.clone();
        let err = config
            .retry("down", || {
                let counter = counter.clone();
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Err::<(), _>(Error::service_unavailable())
                }
            })
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::ServiceUnavailable);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn slow_attempt_times_out() {
        let config = RetryConfig::no_retry().with_attempt_timeout(Some(Duration::from_secs(1)));

        let err = config
            .retry("slow", || async {
                tokio::time::sleep(Duration::from_secs(60)).await;
                Ok(())
            })
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Timeout);
    }
}
