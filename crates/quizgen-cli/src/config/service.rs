//! Timeouts and retries for provider calls.

use std::time::Duration;

use clap::Args;
use quizgen_core::RetryConfig;

use crate::TRACING_TARGET_CONFIG;

/// Resilience settings shared by every provider call.
#[derive(Debug, Clone, Args)]
pub struct ServiceConfig {
    /// Upper bound for a single provider call, in seconds.
    #[arg(long, env = "QUIZGEN_REQUEST_TIMEOUT", default_value = "120")]
    pub request_timeout_secs: u64,

    /// Retries after a transient failure (rate limit, timeout, outage).
    #[arg(long, env = "QUIZGEN_MAX_RETRIES", default_value = "3")]
    pub max_retries: u32,

    /// Delay before the first retry, in milliseconds; doubles each time.
    #[arg(long, env = "QUIZGEN_RETRY_BACKOFF_MS", default_value = "500")]
    pub retry_backoff_ms: u64,

    /// Longest delay between retries, in milliseconds.
    #[arg(long, env = "QUIZGEN_RETRY_MAX_BACKOFF_MS", default_value = "8000")]
    pub retry_max_backoff_ms: u64,
}

impl ServiceConfig {
    /// Rejects settings that would never let a call finish.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.request_timeout_secs == 0 {
            anyhow::bail!("request timeout must be at least one second");
        }
        if self.retry_max_backoff_ms < self.retry_backoff_ms {
            anyhow::bail!(
                "max retry backoff ({}ms) is shorter than the initial backoff ({}ms)",
                self.retry_max_backoff_ms,
                self.retry_backoff_ms
            );
        }
        Ok(())
    }

    /// Builds the retry policy.
    pub fn retry_config(&self) -> RetryConfig {
        RetryConfig::new(self.max_retries, Duration::from_millis(self.retry_backoff_ms))
            .with_max_backoff(Duration::from_millis(self.retry_max_backoff_ms))
            .with_attempt_timeout(Some(Duration::from_secs(self.request_timeout_secs)))
    }

    /// Logs the retry policy.
    pub fn log(&self) {
        tracing::info!(
            target: TRACING_TARGET_CONFIG,
            request_timeout_secs = self.request_timeout_secs,
            max_retries = self.max_retries,
            retry_backoff_ms = self.retry_backoff_ms,
            retry_max_backoff_ms = self.retry_max_backoff_ms,
            "Service configuration"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ServiceConfig {
        ServiceConfig {
            request_timeout_secs: 120,
            max_retries: 3,
            retry_backoff_ms: 500,
            retry_max_backoff_ms: 8000,
        }
    }

    #[test]
    fn defaults_match_retry_defaults() {
        assert_eq!(config().retry_config(), RetryConfig::default());
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let config = ServiceConfig {
            request_timeout_secs: 0,
            ..config()
        };
        assert!(config.validate().is_err());
    }
}
