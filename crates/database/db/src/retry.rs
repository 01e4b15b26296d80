//! Retry mechanism for persistence operations.

use std::{fmt::Debug, future::Future, time::Duration};

use metrics::{Counter, Histogram};
use metrics_derive::Metrics;

/// A trait for errors that can indicate whether an operation can be retried.
pub trait CanRetry {
    /// Returns true if the implementer can be retried.
    fn can_retry(&self) -> bool;
}

/// The error returned by the [`PersistenceRetryer`].
#[derive(Debug, thiserror::Error)]
pub enum RetryError<E> {
    /// The overall timeout elapsed before the operation succeeded.
    #[error("operation timed out after {0:?}")]
    TimedOut(Duration),
    /// The operation failed with a non-retryable error or exhausted its retries.
    #[error("operation failed after {attempts} attempt(s): {source}")]
    Failed {
        /// The number of attempts made.
        attempts: usize,
        /// The last error returned by the operation.
        source: E,
    },
}

/// Configuration for the [`PersistenceRetryer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PersistenceRetryConfig {
    /// The delay between two attempts.
    pub backoff_delay: Duration,
    /// Maximum number of retry attempts. None means infinite retries.
    pub max_retries: Option<usize>,
    /// The overall timeout spanning all attempts. None means no timeout.
    pub timeout: Option<Duration>,
}

impl Default for PersistenceRetryConfig {
    fn default() -> Self {
        Self { backoff_delay: Duration::from_secs(1), max_retries: Some(10), timeout: None }
    }
}

/// Metrics for the [`PersistenceRetryer`].
#[derive(Metrics, Clone)]
#[metrics(scope = "persistence_retry")]
struct PersistenceRetryMetrics {
    /// Number of attempts before a successful persistence operation.
    #[metric(describe = "Number of attempts before a successful persistence operation")]
    attempts_before_success: Histogram,
    /// Number of persistence operations aborted by the overall timeout.
    #[metric(describe = "Number of persistence operations aborted by the overall timeout")]
    timeouts: Counter,
}

/// Retries persistence operations with a fixed backoff, a bounded number of retries and an
/// optional overall timeout.
///
/// The retryer knows nothing of the operation it runs, which should be idempotent at the storage
/// level. Errors for which [`CanRetry::can_retry`] returns false are returned immediately.
#[derive(Debug, Clone)]
pub struct PersistenceRetryer {
    /// The retry configuration.
    config: PersistenceRetryConfig,
    /// Retry metrics.
    metrics: PersistenceRetryMetrics,
}

impl PersistenceRetryer {
    /// Returns a new [`PersistenceRetryer`] for the provided configuration.
    pub fn new(config: PersistenceRetryConfig) -> Self {
        Self { config, metrics: PersistenceRetryMetrics::default() }
    }

    /// Returns the configuration of the retryer.
    pub const fn config(&self) -> &PersistenceRetryConfig {
        &self.config
    }

    /// Runs the operation until it succeeds, returns a non-retryable error, exhausts its retries
    /// or the overall timeout elapses.
    pub async fn retry<F, Fut, T, E>(
        &self,
        operation_name: &str,
        operation: F,
    ) -> Result<T, RetryError<E>>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: CanRetry + Debug,
    {
        let attempts = self.attempts(operation_name, operation);
        let Some(timeout) = self.config.timeout else { return attempts.await };

        match tokio::time::timeout(timeout, attempts).await {
            Ok(result) => result,
            Err(_) => {
                self.metrics.timeouts.increment(1);
                tracing::warn!(
                    target: "blob_coordinator::retry",
                    operation = operation_name,
                    ?timeout,
                    "Persistence operation timed out"
                );
                Err(RetryError::TimedOut(timeout))
            }
        }
    }

    async fn attempts<F, Fut, T, E>(
        &self,
        operation_name: &str,
        operation: F,
    ) -> Result<T, RetryError<E>>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: CanRetry + Debug,
    {
        let mut attempt: usize = 0;

        loop {
            attempt += 1;
            match operation().await {
                Ok(result) => {
                    self.metrics.attempts_before_success.record(attempt as f64);
                    return Ok(result)
                }
                Err(error) => {
                    // If the error is not retryable, return immediately.
                    if !error.can_retry() {
                        return Err(RetryError::Failed { attempts: attempt, source: error });
                    }

                    if let Some(max_retries) = self.config.max_retries {
                        if attempt > max_retries {
                            return Err(RetryError::Failed { attempts: attempt, source: error });
                        }
                    }

                    tracing::debug!(
                        target: "blob_coordinator::retry",
                        operation = operation_name,
                        ?error,
                        attempt,
                        delay = ?self.config.backoff_delay,
                        "Retrying persistence operation"
                    );

                    tokio::time::sleep(self.config.backoff_delay).await;
                }
            }
        }
    }
}
