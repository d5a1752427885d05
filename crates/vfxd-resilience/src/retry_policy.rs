//! Retry classification and policy.

use crate::backoff::BackoffConfig;
use std::time::Duration;
use vfxd_error::VfxdError;

/// Decides whether an error is worth another attempt
pub trait RetryClassifier<E> {
    /// Check if the error is retryable
    fn is_retryable(&self, error: &E) -> bool;

    /// Delay hint for this error, if any
    fn suggested_delay(&self, _error: &E) -> Option<Duration> {
        None
    }
}

/// Classifies [`VfxdError`] values: only transport-class failures retry
#[derive(Debug, Clone, Copy, Default)]
pub struct LedgerErrorClassifier;

impl RetryClassifier<VfxdError> for LedgerErrorClassifier {
    fn is_retryable(&self, error: &VfxdError) -> bool {
        error.is_retryable()
    }

    fn suggested_delay(&self, error: &VfxdError) -> Option<Duration> {
        match error {
            VfxdError::RateLimited { retry_after_secs } => {
                Some(Duration::from_secs(*retry_after_secs))
            }
            _ => None,
        }
    }
}

/// HTTP status classification
#[derive(Debug, Clone, Copy, Default)]
pub struct HttpRetryClassifier;

impl HttpRetryClassifier {
    /// Check if HTTP status code is retryable
    pub fn is_status_retryable(status: u16) -> bool {
        vfxd_error::is_retryable_status(status)
    }

    /// Check if status indicates rate limiting
    pub fn is_rate_limited(status: u16) -> bool {
        status == 429
    }

    /// Parses a `Retry-After` header given in seconds
    pub fn parse_retry_after(value: &str) -> Option<Duration> {
        value.trim().parse::<u64>().ok().map(Duration::from_secs)
    }
}

/// How ledger calls are retried
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Backoff applied to retryable read failures
    pub backoff: BackoffConfig,
    /// Whether `submit` is retried as well.
    ///
    /// Off by default: a timed-out submit may have been accepted.
    pub retry_submissions: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            backoff: BackoffConfig::default(),
            retry_submissions: false,
        }
    }
}

impl RetryPolicy {
    /// Policy that never retries
    pub fn none() -> Self {
        Self {
            backoff: BackoffConfig::none(),
            retry_submissions: false,
        }
    }

    /// Set the backoff config
    pub fn with_backoff(mut self, backoff: BackoffConfig) -> Self {
        self.backoff = backoff;
        self
    }

    /// Set total attempts per call (first try included)
    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.backoff = self.backoff.with_max_attempts(attempts);
        self
    }

    /// Enable or disable submission retries
    pub fn with_retry_submissions(mut self, enabled: bool) -> Self {
        self.retry_submissions = enabled;
        self
    }

    /// Backoff used for `submit`
    pub fn submit_backoff(&self) -> BackoffConfig {
        if self.retry_submissions {
            self.backoff.clone()
        } else {
            BackoffConfig::none()
        }
    }
}
