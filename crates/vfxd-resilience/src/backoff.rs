//! Exponential backoff with jitter.
//!
//! `max_attempts` counts the first try, so a value of 1 disables retries.

use crate::retry_policy::RetryClassifier;
use rand::Rng;
use std::future::Future;
use std::time::Duration;

/// Backoff strategy configuration
#[derive(Debug, Clone, PartialEq)]
pub struct BackoffConfig {
    /// Delay before the first retry
    pub initial_delay: Duration,
    /// Upper bound for any single delay
    pub max_delay: Duration,
    /// Growth factor between retries
    pub multiplier: f64,
    /// Jitter factor in `[0.0, 1.0]`
    pub jitter: f64,
    /// Maximum number of attempts, including the first
    pub max_attempts: u32,
}

impl Default for BackoffConfig {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_millis(200),
            max_delay: Duration::from_secs(5),
            multiplier: 2.0,
            jitter: 0.2,
            max_attempts: 4,
        }
    }
}

impl BackoffConfig {
    /// Create a new backoff config
    pub fn new() -> Self {
        Self::default()
    }

    /// Set initial delay
    pub fn with_initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    /// Set maximum delay
    pub fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    /// Set multiplier
    pub fn with_multiplier(mut self, multiplier: f64) -> Self {
        self.multiplier = multiplier.max(1.0);
        self
    }

    /// Set jitter factor (clamped to 0.0..=1.0)
    pub fn with_jitter(mut self, jitter: f64) -> Self {
        self.jitter = jitter.clamp(0.0, 1.0);
        self
    }

    /// Set maximum attempts (at least 1)
    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    /// A single attempt, no retries
    pub fn none() -> Self {
        Self::default().with_max_attempts(1)
    }
}

/// Iterator over retry delays.
///
/// Yields `max_attempts - 1` delays: one before each retry.
pub struct ExponentialBackoff {
    config: BackoffConfig,
    retries: u32,
    current_delay: Duration,
}

impl ExponentialBackoff {
    /// Create a new backoff instance
    pub fn new(config: BackoffConfig) -> Self {
        Self {
            current_delay: config.initial_delay,
            config,
            retries: 0,
        }
    }

    /// Retries handed out so far
    pub fn retries(&self) -> u32 {
        self.retries
    }

    /// Retries still available
    pub fn remaining(&self) -> u32 {
        self.config
            .max_attempts
            .saturating_sub(1)
            .saturating_sub(self.retries)
    }

    /// Upper bound for a single delay
    pub fn max_delay(&self) -> Duration {
        self.config.max_delay
    }

    fn jittered(&self, base: Duration) -> Duration {
        let range = base.as_secs_f64() * self.config.jitter;
        if range <= 0.0 {
            return base;
        }
        let offset = rand::thread_rng().gen_range(-range..range);
        Duration::from_secs_f64((base.as_secs_f64() + offset).max(0.0))
    }
}

impl Iterator for ExponentialBackoff {
    type Item = Duration;

    fn next(&mut self) -> Option<Duration> {
        if self.remaining() == 0 {
            return None;
        }

        let delay = self.jittered(self.current_delay).min(self.config.max_delay);
        self.retries += 1;
        self.current_delay = Duration::from_secs_f64(
            (self.current_delay.as_secs_f64() * self.config.multiplier)
                .min(self.config.max_delay.as_secs_f64()),
        );
        Some(delay)
    }
}

/// Runs `f`, retrying only errors the classifier accepts.
///
/// Returns the first non-retryable error unchanged, or the last error once
/// attempts are exhausted. A classifier delay hint is honored up to `max_delay`.
pub async fn retry_classified<C, F, Fut, T, E>(
    config: BackoffConfig,
    classifier: &C,
    operation: &str,
    mut f: F,
) -> Result<T, E>
where
    C: RetryClassifier<E> + ?Sized,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    let mut backoff = ExponentialBackoff::new(config);
    let mut attempt = 0u32;
    loop {
        attempt += 1;
        let err = match f().await {
            Ok(value) => return Ok(value),
            Err(e) => e,
        };

        if !classifier.is_retryable(&err) {
            return Err(err);
        }

        let Some(delay) = backoff.next() else {
            tracing::warn!(operation, attempts = attempt, error = %err, "retries exhausted");
            return Err(err);
        };
        let delay = classifier
            .suggested_delay(&err)
            .map(|hint| hint.max(delay))
            .unwrap_or(delay)
            .min(backoff.max_delay());

        tracing::debug!(operation, attempt, error = %err, ?delay, "retryable failure");
        tokio::time::sleep(delay).await;
    }
}
