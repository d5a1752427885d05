//! # vfxd Resilience
//!
//! Retry and timeout building blocks for calls against the remote VFX ledger.
//!
//! Queries in the wallet core make exactly one attempt. Callers that want
//! retries compose them from this crate:
//!
//! - **Backoff**: bounded exponential delays with jitter
//! - **Retry policy**: which errors are retried and whether submissions are
//! - **Timeouts**: per-request deadlines mapped to `TransportTimeout`
//!
//! ## Example
//!
//! ```rust
//! use vfxd_resilience::{BackoffConfig, RetryPolicy};
//! use std::time::Duration;
//!
//! let policy = RetryPolicy::default()
//!     .with_backoff(BackoffConfig::new().with_max_attempts(3).with_jitter(0.0))
//!     .with_retry_submissions(false);
//!
//! assert_eq!(policy.backoff.max_attempts, 3);
//! assert!(!policy.retry_submissions);
//! # let _ = Duration::from_secs(1);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod backoff;
pub mod retry_policy;
pub mod timeout;

pub use backoff::{retry_classified, BackoffConfig, ExponentialBackoff};
pub use retry_policy::{HttpRetryClassifier, LedgerErrorClassifier, RetryClassifier, RetryPolicy};
pub use timeout::with_timeout;
