//! Request deadlines.

use std::future::Future;
use std::time::Duration;
use vfxd_error::{Result, VfxdError};

/// Awaits `future` for at most `duration`.
///
/// Dropping the future on expiry cancels it; nothing partial is returned.
pub async fn with_timeout<T>(
    duration: Duration,
    operation: &str,
    future: impl Future<Output = Result<T>>,
) -> Result<T> {
    match tokio::time::timeout(duration, future).await {
        Ok(result) => result,
        Err(_) => {
            tracing::warn!(operation, ?duration, "ledger request timed out");
            Err(VfxdError::TransportTimeout {
                seconds: duration.as_secs(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_with_timeout_success() {
        let result = with_timeout(Duration::from_secs(1), "fast", async { Ok(7) }).await;
        assert_eq!(result.unwrap(), 7);
    }

    #[tokio::test]
    async fn test_with_timeout_expires() {
        let result: Result<()> = with_timeout(Duration::from_millis(10), "slow", async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(())
        })
        .await;
        assert!(matches!(result, Err(VfxdError::TransportTimeout { .. })));
    }

    #[tokio::test]
    async fn test_with_timeout_passes_inner_error() {
        let result: Result<()> = with_timeout(Duration::from_secs(1), "inner", async {
            Err(VfxdError::Rejected("nope".into()))
        })
        .await;
        assert!(matches!(result, Err(VfxdError::Rejected(_))));
    }
}
