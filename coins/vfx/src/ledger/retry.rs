//! Retry wrapper for any ledger.

use async_trait::async_trait;
use vfxd_error::Result;
use vfxd_resilience::{retry_classified, LedgerErrorClassifier, RetryPolicy};
use vfxd_traits::{
    AccountDetails, DomainBinding, LedgerService, Network, SignedTransfer, SubmitOutcome,
    Transaction,
};

/// Adds bounded retries to a [`LedgerService`].
///
/// Reads are retried on transport-class errors. `submit` goes out once unless
/// the policy enables submission retries.
#[derive(Debug)]
pub struct RetryingLedger<L> {
    inner: L,
    policy: RetryPolicy,
    classifier: LedgerErrorClassifier,
}

impl<L: LedgerService> RetryingLedger<L> {
    /// Wraps `inner` with `policy`
    pub fn new(inner: L, policy: RetryPolicy) -> Self {
        Self {
            inner,
            policy,
            classifier: LedgerErrorClassifier,
        }
    }

    /// The wrapped ledger
    pub fn inner(&self) -> &L {
        &self.inner
    }

    /// The policy in use
    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }
}

#[async_trait]
impl<L: LedgerService> LedgerService for RetryingLedger<L> {
    async fn address_details(
        &self,
        network: Network,
        address: &str,
    ) -> Result<Option<AccountDetails>> {
        retry_classified(
            self.policy.backoff.clone(),
            &self.classifier,
            "address_details",
            || self.inner.address_details(network, address),
        )
        .await
    }

    async fn transactions(
        &self,
        network: Network,
        address: &str,
        page: u32,
        page_size: u32,
    ) -> Result<Vec<Transaction>> {
        retry_classified(
            self.policy.backoff.clone(),
            &self.classifier,
            "transactions",
            || self.inner.transactions(network, address, page, page_size),
        )
        .await
    }

    async fn domain_lookup(
        &self,
        network: Network,
        domain: &str,
    ) -> Result<Option<DomainBinding>> {
        retry_classified(
            self.policy.backoff.clone(),
            &self.classifier,
            "domain_lookup",
            || self.inner.domain_lookup(network, domain),
        )
        .await
    }

    async fn submit(&self, network: Network, transfer: &SignedTransfer) -> Result<SubmitOutcome> {
        retry_classified(
            self.policy.submit_backoff(),
            &self.classifier,
            "submit",
            || self.inner.submit(network, transfer),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vfxd_testing::fast_retry_policy;
    use std::sync::atomic::{AtomicU32, Ordering};
    use vfxd_error::VfxdError;
    use vfxd_traits::TxHash;

    /// Fails with `error` for the first `failures` calls of every method
    struct FlakyLedger {
        failures: u32,
        calls: AtomicU32,
        error: fn() -> VfxdError,
    }

    impl FlakyLedger {
        fn new(failures: u32, error: fn() -> VfxdError) -> Self {
            Self {
                failures,
                calls: AtomicU32::new(0),
                error,
            }
        }

        fn tick(&self) -> Result<()> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            if n < self.failures {
                Err((self.error)())
            } else {
                Ok(())
            }
        }
    }

    #[async_trait]
    impl LedgerService for FlakyLedger {
        async fn address_details(&self, _: Network, _: &str) -> Result<Option<AccountDetails>> {
            self.tick()?;
            Ok(None)
        }

        async fn transactions(&self, _: Network, _: &str, _: u32, _: u32) -> Result<Vec<Transaction>> {
            self.tick()?;
            Ok(Vec::new())
        }

        async fn domain_lookup(&self, _: Network, _: &str) -> Result<Option<DomainBinding>> {
            self.tick()?;
            Ok(None)
        }

        async fn submit(&self, _: Network, transfer: &SignedTransfer) -> Result<SubmitOutcome> {
            self.tick()?;
            Ok(SubmitOutcome::Accepted(transfer.hash.clone()))
        }
    }

    fn unavailable() -> VfxdError {
        VfxdError::HttpStatus {
            endpoint: "test".into(),
            status: 503,
        }
    }

    fn bad_request() -> VfxdError {
        VfxdError::HttpStatus {
            endpoint: "test".into(),
            status: 400,
        }
    }

    fn signed() -> SignedTransfer {
        let keypair = vfxd_hd_key::Keypair::generate(Network::Testnet).unwrap();
        let to = vfxd_hd_key::Keypair::generate(Network::Testnet).unwrap();
        crate::build_transfer(&keypair, to.address().as_str(), 1u64, Network::Testnet).unwrap()
    }

    #[tokio::test]
    async fn test_reads_retry_transient_errors() {
        let ledger = RetryingLedger::new(FlakyLedger::new(2, unavailable), fast_retry_policy(3));
        assert!(ledger.address_details(Network::Testnet, "x").await.unwrap().is_none());
        assert_eq!(ledger.inner().calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_reads_give_up_after_bound() {
        let ledger = RetryingLedger::new(FlakyLedger::new(10, unavailable), fast_retry_policy(3));
        let err = ledger.transactions(Network::Testnet, "x", 1, 10).await.unwrap_err();
        assert!(err.is_retryable());
        assert_eq!(ledger.inner().calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_permanent_errors_not_retried() {
        let ledger = RetryingLedger::new(FlakyLedger::new(10, bad_request), fast_retry_policy(5));
        assert!(ledger.domain_lookup(Network::Testnet, "a.vfx").await.is_err());
        assert_eq!(ledger.inner().calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_submit_attempted_once_by_default() {
        let ledger = RetryingLedger::new(FlakyLedger::new(1, unavailable), fast_retry_policy(5));
        assert!(ledger.submit(Network::Testnet, &signed()).await.is_err());
        assert_eq!(ledger.inner().calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_submit_retried_when_enabled() {
        let policy = fast_retry_policy(5).with_retry_submissions(true);
        let ledger = RetryingLedger::new(FlakyLedger::new(1, unavailable), policy);
        let transfer = signed();
        let outcome = ledger.submit(Network::Testnet, &transfer).await.unwrap();
        assert_eq!(outcome, SubmitOutcome::Accepted(TxHash::new(transfer.hash.as_str())));
        assert_eq!(ledger.inner().calls.load(Ordering::SeqCst), 2);
    }
}
