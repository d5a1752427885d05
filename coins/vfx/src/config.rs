//! Ledger client configuration.

use std::time::Duration;
use vfxd_provider::{presets, ProviderConfig};
use vfxd_resilience::RetryPolicy;
use vfxd_traits::Network;

/// Endpoints per network plus the retry policy applied to ledger calls
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerConfig {
    /// Mainnet endpoint
    pub mainnet: ProviderConfig,
    /// Testnet endpoint
    pub testnet: ProviderConfig,
    /// Retries for read calls (and optionally submissions)
    pub retry: RetryPolicy,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            mainnet: presets::vfx_mainnet(),
            testnet: presets::vfx_testnet(),
            retry: RetryPolicy::default(),
        }
    }
}

impl LedgerConfig {
    /// Default endpoints and retry policy
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the endpoint for `network`
    pub fn with_provider(mut self, network: Network, provider: ProviderConfig) -> Self {
        match network {
            Network::Mainnet => self.mainnet = provider,
            Network::Testnet => self.testnet = provider,
        }
        self
    }

    /// Points `network` at `url`, keeping its other settings
    pub fn with_url(mut self, network: Network, url: impl Into<String>) -> Self {
        self.provider_mut(network).url = url.into();
        self
    }

    /// Sets the request timeout on both networks
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.mainnet.timeout_secs = secs;
        self.testnet.timeout_secs = secs;
        self
    }

    /// Sets the retry budget on both networks and in the retry policy
    pub fn with_max_retries(mut self, retries: u32) -> Self {
        self.mainnet.max_retries = retries;
        self.testnet.max_retries = retries;
        self.retry = self.retry.with_max_attempts(retries.saturating_add(1));
        self
    }

    /// Replaces the retry policy
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Endpoint for `network`
    pub fn provider(&self, network: Network) -> &ProviderConfig {
        match network {
            Network::Mainnet => &self.mainnet,
            Network::Testnet => &self.testnet,
        }
    }

    fn provider_mut(&mut self, network: Network) -> &mut ProviderConfig {
        match network {
            Network::Mainnet => &mut self.mainnet,
            Network::Testnet => &mut self.testnet,
        }
    }

    /// Upper bound on one ledger call across all endpoints of `network`
    pub fn call_deadline(&self, network: Network) -> Duration {
        let provider = self.provider(network);
        let endpoints = provider.all_urls().len().max(1) as u64;
        Duration::from_secs(provider.timeout_secs.saturating_mul(endpoints))
    }

    /// Validates both endpoints
    pub fn validate(&self) -> vfxd_error::Result<()> {
        for network in Network::ALL {
            self.provider(network).validate()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_point_at_public_api() {
        let config = LedgerConfig::default();
        assert_eq!(config.provider(Network::Mainnet).url, Network::Mainnet.default_endpoint());
        assert_eq!(config.provider(Network::Testnet).url, Network::Testnet.default_endpoint());
        assert!(!config.retry.retry_submissions);
        config.validate().unwrap();
    }

    #[test]
    fn test_builders() {
        let config = LedgerConfig::new()
            .with_url(Network::Testnet, "http://localhost:8080/api")
            .with_timeout(5)
            .with_max_retries(2);
        assert_eq!(config.testnet.url, "http://localhost:8080/api");
        assert_eq!(config.mainnet.timeout_secs, 5);
        assert_eq!(config.retry.backoff.max_attempts, 3);
        assert_eq!(config.call_deadline(Network::Testnet), Duration::from_secs(5));
    }

    #[test]
    fn test_validate_rejects_bad_url() {
        let config = LedgerConfig::new().with_url(Network::Mainnet, "ftp://nope");
        assert!(config.validate().is_err());
    }
}
