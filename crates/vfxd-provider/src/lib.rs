//! # vfxd Provider
//!
//! HTTP transport for the VFX ledger REST API.
//!
//! ## Features
//!
//! - Primary plus fallback endpoints with health tracking and failover
//! - Client-side rate limiting (`governor`)
//! - Connection reuse, gzip and per-request timeouts (`reqwest`)
//! - `404 Not Found` surfaced as "absent", never as an error
//!
//! ## Example
//!
//! ```ignore
//! use vfxd_provider::{presets, HttpProvider};
//!
//! let provider = HttpProvider::new(presets::vfx_testnet())?;
//! let details: Option<serde_json::Value> = provider.get_json("/addresses/xAbc/").await?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod client;
pub mod config;
pub mod endpoint;
pub mod error;

pub use client::RestClient;
pub use config::{HttpClientConfig, ProviderConfig, RateLimitConfig};
pub use endpoint::{EndpointHealth, EndpointInfo, EndpointSet};
pub use error::{ProviderError, Result};

use serde::{de::DeserializeOwned, Serialize};
use std::time::Instant;
use vfxd_error::VfxdError;

// ============================================================================
// Provider with HTTP Client
// ============================================================================

/// Endpoints plus a shared client.
///
/// Each call makes one attempt per endpoint at most: when a retryable failure
/// hits the current endpoint and a healthy fallback exists, the call moves on
/// to it. Retrying the same endpoint is left to the caller.
#[derive(Debug)]
pub struct HttpProvider {
    endpoints: EndpointSet,
    client: RestClient,
}

impl HttpProvider {
    /// Creates a provider from a config
    pub fn new(config: ProviderConfig) -> Result<Self> {
        let endpoints = EndpointSet::new(&config)?;
        let client =
            RestClient::with_config(HttpClientConfig::for_provider(&config), config.rate_limit)?;
        Ok(Self { endpoints, client })
    }

    /// GET `path` (relative to the API base). `None` on 404.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
    ) -> vfxd_error::Result<Option<T>> {
        self.with_failover(path, |url| async move { self.client.get_json(&url).await })
            .await
    }

    /// POST `body` to `path` (relative to the API base)
    pub async fn post_json<B, T>(&self, path: &str, body: &B) -> vfxd_error::Result<T>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        self.with_failover(path, |url| async move { self.client.post_json(&url, body).await })
            .await
    }

    /// Base URL currently in use
    pub fn current_url(&self) -> String {
        self.endpoints.current_url()
    }

    /// Returns endpoint statistics
    pub fn stats(&self) -> Vec<EndpointInfo> {
        self.endpoints.stats()
    }

    /// Returns the underlying client
    pub fn client(&self) -> &RestClient {
        &self.client
    }

    async fn with_failover<F, Fut, T>(&self, path: &str, call: F) -> vfxd_error::Result<T>
    where
        F: Fn(String) -> Fut,
        Fut: std::future::Future<Output = Result<T>>,
    {
        let mut base = self.endpoints.current_url();
        let mut tried = 0;
        loop {
            tried += 1;
            let url = join(&base, path);
            let start = Instant::now();
            let err: VfxdError = match call(url.clone()).await {
                Ok(value) => {
                    self.endpoints
                        .record_success(&base, start.elapsed().as_millis() as u64);
                    return Ok(value);
                }
                Err(e) => e.into(),
            };

            if !err.is_retryable() {
                return Err(err);
            }
            tracing::warn!(%url, error = %err, "ledger endpoint failed");
            match self.endpoints.record_failure(&base) {
                Some(next) if tried < self.endpoints.len() => base = next,
                _ => return Err(err),
            }
        }
    }
}

fn join(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Provider presets for the VerifiedX networks
pub mod presets {
    use super::ProviderConfig;
    use vfxd_traits::Network;

    /// VFX Mainnet explorer API
    pub fn vfx_mainnet() -> ProviderConfig {
        ProviderConfig::new(Network::Mainnet.default_endpoint()).with_timeout(30)
    }

    /// VFX Testnet explorer API
    pub fn vfx_testnet() -> ProviderConfig {
        ProviderConfig::new(Network::Testnet.default_endpoint()).with_timeout(30)
    }

    /// Preset for `network`
    pub fn for_network(network: Network) -> ProviderConfig {
        match network {
            Network::Mainnet => vfx_mainnet(),
            Network::Testnet => vfx_testnet(),
        }
    }
}
