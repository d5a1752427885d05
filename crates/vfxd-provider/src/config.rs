//! Endpoint and HTTP client configuration.

use crate::error::{ProviderError, Result};
use url::Url;

/// Rate limiter configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitConfig {
    /// Maximum requests per second
    pub requests_per_second: u32,
    /// Burst size (max requests in a burst)
    pub burst_size: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            requests_per_second: 10,
            burst_size: 20,
        }
    }
}

/// Configuration for one ledger API endpoint plus fallbacks
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderConfig {
    /// Primary API base URL
    pub url: String,
    /// Fallback base URLs, tried in order
    pub fallback_urls: Vec<String>,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Retries per read call after the first attempt
    pub max_retries: u32,
    /// Client-side rate limit, `None` to disable
    pub rate_limit: Option<RateLimitConfig>,
}

impl ProviderConfig {
    /// Creates a new provider configuration with the given base URL
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            fallback_urls: Vec::new(),
            timeout_secs: 30,
            max_retries: 3,
            rate_limit: Some(RateLimitConfig::default()),
        }
    }

    /// Adds a fallback URL
    pub fn with_fallback(mut self, url: impl Into<String>) -> Self {
        self.fallback_urls.push(url.into());
        self
    }

    /// Sets the request timeout
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Sets the retries per read
    pub fn with_max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    /// Sets or clears the rate limit
    pub fn with_rate_limit(mut self, rate_limit: Option<RateLimitConfig>) -> Self {
        self.rate_limit = rate_limit;
        self
    }

    /// Validates URLs, timeout and rate limit
    pub fn validate(&self) -> Result<()> {
        for url in self.all_urls() {
            let parsed = Url::parse(url).map_err(|e| ProviderError::InvalidUrl {
                url: url.to_string(),
                reason: e.to_string(),
            })?;
            if !matches!(parsed.scheme(), "http" | "https") {
                return Err(ProviderError::InvalidUrl {
                    url: url.to_string(),
                    reason: format!("unsupported scheme '{}'", parsed.scheme()),
                });
            }
        }
        if self.timeout_secs == 0 {
            return Err(ProviderError::InvalidConfig("timeout must be non-zero".into()));
        }
        if let Some(limit) = self.rate_limit {
            if limit.requests_per_second == 0 || limit.burst_size == 0 {
                return Err(ProviderError::InvalidConfig(
                    "rate limit and burst must be non-zero".into(),
                ));
            }
        }
        Ok(())
    }

    /// Returns all URLs (primary + fallbacks)
    pub fn all_urls(&self) -> Vec<&str> {
        let mut urls = vec![self.url.as_str()];
        urls.extend(self.fallback_urls.iter().map(|s| s.as_str()));
        urls
    }
}

/// Configuration for the HTTP client
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Maximum idle connections per host
    pub pool_max_idle_per_host: usize,
    /// Idle connection timeout
    pub pool_idle_timeout_secs: u64,
    /// Connection timeout
    pub connect_timeout_secs: u64,
    /// Request timeout
    pub request_timeout_secs: u64,
    /// User agent string
    pub user_agent: String,
    /// Enable gzip compression
    pub gzip: bool,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            pool_max_idle_per_host: 4,
            pool_idle_timeout_secs: 90,
            connect_timeout_secs: 10,
            request_timeout_secs: 30,
            user_agent: format!("vfxd/{}", env!("CARGO_PKG_VERSION")),
            gzip: true,
        }
    }
}

impl HttpClientConfig {
    /// Client settings matching a provider config
    pub fn for_provider(config: &ProviderConfig) -> Self {
        Self {
            request_timeout_secs: config.timeout_secs,
            connect_timeout_secs: config.timeout_secs.min(10),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_config() {
        let config = ProviderConfig::new("https://data.verifiedx.io/api")
            .with_fallback("https://backup.verifiedx.io/api")
            .with_timeout(60)
            .with_max_retries(5);

        assert_eq!(config.timeout_secs, 60);
        assert_eq!(config.max_retries, 5);
        assert_eq!(config.all_urls().len(), 2);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_url() {
        assert!(ProviderConfig::new("not-a-valid-url").validate().is_err());
        assert!(ProviderConfig::new("ftp://data.verifiedx.io").validate().is_err());
        assert!(ProviderConfig::new("https://ok.example")
            .with_fallback("::")
            .validate()
            .is_err());
    }

    #[test]
    fn test_invalid_limits() {
        let zero_timeout = ProviderConfig::new("https://ok.example").with_timeout(0);
        assert!(matches!(zero_timeout.validate(), Err(ProviderError::InvalidConfig(_))));

        let zero_burst = ProviderConfig::new("https://ok.example").with_rate_limit(Some(
            RateLimitConfig {
                requests_per_second: 5,
                burst_size: 0,
            },
        ));
        assert!(zero_burst.validate().is_err());
    }

    #[test]
    fn test_http_client_config_follows_provider() {
        let provider = ProviderConfig::new("https://ok.example").with_timeout(45);
        let http = HttpClientConfig::for_provider(&provider);
        assert_eq!(http.request_timeout_secs, 45);
        assert_eq!(http.connect_timeout_secs, 10);
        assert!(http.gzip);
        assert!(http.user_agent.starts_with("vfxd/"));
    }
}
